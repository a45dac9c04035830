//! Inspiring Bot CLI - main entry point
//!
//! Единоразовый запуск по расписанию (cron/systemd timer):
//!   inspire_bot --config config.json --env-file .env
//!
//! Exit codes: 0 - normal completion (including partial send failures),
//! 1 - configuration or secrets failure, 2 - generation failure when
//! --strict-exit is set.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::error;

use inspire_bot::{config, logging, run};

#[derive(Parser)]
#[command(name = "inspire_bot")]
#[command(about = "Broadcast an AI-generated inspiring message to Telegram chats", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the JSON settings file
    #[arg(short, long, env = "INSPIRE_BOT_CONFIG", default_value = "config.json")]
    config: PathBuf,

    /// Path to the .env file with secrets (default: ./.env, then ../.env)
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Path to the log file (also logs to stdout)
    #[arg(long, env = "INSPIRE_BOT_LOG", default_value = "bot.log")]
    log_file: PathBuf,

    /// Exit non-zero when message generation fails, for external schedulers
    #[arg(long, default_value_t = false)]
    strict_exit: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&cli.log_file)?;

    let (secrets, settings) = match config::load(cli.env_file.as_deref(), &cli.config) {
        Ok(loaded) => loaded,
        Err(e) => {
            error!(error = %e, "Fatal configuration error");
            std::process::exit(1);
        }
    };

    let outcome = run(&secrets, &settings).await;

    if cli.strict_exit && outcome.message.is_none() {
        std::process::exit(2);
    }

    Ok(())
}
