//! Single-pass orchestration: generate once, then broadcast.

use tracing::{error, info};

use crate::broadcast::{broadcast_with_base_url, BroadcastSummary};
use crate::config::{Secrets, Settings};
use crate::generator::generate_message;
use crate::integrations::telegram::BOT_API_URL;

/// What one invocation produced. Only the exit-code policy in main looks at it.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub message: Option<String>,
    pub summary: Option<BroadcastSummary>,
}

/// Run the whole pipeline once against the official Bot API.
pub async fn run(secrets: &Secrets, settings: &Settings) -> RunOutcome {
    run_with_bot_api(secrets, settings, BOT_API_URL).await
}

/// Linear sequence: start marker, generate, broadcast if a message exists,
/// finish marker. Always reaches the finish marker.
pub async fn run_with_bot_api(
    secrets: &Secrets,
    settings: &Settings,
    bot_api_url: &str,
) -> RunOutcome {
    info!("----- Inspiring bot run started -----");

    let message = generate_message(secrets, settings).await;

    let summary = match &message {
        Some(text) => Some(
            broadcast_with_base_url(
                &secrets.bot_token,
                bot_api_url,
                &settings.chat_ids,
                Some(text.as_str()),
            )
            .await,
        ),
        None => {
            error!("Failed to get inspiring message, nothing to send");
            None
        }
    };

    info!("----- Inspiring bot run finished -----");
    RunOutcome { message, summary }
}
