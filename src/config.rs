//! Configuration for the inspiring message bot
//!
//! Secrets come from environment variables (optionally loaded from a .env
//! file), settings from a strict config.json document. Everything is validated
//! eagerly at startup; any defect is fatal for the run.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{Error, Result};

/// Environment variable holding the OpenAI-compatible API key.
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
/// Environment variable holding the Telegram bot token.
pub const ENV_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";

const REQUIRED_KEYS: &[&str] = &[
    "whitelisted_chat_ids",
    "openai_base_url",
    "openai_model",
    "openai_prompt",
];

/// A single broadcast destination: numeric chat id or a channel username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatId {
    Id(i64),
    Username(String),
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatId::Id(id) => write!(f, "{}", id),
            ChatId::Username(name) => write!(f, "{}", name),
        }
    }
}

/// Secret credentials, loaded once at startup and never persisted.
#[derive(Debug, Clone)]
pub struct Secrets {
    pub api_key: String,
    pub bot_token: String,
}

impl Secrets {
    /// Load secrets from the environment, reading a .env file first.
    ///
    /// When `env_file` is `None`, tries `.env` in the current directory, then
    /// the parent directory.
    pub fn from_env(env_file: Option<&Path>) -> Result<Self> {
        match env_file {
            Some(path) => {
                dotenvy::from_filename(path).map_err(|e| {
                    Error::InvalidArgument(format!("Failed to read env file {:?}: {}", path, e))
                })?;
            }
            None => {
                if dotenvy::dotenv().is_err() {
                    let _ = dotenvy::from_filename("../.env");
                }
            }
        }

        let secrets = Self::from_values(
            std::env::var(ENV_API_KEY).ok(),
            std::env::var(ENV_BOT_TOKEN).ok(),
        )?;
        info!("Environment variables loaded successfully");
        Ok(secrets)
    }

    /// Validate raw secret values. Both must be present and non-empty.
    pub fn from_values(api_key: Option<String>, bot_token: Option<String>) -> Result<Self> {
        let bot_token = bot_token
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| Error::InvalidArgument(format!("{} not set", ENV_BOT_TOKEN)))?;
        let api_key = api_key
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| Error::InvalidArgument(format!("{} not set", ENV_API_KEY)))?;

        Ok(Self { api_key, bot_token })
    }
}

/// Raw config.json shape: every field optional so validation can report
/// missing keys by name instead of a generic serde error.
#[derive(Debug, Deserialize)]
struct RawSettings {
    whitelisted_chat_ids: Option<serde_json::Value>,
    openai_base_url: Option<String>,
    openai_model: Option<String>,
    openai_prompt: Option<String>,
}

/// Validated settings, immutable for the run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub chat_ids: Vec<ChatId>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub openai_prompt: String,
}

impl Settings {
    /// Load and validate settings from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::InvalidArgument(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let raw: RawSettings = serde_json::from_str(&content)?;
        info!(path = ?path, "Configuration file found and parsed");

        let settings = Self::validate(raw)?;
        info!("Configuration loaded and validated successfully");

        if settings.chat_ids.is_empty() {
            warn!("'whitelisted_chat_ids' is empty, no messages will be sent");
        }
        Ok(settings)
    }

    fn validate(raw: RawSettings) -> Result<Self> {
        let missing: Vec<&str> = [
            (REQUIRED_KEYS[0], raw.whitelisted_chat_ids.is_none()),
            (REQUIRED_KEYS[1], raw.openai_base_url.is_none()),
            (REQUIRED_KEYS[2], raw.openai_model.is_none()),
            (REQUIRED_KEYS[3], raw.openai_prompt.is_none()),
        ]
        .iter()
        .filter(|(_, absent)| *absent)
        .map(|(key, _)| *key)
        .collect();

        if !missing.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "Missing required keys in config.json: {}",
                missing.join(", ")
            )));
        }

        // Empty whitelisted_chat_ids is allowed (warned about by the caller),
        // every other key must be non-empty.
        let empty: Vec<&str> = [
            (REQUIRED_KEYS[1], &raw.openai_base_url),
            (REQUIRED_KEYS[2], &raw.openai_model),
            (REQUIRED_KEYS[3], &raw.openai_prompt),
        ]
        .iter()
        .filter(|(_, value)| value.as_deref().is_some_and(|v| v.trim().is_empty()))
        .map(|(key, _)| *key)
        .collect();

        if !empty.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "Required keys in config.json have empty values: {}",
                empty.join(", ")
            )));
        }

        let ids_value = raw.whitelisted_chat_ids.unwrap_or(serde_json::Value::Null);
        if !ids_value.is_array() {
            return Err(Error::InvalidArgument(
                "'whitelisted_chat_ids' must be an array (e.g. [12345])".to_string(),
            ));
        }
        let chat_ids: Vec<ChatId> = serde_json::from_value(ids_value).map_err(|e| {
            Error::InvalidArgument(format!(
                "'whitelisted_chat_ids' entries must be integers or strings: {}",
                e
            ))
        })?;

        Ok(Self {
            chat_ids,
            openai_base_url: raw.openai_base_url.unwrap_or_default(),
            openai_model: raw.openai_model.unwrap_or_default(),
            openai_prompt: raw.openai_prompt.unwrap_or_default(),
        })
    }
}

/// Load secrets and settings in one shot. Any failure here aborts the run.
pub fn load(env_file: Option<&Path>, config_path: &Path) -> Result<(Secrets, Settings)> {
    let secrets = Secrets::from_env(env_file)?;
    let settings = Settings::load_from_file(config_path)?;
    Ok((secrets, settings))
}
