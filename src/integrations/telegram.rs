//! Telegram Bot API client (sendMessage only).

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ChatId;
use crate::{Error, Result};

/// Official Bot API host.
pub const BOT_API_URL: &str = "https://api.telegram.org";

/// Classified per-destination send failure.
#[derive(Error, Debug)]
pub enum SendError {
    /// Malformed or unknown chat id (HTTP 400).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The recipient blocked the bot or the bot was kicked (HTTP 403).
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Send failed: {0}")]
    Other(String),
}

/// Telegram bot client.
#[derive(Debug, Clone)]
pub struct BotClient {
    http: Client,
    token: String,
    base_url: String,
}

impl BotClient {
    /// Create a client against the official Bot API.
    pub fn new<S: Into<String>>(token: S) -> Result<Self> {
        Self::with_base_url(token.into(), BOT_API_URL.to_string())
    }

    /// Create a client against a custom Bot API host (used by tests).
    pub fn with_base_url<S: Into<String>>(token: S, base_url: S) -> Result<Self> {
        let token = token.into();
        // Bot tokens look like "123456:ABC-DEF...", reject anything else early
        if token.trim().is_empty() || !token.contains(':') {
            return Err(Error::InvalidArgument(
                "Bot token must look like '<bot_id>:<secret>'".to_string(),
            ));
        }

        let http = Client::builder()
            .user_agent("inspire_bot/0.1.0")
            .build()
            .map_err(|e| Error::InvalidArgument(format!("HTTP client error: {}", e)))?;

        Ok(Self {
            http,
            token,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Send a text message to one chat.
    pub async fn send_message(
        &self,
        chat_id: &ChatId,
        text: &str,
    ) -> std::result::Result<(), SendError> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, self.token);
        let request = SendMessageRequest {
            chat_id: chat_id.clone(),
            text: text.to_string(),
        };

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SendError::Other(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let description = serde_json::from_str::<ApiError>(&body)
            .map(|e| e.description)
            .unwrap_or(body);

        match status {
            StatusCode::BAD_REQUEST => Err(SendError::BadRequest(description)),
            StatusCode::FORBIDDEN => Err(SendError::Forbidden(description)),
            _ => Err(SendError::Other(format!("{}: {}", status, description))),
        }
    }
}

#[derive(Debug, Serialize)]
struct SendMessageRequest {
    chat_id: ChatId,
    text: String,
}

/// Bot API error envelope: {"ok": false, "error_code": ..., "description": ...}
#[derive(Debug, Deserialize)]
struct ApiError {
    description: String,
}
