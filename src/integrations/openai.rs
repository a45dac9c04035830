//! OpenAI-compatible API client for message generation.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Error, Result};

/// Classified generation failure, matched on explicitly by the caller.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Rate limit or quota exceeded: {0}")]
    RateLimit(String),

    #[error("Model or endpoint not found: {0}")]
    NotFound(String),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Generation failed: {0}")]
    Other(String),
}

/// OpenAI client.
#[derive(Debug, Clone)]
pub struct OpenAIClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl OpenAIClient {
    /// Create client with API key and base URL (IONOS and other compatible
    /// providers use the same wire format under a different host).
    pub fn new<S: Into<String>>(api_key: S, base_url: S) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::InvalidArgument("API key is empty".to_string()));
        }
        let base_url = base_url.into();
        if base_url.trim().is_empty() {
            return Err(Error::InvalidArgument("Base URL is empty".to_string()));
        }

        let http = Client::builder()
            .user_agent("inspire_bot/0.1.0")
            .build()
            .map_err(|e| Error::InvalidArgument(format!("HTTP client error: {}", e)))?;

        Ok(Self {
            http,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Chat completion. Returns the trimmed content of the first choice.
    pub async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
        model: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> std::result::Result<String, GenerationError> {
        let request = ChatRequest {
            model: model.to_string(),
            messages,
            temperature,
            max_tokens,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    GenerationError::Connection(e.to_string())
                } else {
                    GenerationError::Other(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GenerationError::Other(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(classify_status(status, &text));
        }

        let chat_response: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| GenerationError::Other(format!("Invalid response: {}", e)))?;

        chat_response
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(|content| content.trim().to_string())
            .ok_or_else(|| GenerationError::Other("Empty response from API".to_string()))
    }
}

fn classify_status(status: StatusCode, body: &str) -> GenerationError {
    let detail = format!("{}: {}", status, body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GenerationError::Auth(detail),
        StatusCode::TOO_MANY_REQUESTS => GenerationError::RateLimit(detail),
        StatusCode::NOT_FOUND => GenerationError::NotFound(detail),
        _ => GenerationError::Other(detail),
    }
}

/// Chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl ChatMessage {
    pub fn system<S: Into<String>>(content: S) -> Self {
        Self {
            role: "system".to_string(),
            content: Some(content.into()),
        }
    }

    pub fn user<S: Into<String>>(content: S) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(content.into()),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}
