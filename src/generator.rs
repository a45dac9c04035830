//! Message generation: one chat completion per run, no retries.

use tracing::{error, info};

use crate::config::{Secrets, Settings};
use crate::integrations::openai::{ChatMessage, GenerationError, OpenAIClient};

/// Fixed system role instruction for every request.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant creating inspiring messages.";

/// Sampling temperature for the completion request.
pub const TEMPERATURE: f32 = 0.8;
/// Upper bound on the generated message length.
pub const MAX_TOKENS: u32 = 150;

/// Request one inspiring message from the configured endpoint.
///
/// Every failure is logged with a kind-specific diagnostic and collapses to
/// `None`; a single failed attempt ends generation for this run.
pub async fn generate_message(secrets: &Secrets, settings: &Settings) -> Option<String> {
    info!(
        base_url = %settings.openai_base_url,
        model = %settings.openai_model,
        "Requesting inspiring message from API"
    );

    let client = match OpenAIClient::new(
        secrets.api_key.as_str(),
        settings.openai_base_url.as_str(),
    ) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Failed to initialise API client");
            return None;
        }
    };

    let messages = vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(settings.openai_prompt.as_str()),
    ];

    match client
        .chat_completion(messages, &settings.openai_model, TEMPERATURE, MAX_TOKENS)
        .await
    {
        Ok(message) => {
            info!("Successfully received message from API");
            Some(message)
        }
        Err(GenerationError::Auth(e)) => {
            error!(error = %e, "API authentication error, check the API key in .env");
            None
        }
        Err(GenerationError::RateLimit(e)) => {
            error!(error = %e, "API rate limit error, quota or limits exceeded");
            None
        }
        Err(GenerationError::NotFound(e)) => {
            error!(
                error = %e,
                model = %settings.openai_model,
                "API not found error, check the model and base URL in config.json"
            );
            None
        }
        Err(GenerationError::Connection(e)) => {
            error!(
                error = %e,
                base_url = %settings.openai_base_url,
                "API connection error, check network or URL"
            );
            None
        }
        Err(GenerationError::Other(e)) => {
            error!(error = %e, "Error getting message from API");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChatId;
    use httpmock::prelude::*;
    use serde_json::json;

    fn secrets() -> Secrets {
        Secrets {
            api_key: "test_key".to_string(),
            bot_token: "123:abc".to_string(),
        }
    }

    fn settings(base_url: String) -> Settings {
        Settings {
            chat_ids: vec![ChatId::Id(111)],
            openai_base_url: base_url,
            openai_model: "gpt-4o-mini".to_string(),
            openai_prompt: "Say hi".to_string(),
        }
    }

    #[tokio::test]
    async fn generate_message_returns_trimmed_content() {
        let server = MockServer::start_async().await;

        let completion_mock = server.mock(|when, then| {
            when.method(POST).path("/chat/completions").is_true(|req| {
                let body = String::from_utf8_lossy(req.body().as_ref());
                body.contains(SYSTEM_PROMPT) && body.contains("Say hi")
            });
            then.status(200).json_body(json!({
                "choices": [
                    { "message": { "role": "assistant", "content": " Keep going! " } }
                ]
            }));
        });

        let message = generate_message(&secrets(), &settings(server.base_url())).await;

        assert_eq!(message.as_deref(), Some("Keep going!"));
        completion_mock.assert_calls(1);
    }

    #[tokio::test]
    async fn generate_message_absent_on_auth_failure() {
        let server = MockServer::start_async().await;

        let completion_mock = server.mock(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(401).body("invalid api key");
        });

        let message = generate_message(&secrets(), &settings(server.base_url())).await;

        assert!(message.is_none());
        // No retries: a single failed attempt ends generation
        completion_mock.assert_calls(1);
    }

    #[tokio::test]
    async fn generate_message_absent_on_connection_failure() {
        let message =
            generate_message(&secrets(), &settings("http://127.0.0.1:9".to_string())).await;
        assert!(message.is_none());
    }
}
