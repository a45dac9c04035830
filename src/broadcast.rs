//! Best-effort sequential fan-out to the configured chat whitelist.

use std::time::Duration;

use tracing::{error, info, warn};

use crate::config::ChatId;
use crate::integrations::telegram::{BotClient, SendError, BOT_API_URL};

/// Pause between sends to avoid bursting the Bot API.
const SEND_PAUSE: Duration = Duration::from_millis(100);

/// Transient per-run result, used only for logging and the exit-code policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastSummary {
    pub attempted: usize,
    pub succeeded: usize,
}

/// Send `message` to every chat id in order against the official Bot API.
pub async fn broadcast(
    bot_token: &str,
    chat_ids: &[ChatId],
    message: Option<&str>,
) -> BroadcastSummary {
    broadcast_with_base_url(bot_token, BOT_API_URL, chat_ids, message).await
}

/// Same as [`broadcast`] with an explicit Bot API host (used by tests).
///
/// Guard clauses first: an absent message or an empty whitelist is a logged
/// no-op, not an error. One destination failing never stops the remaining
/// sends. The bot client lives only for the duration of this call.
pub async fn broadcast_with_base_url(
    bot_token: &str,
    base_url: &str,
    chat_ids: &[ChatId],
    message: Option<&str>,
) -> BroadcastSummary {
    let mut summary = BroadcastSummary::default();

    let Some(message) = message else {
        warn!("No message generated, skipping Telegram send");
        return summary;
    };
    if chat_ids.is_empty() {
        warn!("No target chat ids configured, skipping Telegram send");
        return summary;
    }

    info!("Initialising Telegram bot to send message");
    let bot = match BotClient::with_base_url(bot_token, base_url) {
        Ok(bot) => bot,
        Err(e) => {
            error!(error = %e, "Failed to initialise Telegram bot");
            return summary;
        }
    };

    for chat_id in chat_ids {
        info!(chat_id = %chat_id, "Attempting to send message");
        summary.attempted += 1;

        match bot.send_message(chat_id, message).await {
            Ok(()) => {
                summary.succeeded += 1;
                info!(chat_id = %chat_id, "Successfully sent message");
            }
            Err(SendError::BadRequest(e)) => {
                error!(
                    chat_id = %chat_id,
                    error = %e,
                    "Telegram rejected the request. Is the chat id correct? Has the user started the bot?"
                );
            }
            Err(SendError::Forbidden(e)) => {
                error!(
                    chat_id = %chat_id,
                    error = %e,
                    "Telegram forbids sending. Has the user blocked the bot?"
                );
            }
            Err(SendError::Other(e)) => {
                error!(chat_id = %chat_id, error = %e, "Error sending message");
            }
        }

        tokio::time::sleep(SEND_PAUSE).await;
    }

    info!(
        attempted = summary.attempted,
        succeeded = summary.succeeded,
        "Finished sending messages"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn broadcast_skips_on_absent_message() {
        let server = MockServer::start_async().await;

        let send_mock = server.mock(|when, then| {
            when.method(POST);
            then.status(200).json_body(json!({ "ok": true }));
        });

        let summary =
            broadcast_with_base_url("123:abc", &server.base_url(), &[ChatId::Id(111)], None).await;

        assert_eq!(summary, BroadcastSummary::default());
        send_mock.assert_calls(0);
    }

    #[tokio::test]
    async fn broadcast_skips_on_empty_whitelist() {
        let server = MockServer::start_async().await;

        let send_mock = server.mock(|when, then| {
            when.method(POST);
            then.status(200).json_body(json!({ "ok": true }));
        });

        let summary =
            broadcast_with_base_url("123:abc", &server.base_url(), &[], Some("Hello")).await;

        assert_eq!(summary, BroadcastSummary::default());
        send_mock.assert_calls(0);
    }

    #[tokio::test]
    async fn broadcast_aborts_on_bad_token() {
        let server = MockServer::start_async().await;

        let send_mock = server.mock(|when, then| {
            when.method(POST);
            then.status(200).json_body(json!({ "ok": true }));
        });

        let summary = broadcast_with_base_url(
            "not-a-token",
            &server.base_url(),
            &[ChatId::Id(111)],
            Some("Hello"),
        )
        .await;

        assert_eq!(summary, BroadcastSummary::default());
        send_mock.assert_calls(0);
    }

    #[tokio::test]
    async fn broadcast_continues_past_failed_destination() {
        let server = MockServer::start_async().await;

        let forbidden_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/bot123:abc/sendMessage")
                .is_true(|req| {
                    let body = String::from_utf8_lossy(req.body().as_ref());
                    body.contains("222")
                });
            then.status(403)
                .json_body(json!({ "ok": false, "error_code": 403, "description": "Forbidden" }));
        });
        let ok_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/bot123:abc/sendMessage")
                .is_true(|req| {
                    let body = String::from_utf8_lossy(req.body().as_ref());
                    !body.contains("222")
                });
            then.status(200).json_body(json!({ "ok": true, "result": {} }));
        });

        let chat_ids = [ChatId::Id(111), ChatId::Id(222), ChatId::Id(333)];
        let summary =
            broadcast_with_base_url("123:abc", &server.base_url(), &chat_ids, Some("Hello")).await;

        assert_eq!(summary.attempted, 3);
        assert_eq!(summary.succeeded, 2);
        forbidden_mock.assert_calls(1);
        ok_mock.assert_calls(2);
    }

    #[tokio::test]
    async fn broadcast_attempts_every_destination_in_order() {
        let server = MockServer::start_async().await;

        let send_mock = server.mock(|when, then| {
            when.method(POST).path("/bot123:abc/sendMessage");
            then.status(200).json_body(json!({ "ok": true, "result": {} }));
        });

        let chat_ids = [
            ChatId::Id(1),
            ChatId::Id(2),
            ChatId::Username("@news".to_string()),
        ];
        let summary =
            broadcast_with_base_url("123:abc", &server.base_url(), &chat_ids, Some("Hello")).await;

        assert_eq!(summary.attempted, 3);
        assert_eq!(summary.succeeded, 3);
        send_mock.assert_calls(3);
    }
}
