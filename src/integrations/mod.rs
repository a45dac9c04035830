//! External integrations module.
//!
//! Provides clients for:
//! - OpenAI-compatible chat completion endpoints
//! - Telegram Bot API (sendMessage)

pub mod openai;
pub mod telegram;

pub use openai::{ChatMessage, GenerationError, OpenAIClient};
pub use telegram::{BotClient, SendError};
