//! Inspiring Message Bot Library
//!
//! This library provides tools to:
//! - Load and validate secrets (.env) and settings (config.json)
//! - Request a short inspiring message from an OpenAI-compatible API
//! - Broadcast the message to a whitelist of Telegram chats via the Bot API
//! - Log every stage to stdout and a local log file

pub mod broadcast;
pub mod config;
pub mod error;
pub mod generator;
pub mod integrations;
pub mod logging;
pub mod run;

// Re-export common types
pub use broadcast::{broadcast, BroadcastSummary};
pub use config::{ChatId, Secrets, Settings};
pub use error::{Error, Result};
pub use integrations::{BotClient, OpenAIClient};
pub use run::{run, RunOutcome};
