//! Telegram channel scraper library
//!
//! This library provides the pieces of a small scraping tool:
//! - Resolve configuration from a TOML file or interactive prompts
//! - Authenticate a Telegram client session, reusing a saved session file
//! - Fetch the most recent posts from configured channels
//! - Write each channel's posts to a CSV file in an output directory

pub mod config;
pub mod error;
pub mod export;
pub mod fetch;
pub mod logging;
pub mod prompt;
pub mod reactions;
pub mod session;

// Re-export common types
pub use config::{Config, Credentials, InputSpec};
pub use error::{Error, Result};
pub use fetch::{fetch_posts, ChannelSource, MessageSource, Post, RawMessage};
pub use session::{authorize, SessionLock, TelegramClient};
