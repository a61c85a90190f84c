//! Error types for the scraper

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read config file: {0}")]
    ConfigRead(std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("No input specified in config")]
    NoInput,

    #[error("No channels specified in config")]
    NoChannels,

    #[error("Group references are not supported: {0}")]
    GroupsUnsupported(String),

    #[error("Session is locked by another process")]
    SessionLocked,

    #[error("Failed to acquire session lock: {0}")]
    LockError(String),

    #[error("Failed to open session file {0}: {1}")]
    SessionOpen(String, String),

    #[error("Sign-in failed: {0}")]
    SignInFailed(String),

    #[error("Telegram API error: {0}")]
    TelegramError(String),

    #[error("Channel not found: {0}")]
    ChannelNotFound(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<grammers_client::InvocationError> for Error {
    fn from(err: grammers_client::InvocationError) -> Self {
        Error::TelegramError(err.to_string())
    }
}
