//! Application layer errors

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Telegram API error: {0}")]
    Api(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("QR error: {0}")]
    Qr(#[from] QrError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for BotError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            BotError::Parse(e.to_string())
        } else {
            BotError::Network(e.to_string())
        }
    }
}

/// QR rendering errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum QrError {
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Nothing to encode")]
    EmptyPayload,

    #[error("Encoding failed: {0}")]
    Encode(String),

    #[error("Image error: {0}")]
    Image(String),
}

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
