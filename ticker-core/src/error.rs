//! Error types for the ticker feed

use thiserror::Error;

/// Feed-wide error type
#[derive(Error, Debug)]
pub enum TickerError {
    #[error("Serialize error: {0}")]
    Serialize(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TickerError {
    pub fn serialize(msg: impl Into<String>) -> Self {
        TickerError::Serialize(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        TickerError::Parse(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        TickerError::Transport(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        TickerError::Config(msg.into())
    }
}

impl From<serde_json::Error> for TickerError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            TickerError::Parse(err.to_string())
        } else {
            TickerError::Serialize(err.to_string())
        }
    }
}

/// Result type alias for feed operations
pub type TickerResult<T> = Result<T, TickerError>;
