// src/errors.rs

use std::time::Duration;
use thiserror::Error;

/// Everything that can go wrong between the chat client, its storage and the backend.
#[derive(Error, Debug)]
pub enum ChatError {
    /// Connection-level failure reported by the HTTP client.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("HTTP error! Status: {status}")]
    HttpStatus { status: u16 },

    /// The request was aborted after its deadline.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The backend answered 2xx but the body did not have the expected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type ChatResult<T> = Result<T, ChatError>;

impl ChatError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        ChatError::Config(msg.into())
    }

    pub fn storage_error(msg: impl Into<String>) -> Self {
        ChatError::Storage(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        ChatError::MalformedResponse(msg.into())
    }
}
