// src/domain/errors.rs
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Alert error: {0}")]
    Alert(#[from] AlertError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure to obtain a price snapshot from the exchange
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request error: {0}")]
    Request(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Data parse error: {0}")]
    Parse(String),
}

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Request error: {0}")]
    Request(String),

    #[error("Notification rejected with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum AlertError {
    #[error("Failed to write alert log: {0}")]
    LogWrite(#[from] std::io::Error),

    #[error("Failed to send notification: {0}")]
    Notify(#[from] NotifyError),
}

// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
pub type FetchResult<T> = Result<T, FetchError>;
pub type NotifyResult<T> = Result<T, NotifyError>;
pub type AlertResult<T> = Result<T, AlertError>;
