//! Client error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Core(#[from] ember_core::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("{message}")]
    Service { message: String },

    #[error("Auth provider failure: {0}")]
    AuthProvider(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;
