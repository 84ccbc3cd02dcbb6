//! Error types for ember-core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid secret key: {0}")]
    InvalidKey(String),

    #[error("Message is empty")]
    EmptyMessage,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
