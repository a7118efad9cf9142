use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocateError {
    /// Raised by `Searcher` construction; nothing has been walked yet.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("Signal handler error: {0}")]
    Signal(#[from] ctrlc::Error),

    #[error("An unexpected error occurred: {0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl LocateError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        LocateError::InvalidConfig(msg.into())
    }

    pub fn is_invalid_config(&self) -> bool {
        matches!(self, LocateError::InvalidConfig(_))
    }
}

pub type Result<T> = std::result::Result<T, LocateError>;
