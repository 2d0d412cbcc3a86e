//! Error types for MovieMitra.

use thiserror::Error;

/// Result type alias using MovieMitra's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for MovieMitra operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Network unreachable, connection reset, timeout
    #[error("Transport error: {0}")]
    Transport(String),

    /// Catalog answered with a non-2xx status
    #[error("HTTP error: {status} from {url}")]
    Http { status: u16, url: String },

    /// Response body was not the JSON we expected
    #[error("Decode error: {0}")]
    Decode(String),

    /// AI generation collaborator failed or is unavailable
    #[error("Generation error: {0}")]
    Generation(String),

    /// Missing or invalid configuration (fatal at startup)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True for the three ways a catalog fetch can fail.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Error::Transport(_) | Error::Http { .. } | Error::Decode(_)
        )
    }

    /// HTTP status code, when the failure was a non-2xx response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Decode(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Error::Decode(e.to_string())
        } else {
            Error::Transport(e.to_string())
        }
    }
}
