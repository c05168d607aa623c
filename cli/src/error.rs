//! Error types for the CLI.

use std::path::PathBuf;

use bandarscope::{TransitionError, ValidationError};
use bandarscope_client::ApiError;

/// All errors that can occur running a command.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to read {path}: {source}")]
    InputRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Upload(#[from] TransitionError),

    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("aborted: {0}")]
    Aborted(String),

    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Process exit code: 2 for rejected input, 0 for a declined prompt, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Validation(_) | Error::Api(ApiError::Validation(_)) => 2,
            Error::Aborted(_) => 0,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
