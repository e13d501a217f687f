//! Error types for tracker-meta

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] tracker_fs::Error),

    #[error("Descriptor at {path} is empty")]
    EmptyDescriptor { path: PathBuf },

    #[error("Descriptor at {path} is missing required field '{field}'")]
    MissingField { path: PathBuf, field: &'static str },

    #[error("Invalid package metadata: {message}")]
    InvalidMetadata { message: String },

    #[error("Configuration not found at {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid configuration at {path}: {message}")]
    InvalidConfig { path: PathBuf, message: String },
}

impl Error {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidMetadata {
            message: message.into(),
        }
    }
}
