//! Error types for Anvesha

use thiserror::Error;

use crate::providers::ProviderError;

/// Anvesha error type
#[derive(Error, Debug)]
pub enum AnveshaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for AnveshaError {
    fn from(e: toml::de::Error) -> Self {
        AnveshaError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AnveshaError>;
