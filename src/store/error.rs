use thiserror::Error;

use crate::io::FormatError;

/// Why a layer's data could not be loaded. Terminal for that request; no retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("malformed data: {0}")]
    Format(String),
}

impl From<FormatError> for LoadError {
    fn from(e: FormatError) -> Self { LoadError::Format(e.to_string()) }
}

impl From<anyhow::Error> for LoadError {
    fn from(e: anyhow::Error) -> Self { LoadError::Format(format!("{e:#}")) }
}
