use graphql_persist_canonical::{CanonicalError, ManifestError};
use graphql_persist_extract::ExtractError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("GraphQL syntax error: {0}")]
    Syntax(String),

    #[error("Found the following duplicate GraphQL operation names: {}", .0.join(", "))]
    DuplicateOperationNames(Vec<String>),

    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidExcludePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

impl From<CanonicalError> for EngineError {
    fn from(error: CanonicalError) -> Self {
        match error {
            CanonicalError::Syntax(message) => Self::Syntax(message),
        }
    }
}
