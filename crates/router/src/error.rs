use graphql_persist_canonical::{CanonicalError, ManifestError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RouterError>;

#[derive(Debug, Error)]
pub enum RouterError {
    /// The request's signature has no entry in the manifest.
    #[error(
        "Could not find query inside query map (operation: {})",
        operation.as_deref().unwrap_or("<anonymous>")
    )]
    NotInManifest {
        operation: Option<String>,
        signature: String,
    },

    #[error("Request document contains no operation")]
    NoOperation,

    #[error("Request document contains several operations and no operation name")]
    AmbiguousOperation,

    #[error("Operation '{0}' not found in request document")]
    UnknownOperation(String),

    #[error("GraphQL syntax error: {0}")]
    Syntax(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error {0}: {1}")]
    Http(u16, String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

impl From<CanonicalError> for RouterError {
    fn from(error: CanonicalError) -> Self {
        match error {
            CanonicalError::Syntax(message) => Self::Syntax(message),
        }
    }
}
