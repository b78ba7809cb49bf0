use thiserror::Error;

pub type Result<T> = std::result::Result<T, CanonicalError>;

#[derive(Debug, Error)]
pub enum CanonicalError {
    #[error("GraphQL syntax error: {0}")]
    Syntax(String),
}
