//! Error types for the AKSign core.

/// Core error type for AKSign infrastructure.
#[derive(Debug, thiserror::Error)]
pub enum AkSignError {
    /// A key that must carry a value was empty.
    #[error("{0} must not be empty")]
    EmptyKey(&'static str),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience result type for AKSign operations.
pub type AkSignResult<T> = Result<T, AkSignError>;
