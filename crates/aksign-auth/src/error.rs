//! Error types for AK/SK signing and verification.
//!
//! All failures on either side of the protocol are represented by [`AuthError`].
//! Signer-side variants surface to the operator; verifier-side variants map to
//! a rejected request.

/// Errors that can occur while signing or verifying an AK/SK request.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The admin access key or secret key is absent or empty in the credential store.
    #[error("Admin access key / secret key are not configured")]
    MissingCredentials,

    /// A cryptographic primitive or secure random source is not available.
    #[error("Cryptographic primitive unavailable: {0}")]
    CryptoUnavailable(String),

    /// A required signature parameter is missing or empty.
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    /// The `timestamp` parameter is not an integer number of seconds.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// The request timestamp is outside the accepted window.
    #[error("Request timestamp has expired")]
    TimestampExpired,

    /// The nonce was already used by this access key within its lifetime.
    #[error("Nonce has already been used")]
    NonceReused,

    /// The access key was not found in the credential provider.
    #[error("Access key not found: {0}")]
    AccessKeyNotFound(String),

    /// The computed signature does not match the provided signature.
    #[error("Signature does not match")]
    SignatureDoesNotMatch,

    /// The access key exists but has been disabled.
    #[error("Access key is disabled: {0}")]
    AccessKeyDisabled(String),

    /// The caller authenticated but lacks the required permission.
    #[error("Admin permission required for access key: {0}")]
    PermissionDenied(String),

    /// A key failed core validation.
    #[error(transparent)]
    Core(#[from] aksign_core::AkSignError),
}
