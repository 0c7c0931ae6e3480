//! Access key and secret key newtypes.

use std::fmt;

use crate::error::{AkSignError, AkSignResult};

/// Public half of an AK/SK credential pair.
///
/// Sent in clear on every signed request, so it is safe to log.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccessKey(String);

impl AccessKey {
    /// Create a new access key.
    ///
    /// # Errors
    /// Returns [`AkSignError::EmptyKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> AkSignResult<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(AkSignError::EmptyKey("access key"));
        }
        Ok(Self(key))
    }

    /// Get the access key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for AccessKey {
    type Error = AkSignError;

    fn try_from(key: String) -> AkSignResult<Self> {
        Self::new(key)
    }
}

impl From<AccessKey> for String {
    fn from(key: AccessKey) -> Self {
        key.0
    }
}

/// Private half of an AK/SK credential pair, used as the HMAC key.
///
/// `Debug` output is redacted and there is no `Display` impl; callers must go
/// through [`SecretKey::expose_secret`] to read the value.
#[derive(Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SecretKey(String);

impl SecretKey {
    /// Create a new secret key.
    ///
    /// # Errors
    /// Returns [`AkSignError::EmptyKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> AkSignResult<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(AkSignError::EmptyKey("secret key"));
        }
        Ok(Self(key))
    }

    /// Borrow the raw secret.
    #[must_use]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(***)")
    }
}

impl TryFrom<String> for SecretKey {
    type Error = AkSignError;

    fn try_from(key: String) -> AkSignResult<Self> {
        Self::new(key)
    }
}

impl From<SecretKey> for String {
    fn from(key: SecretKey) -> Self {
        key.0
    }
}
