//! Access key / secret key pair generation.

use aksign_core::{AccessKey, SecretKey};
use serde::Serialize;

use crate::error::AuthError;
use crate::nonce::NonceGenerator;

/// Length of a generated access key.
pub const AK_LENGTH: usize = 16;

/// Length of a generated secret key.
pub const SK_LENGTH: usize = 32;

/// A freshly issued credential pair.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPair {
    /// Public identifier.
    pub access_key: AccessKey,
    /// Shared secret, serialized so it can be handed to the new holder once.
    #[serde(serialize_with = "serialize_secret")]
    pub secret_key: SecretKey,
}

fn serialize_secret<S: serde::Serializer>(sk: &SecretKey, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(sk.expose_secret())
}

/// Generate a [`AK_LENGTH`]-character access key.
///
/// # Errors
///
/// Returns [`AuthError::CryptoUnavailable`] if the generator cannot produce
/// randomness under its policy.
pub fn generate_access_key(generator: &NonceGenerator) -> Result<AccessKey, AuthError> {
    Ok(AccessKey::new(generator.generate_with_length(AK_LENGTH)?)?)
}

/// Generate a [`SK_LENGTH`]-character secret key.
///
/// # Errors
///
/// Same as [`generate_access_key`].
pub fn generate_secret_key(generator: &NonceGenerator) -> Result<SecretKey, AuthError> {
    Ok(SecretKey::new(generator.generate_with_length(SK_LENGTH)?)?)
}

/// Generate a new alphanumeric key pair.
///
/// # Errors
///
/// Same as [`generate_access_key`].
pub fn generate_key_pair(generator: &NonceGenerator) -> Result<KeyPair, AuthError> {
    Ok(KeyPair {
        access_key: generate_access_key(generator)?,
        secret_key: generate_secret_key(generator)?,
    })
}
