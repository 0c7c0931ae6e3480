//! Credential stores and providers.
//!
//! Two lookups exist, one per side of the protocol:
//!
//! - [`CredentialStore`] is what the signer reads its own admin AK/SK from, by
//!   the well-known names [`ADMIN_ACCESS_KEY_NAME`] and [`ADMIN_SECRET_KEY_NAME`].
//! - [`CredentialProvider`] is what the verifier uses to resolve the secret key
//!   belonging to an incoming access key.

use std::collections::HashMap;
use std::sync::Arc;

use aksign_core::{ADMIN_ACCESS_KEY_ENV, ADMIN_SECRET_KEY_ENV, AccessKey, AkSignConfig, SecretKey};

use crate::error::AuthError;

/// Store key under which the admin access key is kept.
pub const ADMIN_ACCESS_KEY_NAME: &str = "adminAccessKey";

/// Store key under which the admin secret key is kept.
pub const ADMIN_SECRET_KEY_NAME: &str = "adminSecretKey";

/// Read-only key/value store holding the signer's credentials.
pub trait CredentialStore: Send + Sync {
    /// Look up `key`, returning `None` when absent.
    fn get(&self, key: &str) -> Option<String>;
}

impl<T: CredentialStore + ?Sized> CredentialStore for Arc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

/// An in-memory credential store.
///
/// # Examples
///
/// ```
/// use aksign_auth::credentials::{CredentialStore, StaticCredentialStore};
///
/// let store = StaticCredentialStore::admin("AK1", "SK1");
/// assert_eq!(store.get("adminAccessKey").as_deref(), Some("AK1"));
/// assert_eq!(store.get("somethingElse"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticCredentialStore {
    entries: HashMap<String, String>,
}

impl StaticCredentialStore {
    /// Create a store from an iterable of (key, value) pairs.
    pub fn new(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Create a store holding just the admin pair.
    pub fn admin(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self::new([
            (ADMIN_ACCESS_KEY_NAME.to_owned(), access_key.into()),
            (ADMIN_SECRET_KEY_NAME.to_owned(), secret_key.into()),
        ])
    }

    /// Create a store from the admin keys in `config`; unset keys stay absent.
    #[must_use]
    pub fn from_config(config: &AkSignConfig) -> Self {
        let mut entries = HashMap::new();
        if let Some(ak) = &config.admin_access_key {
            entries.insert(ADMIN_ACCESS_KEY_NAME.to_owned(), ak.as_str().to_owned());
        }
        if let Some(sk) = &config.admin_secret_key {
            entries.insert(ADMIN_SECRET_KEY_NAME.to_owned(), sk.expose_secret().to_owned());
        }
        Self { entries }
    }
}

impl CredentialStore for StaticCredentialStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }
}

/// Reads the admin keys from `ADMIN_ACCESS_KEY` / `ADMIN_SECRET_KEY` at every lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentialStore;

impl CredentialStore for EnvCredentialStore {
    fn get(&self, key: &str) -> Option<String> {
        let var = match key {
            ADMIN_ACCESS_KEY_NAME => ADMIN_ACCESS_KEY_ENV,
            ADMIN_SECRET_KEY_NAME => ADMIN_SECRET_KEY_ENV,
            _ => return None,
        };
        std::env::var(var).ok()
    }
}

/// Resolve the admin credential pair from `store`.
///
/// # Errors
///
/// Returns [`AuthError::MissingCredentials`] if either key is absent or empty.
pub fn resolve_admin_credentials(
    store: &dyn CredentialStore,
) -> Result<(AccessKey, SecretKey), AuthError> {
    let access_key = store
        .get(ADMIN_ACCESS_KEY_NAME)
        .and_then(|v| AccessKey::new(v).ok())
        .ok_or(AuthError::MissingCredentials)?;
    let secret_key = store
        .get(ADMIN_SECRET_KEY_NAME)
        .and_then(|v| SecretKey::new(v).ok())
        .ok_or(AuthError::MissingCredentials)?;
    Ok((access_key, secret_key))
}

/// Whether an access key may currently be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyStatus {
    /// The key authenticates requests.
    #[default]
    Enabled,
    /// The key is known but switched off.
    Disabled,
}

/// What a key holder is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionLevel {
    /// May only read its own key information.
    #[default]
    ReadOnly,
    /// May also change its own key status and expiry.
    ReadWrite,
    /// May manage every key.
    Admin,
}

/// Everything the verifier knows about an access key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// Shared secret used as the HMAC key.
    pub secret_key: SecretKey,
    /// Whether the key is switched on.
    pub status: KeyStatus,
    /// Granted permission.
    pub permission: PermissionLevel,
}

impl Credential {
    /// An enabled credential with `permission`.
    #[must_use]
    pub fn new(secret_key: SecretKey, permission: PermissionLevel) -> Self {
        Self {
            secret_key,
            status: KeyStatus::Enabled,
            permission,
        }
    }

    /// An enabled admin credential.
    #[must_use]
    pub fn admin(secret_key: SecretKey) -> Self {
        Self::new(secret_key, PermissionLevel::Admin)
    }

    /// The same credential, switched off.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.status = KeyStatus::Disabled;
        self
    }
}

/// Trait for looking up credentials by access key.
///
/// Implementations may back this with a database, configuration file,
/// or any other credential store.
pub trait CredentialProvider: Send + Sync {
    /// Retrieve the credential for the given access key, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::AccessKeyNotFound`] if the access key is not recognized.
    fn get_credential(&self, access_key: &str) -> Result<Credential, AuthError>;
}

impl<T: CredentialProvider + ?Sized> CredentialProvider for Arc<T> {
    fn get_credential(&self, access_key: &str) -> Result<Credential, AuthError> {
        (**self).get_credential(access_key)
    }
}

/// A simple in-memory credential provider backed by a `HashMap`.
///
/// # Examples
///
/// ```
/// use aksign_auth::credentials::{
///     CredentialProvider, KeyStatus, PermissionLevel, StaticCredentialProvider,
/// };
///
/// let provider = StaticCredentialProvider::new(vec![
///     ("7jxtUmuITH8lC68J".to_owned(), "NniZjv7CxqEmBYa0cIxijsPW2dgLHpDZ".to_owned()),
/// ]);
///
/// let credential = provider.get_credential("7jxtUmuITH8lC68J").unwrap();
/// assert_eq!(credential.secret_key.expose_secret(), "NniZjv7CxqEmBYa0cIxijsPW2dgLHpDZ");
/// assert_eq!(credential.status, KeyStatus::Enabled);
/// assert_eq!(credential.permission, PermissionLevel::ReadOnly);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticCredentialProvider {
    credentials: HashMap<String, Credential>,
}

impl StaticCredentialProvider {
    /// Create a provider from (access_key, secret_key) pairs, each enabled with
    /// [`PermissionLevel::ReadOnly`]; pairs with an empty secret are ignored.
    pub fn new(credentials: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            credentials: credentials
                .into_iter()
                .filter_map(|(ak, sk)| {
                    SecretKey::new(sk)
                        .ok()
                        .map(|sk| (ak, Credential::new(sk, PermissionLevel::ReadOnly)))
                })
                .collect(),
        }
    }

    /// Add or replace the credential for `access_key`.
    #[must_use]
    pub fn with_credential(
        mut self,
        access_key: impl Into<String>,
        credential: Credential,
    ) -> Self {
        self.credentials.insert(access_key.into(), credential);
        self
    }

    /// Create a provider that knows only the admin pair from `config`, with
    /// [`PermissionLevel::Admin`].
    #[must_use]
    pub fn from_config(config: &AkSignConfig) -> Self {
        let credentials = match (&config.admin_access_key, &config.admin_secret_key) {
            (Some(ak), Some(sk)) => {
                HashMap::from([(ak.as_str().to_owned(), Credential::admin(sk.clone()))])
            }
            _ => HashMap::new(),
        };
        Self { credentials }
    }
}

impl CredentialProvider for StaticCredentialProvider {
    fn get_credential(&self, access_key: &str) -> Result<Credential, AuthError> {
        self.credentials
            .get(access_key)
            .cloned()
            .ok_or_else(|| AuthError::AccessKeyNotFound(access_key.to_owned()))
    }
}
