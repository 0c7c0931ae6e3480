//! Configuration management for AKSign.
//!
//! All configuration is driven by environment variables. [`AkSignConfig::from_lookup`]
//! takes the lookup as a closure so tests never touch the process environment.

use serde::{Deserialize, Serialize};
use tracing::debug;
use typed_builder::TypedBuilder;

use crate::error::{AkSignError, AkSignResult};
use crate::types::{AccessKey, SecretKey};

/// Environment variable holding the admin access key.
pub const ADMIN_ACCESS_KEY_ENV: &str = "ADMIN_ACCESS_KEY";

/// Environment variable holding the admin secret key.
pub const ADMIN_SECRET_KEY_ENV: &str = "ADMIN_SECRET_KEY";

/// Maximum clock skew, in seconds, accepted between signer and verifier.
pub const DEFAULT_TIMESTAMP_TOLERANCE_SECS: u64 = 300;

/// How long, in seconds, a seen nonce is remembered by the verifier.
pub const DEFAULT_NONCE_TTL_SECS: u64 = 300;

/// Global configuration for AKSign.
///
/// # Examples
///
/// ```
/// use aksign_core::AkSignConfig;
///
/// let config = AkSignConfig::default();
/// assert_eq!(config.log_level, "info");
/// assert_eq!(config.timestamp_tolerance_secs, 300);
/// assert!(!config.allow_weak_nonce);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct AkSignConfig {
    /// Admin access key used by the signer.
    #[builder(default, setter(strip_option))]
    pub admin_access_key: Option<AccessKey>,

    /// Admin secret key used by the signer.
    #[builder(default, setter(strip_option))]
    #[serde(skip_serializing)]
    pub admin_secret_key: Option<SecretKey>,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,

    /// Accepted distance between the request timestamp and the verifier clock.
    #[builder(default = DEFAULT_TIMESTAMP_TOLERANCE_SECS)]
    pub timestamp_tolerance_secs: u64,

    /// Lifetime of a nonce in the verifier's replay cache.
    #[builder(default = DEFAULT_NONCE_TTL_SECS)]
    pub nonce_ttl_secs: u64,

    /// Allow nonce generation to fall back to a non-cryptographic source.
    #[builder(default = false)]
    pub allow_weak_nonce: bool,
}

impl Default for AkSignConfig {
    fn default() -> Self {
        Self {
            admin_access_key: None,
            admin_secret_key: None,
            log_level: String::from("info"),
            timestamp_tolerance_secs: DEFAULT_TIMESTAMP_TOLERANCE_SECS,
            nonce_ttl_secs: DEFAULT_NONCE_TTL_SECS,
            allow_weak_nonce: false,
        }
    }
}

impl AkSignConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `ADMIN_ACCESS_KEY` | *(unset)* |
    /// | `ADMIN_SECRET_KEY` | *(unset)* |
    /// | `LOG_LEVEL` | `info` |
    /// | `AKSIGN_TIMESTAMP_TOLERANCE_SECS` | `300` |
    /// | `AKSIGN_NONCE_TTL_SECS` | `300` |
    /// | `AKSIGN_ALLOW_WEAK_NONCE` | `false` |
    ///
    /// # Errors
    /// Returns [`AkSignError::Config`] if a numeric variable does not parse.
    pub fn from_env() -> AkSignResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty key variables are treated as unset.
    ///
    /// # Errors
    /// Returns [`AkSignError::Config`] if a numeric variable does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AkSignResult<Self> {
        let mut config = Self::default();

        if let Some(v) = lookup(ADMIN_ACCESS_KEY_ENV) {
            config.admin_access_key = AccessKey::new(v).ok();
        }
        if let Some(v) = lookup(ADMIN_SECRET_KEY_ENV) {
            config.admin_secret_key = SecretKey::new(v).ok();
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }
        if let Some(v) = lookup("AKSIGN_TIMESTAMP_TOLERANCE_SECS") {
            config.timestamp_tolerance_secs = parse_secs("AKSIGN_TIMESTAMP_TOLERANCE_SECS", &v)?;
        }
        if let Some(v) = lookup("AKSIGN_NONCE_TTL_SECS") {
            config.nonce_ttl_secs = parse_secs("AKSIGN_NONCE_TTL_SECS", &v)?;
        }
        if let Some(v) = lookup("AKSIGN_ALLOW_WEAK_NONCE") {
            config.allow_weak_nonce = v == "1" || v.eq_ignore_ascii_case("true");
        }

        debug!(
            has_access_key = config.admin_access_key.is_some(),
            has_secret_key = config.admin_secret_key.is_some(),
            timestamp_tolerance_secs = config.timestamp_tolerance_secs,
            nonce_ttl_secs = config.nonce_ttl_secs,
            allow_weak_nonce = config.allow_weak_nonce,
            "loaded configuration"
        );

        Ok(config)
    }
}

fn parse_secs(name: &str, value: &str) -> AkSignResult<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| {
            AkSignError::Config(format!(
                "{name} must be a whole number of seconds, got {value:?}"
            ))
        })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_should_create_default_config() {
        let config = AkSignConfig::default();
        assert!(config.admin_access_key.is_none());
        assert!(config.admin_secret_key.is_none());
        assert_eq!(config.log_level, "info");
        assert_eq!(config.nonce_ttl_secs, 300);
        assert!(!config.allow_weak_nonce);
    }

    #[test]
    fn test_should_load_overrides_from_lookup() {
        let config = AkSignConfig::from_lookup(lookup_from(&[
            ("ADMIN_ACCESS_KEY", "AK1"),
            ("ADMIN_SECRET_KEY", "SK1"),
            ("LOG_LEVEL", "debug"),
            ("AKSIGN_TIMESTAMP_TOLERANCE_SECS", "60"),
            ("AKSIGN_NONCE_TTL_SECS", " 120 "),
            ("AKSIGN_ALLOW_WEAK_NONCE", "TRUE"),
        ]))
        .unwrap();

        assert_eq!(config.admin_access_key.unwrap().as_str(), "AK1");
        assert_eq!(config.admin_secret_key.unwrap().expose_secret(), "SK1");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.timestamp_tolerance_secs, 60);
        assert_eq!(config.nonce_ttl_secs, 120);
        assert!(config.allow_weak_nonce);
    }

    #[test]
    fn test_should_treat_empty_keys_as_unset() {
        let config = AkSignConfig::from_lookup(lookup_from(&[
            ("ADMIN_ACCESS_KEY", ""),
            ("ADMIN_SECRET_KEY", ""),
        ]))
        .unwrap();
        assert!(config.admin_access_key.is_none());
        assert!(config.admin_secret_key.is_none());
    }

    #[test]
    fn test_should_reject_non_numeric_tolerance() {
        let result =
            AkSignConfig::from_lookup(lookup_from(&[("AKSIGN_TIMESTAMP_TOLERANCE_SECS", "5m")]));
        assert!(matches!(result, Err(AkSignError::Config(_))));
    }

    #[test]
    fn test_should_not_serialize_secret_key() {
        let config = AkSignConfig::builder()
            .admin_access_key(AccessKey::new("AK1").unwrap())
            .admin_secret_key(SecretKey::new("SK1").unwrap())
            .build();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"adminAccessKey\":\"AK1\""));
        assert!(!json.contains("SK1"));
    }

    #[test]
    fn test_should_reject_empty_admin_key_in_json() {
        let json = r#"{
            "adminAccessKey": "",
            "logLevel": "info",
            "timestampToleranceSecs": 300,
            "nonceTtlSecs": 300,
            "allowWeakNonce": false
        }"#;
        assert!(serde_json::from_str::<AkSignConfig>(json).is_err());

        let json = json.replace(r#""adminAccessKey": """#, r#""adminAccessKey": "AK1""#);
        let config: AkSignConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config.admin_access_key.unwrap().as_str(), "AK1");
        assert!(config.admin_secret_key.is_none());
    }
}
