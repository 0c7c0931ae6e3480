//! Signature base string construction and HMAC-SHA256 signing.
//!
//! The base string is built from a parameter map:
//!
//! ```text
//! key1=value1&key2=value2&...
//! ```
//!
//! Keys are sorted in ascending ASCII byte order. Parameters whose value is
//! absent or renders as an empty string are skipped entirely. The signature is
//! the lowercase hex HMAC-SHA256 of the base string, keyed by the secret key.
//!
//! The admin protocol signs exactly `accessKey`, `nonce` and `timestamp`, so its
//! base string is always `accessKey=..&nonce=..&timestamp=..`.

use std::collections::BTreeMap;
use std::fmt;

use hmac::{Hmac, KeyInit, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Query parameter carrying the access key.
pub const ACCESS_KEY_PARAM: &str = "accessKey";
/// Query parameter carrying the Unix timestamp in seconds.
pub const TIMESTAMP_PARAM: &str = "timestamp";
/// Query parameter carrying the nonce.
pub const NONCE_PARAM: &str = "nonce";
/// Query parameter carrying the hex signature.
pub const SIGN_PARAM: &str = "sign";

/// A single request parameter value.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// A string value, sent as-is.
    Str(String),
    /// An integer value, sent in decimal.
    Int(i64),
    /// An omitted value. Never signed and never sent.
    Absent,
}

impl ParamValue {
    /// Whether this value takes part in signing and serialization.
    #[must_use]
    pub fn is_present(&self) -> bool {
        match self {
            Self::Str(s) => !s.is_empty(),
            Self::Int(_) => true,
            Self::Absent => false,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::Absent => Ok(()),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

/// Build the signature base string from an arbitrary parameter map.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use aksign_auth::canonical::{ParamValue, build_sign_string};
///
/// let mut params = BTreeMap::new();
/// params.insert("b".to_owned(), ParamValue::from("2"));
/// params.insert("a".to_owned(), ParamValue::Int(1));
/// params.insert("c".to_owned(), ParamValue::Absent);
/// assert_eq!(build_sign_string(&params), "a=1&b=2");
/// ```
#[must_use]
pub fn build_sign_string(params: &BTreeMap<String, ParamValue>) -> String {
    // `String` orders by bytes, which is ASCII order for ASCII keys.
    params
        .iter()
        .filter(|(_, value)| value.is_present())
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Build the base string for the admin triple.
///
/// # Examples
///
/// ```
/// use aksign_auth::canonical::build_admin_sign_string;
///
/// assert_eq!(
///     build_admin_sign_string("AK1", 1_700_000_000, "abc123"),
///     "accessKey=AK1&nonce=abc123&timestamp=1700000000"
/// );
/// ```
#[must_use]
pub fn build_admin_sign_string(access_key: &str, timestamp: i64, nonce: &str) -> String {
    let params = BTreeMap::from([
        (ACCESS_KEY_PARAM.to_owned(), ParamValue::from(access_key)),
        (TIMESTAMP_PARAM.to_owned(), ParamValue::Int(timestamp)),
        (NONCE_PARAM.to_owned(), ParamValue::from(nonce)),
    ]);
    build_sign_string(&params)
}

/// Compute the lowercase hex HMAC-SHA256 of `sign_string` keyed by `secret_key`.
///
/// The result is always 64 characters.
#[must_use]
pub fn compute_sign(sign_string: &str, secret_key: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret_key.as_bytes()).expect("HMAC can accept any key length");
    mac.update(sign_string.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Sign an arbitrary parameter map.
#[must_use]
pub fn sign_params(params: &BTreeMap<String, ParamValue>, secret_key: &str) -> String {
    compute_sign(&build_sign_string(params), secret_key)
}
