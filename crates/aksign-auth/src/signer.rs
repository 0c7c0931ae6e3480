//! Admin request signing.
//!
//! [`AdminSigner::sign`] turns a set of business parameters into a
//! [`SignedRequest`]:
//!
//! 1. Resolve the admin access key and secret key from the credential store.
//! 2. Read the current Unix time in seconds.
//! 3. Generate a fresh 16-character nonce.
//! 4. Build `accessKey=..&nonce=..&timestamp=..`.
//! 5. Sign it with HMAC-SHA256 keyed by the secret key (lowercase hex).
//!
//! Business parameters ride along unsigned. Every call produces a new
//! timestamp and nonce; nothing is cached between calls.

use std::collections::BTreeMap;

use tracing::debug;

use crate::canonical::{
    ACCESS_KEY_PARAM, NONCE_PARAM, ParamValue, SIGN_PARAM, TIMESTAMP_PARAM,
    build_admin_sign_string, compute_sign,
};
use crate::clock::{Clock, SystemClock};
use crate::credentials::{CredentialStore, resolve_admin_credentials};
use crate::error::AuthError;
use crate::nonce::NonceGenerator;

/// Caller-supplied parameters sent alongside the signature.
pub type BusinessParams = BTreeMap<String, ParamValue>;

/// The four generated signature fields.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureFields {
    /// The admin access key.
    pub access_key: String,
    /// Unix time in seconds at signing.
    pub timestamp: i64,
    /// The single-use nonce.
    pub nonce: String,
    /// Lowercase hex HMAC-SHA256 signature.
    pub sign: String,
}

/// Business parameters plus the signature that authorizes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// Unsigned business parameters, as supplied.
    pub business: BusinessParams,
    /// Generated signature fields.
    pub signature: SignatureFields,
}

impl SignedRequest {
    /// Merge business parameters and signature fields into one map.
    ///
    /// Business parameters go in first, so a business key named `accessKey`,
    /// `timestamp`, `nonce` or `sign` is overwritten by the generated value.
    /// Absent business values are dropped.
    #[must_use]
    pub fn into_params(self) -> BTreeMap<String, ParamValue> {
        let mut params: BTreeMap<String, ParamValue> = self
            .business
            .into_iter()
            .filter(|(_, v)| *v != ParamValue::Absent)
            .collect();
        params.insert(
            ACCESS_KEY_PARAM.to_owned(),
            ParamValue::Str(self.signature.access_key),
        );
        params.insert(
            TIMESTAMP_PARAM.to_owned(),
            ParamValue::Int(self.signature.timestamp),
        );
        params.insert(NONCE_PARAM.to_owned(), ParamValue::Str(self.signature.nonce));
        params.insert(SIGN_PARAM.to_owned(), ParamValue::Str(self.signature.sign));
        params
    }

    /// Render the merged parameters as an `application/x-www-form-urlencoded` query.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let params = self.clone().into_params();
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params.iter().map(|(k, v)| (k, v.to_string())))
            .finish()
    }

    /// Append the merged parameters to the query of `uri`.
    ///
    /// # Errors
    ///
    /// Returns an [`http::Error`] if the resulting URI is invalid.
    pub fn apply_to_uri(&self, uri: &http::Uri) -> Result<http::Uri, http::Error> {
        let signed_query = self.to_query_string();
        let path_and_query = match uri.query() {
            Some(q) if !q.is_empty() => format!("{}?{q}&{signed_query}", uri.path()),
            _ => format!("{}?{signed_query}", uri.path()),
        };

        let mut parts = uri.clone().into_parts();
        parts.path_and_query = Some(http::uri::PathAndQuery::try_from(path_and_query)?);
        Ok(http::Uri::from_parts(parts)?)
    }
}

/// Signs privileged admin requests with the AK/SK scheme.
///
/// Credentials, clock and randomness are all injected, so a signer is cheap to
/// build in tests with fixed values.
///
/// # Examples
///
/// ```
/// use aksign_auth::canonical::ParamValue;
/// use aksign_auth::clock::SystemClock;
/// use aksign_auth::credentials::StaticCredentialStore;
/// use aksign_auth::nonce::NonceGenerator;
/// use aksign_auth::signer::{AdminSigner, BusinessParams};
///
/// let signer = AdminSigner::new(
///     StaticCredentialStore::admin("AK1", "SK1"),
///     SystemClock,
///     NonceGenerator::secure(),
/// );
///
/// let mut business = BusinessParams::new();
/// business.insert("akList".to_owned(), ParamValue::from("a,b"));
///
/// let signed = signer.sign(business).unwrap();
/// assert_eq!(signed.signature.access_key, "AK1");
/// assert_eq!(signed.signature.sign.len(), 64);
/// ```
#[derive(Debug)]
pub struct AdminSigner<S, C = SystemClock> {
    store: S,
    clock: C,
    nonces: NonceGenerator,
}

impl<S: CredentialStore> AdminSigner<S, SystemClock> {
    /// Signer using the system clock and secure nonces.
    pub fn with_store(store: S) -> Self {
        Self::new(store, SystemClock, NonceGenerator::secure())
    }
}

impl<S: CredentialStore, C: Clock> AdminSigner<S, C> {
    /// Create a signer from its collaborators.
    pub fn new(store: S, clock: C, nonces: NonceGenerator) -> Self {
        Self {
            store,
            clock,
            nonces,
        }
    }

    /// Sign `business` for an admin request.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingCredentials`] if the admin access key or
    /// secret key is absent or empty, or [`AuthError::CryptoUnavailable`] if no
    /// acceptable random source is available for the nonce.
    pub fn sign(&self, business: BusinessParams) -> Result<SignedRequest, AuthError> {
        let (access_key, secret_key) = resolve_admin_credentials(&self.store)?;

        let timestamp = self.clock.now_unix_secs();
        let nonce = self.nonces.generate()?;

        let sign_string = build_admin_sign_string(access_key.as_str(), timestamp, &nonce);
        debug!(sign_string = %sign_string, "Built admin sign string");

        let sign = compute_sign(&sign_string, secret_key.expose_secret());

        debug!(
            access_key = %access_key,
            timestamp,
            business_params = business.len(),
            "Signed admin request"
        );

        Ok(SignedRequest {
            business,
            signature: SignatureFields {
                access_key: access_key.as_str().to_owned(),
                timestamp,
                nonce,
                sign,
            },
        })
    }
}
