//! AK/SK signature verification.
//!
//! This module implements the server side of the admin signing protocol:
//!
//! 1. Require non-empty `accessKey`, `nonce` and `sign` parameters.
//! 2. Reject timestamps further than the configured tolerance from the verifier clock.
//! 3. Resolve the credential for the access key via the credential provider.
//! 4. Rebuild `accessKey=..&nonce=..&timestamp=..`, compute the expected HMAC-SHA256
//!    signature and compare it to the provided one in constant time. Hex case is
//!    ignored.
//! 5. Reject disabled access keys.
//! 6. Record the nonce in the replay cache, rejecting a nonce already seen for this
//!    access key.
//!
//! The nonce is recorded only after the signature checks out, so forged requests
//! cannot burn nonces belonging to a legitimate caller. It is kept at least until
//! the request timestamp leaves the tolerance window, and for `nonce_ttl_secs`
//! otherwise.
//!
//! The main entry points are [`SignatureVerifier::verify`],
//! [`SignatureVerifier::verify_query`] and [`SignatureVerifier::verify_request`].
//! The `verify_admin*` variants additionally require [`PermissionLevel::Admin`].

use std::collections::HashMap;

use aksign_core::{AkSignConfig, DEFAULT_NONCE_TTL_SECS, DEFAULT_TIMESTAMP_TOLERANCE_SECS};
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::canonical::{
    ACCESS_KEY_PARAM, NONCE_PARAM, SIGN_PARAM, TIMESTAMP_PARAM, build_admin_sign_string,
    compute_sign,
};
use crate::clock::{Clock, SystemClock};
use crate::credentials::{CredentialProvider, KeyStatus, PermissionLevel};
use crate::error::AuthError;
use crate::replay::{InMemoryReplayCache, ReplayCache};

/// Freshness settings for the verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifierConfig {
    /// Maximum distance, in seconds, between request timestamp and verifier clock.
    pub timestamp_tolerance_secs: u64,
    /// Minimum time a seen nonce stays in the replay cache. The verifier keeps it
    /// longer when the request timestamp is still inside the tolerance window.
    pub nonce_ttl_secs: u64,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            timestamp_tolerance_secs: DEFAULT_TIMESTAMP_TOLERANCE_SECS,
            nonce_ttl_secs: DEFAULT_NONCE_TTL_SECS,
        }
    }
}

impl From<&AkSignConfig> for VerifierConfig {
    fn from(config: &AkSignConfig) -> Self {
        Self {
            timestamp_tolerance_secs: config.timestamp_tolerance_secs,
            nonce_ttl_secs: config.nonce_ttl_secs,
        }
    }
}

/// The result of a successful verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedRequest {
    /// The access key that signed the request.
    pub access_key: String,
    /// The signed timestamp.
    pub timestamp: i64,
    /// The signed nonce, now recorded as used.
    pub nonce: String,
    /// Permission granted to the access key.
    pub permission: PermissionLevel,
}

impl VerifiedRequest {
    /// Pass only requests signed by an admin key.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::PermissionDenied`] for any other permission level.
    pub fn require_admin(self) -> Result<Self, AuthError> {
        if self.permission == PermissionLevel::Admin {
            Ok(self)
        } else {
            debug!(
                access_key = %self.access_key,
                permission = ?self.permission,
                "Admin permission required"
            );
            Err(AuthError::PermissionDenied(self.access_key))
        }
    }
}

/// Verifies admin requests signed with the AK/SK scheme.
#[derive(Debug)]
pub struct SignatureVerifier<P, C = SystemClock, R = InMemoryReplayCache> {
    provider: P,
    clock: C,
    replay: R,
    config: VerifierConfig,
}

impl<P: CredentialProvider> SignatureVerifier<P> {
    /// Verifier with the system clock, an in-memory replay cache and default windows.
    pub fn with_provider(provider: P) -> Self {
        Self::new(
            provider,
            SystemClock,
            InMemoryReplayCache::new(),
            VerifierConfig::default(),
        )
    }
}

impl<P: CredentialProvider, C: Clock, R: ReplayCache> SignatureVerifier<P, C, R> {
    /// Create a verifier from its collaborators.
    pub fn new(provider: P, clock: C, replay: R, config: VerifierConfig) -> Self {
        Self {
            provider,
            clock,
            replay,
            config,
        }
    }

    /// The replay cache, e.g. for periodic purging.
    pub fn replay_cache(&self) -> &R {
        &self.replay
    }

    /// Verify already-extracted signature parameters.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] if:
    /// - `access_key`, `nonce` or `sign` is empty
    /// - the timestamp is outside the tolerance window
    /// - the access key is not found
    /// - the signature does not match
    /// - the access key is disabled
    /// - the nonce was already used
    pub fn verify(
        &self,
        access_key: &str,
        timestamp: i64,
        nonce: &str,
        sign: &str,
    ) -> Result<VerifiedRequest, AuthError> {
        for (name, value) in [
            (ACCESS_KEY_PARAM, access_key),
            (NONCE_PARAM, nonce),
            (SIGN_PARAM, sign),
        ] {
            if value.is_empty() {
                return Err(AuthError::MissingParameter(name.to_owned()));
            }
        }

        let now = self.clock.now_unix_secs();
        if now.abs_diff(timestamp) > self.config.timestamp_tolerance_secs {
            debug!(
                access_key,
                timestamp,
                now,
                tolerance = self.config.timestamp_tolerance_secs,
                "Request timestamp outside window"
            );
            return Err(AuthError::TimestampExpired);
        }

        let credential = self.provider.get_credential(access_key)?;

        let sign_string = build_admin_sign_string(access_key, timestamp, nonce);
        debug!(sign_string = %sign_string, "Rebuilt admin sign string");

        let expected = compute_sign(&sign_string, credential.secret_key.expose_secret());
        let provided = sign.to_ascii_lowercase();

        // Constant-time comparison to prevent timing attacks.
        if !bool::from(provided.as_bytes().ct_eq(expected.as_bytes())) {
            debug!(access_key, "Signature mismatch");
            return Err(AuthError::SignatureDoesNotMatch);
        }

        if credential.status == KeyStatus::Disabled {
            debug!(access_key, "Access key disabled");
            return Err(AuthError::AccessKeyDisabled(access_key.to_owned()));
        }

        let expires_at = self.nonce_expiry(now, timestamp);
        if !self
            .replay
            .check_and_record(access_key, nonce, now, expires_at)
        {
            debug!(access_key, nonce, "Nonce replayed");
            return Err(AuthError::NonceReused);
        }

        debug!(access_key, "Signature verification succeeded");
        Ok(VerifiedRequest {
            access_key: access_key.to_owned(),
            timestamp,
            nonce: nonce.to_owned(),
            permission: credential.permission,
        })
    }

    /// Verify and additionally require an admin key.
    ///
    /// # Errors
    ///
    /// Any error from [`SignatureVerifier::verify`], or
    /// [`AuthError::PermissionDenied`] for a non-admin key.
    pub fn verify_admin(
        &self,
        access_key: &str,
        timestamp: i64,
        nonce: &str,
        sign: &str,
    ) -> Result<VerifiedRequest, AuthError> {
        self.verify(access_key, timestamp, nonce, sign)?
            .require_admin()
    }

    /// First second at which the nonce may be forgotten: after the TTL has
    /// elapsed and after `timestamp` has left the tolerance window.
    fn nonce_expiry(&self, now: i64, timestamp: i64) -> i64 {
        let ttl = i64::try_from(self.config.nonce_ttl_secs).unwrap_or(i64::MAX);
        let tolerance = i64::try_from(self.config.timestamp_tolerance_secs).unwrap_or(i64::MAX);
        let ttl_end = now.saturating_add(ttl);
        let window_end = timestamp.saturating_add(tolerance).saturating_add(1);
        ttl_end.max(window_end)
    }

    /// Verify a signed URL query string (`accessKey=..&timestamp=..&nonce=..&sign=..`).
    ///
    /// Values are percent-decoded; other parameters are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingParameter`] if a signature parameter is absent,
    /// [`AuthError::InvalidTimestamp`] if `timestamp` is not an integer, or any
    /// error from [`SignatureVerifier::verify`].
    pub fn verify_query(&self, query: &str) -> Result<VerifiedRequest, AuthError> {
        let params: HashMap<String, String> = form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();

        let access_key = get_required_param(&params, ACCESS_KEY_PARAM)?;
        let timestamp_str = get_required_param(&params, TIMESTAMP_PARAM)?;
        let nonce = get_required_param(&params, NONCE_PARAM)?;
        let sign = get_required_param(&params, SIGN_PARAM)?;

        let timestamp: i64 = timestamp_str
            .trim()
            .parse()
            .map_err(|_| AuthError::InvalidTimestamp(timestamp_str.to_owned()))?;

        self.verify(access_key, timestamp, nonce, sign)
    }

    /// Verify the signature parameters carried in the query of an HTTP request.
    ///
    /// # Errors
    ///
    /// Same as [`SignatureVerifier::verify_query`].
    pub fn verify_request(
        &self,
        parts: &http::request::Parts,
    ) -> Result<VerifiedRequest, AuthError> {
        self.verify_query(parts.uri.query().unwrap_or(""))
    }

    /// [`SignatureVerifier::verify_query`] restricted to admin keys.
    ///
    /// # Errors
    ///
    /// Same as [`SignatureVerifier::verify_query`], plus
    /// [`AuthError::PermissionDenied`] for a non-admin key.
    pub fn verify_admin_query(&self, query: &str) -> Result<VerifiedRequest, AuthError> {
        self.verify_query(query)?.require_admin()
    }

    /// [`SignatureVerifier::verify_request`] restricted to admin keys.
    ///
    /// # Errors
    ///
    /// Same as [`SignatureVerifier::verify_admin_query`].
    pub fn verify_admin_request(
        &self,
        parts: &http::request::Parts,
    ) -> Result<VerifiedRequest, AuthError> {
        self.verify_request(parts)?.require_admin()
    }
}

/// Look up a non-empty parameter.
fn get_required_param<'a>(
    params: &'a HashMap<String, String>,
    name: &str,
) -> Result<&'a str, AuthError> {
    params
        .get(name)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AuthError::MissingParameter(name.to_owned()))
}
