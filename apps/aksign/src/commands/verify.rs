//! Verify command implementation.

use aksign_auth::credentials::resolve_admin_credentials;
use aksign_auth::{
    Clock, FixedClock, InMemoryReplayCache, SignatureVerifier, StaticCredentialProvider,
    StaticCredentialStore, SystemClock, VerifierConfig,
};
use aksign_core::AkSignConfig;
use anyhow::{Context, Result};
use serde_json::json;

/// Verify `query` as an admin request against the admin credentials from
/// `config`, as of `now` (defaults to the current time).
pub fn run(config: &AkSignConfig, query: &str, now: Option<i64>, json: bool) -> Result<String> {
    resolve_admin_credentials(&StaticCredentialStore::from_config(config))
        .context("admin credentials are required to verify")?;

    let verifier = SignatureVerifier::new(
        StaticCredentialProvider::from_config(config),
        FixedClock::new(now.unwrap_or_else(|| SystemClock.now_unix_secs())),
        InMemoryReplayCache::new(),
        VerifierConfig::from(config),
    );

    let verified = verifier
        .verify_admin_query(query.trim_start_matches('?'))
        .context("signature verification failed")?;

    if json {
        let value = json!({
            "valid": true,
            "accessKey": verified.access_key,
            "timestamp": verified.timestamp,
            "nonce": verified.nonce,
        });
        serde_json::to_string_pretty(&value).context("failed to render JSON")
    } else {
        Ok(format!(
            "OK accessKey={} timestamp={} nonce={}",
            verified.access_key, verified.timestamp, verified.nonce
        ))
    }
}
