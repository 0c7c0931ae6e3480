//! Keygen command implementation.

use aksign_auth::generate_key_pair;
use aksign_core::{ADMIN_ACCESS_KEY_ENV, ADMIN_SECRET_KEY_ENV, AkSignConfig};
use anyhow::{Context, Result};
use tracing::info;

use super::nonce_generator;

/// Generate a key pair, rendered as env assignments or JSON.
pub fn run(config: &AkSignConfig, json: bool) -> Result<String> {
    let pair = generate_key_pair(&nonce_generator(config)).context("failed to generate keys")?;
    info!(access_key = %pair.access_key, "Generated key pair");

    if json {
        serde_json::to_string_pretty(&pair).context("failed to render JSON")
    } else {
        Ok(format!(
            "{ADMIN_ACCESS_KEY_ENV}={}\n{ADMIN_SECRET_KEY_ENV}={}",
            pair.access_key,
            pair.secret_key.expose_secret()
        ))
    }
}
