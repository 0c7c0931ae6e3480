//! Sign command implementation.

use aksign_auth::{AdminSigner, BusinessParams, ParamValue, StaticCredentialStore, SystemClock};
use aksign_core::AkSignConfig;
use anyhow::{Context, Result};

use super::nonce_generator;

/// Parse a `KEY=VALUE` business parameter. The value may be empty.
pub fn parse_param(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, _)) if key.is_empty() => Err(format!("empty parameter name in `{s}`")),
        Some((key, value)) => Ok((key.to_owned(), value.to_owned())),
        None => Err(format!("expected KEY=VALUE, got `{s}`")),
    }
}

/// Sign `params` with the admin credentials from `config`.
pub fn run(config: &AkSignConfig, params: Vec<(String, String)>, json: bool) -> Result<String> {
    let signer = AdminSigner::new(
        StaticCredentialStore::from_config(config),
        SystemClock,
        nonce_generator(config),
    );

    let business: BusinessParams = params
        .into_iter()
        .map(|(k, v)| (k, ParamValue::Str(v)))
        .collect();

    let signed = signer
        .sign(business)
        .context("failed to sign admin request")?;

    if json {
        serde_json::to_string_pretty(&signed.into_params()).context("failed to render JSON")
    } else {
        Ok(signed.to_query_string())
    }
}
