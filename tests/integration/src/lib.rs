//! End-to-end tests for AKSign.
//!
//! A signer and a verifier are wired to the same admin credentials and a
//! shared [`FixedClock`], so a request can be signed, carried over a URL and
//! verified entirely in-process.
//!
//! Run them with:
//! ```text
//! cargo test -p aksign-integration
//! ```

use std::sync::{Arc, Once};

use aksign_auth::{
    AdminSigner, Credential, FixedClock, InMemoryReplayCache, NonceGenerator, SecretKey,
    SignatureVerifier, StaticCredentialProvider, StaticCredentialStore, VerifierConfig,
};

static INIT: Once = Once::new();

/// Admin access key shared by signer and verifier.
pub const ADMIN_ACCESS_KEY: &str = "7jxtUmuITH8lC68J";

/// Admin secret key shared by signer and verifier.
pub const ADMIN_SECRET_KEY: &str = "NniZjv7CxqEmBYa0cIxijsPW2dgLHpDZ";

/// Read-only access key known to the verifier.
pub const READER_ACCESS_KEY: &str = "ReaderAccessKey1";

/// Secret key of [`READER_ACCESS_KEY`].
pub const READER_SECRET_KEY: &str = "ReaderSecretKey00000000000000001";

/// Starting time of the shared clock.
pub const START_TIME: i64 = 1_700_000_000;

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// A clock both sides can share and move.
#[must_use]
pub fn shared_clock() -> Arc<FixedClock> {
    init_tracing();
    Arc::new(FixedClock::new(START_TIME))
}

/// Signer holding the admin credentials, reading `clock`.
#[must_use]
pub fn admin_signer(
    clock: &Arc<FixedClock>,
) -> AdminSigner<StaticCredentialStore, Arc<FixedClock>> {
    AdminSigner::new(
        StaticCredentialStore::admin(ADMIN_ACCESS_KEY, ADMIN_SECRET_KEY),
        Arc::clone(clock),
        NonceGenerator::secure(),
    )
}

/// Signer holding the read-only credentials, reading `clock`.
#[must_use]
pub fn reader_signer(
    clock: &Arc<FixedClock>,
) -> AdminSigner<StaticCredentialStore, Arc<FixedClock>> {
    AdminSigner::new(
        StaticCredentialStore::admin(READER_ACCESS_KEY, READER_SECRET_KEY),
        Arc::clone(clock),
        NonceGenerator::secure(),
    )
}

/// Verifier that knows the admin key and the read-only key, reading `clock`.
#[must_use]
pub fn admin_verifier(
    clock: &Arc<FixedClock>,
) -> SignatureVerifier<StaticCredentialProvider, Arc<FixedClock>> {
    let admin_secret = SecretKey::new(ADMIN_SECRET_KEY).expect("admin secret key is not empty");
    SignatureVerifier::new(
        StaticCredentialProvider::new(vec![(
            READER_ACCESS_KEY.to_owned(),
            READER_SECRET_KEY.to_owned(),
        )])
        .with_credential(ADMIN_ACCESS_KEY, Credential::admin(admin_secret)),
        Arc::clone(clock),
        InMemoryReplayCache::new(),
        VerifierConfig::default(),
    )
}

mod test_concurrency;
mod test_replay;
mod test_signing;
