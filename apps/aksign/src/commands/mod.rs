//! Subcommand implementations.
//!
//! Each command returns its rendered output so `main` owns all printing.

pub mod keygen;
pub mod sign;
pub mod string_to_sign;
pub mod verify;

use aksign_auth::{NonceGenerator, RandomPolicy};
use aksign_core::AkSignConfig;

/// Nonce generator honouring the configured weak-randomness policy.
fn nonce_generator(config: &AkSignConfig) -> NonceGenerator {
    NonceGenerator::for_policy(RandomPolicy::from_flag(config.allow_weak_nonce))
}
