//! Nonce generation.
//!
//! A nonce is [`NONCE_LENGTH`] characters drawn independently and uniformly from
//! the 62-character alphabet `A-Za-z0-9`. Random bytes come from a pluggable
//! [`RandomSource`]; each byte below 248 (the largest multiple of 62 that fits
//! in a byte) maps to `ALPHABET[byte % 62]`, larger bytes are discarded, so no
//! character is favoured.
//!
//! Whether a non-cryptographic source may be used at all is governed by
//! [`RandomPolicy`].

use std::fmt;

use chrono::Utc;
use parking_lot::Mutex;
use rand::rngs::SmallRng;
use rand::{RngExt, SeedableRng};
use tracing::warn;

use crate::error::AuthError;

/// Length of every generated nonce.
pub const NONCE_LENGTH: usize = 16;

/// Characters a nonce (and generated keys) may contain.
pub const NONCE_ALPHABET: &[u8; 62] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Bytes at or above this bound are rejected to avoid modulo bias.
const ACCEPT_BOUND: u8 = 248;

/// A source of random bytes.
pub trait RandomSource: Send + fmt::Debug {
    /// Fill `dest` with random bytes.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::CryptoUnavailable`] if the source cannot produce bytes.
    fn try_fill(&mut self, dest: &mut [u8]) -> Result<(), AuthError>;

    /// Whether the bytes are suitable for security-sensitive use.
    fn is_secure(&self) -> bool;
}

/// Cryptographically secure randomness: the thread-local CSPRNG, seeded from OS entropy.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecureRandom;

impl RandomSource for SecureRandom {
    fn try_fill(&mut self, dest: &mut [u8]) -> Result<(), AuthError> {
        let mut rng = rand::rng();
        rng.fill(dest);
        Ok(())
    }

    fn is_secure(&self) -> bool {
        true
    }
}

/// Non-cryptographic randomness seeded from the wall clock.
///
/// Only ever used when [`RandomPolicy::AllowWeak`] is in effect.
#[derive(Debug, Clone)]
pub struct WeakRandom {
    rng: SmallRng,
}

impl WeakRandom {
    /// Seed from the current time in nanoseconds.
    #[must_use]
    pub fn from_clock() -> Self {
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        Self::seeded(u64::from_ne_bytes(nanos.to_ne_bytes()))
    }

    /// Seed explicitly.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for WeakRandom {
    fn try_fill(&mut self, dest: &mut [u8]) -> Result<(), AuthError> {
        self.rng.fill(dest);
        Ok(())
    }

    fn is_secure(&self) -> bool {
        false
    }
}

/// Tries `primary` first and switches to `fallback` when it fails.
#[derive(Debug)]
pub struct FallbackRandom<P, F> {
    primary: P,
    fallback: F,
}

impl<P, F> FallbackRandom<P, F> {
    /// Combine a primary and a fallback source.
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P: RandomSource, F: RandomSource> RandomSource for FallbackRandom<P, F> {
    fn try_fill(&mut self, dest: &mut [u8]) -> Result<(), AuthError> {
        match self.primary.try_fill(dest) {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(error = %e, "primary random source failed, using fallback");
                self.fallback.try_fill(dest)
            }
        }
    }

    fn is_secure(&self) -> bool {
        self.primary.is_secure() && self.fallback.is_secure()
    }
}

/// Whether a non-cryptographic random source is acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RandomPolicy {
    /// Refuse to generate from a source that is not secure.
    #[default]
    RequireSecure,
    /// Accept a weaker source.
    AllowWeak,
}

impl RandomPolicy {
    /// `AllowWeak` when `allow_weak` is set, `RequireSecure` otherwise.
    #[must_use]
    pub fn from_flag(allow_weak: bool) -> Self {
        if allow_weak {
            Self::AllowWeak
        } else {
            Self::RequireSecure
        }
    }
}

/// Draws alphanumeric strings from a [`RandomSource`].
///
/// The source sits behind a mutex so a single generator can be shared by
/// concurrent signers.
#[derive(Debug)]
pub struct NonceGenerator {
    source: Mutex<Box<dyn RandomSource>>,
    policy: RandomPolicy,
}

impl Default for NonceGenerator {
    fn default() -> Self {
        Self::secure()
    }
}

impl NonceGenerator {
    /// Create a generator over an arbitrary source.
    pub fn new(source: impl RandomSource + 'static, policy: RandomPolicy) -> Self {
        Self {
            source: Mutex::new(Box::new(source)),
            policy,
        }
    }

    /// Secure source, secure policy.
    #[must_use]
    pub fn secure() -> Self {
        Self::new(SecureRandom, RandomPolicy::RequireSecure)
    }

    /// Pick the source matching `policy`: plain secure randomness, or secure
    /// randomness with a clock-seeded fallback when weak randomness is allowed.
    #[must_use]
    pub fn for_policy(policy: RandomPolicy) -> Self {
        match policy {
            RandomPolicy::RequireSecure => Self::secure(),
            RandomPolicy::AllowWeak => Self::new(
                FallbackRandom::new(SecureRandom, WeakRandom::from_clock()),
                policy,
            ),
        }
    }

    /// The policy this generator enforces.
    #[must_use]
    pub fn policy(&self) -> RandomPolicy {
        self.policy
    }

    /// Generate a [`NONCE_LENGTH`]-character nonce.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::CryptoUnavailable`] if the source fails or is not
    /// secure while [`RandomPolicy::RequireSecure`] is in effect.
    pub fn generate(&self) -> Result<String, AuthError> {
        self.generate_with_length(NONCE_LENGTH)
    }

    /// Generate an alphanumeric string of `len` characters.
    ///
    /// # Errors
    ///
    /// Same as [`NonceGenerator::generate`].
    pub fn generate_with_length(&self, len: usize) -> Result<String, AuthError> {
        let mut source = self.source.lock();

        if self.policy == RandomPolicy::RequireSecure && !source.is_secure() {
            return Err(AuthError::CryptoUnavailable(
                "secure random source required for nonce generation".to_owned(),
            ));
        }

        let mut out = String::with_capacity(len);
        let mut buf = [0u8; 32];
        while out.len() < len {
            source.try_fill(&mut buf)?;
            for &byte in buf.iter().filter(|b| **b < ACCEPT_BOUND) {
                out.push(char::from(NONCE_ALPHABET[usize::from(byte % 62)]));
                if out.len() == len {
                    break;
                }
            }
        }

        Ok(out)
    }
}
