//! HMAC-SHA256 access-key / secret-key request signing for AKSign.
//!
//! Privileged admin calls carry four extra query parameters next to their
//! business parameters: `accessKey`, `timestamp`, `nonce` and `sign`. The
//! signature covers only the first three, joined as
//! `accessKey=..&nonce=..&timestamp=..`, keyed by the admin secret key.
//!
//! # Usage
//!
//! ```rust
//! use aksign_auth::canonical::ParamValue;
//! use aksign_auth::credentials::{StaticCredentialProvider, StaticCredentialStore};
//! use aksign_auth::signer::{AdminSigner, BusinessParams};
//! use aksign_auth::verify::SignatureVerifier;
//!
//! let signer = AdminSigner::with_store(StaticCredentialStore::admin("AK1", "SK1"));
//! let mut business = BusinessParams::new();
//! business.insert("akList".to_owned(), ParamValue::from("a,b"));
//! let signed = signer.sign(business).unwrap();
//!
//! let verifier = SignatureVerifier::with_provider(StaticCredentialProvider::new(vec![
//!     ("AK1".to_owned(), "SK1".to_owned()),
//! ]));
//! let verified = verifier.verify_query(&signed.to_query_string()).unwrap();
//! assert_eq!(verified.access_key, "AK1");
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Sign string construction and HMAC-SHA256 signing
//! - [`clock`] - Wall-clock abstraction
//! - [`credentials`] - Credential stores (signer side) and providers (verifier side)
//! - [`error`] - Authentication error types
//! - [`keys`] - Access key / secret key pair generation
//! - [`nonce`] - Random sources and nonce generation
//! - [`replay`] - Nonce replay cache
//! - [`signer`] - Admin request signing
//! - [`verify`] - Signature verification

pub mod canonical;
pub mod clock;
pub mod credentials;
pub mod error;
pub mod keys;
pub mod nonce;
pub mod replay;
pub mod signer;
pub mod verify;

pub use aksign_core::{AccessKey, SecretKey};
pub use canonical::{ParamValue, build_admin_sign_string, build_sign_string, compute_sign};
pub use clock::{Clock, FixedClock, SystemClock};
pub use credentials::{
    Credential, CredentialProvider, CredentialStore, EnvCredentialStore, KeyStatus,
    PermissionLevel, StaticCredentialProvider, StaticCredentialStore,
};
pub use error::AuthError;
pub use keys::{KeyPair, generate_access_key, generate_key_pair, generate_secret_key};
pub use nonce::{NonceGenerator, RandomPolicy};
pub use replay::{InMemoryReplayCache, ReplayCache};
pub use signer::{AdminSigner, BusinessParams, SignatureFields, SignedRequest};
pub use verify::{SignatureVerifier, VerifiedRequest, VerifierConfig};
