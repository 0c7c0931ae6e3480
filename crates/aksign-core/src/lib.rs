//! Core types, configuration, and errors for AKSign.
//!
//! This crate provides the building blocks shared by the signing library and
//! the command-line tool: environment-driven configuration and the access
//! key / secret key newtypes.

mod config;
mod error;
mod types;

pub use config::{
    ADMIN_ACCESS_KEY_ENV, ADMIN_SECRET_KEY_ENV, AkSignConfig, DEFAULT_NONCE_TTL_SECS,
    DEFAULT_TIMESTAMP_TOLERANCE_SECS,
};
pub use error::{AkSignError, AkSignResult};
pub use types::{AccessKey, SecretKey};
