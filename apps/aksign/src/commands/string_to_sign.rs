//! String-to-sign command implementation.

use aksign_auth::{build_admin_sign_string, compute_sign};

/// Render the base string for the triple, followed by its signature when a
/// secret key is supplied.
pub fn run(access_key: &str, timestamp: i64, nonce: &str, secret_key: Option<&str>) -> String {
    let base = build_admin_sign_string(access_key, timestamp, nonce);
    match secret_key {
        Some(sk) => {
            let sign = compute_sign(&base, sk);
            format!("{base}\nsign={sign}")
        }
        None => base,
    }
}
