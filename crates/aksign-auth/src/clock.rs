//! Wall-clock abstraction.
//!
//! Both the signer and the verifier read time through [`Clock`] so tests can
//! pin or advance it.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Source of the current Unix time in whole seconds.
pub trait Clock: Send + Sync {
    /// Current Unix time in seconds.
    fn now_unix_secs(&self) -> i64;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_unix_secs(&self) -> i64 {
        (**self).now_unix_secs()
    }
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix_secs(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// A manually driven clock.
///
/// # Examples
///
/// ```
/// use aksign_auth::clock::{Clock, FixedClock};
///
/// let clock = FixedClock::new(1_700_000_000);
/// clock.advance(30);
/// assert_eq!(clock.now_unix_secs(), 1_700_000_030);
/// ```
#[derive(Debug, Default)]
pub struct FixedClock {
    secs: AtomicI64,
}

impl FixedClock {
    /// Create a clock frozen at `secs`.
    #[must_use]
    pub fn new(secs: i64) -> Self {
        Self {
            secs: AtomicI64::new(secs),
        }
    }

    /// Move the clock to `secs`.
    pub fn set(&self, secs: i64) {
        self.secs.store(secs, Ordering::SeqCst);
    }

    /// Move the clock forward (or backward, for negative `delta`).
    pub fn advance(&self, delta: i64) {
        self.secs.fetch_add(delta, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_unix_secs(&self) -> i64 {
        self.secs.load(Ordering::SeqCst)
    }
}
