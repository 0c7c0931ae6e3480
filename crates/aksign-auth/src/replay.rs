//! Nonce replay tracking for the verifier.
//!
//! A nonce is remembered per access key until an expiry chosen by the caller.
//! While it is remembered, a second request carrying the same (access key,
//! nonce) pair is rejected. The verifier picks an expiry no earlier than the
//! end of the request's timestamp window, so a nonce is never forgotten while
//! its request could still pass the freshness check.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

/// Records which (access key, nonce) pairs have been seen.
pub trait ReplayCache: Send + Sync {
    /// Record the pair and report whether it was fresh.
    ///
    /// Returns `false` if the pair was already recorded and has not yet expired
    /// at `now`; otherwise records it until `expires_at` (exclusive) and
    /// returns `true`.
    fn check_and_record(&self, access_key: &str, nonce: &str, now: i64, expires_at: i64) -> bool;
}

/// Concurrent in-memory replay cache.
///
/// Keys are `(access_key, nonce)`, values the Unix second the entry expires.
#[derive(Debug, Default)]
pub struct InMemoryReplayCache {
    entries: DashMap<(String, String), i64>,
}

impl InMemoryReplayCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked entries, expired ones included until purged.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry that has expired at `now`, returning how many were removed.
    pub fn purge_expired(&self, now: i64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, expires_at| *expires_at > now);
        before.saturating_sub(self.entries.len())
    }
}

impl ReplayCache for InMemoryReplayCache {
    fn check_and_record(&self, access_key: &str, nonce: &str, now: i64, expires_at: i64) -> bool {
        match self
            .entries
            .entry((access_key.to_owned(), nonce.to_owned()))
        {
            Entry::Occupied(mut entry) => {
                if *entry.get() > now {
                    return false;
                }
                entry.insert(expires_at);
                true
            }
            Entry::Vacant(entry) => {
                entry.insert(expires_at);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_reject_repeated_nonce_before_expiry() {
        let cache = InMemoryReplayCache::new();
        assert!(cache.check_and_record("AK1", "n1", 1000, 1300));
        assert!(!cache.check_and_record("AK1", "n1", 1299, 1300));
    }

    #[test]
    fn test_should_accept_nonce_again_after_expiry() {
        let cache = InMemoryReplayCache::new();
        assert!(cache.check_and_record("AK1", "n1", 1000, 1300));
        assert!(cache.check_and_record("AK1", "n1", 1300, 1600));
    }

    #[test]
    fn test_should_scope_nonces_per_access_key() {
        let cache = InMemoryReplayCache::new();
        assert!(cache.check_and_record("AK1", "n1", 1000, 1300));
        assert!(cache.check_and_record("AK2", "n1", 1000, 1300));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_should_not_confuse_keys_containing_separator() {
        let cache = InMemoryReplayCache::new();
        assert!(cache.check_and_record("a:b", "c", 1000, 1300));
        assert!(cache.check_and_record("a", "b:c", 1000, 1300));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_should_purge_expired_entries() {
        let cache = InMemoryReplayCache::new();
        cache.check_and_record("AK1", "old", 0, 10);
        cache.check_and_record("AK1", "new", 100, 110);

        assert_eq!(cache.purge_expired(50), 1);
        assert_eq!(cache.len(), 1);
        assert!(!cache.check_and_record("AK1", "new", 105, 115));
    }
}
