//! Replay protection integration tests.

#[cfg(test)]
mod tests {
    use aksign_auth::{AuthError, BusinessParams};

    use crate::{START_TIME, admin_signer, admin_verifier, shared_clock};

    #[test]
    fn test_should_reject_replayed_request() {
        let clock = shared_clock();
        let signer = admin_signer(&clock);
        let verifier = admin_verifier(&clock);

        let query = signer.sign(BusinessParams::new()).unwrap().to_query_string();
        assert!(verifier.verify_query(&query).is_ok());

        clock.advance(5);
        let replay = verifier.verify_query(&query);
        assert!(matches!(replay, Err(AuthError::NonceReused)));
    }

    #[test]
    fn test_should_accept_consecutive_fresh_requests() {
        let clock = shared_clock();
        let signer = admin_signer(&clock);
        let verifier = admin_verifier(&clock);

        for _ in 0..20 {
            let query = signer.sign(BusinessParams::new()).unwrap().to_query_string();
            assert!(verifier.verify_query(&query).is_ok());
            clock.advance(1);
        }
        assert_eq!(verifier.replay_cache().len(), 20);
    }

    #[test]
    fn test_should_reject_replay_until_timestamp_leaves_window() {
        let clock = shared_clock();
        let signer = admin_signer(&clock);
        let verifier = admin_verifier(&clock);

        let query = signer.sign(BusinessParams::new()).unwrap().to_query_string();
        assert!(verifier.verify_query(&query).is_ok());

        clock.set(START_TIME + 300);
        let replay = verifier.verify_query(&query);
        assert!(matches!(replay, Err(AuthError::NonceReused)));

        clock.set(START_TIME + 301);
        let replay = verifier.verify_query(&query);
        assert!(matches!(replay, Err(AuthError::TimestampExpired)));
    }

    #[test]
    fn test_should_reject_replay_of_request_signed_ahead_of_verifier() {
        let signer_clock = shared_clock();
        let verifier_clock = shared_clock();
        verifier_clock.set(START_TIME - 290);
        let signer = admin_signer(&signer_clock);
        let verifier = admin_verifier(&verifier_clock);

        let query = signer.sign(BusinessParams::new()).unwrap().to_query_string();
        assert!(verifier.verify_query(&query).is_ok());

        verifier_clock.set(START_TIME + 100);
        let replay = verifier.verify_query(&query);
        assert!(matches!(replay, Err(AuthError::NonceReused)));
    }

    #[test]
    fn test_should_purge_nonces_after_ttl() {
        let clock = shared_clock();
        let verifier = admin_verifier(&clock);

        let query = admin_signer(&clock)
            .sign(BusinessParams::new())
            .unwrap()
            .to_query_string();
        verifier.verify_query(&query).unwrap();

        clock.advance(300);
        assert_eq!(verifier.replay_cache().purge_expired(START_TIME + 300), 0);
        assert_eq!(verifier.replay_cache().purge_expired(START_TIME + 301), 1);
        assert!(verifier.replay_cache().is_empty());
    }
}
