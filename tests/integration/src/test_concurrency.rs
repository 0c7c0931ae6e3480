//! Shared signer and verifier across threads.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    use aksign_auth::BusinessParams;

    use crate::{admin_signer, admin_verifier, shared_clock};

    #[test]
    fn test_should_sign_and_verify_from_many_threads() {
        let clock = shared_clock();
        let signer = Arc::new(admin_signer(&clock));
        let verifier = Arc::new(admin_verifier(&clock));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let signer = Arc::clone(&signer);
                let verifier = Arc::clone(&verifier);
                thread::spawn(move || {
                    (0..25)
                        .map(|_| {
                            let signed = signer.sign(BusinessParams::new()).unwrap();
                            verifier.verify_query(&signed.to_query_string()).unwrap();
                            signed.signature.nonce
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let nonces: HashSet<String> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        assert_eq!(nonces.len(), 200);
        assert_eq!(verifier.replay_cache().len(), 200);
    }
}
