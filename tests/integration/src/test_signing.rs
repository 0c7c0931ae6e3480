//! Sign-then-verify integration tests.

#[cfg(test)]
mod tests {
    use aksign_auth::{
        AuthError, BusinessParams, ParamValue, PermissionLevel, build_admin_sign_string,
        compute_sign,
    };

    use crate::{
        ADMIN_ACCESS_KEY, ADMIN_SECRET_KEY, READER_ACCESS_KEY, admin_signer, admin_verifier,
        reader_signer, shared_clock,
    };

    fn batch_status_params() -> BusinessParams {
        let mut params = BusinessParams::new();
        params.insert("akList".to_owned(), ParamValue::from("ak-1,ak-2"));
        params.insert("operateType".to_owned(), ParamValue::Int(2));
        params.insert("remark".to_owned(), ParamValue::Absent);
        params
    }

    #[test]
    fn test_should_verify_signed_query_string() {
        let clock = shared_clock();
        let signer = admin_signer(&clock);
        let verifier = admin_verifier(&clock);

        let signed = signer.sign(batch_status_params()).unwrap();
        let verified = verifier.verify_query(&signed.to_query_string()).unwrap();

        assert_eq!(verified.access_key, ADMIN_ACCESS_KEY);
        assert_eq!(verified.nonce, signed.signature.nonce);
        assert_eq!(verified.timestamp, signed.signature.timestamp);
    }

    #[test]
    fn test_should_verify_signed_http_request() {
        let clock = shared_clock();
        let signer = admin_signer(&clock);
        let verifier = admin_verifier(&clock);

        let signed = signer.sign(batch_status_params()).unwrap();
        let uri: http::Uri = "http://localhost:8080/user/updateAkStatus?page=1".parse().unwrap();
        let (parts, ()) = http::Request::builder()
            .method("POST")
            .uri(signed.apply_to_uri(&uri).unwrap())
            .body(())
            .unwrap()
            .into_parts();

        let verified = verifier.verify_admin_request(&parts).unwrap();
        assert_eq!(verified.permission, PermissionLevel::Admin);
        assert!(parts.uri.query().unwrap().contains("akList=ak-1%2Cak-2"));
    }

    #[test]
    fn test_should_deny_admin_endpoint_to_read_only_key() {
        let clock = shared_clock();
        let verifier = admin_verifier(&clock);

        let query = reader_signer(&clock)
            .sign(batch_status_params())
            .unwrap()
            .to_query_string();
        let result = verifier.verify_admin_query(&query);
        assert!(matches!(
            result,
            Err(AuthError::PermissionDenied(ak)) if ak == READER_ACCESS_KEY
        ));

        let other = reader_signer(&clock)
            .sign(BusinessParams::new())
            .unwrap()
            .to_query_string();
        let verified = verifier.verify_query(&other).unwrap();
        assert_eq!(verified.permission, PermissionLevel::ReadOnly);
    }

    #[test]
    fn test_should_match_independently_computed_signature() {
        let clock = shared_clock();
        let signed = admin_signer(&clock).sign(BusinessParams::new()).unwrap();

        let base = build_admin_sign_string(
            ADMIN_ACCESS_KEY,
            signed.signature.timestamp,
            &signed.signature.nonce,
        );
        assert_eq!(
            base,
            format!(
                "accessKey={ADMIN_ACCESS_KEY}&nonce={}&timestamp={}",
                signed.signature.nonce, signed.signature.timestamp
            )
        );
        assert_eq!(compute_sign(&base, ADMIN_SECRET_KEY), signed.signature.sign);
    }

    #[test]
    fn test_should_reject_request_after_window() {
        let clock = shared_clock();
        let signed = admin_signer(&clock).sign(BusinessParams::new()).unwrap();

        clock.advance(301);
        let result = admin_verifier(&clock).verify_query(&signed.to_query_string());
        assert!(matches!(result, Err(AuthError::TimestampExpired)));
    }

    #[test]
    fn test_should_reject_modified_signed_field() {
        let clock = shared_clock();
        let signed = admin_signer(&clock).sign(BusinessParams::new()).unwrap();

        let query = signed.to_query_string().replace(
            &format!("timestamp={}", signed.signature.timestamp),
            &format!("timestamp={}", signed.signature.timestamp + 1),
        );
        let result = admin_verifier(&clock).verify_query(&query);
        assert!(matches!(result, Err(AuthError::SignatureDoesNotMatch)));
    }

    #[test]
    fn test_should_export_signed_params_as_json() {
        let clock = shared_clock();
        let signed = admin_signer(&clock).sign(batch_status_params()).unwrap();
        let sign = signed.signature.sign.clone();

        let json = serde_json::to_value(signed.into_params()).unwrap();
        assert_eq!(json["accessKey"], ADMIN_ACCESS_KEY);
        assert_eq!(json["operateType"], 2);
        assert_eq!(json["sign"], sign);
        assert!(json.get("remark").is_none());
    }
}
