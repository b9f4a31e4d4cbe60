use finquote_types::{AuthStage, FinquoteError};

#[test]
fn display_includes_provider_code_and_stage() {
    let e = FinquoteError::api("Not Found", "No data found");
    assert_eq!(e.to_string(), "provider error Not Found: No data found");

    let e = FinquoteError::auth(AuthStage::MissingCookie, "no cookie stored");
    assert_eq!(
        e.to_string(),
        "authentication failed at missing-cookie step: no cookie stored"
    );
}

#[test]
fn auth_rejection_is_only_401_or_403() {
    assert!(FinquoteError::status(401, "chart for AAPL").is_auth_rejection());
    assert!(FinquoteError::status(403, "chart for AAPL").is_auth_rejection());
    assert!(!FinquoteError::status(404, "chart for AAPL").is_auth_rejection());
    assert!(!FinquoteError::auth(AuthStage::Crumb, "empty").is_auth_rejection());
}

#[test]
fn errors_roundtrip_through_serde() {
    let e = FinquoteError::auth(AuthStage::Cookie, "no Set-Cookie header");
    let json = serde_json::to_string(&e).expect("serialize error");
    let back: FinquoteError = serde_json::from_str(&json).expect("deserialize error");
    assert_eq!(back, e);
}
