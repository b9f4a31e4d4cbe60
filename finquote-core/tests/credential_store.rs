use std::sync::Arc;
use std::time::Duration;

use finquote_core::{
    AuthStage, CredentialState, CredentialStore, Endpoints, FinquoteError, HttpResponse,
};
use finquote_mock::MockTransport;

fn endpoints() -> Endpoints {
    Endpoints::with_base_url("http://provider.test")
}

fn store(mock: &MockTransport) -> CredentialStore {
    CredentialStore::new(Arc::new(mock.clone()), endpoints())
}

#[tokio::test]
async fn lazy_read_runs_handshake_once() {
    let ep = endpoints();
    let mock = MockTransport::provider(&ep);
    let store = store(&mock);
    assert_eq!(store.state(), CredentialState::Empty);
    assert_eq!(store.snapshot(), None);

    assert_eq!(store.cookie().await.unwrap(), "B=session-1");
    assert_eq!(store.crumb().await.unwrap(), "crumb-1");
    let cred = store.credential().await.unwrap();
    assert_eq!(cred.cookie, "B=session-1");
    assert_eq!(cred.crumb, "crumb-1");
    assert_eq!(store.state(), CredentialState::Ready);

    assert_eq!(mock.urls(), vec![ep.cookie_url.clone(), ep.crumb_url.clone()]);
}

#[tokio::test]
async fn crumb_request_carries_cookie() {
    let ep = endpoints();
    let mock = MockTransport::provider(&ep);
    let store = store(&mock);
    store.refresh().await.unwrap();

    let calls = mock.calls();
    assert_eq!(calls[0].header_value("cookie"), None);
    assert_eq!(calls[1].url, ep.crumb_url);
    assert_eq!(calls[1].header_value("Cookie"), Some("B=session-1"));
}

#[tokio::test]
async fn refresh_replaces_both_values() {
    let mock = MockTransport::provider(&endpoints());
    let store = store(&mock);
    store.refresh().await.unwrap();
    store.refresh().await.unwrap();
    let cred = store.snapshot().unwrap();
    assert_eq!(cred.cookie, "B=session-2");
    assert_eq!(cred.crumb, "crumb-2");
    assert!(!cred.cookie.is_empty() && !cred.crumb.is_empty());
}

#[tokio::test]
async fn concurrent_refreshes_do_not_interleave() {
    let ep = endpoints();
    let mock = MockTransport::provider(&ep).with_latency(Duration::from_millis(5));
    let store = Arc::new(store(&mock));

    let tasks: Vec<_> = (0..4)
        .map(|_| {
            let s = Arc::clone(&store);
            tokio::spawn(async move { s.refresh().await })
        })
        .collect();
    for r in futures::future::join_all(tasks).await {
        r.unwrap().unwrap();
    }

    let urls = mock.urls();
    assert_eq!(urls.len(), 8);
    for pair in urls.chunks(2) {
        assert_eq!(pair, [ep.cookie_url.clone(), ep.crumb_url.clone()]);
    }
    assert_eq!(store.snapshot().unwrap().crumb, "crumb-4");
}

#[tokio::test]
async fn concurrent_lazy_reads_share_one_handshake() {
    let ep = endpoints();
    let mock = MockTransport::provider(&ep).with_latency(Duration::from_millis(5));
    let store = Arc::new(store(&mock));

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let s = Arc::clone(&store);
            tokio::spawn(async move { s.credential().await })
        })
        .collect();
    for r in futures::future::join_all(tasks).await {
        assert_eq!(r.unwrap().unwrap().crumb, "crumb-1");
    }
    assert_eq!(mock.count(&ep.cookie_url), 1);
    assert_eq!(mock.count(&ep.crumb_url), 1);
}

#[tokio::test]
async fn missing_set_cookie_is_cookie_auth_error() {
    let ep = endpoints();
    let mock = MockTransport::new().respond(ep.cookie_url.clone(), HttpResponse::new(404));
    let store = store(&mock);

    let err = store.cookie().await.unwrap_err();
    assert!(
        matches!(err, FinquoteError::Auth { stage: AuthStage::Cookie, .. }),
        "{err:?}"
    );
    assert_eq!(store.state(), CredentialState::Empty);
    // The crumb step never ran.
    assert_eq!(mock.count(&ep.crumb_url), 0);
}

#[tokio::test]
async fn empty_set_cookie_is_cookie_auth_error() {
    let ep = endpoints();
    let mock = MockTransport::new().respond(
        ep.cookie_url.clone(),
        HttpResponse::new(200).with_header("Set-Cookie", ""),
    );
    let err = store(&mock).refresh().await.unwrap_err();
    assert!(matches!(err, FinquoteError::Auth { stage: AuthStage::Cookie, .. }));
}

#[tokio::test]
async fn empty_crumb_leaves_cookie_only() {
    let ep = endpoints();
    let mock = MockTransport::new()
        .respond(
            ep.cookie_url.clone(),
            HttpResponse::new(404).with_header("set-cookie", "A1=abc; Path=/"),
        )
        .respond(ep.crumb_url.clone(), HttpResponse::new(200).with_body("  \n"));
    let store = store(&mock);

    let err = store.crumb().await.unwrap_err();
    assert!(matches!(err, FinquoteError::Auth { stage: AuthStage::Crumb, .. }));
    assert_eq!(store.state(), CredentialState::CookieOnly);
    assert_eq!(store.snapshot(), None);
    // The cookie step succeeded, so a cookie read does not refresh again.
    assert_eq!(store.cookie().await.unwrap(), "A1=abc");
    assert_eq!(mock.count(&ep.cookie_url), 1);
}

#[tokio::test]
async fn rejected_crumb_status_is_crumb_auth_error() {
    let ep = endpoints();
    let mock = MockTransport::new()
        .respond(
            ep.cookie_url.clone(),
            HttpResponse::new(404).with_header("Set-Cookie", "A1=abc"),
        )
        .respond(ep.crumb_url.clone(), HttpResponse::new(429).with_body("Too Many Requests"));
    let err = store(&mock).refresh().await.unwrap_err();
    assert!(
        matches!(&err, FinquoteError::Auth { stage: AuthStage::Crumb, detail } if detail.contains("429")),
        "{err:?}"
    );
}

#[tokio::test]
async fn crumb_is_trimmed() {
    let ep = endpoints();
    let mock = MockTransport::new()
        .respond(
            ep.cookie_url.clone(),
            HttpResponse::new(404).with_header("Set-Cookie", "A1=abc"),
        )
        .respond(ep.crumb_url.clone(), HttpResponse::new(200).with_body(" xYz/1.a \n"));
    assert_eq!(store(&mock).crumb().await.unwrap(), "xYz/1.a");
}

#[tokio::test]
async fn failed_refresh_keeps_previous_pair() {
    let ep = endpoints();
    let mock = MockTransport::provider(&ep);
    let store = store(&mock);
    store.refresh().await.unwrap();

    // From now on the cookie endpoint stops setting cookies.
    let _ = mock.clone().respond(ep.cookie_url.clone(), HttpResponse::new(404));
    assert!(store.refresh().await.is_err());

    let cred = store.snapshot().unwrap();
    assert_eq!(cred.cookie, "B=session-1");
    assert_eq!(cred.crumb, "crumb-1");
}

#[tokio::test]
async fn failed_crumb_keeps_previous_pair() {
    let ep = endpoints();
    let mock = MockTransport::provider(&ep);
    let store = store(&mock);
    store.refresh().await.unwrap();

    // The cookie endpoint keeps issuing new sessions; the crumb endpoint breaks.
    let _ = mock.clone().respond(ep.crumb_url.clone(), HttpResponse::new(500));
    let err = store.refresh().await.unwrap_err();
    assert!(
        matches!(&err, FinquoteError::Auth { stage: AuthStage::Crumb, detail } if detail.contains("500")),
        "{err:?}"
    );
    assert_eq!(mock.count(&ep.cookie_url), 2);

    assert_eq!(store.state(), CredentialState::Ready);
    let cred = store.credential().await.unwrap();
    assert_eq!(cred.cookie, "B=session-1");
    assert_eq!(cred.crumb, "crumb-1");
}

#[tokio::test]
async fn crumb_only_refresh_needs_a_cookie() {
    let ep = endpoints();
    let mock = MockTransport::provider(&ep);
    let store = store(&mock);

    let err = store.refresh_crumb().await.unwrap_err();
    assert!(matches!(err, FinquoteError::Auth { stage: AuthStage::MissingCookie, .. }));
    assert!(mock.calls().is_empty());

    store.refresh().await.unwrap();
    store.refresh_crumb().await.unwrap();
    let cred = store.snapshot().unwrap();
    assert_eq!(cred.cookie, "B=session-1");
    assert_eq!(cred.crumb, "crumb-2");
}

#[tokio::test]
async fn transport_failure_propagates() {
    let ep = endpoints();
    let mock =
        MockTransport::new().fail(ep.cookie_url.clone(), FinquoteError::Transport("refused".into()));
    let err = store(&mock).credential().await.unwrap_err();
    assert_eq!(err, FinquoteError::Transport("refused".into()));
}
