use std::str::FromStr;

use finquote::{
    ChartRequest, Endpoints, Finquote, FinquoteError, HttpRequest, HttpTransport,
    ReqwestTransport,
};
use finquote_mock::fixtures;
use httpmock::prelude::*;
use rust_decimal::Decimal;

fn client_for(server: &MockServer) -> Finquote {
    Finquote::builder()
        .endpoints(Endpoints::with_base_url(server.base_url()))
        .build()
        .unwrap()
}

#[tokio::test]
async fn end_to_end_history_and_info_share_one_handshake() {
    let server = MockServer::start_async().await;

    let cookie = server
        .mock_async(|when, then| {
            when.method(GET).path("/");
            then.status(404)
                .header("set-cookie", "B=e2e-session; Path=/; Domain=.example.test")
                .body("not found");
        })
        .await;
    let crumb = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/test/getcrumb")
                .header("cookie", "B=e2e-session");
            then.status(200).body("e2eCrumb\n");
        })
        .await;
    let chart = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v8/finance/chart/AAPL")
                .query_param("interval", "1d")
                .query_param("range", "1mo")
                .query_param("includePrePost", "false")
                .query_param("events", "div,splits")
                .query_param("crumb", "e2eCrumb")
                .header("cookie", "B=e2e-session");
            then.status(200)
                .header("content-type", "application/json")
                .body(fixtures::CHART_AAPL);
        })
        .await;
    let summary = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v10/finance/quoteSummary/AAPL")
                .query_param(
                    "modules",
                    "summaryDetail,summaryProfile,financialData,defaultKeyStatistics,price,assetProfile",
                )
                .query_param("crumb", "e2eCrumb")
                .header("cookie", "B=e2e-session");
            then.status(200)
                .header("content-type", "application/json")
                .body(fixtures::SUMMARY_AAPL);
        })
        .await;

    let client = client_for(&server);
    let aapl = client.ticker("AAPL");

    let rows = aapl.history().await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].close, Decimal::from(151));

    let info = aapl.info().await.unwrap();
    assert_eq!(info.short_name(), Some("Apple Inc."));
    assert_eq!(info.current_price(), Decimal::from_str("150.25").ok());

    cookie.assert_async().await;
    crumb.assert_async().await;
    chart.assert_async().await;
    summary.assert_async().await;
}

#[tokio::test]
async fn explicit_range_is_sent_as_epoch_seconds() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/");
            then.status(404).header("set-cookie", "B=s");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/test/getcrumb");
            then.status(200).body("c");
        })
        .await;
    let chart = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v8/finance/chart/MSFT")
                .query_param("period1", "1704153600")
                .query_param("period2", "1704412800")
                .query_param("events", "")
                .query_param("includePrePost", "true");
            then.status(200).body(fixtures::CHART_MSFT_ACTIONS);
        })
        .await;

    let start = chrono::DateTime::from_timestamp(1_704_153_600, 0).unwrap();
    let end = chrono::DateTime::from_timestamp(1_704_412_800, 0).unwrap();
    let req = ChartRequest::default()
        .range(start, end)
        .pre_post(true)
        .actions(false);
    let rows = client_for(&server)
        .ticker("MSFT")
        .history_with(&req)
        .await
        .unwrap();

    chart.assert_async().await;
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r.dividends.is_zero()));
}

#[tokio::test]
async fn not_found_envelope_on_404_is_api_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/");
            then.status(404).header("set-cookie", "B=s");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/test/getcrumb");
            then.status(200).body("c");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v8/finance/chart/NOPE");
            then.status(404).body(fixtures::CHART_NOT_FOUND);
        })
        .await;

    let err = client_for(&server)
        .ticker("NOPE")
        .history()
        .await
        .unwrap_err();
    assert!(matches!(err, FinquoteError::Api { ref code, .. } if code == "Not Found"), "{err:?}");
}

#[tokio::test]
async fn transport_reports_status_headers_and_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/echo")
                .query_param("a", "1 2")
                .header("x-test", "yes");
            then.status(418)
                .header("set-cookie", "first=1")
                .body("teapot");
        })
        .await;

    let transport = ReqwestTransport::new("finquote-tests", None).unwrap();
    let resp = transport
        .get(
            HttpRequest::get(server.url("/echo"))
                .query("a", "1 2")
                .header("X-Test", "yes"),
        )
        .await
        .unwrap();
    assert_eq!(resp.status, 418);
    assert!(!resp.is_success());
    assert_eq!(resp.header("Set-Cookie"), Some("first=1"));
    assert_eq!(resp.body, "teapot");
}

#[tokio::test]
async fn connection_failure_is_transport_error() {
    // Nothing listens on port 9 on a test host.
    let transport = ReqwestTransport::new("finquote-tests", None).unwrap();
    let err = transport
        .get(HttpRequest::get("http://127.0.0.1:9/"))
        .await
        .unwrap_err();
    assert!(matches!(err, FinquoteError::Transport(_)), "{err:?}");
}
