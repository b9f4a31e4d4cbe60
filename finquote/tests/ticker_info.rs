use std::sync::Arc;

use finquote::{Endpoints, Finquote, FinquoteError, HttpResponse, SummaryModule};
use finquote_mock::MockTransport;
use rust_decimal::Decimal;

fn setup() -> (Finquote, MockTransport) {
    let ep = Endpoints::with_base_url("http://provider.test");
    let mock = MockTransport::provider(&ep);
    let client = Finquote::builder()
        .endpoints(ep)
        .transport(Arc::new(mock.clone()))
        .build()
        .unwrap();
    (client, mock)
}

#[tokio::test]
async fn default_modules_and_flattened_fields() {
    let (client, mock) = setup();
    let info = client.ticker("AAPL").info().await.unwrap();

    let call = mock.calls().pop().unwrap();
    assert_eq!(
        call.query_value("modules"),
        Some("summaryDetail,summaryProfile,financialData,defaultKeyStatistics,price,assetProfile")
    );
    assert_eq!(call.query_value("crumb"), Some("crumb-1"));
    assert_eq!(call.header_value("cookie"), Some("B=session-1"));

    assert_eq!(info.symbol(), Some("AAPL"));
    assert_eq!(info.market_cap(), Some(Decimal::from(2_500_000_000_000_i64)));
    assert_eq!(info.get_str("financialCurrency"), Some("USD"));
}

#[tokio::test]
async fn custom_modules_are_joined_in_order() {
    let (client, mock) = setup();
    client
        .ticker("AAPL")
        .info_with(&[SummaryModule::Price, SummaryModule::CalendarEvents])
        .await
        .unwrap();
    let call = mock.calls().pop().unwrap();
    assert_eq!(call.query_value("modules"), Some("price,calendarEvents"));
}

#[tokio::test]
async fn no_modules_is_invalid_arg() {
    let (client, mock) = setup();
    let err = client.ticker("AAPL").info_with(&[]).await.unwrap_err();
    assert!(matches!(err, FinquoteError::InvalidArg(_)));
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn not_found_is_api_error() {
    let (client, _) = setup();
    let err = client.ticker("MISSING").info().await.unwrap_err();
    assert_eq!(
        err,
        FinquoteError::api("Not Found", "Quote not found for symbol: MISSING")
    );
}

#[tokio::test]
async fn empty_result_list_is_empty_result() {
    let ep = Endpoints::with_base_url("http://provider.test");
    let mock = MockTransport::provider(&ep).respond(
        ep.quote_summary_url_for("AAPL").unwrap(),
        HttpResponse::new(200).with_body(r#"{"quoteSummary":{"result":[],"error":null}}"#),
    );
    let client = Finquote::builder()
        .endpoints(ep)
        .transport(Arc::new(mock))
        .build()
        .unwrap();
    let err = client.ticker("AAPL").info().await.unwrap_err();
    assert!(matches!(err, FinquoteError::EmptyResult { .. }), "{err:?}");
}

#[tokio::test]
async fn null_body_is_empty_response() {
    let ep = Endpoints::with_base_url("http://provider.test");
    let mock = MockTransport::provider(&ep).respond(
        ep.quote_summary_url_for("AAPL").unwrap(),
        HttpResponse::new(200).with_body("null"),
    );
    let client = Finquote::builder()
        .endpoints(ep)
        .transport(Arc::new(mock))
        .build()
        .unwrap();
    let err = client.ticker("AAPL").info().await.unwrap_err();
    assert!(matches!(err, FinquoteError::EmptyResponse { .. }), "{err:?}");
}

#[tokio::test]
async fn forbidden_without_envelope_is_auth_rejection() {
    let ep = Endpoints::with_base_url("http://provider.test");
    let mock = MockTransport::provider(&ep).respond(
        ep.quote_summary_url_for("AAPL").unwrap(),
        HttpResponse::new(403),
    );
    let client = Finquote::builder()
        .endpoints(ep)
        .transport(Arc::new(mock))
        .build()
        .unwrap();
    let err = client.ticker("AAPL").info().await.unwrap_err();
    assert!(err.is_auth_rejection(), "{err:?}");
}

#[tokio::test]
async fn builder_rejects_unparsable_cookie_url() {
    let err = Finquote::builder()
        .endpoints(Endpoints::default().with_cookie_url("not a url"))
        .transport(Arc::new(MockTransport::new()))
        .build()
        .unwrap_err();
    assert!(matches!(err, FinquoteError::InvalidArg(_)));
}

#[tokio::test]
async fn shared_store_across_clients() {
    let ep = Endpoints::with_base_url("http://provider.test");
    let mock = MockTransport::provider(&ep);
    let first = Finquote::builder()
        .endpoints(ep.clone())
        .transport(Arc::new(mock.clone()))
        .build()
        .unwrap();
    let second = Finquote::builder()
        .endpoints(ep.clone())
        .transport(Arc::new(mock.clone()))
        .credentials(Arc::clone(first.credentials()))
        .build()
        .unwrap();

    first.ticker("AAPL").info().await.unwrap();
    second.ticker("AAPL").history().await.unwrap();
    assert_eq!(mock.count(&ep.cookie_url), 1);
    assert!(Arc::ptr_eq(first.credentials(), second.credentials()));
}
