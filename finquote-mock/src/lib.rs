//! Scripted in-memory transport for finquote tests.
//!
//! Requests are routed by exact URL (query string excluded) to closures that
//! build the answer. Every request is recorded before it is routed, so tests
//! can assert on call order and on the parameters the library sent.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use finquote_core::{Endpoints, FinquoteError, HttpRequest, HttpResponse, HttpTransport};

pub mod fixtures;

type Handler = Arc<dyn Fn(&HttpRequest) -> Result<HttpResponse, FinquoteError> + Send + Sync>;

/// In-memory [`HttpTransport`] answering from registered routes.
///
/// Unrouted URLs answer `404` with an empty body.
#[derive(Clone, Default)]
pub struct MockTransport {
    routes: Arc<Mutex<Vec<(String, Handler)>>>,
    calls: Arc<Mutex<Vec<HttpRequest>>>,
    latency: Option<Duration>,
}

impl MockTransport {
    /// A transport with no routes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every answer by `latency`, yielding to the runtime meanwhile.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Answer requests for `url` with `handler`. Later routes for the same URL
    /// take precedence.
    #[must_use]
    pub fn on<F>(self, url: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&HttpRequest) -> Result<HttpResponse, FinquoteError> + Send + Sync + 'static,
    {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(0, (url.into(), Arc::new(handler)));
        self
    }

    /// Answer requests for `url` with a fixed response.
    #[must_use]
    pub fn respond(self, url: impl Into<String>, response: HttpResponse) -> Self {
        self.on(url, move |_| Ok(response.clone()))
    }

    /// Fail requests for `url` with a fixed error.
    #[must_use]
    pub fn fail(self, url: impl Into<String>, error: FinquoteError) -> Self {
        self.on(url, move |_| Err(error.clone()))
    }

    /// A provider that follows the happy-path handshake.
    ///
    /// The cookie endpoint answers `404` with `Set-Cookie: B=session-N; ...`
    /// and the crumb endpoint answers `crumb-N`, where `N` counts calls to
    /// each endpoint from 1. The crumb endpoint answers `401` when the
    /// `Cookie` header is missing. Chart and quote-summary URLs answer with
    /// [`fixtures`] payloads for `AAPL` and `MSFT`, and with the provider's
    /// "Not Found" envelope (status `404`) for `MISSING`.
    #[must_use]
    pub fn provider(endpoints: &Endpoints) -> Self {
        let cookies = Arc::new(AtomicUsize::new(0));
        let crumbs = Arc::new(AtomicUsize::new(0));
        let mut mock = Self::new()
            .on(endpoints.cookie_url.clone(), move |_| {
                let n = cookies.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(HttpResponse::new(404).with_header(
                    "Set-Cookie",
                    format!("B=session-{n}; Expires=Sat, 16 Oct 2027 00:00:00 GMT; Path=/; Domain=.yahoo.com"),
                ))
            })
            .on(endpoints.crumb_url.clone(), move |req| {
                if req.header_value("cookie").is_none() {
                    return Ok(HttpResponse::new(401).with_body("Unauthorized"));
                }
                let n = crumbs.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(HttpResponse::new(200).with_body(format!("crumb-{n}")))
            });

        let charts = [
            ("AAPL", 200, fixtures::CHART_AAPL),
            ("MSFT", 200, fixtures::CHART_MSFT_ACTIONS),
            ("MISSING", 404, fixtures::CHART_NOT_FOUND),
        ];
        for (symbol, status, body) in charts {
            if let Ok(url) = endpoints.chart_url_for(symbol) {
                mock = mock.respond(url, HttpResponse::new(status).with_body(body));
            }
        }
        let summaries = [
            ("AAPL", 200, fixtures::SUMMARY_AAPL),
            ("MISSING", 404, fixtures::SUMMARY_NOT_FOUND),
        ];
        for (symbol, status, body) in summaries {
            if let Ok(url) = endpoints.quote_summary_url_for(symbol) {
                mock = mock.respond(url, HttpResponse::new(status).with_body(body));
            }
        }
        mock
    }

    /// Every request seen so far, in arrival order.
    #[must_use]
    pub fn calls(&self) -> Vec<HttpRequest> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// URLs of every request seen so far, in arrival order.
    #[must_use]
    pub fn urls(&self) -> Vec<String> {
        self.calls().into_iter().map(|r| r.url).collect()
    }

    /// Number of requests seen for `url`.
    #[must_use]
    pub fn count(&self, url: &str) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|r| r.url == url)
            .count()
    }

    fn handler_for(&self, url: &str) -> Option<Handler> {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|(u, _)| u == url)
            .map(|(_, h)| Arc::clone(h))
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, FinquoteError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        match self.handler_for(&request.url) {
            Some(handler) => handler(&request),
            None => Ok(HttpResponse::new(404)),
        }
    }
}
