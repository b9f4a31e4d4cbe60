//! The HTTP seam between the library and the network.
//!
//! The library only ever issues `GET` requests with query parameters and
//! headers, and only ever reads the status, headers, and text body of the
//! answer. Implementations decide everything else (connection pooling, TLS,
//! timeouts).

use async_trait::async_trait;

use crate::FinquoteError;

/// A `GET` request as the library describes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Absolute URL without the query string.
    pub url: String,
    /// Query parameters, in insertion order.
    pub query: Vec<(String, String)>,
    /// Request headers, in insertion order.
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    /// Start a `GET` request for `url`.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
        }
    }

    /// Append a query parameter.
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Append a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// First value of the query parameter `name`.
    #[must_use]
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// First value of the header `name`, compared case-insensitively.
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        first_header(&self.headers, name)
    }
}

/// Status, headers, and text body of an HTTP answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers in wire order; repeated names are kept.
    pub headers: Vec<(String, String)>,
    /// Body decoded as text; empty when the server sent none.
    pub body: String,
}

impl HttpResponse {
    /// An empty response with the given status.
    #[must_use]
    pub const fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    /// Append a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Replace the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// First value of the header `name`, compared case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        first_header(&self.headers, name)
    }

    /// True for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

fn first_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Executes `GET` requests on behalf of the credential store and the ticker.
///
/// Implementations must return `Ok` for every answer the server produced,
/// whatever its status; `Err` is reserved for failures where no answer exists
/// (connect, TLS, timeout), reported as [`FinquoteError::Transport`].
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Perform the request.
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, FinquoteError>;
}
