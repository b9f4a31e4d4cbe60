use std::time::Duration;

use async_trait::async_trait;
use finquote_core::{FinquoteError, HttpRequest, HttpResponse, HttpTransport};

/// Browser user agent sent by default; the provider rejects unknown agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// [`HttpTransport`] backed by a `reqwest::Client`.
///
/// Cookies are not stored by the client; the credential store attaches the
/// session cookie explicitly.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a client with the given user agent and optional request timeout.
    ///
    /// # Errors
    /// Returns `Transport` if the underlying client cannot be constructed.
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> Result<Self, FinquoteError> {
        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder
            .build()
            .map_err(|e| FinquoteError::Transport(format!("building http client: {e}")))?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, FinquoteError> {
        let mut rb = self.client.get(&request.url);
        if !request.query.is_empty() {
            rb = rb.query(&request.query);
        }
        for (name, value) in &request.headers {
            rb = rb.header(name.as_str(), value.as_str());
        }

        let resp = rb
            .send()
            .await
            .map_err(|e| FinquoteError::Transport(format!("GET {}: {e}", request.url)))?;

        let status = resp.status().as_u16();
        let headers = header_pairs(resp.headers());
        let body = resp
            .text()
            .await
            .map_err(|e| FinquoteError::Transport(format!("reading body of {}: {e}", request.url)))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Every header in wire order. Values that are not visible ASCII are kept,
/// decoded lossily, so the first `Set-Cookie` stays first.
fn header_pairs(headers: &reqwest::header::HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(k, v)| {
            (
                k.as_str().to_string(),
                String::from_utf8_lossy(v.as_bytes()).into_owned(),
            )
        })
        .collect()
}
