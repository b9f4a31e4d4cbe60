use std::sync::Arc;

use finquote_core::wire::{ChartEnvelope, ProviderError, SummaryEnvelope};
use finquote_core::{
    ChartRequest, CredentialStore, Endpoints, FinquoteError, HistoryRecord, HttpRequest,
    HttpResponse, HttpTransport, StockInfo, SummaryModule, build_history, flatten_summary,
};
use serde::de::DeserializeOwned;

/// Requests for one symbol, sharing the client's transport and credentials.
///
/// Cheap to create and clone. Each call fetches the current credential
/// (running the handshake if none is cached), issues one data request, and
/// hands the payload to the matching builder.
#[derive(Clone)]
pub struct Ticker {
    symbol: String,
    transport: Arc<dyn HttpTransport>,
    endpoints: Endpoints,
    credentials: Arc<CredentialStore>,
}

impl core::fmt::Debug for Ticker {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Ticker")
            .field("symbol", &self.symbol)
            .finish_non_exhaustive()
    }
}

impl Ticker {
    pub(crate) const fn new(
        symbol: String,
        transport: Arc<dyn HttpTransport>,
        endpoints: Endpoints,
        credentials: Arc<CredentialStore>,
    ) -> Self {
        Self {
            symbol,
            transport,
            endpoints,
            credentials,
        }
    }

    /// The symbol this ticker requests.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// One month of daily bars with dividends and splits.
    ///
    /// # Errors
    /// See [`Ticker::history_with`].
    pub async fn history(&self) -> Result<Vec<HistoryRecord>, FinquoteError> {
        self.history_with(&ChartRequest::default()).await
    }

    /// Price history for `req`.
    ///
    /// Sends `period1`/`period2` when both ends of the range are set and
    /// `range` otherwise.
    ///
    /// # Errors
    /// `Auth` when no credential can be obtained, `Api` for a provider error
    /// envelope, `Status` for other non-success answers, `EmptyResponse` for an
    /// empty body, `Decode` for an unparsable one, and `Transport` when the
    /// request itself fails.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "finquote::ticker::history",
            skip(self, req),
            fields(
                symbol = %self.symbol,
                interval = %req.interval,
                actions = req.actions,
            ),
        )
    )]
    pub async fn history_with(
        &self,
        req: &ChartRequest,
    ) -> Result<Vec<HistoryRecord>, FinquoteError> {
        let url = self.endpoints.chart_url_for(&self.symbol)?;
        let cred = self.credentials.credential().await?;

        let mut request = HttpRequest::get(url)
            .query("interval", req.interval.as_str())
            .query("includePrePost", req.pre_post.to_string())
            .query("events", if req.actions { "div,splits" } else { "" });
        request = match req.explicit_range() {
            Some((start, end)) => request
                .query("period1", start.to_string())
                .query("period2", end.to_string()),
            None => request.query("range", req.period.as_str()),
        };
        let request = request
            .query("crumb", cred.crumb)
            .header("Cookie", cred.cookie);

        let resp = self.transport.get(request).await?;
        let envelope: ChartEnvelope = decode(&resp, || format!("chart for {}", self.symbol))?;
        let rows = build_history(&envelope, req.actions)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(records = rows.len(), "history built");

        Ok(rows)
    }

    /// Quote summary over the default modules.
    ///
    /// # Errors
    /// See [`Ticker::info_with`].
    pub async fn info(&self) -> Result<StockInfo, FinquoteError> {
        self.info_with(SummaryModule::DEFAULTS).await
    }

    /// Quote summary over `modules`, flattened into one field map.
    ///
    /// # Errors
    /// `InvalidArg` when `modules` is empty, `EmptyResult` when the summary has
    /// no result entry, otherwise as for [`Ticker::history_with`].
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "finquote::ticker::info",
            skip(self, modules),
            fields(symbol = %self.symbol, modules = modules.len()),
        )
    )]
    pub async fn info_with(&self, modules: &[SummaryModule]) -> Result<StockInfo, FinquoteError> {
        if modules.is_empty() {
            return Err(FinquoteError::InvalidArg(
                "at least one summary module is required".into(),
            ));
        }
        let url = self.endpoints.quote_summary_url_for(&self.symbol)?;
        let cred = self.credentials.credential().await?;

        let request = HttpRequest::get(url)
            .query("modules", SummaryModule::join(modules))
            .query("crumb", cred.crumb)
            .header("Cookie", cred.cookie);

        let resp = self.transport.get(request).await?;
        let envelope: SummaryEnvelope =
            decode(&resp, || format!("quoteSummary for {}", self.symbol))?;
        flatten_summary(&envelope)
    }
}

/// Payloads that may carry the provider's error object.
trait Envelope: DeserializeOwned {
    fn provider_error(&self) -> Option<&ProviderError>;
}

impl Envelope for ChartEnvelope {
    fn provider_error(&self) -> Option<&ProviderError> {
        self.chart.as_ref()?.error.as_ref()
    }
}

impl Envelope for SummaryEnvelope {
    fn provider_error(&self) -> Option<&ProviderError> {
        self.quote_summary.as_ref()?.error.as_ref()
    }
}

/// Map an answer to its payload.
///
/// A non-success answer becomes `Api` when its body is an error envelope and
/// `Status` otherwise. A success answer must carry a decodable body.
fn decode<T: Envelope>(
    resp: &HttpResponse,
    what: impl FnOnce() -> String,
) -> Result<T, FinquoteError> {
    if !resp.is_success() {
        let parsed = serde_json::from_str::<T>(&resp.body).ok();
        return Err(match parsed.as_ref().and_then(|p| p.provider_error()) {
            Some(err) => FinquoteError::api(&err.code, &err.description),
            None => FinquoteError::status(resp.status, what()),
        });
    }
    let body = resp.body.trim();
    if body.is_empty() || body == "null" {
        return Err(FinquoteError::empty_response(what()));
    }
    serde_json::from_str(&resp.body).map_err(|e| FinquoteError::Decode(format!("{}: {e}", what())))
}
