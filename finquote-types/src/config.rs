//! Configuration values shared by the orchestrator and the credential store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{FinquoteError, Interval, Period};

/// Placeholder replaced by the encoded symbol in chart and summary templates.
pub const TICKER_PLACEHOLDER: &str = "{ticker}";

/// The four provider URLs.
///
/// Every URL can be overridden independently; unspecified fields keep the
/// standard provider hosts. Chart and summary URLs are templates containing
/// [`TICKER_PLACEHOLDER`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// URL that answers with the session `Set-Cookie` header.
    pub cookie_url: String,
    /// URL that answers with the crumb as plain text.
    pub crumb_url: String,
    /// Chart (history) URL template.
    pub chart_url: String,
    /// Quote-summary URL template.
    pub quote_summary_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            cookie_url: "https://fc.yahoo.com".to_string(),
            crumb_url: "https://query1.finance.yahoo.com/v1/test/getcrumb".to_string(),
            chart_url: "https://query2.finance.yahoo.com/v8/finance/chart/{ticker}".to_string(),
            quote_summary_url:
                "https://query2.finance.yahoo.com/v10/finance/quoteSummary/{ticker}".to_string(),
        }
    }
}

impl Endpoints {
    /// Point all four endpoints at one base URL, keeping the standard paths.
    ///
    /// Intended for local test servers and proxies: the cookie endpoint becomes
    /// `{base}/`, the others keep their provider paths under `base`.
    pub fn with_base_url(base: impl AsRef<str>) -> Self {
        let base = base.as_ref().trim_end_matches('/');
        Self {
            cookie_url: format!("{base}/"),
            crumb_url: format!("{base}/v1/test/getcrumb"),
            chart_url: format!("{base}/v8/finance/chart/{TICKER_PLACEHOLDER}"),
            quote_summary_url: format!("{base}/v10/finance/quoteSummary/{TICKER_PLACEHOLDER}"),
        }
    }

    /// Override the cookie URL.
    #[must_use]
    pub fn with_cookie_url(mut self, url: impl Into<String>) -> Self {
        self.cookie_url = url.into();
        self
    }

    /// Override the crumb URL.
    #[must_use]
    pub fn with_crumb_url(mut self, url: impl Into<String>) -> Self {
        self.crumb_url = url.into();
        self
    }

    /// Override the chart URL template.
    #[must_use]
    pub fn with_chart_url(mut self, url: impl Into<String>) -> Self {
        self.chart_url = url.into();
        self
    }

    /// Override the quote-summary URL template.
    #[must_use]
    pub fn with_quote_summary_url(mut self, url: impl Into<String>) -> Self {
        self.quote_summary_url = url.into();
        self
    }

    /// Resolve the chart URL for `symbol`.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the expanded template is not a valid URL.
    pub fn chart_url_for(&self, symbol: &str) -> Result<String, FinquoteError> {
        expand_template(&self.chart_url, symbol)
    }

    /// Resolve the quote-summary URL for `symbol`.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the expanded template is not a valid URL.
    pub fn quote_summary_url_for(&self, symbol: &str) -> Result<String, FinquoteError> {
        expand_template(&self.quote_summary_url, symbol)
    }
}

fn expand_template(template: &str, symbol: &str) -> Result<String, FinquoteError> {
    if symbol.is_empty() {
        return Err(FinquoteError::InvalidArg("empty symbol".into()));
    }
    // Everything but alphanumerics and `*-._` is percent-encoded; a space must
    // read `%20` in a path segment, not the form-encoded `+`.
    let encoded = url::form_urlencoded::byte_serialize(symbol.as_bytes())
        .collect::<String>()
        .replace('+', "%20");
    let expanded = template.replace(TICKER_PLACEHOLDER, &encoded);
    url::Url::parse(&expanded)
        .map(|u| u.to_string())
        .map_err(|e| FinquoteError::InvalidArg(format!("invalid url {expanded}: {e}")))
}

/// Parameters of a chart (history) request.
///
/// Defaults: one month of daily bars, regular session only, with dividends
/// and splits. An explicit range is used only when both `start` and `end`
/// are set; it then takes precedence over `period`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartRequest {
    /// Look-back window, ignored when both `start` and `end` are set.
    pub period: Period,
    /// Bar granularity.
    pub interval: Interval,
    /// Inclusive start of an explicit range.
    pub start: Option<DateTime<Utc>>,
    /// End of an explicit range.
    pub end: Option<DateTime<Utc>>,
    /// Include pre- and post-market bars.
    pub pre_post: bool,
    /// Request dividends and splits and attach them to records.
    pub actions: bool,
}

impl Default for ChartRequest {
    fn default() -> Self {
        Self {
            period: Period::M1,
            interval: Interval::D1,
            start: None,
            end: None,
            pre_post: false,
            actions: true,
        }
    }
}

impl ChartRequest {
    /// Set the look-back window.
    #[must_use]
    pub const fn period(mut self, period: Period) -> Self {
        self.period = period;
        self
    }

    /// Set the bar granularity.
    #[must_use]
    pub const fn interval(mut self, interval: Interval) -> Self {
        self.interval = interval;
        self
    }

    /// Set an explicit `[start, end]` range, overriding `period`.
    #[must_use]
    pub const fn range(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Set only the start of the range.
    #[must_use]
    pub const fn start(mut self, start: Option<DateTime<Utc>>) -> Self {
        self.start = start;
        self
    }

    /// Set only the end of the range.
    #[must_use]
    pub const fn end(mut self, end: Option<DateTime<Utc>>) -> Self {
        self.end = end;
        self
    }

    /// Include pre- and post-market bars.
    #[must_use]
    pub const fn pre_post(mut self, yes: bool) -> Self {
        self.pre_post = yes;
        self
    }

    /// Request dividends and splits.
    #[must_use]
    pub const fn actions(mut self, yes: bool) -> Self {
        self.actions = yes;
        self
    }

    /// The explicit range in epoch seconds, when both ends are set.
    #[must_use]
    pub fn explicit_range(&self) -> Option<(i64, i64)> {
        match (self.start, self.end) {
            (Some(s), Some(e)) => Some((s.timestamp(), e.timestamp())),
            _ => None,
        }
    }
}
