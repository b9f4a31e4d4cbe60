//! finquote fetches price history and quote summaries from Yahoo-style finance
//! endpoints that gate data behind a session cookie and a crumb.
//!
//! Overview
//! - `Finquote` owns the HTTP transport, the endpoints, and one
//!   `CredentialStore` shared by every ticker it creates.
//! - `Ticker::history*` requests the chart endpoint and returns ordered
//!   `HistoryRecord`s with dividends and split ratios attached.
//! - `Ticker::info*` requests the quote-summary endpoint and returns a flat
//!   `StockInfo` map with typed accessors.
//! - The first data call runs the cookie/crumb handshake; later calls reuse it.
//!   Nothing refreshes automatically: when a call fails with an error for which
//!   `is_auth_rejection()` holds, refresh the store and call again.
//!
//! Examples
//! ```rust,ignore
//! use finquote::{ChartRequest, Finquote, Interval, Period};
//!
//! let client = Finquote::new()?;
//! let aapl = client.ticker("AAPL");
//!
//! let bars = aapl
//!     .history_with(&ChartRequest::default().period(Period::Y1).interval(Interval::W1))
//!     .await?;
//! let info = aapl.info().await?;
//! println!("{} closes, market cap {:?}", bars.len(), info.market_cap());
//! ```
//!
//! Retrying once after a rejected crumb:
//! ```rust,ignore
//! let bars = match aapl.history().await {
//!     Err(e) if e.is_auth_rejection() => {
//!         client.credentials().refresh().await?;
//!         aapl.history().await?
//!     }
//!     other => other?,
//! };
//! ```
#![warn(missing_docs)]

mod client;
mod http;
mod ticker;

pub use client::{Finquote, FinquoteBuilder};
pub use http::{DEFAULT_USER_AGENT, ReqwestTransport};
pub use ticker::Ticker;

pub use finquote_core::{
    AuthStage, ChartRequest, Credential, CredentialState, CredentialStore, Endpoints,
    FinquoteError, HistoryRecord, HttpRequest, HttpResponse, HttpTransport, Interval, Period,
    StockInfo, SummaryModule,
};
