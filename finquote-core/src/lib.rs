//! finquote-core
//!
//! Provider-facing building blocks of the finquote workspace.
//!
//! - `transport`: the `HttpTransport` seam every network call goes through.
//! - `auth`: the cookie/crumb `CredentialStore`.
//! - `wire`: serde mappings of the chart and quote-summary payloads.
//! - `history`: `build_history`, chart payload to `HistoryRecord`s.
//! - `summary`: `flatten_summary`, quote-summary payload to `StockInfo`.
//!
//! Async runtime (Tokio)
//! ---------------------
//! `CredentialStore` serializes refreshes with `tokio::sync::Mutex`; it works
//! under any executor that can poll Tokio's synchronization primitives.
#![warn(missing_docs)]

/// Cookie/crumb handshake and credential cache.
pub mod auth;
/// Chart payload to price records.
pub mod history;
/// Quote-summary payload to a flat field map.
pub mod summary;
/// HTTP request/response types and the transport trait.
pub mod transport;
pub mod wire;

pub use auth::{Credential, CredentialState, CredentialStore};
pub use finquote_types::*;
pub use history::{HistoryRecord, build_history};
pub use summary::{StockInfo, flatten_summary};
pub use transport::{HttpRequest, HttpResponse, HttpTransport};
