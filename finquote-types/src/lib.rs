//! Error taxonomy, endpoint configuration, and provider tokens shared by the
//! finquote crates.
#![warn(missing_docs)]

mod config;
mod error;
pub mod tokens;

pub use config::{ChartRequest, Endpoints, TICKER_PLACEHOLDER};
pub use error::{AuthStage, FinquoteError};
pub use tokens::{Interval, Period, SummaryModule};
