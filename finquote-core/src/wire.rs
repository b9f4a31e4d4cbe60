//! Serde mappings of the provider's chart and quote-summary payloads.
//!
//! Every field is optional or defaulted: the provider routinely omits arrays,
//! sends `null` in place of numbers, and returns `error: null` on success.
//! Unknown fields are ignored. A single value of the wrong shape is read as
//! absent (or its event dropped) rather than failing the whole payload.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Structured error object the provider returns inside either envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProviderError {
    /// Short code such as `"Not Found"`.
    #[serde(default)]
    pub code: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
}

/// Top-level chart response: `{"chart": {...}}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChartEnvelope {
    /// The chart body; absent in malformed responses.
    #[serde(default)]
    pub chart: Option<ChartBody>,
}

/// `chart` object carrying either results or an error.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChartBody {
    /// Result entries; only the first one is used. `null` entries are dropped.
    #[serde(default, deserialize_with = "non_null_entries")]
    pub result: Option<Vec<ChartResult>>,
    /// Provider-reported error.
    #[serde(default)]
    pub error: Option<ProviderError>,
}

/// One chart result: columnar series aligned on `timestamp`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChartResult {
    /// Bar timestamps in epoch seconds.
    #[serde(default)]
    pub timestamp: Option<Vec<i64>>,
    /// Price and volume columns.
    #[serde(default)]
    pub indicators: Option<Indicators>,
    /// Corporate actions, present when requested with `events=div,splits`.
    #[serde(default)]
    pub events: Option<ChartEvents>,
}

/// Column groups of a chart result.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Indicators {
    /// OHLCV columns; only the first entry is used.
    #[serde(default, deserialize_with = "non_null_entries")]
    pub quote: Option<Vec<QuoteColumns>>,
    /// Adjusted-close column; only the first entry is used.
    #[serde(default, deserialize_with = "non_null_entries")]
    pub adjclose: Option<Vec<AdjCloseColumn>>,
}

/// OHLCV columns. Any of them may be shorter than `timestamp`.
///
/// A price that does not fit a `Decimal` reads as absent at its index.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QuoteColumns {
    /// Opening prices.
    #[serde(default, deserialize_with = "lenient_column")]
    pub open: Option<Vec<Option<Decimal>>>,
    /// High prices.
    #[serde(default, deserialize_with = "lenient_column")]
    pub high: Option<Vec<Option<Decimal>>>,
    /// Low prices.
    #[serde(default, deserialize_with = "lenient_column")]
    pub low: Option<Vec<Option<Decimal>>>,
    /// Closing prices.
    #[serde(default, deserialize_with = "lenient_column")]
    pub close: Option<Vec<Option<Decimal>>>,
    /// Traded volume. Integral floats such as `1000000.0` are accepted.
    #[serde(default, deserialize_with = "volume_column")]
    pub volume: Option<Vec<Option<i64>>>,
}

/// Adjusted-close column.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AdjCloseColumn {
    /// Adjusted closing prices.
    #[serde(default, deserialize_with = "lenient_column")]
    pub adjclose: Option<Vec<Option<Decimal>>>,
}

/// Sparse corporate actions keyed by an opaque provider string.
///
/// Events missing their amount or date are dropped.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChartEvents {
    /// Cash dividends.
    #[serde(default, deserialize_with = "well_formed_events")]
    pub dividends: Option<BTreeMap<String, DividendEvent>>,
    /// Stock splits.
    #[serde(default, deserialize_with = "well_formed_events")]
    pub splits: Option<BTreeMap<String, SplitEvent>>,
}

/// A dividend payment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DividendEvent {
    /// Amount per share.
    pub amount: Decimal,
    /// Epoch seconds of the bar the dividend belongs to.
    pub date: i64,
}

/// A stock split. The ratio parts arrive as strings or numbers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SplitEvent {
    /// Epoch seconds of the bar the split belongs to.
    pub date: i64,
    /// Ratio numerator as sent by the provider.
    #[serde(default, deserialize_with = "text_or_number")]
    pub numerator: Option<String>,
    /// Ratio denominator as sent by the provider.
    #[serde(default, deserialize_with = "text_or_number")]
    pub denominator: Option<String>,
}

fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn non_null_entries<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<Option<T>>>::deserialize(deserializer)?
        .map(|entries| entries.into_iter().flatten().collect()))
}

fn lenient_column<'de, D, T>(deserializer: D) -> Result<Option<Vec<Option<T>>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(Option::<Vec<Value>>::deserialize(deserializer)?.map(|column| {
        column
            .into_iter()
            .map(|v| serde_json::from_value(v).ok())
            .collect()
    }))
}

fn volume_column<'de, D>(deserializer: D) -> Result<Option<Vec<Option<i64>>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Value>>::deserialize(deserializer)?
        .map(|column| column.iter().map(volume).collect()))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn volume(value: &Value) -> Option<i64> {
    let Value::Number(n) = value else {
        return None;
    };
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

fn well_formed_events<'de, D, T>(
    deserializer: D,
) -> Result<Option<BTreeMap<String, T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(
        Option::<BTreeMap<String, Value>>::deserialize(deserializer)?.map(|events| {
            events
                .into_iter()
                .filter_map(|(key, event)| Some((key, serde_json::from_value(event).ok()?)))
                .collect()
        }),
    )
}

/// Top-level quote-summary response: `{"quoteSummary": {...}}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SummaryEnvelope {
    /// The summary body; absent in malformed responses.
    #[serde(rename = "quoteSummary", default)]
    pub quote_summary: Option<SummaryBody>,
}

/// `quoteSummary` object carrying either results or an error.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SummaryBody {
    /// Result entries, each a map of module name to module body.
    #[serde(default)]
    pub result: Option<Vec<Map<String, Value>>>,
    /// Provider-reported error.
    #[serde(default)]
    pub error: Option<ProviderError>,
}
