//! Turn a columnar chart payload into an ordered series of price records.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::FinquoteError;
use crate::wire::{ChartEnvelope, ChartEvents, ChartResult, QuoteColumns, SplitEvent};

/// Fractional digits of a split ratio.
const SPLIT_RATIO_SCALE: u32 = 6;

/// One bar of price history with its corporate actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Bar timestamp.
    pub timestamp: DateTime<Utc>,
    /// Opening price.
    pub open: Decimal,
    /// High price.
    pub high: Decimal,
    /// Low price.
    pub low: Decimal,
    /// Closing price.
    pub close: Decimal,
    /// Adjusted close; equals `close` when the provider sent none.
    pub adj_close: Decimal,
    /// Traded volume; `0` when the provider sent none.
    pub volume: i64,
    /// Dividend paid on this bar, or zero.
    pub dividends: Decimal,
    /// Split ratio effective on this bar, or zero.
    pub stock_splits: Decimal,
}

/// Build the price series of a chart payload.
///
/// Records appear in payload order, one per timestamp whose open, high, low,
/// and close are all present; other timestamps are skipped. Columns shorter
/// than `timestamp` read as absent past their end. With `include_actions`,
/// dividends and splits are matched to bars by their own `date` field.
///
/// A payload without a chart body, result entry, or timestamps yields an
/// empty series.
///
/// # Errors
/// Returns `Api` when the payload carries a provider error object, even if
/// result data is present as well.
pub fn build_history(
    payload: &ChartEnvelope,
    include_actions: bool,
) -> Result<Vec<HistoryRecord>, FinquoteError> {
    let Some(chart) = &payload.chart else {
        return Ok(Vec::new());
    };
    if let Some(err) = &chart.error {
        return Err(FinquoteError::api(&err.code, &err.description));
    }
    let Some(result) = chart.result.as_ref().and_then(|r| r.first()) else {
        return Ok(Vec::new());
    };
    let Some(timestamps) = &result.timestamp else {
        return Ok(Vec::new());
    };

    let empty = QuoteColumns::default();
    let quote = result
        .indicators
        .as_ref()
        .and_then(|i| i.quote.as_ref())
        .and_then(|q| q.first())
        .unwrap_or(&empty);
    let adj_close = adj_close_column(result);
    let actions = if include_actions {
        ActionIndex::from_events(result.events.as_ref())
    } else {
        ActionIndex::default()
    };

    let mut out = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let (Some(open), Some(high), Some(low), Some(close)) = (
            at(quote.open.as_deref(), i),
            at(quote.high.as_deref(), i),
            at(quote.low.as_deref(), i),
            at(quote.close.as_deref(), i),
        ) else {
            continue;
        };
        let Some(timestamp) = DateTime::<Utc>::from_timestamp(ts, 0) else {
            #[cfg(feature = "tracing")]
            tracing::warn!(index = i, timestamp = ts, "dropping bar with unrepresentable timestamp");
            continue;
        };

        out.push(HistoryRecord {
            timestamp,
            open,
            high,
            low,
            close,
            adj_close: at(adj_close, i).unwrap_or(close),
            volume: at(quote.volume.as_deref(), i).unwrap_or(0),
            dividends: actions.dividend(ts),
            stock_splits: actions.split(ts),
        });
    }
    Ok(out)
}

fn adj_close_column(result: &ChartResult) -> Option<&[Option<Decimal>]> {
    result
        .indicators
        .as_ref()?
        .adjclose
        .as_ref()?
        .first()?
        .adjclose
        .as_deref()
}

/// Positional lookup where both a missing column and an overrun read as absent.
fn at<T: Copy>(column: Option<&[Option<T>]>, i: usize) -> Option<T> {
    column.and_then(|c| c.get(i).copied().flatten())
}

/// Dividends and splits keyed by the bar timestamp they belong to.
#[derive(Default)]
struct ActionIndex<'a> {
    dividends: HashMap<i64, Decimal>,
    splits: HashMap<i64, &'a SplitEvent>,
}

impl<'a> ActionIndex<'a> {
    fn from_events(events: Option<&'a ChartEvents>) -> Self {
        let mut index = Self::default();
        let Some(events) = events else {
            return index;
        };
        // Map iteration is in key order, so a later key overwrites an earlier
        // one sharing the same date.
        for d in events.dividends.iter().flat_map(|m| m.values()) {
            index.dividends.insert(d.date, d.amount);
        }
        for s in events.splits.iter().flat_map(|m| m.values()) {
            index.splits.insert(s.date, s);
        }
        index
    }

    fn dividend(&self, ts: i64) -> Decimal {
        self.dividends.get(&ts).copied().unwrap_or(Decimal::ZERO)
    }

    fn split(&self, ts: i64) -> Decimal {
        self.splits
            .get(&ts)
            .and_then(|s| split_ratio(s.numerator.as_deref()?, s.denominator.as_deref()?))
            .unwrap_or(Decimal::ZERO)
    }
}

/// `numerator / denominator` rounded half away from zero to six places.
///
/// `None` when either part is not a decimal number or the denominator is zero.
pub(crate) fn split_ratio(numerator: &str, denominator: &str) -> Option<Decimal> {
    let num = parse_decimal(numerator)?;
    let den = parse_decimal(denominator)?;
    if den.is_zero() {
        return None;
    }
    let mut ratio = num
        .checked_div(den)?
        .round_dp_with_strategy(SPLIT_RATIO_SCALE, RoundingStrategy::MidpointAwayFromZero);
    ratio.rescale(SPLIT_RATIO_SCALE);
    Some(ratio)
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    let s = s.trim();
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}
