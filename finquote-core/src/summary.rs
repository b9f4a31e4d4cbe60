//! Flatten the module-nested quote-summary payload into one field map.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::FinquoteError;
use crate::wire::SummaryEnvelope;

/// Flat view of a quote-summary result: field name to unwrapped value.
///
/// Built once per summary call and never mutated. Iteration follows payload
/// order. Accessors return `None` for both missing keys and values of the
/// wrong type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockInfo {
    fields: Map<String, Value>,
}

impl StockInfo {
    /// Value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// String stored under `key`.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_str()
    }

    /// Number stored under `key`, as a decimal.
    #[must_use]
    pub fn get_decimal(&self, key: &str) -> Option<Decimal> {
        match self.get(key)? {
            Value::Number(n) => number_to_decimal(n),
            _ => None,
        }
    }

    /// Integral number stored under `key`.
    #[must_use]
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key)?.as_i64()
    }

    /// The whole field map.
    #[must_use]
    pub const fn raw(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Consume the view and return the field map.
    #[must_use]
    pub fn into_raw(self) -> Map<String, Value> {
        self.fields
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when no field is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in payload order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// `shortName`.
    #[must_use]
    pub fn short_name(&self) -> Option<&str> {
        self.get_str("shortName")
    }

    /// `longName`.
    #[must_use]
    pub fn long_name(&self) -> Option<&str> {
        self.get_str("longName")
    }

    /// `symbol`.
    #[must_use]
    pub fn symbol(&self) -> Option<&str> {
        self.get_str("symbol")
    }

    /// `currency`.
    #[must_use]
    pub fn currency(&self) -> Option<&str> {
        self.get_str("currency")
    }

    /// `exchange`.
    #[must_use]
    pub fn exchange(&self) -> Option<&str> {
        self.get_str("exchange")
    }

    /// `quoteType`.
    #[must_use]
    pub fn quote_type(&self) -> Option<&str> {
        self.get_str("quoteType")
    }

    /// `sector`.
    #[must_use]
    pub fn sector(&self) -> Option<&str> {
        self.get_str("sector")
    }

    /// `industry`.
    #[must_use]
    pub fn industry(&self) -> Option<&str> {
        self.get_str("industry")
    }

    /// `currentPrice`.
    #[must_use]
    pub fn current_price(&self) -> Option<Decimal> {
        self.get_decimal("currentPrice")
    }

    /// `marketCap`.
    #[must_use]
    pub fn market_cap(&self) -> Option<Decimal> {
        self.get_decimal("marketCap")
    }
}

impl From<Map<String, Value>> for StockInfo {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

fn number_to_decimal(n: &Number) -> Option<Decimal> {
    if let Some(i) = n.as_i64() {
        return Some(Decimal::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Some(Decimal::from(u));
    }
    let text = n.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Flatten a quote-summary payload.
///
/// Modules of the first result entry are merged in payload order; a later
/// module overwrites an earlier one on a field-name clash. A field holding an
/// object with a `raw` key becomes that raw value. Everything else, nested
/// objects included, is kept as sent. Module bodies that are not objects are
/// skipped.
///
/// # Errors
/// `Api` when the payload carries a provider error object, `EmptyResponse`
/// when the `quoteSummary` body is missing, and `EmptyResult` when it has no
/// result entry.
pub fn flatten_summary(payload: &SummaryEnvelope) -> Result<StockInfo, FinquoteError> {
    let Some(body) = &payload.quote_summary else {
        return Err(FinquoteError::empty_response("quoteSummary body missing"));
    };
    if let Some(err) = &body.error {
        return Err(FinquoteError::api(&err.code, &err.description));
    }
    let Some(result) = body.result.as_ref().and_then(|r| r.first()) else {
        return Err(FinquoteError::empty_result("quoteSummary has no result entry"));
    };

    let mut fields = Map::new();
    for module in result.values() {
        let Value::Object(module) = module else {
            continue;
        };
        for (name, value) in module {
            fields.insert(name.clone(), unwrap_raw(value));
        }
    }
    Ok(StockInfo { fields })
}

fn unwrap_raw(value: &Value) -> Value {
    match value {
        Value::Object(obj) => match obj.get("raw") {
            Some(raw) => raw.clone(),
            None => value.clone(),
        },
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Array(_) => {
            value.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unwrap_raw_cases() {
        assert_eq!(unwrap_raw(&json!({"raw": 1.5, "fmt": "1.50"})), json!(1.5));
        assert_eq!(unwrap_raw(&json!({"raw": null})), Value::Null);
        assert_eq!(unwrap_raw(&json!({"fmt": "x"})), json!({"fmt": "x"}));
        assert_eq!(unwrap_raw(&json!([1, 2])), json!([1, 2]));
        assert_eq!(unwrap_raw(&json!("AAPL")), json!("AAPL"));
    }

    #[test]
    fn number_to_decimal_handles_float_and_exponent() {
        let n: Number = serde_json::from_str("2.5e12").unwrap();
        assert_eq!(number_to_decimal(&n), Some(Decimal::from(2_500_000_000_000_i64)));
        let n: Number = serde_json::from_str("0.25").unwrap();
        assert_eq!(number_to_decimal(&n), Decimal::from_str("0.25").ok());
    }
}
