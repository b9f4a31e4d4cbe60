//! Provider payloads as JSON text.

/// Two complete daily bars, no adjusted close, no events.
pub const CHART_AAPL: &str = r#"{
  "chart": {
    "result": [{
      "meta": {"currency": "USD", "symbol": "AAPL", "exchangeName": "NMS"},
      "timestamp": [1704153600, 1704240000],
      "indicators": {
        "quote": [{
          "open": [148.0, 149.0],
          "high": [151.0, 152.0],
          "low": [147.0, 148.5],
          "close": [150.0, 151.0],
          "volume": [1000000, 1200000]
        }]
      }
    }],
    "error": null
  }
}"#;

/// Four bars with a dividend on the first, a null close on the second, a
/// 2:1 split on the fourth, and an adjusted-close column shorter than the
/// timestamps.
pub const CHART_MSFT_ACTIONS: &str = r#"{
  "chart": {
    "result": [{
      "meta": {"currency": "USD", "symbol": "MSFT"},
      "timestamp": [1704153600, 1704240000, 1704326400, 1704412800],
      "events": {
        "dividends": {
          "1704153600": {"amount": 0.75, "date": 1704153600}
        },
        "splits": {
          "1704412800": {"date": 1704412800, "numerator": 2, "denominator": 1, "splitRatio": "2:1"}
        }
      },
      "indicators": {
        "quote": [{
          "open": [370.0, 371.0, 372.0, 186.0],
          "high": [372.0, 373.0, 374.0, 188.0],
          "low": [369.0, 370.0, 371.0, 185.0],
          "close": [371.5, null, 373.5, 187.0],
          "volume": [20000000, 21000000, null, 40000000]
        }],
        "adjclose": [{
          "adjclose": [370.75, 371.9]
        }]
      }
    }],
    "error": null
  }
}"#;

/// Chart answer for an unknown symbol.
pub const CHART_NOT_FOUND: &str = r#"{
  "chart": {
    "result": null,
    "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
  }
}"#;

/// Quote summary with raw/fmt pairs, plain scalars, and a nested list.
pub const SUMMARY_AAPL: &str = r#"{
  "quoteSummary": {
    "result": [{
      "price": {
        "shortName": "Apple Inc.",
        "longName": "Apple Inc.",
        "symbol": "AAPL",
        "currency": "USD",
        "exchange": "NMS",
        "quoteType": "EQUITY",
        "regularMarketPrice": {"raw": 150.25, "fmt": "150.25"}
      },
      "summaryDetail": {
        "marketCap": {"raw": 2500000000000, "fmt": "2.5T", "longFmt": "2,500,000,000,000"},
        "dividendYield": {"raw": 0.0055, "fmt": "0.55%"},
        "exDividendDate": {}
      },
      "financialData": {
        "currentPrice": {"raw": 150.25, "fmt": "150.25"},
        "financialCurrency": "USD"
      },
      "assetProfile": {
        "sector": "Technology",
        "industry": "Consumer Electronics",
        "fullTimeEmployees": 161000,
        "companyOfficers": [{"name": "Timothy D. Cook", "title": "CEO"}]
      }
    }],
    "error": null
  }
}"#;

/// Quote-summary answer for an unknown symbol.
pub const SUMMARY_NOT_FOUND: &str = r#"{
  "quoteSummary": {
    "result": null,
    "error": {"code": "Not Found", "description": "Quote not found for symbol: MISSING"}
  }
}"#;
