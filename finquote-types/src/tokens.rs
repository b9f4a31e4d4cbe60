//! Provider token enumerations for chart and quote-summary requests.
//!
//! Each enum maps one-to-one onto the strings the provider expects in query
//! parameters. Serde and `FromStr` use the same tokens.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::FinquoteError;

macro_rules! provider_tokens {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $token:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $token)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The token sent to the provider.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $token,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = FinquoteError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($token => Ok(Self::$variant),)+
                    other => Err(FinquoteError::InvalidArg(format!(
                        concat!("unknown ", stringify!($name), " token: {}"),
                        other
                    ))),
                }
            }
        }
    };
}

provider_tokens! {
    /// Look-back window for a chart request when no explicit date range is set.
    Period {
        /// One day.
        D1 => "1d",
        /// Five days.
        D5 => "5d",
        /// One month.
        M1 => "1mo",
        /// Three months.
        M3 => "3mo",
        /// Six months.
        M6 => "6mo",
        /// One year.
        Y1 => "1y",
        /// Two years.
        Y2 => "2y",
        /// Five years.
        Y5 => "5y",
        /// Ten years.
        Y10 => "10y",
        /// Year to date.
        Ytd => "ytd",
        /// Entire available history.
        Max => "max",
    }
}

provider_tokens! {
    /// Bar granularity of a chart request.
    Interval {
        /// One minute.
        I1m => "1m",
        /// Two minutes.
        I2m => "2m",
        /// Five minutes.
        I5m => "5m",
        /// Fifteen minutes.
        I15m => "15m",
        /// Thirty minutes.
        I30m => "30m",
        /// Sixty minutes.
        I60m => "60m",
        /// Ninety minutes.
        I90m => "90m",
        /// One hour.
        I1h => "1h",
        /// One day.
        D1 => "1d",
        /// Five days.
        D5 => "5d",
        /// One week.
        W1 => "1wk",
        /// One month.
        M1 => "1mo",
        /// Three months.
        M3 => "3mo",
    }
}

provider_tokens! {
    /// Named field group of the quote-summary endpoint.
    SummaryModule {
        /// Company address, officers, sector and industry.
        AssetProfile => "assetProfile",
        /// Price ranges, yields, market cap.
        SummaryDetail => "summaryDetail",
        /// Short company profile.
        SummaryProfile => "summaryProfile",
        /// Current price, targets, margins.
        FinancialData => "financialData",
        /// Share statistics and valuation ratios.
        DefaultKeyStatistics => "defaultKeyStatistics",
        /// Names, exchange, currency, regular market prices.
        Price => "price",
        /// Earnings history and estimates.
        Earnings => "earnings",
        /// Upcoming earnings and dividend dates.
        CalendarEvents => "calendarEvents",
        /// Annual income statements.
        IncomeStatementHistory => "incomeStatementHistory",
        /// Annual balance sheets.
        BalanceSheetHistory => "balanceSheetHistory",
        /// Annual cash-flow statements.
        CashflowStatementHistory => "cashflowStatementHistory",
    }
}

impl SummaryModule {
    /// Modules requested by `Ticker::info()` when none are given.
    pub const DEFAULTS: &'static [Self] = &[
        Self::SummaryDetail,
        Self::SummaryProfile,
        Self::FinancialData,
        Self::DefaultKeyStatistics,
        Self::Price,
        Self::AssetProfile,
    ];

    /// Join module tokens into the comma-separated `modules` query value.
    #[must_use]
    pub fn join(modules: &[Self]) -> String {
        modules
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}
