//! Derived table rows produced by the indicator engine, return calculator
//! and sentiment merger.

use super::bar::PriceBar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A price bar with its technical indicators.
///
/// Rows leaving the indicator engine never carry undefined (warm-up) values.
/// Within a ticker they are ordered by date ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    #[serde(flatten)]
    pub bar: PriceBar,
    pub sma_20: f64,
    pub sma_50: f64,
    pub rsi_14: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_hist: f64,
}

impl IndicatorRow {
    pub fn ticker(&self) -> &str {
        &self.bar.ticker
    }

    pub fn date(&self) -> NaiveDate {
        self.bar.date
    }

    pub fn close(&self) -> f64 {
        self.bar.close
    }
}

/// An indicator row with its per-ticker returns.
///
/// `next_day_return` is the following row's `daily_return`: it uses future
/// information and exists only as a prediction target. It must never be used
/// as an input for the same time step it is attached to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnRow {
    #[serde(flatten)]
    pub indicators: IndicatorRow,
    pub daily_return: f64,
    pub next_day_return: f64,
}

impl ReturnRow {
    pub fn ticker(&self) -> &str {
        self.indicators.ticker()
    }

    pub fn date(&self) -> NaiveDate {
        self.indicators.date()
    }

    /// Attach a (possibly absent) forward-filled sentiment value.
    pub fn with_sentiment(self, sentiment: Option<f64>) -> EnrichedRow {
        EnrichedRow {
            indicators: self.indicators,
            daily_return: self.daily_return,
            next_day_return: self.next_day_return,
            sentiment,
        }
    }
}

/// Final output row: indicators, returns and forward-filled sentiment.
///
/// `sentiment` is `None` only for tickers whose news never overlapped their
/// price history, or for leading rows retained under
/// `LeadingRowPolicy::KeepEmpty`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRow {
    #[serde(flatten)]
    pub indicators: IndicatorRow,
    pub daily_return: f64,
    /// Look-ahead prediction target. See [`ReturnRow::next_day_return`].
    pub next_day_return: f64,
    pub sentiment: Option<f64>,
}

impl EnrichedRow {
    pub fn ticker(&self) -> &str {
        self.indicators.ticker()
    }

    pub fn date(&self) -> NaiveDate {
        self.indicators.date()
    }

    pub fn bar(&self) -> &PriceBar {
        &self.indicators.bar
    }
}
