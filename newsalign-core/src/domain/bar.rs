//! PriceBar: one daily OHLCV bar for one ticker.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// OHLCV bar for a single ticker on a single day.
///
/// Created by ingestion and never mutated afterwards. One bar per
/// (ticker, date); prices and volume are non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub ticker: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    /// Returns true if any OHLC field is NaN or infinite.
    pub fn is_void(&self) -> bool {
        !(self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite())
    }

    /// Finite and non-negative in every price field. Bars failing this
    /// cannot enter any computation.
    pub fn is_usable(&self) -> bool {
        !self.is_void()
            && self.open >= 0.0
            && self.high >= 0.0
            && self.low >= 0.0
            && self.close >= 0.0
    }

    /// Usable, and high/low bound the open/close body.
    pub fn is_sane(&self) -> bool {
        self.is_usable()
            && self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
    }
}
