//! Indicator trait and precomputed indicator values container.
//!
//! Indicators are pure functions: one ticker's bar history in, one numeric
//! series out. They are computed once per ticker and then stitched into
//! `IndicatorRow`s by the engine.

use crate::domain::PriceBar;
use std::collections::BTreeMap;

/// Trait for indicators.
///
/// Indicators take a full single-ticker bar series (ascending by date) and
/// produce a numeric output series of the same length. The first
/// `lookback()` values are `f64::NAN` (warm-up).
///
/// # Look-ahead contamination guard
/// No indicator value at bar t may depend on price data from bar t+1 or later.
/// Every indicator must pass the truncated-vs-full series test.
pub trait Indicator: Send + Sync {
    /// Column name (e.g., "sma_20", "rsi_14").
    fn name(&self) -> &str;

    /// Number of leading bars for which the indicator is undefined.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    fn compute(&self, bars: &[PriceBar]) -> Vec<f64>;
}

/// One ticker's precomputed indicator series, keyed by column name.
#[derive(Debug, Clone, Default)]
pub struct IndicatorValues {
    series: BTreeMap<String, Vec<f64>>,
}

impl IndicatorValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `values` under `name`, replacing any earlier series.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.series.insert(name.into(), values);
    }

    pub fn get_series(&self, name: &str) -> Option<&[f64]> {
        self.series.get(name).map(Vec::as_slice)
    }
}
