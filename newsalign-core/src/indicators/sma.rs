//! Simple Moving Average (SMA).
//!
//! Mean of the trailing `period` closes, current bar included.
//! Lookback: period - 1 (first valid value at index period-1).
//! A NaN anywhere in a window makes that window's value NaN.

use super::closes;
use crate::domain::PriceBar;
use crate::indicator::Indicator;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        sma_of_series(&closes(bars), self.period)
    }
}

/// Trailing simple moving average of an arbitrary series.
///
/// Each window is summed directly so that the value at `i` is exactly
/// `values[i+1-period..=i].sum() / period`, with no rolling drift.
pub fn sma_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n < period {
        return result;
    }

    for (i, slot) in result.iter_mut().enumerate().skip(period - 1) {
        let window = &values[i + 1 - period..=i];
        *slot = window.iter().sum::<f64>() / period as f64;
    }
    result
}
