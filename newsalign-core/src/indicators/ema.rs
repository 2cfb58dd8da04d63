//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * x[t] + (1 - alpha) * EMA[t-1], alpha = 2/(span+1).
//! Seed: the simple average of the first `span` defined inputs, placed on the
//! last of those inputs. Leading NaNs in the input are skipped before seeding,
//! which lets MACD feed its partially-defined line straight in.
//! Lookback (on a fully-defined series): span - 1.

use super::closes;
use crate::domain::PriceBar;
use crate::indicator::Indicator;

#[derive(Debug, Clone)]
pub struct Ema {
    span: usize,
    name: String,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        assert!(span >= 1, "EMA span must be >= 1");
        Self {
            span,
            name: format!("ema_{span}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.span.saturating_sub(1)
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        ema_of_series(&closes(bars), self.span)
    }
}

/// EMA of an arbitrary series using simple-average seeding.
///
/// A NaN inside the seed window leaves the whole output undefined; a NaN
/// after the seed makes every later value NaN.
pub fn ema_of_series(values: &[f64], span: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if span == 0 {
        return result;
    }

    let Some(start) = values.iter().position(|v| !v.is_nan()) else {
        return result;
    };
    let seed_end = start + span;
    if seed_end > n {
        return result;
    }
    let seed_window = &values[start..seed_end];
    if seed_window.iter().any(|v| v.is_nan()) {
        return result;
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut prev = seed_window.iter().sum::<f64>() / span as f64;
    result[seed_end - 1] = prev;

    for i in seed_end..n {
        let x = values[i];
        if x.is_nan() {
            break;
        }
        prev = alpha * x + (1.0 - alpha) * prev;
        result[i] = prev;
    }
    result
}
