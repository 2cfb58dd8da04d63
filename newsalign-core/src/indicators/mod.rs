//! Concrete indicator implementations.
//!
//! Every indicator implements the [`Indicator`](crate::indicator::Indicator)
//! trait and works on one ticker's bars at a time. MACD is multi-series and is
//! exposed as one named instance per component (line, signal, histogram),
//! keeping the single-series trait unchanged.

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use ema::{ema_of_series, Ema};
pub use macd::{Macd, MacdComponent};
pub use rsi::Rsi;
pub use sma::{sma_of_series, Sma};

/// Extract the close series from a bar slice.
pub(crate) fn closes(bars: &[crate::domain::PriceBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Create synthetic bars from close prices for testing.
///
/// open = prev close (or close for the first bar), high/low = body +/- 1.0,
/// volume = 1000, one bar per calendar day starting 2024-01-02.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::PriceBar> {
    use crate::domain::PriceBar;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            PriceBar {
                ticker: "TEST".to_string(),
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: (open.min(close) - 1.0).max(0.0),
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
