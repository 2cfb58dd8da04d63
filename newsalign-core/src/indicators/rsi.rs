//! Relative Strength Index (RSI), Wilder's formulation.
//!
//! Seed: simple mean of the first `period` gains and losses.
//! Then Wilder smoothing: avg = (avg * (period - 1) + x) / period.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Lookback: period (first value once `period` deltas exist).
//! Edge cases: avg_loss == 0 → 100; avg_gain == 0 → 0. A flat window
//! (both zero) is 0, matching TA-Lib, which tests `gain + loss != 0`.

use super::closes;
use crate::domain::PriceBar;
use crate::indicator::Indicator;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let closes = closes(bars);
        let n = closes.len();
        let mut result = vec![f64::NAN; n];
        if n <= self.period {
            return result;
        }

        // deltas[k] is the change into bar k + 1
        let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
        let seed = &deltas[..self.period];
        if seed.iter().any(|d| d.is_nan()) {
            return result;
        }

        let period = self.period as f64;
        let mut avg_gain = seed.iter().map(|&d| d.max(0.0)).sum::<f64>() / period;
        let mut avg_loss = seed.iter().map(|&d| (-d).max(0.0)).sum::<f64>() / period;
        result[self.period] = rsi_value(avg_gain, avg_loss);

        for (k, &delta) in deltas.iter().enumerate().skip(self.period) {
            if delta.is_nan() {
                break;
            }
            avg_gain = (avg_gain * (period - 1.0) + delta.max(0.0)) / period;
            avg_loss = (avg_loss * (period - 1.0) + (-delta).max(0.0)) / period;
            result[k + 1] = rsi_value(avg_gain, avg_loss);
        }

        result
    }
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_gain + avg_loss == 0.0 {
        0.0
    } else if avg_loss == 0.0 {
        100.0
    } else if avg_gain == 0.0 {
        0.0
    } else {
        let rsi = 100.0 - 100.0 / (1.0 + avg_gain / avg_loss);
        rsi.clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars};

    #[test]
    fn rsi_all_gains() {
        let bars = make_bars(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0]);
        let result = Rsi::new(3).compute(&bars);
        assert_approx(result[3], 100.0, 1e-9);
        assert_approx(result[5], 100.0, 1e-9);
    }

    #[test]
    fn rsi_all_losses() {
        let bars = make_bars(&[105.0, 104.0, 103.0, 102.0, 101.0, 100.0]);
        let result = Rsi::new(3).compute(&bars);
        assert_approx(result[3], 0.0, 1e-9);
    }

    #[test]
    fn rsi_flat_series_is_zero() {
        let bars = make_bars(&[50.0; 8]);
        let result = Rsi::new(3).compute(&bars);
        assert_approx(result[3], 0.0, 1e-9);
        assert_approx(result[7], 0.0, 1e-9);
    }

    #[test]
    fn rsi_recovers_after_flat_seed() {
        let bars = make_bars(&[50.0, 50.0, 50.0, 50.0, 51.0]);
        let result = Rsi::new(3).compute(&bars);
        assert_approx(result[3], 0.0, 1e-9);
        assert_approx(result[4], 100.0, 1e-9);
    }

    #[test]
    fn rsi_mixed_seed_value() {
        // Changes: +0.34, -0.25, -0.48 → avg_gain = 0.34/3, avg_loss = 0.73/3
        // RSI[3] = 100 - 100 / (1 + 0.34/0.73)
        let bars = make_bars(&[44.0, 44.34, 44.09, 43.61, 44.33]);
        let result = Rsi::new(3).compute(&bars);

        assert!(result[..3].iter().all(|v| v.is_nan()));
        let expected = 100.0 - 100.0 / (1.0 + 0.34 / 0.73);
        assert_approx(result[3], expected, 1e-9);

        // Wilder step with +0.72
        let gain = (0.34 / 3.0 * 2.0 + 0.72) / 3.0;
        let loss = (0.73 / 3.0 * 2.0) / 3.0;
        assert_approx(result[4], 100.0 - 100.0 / (1.0 + gain / loss), 1e-9);
    }

    #[test]
    fn rsi_bounds() {
        let bars = make_bars(&[100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0]);
        let result = Rsi::new(3).compute(&bars);
        for (i, &v) in result.iter().enumerate() {
            if !v.is_nan() {
                assert!((0.0..=100.0).contains(&v), "RSI out of bounds at bar {i}: {v}");
            }
        }
    }

    #[test]
    fn rsi_nan_in_seed_is_all_nan() {
        let mut bars = make_bars(&[100.0, 101.0, 102.0, 103.0, 104.0]);
        bars[2].close = f64::NAN;
        let result = Rsi::new(3).compute(&bars);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn rsi_needs_period_plus_one_bars() {
        let bars = make_bars(&[100.0, 101.0, 102.0]);
        let result = Rsi::new(3).compute(&bars);
        assert!(result.iter().all(|v| v.is_nan()));
        assert_eq!(Rsi::new(14).lookback(), 14);
    }
}
