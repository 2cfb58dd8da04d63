//! Moving Average Convergence/Divergence (MACD).
//!
//! Three components (separate Indicator instances):
//! - Line: EMA(close, fast) - EMA(close, slow)
//! - Signal: EMA(line, signal)
//! - Histogram: line - signal
//!
//! All EMAs use simple-average seeding (see `ema_of_series`). With the
//! standard (12, 26, 9) spans the line is defined from index 25 and the
//! signal and histogram from index 33.

use super::{closes, ema_of_series};
use crate::domain::PriceBar;
use crate::indicator::Indicator;

/// Which MACD series to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdComponent {
    Line,
    Signal,
    Histogram,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    component: MacdComponent,
    name: String,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize, component: MacdComponent) -> Self {
        assert!(fast >= 1 && signal >= 1, "MACD spans must be >= 1");
        assert!(slow > fast, "MACD slow span must exceed the fast span");
        let name = match component {
            MacdComponent::Line => "macd".to_string(),
            MacdComponent::Signal => "macd_signal".to_string(),
            MacdComponent::Histogram => "macd_hist".to_string(),
        };
        Self {
            fast,
            slow,
            signal,
            component,
            name,
        }
    }

    pub fn line(fast: usize, slow: usize, signal: usize) -> Self {
        Self::new(fast, slow, signal, MacdComponent::Line)
    }

    pub fn signal(fast: usize, slow: usize, signal: usize) -> Self {
        Self::new(fast, slow, signal, MacdComponent::Signal)
    }

    pub fn histogram(fast: usize, slow: usize, signal: usize) -> Self {
        Self::new(fast, slow, signal, MacdComponent::Histogram)
    }

    fn macd_line(&self, closes: &[f64]) -> Vec<f64> {
        let fast = ema_of_series(closes, self.fast);
        let slow = ema_of_series(closes, self.slow);
        fast.iter().zip(&slow).map(|(f, s)| f - s).collect()
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.component {
            MacdComponent::Line => self.slow - 1,
            MacdComponent::Signal | MacdComponent::Histogram => self.slow + self.signal - 2,
        }
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let line = self.macd_line(&closes(bars));
        if self.component == MacdComponent::Line {
            return line;
        }

        let signal = ema_of_series(&line, self.signal);
        match self.component {
            MacdComponent::Signal => signal,
            _ => line.iter().zip(&signal).map(|(l, s)| l - s).collect(),
        }
    }
}
