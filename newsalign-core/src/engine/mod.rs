//! Indicator engine: per-ticker technical indicators with warm-up trimming.
//!
//! Each ticker is processed in isolation by a pure function. No state crosses
//! a ticker boundary; running all tickers is a parallel map over the
//! ticker → bars mapping followed by a gather.

pub mod precompute;
pub mod validate;

use std::collections::BTreeMap;
use std::fmt;

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{IndicatorRow, PriceBar};
use crate::error::ValidationError;
use crate::indicator::{Indicator, IndicatorValues};
use crate::indicators::{Macd, Rsi, Sma};

pub use precompute::{compute_warmup, precompute_indicators};
pub use validate::validate_series;

pub const SMA_SHORT: usize = 20;
pub const SMA_LONG: usize = 50;
pub const RSI_PERIOD: usize = 14;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;

/// Column names of the standard indicator set, in output order.
pub const INDICATOR_COLUMNS: [&str; 6] =
    ["sma_20", "sma_50", "rsi_14", "macd", "macd_signal", "macd_hist"];

/// Errors from the indicator engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("no price data for ticker '{ticker}'")]
    EmptyGroup { ticker: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("indicator series '{name}' was not computed")]
    MissingSeries { name: String },
}

/// A ticker the engine could not process, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedTicker {
    pub ticker: String,
    pub error: EngineError,
}

/// Output of running the engine over many tickers.
#[derive(Debug, Clone, Default)]
pub struct EngineOutput {
    /// Indicator rows per ticker; tickers whose rows were all warm-up map to
    /// an empty vector.
    pub rows: BTreeMap<String, Vec<IndicatorRow>>,
    /// Tickers skipped because of empty or invalid input, sorted by ticker.
    pub skipped: Vec<SkippedTicker>,
}

/// Computes the standard indicator set (SMA 20/50, RSI 14, MACD 12/26/9).
pub struct IndicatorEngine {
    indicators: Vec<Box<dyn Indicator>>,
}

impl fmt::Debug for IndicatorEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.indicators.iter().map(|i| i.name()).collect();
        f.debug_struct("IndicatorEngine")
            .field("indicators", &names)
            .finish()
    }
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::standard()
    }
}

impl IndicatorEngine {
    pub fn standard() -> Self {
        Self {
            indicators: vec![
                Box::new(Sma::new(SMA_SHORT)),
                Box::new(Sma::new(SMA_LONG)),
                Box::new(Rsi::new(RSI_PERIOD)),
                Box::new(Macd::line(MACD_FAST, MACD_SLOW, MACD_SIGNAL)),
                Box::new(Macd::signal(MACD_FAST, MACD_SLOW, MACD_SIGNAL)),
                Box::new(Macd::histogram(MACD_FAST, MACD_SLOW, MACD_SIGNAL)),
            ],
        }
    }

    pub fn indicators(&self) -> &[Box<dyn Indicator>] {
        &self.indicators
    }

    /// Number of leading rows each ticker loses to warm-up (49 for the
    /// standard set).
    pub fn warmup(&self) -> usize {
        compute_warmup(&self.indicators)
    }

    /// Compute indicator rows for one ticker.
    ///
    /// `bars` must be that ticker's bars sorted ascending by date. Rows with
    /// any undefined indicator are dropped, so a ticker with no more than
    /// `warmup()` bars yields an empty vector.
    pub fn compute(&self, ticker: &str, bars: &[PriceBar]) -> Result<Vec<IndicatorRow>, EngineError> {
        if bars.is_empty() {
            return Err(EngineError::EmptyGroup {
                ticker: ticker.to_string(),
            });
        }
        validate_series(ticker, bars)?;

        let values = precompute_indicators(bars, &self.indicators);
        let series = INDICATOR_COLUMNS
            .iter()
            .map(|name| column(&values, name))
            .collect::<Result<Vec<_>, _>>()?;

        let rows: Vec<IndicatorRow> = bars
            .iter()
            .enumerate()
            .filter(|(i, _)| series.iter().all(|s| s[*i].is_finite()))
            .map(|(i, bar)| IndicatorRow {
                bar: bar.clone(),
                sma_20: series[0][i],
                sma_50: series[1][i],
                rsi_14: series[2][i],
                macd: series[3][i],
                macd_signal: series[4][i],
                macd_hist: series[5][i],
            })
            .collect();

        debug!(
            ticker,
            bars = bars.len(),
            rows = rows.len(),
            "indicators computed"
        );
        Ok(rows)
    }

    /// Compute every ticker in parallel. Failing tickers are logged and
    /// reported in `skipped`; they never abort the others.
    pub fn compute_all(&self, groups: &BTreeMap<String, Vec<PriceBar>>) -> EngineOutput {
        let results: Vec<(String, Result<Vec<IndicatorRow>, EngineError>)> = groups
            .par_iter()
            .map(|(ticker, bars)| (ticker.clone(), self.compute(ticker, bars)))
            .collect();

        let mut output = EngineOutput::default();
        for (ticker, result) in results {
            match result {
                Ok(rows) => {
                    output.rows.insert(ticker, rows);
                }
                Err(error) => {
                    warn!(ticker = %ticker, error = %error, "skipping ticker");
                    output.skipped.push(SkippedTicker { ticker, error });
                }
            }
        }
        output.skipped.sort_by(|a, b| a.ticker.cmp(&b.ticker));
        output
    }
}

fn column<'a>(values: &'a IndicatorValues, name: &str) -> Result<&'a [f64], EngineError> {
    values
        .get_series(name)
        .ok_or_else(|| EngineError::MissingSeries {
            name: name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{make_bars, sma_of_series};

    fn wave(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 50.0 + (i as f64 * 0.2).sin() * 4.0 + (i % 7) as f64 * 0.3)
            .collect()
    }

    #[test]
    fn standard_warmup_is_49() {
        assert_eq!(IndicatorEngine::standard().warmup(), 49);
    }

    #[test]
    fn trims_exactly_the_warmup_rows() {
        let bars = make_bars(&wave(120));
        let rows = IndicatorEngine::standard().compute("TEST", &bars).unwrap();
        assert_eq!(rows.len(), 120 - 49);
        assert_eq!(rows[0].date(), bars[49].date);
        assert_eq!(rows.last().unwrap().date(), bars[119].date);
    }

    #[test]
    fn sma_columns_match_window_means() {
        let closes = wave(100);
        let bars = make_bars(&closes);
        let rows = IndicatorEngine::standard().compute("TEST", &bars).unwrap();
        let sma20 = sma_of_series(&closes, 20);
        for (k, row) in rows.iter().enumerate() {
            let i = k + 49;
            assert_eq!(row.sma_20, sma20[i]);
            let mean50 = closes[i - 49..=i].iter().sum::<f64>() / 50.0;
            assert_eq!(row.sma_50, mean50);
        }
    }

    #[test]
    fn fewer_than_26_bars_gives_no_rows() {
        let bars = make_bars(&wave(25));
        let rows = IndicatorEngine::standard().compute("TEST", &bars).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn exactly_warmup_bars_gives_no_rows() {
        let bars = make_bars(&wave(49));
        let rows = IndicatorEngine::standard().compute("TEST", &bars).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn empty_group_is_an_error() {
        let err = IndicatorEngine::standard().compute("TEST", &[]).unwrap_err();
        assert_eq!(
            err,
            EngineError::EmptyGroup {
                ticker: "TEST".into()
            }
        );
    }

    #[test]
    fn unsorted_input_is_rejected() {
        let mut bars = make_bars(&wave(60));
        bars.swap(10, 11);
        let err = IndicatorEngine::standard().compute("TEST", &bars).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Validation(ValidationError::Unsorted { .. })
        ));
    }

    #[test]
    fn compute_all_isolates_tickers() {
        let mut a = make_bars(&wave(80));
        let mut b = make_bars(&wave(80).iter().map(|c| c * 3.0).collect::<Vec<_>>());
        for bar in &mut a {
            bar.ticker = "AAA".into();
        }
        for bar in &mut b {
            bar.ticker = "BBB".into();
        }
        let mut groups = BTreeMap::new();
        groups.insert("AAA".to_string(), a.clone());
        groups.insert("BBB".to_string(), b);
        groups.insert("EMPTY".to_string(), Vec::new());

        let engine = IndicatorEngine::standard();
        let out = engine.compute_all(&groups);

        // A alone and A alongside B are identical.
        let alone = engine.compute("AAA", &a).unwrap();
        assert_eq!(out.rows["AAA"], alone);
        assert_eq!(out.rows["BBB"].len(), 80 - 49);
        assert_eq!(out.skipped.len(), 1);
        assert_eq!(out.skipped[0].ticker, "EMPTY");
    }
}
