//! Indicator precomputation for a single ticker.
//!
//! All indicators are computed once over the ticker's full series. Results
//! are stored in an `IndicatorValues` container for row assembly.

use crate::domain::PriceBar;
use crate::indicator::{Indicator, IndicatorValues};

/// Compute every indicator over one ticker's bars.
pub fn precompute_indicators(
    bars: &[PriceBar],
    indicators: &[Box<dyn Indicator>],
) -> IndicatorValues {
    let mut iv = IndicatorValues::new();
    for indicator in indicators {
        let series = indicator.compute(bars);
        debug_assert_eq!(
            series.len(),
            bars.len(),
            "indicator '{}' produced {} values for {} bars",
            indicator.name(),
            series.len(),
            bars.len(),
        );
        iv.insert(indicator.name(), series);
    }
    iv
}

/// The warm-up length: maximum lookback across all indicators.
pub fn compute_warmup(indicators: &[Box<dyn Indicator>]) -> usize {
    indicators.iter().map(|i| i.lookback()).max().unwrap_or(0)
}
