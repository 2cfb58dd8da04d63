//! Input-contract checks for a single ticker's price series.

use crate::domain::PriceBar;
use crate::error::ValidationError;

/// Check that `bars` is one ticker's series, strictly ascending by date,
/// with finite non-negative closes.
pub fn validate_series(ticker: &str, bars: &[PriceBar]) -> Result<(), ValidationError> {
    let mut prev = None;
    for bar in bars {
        if bar.ticker != ticker {
            return Err(ValidationError::MixedTickers {
                expected: ticker.to_string(),
                found: bar.ticker.clone(),
            });
        }
        if !bar.close.is_finite() {
            return Err(ValidationError::NonFiniteClose {
                ticker: ticker.to_string(),
                date: bar.date,
            });
        }
        if bar.close < 0.0 || bar.open < 0.0 || bar.high < 0.0 || bar.low < 0.0 {
            return Err(ValidationError::NegativePrice {
                ticker: ticker.to_string(),
                date: bar.date,
            });
        }
        if let Some(prev_date) = prev {
            if bar.date == prev_date {
                return Err(ValidationError::DuplicateDate {
                    ticker: ticker.to_string(),
                    date: bar.date,
                });
            }
            if bar.date < prev_date {
                return Err(ValidationError::Unsorted {
                    ticker: ticker.to_string(),
                    date: bar.date,
                });
            }
        }
        prev = Some(bar.date);
    }
    Ok(())
}
