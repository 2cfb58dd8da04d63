//! Return calculator: per-ticker daily and next-day returns.
//!
//! `daily_return[t] = (close[t] - close[t-1]) / close[t-1]` and
//! `next_day_return[t] = daily_return[t+1]`, both computed within a ticker
//! only. A ticker's first row has no daily return and its last row no
//! next-day return; a zero prior close also leaves the return undefined.
//! Rows with either return undefined are dropped.
//!
//! `next_day_return` looks one step into the future. It is a prediction
//! target only and nothing in this crate reads it as an input.

use crate::domain::{IndicatorRow, ReturnRow};

/// Simple return between two closes, `None` when undefined.
pub fn simple_return(prev_close: f64, close: f64) -> Option<f64> {
    if prev_close == 0.0 || !prev_close.is_finite() || !close.is_finite() {
        return None;
    }
    let r = (close - prev_close) / prev_close;
    r.is_finite().then_some(r)
}

/// Daily returns aligned with `rows`, reset at every ticker boundary.
///
/// `rows` must be ordered by (ticker, date) ascending.
pub fn daily_returns(rows: &[IndicatorRow]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let value = match i.checked_sub(1).map(|p| &rows[p]) {
            Some(prev) if prev.ticker() == row.ticker() => simple_return(prev.close(), row.close()),
            _ => None,
        };
        out.push(value);
    }
    out
}

/// Attach daily and next-day returns, dropping rows where either is undefined.
pub fn compute_returns(rows: Vec<IndicatorRow>) -> Vec<ReturnRow> {
    let daily = daily_returns(&rows);
    let next: Vec<Option<f64>> = (0..rows.len())
        .map(|i| {
            let same_ticker = rows
                .get(i + 1)
                .is_some_and(|n| n.ticker() == rows[i].ticker());
            if same_ticker {
                daily[i + 1]
            } else {
                None
            }
        })
        .collect();

    rows.into_iter()
        .zip(daily.into_iter().zip(next))
        .filter_map(|(indicators, returns)| match returns {
            (Some(daily_return), Some(next_day_return)) => Some(ReturnRow {
                indicators,
                daily_return,
                next_day_return,
            }),
            _ => None,
        })
        .collect()
}
