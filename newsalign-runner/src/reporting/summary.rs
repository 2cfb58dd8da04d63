//! Per-ticker summaries of the enriched table.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use newsalign_core::domain::EnrichedRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerSummary {
    pub ticker: String,
    pub rows: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub last_close: f64,
    pub last_sma_20: f64,
    pub last_sma_50: f64,
    pub last_rsi_14: f64,
    pub last_macd: f64,
    pub last_macd_signal: f64,
    pub last_macd_hist: f64,
    /// Mean over rows that carry a sentiment value.
    pub mean_sentiment: Option<f64>,
    pub mean_daily_return: f64,
}

/// One summary per ticker, in table order. `rows` must be sorted by
/// (ticker, date).
pub fn summarize(rows: &[EnrichedRow]) -> Vec<TickerSummary> {
    let mut out = Vec::new();
    let mut start = 0;
    for i in 1..=rows.len() {
        if i == rows.len() || rows[i].ticker() != rows[start].ticker() {
            out.extend(summarize_ticker(&rows[start..i]));
            start = i;
        }
    }
    out
}

fn summarize_ticker(rows: &[EnrichedRow]) -> Option<TickerSummary> {
    let first = rows.first()?;
    let last = rows.last()?;
    let sentiments: Vec<f64> = rows.iter().filter_map(|r| r.sentiment).collect();
    let mean_sentiment =
        (!sentiments.is_empty()).then(|| sentiments.iter().sum::<f64>() / sentiments.len() as f64);
    let mean_daily_return = rows.iter().map(|r| r.daily_return).sum::<f64>() / rows.len() as f64;

    Some(TickerSummary {
        ticker: first.ticker().to_string(),
        rows: rows.len(),
        first_date: first.date(),
        last_date: last.date(),
        last_close: last.bar().close,
        last_sma_20: last.indicators.sma_20,
        last_sma_50: last.indicators.sma_50,
        last_rsi_14: last.indicators.rsi_14,
        last_macd: last.indicators.macd,
        last_macd_signal: last.indicators.macd_signal,
        last_macd_hist: last.indicators.macd_hist,
        mean_sentiment,
        mean_daily_return,
    })
}
