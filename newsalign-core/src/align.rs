//! Sentiment merger: forward-fills daily sentiment onto price rows.
//!
//! Each ticker is an independent stateful scan. Price rows are walked in date
//! order while a cursor advances over that ticker's sorted daily sentiment.
//! The carried value is the most recent daily mean with date <= the row date,
//! so news published on a non-trading day reaches the next trading row.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{DailySentiment, EnrichedRow, ReturnRow};
use crate::error::ValidationError;
use crate::sentiment::group_daily_by_ticker;

/// What to do with price rows dated before a ticker's first sentiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadingRowPolicy {
    /// Remove leading rows.
    #[default]
    Drop,
    /// Keep leading rows with an empty sentiment.
    KeepEmpty,
}

/// Row counts for one ticker after merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TickerMergeStats {
    pub kept: usize,
    /// Leading rows removed under [`LeadingRowPolicy::Drop`].
    pub dropped: usize,
    /// Kept rows with no sentiment value.
    pub empty: usize,
}

/// Summary of a merge across all tickers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MergeReport {
    pub per_ticker: BTreeMap<String, TickerMergeStats>,
    /// Tickers whose news never reached any price row.
    pub no_overlap: Vec<String>,
}

impl MergeReport {
    pub fn rows_kept(&self) -> usize {
        self.per_ticker.values().map(|s| s.kept).sum()
    }

    pub fn rows_dropped(&self) -> usize {
        self.per_ticker.values().map(|s| s.dropped).sum()
    }

    /// Fold another report in. Tickers are disjoint between chunks.
    pub fn extend(&mut self, other: MergeReport) {
        self.per_ticker.extend(other.per_ticker);
        self.no_overlap.extend(other.no_overlap);
        self.no_overlap.sort();
    }
}

struct TickerMerge {
    rows: Vec<EnrichedRow>,
    stats: TickerMergeStats,
    no_overlap: bool,
}

/// Merge daily sentiment into return rows by per-ticker forward fill.
///
/// `rows` may contain many tickers in any ticker order, but each ticker's
/// rows must be date-ascending. `daily` must hold at most one entry per
/// (ticker, date) with means in [-1, 1]. Output is sorted by (ticker, date).
pub fn merge_sentiment(
    rows: Vec<ReturnRow>,
    daily: &[DailySentiment],
    policy: LeadingRowPolicy,
) -> Result<(Vec<EnrichedRow>, MergeReport), ValidationError> {
    let mut by_ticker: BTreeMap<String, Vec<ReturnRow>> = BTreeMap::new();
    for row in rows {
        by_ticker.entry(row.ticker().to_string()).or_default().push(row);
    }
    let daily_by_ticker = group_daily_by_ticker(daily);
    for (ticker, days) in &daily_by_ticker {
        validate_daily(ticker, days)?;
    }

    let merged: Vec<(String, TickerMerge)> = by_ticker
        .into_par_iter()
        .map(|(ticker, rows)| {
            let days = daily_by_ticker
                .get(&ticker)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let merged = merge_ticker(&ticker, rows, days, policy)?;
            Ok((ticker, merged))
        })
        .collect::<Result<_, ValidationError>>()?;

    let mut out = Vec::new();
    let mut report = MergeReport::default();
    for (ticker, merged) in merged {
        if merged.no_overlap {
            warn!(
                ticker = %ticker,
                rows = merged.rows.len(),
                "no sentiment overlaps the price history; keeping rows with empty sentiment"
            );
            report.no_overlap.push(ticker.clone());
        } else if merged.stats.dropped > 0 {
            debug!(ticker = %ticker, dropped = merged.stats.dropped, "dropped leading rows");
        }
        report.per_ticker.insert(ticker, merged.stats);
        out.extend(merged.rows);
    }
    Ok((out, report))
}

fn validate_daily(ticker: &str, days: &[DailySentiment]) -> Result<(), ValidationError> {
    for d in days {
        if !(-1.0..=1.0).contains(&d.mean_sentiment) {
            return Err(ValidationError::SentimentOutOfRange {
                ticker: ticker.to_string(),
                date: d.date,
                value: d.mean_sentiment,
            });
        }
    }
    if let Some(w) = days.windows(2).find(|w| w[0].date == w[1].date) {
        return Err(ValidationError::DuplicateSentiment {
            ticker: ticker.to_string(),
            date: w[1].date,
        });
    }
    Ok(())
}

fn merge_ticker(
    ticker: &str,
    rows: Vec<ReturnRow>,
    days: &[DailySentiment],
    policy: LeadingRowPolicy,
) -> Result<TickerMerge, ValidationError> {
    if let Some(w) = rows.windows(2).find(|w| w[1].date() <= w[0].date()) {
        return Err(if w[1].date() == w[0].date() {
            ValidationError::DuplicateDate {
                ticker: ticker.to_string(),
                date: w[1].date(),
            }
        } else {
            ValidationError::Unsorted {
                ticker: ticker.to_string(),
                date: w[1].date(),
            }
        });
    }

    let mut cursor = 0;
    let mut carried: Option<f64> = None;
    let mut filled = Vec::with_capacity(rows.len());
    for row in rows {
        while cursor < days.len() && days[cursor].date <= row.date() {
            carried = Some(days[cursor].mean_sentiment);
            cursor += 1;
        }
        filled.push((row, carried));
    }

    let no_overlap = filled.iter().all(|(_, s)| s.is_none());
    let keep_leading = no_overlap || policy == LeadingRowPolicy::KeepEmpty;

    let mut stats = TickerMergeStats::default();
    let mut out = Vec::with_capacity(filled.len());
    for (row, sentiment) in filled {
        if sentiment.is_none() {
            if !keep_leading {
                stats.dropped += 1;
                continue;
            }
            stats.empty += 1;
        }
        stats.kept += 1;
        out.push(row.with_sentiment(sentiment));
    }

    Ok(TickerMerge {
        rows: out,
        stats,
        no_overlap,
    })
}
