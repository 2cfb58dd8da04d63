//! Daily sentiment aggregation per (ticker, calendar date).

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::{DailySentiment, ScoredNewsItem};

/// Mean sentiment and article count per (ticker, date).
///
/// The date is the calendar date of the article timestamp as recorded.
/// Output is sorted by ticker, then date. Only days with at least one
/// article appear.
pub fn aggregate_daily(scored: &[ScoredNewsItem]) -> Vec<DailySentiment> {
    let mut groups: BTreeMap<(&str, NaiveDate), (f64, usize)> = BTreeMap::new();
    for s in scored {
        let entry = groups
            .entry((s.item.stock.as_str(), s.item.day()))
            .or_insert((0.0, 0));
        entry.0 += s.sentiment;
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|((ticker, date), (sum, count))| DailySentiment {
            ticker: ticker.to_string(),
            date,
            mean_sentiment: sum / count as f64,
            article_count: count,
        })
        .collect()
}

/// Split a sorted daily table into per-ticker slices.
pub fn group_daily_by_ticker(daily: &[DailySentiment]) -> BTreeMap<String, Vec<DailySentiment>> {
    let mut out: BTreeMap<String, Vec<DailySentiment>> = BTreeMap::new();
    for d in daily {
        out.entry(d.ticker.clone()).or_default().push(d.clone());
    }
    for v in out.values_mut() {
        v.sort_by_key(|d| d.date);
    }
    out
}
