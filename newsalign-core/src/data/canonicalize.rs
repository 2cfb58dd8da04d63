//! Canonicalization: per-ticker grouping, ordering, dedupe and sanity checks.
//!
//! Only bars with a non-finite or negative price are removed. Bars whose
//! high/low do not bound the body stay in the series (removing one would
//! shift every later window) and are reported by [`detect_anomalies`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::PriceBar;

/// Result of canonicalizing a flat list of bars.
#[derive(Debug, Clone, Default)]
pub struct CanonicalBars {
    /// Ticker → bars sorted ascending by date, one bar per date.
    pub groups: BTreeMap<String, Vec<PriceBar>>,
    pub duplicates_removed: usize,
    /// Bars with a non-finite or negative price.
    pub invalid_removed: usize,
}

/// Group bars by ticker, sort each group by date (stable), keep the first bar
/// of any duplicated (ticker, date) and drop unusable bars.
pub fn canonicalize(bars: Vec<PriceBar>) -> CanonicalBars {
    let mut out = CanonicalBars::default();
    for bar in bars {
        if !bar.is_usable() {
            out.invalid_removed += 1;
            continue;
        }
        out.groups.entry(bar.ticker.clone()).or_default().push(bar);
    }
    for (ticker, group) in out.groups.iter_mut() {
        group.sort_by_key(|b| b.date);
        let before = group.len();
        group.dedup_by_key(|b| b.date);
        let removed = before - group.len();
        if removed > 0 {
            debug!(ticker = %ticker, removed, "removed duplicate bars");
        }
        out.duplicates_removed += removed;
    }
    if out.invalid_removed > 0 {
        warn!(count = out.invalid_removed, "dropped bars with non-finite or negative prices");
    }
    out
}

/// Kinds of data anomaly that are reported but not removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyType {
    /// High/low do not bound open/close.
    OhlcInconsistent,
    ZeroVolume,
    /// More than ten calendar days between consecutive bars.
    SuspiciousGap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyReport {
    pub ticker: String,
    pub anomaly_type: AnomalyType,
    pub count: usize,
}

const MAX_GAP_DAYS: i64 = 10;

/// Scan canonical groups for anomalies.
pub fn detect_anomalies(groups: &BTreeMap<String, Vec<PriceBar>>) -> Vec<AnomalyReport> {
    let mut anomalies = Vec::new();
    for (ticker, bars) in groups {
        let inconsistent = bars.iter().filter(|b| !b.is_sane()).count();
        if inconsistent > 0 {
            anomalies.push(AnomalyReport {
                ticker: ticker.clone(),
                anomaly_type: AnomalyType::OhlcInconsistent,
                count: inconsistent,
            });
        }
        let zero_volume = bars.iter().filter(|b| b.volume == 0).count();
        if zero_volume > 0 {
            anomalies.push(AnomalyReport {
                ticker: ticker.clone(),
                anomaly_type: AnomalyType::ZeroVolume,
                count: zero_volume,
            });
        }
        let gaps = bars
            .windows(2)
            .filter(|w| (w[1].date - w[0].date).num_days() > MAX_GAP_DAYS)
            .count();
        if gaps > 0 {
            anomalies.push(AnomalyReport {
                ticker: ticker.clone(),
                anomaly_type: AnomalyType::SuspiciousGap,
                count: gaps,
            });
        }
    }
    anomalies
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(ticker: &str, day: u32, close: f64, volume: u64) -> PriceBar {
        PriceBar {
            ticker: ticker.into(),
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume,
        }
    }

    #[test]
    fn groups_and_sorts_by_date() {
        let bars = vec![bar("SPY", 3, 103.0, 1), bar("QQQ", 2, 50.0, 1), bar("SPY", 1, 101.0, 1)];
        let out = canonicalize(bars);
        assert_eq!(out.groups.keys().collect::<Vec<_>>(), vec!["QQQ", "SPY"]);
        let days: Vec<u32> = out.groups["SPY"].iter().map(|b| chrono::Datelike::day(&b.date)).collect();
        assert_eq!(days, vec![1, 3]);
    }

    #[test]
    fn duplicates_keep_first_occurrence() {
        let bars = vec![bar("SPY", 1, 100.0, 1), bar("SPY", 1, 200.0, 1), bar("SPY", 2, 101.0, 1)];
        let out = canonicalize(bars);
        assert_eq!(out.groups["SPY"].len(), 2);
        assert_eq!(out.groups["SPY"][0].close, 100.0);
        assert_eq!(out.duplicates_removed, 1);
        assert!(crate::engine::validate_series("SPY", &out.groups["SPY"]).is_ok());
    }

    #[test]
    fn inverted_bars_are_kept_and_flagged() {
        let mut bad = bar("SPY", 1, 100.0, 1);
        bad.high = 90.0;
        let out = canonicalize(vec![bad, bar("SPY", 2, 100.0, 1)]);
        assert_eq!(out.invalid_removed, 0);
        assert_eq!(out.groups["SPY"].len(), 2);

        let anomalies = detect_anomalies(&out.groups);
        assert_eq!(
            anomalies,
            vec![AnomalyReport {
                ticker: "SPY".into(),
                anomaly_type: AnomalyType::OhlcInconsistent,
                count: 1,
            }]
        );
    }

    #[test]
    fn non_finite_and_negative_bars_are_removed() {
        let mut nan = bar("SPY", 1, 100.0, 1);
        nan.close = f64::NAN;
        let mut negative = bar("SPY", 2, 100.0, 1);
        negative.low = -0.5;
        let out = canonicalize(vec![nan, negative, bar("SPY", 3, 100.0, 1)]);
        assert_eq!(out.invalid_removed, 2);
        assert_eq!(out.groups["SPY"].len(), 1);
    }

    #[test]
    fn anomalies_flag_zero_volume_and_gaps() {
        let out = canonicalize(vec![
            bar("SPY", 1, 100.0, 0),
            bar("SPY", 2, 100.0, 10),
            bar("SPY", 20, 100.0, 0),
        ]);
        let anomalies = detect_anomalies(&out.groups);
        assert_eq!(anomalies.len(), 2);
        assert_eq!(anomalies[0].anomaly_type, AnomalyType::ZeroVolume);
        assert_eq!(anomalies[0].count, 2);
        assert_eq!(anomalies[1].anomaly_type, AnomalyType::SuspiciousGap);
    }
}
