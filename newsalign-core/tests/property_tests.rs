//! Property tests for pipeline invariants.
//!
//! 1. Indicator rows are date-ascending with no duplicates
//! 2. SMA_20 is the trailing 20-close mean
//! 3. RSI stays in [0, 100]; MACD histogram == line - signal
//! 4. Return identities hold between consecutive rows
//! 5. Forward-filled sentiment equals the latest daily value on or before the row date
//! 6. Short series produce no rows

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use std::collections::BTreeMap;

use newsalign_core::domain::{DailySentiment, PriceBar};
use newsalign_core::{compute_returns, merge_sentiment, IndicatorEngine, LeadingRowPolicy};

// ── Strategies (proptest) ────────────────────────────────────────────

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 2).unwrap()
}

fn arb_closes(min: usize, max: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec((1.0..500.0_f64).prop_map(|p| (p * 100.0).round() / 100.0), min..max)
}

/// Bars on strictly increasing dates with random 1..=3 day gaps.
fn bars_from(ticker: &str, closes: &[f64], gaps: &[i64]) -> Vec<PriceBar> {
    let mut date = base_date();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            if i > 0 {
                date += Duration::days(gaps[i % gaps.len()]);
            }
            PriceBar {
                ticker: ticker.to_string(),
                date,
                open: close,
                high: close + 1.0,
                low: (close - 1.0).max(0.0),
                close,
                volume: 1_000,
            }
        })
        .collect()
}

fn arb_gaps() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(1..=3_i64, 1..8)
}

// ── 1-3. Indicator invariants ────────────────────────────────────────

proptest! {
    #[test]
    fn indicator_rows_sorted_and_unique(closes in arb_closes(50, 160), gaps in arb_gaps()) {
        let bars = bars_from("PROP", &closes, &gaps);
        let rows = IndicatorEngine::standard().compute("PROP", &bars).unwrap();
        for w in rows.windows(2) {
            prop_assert!(w[0].date() < w[1].date());
        }
    }

    #[test]
    fn sma_20_is_trailing_mean(closes in arb_closes(50, 160)) {
        let bars = bars_from("PROP", &closes, &[1]);
        let engine = IndicatorEngine::standard();
        let rows = engine.compute("PROP", &bars).unwrap();
        for (k, row) in rows.iter().enumerate() {
            let i = k + engine.warmup();
            let mean = closes[i - 19..=i].iter().sum::<f64>() / 20.0;
            prop_assert!((row.sma_20 - mean).abs() < 1e-9 * mean.max(1.0));
        }
    }

    #[test]
    fn rsi_bounded_and_hist_exact(closes in arb_closes(50, 160)) {
        let bars = bars_from("PROP", &closes, &[1]);
        let rows = IndicatorEngine::standard().compute("PROP", &bars).unwrap();
        for row in &rows {
            prop_assert!((0.0..=100.0).contains(&row.rsi_14));
            prop_assert_eq!(row.macd_hist, row.macd - row.macd_signal);
        }
    }

    #[test]
    fn short_series_produce_no_rows(closes in arb_closes(1, 26)) {
        let bars = bars_from("PROP", &closes, &[1]);
        let rows = IndicatorEngine::standard().compute("PROP", &bars).unwrap();
        prop_assert!(rows.is_empty());
    }
}

// ── 4. Return identities ─────────────────────────────────────────────

proptest! {
    #[test]
    fn return_identities(closes in arb_closes(52, 120)) {
        let bars = bars_from("PROP", &closes, &[1]);
        let rows = IndicatorEngine::standard().compute("PROP", &bars).unwrap();
        let n = rows.len();
        let closes_after: Vec<f64> = rows.iter().map(|r| r.close()).collect();
        let returns = compute_returns(rows);

        // First and last indicator rows lose a return each.
        prop_assert_eq!(returns.len(), n.saturating_sub(2));
        for (k, r) in returns.iter().enumerate() {
            let i = k + 1;
            let daily = (closes_after[i] - closes_after[i - 1]) / closes_after[i - 1];
            let next = (closes_after[i + 1] - closes_after[i]) / closes_after[i];
            prop_assert_eq!(r.daily_return, daily);
            prop_assert_eq!(r.next_day_return, next);
        }
        for w in returns.windows(2) {
            prop_assert_eq!(w[0].next_day_return, w[1].daily_return);
        }
    }
}

// ── 5. Forward-fill ──────────────────────────────────────────────────

fn arb_daily() -> impl Strategy<Value = BTreeMap<i64, f64>> {
    prop::collection::btree_map(0..200_i64, -1.0..=1.0_f64, 0..20)
}

proptest! {
    #[test]
    fn forward_fill_matches_latest_on_or_before(
        closes in arb_closes(52, 120),
        gaps in arb_gaps(),
        daily in arb_daily(),
        keep_leading in any::<bool>(),
    ) {
        let bars = bars_from("PROP", &closes, &gaps);
        let rows = IndicatorEngine::standard().compute("PROP", &bars).unwrap();
        let returns = compute_returns(rows);
        let all_dates: Vec<NaiveDate> = returns.iter().map(|r| r.date()).collect();

        let table: Vec<DailySentiment> = daily
            .iter()
            .map(|(offset, mean)| DailySentiment {
                ticker: "PROP".into(),
                date: base_date() + Duration::days(*offset),
                mean_sentiment: *mean,
                article_count: 1,
            })
            .collect();
        let policy = if keep_leading { LeadingRowPolicy::KeepEmpty } else { LeadingRowPolicy::Drop };
        let (merged, report) = merge_sentiment(returns, &table, policy).unwrap();

        let latest = |d: NaiveDate| table.iter().rev().find(|s| s.date <= d).map(|s| s.mean_sentiment);
        let overlap = all_dates.iter().any(|d| latest(*d).is_some());

        for row in &merged {
            prop_assert_eq!(row.sentiment, latest(row.date()));
        }
        if overlap && !keep_leading {
            // Rows before the first sentiment are absent; the rest are kept.
            let expected: Vec<NaiveDate> =
                all_dates.iter().copied().filter(|d| latest(*d).is_some()).collect();
            let got: Vec<NaiveDate> = merged.iter().map(|r| r.date()).collect();
            prop_assert_eq!(got, expected);
        } else {
            prop_assert_eq!(merged.len(), all_dates.len());
        }
        prop_assert_eq!(report.no_overlap.is_empty(), overlap || all_dates.is_empty());
    }
}
