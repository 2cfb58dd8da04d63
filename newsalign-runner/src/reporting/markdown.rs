//! Markdown run report.

use std::fmt::Write;

use newsalign_core::data::AnomalyType;

use super::export::RunManifest;
use super::summary::TickerSummary;
use super::text_stats::NewsStats;

fn anomaly_label(kind: AnomalyType) -> &'static str {
    match kind {
        AnomalyType::OhlcInconsistent => "high/low not bounding open/close",
        AnomalyType::ZeroVolume => "zero volume",
        AnomalyType::SuspiciousGap => "a gap of more than ten days before it",
    }
}

fn opt(v: Option<f64>) -> String {
    v.map(|x| format!("{x:+.3}")).unwrap_or_else(|| "n/a".into())
}

/// Render a run report: provenance, per-ticker table, headline statistics.
pub fn render_report(manifest: &RunManifest, summaries: &[TickerSummary], stats: &NewsStats) -> String {
    let mut report = String::new();
    let source = if manifest.synthetic { "synthetic" } else { "files" };
    let _ = write!(
        report,
        "# News Alignment Report\n\n\
Config hash: `{}`\n\n\
## Summary\n\
- Source: {}\n\
- Dataset hash: `{}`\n\
- Sentiment model: {}\n\
- Rows: {}\n\
- Tickers: {}\n\
- Headlines: {}\n\
- Table fingerprint: `{}`\n",
        manifest.config_hash,
        source,
        manifest.dataset_hash,
        manifest.model_version,
        manifest.rows,
        manifest.tickers,
        manifest.headlines,
        manifest.table_fingerprint,
    );

    if !summaries.is_empty() {
        report.push_str("\n## Tickers\n\n");
        report.push_str("| Ticker | Rows | From | To | Close | RSI 14 | MACD hist | Mean sentiment | Mean return |\n");
        report.push_str("|--------|------|------|----|-------|--------|-----------|----------------|-------------|\n");
        for s in summaries {
            let _ = writeln!(
                report,
                "| {} | {} | {} | {} | {:.2} | {:.1} | {:+.4} | {} | {:+.3}% |",
                s.ticker,
                s.rows,
                s.first_date,
                s.last_date,
                s.last_close,
                s.last_rsi_14,
                s.last_macd_hist,
                opt(s.mean_sentiment),
                s.mean_daily_return * 100.0,
            );
        }
    }

    let has_warnings = !manifest.skipped.is_empty()
        || !manifest.merge.no_overlap.is_empty()
        || !manifest.unmatched_news_tickers.is_empty()
        || !manifest.anomalies.is_empty()
        || manifest.invalid_removed > 0;
    if has_warnings {
        report.push_str("\n## Warnings\n\n");
        for s in &manifest.skipped {
            let _ = writeln!(report, "- skipped {}: {}", s.ticker, s.reason);
        }
        for t in &manifest.merge.no_overlap {
            let _ = writeln!(report, "- {t}: no headline on or before any price date");
        }
        for a in &manifest.anomalies {
            let _ = writeln!(
                report,
                "- {}: {} bar(s) with {}",
                a.ticker,
                a.count,
                anomaly_label(a.anomaly_type)
            );
        }
        if manifest.invalid_removed > 0 {
            let _ = writeln!(
                report,
                "- {} bar(s) removed for non-finite or negative prices",
                manifest.invalid_removed
            );
        }
        if !manifest.unmatched_news_tickers.is_empty() {
            let _ = writeln!(
                report,
                "- headlines for tickers without prices: {}",
                manifest.unmatched_news_tickers.join(", ")
            );
        }
    }

    report.push_str("\n## Headlines\n\n");
    let len = &stats.headline_length;
    let _ = writeln!(
        report,
        "- Headlines: {}\n- Length (chars): mean {:.1}, min {}, max {}",
        len.count, len.mean, len.min, len.max
    );

    if !stats.top_publishers.is_empty() {
        report.push_str("\n### Top Publishers\n");
        report.push_str("| Publisher | Articles |\n|-----------|----------|\n");
        for c in &stats.top_publishers {
            let _ = writeln!(report, "| {} | {} |", c.key, c.count);
        }
    }

    if !stats.top_words.is_empty() {
        report.push_str("\n### Top Words\n");
        report.push_str("| Word | Count |\n|------|-------|\n");
        for c in &stats.top_words {
            let _ = writeln!(report, "| {} | {} |", c.key, c.count);
        }
    }

    if !stats.articles_per_weekday.is_empty() {
        report.push_str("\n### Articles per Weekday\n");
        report.push_str("| Day | Articles |\n|-----|----------|\n");
        for c in &stats.articles_per_weekday {
            let _ = writeln!(report, "| {} | {} |", c.key, c.count);
        }
    }

    report
}
