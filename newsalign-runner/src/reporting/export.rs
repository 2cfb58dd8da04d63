//! Export: CSV tables, JSON manifest, Parquet and the output bundle.
//!
//! CSV output has a fixed column order and float format, so identical input
//! always yields byte-identical files. `table_fingerprint` hashes that CSV.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use newsalign_core::data::{
    daily_sentiment_to_dataframe, enriched_to_dataframe, write_parquet, AnomalyReport, IngestReport,
    ENRICHED_COLUMNS,
};
use newsalign_core::domain::{DailySentiment, EnrichedRow, IndicatorRow, ScoredNewsItem};
use newsalign_core::MergeReport;

use super::markdown::render_report;
use super::summary::{summarize, TickerSummary};
use super::text_stats::NewsStats;
use crate::config::{ExportFormat, PipelineConfig};
use crate::data_loader::DataSource;
use crate::pipeline::RunOutcome;

/// Current schema version of the manifest.
pub const SCHEMA_VERSION: u32 = 1;

fn float(v: f64) -> String {
    format!("{v:.8}")
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export the enriched table. An absent sentiment is an empty field.
pub fn export_enriched_csv(rows: &[EnrichedRow]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(ENRICHED_COLUMNS)?;

    for r in rows {
        let bar = r.bar();
        let ind = &r.indicators;
        wtr.write_record([
            bar.ticker.clone(),
            bar.date.to_string(),
            float(bar.open),
            float(bar.high),
            float(bar.low),
            float(bar.close),
            bar.volume.to_string(),
            float(ind.sma_20),
            float(ind.sma_50),
            float(ind.rsi_14),
            float(ind.macd),
            float(ind.macd_signal),
            float(ind.macd_hist),
            float(r.daily_return),
            float(r.next_day_return),
            r.sentiment.map(float).unwrap_or_default(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export scored headlines: date, stock, publisher, sentiment, headline.
pub fn export_scored_news_csv(scored: &[ScoredNewsItem]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "stock", "publisher", "sentiment", "headline"])?;
    for s in scored {
        wtr.write_record([
            s.item.date.format("%Y-%m-%d %H:%M:%S").to_string(),
            s.item.stock.clone(),
            s.item.publisher.clone(),
            float(s.sentiment),
            s.item.headline.clone(),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export the daily sentiment table.
pub fn export_daily_sentiment_csv(daily: &[DailySentiment]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["ticker", "date", "mean_sentiment", "article_count"])?;
    for d in daily {
        wtr.write_record([
            d.ticker.clone(),
            d.date.to_string(),
            float(d.mean_sentiment),
            d.article_count.to_string(),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export retained per-ticker indicator tables, warm-up trimmed, in ticker
/// then date order.
pub fn export_indicator_csv<'a>(rows: impl IntoIterator<Item = &'a IndicatorRow>) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(&ENRICHED_COLUMNS[..13])?;
    for r in rows {
        let bar = &r.bar;
        wtr.write_record([
            bar.ticker.clone(),
            bar.date.to_string(),
            float(bar.open),
            float(bar.high),
            float(bar.low),
            float(bar.close),
            bar.volume.to_string(),
            float(r.sma_20),
            float(r.sma_50),
            float(r.rsi_14),
            float(r.macd),
            float(r.macd_signal),
            float(r.macd_hist),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// BLAKE3 hex digest of the canonical CSV export of `rows`.
pub fn table_fingerprint(rows: &[EnrichedRow]) -> Result<String> {
    let csv = export_enriched_csv(rows)?;
    Ok(blake3::hash(csv.as_bytes()).to_hex().to_string())
}

// ─── Manifest ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedEntry {
    pub ticker: String,
    pub reason: String,
}

/// Run manifest: configuration, provenance, counts and fingerprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub schema_version: u32,
    pub config_hash: String,
    pub config: PipelineConfig,
    pub source: DataSource,
    pub synthetic: bool,
    pub dataset_hash: String,
    pub model_version: String,
    pub table_fingerprint: String,
    pub rows: usize,
    pub tickers: usize,
    pub headlines: usize,
    pub price_ingest: IngestReport,
    pub news_ingest: IngestReport,
    pub duplicates_removed: usize,
    pub invalid_removed: usize,
    pub anomalies: Vec<AnomalyReport>,
    pub skipped: Vec<SkippedEntry>,
    pub unmatched_news_tickers: Vec<String>,
    pub merge: MergeReport,
}

impl RunManifest {
    pub fn build(outcome: &RunOutcome, config: &PipelineConfig) -> Result<Self> {
        let out = &outcome.output;
        Ok(Self {
            schema_version: SCHEMA_VERSION,
            config_hash: config.config_hash(),
            config: config.clone(),
            source: outcome.inputs.source,
            synthetic: outcome.inputs.source == DataSource::Synthetic,
            dataset_hash: outcome.inputs.dataset_hash.clone(),
            model_version: out.model_version.clone(),
            table_fingerprint: table_fingerprint(&out.rows)?,
            rows: out.rows.len(),
            tickers: out.merge_report.per_ticker.len(),
            headlines: out.scored_news.len(),
            price_ingest: outcome.inputs.price_report.clone(),
            news_ingest: outcome.inputs.news_report.clone(),
            duplicates_removed: out.duplicates_removed,
            invalid_removed: out.invalid_removed,
            anomalies: out.anomalies.clone(),
            skipped: out
                .skipped
                .iter()
                .map(|s| SkippedEntry {
                    ticker: s.ticker.clone(),
                    reason: s.error.to_string(),
                })
                .collect(),
            unmatched_news_tickers: out.unmatched_news_tickers.clone(),
            merge: out.merge_report.clone(),
        })
    }
}

// ─── Output bundle ──────────────────────────────────────────────────

/// Paths of the files written by [`save_outputs`].
#[derive(Debug, Clone, Default)]
pub struct OutputPaths {
    pub enriched_csv: Option<PathBuf>,
    pub scored_news_csv: Option<PathBuf>,
    pub daily_sentiment_csv: Option<PathBuf>,
    pub indicators_csv: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
    pub news_stats: Option<PathBuf>,
    pub summaries: Option<PathBuf>,
    pub parquet: Option<PathBuf>,
    pub daily_sentiment_parquet: Option<PathBuf>,
    pub report_markdown: Option<PathBuf>,
}

fn write(path: PathBuf, content: &str) -> Result<PathBuf> {
    std::fs::write(&path, content).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

/// Write every configured export format into `output_dir`.
pub fn save_outputs(outcome: &RunOutcome, config: &PipelineConfig, output_dir: &Path) -> Result<OutputPaths> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output dir: {}", output_dir.display()))?;
    let out = &outcome.output;
    let mut paths = OutputPaths::default();
    let summaries: Vec<TickerSummary> = summarize(&out.rows);
    let stats = NewsStats::from_scored(
        &out.scored_news,
        config.report.top_words,
        config.report.top_publishers,
    );

    for format in &config.report.formats {
        match format {
            ExportFormat::Csv => {
                paths.enriched_csv = Some(write(
                    output_dir.join("enriched.csv"),
                    &export_enriched_csv(&out.rows)?,
                )?);
                paths.scored_news_csv = Some(write(
                    output_dir.join("scored_news.csv"),
                    &export_scored_news_csv(&out.scored_news)?,
                )?);
                paths.daily_sentiment_csv = Some(write(
                    output_dir.join("daily_sentiment.csv"),
                    &export_daily_sentiment_csv(&out.daily_sentiment)?,
                )?);
                if !out.indicator_tables.is_empty() {
                    paths.indicators_csv = Some(write(
                        output_dir.join("indicators.csv"),
                        &export_indicator_csv(out.indicator_tables.values().flatten())?,
                    )?);
                }
            }
            ExportFormat::Json => {
                let manifest = RunManifest::build(outcome, config)?;
                let json = serde_json::to_string_pretty(&manifest)
                    .context("failed to serialize run manifest")?;
                paths.manifest = Some(write(output_dir.join("manifest.json"), &json)?);

                let json = serde_json::to_string_pretty(&stats)
                    .context("failed to serialize headline statistics")?;
                paths.news_stats = Some(write(output_dir.join("news_stats.json"), &json)?);

                let json = serde_json::to_string_pretty(&summaries)
                    .context("failed to serialize ticker summaries")?;
                paths.summaries = Some(write(output_dir.join("summaries.json"), &json)?);
            }
            ExportFormat::Parquet => {
                let path = output_dir.join("enriched.parquet");
                let df = enriched_to_dataframe(&out.rows).context("failed to build enriched table")?;
                write_parquet(&df, &path).context("failed to write enriched parquet")?;
                paths.parquet = Some(path);

                let path = output_dir.join("daily_sentiment.parquet");
                let df = daily_sentiment_to_dataframe(&out.daily_sentiment)
                    .context("failed to build daily sentiment table")?;
                write_parquet(&df, &path).context("failed to write daily sentiment parquet")?;
                paths.daily_sentiment_parquet = Some(path);
            }
            ExportFormat::Markdown => {
                let manifest = RunManifest::build(outcome, config)?;
                let md = render_report(&manifest, &summaries, &stats);
                paths.report_markdown = Some(write(output_dir.join("report.md"), &md)?);
            }
        }
    }
    Ok(paths)
}
