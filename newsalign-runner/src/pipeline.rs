//! Pipeline orchestration.
//!
//! Headlines are scored and aggregated once. Price bars are canonicalized
//! into ticker groups, then processed in chunks of `tickers_per_chunk`:
//! indicators → returns → sentiment merge. Each chunk's intermediate tables
//! are dropped once its rows are appended, which bounds peak memory.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use newsalign_core::data::{canonicalize, detect_anomalies, AnomalyReport};
use newsalign_core::domain::{DailySentiment, EnrichedRow, IndicatorRow, NewsItem, PriceBar, ScoredNewsItem};
use newsalign_core::sentiment::group_daily_by_ticker;
use newsalign_core::{
    aggregate_daily, compute_returns, merge_sentiment, score_news, IndicatorEngine, LeadingRowPolicy,
    LexiconModel, MergeReport, SentimentModel, SkippedTicker, ValidationError,
};

use crate::config::{ConfigError, PipelineConfig, PipelineSection};
use crate::data_loader::{load_inputs, LoadError, LoadOptions, LoadedData};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOptions {
    pub leading_rows: LeadingRowPolicy,
    /// Worker threads; 0 uses the global rayon pool.
    pub threads: usize,
    pub tickers_per_chunk: usize,
    /// Keep each ticker's indicator table in the output for diagnostics.
    pub keep_indicator_tables: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::from(&PipelineSection::default())
    }
}

impl From<&PipelineSection> for PipelineOptions {
    fn from(section: &PipelineSection) -> Self {
        Self {
            leading_rows: section.leading_rows,
            threads: section.threads,
            tickers_per_chunk: section.tickers_per_chunk.max(1),
            keep_indicator_tables: section.keep_indicator_tables,
        }
    }
}

/// Everything a pipeline run produces.
#[derive(Debug, Clone, Default)]
pub struct PipelineOutput {
    /// Final table, sorted by (ticker, date).
    pub rows: Vec<EnrichedRow>,
    pub scored_news: Vec<ScoredNewsItem>,
    pub daily_sentiment: Vec<DailySentiment>,
    /// Per-ticker indicator rows, including tickers that produced none
    /// (empty unless `keep_indicator_tables`).
    pub indicator_tables: BTreeMap<String, Vec<IndicatorRow>>,
    pub skipped: Vec<SkippedTicker>,
    pub merge_report: MergeReport,
    pub anomalies: Vec<AnomalyReport>,
    /// News tickers with no price data at all.
    pub unmatched_news_tickers: Vec<String>,
    pub duplicates_removed: usize,
    pub invalid_removed: usize,
    pub model_version: String,
}

/// Run the full pipeline on in-memory inputs.
pub fn run_pipeline(
    bars: Vec<PriceBar>,
    news: Vec<NewsItem>,
    opts: &PipelineOptions,
) -> Result<PipelineOutput, RunError> {
    if opts.threads > 0 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(opts.threads)
            .build()?;
        pool.install(|| run_stages(bars, news, opts))
    } else {
        run_stages(bars, news, opts)
    }
}

fn run_stages(
    bars: Vec<PriceBar>,
    news: Vec<NewsItem>,
    opts: &PipelineOptions,
) -> Result<PipelineOutput, RunError> {
    let model = LexiconModel::default();
    let scored_news = score_news(news, &model);
    let daily_sentiment = aggregate_daily(&scored_news);
    info!(
        headlines = scored_news.len(),
        daily = daily_sentiment.len(),
        model = model.version(),
        "sentiment scored"
    );

    let canonical = canonicalize(bars);
    let anomalies = detect_anomalies(&canonical.groups);
    for a in &anomalies {
        warn!(ticker = %a.ticker, kind = ?a.anomaly_type, count = a.count, "price data anomaly");
    }

    let price_tickers: BTreeSet<&str> = canonical.groups.keys().map(String::as_str).collect();
    let mut daily_by_ticker = group_daily_by_ticker(&daily_sentiment);
    let unmatched_news_tickers: Vec<String> = daily_by_ticker
        .keys()
        .filter(|t| !price_tickers.contains(t.as_str()))
        .cloned()
        .collect();
    if !unmatched_news_tickers.is_empty() {
        warn!(
            count = unmatched_news_tickers.len(),
            "news tickers without price data"
        );
    }

    let engine = IndicatorEngine::standard();
    let mut out = PipelineOutput {
        scored_news,
        anomalies,
        unmatched_news_tickers,
        duplicates_removed: canonical.duplicates_removed,
        invalid_removed: canonical.invalid_removed,
        model_version: model.version().to_string(),
        ..Default::default()
    };

    let mut groups = canonical.groups.into_iter().peekable();
    let mut chunk_index = 0;
    while groups.peek().is_some() {
        let chunk: BTreeMap<String, Vec<PriceBar>> =
            groups.by_ref().take(opts.tickers_per_chunk).collect();
        let chunk_daily: Vec<DailySentiment> = chunk
            .keys()
            .filter_map(|t| daily_by_ticker.remove(t))
            .flatten()
            .collect();

        let engine_out = engine.compute_all(&chunk);
        drop(chunk);
        out.skipped.extend(engine_out.skipped);
        let indicator_rows: Vec<IndicatorRow> = if opts.keep_indicator_tables {
            let rows = engine_out.rows.values().flatten().cloned().collect();
            out.indicator_tables.extend(engine_out.rows);
            rows
        } else {
            engine_out.rows.into_values().flatten().collect()
        };
        let returns = compute_returns(indicator_rows);
        let (merged, report) = merge_sentiment(returns, &chunk_daily, opts.leading_rows)?;
        debug!(chunk = chunk_index, rows = merged.len(), "chunk merged");
        out.rows.extend(merged);
        out.merge_report.extend(report);
        chunk_index += 1;
    }
    out.skipped.sort_by(|a, b| a.ticker.cmp(&b.ticker));
    out.daily_sentiment = daily_sentiment;

    info!(
        rows = out.rows.len(),
        tickers = out.merge_report.per_ticker.len(),
        skipped = out.skipped.len(),
        chunks = chunk_index,
        "pipeline complete"
    );
    Ok(out)
}

/// A pipeline run together with the provenance of its inputs.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub output: PipelineOutput,
    pub inputs: InputSummary,
}

/// Input provenance recorded in manifests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputSummary {
    pub source: crate::data_loader::DataSource,
    pub dataset_hash: String,
    pub price_report: newsalign_core::data::IngestReport,
    pub news_report: newsalign_core::data::IngestReport,
}

impl InputSummary {
    fn from_loaded(loaded: &LoadedData) -> Self {
        Self {
            source: loaded.source,
            dataset_hash: loaded.dataset_hash.clone(),
            price_report: loaded.price_report.clone(),
            news_report: loaded.news_report.clone(),
        }
    }
}

/// Load inputs per `config` and run the pipeline.
pub fn run_from_config(config: &PipelineConfig) -> Result<RunOutcome, RunError> {
    config.validate()?;
    let loaded = load_inputs(&LoadOptions::from(&config.data))?;
    let inputs = InputSummary::from_loaded(&loaded);
    let output = run_pipeline(loaded.bars, loaded.news, &PipelineOptions::from(&config.pipeline))?;
    Ok(RunOutcome { output, inputs })
}
