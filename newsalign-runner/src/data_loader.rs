//! Input loading for the runner.
//!
//! Resolution policy:
//! 1. `synthetic` set → generate synthetic bars and headlines (tagged)
//! 2. Otherwise → read the price directory and the news CSV
//! 3. Missing paths → fail with a clear error
//!
//! Synthetic data is a developer-only mode; manifests record it.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use newsalign_core::data::{load_news_file, load_price_dir, IngestError, IngestReport};
use newsalign_core::domain::{NewsItem, PriceBar};

use crate::config::DataConfig;
use crate::synthetic::{synthetic_bars, synthetic_news};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no price directory configured (set data.prices_dir, pass --prices, or use --synthetic)")]
    NoPricesDir,

    #[error("no news file configured (set data.news_path, pass --news, or use --synthetic)")]
    NoNewsPath,

    #[error("no price rows loaded from '{0}'")]
    EmptyPrices(PathBuf),

    #[error(transparent)]
    Ingest(#[from] IngestError),
}

/// Where the loaded data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Files,
    Synthetic,
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub prices_dir: Option<PathBuf>,
    pub news_path: Option<PathBuf>,
    pub synthetic: bool,
    pub synthetic_tickers: Vec<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl From<&DataConfig> for LoadOptions {
    fn from(cfg: &DataConfig) -> Self {
        Self {
            prices_dir: cfg.prices_dir.clone(),
            news_path: cfg.news_path.clone(),
            synthetic: cfg.synthetic,
            synthetic_tickers: cfg.synthetic_tickers.clone(),
            start: cfg.synthetic_start,
            end: cfg.synthetic_end,
        }
    }
}

/// Loaded prices and headlines with provenance.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub bars: Vec<PriceBar>,
    pub news: Vec<NewsItem>,
    pub price_report: IngestReport,
    pub news_report: IngestReport,
    pub source: DataSource,
    /// BLAKE3 over all loaded bars and headlines.
    pub dataset_hash: String,
}

impl LoadedData {
    pub fn is_synthetic(&self) -> bool {
        self.source == DataSource::Synthetic
    }
}

/// Load prices and news according to `opts`.
pub fn load_inputs(opts: &LoadOptions) -> Result<LoadedData, LoadError> {
    let (bars, news, price_report, news_report, source) = if opts.synthetic {
        warn!(
            tickers = opts.synthetic_tickers.len(),
            "generating synthetic data; results will be tagged as synthetic"
        );
        let mut bars = Vec::new();
        let mut news = Vec::new();
        for ticker in &opts.synthetic_tickers {
            let ticker = ticker.trim().to_uppercase();
            bars.extend(synthetic_bars(&ticker, opts.start, opts.end));
            news.extend(synthetic_news(&ticker, opts.start, opts.end));
        }
        let price_report = IngestReport {
            rows_read: bars.len(),
            rows_kept: bars.len(),
            ..Default::default()
        };
        let news_report = IngestReport {
            rows_read: news.len(),
            rows_kept: news.len(),
            ..Default::default()
        };
        (bars, news, price_report, news_report, DataSource::Synthetic)
    } else {
        let prices_dir = opts.prices_dir.as_ref().ok_or(LoadError::NoPricesDir)?;
        let news_path = opts.news_path.as_ref().ok_or(LoadError::NoNewsPath)?;
        let (bars, price_report) = load_price_dir(prices_dir)?;
        if bars.is_empty() {
            return Err(LoadError::EmptyPrices(prices_dir.clone()));
        }
        let (news, news_report) = load_news_file(news_path)?;
        (bars, news, price_report, news_report, DataSource::Files)
    };

    let dataset_hash = compute_dataset_hash(&bars, &news);
    info!(
        bars = bars.len(),
        headlines = news.len(),
        source = ?source,
        "inputs loaded"
    );
    Ok(LoadedData {
        bars,
        news,
        price_report,
        news_report,
        source,
        dataset_hash,
    })
}

/// Deterministic BLAKE3 hash over bars and headlines in load order.
fn compute_dataset_hash(bars: &[PriceBar], news: &[NewsItem]) -> String {
    let mut hasher = blake3::Hasher::new();
    for bar in bars {
        hasher.update(bar.ticker.as_bytes());
        hasher.update(bar.date.to_string().as_bytes());
        hasher.update(&bar.open.to_le_bytes());
        hasher.update(&bar.high.to_le_bytes());
        hasher.update(&bar.low.to_le_bytes());
        hasher.update(&bar.close.to_le_bytes());
        hasher.update(&bar.volume.to_le_bytes());
    }
    for item in news {
        hasher.update(item.stock.as_bytes());
        hasher.update(item.date.to_string().as_bytes());
        hasher.update(item.publisher.as_bytes());
        hasher.update(item.headline.as_bytes());
    }
    hasher.finalize().to_hex().to_string()
}
