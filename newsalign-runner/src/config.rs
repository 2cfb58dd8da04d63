//! Pipeline configuration loaded from TOML.
//!
//! ```toml
//! [data]
//! prices_dir = "data/prices"
//! news_path = "data/news.csv"
//! synthetic = false
//!
//! [pipeline]
//! leading_rows = "drop"      # or "keep_empty"
//! threads = 0                # 0 = rayon default
//! tickers_per_chunk = 64
//! keep_indicator_tables = false  # also export per-ticker indicator rows
//!
//! [report]
//! output_dir = "out"
//! formats = ["csv", "json", "markdown"]
//! top_words = 20
//! top_publishers = 10
//! ```

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use newsalign_core::LeadingRowPolicy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Where input data comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory of `<TICKER>.csv` price files.
    pub prices_dir: Option<PathBuf>,
    /// News CSV with headline, publisher, date, stock columns.
    pub news_path: Option<PathBuf>,
    /// Generate synthetic data for `synthetic_tickers` instead of reading files.
    pub synthetic: bool,
    pub synthetic_tickers: Vec<String>,
    pub synthetic_start: NaiveDate,
    pub synthetic_end: NaiveDate,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            prices_dir: None,
            news_path: None,
            synthetic: false,
            synthetic_tickers: vec!["AAPL".into(), "MSFT".into(), "NVDA".into()],
            synthetic_start: NaiveDate::from_ymd_opt(2023, 1, 2).unwrap_or_default(),
            synthetic_end: NaiveDate::from_ymd_opt(2023, 12, 29).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSection {
    pub leading_rows: LeadingRowPolicy,
    /// Worker threads; 0 uses the global rayon pool.
    pub threads: usize,
    /// Tickers processed per chunk; bounds peak memory.
    pub tickers_per_chunk: usize,
    /// Retain every ticker's indicator table for export. Retained tables are
    /// held until the run ends.
    pub keep_indicator_tables: bool,
}

impl Default for PipelineSection {
    fn default() -> Self {
        Self {
            leading_rows: LeadingRowPolicy::Drop,
            threads: 0,
            tickers_per_chunk: 64,
            keep_indicator_tables: false,
        }
    }
}

/// Export formats for the enriched table and run metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Csv,
    Json,
    Parquet,
    Markdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSection {
    pub output_dir: PathBuf,
    pub formats: Vec<ExportFormat>,
    pub top_words: usize,
    pub top_publishers: usize,
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("out"),
            formats: vec![ExportFormat::Csv, ExportFormat::Json, ExportFormat::Markdown],
            top_words: 20,
            top_publishers: 10,
        }
    }
}

/// Complete pipeline configuration. Every field has a default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub data: DataConfig,
    pub pipeline: PipelineSection,
    pub report: ReportSection,
}

impl PipelineConfig {
    /// Load a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pipeline.tickers_per_chunk == 0 {
            return Err(ConfigError::Invalid(
                "pipeline.tickers_per_chunk must be at least 1".into(),
            ));
        }
        if self.data.synthetic {
            if self.data.synthetic_tickers.is_empty() {
                return Err(ConfigError::Invalid(
                    "data.synthetic requires at least one ticker".into(),
                ));
            }
            if self.data.synthetic_start > self.data.synthetic_end {
                return Err(ConfigError::Invalid(
                    "data.synthetic_start is after data.synthetic_end".into(),
                ));
            }
        }
        Ok(())
    }

    /// Short content hash of the configuration, recorded in manifests.
    pub fn config_hash(&self) -> String {
        let json = serde_json::to_vec(self).unwrap_or_default();
        blake3::hash(&json).to_hex()[..16].to_string()
    }
}
