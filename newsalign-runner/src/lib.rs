//! newsalign runner: pipeline orchestration, configuration and reporting.
//!
//! This crate builds on `newsalign-core` to provide:
//! - TOML configuration with a stable config hash
//! - Input loading from CSV files, with a deterministic synthetic fallback
//! - The chunked, parallel pipeline from raw bars and headlines to the
//!   enriched table
//! - Headline statistics, per-ticker summaries and CSV/JSON/Parquet/Markdown
//!   export

pub mod config;
pub mod data_loader;
pub mod pipeline;
pub mod reporting;
pub mod synthetic;

pub use config::{ConfigError, DataConfig, ExportFormat, PipelineConfig, PipelineSection, ReportSection};
pub use data_loader::{load_inputs, DataSource, LoadError, LoadOptions, LoadedData};
pub use pipeline::{run_from_config, run_pipeline, InputSummary, PipelineOptions, PipelineOutput, RunError, RunOutcome};
pub use reporting::{save_outputs, table_fingerprint, NewsStats, OutputPaths, RunManifest, TickerSummary};
pub use synthetic::{synthetic_bars, synthetic_news, write_synthetic_dataset, SyntheticFiles};
