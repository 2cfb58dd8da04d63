//! Reporting: summaries, headline statistics and export.

pub mod export;
pub mod markdown;
pub mod summary;
pub mod text_stats;

pub use export::{
    export_daily_sentiment_csv, export_enriched_csv, export_scored_news_csv, save_outputs,
    table_fingerprint, OutputPaths, RunManifest, SkippedEntry,
};
pub use markdown::render_report;
pub use summary::{summarize, TickerSummary};
pub use text_stats::NewsStats;
