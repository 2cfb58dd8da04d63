//! newsalign core: price/news alignment and the technical indicator pipeline.
//!
//! - Domain types (price bars, news items, indicator/return/enriched rows)
//! - Indicators (SMA, EMA, RSI, MACD) behind the `Indicator` trait
//! - Per-ticker indicator engine with warm-up trimming
//! - Return calculator (daily and next-day look-ahead returns)
//! - Headline sentiment scoring and daily aggregation
//! - Per-ticker forward-fill merge of sentiment onto price rows
//! - CSV ingestion, canonicalization and Polars/Parquet conversion

pub mod align;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod indicator;
pub mod indicators;
pub mod returns;
pub mod sentiment;

pub use align::{merge_sentiment, LeadingRowPolicy, MergeReport, TickerMergeStats};
pub use engine::{EngineError, EngineOutput, IndicatorEngine, SkippedTicker};
pub use error::ValidationError;
pub use returns::compute_returns;
pub use sentiment::{aggregate_daily, score_news, LexiconModel, SentimentModel};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types handed across worker threads are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::PriceBar>();
        require_sync::<domain::PriceBar>();
        require_send::<domain::NewsItem>();
        require_sync::<domain::NewsItem>();
        require_send::<domain::ScoredNewsItem>();
        require_sync::<domain::ScoredNewsItem>();
        require_send::<domain::DailySentiment>();
        require_sync::<domain::DailySentiment>();
        require_send::<domain::IndicatorRow>();
        require_sync::<domain::IndicatorRow>();
        require_send::<domain::ReturnRow>();
        require_sync::<domain::ReturnRow>();
        require_send::<domain::EnrichedRow>();
        require_sync::<domain::EnrichedRow>();

        require_send::<indicator::IndicatorValues>();
        require_sync::<indicator::IndicatorValues>();
        require_send::<IndicatorEngine>();
        require_sync::<IndicatorEngine>();
        require_send::<EngineOutput>();
        require_sync::<EngineOutput>();
        require_send::<MergeReport>();
        require_sync::<MergeReport>();
        require_send::<LexiconModel>();
        require_sync::<LexiconModel>();
    }
}
