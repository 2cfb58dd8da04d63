//! Data ingestion, canonicalization and table conversion.

pub mod canonicalize;
pub mod frame;
pub mod ingest;
pub mod schema;

pub use canonicalize::{canonicalize, detect_anomalies, AnomalyReport, AnomalyType, CanonicalBars};
pub use frame::{daily_sentiment_to_dataframe, enriched_to_dataframe, write_parquet, FrameError};
pub use ingest::{
    load_news_file, load_price_dir, load_price_file, parse_date, parse_timestamp, read_news, read_prices,
    DropReason, IngestError, IngestReport,
};
pub use schema::{EnrichedSchema, SchemaError, ENRICHED_COLUMNS};
