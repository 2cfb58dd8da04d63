//! Domain types for newsalign.

pub mod bar;
pub mod news;
pub mod row;

pub use bar::PriceBar;
pub use news::{DailySentiment, NewsItem, ScoredNewsItem};
pub use row::{EnrichedRow, IndicatorRow, ReturnRow};
