//! News records: raw headlines, scored headlines, and daily aggregates.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A single news headline as delivered by ingestion.
///
/// `date` is the wall-clock timestamp of publication. Only its calendar day
/// matters for alignment with price bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub headline: String,
    pub publisher: String,
    pub stock: String,
    pub date: NaiveDateTime,
}

impl NewsItem {
    /// Calendar day of publication (time-of-day truncated).
    pub fn day(&self) -> NaiveDate {
        self.date.date()
    }
}

/// A news item with its polarity score attached. `sentiment` is in [-1, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredNewsItem {
    #[serde(flatten)]
    pub item: NewsItem,
    pub sentiment: f64,
}

/// Mean sentiment for one (ticker, day) pair that had at least one headline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySentiment {
    pub ticker: String,
    pub date: NaiveDate,
    pub mean_sentiment: f64,
    pub article_count: usize,
}
