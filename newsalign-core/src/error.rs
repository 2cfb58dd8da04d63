//! Input-contract errors shared by the core stages.
//!
//! Ingestion is responsible for clean input. The core stages re-check the
//! invariants they depend on and fail fast with one of these instead of
//! silently producing misaligned output.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{ticker}: dates out of order at {date} (series must be ascending)")]
    Unsorted { ticker: String, date: NaiveDate },

    #[error("{ticker}: duplicate bar for {date}")]
    DuplicateDate { ticker: String, date: NaiveDate },

    #[error("{ticker}: close at {date} is not a finite number")]
    NonFiniteClose { ticker: String, date: NaiveDate },

    #[error("{ticker}: negative price or volume at {date}")]
    NegativePrice { ticker: String, date: NaiveDate },

    #[error("series for '{expected}' contains a row for '{found}'")]
    MixedTickers { expected: String, found: String },

    #[error("{ticker}: duplicate daily sentiment for {date}")]
    DuplicateSentiment { ticker: String, date: NaiveDate },

    #[error("{ticker}: sentiment {value} at {date} is outside [-1, 1]")]
    SentimentOutOfRange {
        ticker: String,
        date: NaiveDate,
        value: f64,
    },
}
