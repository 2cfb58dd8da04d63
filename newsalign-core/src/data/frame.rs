//! Polars conversion and Parquet output for the result tables.

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use polars::prelude::*;
use thiserror::Error;

use super::schema::{EnrichedSchema, SchemaError};
use crate::domain::{DailySentiment, EnrichedRow};

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("polars: {0}")]
    Polars(#[from] PolarsError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("parquet file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn epoch_days(date: NaiveDate) -> i32 {
    (date - NaiveDate::default()).num_days() as i32
}

fn date_column(name: &str, dates: impl Iterator<Item = NaiveDate>) -> Result<Column, FrameError> {
    let days: Vec<i32> = dates.map(epoch_days).collect();
    Ok(Column::new(name.into(), days).cast(&DataType::Date)?)
}

/// Build the enriched table. Columns follow
/// [`ENRICHED_COLUMNS`](super::schema::ENRICHED_COLUMNS); an absent
/// sentiment becomes null.
pub fn enriched_to_dataframe(rows: &[EnrichedRow]) -> Result<DataFrame, FrameError> {
    let f = |get: fn(&EnrichedRow) -> f64| rows.iter().map(get).collect::<Vec<f64>>();

    let df = DataFrame::new(vec![
        Column::new(
            "ticker".into(),
            rows.iter().map(|r| r.ticker().to_string()).collect::<Vec<_>>(),
        ),
        date_column("date", rows.iter().map(|r| r.date()))?,
        Column::new("open".into(), f(|r| r.bar().open)),
        Column::new("high".into(), f(|r| r.bar().high)),
        Column::new("low".into(), f(|r| r.bar().low)),
        Column::new("close".into(), f(|r| r.bar().close)),
        Column::new(
            "volume".into(),
            rows.iter().map(|r| r.bar().volume).collect::<Vec<u64>>(),
        ),
        Column::new("sma_20".into(), f(|r| r.indicators.sma_20)),
        Column::new("sma_50".into(), f(|r| r.indicators.sma_50)),
        Column::new("rsi_14".into(), f(|r| r.indicators.rsi_14)),
        Column::new("macd".into(), f(|r| r.indicators.macd)),
        Column::new("macd_signal".into(), f(|r| r.indicators.macd_signal)),
        Column::new("macd_hist".into(), f(|r| r.indicators.macd_hist)),
        Column::new("daily_return".into(), f(|r| r.daily_return)),
        Column::new("next_day_return".into(), f(|r| r.next_day_return)),
        Column::new(
            "sentiment".into(),
            rows.iter().map(|r| r.sentiment).collect::<Vec<Option<f64>>>(),
        ),
    ])?;
    EnrichedSchema::validate(&df)?;
    Ok(df)
}

/// Build the daily sentiment table (ticker, date, mean_sentiment, article_count).
pub fn daily_sentiment_to_dataframe(daily: &[DailySentiment]) -> Result<DataFrame, FrameError> {
    Ok(DataFrame::new(vec![
        Column::new(
            "ticker".into(),
            daily.iter().map(|d| d.ticker.clone()).collect::<Vec<_>>(),
        ),
        date_column("date", daily.iter().map(|d| d.date))?,
        Column::new(
            "mean_sentiment".into(),
            daily.iter().map(|d| d.mean_sentiment).collect::<Vec<f64>>(),
        ),
        Column::new(
            "article_count".into(),
            daily.iter().map(|d| d.article_count as u64).collect::<Vec<u64>>(),
        ),
    ])?)
}

/// Write a DataFrame to a Parquet file.
pub fn write_parquet(df: &DataFrame, path: &Path) -> Result<(), FrameError> {
    let file = File::create(path).map_err(|source| FrameError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ParquetWriter::new(file).finish(&mut df.clone())?;
    Ok(())
}
