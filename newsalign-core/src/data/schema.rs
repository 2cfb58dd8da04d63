use polars::prelude::*;

/// Output columns of the enriched table, in order.
pub const ENRICHED_COLUMNS: [&str; 16] = [
    "ticker",
    "date",
    "open",
    "high",
    "low",
    "close",
    "volume",
    "sma_20",
    "sma_50",
    "rsi_14",
    "macd",
    "macd_signal",
    "macd_hist",
    "daily_return",
    "next_day_return",
    "sentiment",
];

/// Expected schema of the enriched table.
pub struct EnrichedSchema;

impl EnrichedSchema {
    pub fn schema() -> Schema {
        Schema::from_iter(ENRICHED_COLUMNS.iter().map(|name| {
            let dtype = match *name {
                "ticker" => DataType::String,
                "date" => DataType::Date,
                "volume" => DataType::UInt64,
                _ => DataType::Float64,
            };
            Field::new((*name).into(), dtype)
        }))
    }

    /// Validate a DataFrame against the schema: every column present with
    /// the expected type.
    pub fn validate(df: &DataFrame) -> Result<(), SchemaError> {
        let expected = Self::schema();
        let actual = df.schema();

        for field in expected.iter_fields() {
            let actual_dtype = actual
                .get(field.name())
                .ok_or_else(|| SchemaError::MissingColumn(field.name().to_string()))?;
            if actual_dtype != field.dtype() {
                return Err(SchemaError::TypeMismatch {
                    column: field.name().to_string(),
                    expected: field.dtype().clone(),
                    actual: actual_dtype.clone(),
                });
            }
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Type mismatch in column {column}: expected {expected:?}, got {actual:?}")]
    TypeMismatch {
        column: String,
        expected: DataType,
        actual: DataType,
    },
}
