use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("No records fall within the year {year}")]
    EmptyPartition { year: i32 },

    #[error("Vectors must have the same length (actual: {actual}, predicted: {predicted})")]
    ShapeMismatch { actual: usize, predicted: usize },

    #[error("Year {0} is not a four-digit year")]
    InvalidYear(i32),

    #[error("Year range {start}..={end} is empty")]
    InvalidRange { start: i32, end: i32 },

    #[error("Not enough data to perform calculation: {0}")]
    NotEnoughData(String),
}
