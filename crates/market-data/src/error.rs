use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Line {line}: invalid value '{value}' for column {field}")]
    InvalidField {
        line: u64,
        field: &'static str,
        value: String,
    },

    #[error("Invalid record: {0}")]
    Record(#[from] core_types::CoreError),
}

pub type Result<T> = std::result::Result<T, DataError>;
