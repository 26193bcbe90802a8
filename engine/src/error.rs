use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("JSON error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },

    #[error("Market data store error: {0}")]
    MarketDataError(String),

    #[error("insufficient data for analysis: {available} closes, need at least {required}")]
    InsufficientData { available: usize, required: usize },

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),
}
