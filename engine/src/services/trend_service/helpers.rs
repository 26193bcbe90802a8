// Helper functions shared by the trend_service handlers
use crate::error::EngineError;
use std::path::Path;
use trend_shared::models::Candle;

pub fn closes_of(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Json,
}

/// Picks the loader from the file extension; anything that is not `.json` is read as CSV.
pub fn source_format(path: &Path) -> SourceFormat {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => SourceFormat::Json,
        _ => SourceFormat::Csv,
    }
}

pub fn csv_delimiter_byte(delimiter: char) -> Result<u8, EngineError> {
    u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| EngineError::ConfigError(format!("CSV delimiter '{}' must be a single ASCII character", delimiter)))
}
