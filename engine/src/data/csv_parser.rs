use anyhow::{anyhow, Result};
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use trend_shared::models::{Candle, OHLC_ROW_FIELDS};

// Timestamp formats accepted in the first CSV column
pub mod timestamp_format {
    use anyhow::{anyhow, Result};
    use chrono::{DateTime, NaiveDate, Utc};

    /// Accepts unix milliseconds (`1700000000000`), RFC 3339 (`2024-01-02T00:00:00Z`)
    /// or a bare date (`2024-01-02`, taken as midnight UTC).
    pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
        let s = s.trim();
        if let Ok(millis) = s.parse::<i64>() {
            return DateTime::from_timestamp_millis(millis)
                .ok_or_else(|| anyhow!("Timestamp '{}' is out of range", s));
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.with_timezone(&Utc));
        }
        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| anyhow!("Failed to parse timestamp '{}': {}", s, e))?;
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| anyhow!("Failed to build midnight for '{}'", s))?;
        Ok(DateTime::from_naive_utc_and_offset(midnight, Utc))
    }

}

/// Candles read from a CSV file plus the number of rows that were discarded.
#[derive(Debug, Default)]
pub struct CsvLoad {
    pub candles: Vec<Candle>,
    pub skipped: usize,
}

pub struct OhlcCsvParser;

impl OhlcCsvParser {
    // CSV Header: timestamp,open,high,low,close[,anything else]
    // Example Row: 2024-01-02,42120.5,45500,41800,45050.25,1200.5
    pub fn load_candles_from_csv(file_path: &Path, delimiter: u8) -> Result<CsvLoad> {
        let file = File::open(file_path)
            .map_err(|e| anyhow!("Failed to open CSV file '{}': {}", file_path.display(), e))?;
        let mut rdr = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true) // short rows are skipped below instead of failing the whole file
            .trim(csv::Trim::All)
            .from_reader(BufReader::new(file));

        let mut load = CsvLoad::default();
        for (idx, result) in rdr.records().enumerate() {
            let line = idx + 2;
            let record = result.map_err(|e| anyhow!("Error reading CSV record at line {}: {}", line, e))?;
            match Self::parse_record(&record) {
                Ok(candle) => load.candles.push(candle),
                Err(e) => {
                    tracing::warn!(
                        path = %file_path.display(),
                        line,
                        error_detail = %e,
                        "Skipping malformed candle row"
                    );
                    load.skipped += 1;
                }
            }
        }
        Ok(load)
    }

    fn parse_record(record: &StringRecord) -> Result<Candle> {
        if record.len() < OHLC_ROW_FIELDS {
            return Err(anyhow!(
                "expected at least {} fields, found {}",
                OHLC_ROW_FIELDS,
                record.len()
            ));
        }
        let timestamp = timestamp_format::parse_timestamp(&record[0])?;
        let open = Self::parse_price(record, 1, "open")?;
        let high = Self::parse_price(record, 2, "high")?;
        let low = Self::parse_price(record, 3, "low")?;
        let close = Self::parse_price(record, 4, "close")?;
        Ok(Candle { timestamp, open, high, low, close })
    }

    fn parse_price(record: &StringRecord, pos: usize, name: &str) -> Result<f64> {
        let raw = &record[pos];
        let value = raw
            .parse::<f64>()
            .map_err(|e| anyhow!("Error parsing '{}' value '{}': {}", name, raw, e))?;
        if !value.is_finite() {
            return Err(anyhow!("'{}' value '{}' is not a finite number", name, raw));
        }
        Ok(value)
    }
}
