use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum number of fields in a provider OHLC row: `[timestamp_ms, open, high, low, close]`.
pub const OHLC_ROW_FIELDS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    /// Builds a candle from a provider row `[timestamp_ms, open, high, low, close, ...]`.
    ///
    /// Returns `None` for malformed rows: fewer than five fields, a non-finite value,
    /// or a timestamp chrono cannot represent. Extra trailing fields are ignored.
    pub fn from_fields(fields: &[f64]) -> Option<Self> {
        if fields.len() < OHLC_ROW_FIELDS {
            return None;
        }
        if fields[..OHLC_ROW_FIELDS].iter().any(|v| !v.is_finite()) {
            return None;
        }
        let timestamp = DateTime::from_timestamp_millis(fields[0] as i64)?;
        Some(Candle {
            timestamp,
            open: fields[1],
            high: fields[2],
            low: fields[3],
            close: fields[4],
        })
    }

    /// Same rule as [`Candle::from_fields`] for a JSON array row such as `[1700000000000, 1.0, 2.0, 0.5, 1.5]`.
    pub fn from_json_row(row: &serde_json::Value) -> Option<Self> {
        let items = row.as_array()?;
        if items.len() < OHLC_ROW_FIELDS {
            return None;
        }
        let fields = items[..OHLC_ROW_FIELDS]
            .iter()
            .map(serde_json::Value::as_f64)
            .collect::<Option<Vec<f64>>>()?;
        Self::from_fields(&fields)
    }
}

/// First-vs-last close comparison over the analysed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Neutral,
}

impl Direction {
    pub fn between(first: f64, last: f64) -> Self {
        if last > first {
            Direction::Up
        } else if last < first {
            Direction::Down
        } else {
            Direction::Neutral
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Neutral => "Neutral",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendVerdict {
    Bullish,
    Bearish,
    Neutral,
    OverboughtCaution,
    OversoldOpportunity,
}

impl fmt::Display for TrendVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TrendVerdict::Bullish => "Bullish",
            TrendVerdict::Bearish => "Bearish",
            TrendVerdict::Neutral => "Neutral",
            TrendVerdict::OverboughtCaution => "Overbought (caution, correction likely)",
            TrendVerdict::OversoldOpportunity => "Oversold (possible rebound)",
        };
        f.write_str(label)
    }
}

/// Output of one trend analysis.
///
/// Every indicator field is optional: `None` means there was not enough history
/// for it, which is an expected state. `error` is set only when the analysis as a
/// whole is unavailable, in which case `verdict` is `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorResult {
    pub verdict: Option<TrendVerdict>,
    pub direction: Option<Direction>,
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    pub rsi: Option<f64>,
    pub rationale: Option<String>,
    pub error: Option<String>,
}

impl IndicatorResult {
    pub fn failed(message: impl Into<String>) -> Self {
        IndicatorResult {
            error: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// True when a verdict was produced but at least one indicator was unavailable.
    pub fn is_partial(&self) -> bool {
        !self.is_error()
            && (self.sma_short.is_none() || self.sma_long.is_none() || self.rsi.is_none())
    }
}
