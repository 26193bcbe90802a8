// Provider-shaped OHLC JSON: `[[timestamp_ms, open, high, low, close], ...]`
use crate::error::EngineError;
use serde_json::Value;
use trend_shared::models::Candle;

#[derive(Debug, Default)]
pub struct JsonLoad {
    pub candles: Vec<Candle>,
    pub skipped: usize,
}

/// Parses an OHLC document. Providers answer errors with an object
/// (`{"error": "..."}`) instead of an array; such a document yields no candles.
pub fn parse_ohlc_json(raw: &str) -> Result<JsonLoad, EngineError> {
    let document: Value = serde_json::from_str(raw)?;
    let Some(rows) = document.as_array() else {
        tracing::warn!(kind = json_kind(&document), "OHLC payload is not an array; treating as empty");
        return Ok(JsonLoad::default());
    };

    let mut load = JsonLoad::default();
    for (idx, row) in rows.iter().enumerate() {
        match Candle::from_json_row(row) {
            Some(candle) => load.candles.push(candle),
            None => {
                tracing::warn!(row = idx, "Skipping malformed OHLC row");
                load.skipped += 1;
            }
        }
    }
    Ok(load)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
