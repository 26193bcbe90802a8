// Handler that ingests a candle file into the market data store
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::helpers::{source_format, SourceFormat};
use crate::data::csv_parser::OhlcCsvParser;
use crate::data::market_data::MarketDataStore;
use crate::data::ohlc_json::parse_ohlc_json;
use crate::error::EngineError;

/// Loads `path` for `symbol` and returns how many candles the symbol now has.
pub async fn handle_load_file(
    symbol: &str,
    path: &Path,
    csv_delimiter: u8,
    market_data_store: Arc<RwLock<MarketDataStore>>,
) -> Result<usize, EngineError> {
    let (candles, skipped) = match source_format(path) {
        SourceFormat::Csv => {
            // csv reads synchronously; keep it off the runtime threads
            let csv_path = path.to_path_buf();
            let load = tokio::task::spawn_blocking(move || {
                OhlcCsvParser::load_candles_from_csv(&csv_path, csv_delimiter)
            })
            .await
            .map_err(|e| anyhow::anyhow!("CSV load task failed: {}", e))??;
            (load.candles, load.skipped)
        }
        SourceFormat::Json => {
            let raw = tokio::fs::read_to_string(path).await?;
            let load = parse_ohlc_json(&raw)?;
            (load.candles, load.skipped)
        }
    };

    let parsed = candles.len();
    if parsed == 0 {
        tracing::warn!(symbol = %symbol, path = %path.display(), skipped, "No usable candles in file");
    }

    let mut store = market_data_store.write().await;
    let stored = store.add_candles(symbol, candles);
    drop(store);

    tracing::info!(
        symbol = %symbol,
        path = %path.display(),
        parsed,
        skipped,
        stored,
        "Loaded candles"
    );
    Ok(stored)
}
