// Handler that turns an asset's recent candles into a trend analysis
use std::sync::Arc;
use tokio::sync::RwLock;

use super::helpers::closes_of;
use super::AssetAnalysis;
use crate::analysis::classify_with;
use crate::config::settings::TrendSettings;
use crate::data::market_data::{MarketDataProvider, MarketDataStore};
use crate::error::EngineError;
use trend_shared::models::{Candle, IndicatorResult};

pub async fn handle_analyze_asset(
    symbol: &str,
    lookback_days: u32,
    settings: &TrendSettings,
    market_data_store: Arc<RwLock<MarketDataStore>>,
) -> AssetAnalysis {
    let store = market_data_store.read().await;
    let fetched = store.fetch_candles(symbol, lookback_days);
    drop(store); // Classification runs without holding the lock

    analysis_from_fetch(symbol, fetched, settings)
}

/// Same as [`handle_analyze_asset`] against any provider.
pub fn analyze_with_provider(
    provider: &dyn MarketDataProvider,
    symbol: &str,
    lookback_days: u32,
    settings: &TrendSettings,
) -> AssetAnalysis {
    analysis_from_fetch(symbol, provider.fetch_candles(symbol, lookback_days), settings)
}

fn analysis_from_fetch(
    symbol: &str,
    fetched: Result<Vec<Candle>, EngineError>,
    settings: &TrendSettings,
) -> AssetAnalysis {
    let candles = match fetched {
        Ok(candles) => candles,
        Err(e) => {
            tracing::error!(symbol = %symbol, error_detail = ?e, "Failed to fetch candles for analysis");
            return AssetAnalysis::new(symbol, 0, IndicatorResult::failed(e.to_string()), settings);
        }
    };
    if candles.is_empty() {
        tracing::warn!(symbol = %symbol, "No candles available for analysis");
        return AssetAnalysis::new(
            symbol,
            0,
            IndicatorResult::failed(format!("no market data available for '{}'", symbol)),
            settings,
        );
    }

    let closes = closes_of(&candles);
    let result = classify_with(&closes, settings);
    tracing::info!(
        symbol = %symbol,
        candles = candles.len(),
        verdict = ?result.verdict,
        error = ?result.error,
        "Analysed asset"
    );
    AssetAnalysis::new(symbol, candles.len(), result, settings)
}
