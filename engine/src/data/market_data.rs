// In-memory candle storage and the provider interface the analysis service reads from
use crate::error::EngineError;
use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;
use trend_shared::models::Candle;

/// Source of OHLC candles for an asset.
///
/// Implementations return candles oldest-to-newest. They may return fewer candles
/// than the window could hold; callers must cope with short histories.
pub trait MarketDataProvider: Send + Sync {
    fn fetch_candles(&self, symbol: &str, lookback_days: u32) -> Result<Vec<Candle>, EngineError>;
}

pub struct MarketDataStore {
    // Candles per symbol, kept sorted by timestamp without duplicates
    data: HashMap<String, Vec<Candle>>,
}

impl MarketDataStore {
    pub fn new() -> Self {
        MarketDataStore {
            data: HashMap::new(),
        }
    }

    /// Merges `new_candles` into the symbol's history and returns the resulting length.
    /// A later candle with an already stored timestamp replaces nothing; the first one wins.
    pub fn add_candles(&mut self, symbol: &str, new_candles: Vec<Candle>) -> usize {
        let candles = self.data.entry(symbol.to_string()).or_default();
        candles.extend(new_candles);
        candles.sort_by_key(|c| c.timestamp); // stable: original insertion order kept for ties
        candles.dedup_by_key(|c| c.timestamp);
        candles.len()
    }

    pub fn get_candles(
        &self,
        symbol: &str,
        from_timestamp: Option<DateTime<Utc>>,
        to_timestamp: Option<DateTime<Utc>>,
    ) -> Option<Vec<Candle>> {
        self.data.get(symbol).map(|candles| {
            candles
                .iter()
                .filter(|c| from_timestamp.map_or(true, |start| c.timestamp >= start))
                .filter(|c| to_timestamp.map_or(true, |end| c.timestamp <= end))
                .cloned()
                .collect()
        })
    }

    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        symbols
    }
}

impl Default for MarketDataStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MarketDataProvider for MarketDataStore {
    /// Candles strictly newer than `lookback_days` days before the newest stored candle.
    fn fetch_candles(&self, symbol: &str, lookback_days: u32) -> Result<Vec<Candle>, EngineError> {
        let candles = self
            .data
            .get(symbol)
            .ok_or_else(|| EngineError::MarketDataError(format!("symbol '{}' not found", symbol)))?;
        let from = candles
            .last()
            .and_then(|newest| lookback_start(newest.timestamp, lookback_days));
        Ok(self.get_candles(symbol, from, None).unwrap_or_default())
    }
}

/// First instant inside the window, i.e. one nanosecond after `newest - lookback_days`.
/// `None` when that instant is before anything chrono can represent; the whole
/// history is then inside the window.
fn lookback_start(newest: DateTime<Utc>, lookback_days: u32) -> Option<DateTime<Utc>> {
    let window = TimeDelta::try_days(i64::from(lookback_days))?;
    newest
        .checked_sub_signed(window)?
        .checked_add_signed(TimeDelta::nanoseconds(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY_MS: i64 = 86_400_000;
    const START_MS: i64 = 1_704_067_200_000; // 2024-01-01T00:00:00Z

    fn daily_candle(day: i64, close: f64) -> Candle {
        Candle::from_fields(&[(START_MS + day * DAY_MS) as f64, close, close, close, close]).unwrap()
    }

    #[test]
    fn test_add_candles_sorts_and_dedups() {
        let mut store = MarketDataStore::new();
        store.add_candles("BTC", vec![daily_candle(2, 3.0), daily_candle(0, 1.0)]);
        let len = store.add_candles("BTC", vec![daily_candle(1, 2.0), daily_candle(2, 99.0)]);
        assert_eq!(len, 3);

        let closes: Vec<f64> = store.get_candles("BTC", None, None).unwrap().iter().map(|c| c.close).collect();
        assert_eq!(closes, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_get_candles_range_and_unknown_symbol() {
        let mut store = MarketDataStore::new();
        store.add_candles("ETH", (0..5).map(|d| daily_candle(d, d as f64)).collect());

        let from = daily_candle(1, 0.0).timestamp;
        let to = daily_candle(3, 0.0).timestamp;
        let window = store.get_candles("ETH", Some(from), Some(to)).unwrap();
        assert_eq!(window.len(), 3);
        assert_eq!(window[0].close, 1.0);

        assert!(store.get_candles("DOGE", None, None).is_none());
    }

    #[test]
    fn test_fetch_candles_lookback_relative_to_newest() {
        let mut store = MarketDataStore::new();
        store.add_candles("SOL", (0..45).map(|d| daily_candle(d, d as f64)).collect());

        let candles = store.fetch_candles("SOL", 30).unwrap();
        assert_eq!(candles.len(), 30);
        assert_eq!(candles.first().unwrap().close, 15.0);
        assert_eq!(candles.last().unwrap().close, 44.0);

        // Short history: everything available is returned.
        assert_eq!(store.fetch_candles("SOL", 365).unwrap().len(), 45);
    }

    #[test]
    fn test_fetch_candles_huge_lookback_returns_everything() {
        let mut store = MarketDataStore::new();
        store.add_candles("BTC", vec![daily_candle(0, 1.0), daily_candle(1, 2.0)]);

        let candles = store.fetch_candles("BTC", 200_000_000).unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(store.fetch_candles("BTC", u32::MAX).unwrap().len(), 2);
    }

    #[test]
    fn test_fetch_candles_empty_history() {
        let mut store = MarketDataStore::new();
        store.add_candles("BTC", Vec::new());
        assert!(store.fetch_candles("BTC", 30).unwrap().is_empty());
    }

    #[test]
    fn test_fetch_candles_unknown_symbol() {
        let store = MarketDataStore::default();
        assert!(matches!(store.fetch_candles("XRP", 30), Err(EngineError::MarketDataError(_))));
    }

    #[test]
    fn test_symbols_sorted() {
        let mut store = MarketDataStore::new();
        store.add_candles("ETH", vec![daily_candle(0, 1.0)]);
        store.add_candles("BTC", vec![daily_candle(0, 1.0)]);
        assert_eq!(store.symbols(), vec!["BTC".to_string(), "ETH".to_string()]);
    }
}
