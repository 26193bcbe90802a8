// engine/src/services/trend_service/mod.rs
// Hub for the trend analysis service: the TrendAnalysisService struct and its handlers.
use crate::config::settings::TrendSettings;
use crate::data::market_data::MarketDataStore;
use crate::error::EngineError;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

pub mod analyze_asset;
pub mod helpers;
pub mod load_candles;
pub mod report;

pub use report::AssetAnalysis;

pub struct TrendAnalysisService {
    market_data_store: Arc<RwLock<MarketDataStore>>,
    settings: TrendSettings,
    csv_delimiter: u8,
}

impl TrendAnalysisService {
    pub fn new(market_data_store: Arc<RwLock<MarketDataStore>>, settings: TrendSettings) -> Self {
        TrendAnalysisService {
            market_data_store,
            settings,
            csv_delimiter: b',',
        }
    }

    pub fn with_csv_delimiter(mut self, delimiter: char) -> Result<Self, EngineError> {
        self.csv_delimiter = helpers::csv_delimiter_byte(delimiter)?;
        Ok(self)
    }

    /// Loads a CSV or JSON candle file for `symbol`; returns the number of candles now stored.
    pub async fn load_file(&self, symbol: &str, path: &Path) -> Result<usize, EngineError> {
        tracing::info!(symbol = %symbol, path = %path.display(), "Received load request, dispatching to handler.");
        load_candles::handle_load_file(symbol, path, self.csv_delimiter, self.market_data_store.clone()).await
    }

    /// Classifies the last `lookback_days` days of `symbol`. Failures are reported
    /// inside the returned analysis, never as an `Err`.
    pub async fn analyze_asset(&self, symbol: &str, lookback_days: u32) -> AssetAnalysis {
        tracing::info!(symbol = %symbol, lookback_days, "Received analysis request, dispatching to handler.");
        analyze_asset::handle_analyze_asset(symbol, lookback_days, &self.settings, self.market_data_store.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use trend_shared::models::TrendVerdict;

    const DAY_MS: i64 = 86_400_000;
    const START_MS: i64 = 1_704_067_200_000;

    fn service() -> TrendAnalysisService {
        TrendAnalysisService::new(Arc::new(RwLock::new(MarketDataStore::new())), TrendSettings::default())
    }

    fn daily_csv(closes: impl IntoIterator<Item = f64>, delimiter: char) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "timestamp{d}open{d}high{d}low{d}close", d = delimiter).unwrap();
        for (day, close) in closes.into_iter().enumerate() {
            let ts = START_MS + day as i64 * DAY_MS;
            writeln!(file, "{ts}{d}{c}{d}{c}{d}{c}{d}{c}", ts = ts, c = close, d = delimiter).unwrap();
        }
        file
    }

    #[tokio::test]
    async fn test_load_csv_and_analyze() {
        let service = service();
        let file = daily_csv((1..=45).map(|i| i as f64), ',');

        let stored = service.load_file("BTC", file.path()).await.unwrap();
        assert_eq!(stored, 45);

        let analysis = service.analyze_asset("BTC", 30).await;
        assert_eq!(analysis.candles_used, 30);
        assert_eq!(analysis.result.verdict, Some(TrendVerdict::Bullish));
        assert_eq!(analysis.result.sma_long, Some(30.5));
    }

    #[tokio::test]
    async fn test_load_json_and_analyze_short_history() {
        let service = service();
        let rows: Vec<String> = (0..20)
            .map(|day| {
                let close = 100.0 - day as f64;
                format!("[{}, {c}, {c}, {c}, {c}]", START_MS + day * DAY_MS, c = close)
            })
            .collect();
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "[{}, [1, 2]]", rows.join(", ")).unwrap();

        assert_eq!(service.load_file("ETH", file.path()).await.unwrap(), 20);

        let analysis = service.analyze_asset("ETH", 30).await;
        assert_eq!(analysis.result.sma_long, None);
        assert_eq!(analysis.result.verdict, Some(TrendVerdict::OversoldOpportunity));
    }

    #[tokio::test]
    async fn test_custom_delimiter() {
        let service = service().with_csv_delimiter(';').unwrap();
        let file = daily_csv((1..=12).map(|i| i as f64), ';');
        assert_eq!(service.load_file("SOL", file.path()).await.unwrap(), 12);
    }

    #[tokio::test]
    async fn test_oversized_lookback_analyses_whole_history() {
        let service = service();
        let file = daily_csv((1..=20).map(|i| i as f64), ',');
        service.load_file("ADA", file.path()).await.unwrap();

        let analysis = service.analyze_asset("ADA", u32::MAX).await;
        assert_eq!(analysis.candles_used, 20);
        assert_eq!(analysis.result.verdict, Some(TrendVerdict::OverboughtCaution));
    }

    #[tokio::test]
    async fn test_unknown_symbol_is_error_state() {
        let analysis = service().analyze_asset("NOPE", 30).await;
        assert!(analysis.result.is_error());
        assert!(analysis.result.error.unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn test_missing_file_is_error() {
        let result = service().load_file("BTC", Path::new("/no/such/file.json")).await;
        assert!(matches!(result, Err(EngineError::IoError { .. })));
    }
}
