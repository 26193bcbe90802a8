// Engine main entry point
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};
use trend_engine::config::settings::{EngineSettings, OutputFormat};
use trend_engine::data::market_data::MarketDataStore;
use trend_engine::services::TrendAnalysisService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    info!("Starting trend engine...");

    // Optional first argument: path to a JSON settings file
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let settings = EngineSettings::load(config_path.as_deref())?;
    if settings.data.sources.is_empty() {
        error!("No data sources configured; add entries under data.sources in the settings file");
        return Err("no data sources configured".into());
    }

    let market_data_store = Arc::new(RwLock::new(MarketDataStore::new()));
    let service = TrendAnalysisService::new(market_data_store.clone(), settings.trend.clone())
        .with_csv_delimiter(settings.data.csv_delimiter)?;

    for source in &settings.data.sources {
        service.load_file(&source.symbol, &source.path).await?;
    }

    let symbols = market_data_store.read().await.symbols();
    for symbol in symbols {
        let analysis = service.analyze_asset(&symbol, settings.lookback_days).await;
        match settings.output {
            OutputFormat::Text => println!("{}\n", analysis),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&analysis)?),
        }
    }

    Ok(())
}
