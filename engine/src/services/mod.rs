// Services exposed by the engine
pub mod trend_service;

pub use trend_service::{AssetAnalysis, TrendAnalysisService};
