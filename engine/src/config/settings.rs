// Engine settings, loaded from a JSON file or the embedded defaults
use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Upper bound on `lookback_days` (about a century of daily candles).
pub const MAX_LOOKBACK_DAYS: u32 = 36_500;

const DEFAULT_CONFIG: &str = include_str!("../../assets/config/default.json");

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    /// Days of history, counted back from the newest candle, fed to the classifier.
    pub lookback_days: u32,
    pub output: OutputFormat,
    pub data: DataSettings,
    pub trend: TrendSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct DataSettings {
    pub csv_delimiter: char,
    pub sources: Vec<DataSource>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DataSource {
    pub symbol: String,
    pub path: PathBuf,
}

/// Indicator windows and decision thresholds used by the trend classifier.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct TrendSettings {
    pub short_period: usize,
    pub long_period: usize,
    pub rsi_period: usize,
    /// Below this many closes the analysis is reported as unavailable.
    pub min_closes: usize,
    pub trend_rsi_midpoint: f64,
    pub tiebreak_up_rsi: f64,
    pub tiebreak_down_rsi: f64,
    pub overbought: f64,
    pub oversold: f64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            lookback_days: 30,
            output: OutputFormat::Text,
            data: DataSettings::default(),
            trend: TrendSettings::default(),
        }
    }
}

impl Default for DataSettings {
    fn default() -> Self {
        DataSettings {
            csv_delimiter: ',',
            sources: Vec::new(),
        }
    }
}

impl Default for TrendSettings {
    fn default() -> Self {
        TrendSettings {
            short_period: 10,
            long_period: 30,
            rsi_period: 14,
            min_closes: 10,
            trend_rsi_midpoint: 50.0,
            tiebreak_up_rsi: 45.0,
            tiebreak_down_rsi: 55.0,
            overbought: 70.0,
            oversold: 30.0,
        }
    }
}

impl TrendSettings {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.short_period == 0 || self.long_period == 0 || self.rsi_period == 0 {
            return Err(EngineError::ConfigError("indicator periods must be greater than 0".to_string()));
        }
        if self.min_closes < 2 {
            return Err(EngineError::ConfigError(format!(
                "min_closes must be at least 2, got {}",
                self.min_closes
            )));
        }
        if self.oversold >= self.overbought {
            return Err(EngineError::ConfigError(format!(
                "oversold threshold ({}) must be below overbought threshold ({})",
                self.oversold, self.overbought
            )));
        }
        Ok(())
    }
}

impl EngineSettings {
    /// Embedded defaults shipped in `assets/config/default.json`.
    pub fn load_default() -> Result<Self, EngineError> {
        let settings: EngineSettings = serde_json::from_str(DEFAULT_CONFIG)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads `path` when given, otherwise the embedded defaults. Missing keys fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, EngineError> {
        let Some(path) = path else {
            return Self::load_default();
        };
        let raw = std::fs::read_to_string(path)?;
        let settings: EngineSettings = serde_json::from_str(&raw)?;
        settings.validate()?;
        tracing::debug!(path = %path.display(), sources = settings.data.sources.len(), "Loaded engine settings");
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.lookback_days == 0 || self.lookback_days > MAX_LOOKBACK_DAYS {
            return Err(EngineError::ConfigError(format!(
                "lookback_days must be between 1 and {}, got {}",
                MAX_LOOKBACK_DAYS, self.lookback_days
            )));
        }
        self.trend.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_embedded_defaults_match_default_impl() {
        assert_eq!(EngineSettings::load_default().unwrap(), EngineSettings::default());
        assert_eq!(EngineSettings::load(None).unwrap(), EngineSettings::default());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "output": "json", "data": {{ "csv_delimiter": ";", "sources": [{{ "symbol": "BTC", "path": "btc.csv" }}] }}, "trend": {{ "overbought": 80.0 }} }}"#
        )
        .unwrap();

        let settings = EngineSettings::load(Some(file.path())).unwrap();
        assert_eq!(settings.output, OutputFormat::Json);
        assert_eq!(settings.lookback_days, 30);
        assert_eq!(settings.data.csv_delimiter, ';');
        assert_eq!(settings.data.sources[0].symbol, "BTC");
        assert_eq!(settings.trend.overbought, 80.0);
        assert_eq!(settings.trend.rsi_period, 14);
    }

    #[test]
    fn test_load_missing_file() {
        let err = EngineSettings::load(Some(Path::new("/definitely/not/here.json"))).unwrap_err();
        assert!(matches!(err, EngineError::IoError { .. }));
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = EngineSettings::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, EngineError::JsonError { .. }));
    }

    #[test]
    fn test_validate_rejects_zero_period() {
        let trend = TrendSettings { rsi_period: 0, ..Default::default() };
        assert!(matches!(trend.validate(), Err(EngineError::ConfigError(_))));
    }

    #[test]
    fn test_validate_rejects_inverted_rsi_band() {
        let trend = TrendSettings { oversold: 75.0, overbought: 70.0, ..Default::default() };
        assert!(matches!(trend.validate(), Err(EngineError::ConfigError(_))));
    }

    #[test]
    fn test_validate_rejects_zero_lookback() {
        let settings = EngineSettings { lookback_days: 0, ..Default::default() };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_lookback() {
        let settings = EngineSettings { lookback_days: 200_000_000, ..Default::default() };
        assert!(matches!(settings.validate(), Err(EngineError::ConfigError(_))));

        let settings = EngineSettings { lookback_days: MAX_LOOKBACK_DAYS, ..Default::default() };
        assert!(settings.validate().is_ok());
    }
}
