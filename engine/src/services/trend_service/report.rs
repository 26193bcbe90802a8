// Plain-text rendering of an analysis, for terminals and logs
use serde::Serialize;
use std::fmt;

use crate::config::settings::TrendSettings;
use trend_shared::models::IndicatorResult;
use trend_shared::utils::{format_optional, UNAVAILABLE};

#[derive(Debug, Clone, Serialize)]
pub struct AssetAnalysis {
    pub symbol: String,
    pub candles_used: usize,
    pub result: IndicatorResult,
    #[serde(skip)]
    settings: TrendSettings,
}

impl AssetAnalysis {
    pub fn new(symbol: &str, candles_used: usize, result: IndicatorResult, settings: &TrendSettings) -> Self {
        AssetAnalysis {
            symbol: symbol.to_string(),
            candles_used,
            result,
            settings: settings.clone(),
        }
    }

    fn rsi_note(&self) -> &'static str {
        match self.result.rsi {
            Some(rsi) if rsi > self.settings.overbought => " (overbought)",
            Some(rsi) if rsi < self.settings.oversold => " (oversold)",
            _ => "",
        }
    }
}

impl fmt::Display for AssetAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(error) = &self.result.error {
            return write!(f, "{}: analysis unavailable: {}", self.symbol, error);
        }

        let s = &self.settings;
        writeln!(f, "{} trend analysis over {} candles", self.symbol, self.candles_used)?;
        let direction = self
            .result
            .direction
            .map_or_else(|| UNAVAILABLE.to_string(), |d| d.to_string());
        writeln!(f, "  Direction (first vs last): {}", direction)?;
        if let Some(verdict) = self.result.verdict {
            writeln!(
                f,
                "  Verdict (SMA{} vs SMA{} & RSI): {}",
                s.short_period, s.long_period, verdict
            )?;
        }
        writeln!(
            f,
            "  RSI({}): {}{}",
            s.rsi_period,
            format_optional(self.result.rsi, 2),
            self.rsi_note()
        )?;
        write!(
            f,
            "  SMA{}: {} | SMA{}: {}",
            s.short_period,
            format_optional(self.result.sma_short, 4),
            s.long_period,
            format_optional(self.result.sma_long, 4)
        )?;
        if let Some(rationale) = &self.result.rationale {
            write!(f, "\n  Why: {}", rationale)?;
        }
        Ok(())
    }
}
