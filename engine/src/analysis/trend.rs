// Trend classifier: SMA pair + RSI + first-vs-last direction -> one verdict
use crate::config::settings::TrendSettings;
use crate::error::EngineError;
use crate::indicators::{IndicatorCalculator, Rsi, Sma};
use trend_shared::models::{Direction, IndicatorResult, TrendVerdict};

#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub verdict: TrendVerdict,
    pub rationale: String,
}

impl Decision {
    fn new(verdict: TrendVerdict, rationale: String) -> Self {
        Decision { verdict, rationale }
    }
}

/// Classifies an oldest-to-newest close series with the default windows (SMA10, SMA30, RSI14).
pub fn classify(closes: &[f64]) -> IndicatorResult {
    classify_with(closes, &TrendSettings::default())
}

/// Entry point used by presentation code; identical to [`classify`].
pub fn analyze(closes: &[f64]) -> IndicatorResult {
    classify(closes)
}

/// Classifies `closes` using the windows and thresholds in `settings`.
///
/// Never fails: too little history or malformed closes come back as a result
/// whose `error` is set.
pub fn classify_with(closes: &[f64], settings: &TrendSettings) -> IndicatorResult {
    match try_classify(closes, settings) {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(closes = closes.len(), error_detail = %e, "Trend analysis unavailable");
            IndicatorResult::failed(e.to_string())
        }
    }
}

fn try_classify(closes: &[f64], settings: &TrendSettings) -> Result<IndicatorResult, EngineError> {
    if closes.len() < settings.min_closes {
        return Err(EngineError::InsufficientData {
            available: closes.len(),
            required: settings.min_closes,
        });
    }
    if let Some(idx) = closes.iter().position(|c| !c.is_finite()) {
        return Err(EngineError::MalformedInput(format!(
            "close at index {} is not a finite number",
            idx
        )));
    }

    let short = Sma::new(settings.short_period);
    let long = Sma::new(settings.long_period);
    let rsi_calc = Rsi::new(settings.rsi_period);

    let sma_short = short.latest(closes);
    let sma_long = long.latest(closes);
    let rsi = rsi_calc.latest(closes);
    let direction = match (closes.first(), closes.last()) {
        (Some(first), Some(last)) if closes.len() >= 2 => Some(Direction::between(*first, *last)),
        _ => None,
    };

    let decision = decide(sma_short, sma_long, rsi, direction, settings);
    tracing::debug!(
        short = %short.name(),
        long = %long.name(),
        rsi_params = %rsi_calc.parameters(),
        ?sma_short,
        ?sma_long,
        ?rsi,
        ?direction,
        verdict = ?decision.verdict,
        "Trend classified"
    );

    Ok(IndicatorResult {
        verdict: Some(decision.verdict),
        direction,
        sma_short,
        sma_long,
        rsi,
        rationale: Some(decision.rationale),
        error: None,
    })
}

/// Decision procedure; the first matching rule wins.
///
/// 1. Both averages and RSI known: a crossover agreeing with RSI around the
///    midpoint decides, otherwise the window direction breaks the tie.
/// 2. Some average missing but RSI known: only the overbought/oversold bands speak.
/// 3. RSI missing: neutral.
pub fn decide(
    sma_short: Option<f64>,
    sma_long: Option<f64>,
    rsi: Option<f64>,
    direction: Option<Direction>,
    settings: &TrendSettings,
) -> Decision {
    let short_label = format!("SMA{}", settings.short_period);
    let long_label = format!("SMA{}", settings.long_period);
    let midpoint = settings.trend_rsi_midpoint;

    match (sma_short, sma_long, rsi) {
        (Some(short), Some(long), Some(rsi)) => {
            if short > long && rsi > midpoint {
                Decision::new(
                    TrendVerdict::Bullish,
                    format!(
                        "{} {:.4} above {} {:.4} with RSI {:.2} above {}",
                        short_label, short, long_label, long, rsi, midpoint
                    ),
                )
            } else if short < long && rsi < midpoint {
                Decision::new(
                    TrendVerdict::Bearish,
                    format!(
                        "{} {:.4} below {} {:.4} with RSI {:.2} below {}",
                        short_label, short, long_label, long, rsi, midpoint
                    ),
                )
            } else if direction == Some(Direction::Up) && rsi > settings.tiebreak_up_rsi {
                Decision::new(
                    TrendVerdict::Bullish,
                    format!(
                        "moving averages inconclusive; price rose over the window with RSI {:.2} above {}",
                        rsi, settings.tiebreak_up_rsi
                    ),
                )
            } else if direction == Some(Direction::Down) && rsi < settings.tiebreak_down_rsi {
                Decision::new(
                    TrendVerdict::Bearish,
                    format!(
                        "moving averages inconclusive; price fell over the window with RSI {:.2} below {}",
                        rsi, settings.tiebreak_down_rsi
                    ),
                )
            } else {
                Decision::new(
                    TrendVerdict::Neutral,
                    format!(
                        "{} {:.4} vs {} {:.4} and RSI {:.2} give no clear direction",
                        short_label, short, long_label, long, rsi
                    ),
                )
            }
        }
        (_, _, Some(rsi)) => {
            let missing = [(sma_short, &short_label), (sma_long, &long_label)]
                .iter()
                .filter(|(value, _)| value.is_none())
                .map(|(_, label)| label.as_str())
                .collect::<Vec<_>>()
                .join(" and ");
            if rsi > settings.overbought {
                Decision::new(
                    TrendVerdict::OverboughtCaution,
                    format!(
                        "{} unavailable; RSI {:.2} above {} suggests a correction",
                        missing, rsi, settings.overbought
                    ),
                )
            } else if rsi < settings.oversold {
                Decision::new(
                    TrendVerdict::OversoldOpportunity,
                    format!(
                        "{} unavailable; RSI {:.2} below {} suggests a rebound",
                        missing, rsi, settings.oversold
                    ),
                )
            } else {
                Decision::new(
                    TrendVerdict::Neutral,
                    format!(
                        "{} unavailable; RSI {:.2} within {}-{}",
                        missing, rsi, settings.oversold, settings.overbought
                    ),
                )
            }
        }
        _ => Decision::new(
            TrendVerdict::Neutral,
            "RSI unavailable; not enough history for a verdict".to_string(),
        ),
    }
}
