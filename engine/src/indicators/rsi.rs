// Relative Strength Index (RSI) indicator implementation
//
// Wilder's method: the first `period` deltas seed the average gain and loss with a
// simple mean, then each later delta updates them with
//   avg = (avg * (period - 1) + x) / period
use super::IndicatorCalculator;
use serde_json::Value;

pub const DEFAULT_RSI_PERIOD: usize = 14;

/// RSI at the last close. `None` when fewer than `period + 1` closes are available,
/// when any close is not finite, or when the result is not a finite number.
pub fn rsi(closes: &[f64], period: usize) -> Option<f64> {
    Rsi::new(period).latest(closes)
}

/// Converts the smoothed averages into an RSI value.
///
/// No losses at all gives 100. A window with neither gains nor losses (flat
/// prices) gives 50.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    let value = if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            50.0
        } else {
            100.0
        }
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - (100.0 / (1.0 + rs))
    };
    value.is_finite().then_some(value)
}

fn split_delta(change: f64) -> (f64, f64) {
    if change > 0.0 {
        (change, 0.0)
    } else {
        (0.0, -change)
    }
}

pub struct Rsi {
    name: String,
    period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("RSI({})", period),
            period,
        }
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(DEFAULT_RSI_PERIOD)
    }
}

impl IndicatorCalculator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, closes: &[f64]) -> Vec<Option<f64>> {
        if self.period == 0 || closes.len() <= self.period {
            return vec![None; closes.len()];
        }
        // A single bad close would otherwise be read as a zero delta.
        if closes.iter().any(|c| !c.is_finite()) {
            return vec![None; closes.len()];
        }

        let period = self.period as f64;
        let mut results = vec![None; self.period]; // RSI needs 'period' initial changes

        let (gains, losses) = closes[..=self.period]
            .windows(2)
            .map(|w| split_delta(w[1] - w[0]))
            .fold((0.0, 0.0), |(g, l), (gain, loss)| (g + gain, l + loss));

        let mut avg_gain = gains / period;
        let mut avg_loss = losses / period;
        results.push(rsi_from_averages(avg_gain, avg_loss));

        for w in closes[self.period..].windows(2) {
            let (gain, loss) = split_delta(w[1] - w[0]);
            avg_gain = (avg_gain * (period - 1.0) + gain) / period;
            avg_loss = (avg_loss * (period - 1.0) + loss) / period;
            results.push(rsi_from_averages(avg_gain, avg_loss));
        }
        results
    }
}
