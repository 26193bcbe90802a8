// Simple Moving Average (SMA) indicator implementation
use super::IndicatorCalculator;
use serde_json::Value;

/// Mean of the last `window` values, or `None` when there are fewer than `window`
/// values (or `window` is zero). A non-finite mean is also reported as `None`.
pub fn sma(values: &[f64], window: usize) -> Option<f64> {
    if window == 0 || values.len() < window {
        return None;
    }
    mean(&values[values.len() - window..])
}

fn mean(window: &[f64]) -> Option<f64> {
    let avg = window.iter().sum::<f64>() / window.len() as f64;
    avg.is_finite().then_some(avg)
}

pub struct Sma {
    name: String,
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("SMA({})", period),
            period,
        }
    }
}

impl IndicatorCalculator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, closes: &[f64]) -> Vec<Option<f64>> {
        if self.period == 0 || closes.len() < self.period {
            return vec![None; closes.len()];
        }

        let mut results = vec![None; self.period - 1]; // No SMA for the warm-up
        results.extend(closes.windows(self.period).map(mean));
        results
    }

    fn latest(&self, closes: &[f64]) -> Option<f64> {
        sma(closes, self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Option<f64>, expected: f64) {
        let value = actual.expect("expected a value");
        assert!((value - expected).abs() < 1e-9, "{} != {}", value, expected);
    }

    #[test]
    fn test_sma_uses_most_recent_window() {
        assert_eq!(sma(&[1.0, 2.0, 3.0, 4.0, 5.0], 3), Some(4.0));
    }

    #[test]
    fn test_sma_insufficient_data() {
        let values = [1.0, 2.0, 3.0];
        for window in 4..10 {
            assert_eq!(sma(&values, window), None);
        }
        assert_eq!(sma(&[], 1), None);
    }

    #[test]
    fn test_sma_zero_window() {
        assert_eq!(sma(&[1.0, 2.0], 0), None);
    }

    #[test]
    fn test_sma_window_equals_length() {
        assert_close(sma(&[2.0, 4.0, 6.0], 3), 4.0);
    }

    #[test]
    fn test_sma_non_finite_input() {
        assert_eq!(sma(&[1.0, f64::NAN, 3.0], 2), None);
        // The NaN falls outside the trailing window.
        assert_eq!(sma(&[f64::NAN, 2.0, 4.0], 2), Some(3.0));
    }

    #[test]
    fn test_sma_calculation_series() {
        let results = Sma::new(3).calculate(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(results, vec![None, None, Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn test_sma_period_one() {
        let results = Sma::new(1).calculate(&[1.0, 2.0, 3.0]);
        assert_eq!(results, vec![Some(1.0), Some(2.0), Some(3.0)]);
    }

    #[test]
    fn test_sma_series_insufficient_data() {
        assert_eq!(Sma::new(3).calculate(&[1.0, 2.0]), vec![None, None]);
        assert!(Sma::new(3).calculate(&[]).is_empty());
    }

    #[test]
    fn test_sma_latest_matches_series_tail() {
        let closes: Vec<f64> = (1..=40).map(|i| i as f64 * 1.5).collect();
        let calc = Sma::new(10);
        assert_eq!(calc.latest(&closes), *calc.calculate(&closes).last().unwrap());
        assert_eq!(calc.name(), "SMA(10)");
        assert_eq!(calc.parameters(), serde_json::json!({ "period": 10 }));
    }
}
