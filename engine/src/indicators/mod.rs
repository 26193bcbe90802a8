// Technical indicators module
pub mod rsi;
pub mod sma;

pub use rsi::{rsi, Rsi};
pub use sma::{sma, Sma};

use serde_json::Value;

// Common trait for all indicators
pub trait IndicatorCalculator: Send + Sync {
    fn name(&self) -> &str;
    fn parameters(&self) -> Value; // Parameters used for this indicator instance

    /// One value per close, aligned with the input. `None` where the indicator
    /// has not warmed up yet or the value is not a finite number.
    fn calculate(&self, closes: &[f64]) -> Vec<Option<f64>>;

    /// Value at the most recent close.
    fn latest(&self, closes: &[f64]) -> Option<f64> {
        self.calculate(closes).last().copied().flatten()
    }
}
