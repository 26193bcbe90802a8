// Trend analysis built on top of the indicator calculators
pub mod trend;

pub use trend::{analyze, classify, classify_with, decide, Decision};
