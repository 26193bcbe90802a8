// Formatting helpers shared by every surface that renders an IndicatorResult.

/// Placeholder printed for indicators that could not be computed.
pub const UNAVAILABLE: &str = "—";

/// Formats an optional figure with a fixed number of decimals, or [`UNAVAILABLE`].
pub fn format_optional(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => UNAVAILABLE.to_string(),
    }
}
