//! Threshold policy and unit scaling shared by all checks.

use serde::Serialize;

/// Converts a raw byte count to decimal megabytes (1 MB = 1 000 000 bytes).
pub fn to_mb(bytes: u64) -> f64 {
    bytes as f64 / 1_000_000.0
}

/// 75 % of `max`, floored to an integer level.
pub fn warn_level(max: f64) -> u64 {
    (max * 0.75) as u64
}

/// 90 % of `max`, floored to an integer level.
pub fn crit_level(max: f64) -> u64 {
    (max * 0.90) as u64
}

/// A named trend value with warn/crit levels and lower/upper boundaries.
///
/// Metric names are stable across cycles; the consumer keys trend storage
/// by them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub name: &'static str,
    pub value: f64,
    pub warn: u64,
    pub crit: u64,
    pub lower: f64,
    pub upper: f64,
}

impl Metric {
    /// Builds a metric whose levels and boundaries all derive from one `max`.
    pub fn scaled(name: &'static str, value: f64, max: f64) -> Self {
        Self {
            name,
            value,
            warn: warn_level(max),
            crit: crit_level(max),
            lower: 0.0,
            upper: max,
        }
    }
}

impl std::fmt::Display for Metric {
    /// Plugin perfdata notation: `name=value;warn;crit;lower;upper`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}={:.2};{};{};{};{}",
            self.name, self.value, self.warn, self.crit, self.lower, self.upper
        )
    }
}
