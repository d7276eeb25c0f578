//! Break-even solver settings

use serde::{Deserialize, Serialize};

fn default_lower_rate() -> f64 {
    0.001
}

fn default_upper_rate() -> f64 {
    0.15
}

fn default_tolerance() -> f64 {
    1_000.0
}

fn default_min_interval() -> f64 {
    0.0001
}

fn default_max_iterations() -> usize {
    50
}

/// Bounds and stopping rules for the withdrawal-rate bisection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakEvenConfig {
    /// Lowest withdrawal rate searched
    #[serde(default = "default_lower_rate")]
    pub lower_rate: f64,
    #[serde(default = "default_upper_rate")]
    pub upper_rate: f64,
    /// Absolute net-income gap (dollars) accepted as a match
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Stop once the bracketing interval is narrower than this
    #[serde(default = "default_min_interval")]
    pub min_interval: f64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

impl Default for BreakEvenConfig {
    fn default() -> Self {
        Self {
            lower_rate: default_lower_rate(),
            upper_rate: default_upper_rate(),
            tolerance: default_tolerance(),
            min_interval: default_min_interval(),
            max_iterations: default_max_iterations(),
        }
    }
}

impl BreakEvenConfig {
    pub(crate) fn validate(&self) -> Result<(), String> {
        if !(self.lower_rate >= 0.0 && self.lower_rate < self.upper_rate) {
            return Err(format!(
                "rate bounds [{}, {}] must satisfy 0 <= lower < upper",
                self.lower_rate, self.upper_rate
            ));
        }
        if self.tolerance <= 0.0 || self.min_interval <= 0.0 {
            return Err("tolerance and min_interval must be positive".into());
        }
        if self.max_iterations == 0 {
            return Err("max_iterations must be at least 1".into());
        }
        Ok(())
    }
}
