//! Break-even solver results
//!
//! A best-effort answer is always returned; [`BreakEvenStatus`] and the
//! optional [`ConvergenceWarning`] say whether it actually met the tolerance.

use serde::{Deserialize, Serialize};

/// Why the bisection stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakEvenStatus {
    /// The income gap fell within tolerance
    Converged,
    /// The bracketing interval shrank below the minimum width first
    IntervalCollapsed,
    /// The iteration cap was reached first
    IterationLimit,
}

/// Attached to every non-converged result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceWarning {
    pub status: BreakEvenStatus,
    pub iterations: usize,
    /// Projected minus target net income at the returned rate
    pub final_gap: f64,
    pub message: String,
}

/// One bisection step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakEvenIteration {
    pub iteration: usize,
    pub rate: f64,
    pub net_income: f64,
    /// Projected minus target net income
    pub gap: f64,
}

/// Withdrawal rate reproducing a target net income
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakEvenAnalysis {
    pub scenario: String,
    pub rate: f64,
    pub projected_net_income: f64,
    pub target_net_income: f64,
    /// Calendar year the income was compared in
    pub year: i16,
    pub iterations: usize,
    pub status: BreakEvenStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<ConvergenceWarning>,
    pub trace: Vec<BreakEvenIteration>,
}

impl BreakEvenAnalysis {
    #[must_use]
    pub fn converged(&self) -> bool {
        self.status == BreakEvenStatus::Converged
    }

    #[must_use]
    pub fn gap(&self) -> f64 {
        self.projected_net_income - self.target_net_income
    }
}
