//! Projection and Monte Carlo results
//!
//! Plain data handed to external formatters, plus the shared progress handle
//! used to observe and cancel a running batch.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

use super::{AnnualCashFlow, StatisticalParameters, TspAllocation, WithdrawalSpec};

/// Requested withdrawals exceeded what the TSP could fund by more than this.
pub const DEPLETION_THRESHOLD: f64 = 1.0;

/// First year the TSP could not fund the requested withdrawals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Depletion {
    pub year_index: usize,
    pub year: i16,
}

/// A full deterministic projection for one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub scenario: String,
    pub cash_flows: Vec<AnnualCashFlow>,
    pub depletion: Option<Depletion>,
    /// Year index at which the projection stopped because no participant was
    /// alive, if it stopped early
    pub truncated_at: Option<usize>,
}

impl Projection {
    #[must_use]
    pub fn final_balance(&self) -> f64 {
        self.cash_flows
            .last()
            .map_or(0.0, |cf| cf.total_tsp_balance)
    }

    #[must_use]
    pub fn year(&self, year: i16) -> Option<&AnnualCashFlow> {
        self.cash_flows.iter().find(|cf| cf.year == year)
    }
}

/// Outcome of one Monte Carlo trial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationTrial {
    pub index: usize,
    pub seed: u64,
    pub success: bool,
    pub depletion_year: Option<i16>,
    /// Full years funded before depletion, or the horizon if never depleted
    pub longevity_years: usize,
    pub ending_balance: f64,
    /// Net income in the final projected year
    pub ending_net_income: f64,
    /// Total TSP balance at the end of each projected year
    pub balances: Vec<f64>,
    pub net_incomes: Vec<f64>,
    /// Set only when `MonteCarloConfig::retain_cash_flows` is on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cash_flows: Option<Vec<AnnualCashFlow>>,
}

/// P10/P25/P50/P75/P90 of a distribution
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PercentileSummary {
    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
}

/// Percentile bands for one projection year across trials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearBand {
    pub year_index: usize,
    pub year: i16,
    /// Trials that produced a record for this year
    pub trials: usize,
    pub balance: PercentileSummary,
    pub net_income: PercentileSummary,
}

/// Which market model drove the trials
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingMode {
    /// Same-year joint bootstrap from historical data
    #[default]
    Historical,
    /// Independent normal draws per series
    Statistical,
}

/// Aggregate of a Monte Carlo batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub scenario: String,
    pub trials_requested: usize,
    /// Trials that ran to completion or errored
    pub trials_run: usize,
    pub trials_successful: usize,
    pub trials_depleted: usize,
    pub trials_errored: usize,
    pub success_rate: f64,
    pub ending_balance: PercentileSummary,
    pub net_income: PercentileSummary,
    pub median_tsp_longevity_years: f64,
    pub yearly_bands: Vec<YearBand>,
    /// Cancelled before every trial ran
    pub partial: bool,
    pub seed: u64,
    pub mode: SamplingMode,
    pub warnings: Vec<String>,
    pub trials: Vec<SimulationTrial>,
}

fn default_trials() -> usize {
    1000
}

fn default_min_historical_years() -> usize {
    30
}

fn default_systemic_failure_threshold() -> f64 {
    0.25
}

/// Monte Carlo run parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloConfig {
    #[serde(default = "default_trials")]
    pub trials: usize,
    /// Overrides `GlobalAssumptions::projection_years`
    #[serde(default)]
    pub projection_years: Option<usize>,
    #[serde(default)]
    pub mode: SamplingMode,
    /// Applied to every participant when set
    #[serde(default)]
    pub allocation: Option<TspAllocation>,
    /// Applied to every participant when set
    #[serde(default)]
    pub withdrawal: Option<WithdrawalSpec>,
    /// Drawn from the OS when absent and reported in the result
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub statistical: StatisticalParameters,
    /// Historical mode falls back to statistical below this many usable years
    #[serde(default = "default_min_historical_years")]
    pub min_historical_years: usize,
    /// Worker threads; defaults to available cores
    #[serde(default)]
    pub max_workers: Option<usize>,
    #[serde(default = "default_systemic_failure_threshold")]
    pub systemic_failure_threshold: f64,
    #[serde(default)]
    pub retain_cash_flows: bool,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            trials: default_trials(),
            projection_years: None,
            mode: SamplingMode::default(),
            allocation: None,
            withdrawal: None,
            seed: None,
            statistical: StatisticalParameters::default(),
            min_historical_years: default_min_historical_years(),
            max_workers: None,
            systemic_failure_threshold: default_systemic_failure_threshold(),
            retain_cash_flows: false,
        }
    }
}

/// Progress tracking for a Monte Carlo batch
#[derive(Debug, Clone)]
pub struct MonteCarloProgress {
    /// Completed trials counter
    completed: Arc<AtomicUsize>,
    /// Cancellation flag
    cancelled: Arc<AtomicBool>,
}

impl MonteCarloProgress {
    #[must_use]
    pub fn new() -> Self {
        Self {
            completed: Arc::new(AtomicUsize::new(0)),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn increment(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.completed.store(0, Ordering::Relaxed);
        self.cancelled.store(false, Ordering::Relaxed);
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

impl Default for MonteCarloProgress {
    fn default() -> Self {
        Self::new()
    }
}
