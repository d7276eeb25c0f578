use thiserror::Error;

/// Errors raised while building or running a deterministic projection.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    /// A scenario names a participant that is not in the household
    #[error("scenario '{scenario}' references unknown participant '{name}'")]
    UnknownParticipant { scenario: String, name: String },
    /// A death event sets both or neither of `death_age` / `death_date`
    #[error("malformed mortality spec for '{name}': {reason}")]
    MalformedMortality { name: String, reason: &'static str },
    /// Any other semantic configuration problem
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// A requested year index lies beyond the projection horizon
    #[error("year index {index} is outside the {horizon}-year horizon")]
    YearOutOfBounds { index: usize, horizon: usize },
    /// No year in the horizon has every living participant fully retired
    #[error("no fully retired year within the {horizon}-year horizon")]
    NoRetiredYear { horizon: usize },
    #[error(transparent)]
    Market(#[from] MarketError),
    /// Projection was stopped between years by a cancellation signal
    #[error("projection cancelled")]
    Cancelled,
}

impl ProjectionError {
    /// True for the configuration-class errors (unknown participant, malformed mortality,
    /// invalid configuration).
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ProjectionError::UnknownParticipant { .. }
                | ProjectionError::MalformedMortality { .. }
                | ProjectionError::InvalidConfiguration(_)
        )
    }
}

/// Errors related to market data and distribution sampling
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarketError {
    /// Historical dataset is absent or shorter than the caller requires
    #[error("insufficient historical data: {available} usable years, {required} required")]
    InsufficientData { available: usize, required: usize },
    #[error("historical series '{series}' has no value for {year}")]
    MissingValue { series: String, year: i16 },
    #[error("invalid {series} distribution parameters (mean={mean}, std_dev={std_dev}): {reason}")]
    InvalidDistributionParameters {
        series: &'static str,
        mean: f64,
        std_dev: f64,
        reason: &'static str,
    },
    /// Fund weights must be non-negative and sum to 1
    #[error("asset allocation weights sum to {sum}, expected 1.0")]
    InvalidAllocation { sum: f64 },
}

/// Errors surfaced by a Monte Carlo batch
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Projection(#[from] ProjectionError),
    #[error(transparent)]
    Market(#[from] MarketError),
    /// Cancelled before any trial completed
    #[error("monte carlo simulation cancelled")]
    Cancelled,
    /// Too many trials hit internal errors for the batch to be meaningful
    #[error("{failed} of {total} trials errored (first error: {first_error})")]
    SystemicFailure {
        failed: usize,
        total: usize,
        first_error: String,
    },
    #[error("invalid simulation configuration: {0}")]
    Config(String),
}
