//! Monte Carlo simulation over market paths
//!
//! Every trial gets its own seed derived from the batch seed and the trial
//! index, and its own [`MarketSampler`]. The projection engine and the
//! historical table are shared read-only, so trial outcomes do not depend on
//! how the worker pool schedules them.

use crate::aggregate::aggregate_trials;
use crate::error::{MarketError, ProjectionError, SimulationError};
use crate::market::{
    BootstrapTable, HistoricalBootstrap, HistoricalDataProvider, MarketSampler,
    StatisticalSampler,
};
use crate::model::{
    GenericScenario, GlobalAssumptions, Household, MonteCarloConfig, MonteCarloProgress,
    Projection, SamplingMode, SimulationResult, SimulationTrial, StatisticalParameters,
};
use crate::projection::ProjectionEngine;

/// SplitMix64 finalizer
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Seed for trial `index` of a batch seeded with `base_seed`
#[must_use]
pub fn trial_seed(base_seed: u64, index: usize) -> u64 {
    splitmix64(base_seed ^ splitmix64(index as u64))
}

/// Market model resolved for a batch
#[derive(Debug)]
enum TrialMarket {
    Historical(BootstrapTable),
    Statistical(StatisticalParameters),
}

impl TrialMarket {
    fn mode(&self) -> SamplingMode {
        match self {
            TrialMarket::Historical(_) => SamplingMode::Historical,
            TrialMarket::Statistical(_) => SamplingMode::Statistical,
        }
    }

    fn sampler(&self, seed: u64) -> Result<Box<dyn MarketSampler + '_>, MarketError> {
        Ok(match self {
            TrialMarket::Historical(table) => Box::new(HistoricalBootstrap::new(table, seed)),
            TrialMarket::Statistical(params) => Box::new(StatisticalSampler::new(params, seed)?),
        })
    }
}

/// Pick the market model, falling back from historical to statistical
/// sampling when the data cannot support the batch.
fn resolve_market(
    config: &MonteCarloConfig,
    history: Option<&dyn HistoricalDataProvider>,
    engine: &ProjectionEngine<'_>,
    warnings: &mut Vec<String>,
) -> Result<TrialMarket, SimulationError> {
    // Reject bad parameters up front even if historical data ends up used
    StatisticalSampler::new(&config.statistical, 0)?;

    if config.mode == SamplingMode::Statistical {
        return Ok(TrialMarket::Statistical(config.statistical));
    }

    let historical = match history {
        None => Err(MarketError::InsufficientData {
            available: 0,
            required: config.min_historical_years,
        }),
        Some(provider) => provider
            .validate_data_quality()
            .and_then(|_| BootstrapTable::build(provider, &engine.active_funds()))
            .and_then(|table| {
                if table.len() < config.min_historical_years {
                    Err(MarketError::InsufficientData {
                        available: table.len(),
                        required: config.min_historical_years,
                    })
                } else {
                    Ok(table)
                }
            }),
    };

    match historical {
        Ok(table) => Ok(TrialMarket::Historical(table)),
        Err(err) => {
            let warning = format!("historical sampling unavailable ({err}); using statistical sampling");
            tracing::warn!(%err, "falling back to statistical sampling");
            warnings.push(warning);
            Ok(TrialMarket::Statistical(config.statistical))
        }
    }
}

/// How a single trial ended
#[derive(Debug)]
enum TrialOutcome {
    Completed(Box<SimulationTrial>),
    Errored(String),
    /// Not run, or abandoned mid-horizon, because of cancellation
    Skipped,
}

fn summarize_trial(
    index: usize,
    seed: u64,
    projection: Projection,
    horizon: usize,
    retain_cash_flows: bool,
) -> SimulationTrial {
    let balances: Vec<f64> = projection
        .cash_flows
        .iter()
        .map(|cf| cf.total_tsp_balance)
        .collect();
    let net_incomes: Vec<f64> = projection.cash_flows.iter().map(|cf| cf.net_income).collect();

    SimulationTrial {
        index,
        seed,
        success: projection.depletion.is_none(),
        depletion_year: projection.depletion.map(|d| d.year),
        longevity_years: projection
            .depletion
            .map_or(horizon, |d| d.year_index.min(horizon)),
        ending_balance: projection.final_balance(),
        ending_net_income: net_incomes.last().copied().unwrap_or(0.0),
        balances,
        net_incomes,
        cash_flows: retain_cash_flows.then_some(projection.cash_flows),
    }
}

#[cfg(feature = "parallel")]
fn run_all<F>(
    trials: usize,
    max_workers: Option<usize>,
    run: F,
) -> Result<Vec<TrialOutcome>, SimulationError>
where
    F: Fn(usize) -> TrialOutcome + Send + Sync,
{
    use rayon::prelude::*;

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(workers) = max_workers {
        builder = builder.num_threads(workers);
    }
    let pool = builder
        .build()
        .map_err(|e| SimulationError::Config(format!("failed to build worker pool: {e}")))?;
    Ok(pool.install(|| (0..trials).into_par_iter().map(run).collect()))
}

#[cfg(not(feature = "parallel"))]
fn run_all<F>(
    trials: usize,
    _max_workers: Option<usize>,
    run: F,
) -> Result<Vec<TrialOutcome>, SimulationError>
where
    F: Fn(usize) -> TrialOutcome + Send + Sync,
{
    Ok((0..trials).map(run).collect())
}

/// Completed trials plus error/skip counts
#[derive(Debug)]
struct BatchOutcome {
    trials: Vec<SimulationTrial>,
    errored: usize,
    skipped: usize,
}

/// Split outcomes and apply the cancellation and systemic-failure rules.
fn collect_outcomes(
    outcomes: Vec<TrialOutcome>,
    cancelled: bool,
    systemic_failure_threshold: f64,
) -> Result<BatchOutcome, SimulationError> {
    let mut trials = Vec::with_capacity(outcomes.len());
    let mut errored = 0;
    let mut skipped = 0;
    let mut first_error = None;

    for outcome in outcomes {
        match outcome {
            TrialOutcome::Completed(trial) => trials.push(*trial),
            TrialOutcome::Errored(message) => {
                errored += 1;
                first_error.get_or_insert(message);
            }
            TrialOutcome::Skipped => skipped += 1,
        }
    }

    let run = trials.len() + errored;
    if run == 0 && (cancelled || skipped > 0) {
        return Err(SimulationError::Cancelled);
    }
    if run > 0 && errored as f64 / run as f64 > systemic_failure_threshold {
        return Err(SimulationError::SystemicFailure {
            failed: errored,
            total: run,
            first_error: first_error.unwrap_or_default(),
        });
    }

    Ok(BatchOutcome {
        trials,
        errored,
        skipped,
    })
}

fn validate_config(config: &MonteCarloConfig) -> Result<(), SimulationError> {
    if config.trials == 0 {
        return Err(SimulationError::Config("trials must be at least 1".into()));
    }
    if config.projection_years == Some(0) {
        return Err(SimulationError::Config(
            "projection_years must be at least 1".into(),
        ));
    }
    if !(0.0..=1.0).contains(&config.systemic_failure_threshold) {
        return Err(SimulationError::Config(format!(
            "systemic_failure_threshold {} must be within [0, 1]",
            config.systemic_failure_threshold
        )));
    }
    if let Some(allocation) = &config.allocation {
        allocation.validate()?;
    }
    Ok(())
}

/// Run a Monte Carlo batch for one scenario.
///
/// `history` backs historical sampling; without it (or with too little data)
/// the batch falls back to statistical sampling and records a warning.
pub fn monte_carlo_simulate(
    household: &Household,
    scenario: &GenericScenario,
    assumptions: &GlobalAssumptions,
    config: &MonteCarloConfig,
    history: Option<&dyn HistoricalDataProvider>,
) -> Result<SimulationResult, SimulationError> {
    monte_carlo_simulate_with_progress(
        household,
        scenario,
        assumptions,
        config,
        history,
        &MonteCarloProgress::new(),
    )
}

/// [`monte_carlo_simulate`] reporting completed trials through `progress` and
/// stopping early when it is cancelled.
///
/// Trials finished before cancellation are aggregated and the result is
/// flagged `partial`; cancelling before any trial finishes returns
/// [`SimulationError::Cancelled`].
pub fn monte_carlo_simulate_with_progress(
    household: &Household,
    scenario: &GenericScenario,
    assumptions: &GlobalAssumptions,
    config: &MonteCarloConfig,
    history: Option<&dyn HistoricalDataProvider>,
    progress: &MonteCarloProgress,
) -> Result<SimulationResult, SimulationError> {
    validate_config(config)?;

    let mut scenario = scenario.clone();
    if let Some(allocation) = config.allocation {
        scenario = scenario.with_allocation(allocation);
    }
    if let Some(withdrawal) = config.withdrawal {
        scenario = scenario.with_withdrawal(withdrawal);
    }

    let horizon = config
        .projection_years
        .unwrap_or(assumptions.projection_years);
    let engine = ProjectionEngine::new(household, &scenario, assumptions)?.with_horizon(horizon);

    let mut warnings = Vec::new();
    let market = resolve_market(config, history, &engine, &mut warnings)?;
    let mode = market.mode();
    let seed = config.seed.unwrap_or_else(rand::random);

    tracing::info!(
        scenario = %scenario.name,
        trials = config.trials,
        horizon,
        ?mode,
        seed,
        "starting monte carlo batch"
    );

    let run_trial = |index: usize| -> TrialOutcome {
        if progress.is_cancelled() {
            return TrialOutcome::Skipped;
        }
        let seed = trial_seed(seed, index);
        let projection = market
            .sampler(seed)
            .map_err(ProjectionError::from)
            .and_then(|mut sampler| {
                engine.project_cancellable(sampler.as_mut(), &|| progress.is_cancelled())
            });

        let outcome = match projection {
            Ok(projection) => TrialOutcome::Completed(Box::new(summarize_trial(
                index,
                seed,
                projection,
                horizon,
                config.retain_cash_flows,
            ))),
            Err(ProjectionError::Cancelled) => return TrialOutcome::Skipped,
            Err(err) => {
                tracing::debug!(index, seed, %err, "trial errored");
                TrialOutcome::Errored(err.to_string())
            }
        };
        progress.increment();
        outcome
    };

    let outcomes = run_all(config.trials, config.max_workers, run_trial)?;
    let batch = collect_outcomes(
        outcomes,
        progress.is_cancelled(),
        config.systemic_failure_threshold,
    )?;

    if batch.errored > 0 {
        tracing::warn!(errored = batch.errored, "some trials errored");
        warnings.push(format!("{} trials errored and were counted as failures", batch.errored));
    }
    let partial = batch.skipped > 0;
    if partial {
        tracing::info!(skipped = batch.skipped, "monte carlo batch cancelled");
    }

    let aggregate = aggregate_trials(&batch.trials, batch.errored, assumptions.start_year);
    tracing::info!(
        success_rate = aggregate.success_rate,
        completed = batch.trials.len(),
        "finished monte carlo batch"
    );

    Ok(SimulationResult {
        scenario: scenario.name.clone(),
        trials_requested: config.trials,
        trials_run: batch.trials.len() + batch.errored,
        trials_successful: aggregate.successful,
        trials_depleted: aggregate.depleted,
        trials_errored: batch.errored,
        success_rate: aggregate.success_rate,
        ending_balance: aggregate.ending_balance,
        net_income: aggregate.net_income,
        median_tsp_longevity_years: aggregate.median_longevity_years,
        yearly_bands: aggregate.yearly_bands,
        partial,
        seed,
        mode,
        warnings,
        trials: batch.trials,
    })
}
