//! One function per subcommand

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use color_eyre::eyre::{Context, eyre};
use fedplan_core::model::{
    GenericScenario, MonteCarloProgress, Projection, SamplingMode, SimulationResult,
};
use fedplan_core::optimization::BreakEvenAnalysis;
use fedplan_core::{
    InMemoryHistory, PlanConfig, ScenarioComparison, compare_scenarios,
    monte_carlo_simulate_with_progress, project_scenario, solve_break_even,
};

/// How often a running batch reports progress
const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);

/// Command-line overrides for the plan's Monte Carlo settings
#[derive(Debug, Clone, Default)]
pub struct MonteCarloOverrides {
    pub trials: Option<usize>,
    pub seed: Option<u64>,
    pub mode: Option<SamplingMode>,
    pub workers: Option<usize>,
    /// Keep per-trial records in the output
    pub include_trials: bool,
}

/// The named scenario, or every scenario when `name` is `None`
fn selected_scenarios<'a>(
    plan: &'a PlanConfig,
    name: Option<&str>,
) -> color_eyre::Result<Vec<&'a GenericScenario>> {
    match name {
        Some(name) => plan
            .scenario(name)
            .map(|s| vec![s])
            .ok_or_else(|| eyre!("no scenario named '{name}' in plan")),
        None => Ok(plan.scenarios.iter().collect()),
    }
}

pub fn project(plan: &PlanConfig, scenario: Option<&str>) -> color_eyre::Result<Vec<Projection>> {
    selected_scenarios(plan, scenario)?
        .into_iter()
        .map(|s| {
            let projection = project_scenario(&plan.household, s, &plan.assumptions)
                .wrap_err_with(|| format!("projecting scenario '{}'", s.name))?;
            if let Some(depletion) = projection.depletion {
                tracing::warn!(scenario = %s.name, year = depletion.year, "TSP depleted");
            }
            Ok(projection)
        })
        .collect()
}

pub fn monte_carlo(
    plan: &PlanConfig,
    scenario: Option<&str>,
    overrides: &MonteCarloOverrides,
) -> color_eyre::Result<Vec<SimulationResult>> {
    let mut config = plan.monte_carlo.clone();
    if let Some(trials) = overrides.trials {
        config.trials = trials;
    }
    if let Some(seed) = overrides.seed {
        config.seed = Some(seed);
    }
    if let Some(mode) = overrides.mode {
        config.mode = mode;
    }
    if let Some(workers) = overrides.workers {
        config.max_workers = Some(workers);
    }

    let history = InMemoryHistory::us_proxies();
    selected_scenarios(plan, scenario)?
        .into_iter()
        .map(|s| {
            let progress = MonteCarloProgress::new();
            let finished = AtomicBool::new(false);

            let result = std::thread::scope(|scope| {
                let reporter = scope.spawn(|| {
                    loop {
                        std::thread::park_timeout(PROGRESS_INTERVAL);
                        if finished.load(Ordering::Acquire) {
                            break;
                        }
                        tracing::debug!(
                            scenario = %s.name,
                            completed = progress.completed(),
                            total = config.trials,
                            "monte carlo progress"
                        );
                    }
                });
                let result = monte_carlo_simulate_with_progress(
                    &plan.household,
                    s,
                    &plan.assumptions,
                    &config,
                    Some(&history),
                    &progress,
                );
                finished.store(true, Ordering::Release);
                reporter.thread().unpark();
                result
            });

            let mut result =
                result.wrap_err_with(|| format!("simulating scenario '{}'", s.name))?;
            for warning in &result.warnings {
                tracing::warn!(scenario = %s.name, "{warning}");
            }
            if !overrides.include_trials {
                result.trials.clear();
            }
            Ok(result)
        })
        .collect()
}

pub fn break_even(
    plan: &PlanConfig,
    scenario: Option<&str>,
    target_net_income: f64,
) -> color_eyre::Result<Vec<BreakEvenAnalysis>> {
    selected_scenarios(plan, scenario)?
        .into_iter()
        .map(|s| {
            let analysis = solve_break_even(
                &plan.household,
                s,
                &plan.assumptions,
                target_net_income,
                &plan.break_even,
            )
            .wrap_err_with(|| format!("solving break-even rate for scenario '{}'", s.name))?;
            if let Some(warning) = &analysis.warning {
                tracing::warn!(scenario = %s.name, "{}", warning.message);
            }
            Ok(analysis)
        })
        .collect()
}

pub fn compare(plan: &PlanConfig) -> color_eyre::Result<ScenarioComparison> {
    compare_scenarios(&plan.household, &plan.scenarios, &plan.assumptions)
        .wrap_err("comparing scenarios")
}
