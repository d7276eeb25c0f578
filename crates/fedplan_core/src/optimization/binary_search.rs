//! Bisection over the withdrawal rate
//!
//! Net income in the first fully retired year rises with the withdrawal rate,
//! so the break-even rate is bracketed by `[lower_rate, upper_rate]` and the
//! interval is halved toward the side that closes the income gap.

use crate::error::ProjectionError;
use crate::model::{GenericScenario, GlobalAssumptions, Household};

use super::config::BreakEvenConfig;
use super::evaluator::net_income_at_rate;
use super::result::{BreakEvenAnalysis, BreakEvenIteration, BreakEvenStatus, ConvergenceWarning};

/// Progress callback for the solver
///
/// Arguments: (iteration, rate, `net_income`)
pub type ProgressCallback = Box<dyn Fn(usize, f64, f64) + Send + Sync>;

/// Find the withdrawal rate whose first fully retired year yields
/// `target_net_income`.
///
/// Always returns the last midpoint evaluated; check
/// [`BreakEvenAnalysis::status`] (or `warning`) before trusting it.
pub fn solve_break_even(
    household: &Household,
    scenario: &GenericScenario,
    assumptions: &GlobalAssumptions,
    target_net_income: f64,
    config: &BreakEvenConfig,
) -> Result<BreakEvenAnalysis, ProjectionError> {
    solve_break_even_with_progress(household, scenario, assumptions, target_net_income, config, None)
}

pub fn solve_break_even_with_progress(
    household: &Household,
    scenario: &GenericScenario,
    assumptions: &GlobalAssumptions,
    target_net_income: f64,
    config: &BreakEvenConfig,
    progress_callback: Option<ProgressCallback>,
) -> Result<BreakEvenAnalysis, ProjectionError> {
    config
        .validate()
        .map_err(ProjectionError::InvalidConfiguration)?;

    let mut low = config.lower_rate;
    let mut high = config.upper_rate;
    let mut trace = Vec::new();
    let mut status = BreakEvenStatus::IterationLimit;
    let mut last = None;

    for iteration in 1..=config.max_iterations {
        let mid = f64::midpoint(low, high);
        let (net_income, year) = net_income_at_rate(household, scenario, assumptions, mid)?;
        let gap = net_income - target_net_income;

        trace.push(BreakEvenIteration {
            iteration,
            rate: mid,
            net_income,
            gap,
        });
        if let Some(ref callback) = progress_callback {
            callback(iteration, mid, net_income);
        }
        tracing::debug!(iteration, rate = mid, net_income, gap, "break-even iteration");
        last = Some((mid, net_income, year));

        if gap.abs() <= config.tolerance {
            status = BreakEvenStatus::Converged;
            break;
        }
        if gap < 0.0 {
            low = mid;
        } else {
            high = mid;
        }
        if high - low < config.min_interval {
            status = BreakEvenStatus::IntervalCollapsed;
            break;
        }
    }

    let Some((rate, projected_net_income, year)) = last else {
        return Err(ProjectionError::InvalidConfiguration(
            "break-even solver ran no iterations".into(),
        ));
    };
    let iterations = trace.len();
    let final_gap = projected_net_income - target_net_income;

    let warning = (status != BreakEvenStatus::Converged).then(|| {
        let message = match status {
            BreakEvenStatus::IntervalCollapsed => format!(
                "rate interval narrowed below {} without meeting the ${} tolerance; \
                 the target may lie outside [{}, {}]",
                config.min_interval, config.tolerance, config.lower_rate, config.upper_rate
            ),
            _ => format!(
                "no rate within ${} of the target after {iterations} iterations",
                config.tolerance
            ),
        };
        tracing::warn!(rate, final_gap, ?status, "break-even solver did not converge");
        ConvergenceWarning {
            status,
            iterations,
            final_gap,
            message,
        }
    });

    Ok(BreakEvenAnalysis {
        scenario: scenario.name.clone(),
        rate,
        projected_net_income,
        target_net_income,
        year,
        iterations,
        status,
        warning,
        trace,
    })
}
