//! Net income at a candidate withdrawal rate

use crate::error::ProjectionError;
use crate::market::FixedMarket;
use crate::model::{GenericScenario, GlobalAssumptions, Household, WithdrawalSpec};
use crate::projection::ProjectionEngine;

/// Net income in the first fully retired year with every participant drawing
/// `rate` of their balance, plus that calendar year.
///
/// Works on a copy of `scenario`; the caller's scenario is untouched.
pub fn net_income_at_rate(
    household: &Household,
    scenario: &GenericScenario,
    assumptions: &GlobalAssumptions,
    rate: f64,
) -> Result<(f64, i16), ProjectionError> {
    let candidate = scenario.with_withdrawal(WithdrawalSpec::VariablePercentage { rate });
    let engine = ProjectionEngine::new(household, &candidate, assumptions)?;
    let index = engine
        .first_fully_retired_index()
        .ok_or(ProjectionError::NoRetiredYear {
            horizon: engine.horizon(),
        })?;

    let mut market = FixedMarket::new(assumptions.deterministic_sample());
    let projection = engine.project_through(&mut market, index)?;
    let year = projection
        .cash_flows
        .get(index)
        .ok_or(ProjectionError::YearOutOfBounds {
            index,
            horizon: engine.horizon(),
        })?;
    Ok((year.net_income, year.year))
}
