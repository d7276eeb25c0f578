//! Side-by-side deterministic comparison of scenarios

use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;
use crate::model::{GenericScenario, GlobalAssumptions, Household, Projection};
use crate::projection::ProjectionEngine;

/// Headline numbers for one scenario's deterministic projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub scenario: String,
    pub first_retired_year: Option<i16>,
    /// Net income in the first fully retired year
    pub first_retired_net_income: Option<f64>,
    pub lifetime_gross_income: f64,
    pub lifetime_net_income: f64,
    /// Income taxes and FICA over the horizon
    pub lifetime_taxes: f64,
    pub final_tsp_balance: f64,
    pub depletion_year: Option<i16>,
}

impl ScenarioSummary {
    fn from_projection(projection: &Projection, first_retired_index: Option<usize>) -> Self {
        let first_retired = first_retired_index.and_then(|i| projection.cash_flows.get(i));
        let flows = &projection.cash_flows;
        Self {
            scenario: projection.scenario.clone(),
            first_retired_year: first_retired.map(|cf| cf.year),
            first_retired_net_income: first_retired.map(|cf| cf.net_income),
            lifetime_gross_income: flows.iter().map(|cf| cf.gross_income).sum(),
            lifetime_net_income: flows.iter().map(|cf| cf.net_income).sum(),
            lifetime_taxes: flows.iter().map(|cf| cf.total_taxes()).sum(),
            final_tsp_balance: projection.final_balance(),
            depletion_year: projection.depletion.map(|d| d.year),
        }
    }
}

/// Differences of one scenario against the baseline (scenario minus baseline)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDelta {
    pub scenario: String,
    pub first_retired_net_income: Option<f64>,
    pub lifetime_net_income: f64,
    pub lifetime_taxes: f64,
    pub final_tsp_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    /// Name of the first scenario, which every delta is measured against
    pub baseline: String,
    pub summaries: Vec<ScenarioSummary>,
    pub deltas: Vec<ScenarioDelta>,
    #[serde(skip)]
    pub projections: Vec<Projection>,
}

/// Run every scenario deterministically and compare each to the first.
pub fn compare_scenarios(
    household: &Household,
    scenarios: &[GenericScenario],
    assumptions: &GlobalAssumptions,
) -> Result<ScenarioComparison, ProjectionError> {
    let Some(first) = scenarios.first() else {
        return Err(ProjectionError::InvalidConfiguration(
            "at least one scenario is required for a comparison".into(),
        ));
    };

    let mut summaries = Vec::with_capacity(scenarios.len());
    let mut projections = Vec::with_capacity(scenarios.len());
    for scenario in scenarios {
        let engine = ProjectionEngine::new(household, scenario, assumptions)?;
        let projection = engine.project_deterministic()?;
        summaries.push(ScenarioSummary::from_projection(
            &projection,
            engine.first_fully_retired_index(),
        ));
        projections.push(projection);
    }

    let base = &summaries[0];
    let deltas = summaries
        .iter()
        .skip(1)
        .map(|s| ScenarioDelta {
            scenario: s.scenario.clone(),
            first_retired_net_income: s
                .first_retired_net_income
                .zip(base.first_retired_net_income)
                .map(|(a, b)| a - b),
            lifetime_net_income: s.lifetime_net_income - base.lifetime_net_income,
            lifetime_taxes: s.lifetime_taxes - base.lifetime_taxes,
            final_tsp_balance: s.final_tsp_balance - base.final_tsp_balance,
        })
        .collect();

    Ok(ScenarioComparison {
        baseline: first.name.clone(),
        summaries,
        deltas,
        projections,
    })
}
