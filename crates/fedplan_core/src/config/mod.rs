//! Plan configuration
//!
//! `PlanConfig` bundles everything a run needs: the household, its scenarios,
//! shared assumptions, Monte Carlo settings and break-even solver bounds. It is plain serde data; the
//! binary parses it from YAML or JSON and calls [`PlanConfig::validate`]
//! before handing pieces to the engine.
//!
//! # Builder DSL
//!
//! Tests and embedders can skip the file format entirely:
//!
//! ```ignore
//! use fedplan_core::config::{HouseholdBuilder, ParticipantBuilder, PlanConfig, ScenarioBuilder};
//!
//! let plan = PlanConfig::new(
//!     HouseholdBuilder::new()
//!         .participant(ParticipantBuilder::new("Alex", date(1964, 2, 1)).tsp(900_000.0, 0.0))
//!         .build()?,
//!     vec![ScenarioBuilder::new("base").participant("Alex", choices).build()],
//! );
//! plan.validate()?;
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;
use crate::model::{GenericScenario, GlobalAssumptions, Household, MonteCarloConfig};
use crate::mortality::MortalityModel;
use crate::optimization::BreakEvenConfig;

pub mod builder;

pub use builder::{HouseholdBuilder, ParticipantBuilder, ScenarioBuilder};

/// One household's full plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanConfig {
    pub household: Household,
    pub scenarios: Vec<GenericScenario>,
    #[serde(default)]
    pub assumptions: GlobalAssumptions,
    #[serde(default)]
    pub monte_carlo: MonteCarloConfig,
    #[serde(default)]
    pub break_even: BreakEvenConfig,
}

impl PlanConfig {
    #[must_use]
    pub fn new(household: Household, scenarios: Vec<GenericScenario>) -> Self {
        Self {
            household,
            scenarios,
            assumptions: GlobalAssumptions::default(),
            monte_carlo: MonteCarloConfig::default(),
            break_even: BreakEvenConfig::default(),
        }
    }

    /// Semantic checks the engine relies on: participant fields, FEHB holder,
    /// scenario participant names, claim ages, allocations and mortality specs.
    pub fn validate(&self) -> Result<(), ProjectionError> {
        self.household.validate()?;

        if self.scenarios.is_empty() {
            return Err(ProjectionError::InvalidConfiguration(
                "plan must define at least one scenario".into(),
            ));
        }
        if self.assumptions.projection_years == 0 {
            return Err(ProjectionError::InvalidConfiguration(
                "projection_years must be at least 1".into(),
            ));
        }

        let mut names = std::collections::BTreeSet::new();
        for scenario in &self.scenarios {
            if !names.insert(scenario.name.as_str()) {
                return Err(ProjectionError::InvalidConfiguration(format!(
                    "duplicate scenario name '{}'",
                    scenario.name
                )));
            }
            for (name, choices) in &scenario.participants {
                if self.household.participant_id(name).is_none() {
                    return Err(ProjectionError::UnknownParticipant {
                        scenario: scenario.name.clone(),
                        name: name.clone(),
                    });
                }
                if !(62..=70).contains(&choices.ss_claim_age) {
                    return Err(ProjectionError::InvalidConfiguration(format!(
                        "scenario '{}': {name} claims Social Security at {}, expected 62-70",
                        scenario.name, choices.ss_claim_age
                    )));
                }
                choices.allocation.validate()?;
            }
            MortalityModel::from_spec(scenario.mortality.as_ref(), &self.household, &scenario.name)?;
        }

        if let Some(allocation) = &self.monte_carlo.allocation {
            allocation.validate()?;
        }
        self.break_even
            .validate()
            .map_err(ProjectionError::InvalidConfiguration)?;
        Ok(())
    }

    #[must_use]
    pub fn scenario(&self, name: &str) -> Option<&GenericScenario> {
        self.scenarios.iter().find(|s| s.name == name)
    }
}
