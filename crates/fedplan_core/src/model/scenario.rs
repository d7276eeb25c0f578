use std::collections::BTreeMap;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::TspAllocation;

/// How much to draw from the TSP each retired year
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum WithdrawalSpec {
    /// No voluntary withdrawals; RMDs still apply
    #[default]
    None,
    /// A set dollar amount per year
    FixedAmount {
        annual_amount: f64,
        /// Grow the amount with inflation since retirement
        #[serde(default)]
        inflation_adjusted: bool,
    },
    /// `rate` x balance at retirement, inflation adjusted
    FixedPercentage { rate: f64 },
    /// `rate` x balance at the start of each year
    VariablePercentage { rate: f64 },
    /// Fill the gap between a household gross-income target (today's dollars)
    /// and the household's other gross income
    NeedBased { target_gross_income: f64 },
}

/// Order in which the traditional and Roth balances are tapped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalSource {
    #[default]
    TraditionalFirst,
    RothFirst,
    Proportional,
}

/// Per-participant choices within a scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantScenario {
    pub retirement_date: Date,
    /// Age (62-70) at which Social Security is claimed
    pub ss_claim_age: u8,
    #[serde(default)]
    pub withdrawal: WithdrawalSpec,
    #[serde(default)]
    pub withdrawal_source: WithdrawalSource,
    #[serde(default)]
    pub allocation: TspAllocation,
}

/// What happens to a deceased participant's TSP
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TspDisposition {
    /// Balances roll into the survivor's account
    #[default]
    Merge,
    /// The account stays separate; the survivor keeps drawing on it
    KeepSeparate,
}

/// When a surviving spouse starts filing single
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatusSwitch {
    /// Single from the year of death
    Immediate,
    /// Joint return for the year of death, single afterwards
    #[default]
    NextYear,
}

/// Exactly one of `death_age` and `death_date` must be set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeathEvent {
    #[serde(default)]
    pub death_age: Option<u8>,
    #[serde(default)]
    pub death_date: Option<Date>,
}

fn default_survivor_spending_factor() -> f64 {
    0.75
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortalitySpec {
    /// Participant name -> death event
    #[serde(default)]
    pub deaths: BTreeMap<String, DeathEvent>,
    /// Multiplier on the household spending baseline once a participant dies
    #[serde(default = "default_survivor_spending_factor")]
    pub survivor_spending_factor: f64,
    #[serde(default)]
    pub tsp_disposition: TspDisposition,
    #[serde(default)]
    pub filing_status_switch: FilingStatusSwitch,
}

impl Default for MortalitySpec {
    fn default() -> Self {
        Self {
            deaths: BTreeMap::new(),
            survivor_spending_factor: default_survivor_spending_factor(),
            tsp_disposition: TspDisposition::default(),
            filing_status_switch: FilingStatusSwitch::default(),
        }
    }
}

/// A named set of retirement choices for the whole household
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericScenario {
    pub name: String,
    /// Participant name -> choices
    pub participants: BTreeMap<String, ParticipantScenario>,
    #[serde(default)]
    pub mortality: Option<MortalitySpec>,
    /// Annual household spending in today's dollars
    #[serde(default)]
    pub spending_baseline: Option<f64>,
}

impl GenericScenario {
    /// Copy of this scenario with every participant using `spec`
    #[must_use]
    pub fn with_withdrawal(&self, spec: WithdrawalSpec) -> Self {
        let mut scenario = self.clone();
        for ps in scenario.participants.values_mut() {
            ps.withdrawal = spec;
        }
        scenario
    }

    /// Copy of this scenario with every participant using `allocation`
    #[must_use]
    pub fn with_allocation(&self, allocation: TspAllocation) -> Self {
        let mut scenario = self.clone();
        for ps in scenario.participants.values_mut() {
            ps.allocation = allocation;
        }
        scenario
    }
}
