use serde::{Deserialize, Serialize};

use super::{FilingStatus, ParticipantId};

/// Where a participant is in their life cycle during a projection year
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeStage {
    #[default]
    Working,
    Retired,
    Deceased,
}

/// Household composition. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseholdState {
    /// Every participant is alive
    BothAlive,
    /// The given participant has died; the other survives
    OneDeceased(ParticipantId),
    /// No participant is alive
    BothDeceased,
}

impl HouseholdState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, HouseholdState::BothDeceased)
    }
}

/// One participant's slice of an annual record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParticipantYear {
    pub id: ParticipantId,
    pub age: i16,
    pub stage: LifeStage,
    pub salary: f64,
    pub pension: f64,
    /// FERS survivor annuity received from a deceased spouse
    pub survivor_annuity: f64,
    pub fers_supplement: f64,
    pub social_security: f64,
    pub withdrawal_traditional: f64,
    pub withdrawal_roth: f64,
    /// Required minimum distribution included in the traditional withdrawal
    pub rmd: f64,
    /// Employee deferrals (traditional + Roth)
    pub tsp_contribution: f64,
    pub agency_contribution: f64,
    pub medicare_premium: f64,
    /// End-of-year balances of the TSP account this participant owns
    pub traditional_balance: f64,
    pub roth_balance: f64,
}

impl ParticipantYear {
    #[must_use]
    pub fn withdrawal(&self) -> f64 {
        self.withdrawal_traditional + self.withdrawal_roth
    }

    #[must_use]
    pub fn gross_income(&self) -> f64 {
        self.salary
            + self.pension
            + self.survivor_annuity
            + self.fers_supplement
            + self.social_security
            + self.withdrawal()
    }

    #[must_use]
    pub fn tsp_balance(&self) -> f64 {
        self.traditional_balance + self.roth_balance
    }
}

/// Immutable snapshot of one projection year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualCashFlow {
    pub year_index: usize,
    pub year: i16,
    /// Indexed by participant id
    pub participants: Vec<ParticipantYear>,
    pub household_state: HouseholdState,
    pub filing_status: FilingStatus,

    pub gross_income: f64,
    pub taxable_social_security: f64,
    pub adjusted_gross_income: f64,
    pub magi: f64,
    pub federal_tax: f64,
    pub state_tax: f64,
    pub local_tax: f64,
    pub fica: f64,
    pub medicare_premiums: f64,
    /// FEHB or marketplace premiums
    pub health_premiums: f64,
    /// Employee TSP deferrals and FERS retirement contributions
    pub employee_contributions: f64,
    pub net_income: f64,

    pub spending_target: Option<f64>,
    pub surplus: Option<f64>,

    pub total_tsp_balance: f64,
    /// Withdrawals that were requested but could not be funded
    pub shortfall: f64,

    pub inflation_rate: f64,
    pub cola_rate: f64,
}

impl AnnualCashFlow {
    #[must_use]
    pub fn participant(&self, id: ParticipantId) -> Option<&ParticipantYear> {
        self.participants.get(id.index())
    }

    #[must_use]
    pub fn total_taxes(&self) -> f64 {
        self.federal_tax + self.state_tax + self.local_tax + self.fica
    }

    #[must_use]
    pub fn total_withdrawals(&self) -> f64 {
        self.participants.iter().map(ParticipantYear::withdrawal).sum()
    }
}
