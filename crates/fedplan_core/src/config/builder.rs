//! Builder DSL
//!
//! Fluent constructors for households and scenarios, resolving participants
//! by name the way a plan file does.
//!
//! # Example
//!
//! ```ignore
//! use fedplan_core::config::{HouseholdBuilder, ParticipantBuilder, ScenarioBuilder};
//! use fedplan_core::model::{ParticipantScenario, WithdrawalSpec};
//! use jiff::civil::date;
//!
//! let household = HouseholdBuilder::new()
//!     .participant(
//!         ParticipantBuilder::federal_employee("Alex", date(1965, 4, 1), date(1995, 4, 1))
//!             .salary(120_000.0)
//!             .high_3(115_000.0)
//!             .tsp(600_000.0, 50_000.0)
//!             .social_security(2_100.0, 3_000.0, 3_700.0)
//!             .fehb_holder(),
//!     )
//!     .participant(ParticipantBuilder::new("Sam", date(1967, 9, 1)))
//!     .build()?;
//!
//! let scenario = ScenarioBuilder::new("retire at 60")
//!     .participant(
//!         "Alex",
//!         ParticipantScenario::retired_on(date(2025, 4, 1), 67)
//!             .withdrawal(WithdrawalSpec::FixedPercentage { rate: 0.04 }),
//!     )
//!     .participant("Sam", ParticipantScenario::retired_on(date(2027, 1, 1), 67))
//!     .death("Alex", 85)
//!     .build();
//! ```

use std::collections::BTreeMap;

use jiff::civil::Date;

use crate::error::ProjectionError;
use crate::model::{
    DeathEvent, FilingStatus, FilingStatusSwitch, GenericScenario, Household, MortalitySpec,
    Participant, ParticipantScenario, TspAllocation, TspDisposition, WithdrawalSource,
    WithdrawalSpec,
};

/// Builder for a single participant
#[derive(Debug, Clone)]
pub struct ParticipantBuilder {
    participant: Participant,
}

impl ParticipantBuilder {
    /// A participant outside federal service
    #[must_use]
    pub fn new(name: impl Into<String>, birth_date: Date) -> Self {
        Self {
            participant: Participant {
                name: name.into(),
                birth_date,
                is_federal_employee: false,
                service_start_date: None,
                current_salary: 0.0,
                high_3_salary: 0.0,
                tsp_balance_traditional: 0.0,
                tsp_balance_roth: 0.0,
                tsp_contribution_rate: 0.0,
                roth_contribution_fraction: 0.0,
                ss_benefit_62: 0.0,
                ss_benefit_fra: 0.0,
                ss_benefit_70: 0.0,
                survivor_benefit_election: 0.0,
                is_primary_fehb_holder: false,
            },
        }
    }

    /// A FERS-covered employee with creditable service from `service_start`
    #[must_use]
    pub fn federal_employee(
        name: impl Into<String>,
        birth_date: Date,
        service_start: Date,
    ) -> Self {
        let mut builder = Self::new(name, birth_date);
        builder.participant.is_federal_employee = true;
        builder.participant.service_start_date = Some(service_start);
        builder
    }

    /// Current salary; also used as the high-3 unless one is set
    #[must_use]
    pub fn salary(mut self, salary: f64) -> Self {
        self.participant.current_salary = salary;
        if self.participant.high_3_salary == 0.0 {
            self.participant.high_3_salary = salary;
        }
        self
    }

    #[must_use]
    pub fn high_3(mut self, high_3: f64) -> Self {
        self.participant.high_3_salary = high_3;
        self
    }

    #[must_use]
    pub fn tsp(mut self, traditional: f64, roth: f64) -> Self {
        self.participant.tsp_balance_traditional = traditional;
        self.participant.tsp_balance_roth = roth;
        self
    }

    /// Employee deferral rate and the share of it going to Roth
    #[must_use]
    pub fn contributions(mut self, rate: f64, roth_fraction: f64) -> Self {
        self.participant.tsp_contribution_rate = rate;
        self.participant.roth_contribution_fraction = roth_fraction;
        self
    }

    /// Monthly benefits from the SSA statement
    #[must_use]
    pub fn social_security(mut self, at_62: f64, at_fra: f64, at_70: f64) -> Self {
        self.participant.ss_benefit_62 = at_62;
        self.participant.ss_benefit_fra = at_fra;
        self.participant.ss_benefit_70 = at_70;
        self
    }

    #[must_use]
    pub fn survivor_election(mut self, election: f64) -> Self {
        self.participant.survivor_benefit_election = election;
        self
    }

    #[must_use]
    pub fn fehb_holder(mut self) -> Self {
        self.participant.is_primary_fehb_holder = true;
        self
    }

    #[must_use]
    pub fn build(self) -> Participant {
        self.participant
    }
}

/// Builder for a validated household
#[derive(Debug, Clone, Default)]
pub struct HouseholdBuilder {
    participants: Vec<Participant>,
    filing_status: Option<FilingStatus>,
}

impl HouseholdBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn participant(mut self, builder: ParticipantBuilder) -> Self {
        self.participants.push(builder.build());
        self
    }

    #[must_use]
    pub fn filing_status(mut self, status: FilingStatus) -> Self {
        self.filing_status = Some(status);
        self
    }

    pub fn build(self) -> Result<Household, ProjectionError> {
        let household = Household {
            participants: self.participants,
            filing_status: self.filing_status,
        };
        household.validate()?;
        Ok(household)
    }
}

impl ParticipantScenario {
    /// Retire on `retirement_date`, claim Social Security at `ss_claim_age`,
    /// no voluntary withdrawals and the default allocation
    #[must_use]
    pub fn retired_on(retirement_date: Date, ss_claim_age: u8) -> Self {
        Self {
            retirement_date,
            ss_claim_age,
            withdrawal: WithdrawalSpec::None,
            withdrawal_source: WithdrawalSource::default(),
            allocation: TspAllocation::default(),
        }
    }

    #[must_use]
    pub fn withdrawal(mut self, spec: WithdrawalSpec) -> Self {
        self.withdrawal = spec;
        self
    }

    #[must_use]
    pub fn source(mut self, source: WithdrawalSource) -> Self {
        self.withdrawal_source = source;
        self
    }

    #[must_use]
    pub fn allocation(mut self, allocation: TspAllocation) -> Self {
        self.allocation = allocation;
        self
    }
}

/// Builder for a scenario
#[derive(Debug, Clone)]
pub struct ScenarioBuilder {
    name: String,
    participants: BTreeMap<String, ParticipantScenario>,
    mortality: Option<MortalitySpec>,
    spending_baseline: Option<f64>,
}

impl ScenarioBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            participants: BTreeMap::new(),
            mortality: None,
            spending_baseline: None,
        }
    }

    #[must_use]
    pub fn participant(mut self, name: impl Into<String>, choices: ParticipantScenario) -> Self {
        self.participants.insert(name.into(), choices);
        self
    }

    #[must_use]
    pub fn mortality(mut self, spec: MortalitySpec) -> Self {
        self.mortality = Some(spec);
        self
    }

    fn mortality_mut(&mut self) -> &mut MortalitySpec {
        self.mortality.get_or_insert_with(MortalitySpec::default)
    }

    /// `name` dies in the year they reach `age`
    #[must_use]
    pub fn death(mut self, name: impl Into<String>, age: u8) -> Self {
        self.mortality_mut().deaths.insert(
            name.into(),
            DeathEvent {
                death_age: Some(age),
                death_date: None,
            },
        );
        self
    }

    #[must_use]
    pub fn death_on(mut self, name: impl Into<String>, date: Date) -> Self {
        self.mortality_mut().deaths.insert(
            name.into(),
            DeathEvent {
                death_age: None,
                death_date: Some(date),
            },
        );
        self
    }

    #[must_use]
    pub fn survivor_spending_factor(mut self, factor: f64) -> Self {
        self.mortality_mut().survivor_spending_factor = factor;
        self
    }

    #[must_use]
    pub fn tsp_disposition(mut self, disposition: TspDisposition) -> Self {
        self.mortality_mut().tsp_disposition = disposition;
        self
    }

    #[must_use]
    pub fn filing_status_switch(mut self, switch: FilingStatusSwitch) -> Self {
        self.mortality_mut().filing_status_switch = switch;
        self
    }

    /// Household spending in today's dollars
    #[must_use]
    pub fn spending_baseline(mut self, amount: f64) -> Self {
        self.spending_baseline = Some(amount);
        self
    }

    #[must_use]
    pub fn build(self) -> GenericScenario {
        GenericScenario {
            name: self.name,
            participants: self.participants,
            mortality: self.mortality,
            spending_baseline: self.spending_baseline,
        }
    }
}
