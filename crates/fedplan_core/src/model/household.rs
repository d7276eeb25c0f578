use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::date_math::{age_in_months, months_between};
use crate::error::ProjectionError;

use super::ParticipantId;

/// Federal filing status used for bracket, deduction and IRMAA lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    Single,
    MarriedFilingJointly,
}

/// One member of the household.
///
/// Social Security amounts are monthly figures in today's dollars, as printed
/// on an SSA statement. Salaries and balances are annual / current values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub birth_date: Date,
    #[serde(default)]
    pub is_federal_employee: bool,
    /// Start of creditable FERS service
    #[serde(default)]
    pub service_start_date: Option<Date>,
    #[serde(default)]
    pub current_salary: f64,
    /// Average of the highest three consecutive years of basic pay
    #[serde(default)]
    pub high_3_salary: f64,
    #[serde(default)]
    pub tsp_balance_traditional: f64,
    #[serde(default)]
    pub tsp_balance_roth: f64,
    /// Employee TSP deferral as a fraction of salary
    #[serde(default)]
    pub tsp_contribution_rate: f64,
    /// Share of the employee deferral that goes to Roth
    #[serde(default)]
    pub roth_contribution_fraction: f64,
    #[serde(default)]
    pub ss_benefit_62: f64,
    #[serde(default)]
    pub ss_benefit_fra: f64,
    #[serde(default)]
    pub ss_benefit_70: f64,
    /// FERS survivor election: 0.0, 0.25 or 0.5
    #[serde(default)]
    pub survivor_benefit_election: f64,
    #[serde(default)]
    pub is_primary_fehb_holder: bool,
}

impl Participant {
    #[must_use]
    pub fn birth_year(&self) -> i16 {
        self.birth_date.year()
    }

    /// Age attained during calendar `year`
    #[must_use]
    pub fn age_in_year(&self, year: i16) -> i16 {
        year - self.birth_year()
    }

    #[must_use]
    pub fn age_in_months_on(&self, date: Date) -> i32 {
        age_in_months(self.birth_date, date)
    }

    /// Creditable service in fractional years (completed months / 12) at `date`
    #[must_use]
    pub fn years_of_service_at(&self, date: Date) -> f64 {
        match self.service_start_date {
            Some(start) => f64::from(months_between(start, date).max(0)) / 12.0,
            None => 0.0,
        }
    }

    #[must_use]
    pub fn tsp_balance(&self) -> f64 {
        self.tsp_balance_traditional + self.tsp_balance_roth
    }

    fn validate(&self) -> Result<(), ProjectionError> {
        let invalid = |msg: String| Err(ProjectionError::InvalidConfiguration(msg));

        if self.name.trim().is_empty() {
            return invalid("participant name must not be empty".into());
        }
        if !(0.0 <= self.ss_benefit_62
            && self.ss_benefit_62 <= self.ss_benefit_fra
            && self.ss_benefit_fra <= self.ss_benefit_70)
        {
            return invalid(format!(
                "{}: Social Security benefits must satisfy 0 <= age 62 <= FRA <= age 70",
                self.name
            ));
        }
        if self.tsp_balance_traditional < 0.0 || self.tsp_balance_roth < 0.0 {
            return invalid(format!("{}: TSP balances must be non-negative", self.name));
        }
        if !(0.0..=1.0).contains(&self.tsp_contribution_rate)
            || !(0.0..=1.0).contains(&self.roth_contribution_fraction)
        {
            return invalid(format!("{}: contribution rates must be within [0, 1]", self.name));
        }
        if !(0.0..=0.5).contains(&self.survivor_benefit_election) {
            return invalid(format!(
                "{}: survivor benefit election must be within [0, 0.5]",
                self.name
            ));
        }
        if self.is_federal_employee && self.service_start_date.is_none() {
            return invalid(format!(
                "{}: federal employees need a service_start_date",
                self.name
            ));
        }
        Ok(())
    }
}

/// The set of people whose finances are projected together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Household {
    pub participants: Vec<Participant>,
    /// Defaults to married-filing-jointly for two participants, single otherwise
    #[serde(default)]
    pub filing_status: Option<FilingStatus>,
}

impl Household {
    /// Build a household, checking the invariants the engine relies on.
    pub fn new(participants: Vec<Participant>) -> Result<Self, ProjectionError> {
        let household = Self {
            participants,
            filing_status: None,
        };
        household.validate()?;
        Ok(household)
    }

    pub fn validate(&self) -> Result<(), ProjectionError> {
        if self.participants.is_empty() || self.participants.len() > 2 {
            return Err(ProjectionError::InvalidConfiguration(format!(
                "a household has one or two participants, got {}",
                self.participants.len()
            )));
        }
        for (i, p) in self.participants.iter().enumerate() {
            p.validate()?;
            if self.participants[..i].iter().any(|q| q.name == p.name) {
                return Err(ProjectionError::InvalidConfiguration(format!(
                    "duplicate participant name '{}'",
                    p.name
                )));
            }
        }
        if self
            .participants
            .iter()
            .filter(|p| p.is_primary_fehb_holder)
            .count()
            > 1
        {
            return Err(ProjectionError::InvalidConfiguration(
                "at most one participant may be the primary FEHB holder".into(),
            ));
        }
        if self.filing_status == Some(FilingStatus::MarriedFilingJointly)
            && self.participants.len() < 2
        {
            return Err(ProjectionError::InvalidConfiguration(
                "married filing jointly requires two participants".into(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn filing_status(&self) -> FilingStatus {
        self.filing_status.unwrap_or(if self.participants.len() >= 2 {
            FilingStatus::MarriedFilingJointly
        } else {
            FilingStatus::Single
        })
    }

    #[must_use]
    pub fn participant_id(&self, name: &str) -> Option<ParticipantId> {
        self.participants
            .iter()
            .position(|p| p.name == name)
            .and_then(|i| u16::try_from(i).ok())
            .map(ParticipantId)
    }

    #[must_use]
    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.get(id.index())
    }

    pub fn ids(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        (0..self.participants.len()).filter_map(|i| u16::try_from(i).ok().map(ParticipantId))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// The participant who holds the family FEHB enrollment, if any
    #[must_use]
    pub fn fehb_holder(&self) -> Option<ParticipantId> {
        self.participants
            .iter()
            .position(|p| p.is_primary_fehb_holder && p.is_federal_employee)
            .and_then(|i| u16::try_from(i).ok())
            .map(ParticipantId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParticipantBuilder;
    use jiff::civil::date;

    #[test]
    fn test_benefit_ordering_enforced() {
        let bad = ParticipantBuilder::new("Alex", date(1965, 3, 1))
            .social_security(2_000.0, 1_900.0, 2_500.0)
            .build();
        let err = Household::new(vec![bad]).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_single_fehb_holder() {
        let a = ParticipantBuilder::federal_employee("Alex", date(1965, 3, 1), date(1995, 6, 1))
            .fehb_holder()
            .build();
        let b = ParticipantBuilder::federal_employee("Sam", date(1967, 8, 1), date(1999, 1, 1))
            .fehb_holder()
            .build();
        assert!(Household::new(vec![a, b]).is_err());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let a = ParticipantBuilder::new("Alex", date(1965, 3, 1)).build();
        let b = ParticipantBuilder::new("Alex", date(1966, 3, 1)).build();
        assert!(Household::new(vec![a, b]).is_err());
    }

    #[test]
    fn test_name_lookup_and_filing_status() {
        let a = ParticipantBuilder::new("Alex", date(1965, 3, 1)).build();
        let b = ParticipantBuilder::new("Sam", date(1966, 3, 1)).build();
        let household = Household::new(vec![a, b]).unwrap();
        assert_eq!(household.participant_id("Sam"), Some(ParticipantId(1)));
        assert_eq!(household.participant_id("Carol"), None);
        assert_eq!(household.filing_status(), FilingStatus::MarriedFilingJointly);
    }

    #[test]
    fn test_years_of_service() {
        let p = ParticipantBuilder::federal_employee("Alex", date(1965, 3, 1), date(1995, 6, 1))
            .build();
        let years = p.years_of_service_at(date(2025, 12, 1));
        assert!((years - 30.5).abs() < 1e-9, "Expected 30.5, got {years}");
    }
}
