//! Household mortality as a finite state machine
//!
//! Each participant's configured death event resolves to a calendar year.
//! [`MortalityModel::transition`] is evaluated once per projection year and
//! moves the household through `BothAlive -> OneDeceased(id) -> BothDeceased`.
//! A participant is treated as deceased for the whole of their death year.

use crate::error::ProjectionError;
use crate::model::{
    FilingStatus, FilingStatusSwitch, Household, HouseholdState, MortalitySpec, ParticipantId,
    TspDisposition,
};

/// Result of one yearly evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MortalityTransition {
    pub state: HouseholdState,
    /// Participants whose death year is this year
    pub newly_deceased: Vec<ParticipantId>,
}

impl MortalityTransition {
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.newly_deceased.is_empty()
    }
}

/// Resolved mortality configuration for one scenario
#[derive(Debug, Clone, PartialEq)]
pub struct MortalityModel {
    /// Death year per participant id
    death_years: Vec<Option<i16>>,
    pub survivor_spending_factor: f64,
    pub tsp_disposition: TspDisposition,
    pub filing_status_switch: FilingStatusSwitch,
}

impl MortalityModel {
    /// No deaths within the horizon
    #[must_use]
    pub fn immortal(household: &Household) -> Self {
        let defaults = MortalitySpec::default();
        Self {
            death_years: vec![None; household.len()],
            survivor_spending_factor: defaults.survivor_spending_factor,
            tsp_disposition: defaults.tsp_disposition,
            filing_status_switch: defaults.filing_status_switch,
        }
    }

    /// Resolve a scenario's mortality spec against the household.
    ///
    /// Fails when a death event names an unknown participant or sets both or
    /// neither of `death_age` and `death_date`.
    pub fn from_spec(
        spec: Option<&MortalitySpec>,
        household: &Household,
        scenario: &str,
    ) -> Result<Self, ProjectionError> {
        let Some(spec) = spec else {
            return Ok(Self::immortal(household));
        };

        if !(0.0..=1.0).contains(&spec.survivor_spending_factor) {
            return Err(ProjectionError::InvalidConfiguration(format!(
                "survivor spending factor {} must be within [0, 1]",
                spec.survivor_spending_factor
            )));
        }

        let mut death_years = vec![None; household.len()];
        for (name, event) in &spec.deaths {
            let id = household.participant_id(name).ok_or_else(|| {
                ProjectionError::UnknownParticipant {
                    scenario: scenario.to_string(),
                    name: name.clone(),
                }
            })?;
            let year = match (event.death_age, event.death_date) {
                (Some(age), None) => household
                    .participant(id)
                    .map(|p| p.birth_year() + i16::from(age)),
                (None, Some(date)) => Some(date.year()),
                (Some(_), Some(_)) => {
                    return Err(ProjectionError::MalformedMortality {
                        name: name.clone(),
                        reason: "death_age and death_date are mutually exclusive",
                    });
                }
                (None, None) => {
                    return Err(ProjectionError::MalformedMortality {
                        name: name.clone(),
                        reason: "one of death_age or death_date is required",
                    });
                }
            };
            death_years[id.index()] = year;
        }

        Ok(Self {
            death_years,
            survivor_spending_factor: spec.survivor_spending_factor,
            tsp_disposition: spec.tsp_disposition,
            filing_status_switch: spec.filing_status_switch,
        })
    }

    #[must_use]
    pub fn death_year(&self, id: ParticipantId) -> Option<i16> {
        self.death_years.get(id.index()).copied().flatten()
    }

    #[must_use]
    pub fn is_deceased(&self, id: ParticipantId, year: i16) -> bool {
        self.death_year(id).is_some_and(|d| d <= year)
    }

    /// Household state in `year`, ignoring history
    #[must_use]
    pub fn state_in(&self, year: i16) -> HouseholdState {
        let deceased: Vec<usize> = (0..self.death_years.len())
            .filter(|&i| self.death_years[i].is_some_and(|d| d <= year))
            .collect();
        match deceased.as_slice() {
            [] => HouseholdState::BothAlive,
            _ if deceased.len() == self.death_years.len() => HouseholdState::BothDeceased,
            [first, ..] => u16::try_from(*first)
                .map_or(HouseholdState::BothDeceased, |i| {
                    HouseholdState::OneDeceased(ParticipantId(i))
                }),
        }
    }

    /// Advance the state machine into `year`.
    #[must_use]
    pub fn transition(&self, prior: HouseholdState, year: i16) -> MortalityTransition {
        let state = match (prior, self.state_in(year)) {
            // Terminal and monotone: never step backwards
            (HouseholdState::BothDeceased, _) => HouseholdState::BothDeceased,
            (HouseholdState::OneDeceased(_), HouseholdState::BothAlive) => prior,
            (_, next) => next,
        };
        let newly_deceased = (0..self.death_years.len())
            .filter(|&i| self.death_years[i] == Some(year))
            .filter_map(|i| u16::try_from(i).ok().map(ParticipantId))
            .collect();
        MortalityTransition {
            state,
            newly_deceased,
        }
    }

    /// The other participant, when exactly one has died
    #[must_use]
    pub fn survivor(&self, state: HouseholdState) -> Option<ParticipantId> {
        match state {
            HouseholdState::OneDeceased(dead) => (0..self.death_years.len())
                .filter_map(|i| u16::try_from(i).ok().map(ParticipantId))
                .find(|id| *id != dead),
            _ => None,
        }
    }

    /// Multiplier on the household spending baseline
    #[must_use]
    pub fn spending_factor(&self, state: HouseholdState) -> f64 {
        match state {
            HouseholdState::BothAlive => 1.0,
            HouseholdState::OneDeceased(_) => self.survivor_spending_factor,
            HouseholdState::BothDeceased => 0.0,
        }
    }

    /// Filing status for `year` given the household's base status
    #[must_use]
    pub fn filing_status(
        &self,
        base: FilingStatus,
        state: HouseholdState,
        year: i16,
    ) -> FilingStatus {
        match state {
            HouseholdState::BothAlive => base,
            HouseholdState::BothDeceased => FilingStatus::Single,
            HouseholdState::OneDeceased(dead) => {
                let died = self.death_year(dead).unwrap_or(year);
                match self.filing_status_switch {
                    FilingStatusSwitch::Immediate => FilingStatus::Single,
                    FilingStatusSwitch::NextYear if year <= died => base,
                    FilingStatusSwitch::NextYear => FilingStatus::Single,
                }
            }
        }
    }
}
