//! Scenario tests for the projection engine
//!
//! Tests are organized by topic:
//! - `projection` - End-to-end deterministic projections and balance invariants
//! - `mortality` - Death events, survivor benefits and TSP disposition
//! - `monte_carlo` - Batch determinism, fallback and cancellation
//! - `break_even` - Withdrawal-rate solver convergence and reporting
//! - `builder_dsl` - Builders and plan configuration
//! - `rmd` - Required minimum distributions through the engine
//! - `taxes` - Tax and IRMAA properties

mod monte_carlo;
mod projection;

use jiff::civil::date;

use crate::config::{HouseholdBuilder, ParticipantBuilder, ScenarioBuilder};
use crate::model::{GenericScenario, Household, ParticipantScenario, WithdrawalSpec};

/// Two retirees born 1965: Alex holds the TSP, Sam has none
pub(crate) fn retired_couple(alex_tsp: f64) -> Household {
    HouseholdBuilder::new()
        .participant(
            ParticipantBuilder::new("Alex", date(1965, 1, 1))
                .tsp(alex_tsp, 0.0)
                .social_security(1_500.0, 2_100.0, 2_600.0),
        )
        .participant(
            ParticipantBuilder::new("Sam", date(1965, 1, 1))
                .social_security(900.0, 1_300.0, 1_600.0),
        )
        .build()
        .unwrap()
}

/// Both retired in 2020; Alex draws a fixed, non-indexed amount
pub(crate) fn fixed_draw_scenario(annual_amount: f64) -> GenericScenario {
    ScenarioBuilder::new("fixed draw")
        .participant(
            "Alex",
            ParticipantScenario::retired_on(date(2020, 1, 1), 67).withdrawal(
                WithdrawalSpec::FixedAmount {
                    annual_amount,
                    inflation_adjusted: false,
                },
            ),
        )
        .participant("Sam", ParticipantScenario::retired_on(date(2020, 1, 1), 67))
        .build()
}
