//! End-to-end deterministic projections

use jiff::civil::date;
use proptest::prelude::*;

use super::{fixed_draw_scenario, retired_couple};
use crate::config::ScenarioBuilder;
use crate::error::ProjectionError;
use crate::market::{FixedMarket, ScriptedMarket};
use crate::model::{
    GlobalAssumptions, HouseholdState, MarketSample, ParticipantId, ParticipantScenario,
    TspAllocation, WithdrawalSource, WithdrawalSpec,
};
use crate::projection::{ProjectionEngine, project_scenario};

fn flat(years: usize) -> GlobalAssumptions {
    GlobalAssumptions {
        projection_years: years,
        ..GlobalAssumptions::flat()
    }
}

#[test]
fn test_fixed_draw_exhausts_balance_in_final_year() {
    let household = retired_couple(1_000_000.0);
    let scenario = fixed_draw_scenario(40_000.0);
    let projection = project_scenario(&household, &scenario, &flat(25)).unwrap();

    assert_eq!(projection.cash_flows.len(), 25);
    assert_eq!(projection.cash_flows[23].total_tsp_balance, 40_000.0);
    assert_eq!(projection.cash_flows[24].total_tsp_balance, 0.0);
    assert!(projection.depletion.is_none());
    assert!(
        projection
            .cash_flows
            .iter()
            .all(|cf| cf.total_withdrawals() == 40_000.0)
    );
}

#[test]
fn test_fixed_draw_depletes_one_year_later() {
    let household = retired_couple(1_000_000.0);
    let scenario = fixed_draw_scenario(40_000.0);
    let projection = project_scenario(&household, &scenario, &flat(27)).unwrap();

    let depletion = projection.depletion.unwrap();
    assert_eq!(depletion.year_index, 25);
    assert_eq!(depletion.year, 2050);
    assert_eq!(projection.cash_flows[25].shortfall, 40_000.0);
    assert_eq!(projection.cash_flows[25].total_withdrawals(), 0.0);
}

#[test]
fn test_unknown_participant_is_configuration_error() {
    let household = retired_couple(500_000.0);
    let scenario = ScenarioBuilder::new("typo")
        .participant("Alex", ParticipantScenario::retired_on(date(2020, 1, 1), 67))
        .participant("Sma", ParticipantScenario::retired_on(date(2020, 1, 1), 67))
        .build();
    let err = project_scenario(&household, &scenario, &flat(10)).unwrap_err();
    assert_eq!(
        err,
        ProjectionError::UnknownParticipant {
            scenario: "typo".into(),
            name: "Sma".into()
        }
    );
    assert!(err.is_configuration());
}

#[test]
fn test_missing_participant_and_claim_age_rejected() {
    let household = retired_couple(500_000.0);
    let missing = ScenarioBuilder::new("solo")
        .participant("Alex", ParticipantScenario::retired_on(date(2020, 1, 1), 67))
        .build();
    assert!(matches!(
        ProjectionEngine::new(&household, &missing, &flat(10)),
        Err(ProjectionError::InvalidConfiguration(_))
    ));

    let early = ScenarioBuilder::new("early")
        .participant("Alex", ParticipantScenario::retired_on(date(2020, 1, 1), 61))
        .participant("Sam", ParticipantScenario::retired_on(date(2020, 1, 1), 67))
        .build();
    assert!(ProjectionEngine::new(&household, &early, &flat(10)).is_err());
}

#[test]
fn test_analysis_year_beyond_horizon() {
    let household = retired_couple(500_000.0);
    let scenario = fixed_draw_scenario(20_000.0);
    let assumptions = flat(20);
    let engine = ProjectionEngine::new(&household, &scenario, &assumptions).unwrap();
    let mut market = FixedMarket::new(MarketSample::default());

    assert!(engine.project_through(&mut market, 19).is_ok());
    assert_eq!(
        engine.project_through(&mut market, 20).unwrap_err(),
        ProjectionError::YearOutOfBounds {
            index: 20,
            horizon: 20
        }
    );
}

#[test]
fn test_returns_applied_after_withdrawal() {
    let household = retired_couple(100_000.0);
    let scenario = fixed_draw_scenario(10_000.0);
    let assumptions = flat(2);
    let engine = ProjectionEngine::new(&household, &scenario, &assumptions).unwrap();
    let mut market = ScriptedMarket::new(vec![
        MarketSample::flat(0.10, 0.0, 0.0),
        MarketSample::flat(-0.50, 0.0, 0.0),
    ]);
    let projection = engine.project(&mut market).unwrap();

    assert!((projection.cash_flows[0].total_tsp_balance - 99_000.0).abs() < 1e-9);
    assert!((projection.cash_flows[1].total_tsp_balance - 44_500.0).abs() < 1e-9);
}

#[test]
fn test_cash_flow_records_are_consistent() {
    let household = retired_couple(750_000.0);
    let scenario = fixed_draw_scenario(45_000.0);
    let projection = project_scenario(&household, &scenario, &GlobalAssumptions::default()).unwrap();

    for cf in &projection.cash_flows {
        assert_eq!(cf.household_state, HouseholdState::BothAlive);
        let per_person: f64 = cf.participants.iter().map(|p| p.gross_income()).sum();
        assert!((cf.gross_income - per_person).abs() < 1e-6);
        let deductions = cf.total_taxes()
            + cf.medicare_premiums
            + cf.health_premiums
            + cf.employee_contributions;
        assert!((cf.net_income - (cf.gross_income - deductions)).abs() < 1e-6);
        assert_eq!(cf.magi, cf.adjusted_gross_income);
        assert!(cf.taxable_social_security <= 0.85 * cf.participants.iter().map(|p| p.social_security).sum::<f64>() + 1e-6);
    }

    // Sam reaches Medicare age in 2030
    let medicare = projection.year(2030).unwrap();
    assert!(medicare.participant(ParticipantId(1)).unwrap().medicare_premium > 0.0);
    assert_eq!(
        projection.year(2029).unwrap().participant(ParticipantId(1)).unwrap().medicare_premium,
        0.0
    );
}

#[test]
fn test_roth_first_draws_roth_before_traditional() {
    let household = crate::config::HouseholdBuilder::new()
        .participant(
            crate::config::ParticipantBuilder::new("Alex", date(1968, 1, 1)).tsp(300_000.0, 50_000.0),
        )
        .build()
        .unwrap();
    let scenario = ScenarioBuilder::new("roth")
        .participant(
            "Alex",
            ParticipantScenario::retired_on(date(2024, 1, 1), 67)
                .withdrawal(WithdrawalSpec::FixedAmount {
                    annual_amount: 30_000.0,
                    inflation_adjusted: false,
                })
                .source(WithdrawalSource::RothFirst),
        )
        .build();
    let projection = project_scenario(&household, &scenario, &flat(3)).unwrap();
    let alex = |i: usize| projection.cash_flows[i].participant(ParticipantId(0)).unwrap().clone();

    assert_eq!(alex(0).withdrawal_roth, 30_000.0);
    assert_eq!(alex(1).withdrawal_roth, 20_000.0);
    assert_eq!(alex(1).withdrawal_traditional, 10_000.0);
    assert_eq!(alex(2).withdrawal_traditional, 30_000.0);
    // Roth withdrawals are untaxed
    assert_eq!(projection.cash_flows[0].federal_tax, 0.0);
}

#[test]
fn test_need_based_fills_gap_to_target() {
    let household = retired_couple(2_000_000.0);
    let scenario = ScenarioBuilder::new("need")
        .participant(
            "Alex",
            ParticipantScenario::retired_on(date(2020, 1, 1), 62).withdrawal(
                WithdrawalSpec::NeedBased {
                    target_gross_income: 90_000.0,
                },
            ),
        )
        .participant("Sam", ParticipantScenario::retired_on(date(2020, 1, 1), 62))
        .build();
    let projection = project_scenario(&household, &scenario, &flat(5)).unwrap();
    for cf in &projection.cash_flows {
        assert!((cf.gross_income - 90_000.0).abs() < 1e-6, "gross {}", cf.gross_income);
    }
}

#[test]
fn test_deterministic_projection_is_repeatable() {
    let household = retired_couple(900_000.0);
    let scenario = fixed_draw_scenario(50_000.0)
        .with_allocation(TspAllocation::default());
    let assumptions = GlobalAssumptions::default();
    let a = project_scenario(&household, &scenario, &assumptions).unwrap();
    let b = project_scenario(&household, &scenario, &assumptions).unwrap();
    assert_eq!(a, b);
}

fn withdrawal_strategy() -> impl Strategy<Value = WithdrawalSpec> {
    prop_oneof![
        Just(WithdrawalSpec::None),
        (0.0..150_000.0f64, any::<bool>()).prop_map(|(annual_amount, inflation_adjusted)| {
            WithdrawalSpec::FixedAmount {
                annual_amount,
                inflation_adjusted,
            }
        }),
        (0.0..0.2f64).prop_map(|rate| WithdrawalSpec::FixedPercentage { rate }),
        (0.0..0.3f64).prop_map(|rate| WithdrawalSpec::VariablePercentage { rate }),
        (0.0..200_000.0f64).prop_map(|target_gross_income| WithdrawalSpec::NeedBased {
            target_gross_income
        }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_balances_never_negative(
        balance in 0.0..3_000_000.0f64,
        spec in withdrawal_strategy(),
        returns in prop::collection::vec(-0.9..0.6f64, 30),
        inflation in -0.02..0.12f64,
    ) {
        let household = retired_couple(balance);
        let scenario = ScenarioBuilder::new("prop")
            .participant("Alex", ParticipantScenario::retired_on(date(2020, 1, 1), 67).withdrawal(spec))
            .participant("Sam", ParticipantScenario::retired_on(date(2020, 1, 1), 67).withdrawal(spec))
            .build();
        let assumptions = GlobalAssumptions::default();
        let engine = ProjectionEngine::new(&household, &scenario, &assumptions).unwrap();
        let mut market = ScriptedMarket::new(
            returns.iter().map(|r| MarketSample::flat(*r, inflation, inflation)).collect(),
        );
        let projection = engine.project(&mut market).unwrap();

        for cf in &projection.cash_flows {
            prop_assert!(cf.total_tsp_balance >= 0.0);
            prop_assert!(cf.shortfall >= 0.0);
            for p in &cf.participants {
                prop_assert!(p.traditional_balance >= 0.0 && p.roth_balance >= 0.0);
                prop_assert!(p.withdrawal_traditional >= 0.0 && p.withdrawal_roth >= 0.0);
            }
        }
    }
}
