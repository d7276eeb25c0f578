//! Monte Carlo batches: determinism, fallback and cancellation

use jiff::civil::date;

use crate::config::{HouseholdBuilder, ParticipantBuilder, ScenarioBuilder};
use crate::error::SimulationError;
use crate::market::InMemoryHistory;
use crate::model::{
    FundValues, GenericScenario, GlobalAssumptions, Household, MonteCarloConfig,
    MonteCarloProgress, ParticipantScenario, SamplingMode, TspAllocation, WithdrawalSpec,
};
use crate::simulation::{monte_carlo_simulate, monte_carlo_simulate_with_progress};

fn household() -> Household {
    HouseholdBuilder::new()
        .participant(
            ParticipantBuilder::new("Alex", date(1963, 5, 1))
                .tsp(1_000_000.0, 0.0)
                .social_security(1_700.0, 2_300.0, 2_900.0),
        )
        .participant(
            ParticipantBuilder::new("Sam", date(1964, 9, 1)).social_security(
                1_000.0, 1_400.0, 1_750.0,
            ),
        )
        .build()
        .unwrap()
}

fn scenario() -> GenericScenario {
    ScenarioBuilder::new("four percent")
        .participant(
            "Alex",
            ParticipantScenario::retired_on(date(2024, 6, 1), 67).withdrawal(
                WithdrawalSpec::FixedAmount {
                    annual_amount: 40_000.0,
                    inflation_adjusted: true,
                },
            ),
        )
        .participant("Sam", ParticipantScenario::retired_on(date(2024, 1, 1), 67))
        .build()
}

/// G/F/C/S only, so the bootstrap is not limited by the shorter I fund proxy
fn domestic_allocation() -> TspAllocation {
    TspAllocation(FundValues {
        g: 0.3,
        f: 0.2,
        c: 0.4,
        s: 0.1,
        i: 0.0,
    })
}

fn config(trials: usize, seed: u64) -> MonteCarloConfig {
    MonteCarloConfig {
        trials,
        projection_years: Some(25),
        allocation: Some(domestic_allocation()),
        seed: Some(seed),
        ..MonteCarloConfig::default()
    }
}

#[test]
fn test_historical_batch_statistics() {
    let history = InMemoryHistory::us_proxies();
    let result = monte_carlo_simulate(
        &household(),
        &scenario(),
        &GlobalAssumptions::default(),
        &config(1_000, 42),
        Some(&history),
    )
    .unwrap();

    assert_eq!(result.mode, SamplingMode::Historical);
    assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    assert_eq!(result.seed, 42);
    assert_eq!(result.trials_requested, 1_000);
    assert_eq!(result.trials_run, 1_000);
    assert_eq!(result.trials_errored, 0);
    assert!(!result.partial);
    assert!((0.0..=1.0).contains(&result.success_rate));
    assert_eq!(
        result.trials_successful + result.trials_depleted,
        result.trials_run
    );

    let eb = result.ending_balance;
    assert!(eb.p10 <= eb.p25 && eb.p25 <= eb.p50 && eb.p50 <= eb.p75 && eb.p75 <= eb.p90);
    let ni = result.net_income;
    assert!(ni.p10 <= ni.p50 && ni.p50 <= ni.p90);

    assert_eq!(result.yearly_bands.len(), 25);
    assert_eq!(result.yearly_bands[0].year, 2025);
    assert_eq!(result.yearly_bands[0].trials, 1_000);
    assert!(result.median_tsp_longevity_years <= 25.0);
}

#[test]
fn test_results_independent_of_worker_count() {
    let history = InMemoryHistory::us_proxies();
    let run = |workers: usize| {
        monte_carlo_simulate(
            &household(),
            &scenario(),
            &GlobalAssumptions::default(),
            &MonteCarloConfig {
                max_workers: Some(workers),
                ..config(200, 7)
            },
            Some(&history),
        )
        .unwrap()
    };

    let single = run(1);
    let pooled = run(4);
    assert_eq!(single.success_rate, pooled.success_rate);
    assert_eq!(single.ending_balance, pooled.ending_balance);
    assert_eq!(single.net_income, pooled.net_income);
    assert_eq!(single.yearly_bands, pooled.yearly_bands);
    assert_eq!(single.trials, pooled.trials);
}

#[test]
fn test_different_seeds_differ() {
    let history = InMemoryHistory::us_proxies();
    let run = |seed: u64| {
        monte_carlo_simulate(
            &household(),
            &scenario(),
            &GlobalAssumptions::default(),
            &config(100, seed),
            Some(&history),
        )
        .unwrap()
    };
    assert_ne!(run(1).ending_balance, run(2).ending_balance);
}

#[test]
fn test_missing_history_falls_back_to_statistical() {
    let result = monte_carlo_simulate(
        &household(),
        &scenario(),
        &GlobalAssumptions::default(),
        &config(50, 3),
        None,
    )
    .unwrap();

    assert_eq!(result.mode, SamplingMode::Statistical);
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("statistical"));
    assert_eq!(result.trials_run, 50);
}

#[test]
fn test_short_history_falls_back_to_statistical() {
    let history = InMemoryHistory::us_proxies();
    let result = monte_carlo_simulate(
        &household(),
        &scenario(),
        &GlobalAssumptions::default(),
        &MonteCarloConfig {
            min_historical_years: 500,
            ..config(20, 3)
        },
        Some(&history),
    )
    .unwrap();

    assert_eq!(result.mode, SamplingMode::Statistical);
    assert!(result.warnings[0].contains("500 required"));
}

#[test]
fn test_statistical_mode_is_reproducible() {
    let cfg = MonteCarloConfig {
        mode: SamplingMode::Statistical,
        ..config(100, 11)
    };
    let run = || {
        monte_carlo_simulate(
            &household(),
            &scenario(),
            &GlobalAssumptions::default(),
            &cfg,
            None,
        )
        .unwrap()
    };
    let a = run();
    let b = run();
    assert_eq!(a.mode, SamplingMode::Statistical);
    assert!(a.warnings.is_empty());
    assert_eq!(a, b);
}

#[test]
fn test_withdrawal_override_applies_to_every_participant() {
    let result = monte_carlo_simulate(
        &household(),
        &scenario(),
        &GlobalAssumptions::default(),
        &MonteCarloConfig {
            withdrawal: Some(WithdrawalSpec::None),
            mode: SamplingMode::Statistical,
            retain_cash_flows: true,
            ..config(25, 5)
        },
        None,
    )
    .unwrap();

    // Nothing is requested before RMD age, so nothing can deplete
    assert_eq!(result.success_rate, 1.0);
    let flows = result.trials[0].cash_flows.as_ref().unwrap();
    assert_eq!(flows.len(), 25);
    assert_eq!(flows[0].total_withdrawals(), 0.0);
}

#[test]
fn test_cancelled_before_start() {
    let progress = MonteCarloProgress::new();
    progress.cancel();
    let err = monte_carlo_simulate_with_progress(
        &household(),
        &scenario(),
        &GlobalAssumptions::default(),
        &config(100, 1),
        None,
        &progress,
    )
    .unwrap_err();
    assert_eq!(err, SimulationError::Cancelled);
    assert_eq!(progress.completed(), 0);
}

#[test]
fn test_progress_counts_every_trial() {
    let progress = MonteCarloProgress::new();
    let result = monte_carlo_simulate_with_progress(
        &household(),
        &scenario(),
        &GlobalAssumptions::default(),
        &config(64, 9),
        None,
        &progress,
    )
    .unwrap();
    assert_eq!(progress.completed(), 64);
    assert_eq!(result.trials.len(), 64);
}

#[test]
fn test_invalid_config_rejected() {
    let run = |cfg: MonteCarloConfig| {
        monte_carlo_simulate(
            &household(),
            &scenario(),
            &GlobalAssumptions::default(),
            &cfg,
            None,
        )
    };

    assert!(matches!(
        run(MonteCarloConfig {
            trials: 0,
            ..config(1, 1)
        }),
        Err(SimulationError::Config(_))
    ));
    assert!(matches!(
        run(MonteCarloConfig {
            allocation: Some(TspAllocation(FundValues::uniform(0.5))),
            ..config(1, 1)
        }),
        Err(SimulationError::Market(_))
    ));

    let mut bad_params = config(1, 1);
    bad_params.statistical.inflation.std_dev = -1.0;
    assert!(matches!(run(bad_params), Err(SimulationError::Market(_))));
}
