//! Criterion benchmarks for fedplan_core projections
//!
//! Run with: cargo bench -p fedplan_core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use fedplan_core::config::{HouseholdBuilder, ParticipantBuilder, ScenarioBuilder};
use fedplan_core::model::{
    GenericScenario, GlobalAssumptions, Household, MonteCarloConfig, ParticipantScenario,
    SamplingMode, WithdrawalSpec,
};
use fedplan_core::optimization::{BreakEvenConfig, solve_break_even};
use fedplan_core::{InMemoryHistory, monte_carlo_simulate, project_scenario};
use jiff::civil::date;

fn create_household() -> Household {
    HouseholdBuilder::new()
        .participant(
            ParticipantBuilder::federal_employee("Alex", date(1966, 4, 1), date(1994, 9, 1))
                .salary(128_000.0)
                .high_3(124_000.0)
                .tsp(720_000.0, 90_000.0)
                .contributions(0.08, 0.25)
                .social_security(2_050.0, 2_900.0, 3_600.0)
                .survivor_election(0.5)
                .fehb_holder(),
        )
        .participant(
            ParticipantBuilder::new("Sam", date(1968, 11, 1))
                .salary(62_000.0)
                .tsp(140_000.0, 0.0)
                .social_security(1_150.0, 1_650.0, 2_050.0),
        )
        .build()
        .expect("valid household")
}

fn create_scenario() -> GenericScenario {
    ScenarioBuilder::new("mra+30")
        .participant(
            "Alex",
            ParticipantScenario::retired_on(date(2026, 5, 1), 67)
                .withdrawal(WithdrawalSpec::FixedPercentage { rate: 0.04 }),
        )
        .participant(
            "Sam",
            ParticipantScenario::retired_on(date(2030, 1, 1), 65)
                .withdrawal(WithdrawalSpec::VariablePercentage { rate: 0.05 }),
        )
        .death("Alex", 86)
        .spending_baseline(105_000.0)
        .build()
}

fn bench_deterministic_projection(c: &mut Criterion) {
    let household = create_household();
    let scenario = create_scenario();
    let assumptions = GlobalAssumptions::default();

    c.bench_function("deterministic_30yr_projection", |b| {
        b.iter(|| {
            project_scenario(
                black_box(&household),
                black_box(&scenario),
                black_box(&assumptions),
            )
        })
    });
}

fn bench_break_even(c: &mut Criterion) {
    let household = create_household();
    let scenario = create_scenario();
    let assumptions = GlobalAssumptions::default();
    let config = BreakEvenConfig::default();

    c.bench_function("break_even_solver", |b| {
        b.iter(|| {
            solve_break_even(
                black_box(&household),
                black_box(&scenario),
                black_box(&assumptions),
                black_box(95_000.0),
                &config,
            )
        })
    });
}

fn bench_monte_carlo(c: &mut Criterion) {
    let mut group = c.benchmark_group("monte_carlo");
    let household = create_household();
    let scenario = create_scenario();
    let assumptions = GlobalAssumptions::default();
    let history = InMemoryHistory::us_proxies();

    for mode in [SamplingMode::Historical, SamplingMode::Statistical] {
        for trials in [100, 1000] {
            let config = MonteCarloConfig {
                trials,
                mode,
                seed: Some(42),
                ..MonteCarloConfig::default()
            };

            group.bench_with_input(
                BenchmarkId::new(format!("{mode:?}"), trials),
                &trials,
                |b, _| {
                    b.iter(|| {
                        monte_carlo_simulate(
                            black_box(&household),
                            black_box(&scenario),
                            black_box(&assumptions),
                            black_box(&config),
                            Some(&history),
                        )
                    })
                },
            );
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_deterministic_projection,
    bench_break_even,
    bench_monte_carlo,
);
criterion_main!(benches);
