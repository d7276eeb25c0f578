//! Federal retirement household projection engine
//!
//! This crate projects a one- or two-person household's retirement cash
//! flows year by year and measures how robust the plan is under market
//! uncertainty. It supports:
//! - FERS annuities, the special retirement supplement and survivor annuities
//! - Social Security claiming between 62 and 70, with survivor benefits
//! - TSP balances (traditional and Roth) with withdrawal strategies and RMDs
//! - Federal, state and local income tax, FICA and Medicare IRMAA
//! - Mortality events as a household state machine
//! - Monte Carlo trials over historical bootstrap or statistical market paths
//! - A break-even solver for the withdrawal rate matching a target income
//!
//! # Builder DSL
//!
//! ```ignore
//! use fedplan_core::config::{HouseholdBuilder, ParticipantBuilder, ScenarioBuilder};
//! use fedplan_core::model::{GlobalAssumptions, ParticipantScenario};
//! use fedplan_core::projection::project_scenario;
//!
//! let household = HouseholdBuilder::new()
//!     .participant(
//!         ParticipantBuilder::federal_employee("Alex", date(1966, 5, 1), date(1996, 5, 1))
//!             .salary(110_000.0)
//!             .tsp(500_000.0, 0.0)
//!             .social_security(2_000.0, 2_900.0, 3_600.0),
//!     )
//!     .build()?;
//! let scenario = ScenarioBuilder::new("base")
//!     .participant("Alex", ParticipantScenario::retired_on(date(2026, 6, 1), 67))
//!     .build();
//! let projection = project_scenario(&household, &scenario, &GlobalAssumptions::default())?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod aggregate;
pub mod benefits;
pub mod compare;
pub mod date_math;
pub mod error;
pub mod market;
pub mod mortality;
pub mod optimization;
pub mod projection;
pub mod simulation;
pub mod taxes;
pub mod withdrawal;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use compare::{ScenarioComparison, compare_scenarios};
pub use config::{HouseholdBuilder, ParticipantBuilder, PlanConfig, ScenarioBuilder};
pub use error::{MarketError, ProjectionError, SimulationError};
pub use market::{HistoricalDataProvider, InMemoryHistory, MarketSampler};
pub use optimization::{BreakEvenAnalysis, BreakEvenConfig, solve_break_even};
pub use projection::{ProjectionEngine, project_scenario};
pub use simulation::{monte_carlo_simulate, monte_carlo_simulate_with_progress};
