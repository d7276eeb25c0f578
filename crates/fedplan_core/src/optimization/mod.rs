//! Break-even withdrawal-rate solver
//!
//! Inverts the projection engine: given a target net income for the first
//! fully retired year, bisect over a `variable_percentage` withdrawal rate
//! applied to every participant until the projected income matches.
//!
//! # Example
//!
//! ```ignore
//! use fedplan_core::optimization::{BreakEvenConfig, solve_break_even};
//!
//! let analysis = solve_break_even(&household, &scenario, &assumptions, 85_000.0,
//!     &BreakEvenConfig::default())?;
//! if let Some(warning) = &analysis.warning {
//!     eprintln!("{}", warning.message);
//! }
//! println!("withdraw {:.2}%", analysis.rate * 100.0);
//! ```

mod binary_search;
mod config;
mod evaluator;
mod result;

pub use binary_search::{ProgressCallback, solve_break_even, solve_break_even_with_progress};
pub use config::BreakEvenConfig;
pub use evaluator::net_income_at_rate;
pub use result::{BreakEvenAnalysis, BreakEvenIteration, BreakEvenStatus, ConvergenceWarning};
