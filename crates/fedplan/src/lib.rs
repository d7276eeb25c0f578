//! Command-line front end for federal retirement household projections
//!
//! Loads a plan file (YAML or JSON), hands it to `fedplan_core` and renders
//! the results for the terminal.

pub mod commands;
pub mod logging;
pub mod plan_file;

pub use commands::MonteCarloOverrides;
pub use logging::init_logging;
pub use plan_file::{OutputFormat, PlanFileError, load_plan, render};
