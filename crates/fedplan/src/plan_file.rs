//! Plan file loading and result rendering
//!
//! Plans are YAML unless the file ends in `.json`. Parsed plans are validated
//! before anything runs.

use std::fs;
use std::path::Path;

use clap::ValueEnum;
use fedplan_core::{PlanConfig, ProjectionError};
use serde::Serialize;

/// Error types for plan file operations
#[derive(Debug)]
pub enum PlanFileError {
    Io(String),
    Parse(String),
    Serialize(String),
    Invalid(ProjectionError),
}

impl std::fmt::Display for PlanFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanFileError::Io(msg) => write!(f, "IO error: {msg}"),
            PlanFileError::Parse(msg) => write!(f, "Parse error: {msg}"),
            PlanFileError::Serialize(msg) => write!(f, "Serialization error: {msg}"),
            PlanFileError::Invalid(err) => write!(f, "Invalid plan: {err}"),
        }
    }
}

impl std::error::Error for PlanFileError {}

/// Serialization format for plans and results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl OutputFormat {
    /// `.json` files are JSON; everything else is read as YAML
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => OutputFormat::Json,
            _ => OutputFormat::Yaml,
        }
    }
}

/// Parse and validate a plan
pub fn parse_plan(contents: &str, format: OutputFormat) -> Result<PlanConfig, PlanFileError> {
    let plan: PlanConfig = match format {
        OutputFormat::Json => {
            serde_json::from_str(contents).map_err(|e| PlanFileError::Parse(e.to_string()))?
        }
        OutputFormat::Yaml => {
            serde_saphyr::from_str(contents).map_err(|e| PlanFileError::Parse(e.to_string()))?
        }
    };
    plan.validate().map_err(PlanFileError::Invalid)?;
    Ok(plan)
}

/// Read, parse and validate the plan at `path`
pub fn load_plan(path: &Path) -> Result<PlanConfig, PlanFileError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| PlanFileError::Io(format!("Failed to read {}: {e}", path.display())))?;
    let plan = parse_plan(&contents, OutputFormat::from_path(path))?;
    tracing::debug!(
        path = %path.display(),
        scenarios = plan.scenarios.len(),
        "loaded plan"
    );
    Ok(plan)
}

pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<String, PlanFileError> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|e| PlanFileError::Serialize(e.to_string())),
        OutputFormat::Yaml => {
            serde_saphyr::to_string(value).map_err(|e| PlanFileError::Serialize(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAN_YAML: &str = r#"
household:
  participants:
    - name: Alex
      birth_date: "1963-08-01"
      tsp_balance_traditional: 650000
      ss_benefit_62: 1900
      ss_benefit_fra: 2650
      ss_benefit_70: 3300
scenarios:
  - name: base
    participants:
      Alex:
        retirement_date: "2025-01-01"
        ss_claim_age: 67
        withdrawal_source: roth_first
assumptions:
  projection_years: 20
"#;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("plan.json")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_path(Path::new("plan.JSON")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_path(Path::new("plan.yaml")), OutputFormat::Yaml);
        assert_eq!(OutputFormat::from_path(Path::new("plan")), OutputFormat::Yaml);
    }

    #[test]
    fn test_load_yaml_plan() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.yaml");
        fs::write(&path, PLAN_YAML).unwrap();

        let plan = load_plan(&path).unwrap();
        assert_eq!(plan.household.participants[0].name, "Alex");
        assert_eq!(plan.assumptions.projection_years, 20);
        assert_eq!(plan.assumptions.start_year, 2025);
        assert_eq!(plan.monte_carlo.trials, 1000);
    }

    #[test]
    fn test_json_round_trip_through_render() {
        let plan = parse_plan(PLAN_YAML, OutputFormat::Yaml).unwrap();
        let json = render(&plan, OutputFormat::Json).unwrap();
        assert_eq!(parse_plan(&json, OutputFormat::Json).unwrap(), plan);
    }

    #[test]
    fn test_invalid_plan_rejected() {
        let yaml = PLAN_YAML.replace("ss_claim_age: 67", "ss_claim_age: 72");
        assert!(matches!(
            parse_plan(&yaml, OutputFormat::Yaml),
            Err(PlanFileError::Invalid(err)) if err.is_configuration()
        ));
    }

    #[test]
    fn test_missing_file_and_bad_syntax() {
        let missing = load_plan(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(missing, PlanFileError::Io(_)));
        assert!(matches!(
            parse_plan("{ not json", OutputFormat::Json),
            Err(PlanFileError::Parse(_))
        ));
    }
}
