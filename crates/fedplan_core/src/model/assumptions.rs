//! Global economic, tax and benefit-rule assumptions
//!
//! Every field has a serde default so a plan file only needs to list what it
//! overrides. Defaults reflect 2025 federal law.

use serde::{Deserialize, Serialize};

use super::{FilingStatus, FundValues, MarketSample, RmdRules};

/// A single bracket: income above `threshold` is taxed at `rate`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub threshold: f64,
    pub rate: f64,
}

/// Bracket schedules per filing status, thresholds ascending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketTable {
    pub single: Vec<TaxBracket>,
    pub married_filing_jointly: Vec<TaxBracket>,
}

impl BracketTable {
    #[must_use]
    pub fn for_status(&self, status: FilingStatus) -> &[TaxBracket] {
        match status {
            FilingStatus::Single => &self.single,
            FilingStatus::MarriedFilingJointly => &self.married_filing_jointly,
        }
    }

    /// 2025 federal ordinary income brackets
    #[must_use]
    pub fn federal_2025() -> Self {
        const RATES: [f64; 7] = [0.10, 0.12, 0.22, 0.24, 0.32, 0.35, 0.37];
        const SINGLE: [f64; 7] = [
            0.0, 11_925.0, 48_475.0, 103_350.0, 197_300.0, 250_525.0, 626_350.0,
        ];
        const JOINT: [f64; 7] = [
            0.0, 23_850.0, 96_950.0, 206_700.0, 394_600.0, 501_050.0, 751_600.0,
        ];
        let zip = |thresholds: [f64; 7]| {
            thresholds
                .iter()
                .zip(RATES)
                .map(|(&threshold, rate)| TaxBracket { threshold, rate })
                .collect()
        };
        Self {
            single: zip(SINGLE),
            married_filing_jointly: zip(JOINT),
        }
    }

    /// The same schedule regardless of filing status
    #[must_use]
    pub fn uniform(brackets: Vec<TaxBracket>) -> Self {
        Self {
            single: brackets.clone(),
            married_filing_jointly: brackets,
        }
    }
}

impl Default for BracketTable {
    fn default() -> Self {
        Self::federal_2025()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandardDeduction {
    pub single: f64,
    pub married_filing_jointly: f64,
    /// Extra deduction per participant aged 65+, single filer
    pub additional_65_single: f64,
    /// Extra deduction per participant aged 65+, joint filers
    pub additional_65_joint: f64,
}

impl StandardDeduction {
    #[must_use]
    pub fn amount(&self, status: FilingStatus, participants_65_plus: usize) -> f64 {
        let (base, extra) = match status {
            FilingStatus::Single => (self.single, self.additional_65_single),
            FilingStatus::MarriedFilingJointly => {
                (self.married_filing_jointly, self.additional_65_joint)
            }
        };
        base + extra * participants_65_plus as f64
    }
}

impl Default for StandardDeduction {
    fn default() -> Self {
        Self {
            single: 15_000.0,
            married_filing_jointly: 30_000.0,
            additional_65_single: 2_000.0,
            additional_65_joint: 1_600.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FicaRates {
    pub social_security_rate: f64,
    pub social_security_wage_base: f64,
    pub medicare_rate: f64,
}

impl Default for FicaRates {
    fn default() -> Self {
        Self {
            social_security_rate: 0.062,
            social_security_wage_base: 176_100.0,
            medicare_rate: 0.0145,
        }
    }
}

/// A MAGI threshold and the monthly Part B surcharge above it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IrmaaTier {
    pub threshold: f64,
    pub surcharge: f64,
}

/// Medicare Part B premium schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrmaaSchedule {
    /// Standard monthly Part B premium
    pub base_premium: f64,
    /// Tiers in ascending threshold order
    pub single: Vec<IrmaaTier>,
    pub married_filing_jointly: Vec<IrmaaTier>,
}

impl IrmaaSchedule {
    #[must_use]
    pub fn tiers(&self, status: FilingStatus) -> &[IrmaaTier] {
        match status {
            FilingStatus::Single => &self.single,
            FilingStatus::MarriedFilingJointly => &self.married_filing_jointly,
        }
    }

    #[must_use]
    pub fn medicare_2025() -> Self {
        const SURCHARGES: [f64; 5] = [74.00, 185.00, 295.90, 406.90, 443.90];
        let tiers = |thresholds: [f64; 5]| {
            thresholds
                .iter()
                .zip(SURCHARGES)
                .map(|(&threshold, surcharge)| IrmaaTier {
                    threshold,
                    surcharge,
                })
                .collect()
        };
        Self {
            base_premium: 185.00,
            single: tiers([106_000.0, 133_000.0, 167_000.0, 200_000.0, 500_000.0]),
            married_filing_jointly: tiers([212_000.0, 266_000.0, 334_000.0, 400_000.0, 750_000.0]),
        }
    }
}

impl Default for IrmaaSchedule {
    fn default() -> Self {
        Self::medicare_2025()
    }
}

/// State income tax. Brackets apply to AGI less any exempted income.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateTax {
    #[serde(default)]
    pub brackets: Vec<TaxBracket>,
    #[serde(default)]
    pub exempt_social_security: bool,
    /// Pension, FERS supplement and TSP distributions are not taxed
    #[serde(default)]
    pub exempt_retirement_income: bool,
}

/// FERS annuity and agency-contribution rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FersRules {
    /// Minimum retirement age in years
    pub minimum_retirement_age: u8,
    pub multiplier: f64,
    /// Applies when retiring at 62+ with 20+ years of service
    pub enhanced_multiplier: f64,
    /// Reduction per year under 62 for MRA+10 retirements
    pub early_reduction_per_year: f64,
    /// Agency automatic 1% contribution
    pub agency_automatic_rate: f64,
    /// Employee contribution withheld toward the annuity
    pub employee_contribution_rate: f64,
}

impl FersRules {
    /// Agency matching on an employee deferral rate: dollar-for-dollar on the
    /// first 3%, fifty cents on the next 2%.
    #[must_use]
    pub fn agency_match_rate(&self, employee_rate: f64) -> f64 {
        let full = employee_rate.clamp(0.0, 0.03);
        let half = (employee_rate - 0.03).clamp(0.0, 0.02) * 0.5;
        full + half
    }
}

impl Default for FersRules {
    fn default() -> Self {
        Self {
            minimum_retirement_age: 57,
            multiplier: 0.01,
            enhanced_multiplier: 0.011,
            early_reduction_per_year: 0.05,
            agency_automatic_rate: 0.01,
            employee_contribution_rate: 0.008,
        }
    }
}

/// Annual health premiums in today's dollars
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthPremiums {
    /// Household FEHB enrollment, employee share
    pub fehb_annual: f64,
    /// Individual marketplace coverage for a retiree under Medicare age
    pub marketplace_annual: f64,
    pub medicare_age: u8,
    /// Annual growth applied to every premium
    pub inflation_rate: f64,
}

impl Default for HealthPremiums {
    fn default() -> Self {
        Self {
            fehb_annual: 7_800.0,
            marketplace_annual: 9_600.0,
            medicare_age: 65,
            inflation_rate: 0.05,
        }
    }
}

fn default_start_year() -> i16 {
    2025
}

fn default_projection_years() -> usize {
    30
}

fn default_inflation_rate() -> f64 {
    0.025
}

fn default_cola_rate() -> f64 {
    0.025
}

fn default_salary_growth_rate() -> f64 {
    0.02
}

fn default_fund_returns() -> FundValues {
    FundValues {
        g: 0.04,
        f: 0.045,
        c: 0.10,
        s: 0.11,
        i: 0.07,
    }
}

/// Assumptions shared by every scenario of a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalAssumptions {
    /// Calendar year of year index 0
    #[serde(default = "default_start_year")]
    pub start_year: i16,
    #[serde(default = "default_projection_years")]
    pub projection_years: usize,
    #[serde(default = "default_inflation_rate")]
    pub inflation_rate: f64,
    #[serde(default = "default_cola_rate")]
    pub cola_rate: f64,
    #[serde(default = "default_salary_growth_rate")]
    pub salary_growth_rate: f64,
    /// Deterministic per-fund returns used by single-path projections
    #[serde(default = "default_fund_returns")]
    pub fund_returns: FundValues,
    #[serde(default)]
    pub federal_brackets: BracketTable,
    #[serde(default)]
    pub standard_deduction: StandardDeduction,
    #[serde(default)]
    pub fica: FicaRates,
    #[serde(default)]
    pub irmaa: IrmaaSchedule,
    #[serde(default)]
    pub state_tax: StateTax,
    /// Flat local tax on wages
    #[serde(default)]
    pub local_tax_rate: f64,
    #[serde(default)]
    pub rmd: RmdRules,
    #[serde(default)]
    pub fers: FersRules,
    #[serde(default)]
    pub health: HealthPremiums,
    /// MAGI assumed for the two years before the projection starts
    #[serde(default)]
    pub baseline_magi: Option<f64>,
}

impl Default for GlobalAssumptions {
    fn default() -> Self {
        Self {
            start_year: default_start_year(),
            projection_years: default_projection_years(),
            inflation_rate: default_inflation_rate(),
            cola_rate: default_cola_rate(),
            salary_growth_rate: default_salary_growth_rate(),
            fund_returns: default_fund_returns(),
            federal_brackets: BracketTable::default(),
            standard_deduction: StandardDeduction::default(),
            fica: FicaRates::default(),
            irmaa: IrmaaSchedule::default(),
            state_tax: StateTax::default(),
            local_tax_rate: 0.0,
            rmd: RmdRules::default(),
            fers: FersRules::default(),
            health: HealthPremiums::default(),
            baseline_magi: None,
        }
    }
}

impl GlobalAssumptions {
    /// The market sample every year of a deterministic projection uses
    #[must_use]
    pub fn deterministic_sample(&self) -> MarketSample {
        MarketSample {
            fund_returns: self.fund_returns,
            inflation: self.inflation_rate,
            cola: self.cola_rate,
        }
    }

    /// Zero growth everywhere: no returns, inflation, COLA, salary or premium growth.
    /// Handy for hand-checkable projections.
    #[must_use]
    pub fn flat() -> Self {
        Self {
            inflation_rate: 0.0,
            cola_rate: 0.0,
            salary_growth_rate: 0.0,
            fund_returns: FundValues::default(),
            health: HealthPremiums {
                inflation_rate: 0.0,
                ..HealthPremiums::default()
            },
            ..Self::default()
        }
    }
}
