//! Tax calculations for a household's projection year
//!
//! Pure, stateless functions: progressive federal/state brackets, FICA on
//! wages, taxation of Social Security benefits, and the Medicare Part B /
//! IRMAA premium lookup.

use crate::model::{FicaRates, FilingStatus, GlobalAssumptions, IrmaaSchedule, TaxBracket};

/// Calculate tax using progressive brackets.
/// Returns the total tax owed on the given income.
pub fn calculate_progressive_tax(income: f64, brackets: &[TaxBracket]) -> f64 {
    if income <= 0.0 || brackets.is_empty() {
        return 0.0;
    }

    let mut tax = 0.0;

    for (i, bracket) in brackets.iter().enumerate() {
        if income <= bracket.threshold {
            break;
        }
        let next_threshold = brackets
            .get(i + 1)
            .map_or(f64::INFINITY, |b| b.threshold);

        let taxable_in_bracket = income.min(next_threshold) - bracket.threshold;
        tax += taxable_in_bracket * bracket.rate;
    }

    tax
}

/// Rate applied to the next dollar of income
pub fn marginal_rate(income: f64, brackets: &[TaxBracket]) -> f64 {
    brackets
        .iter()
        .take_while(|b| income >= b.threshold)
        .last()
        .map_or(0.0, |b| b.rate)
}

/// Employee FICA on one worker's wages: Social Security up to the wage base
/// (scaled by `wage_base_factor` for wage indexing) plus uncapped Medicare.
pub fn calculate_fica(wages: f64, rates: &FicaRates, wage_base_factor: f64) -> f64 {
    if wages <= 0.0 {
        return 0.0;
    }
    let ss_wages = wages.min(rates.social_security_wage_base * wage_base_factor);
    ss_wages * rates.social_security_rate + wages * rates.medicare_rate
}

/// Monthly Medicare Part B premium for one beneficiary.
///
/// Tiers are scanned in ascending order; a tier applies only when MAGI is
/// strictly above its threshold, and the scan stops at the first threshold
/// not exceeded. MAGI exactly at a threshold stays in the lower tier.
pub fn medicare_part_b_monthly(magi: f64, status: FilingStatus, schedule: &IrmaaSchedule) -> f64 {
    let mut surcharge = 0.0;
    for tier in schedule.tiers(status) {
        if magi > tier.threshold {
            surcharge = tier.surcharge;
        } else {
            break;
        }
    }
    schedule.base_premium + surcharge
}

/// Portion of Social Security benefits included in taxable income, using the
/// provisional-income worksheet (0% / 50% / 85% tiers).
pub fn taxable_social_security(benefits: f64, other_income: f64, status: FilingStatus) -> f64 {
    if benefits <= 0.0 {
        return 0.0;
    }
    let (base, upper) = match status {
        FilingStatus::Single => (25_000.0, 34_000.0),
        FilingStatus::MarriedFilingJointly => (32_000.0, 44_000.0),
    };
    let provisional = other_income.max(0.0) + 0.5 * benefits;

    if provisional <= base {
        0.0
    } else if provisional <= upper {
        (0.5 * (provisional - base)).min(0.5 * benefits)
    } else {
        let first_tier = (0.5 * (upper - base)).min(0.5 * benefits);
        (0.85 * (provisional - upper) + first_tier).min(0.85 * benefits)
    }
}

/// Household income for one year, split the way the tax code treats it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaxableIncome {
    pub filing_status: FilingStatus,
    pub wages: f64,
    /// Traditional TSP deferrals, excluded from taxable wages
    pub pretax_deferrals: f64,
    /// FERS annuity, survivor annuity and supplement
    pub pension: f64,
    pub traditional_withdrawals: f64,
    pub social_security: f64,
    pub participants_65_plus: usize,
}

/// Income taxes owed for one year, before FICA
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IncomeTaxes {
    pub taxable_social_security: f64,
    pub adjusted_gross_income: f64,
    pub taxable_income: f64,
    pub federal: f64,
    pub state: f64,
    pub local: f64,
}

impl IncomeTaxes {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.federal + self.state + self.local
    }
}

/// Federal, state and local income tax for a household year.
pub fn calculate_income_taxes(income: &TaxableIncome, assumptions: &GlobalAssumptions) -> IncomeTaxes {
    let status = income.filing_status;

    let ordinary = (income.wages - income.pretax_deferrals).max(0.0)
        + income.pension
        + income.traditional_withdrawals;
    let taxable_ss = taxable_social_security(income.social_security, ordinary, status);
    let agi = ordinary + taxable_ss;

    let deduction = assumptions
        .standard_deduction
        .amount(status, income.participants_65_plus);
    let taxable_income = (agi - deduction).max(0.0);
    let federal =
        calculate_progressive_tax(taxable_income, assumptions.federal_brackets.for_status(status));

    let state_rules = &assumptions.state_tax;
    let mut state_base = agi;
    if state_rules.exempt_social_security {
        state_base -= taxable_ss;
    }
    if state_rules.exempt_retirement_income {
        state_base -= income.pension + income.traditional_withdrawals;
    }
    let state = calculate_progressive_tax(state_base.max(0.0), &state_rules.brackets);

    let local = income.wages.max(0.0) * assumptions.local_tax_rate;

    IncomeTaxes {
        taxable_social_security: taxable_ss,
        adjusted_gross_income: agi,
        taxable_income,
        federal,
        state,
        local,
    }
}
