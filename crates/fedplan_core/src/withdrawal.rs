//! Withdrawal strategies
//!
//! A [`WithdrawalSpec`] decides how much a retired participant asks for each
//! year; [`plan_withdrawal`] then enforces the RMD floor, splits the amount
//! between traditional and Roth money per [`WithdrawalSource`], and caps each
//! side at its available balance.

use crate::model::{WithdrawalSource, WithdrawalSpec};

/// Inputs a strategy may consult for one account in one year
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WithdrawalContext {
    /// Start-of-year balances
    pub traditional_balance: f64,
    pub roth_balance: f64,
    /// Total balance when the owner retired
    pub balance_at_retirement: f64,
    /// Cumulative inflation since the owner retired (1.0 in the first year)
    pub inflation_since_retirement: f64,
    /// Cumulative inflation since the start of the projection
    pub cumulative_inflation: f64,
    /// Household gross income from every source except this withdrawal
    pub other_household_income: f64,
    /// Fraction of the year the owner is retired
    pub retired_fraction: f64,
    /// Required minimum distribution from the traditional balance
    pub rmd: f64,
}

impl WithdrawalContext {
    #[must_use]
    pub fn total_balance(&self) -> f64 {
        self.traditional_balance + self.roth_balance
    }
}

/// How a requested withdrawal was funded
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WithdrawalPlan {
    /// What the strategy asked for, after proration
    pub requested: f64,
    /// Required distribution floor
    pub rmd: f64,
    pub traditional: f64,
    pub roth: f64,
    /// Amount that could not be funded
    pub shortfall: f64,
}

impl WithdrawalPlan {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.traditional + self.roth
    }
}

impl WithdrawalSpec {
    /// Amount this strategy asks for in a full retired year
    #[must_use]
    pub fn annual_request(&self, ctx: &WithdrawalContext) -> f64 {
        let amount = match *self {
            WithdrawalSpec::None => 0.0,
            WithdrawalSpec::FixedAmount {
                annual_amount,
                inflation_adjusted,
            } => {
                if inflation_adjusted {
                    annual_amount * ctx.inflation_since_retirement
                } else {
                    annual_amount
                }
            }
            WithdrawalSpec::FixedPercentage { rate } => {
                rate * ctx.balance_at_retirement * ctx.inflation_since_retirement
            }
            WithdrawalSpec::VariablePercentage { rate } => rate * ctx.total_balance(),
            WithdrawalSpec::NeedBased {
                target_gross_income,
            } => target_gross_income * ctx.cumulative_inflation - ctx.other_household_income,
        };
        amount.max(0.0)
    }
}

/// Resolve one year's withdrawal for a single account.
pub fn plan_withdrawal(
    spec: &WithdrawalSpec,
    source: WithdrawalSource,
    ctx: &WithdrawalContext,
) -> WithdrawalPlan {
    let requested = spec.annual_request(ctx) * ctx.retired_fraction.clamp(0.0, 1.0);
    let target = requested.max(ctx.rmd);

    // The RMD can only be satisfied from traditional money
    let rmd_part = ctx.rmd.min(ctx.traditional_balance);
    let trad_available = ctx.traditional_balance.max(0.0);
    let roth_available = ctx.roth_balance.max(0.0);

    let (traditional, roth) = match source {
        WithdrawalSource::TraditionalFirst => {
            let traditional = target.min(trad_available);
            (traditional, (target - traditional).min(roth_available))
        }
        WithdrawalSource::RothFirst => {
            let roth = (target - rmd_part).min(roth_available);
            ((target - roth).min(trad_available), roth)
        }
        WithdrawalSource::Proportional => {
            let remaining = target - rmd_part;
            let trad_room = trad_available - rmd_part;
            let available = trad_room + roth_available;
            if available > 0.0 {
                let take = remaining.min(available);
                let from_trad = take * trad_room / available;
                (rmd_part + from_trad, take - from_trad)
            } else {
                (rmd_part, 0.0)
            }
        }
    };

    WithdrawalPlan {
        requested,
        rmd: ctx.rmd,
        traditional,
        roth,
        shortfall: (target - traditional - roth).max(0.0),
    }
}
