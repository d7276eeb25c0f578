//! Deterministic year-by-year household projection
//!
//! [`ProjectionEngine`] resolves a household and scenario once (participant
//! ids, FERS annuities, Social Security claim amounts, mortality) and then
//! steps through the horizon with [`ProjectionEngine::project_year`], which
//! takes the prior [`YearState`] and one [`MarketSample`] and returns an
//! immutable [`AnnualCashFlow`] plus the state for the following year.
//! Nothing shared is mutated, so one engine can drive many trials in parallel.

use jiff::civil::Date;

use crate::benefits::{FersAnnuity, fers_annuity, fers_cola, social_security_at_claim};
use crate::date_math::{elapsed_year_fraction, remaining_year_fraction};
use crate::error::ProjectionError;
use crate::market::{FixedMarket, MarketSampler};
use crate::model::{
    AnnualCashFlow, DEPLETION_THRESHOLD, Depletion, FilingStatus, GenericScenario,
    GlobalAssumptions, Household, HouseholdState, LifeStage, MarketSample, ParticipantId,
    ParticipantYear, Projection, TspAllocation, TspDisposition, TspFund, WithdrawalSource,
    WithdrawalSpec,
};
use crate::mortality::MortalityModel;
use crate::taxes::{TaxableIncome, calculate_fica, calculate_income_taxes, medicare_part_b_monthly};
use crate::withdrawal::{WithdrawalContext, plan_withdrawal};

/// Survivor Social Security benefits start at this age
const SURVIVOR_BENEFIT_AGE: i16 = 60;
/// FERS COLAs are paid only to retirees at least this old
const FERS_COLA_AGE: i16 = 62;

/// One participant's scenario choices, resolved against the household
#[derive(Debug, Clone, PartialEq)]
struct ParticipantPlan {
    retirement_date: Date,
    retirement_year: i16,
    ss_claim_year: i16,
    /// Monthly benefit at the claim age in today's dollars
    ss_monthly: f64,
    withdrawal: WithdrawalSpec,
    source: WithdrawalSource,
    allocation: TspAllocation,
    annuity: Option<FersAnnuity>,
}

impl ParticipantPlan {
    /// Fraction of `year` spent working
    fn worked_fraction(&self, year: i16) -> f64 {
        match year.cmp(&self.retirement_year) {
            std::cmp::Ordering::Less => 1.0,
            std::cmp::Ordering::Equal => elapsed_year_fraction(self.retirement_date),
            std::cmp::Ordering::Greater => 0.0,
        }
    }

    /// Proration for benefits that begin at retirement
    fn retirement_proration(&self, year: i16) -> f64 {
        if year == self.retirement_year {
            remaining_year_fraction(self.retirement_date)
        } else {
            1.0
        }
    }
}

/// One participant's TSP account between years
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AccountState {
    pub traditional: f64,
    pub roth: f64,
    /// Total balance captured in the owner's first retired year
    pub balance_at_retirement: Option<f64>,
    /// Cumulative inflation at the moment the basis was captured
    pub inflation_at_retirement: f64,
}

impl AccountState {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.traditional + self.roth
    }
}

/// State threaded from one projection year into the next
#[derive(Debug, Clone, PartialEq)]
pub struct YearState {
    /// Indexed by owner id
    pub accounts: Vec<AccountState>,
    pub household_state: HouseholdState,
    /// Price level relative to the start year
    pub cumulative_inflation: f64,
    pub salary_factor: f64,
    /// Social Security COLA accrued since the start year
    pub ss_cola_factor: f64,
    pub healthcare_factor: f64,
    /// FERS COLA accrued since each participant retired
    pub fers_cola_factors: Vec<f64>,
    /// MAGI of every year projected so far
    pub magi_history: Vec<f64>,
}

/// A household and scenario prepared for projection
#[derive(Debug, Clone)]
pub struct ProjectionEngine<'a> {
    household: &'a Household,
    scenario: &'a GenericScenario,
    assumptions: &'a GlobalAssumptions,
    plans: Vec<ParticipantPlan>,
    mortality: MortalityModel,
    base_filing_status: FilingStatus,
    horizon: usize,
}

impl<'a> ProjectionEngine<'a> {
    /// Resolve `scenario` against `household`.
    ///
    /// Fails with a configuration error when the scenario names someone
    /// outside the household, omits a participant, or carries an invalid
    /// claim age, allocation or mortality spec.
    pub fn new(
        household: &'a Household,
        scenario: &'a GenericScenario,
        assumptions: &'a GlobalAssumptions,
    ) -> Result<Self, ProjectionError> {
        household.validate()?;

        if let Some(name) = scenario
            .participants
            .keys()
            .find(|name| household.participant_id(name).is_none())
        {
            return Err(ProjectionError::UnknownParticipant {
                scenario: scenario.name.clone(),
                name: name.clone(),
            });
        }

        let plans = household
            .participants
            .iter()
            .map(|participant| {
                let choices = scenario.participants.get(&participant.name).ok_or_else(|| {
                    ProjectionError::InvalidConfiguration(format!(
                        "scenario '{}' has no entry for participant '{}'",
                        scenario.name, participant.name
                    ))
                })?;
                if !(62..=70).contains(&choices.ss_claim_age) {
                    return Err(ProjectionError::InvalidConfiguration(format!(
                        "{}: Social Security claim age {} must be within 62-70",
                        participant.name, choices.ss_claim_age
                    )));
                }
                choices.allocation.validate()?;

                Ok(ParticipantPlan {
                    retirement_date: choices.retirement_date,
                    retirement_year: choices.retirement_date.year(),
                    ss_claim_year: participant.birth_year() + i16::from(choices.ss_claim_age),
                    ss_monthly: social_security_at_claim(participant, choices.ss_claim_age),
                    withdrawal: choices.withdrawal,
                    source: choices.withdrawal_source,
                    allocation: choices.allocation,
                    annuity: fers_annuity(participant, choices.retirement_date, &assumptions.fers),
                })
            })
            .collect::<Result<Vec<_>, ProjectionError>>()?;

        let mortality =
            MortalityModel::from_spec(scenario.mortality.as_ref(), household, &scenario.name)?;

        Ok(Self {
            household,
            scenario,
            assumptions,
            plans,
            mortality,
            base_filing_status: household.filing_status(),
            horizon: assumptions.projection_years,
        })
    }

    /// Replace the horizon from the assumptions
    #[must_use]
    pub fn with_horizon(mut self, years: usize) -> Self {
        self.horizon = years;
        self
    }

    #[must_use]
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    #[must_use]
    pub fn scenario(&self) -> &GenericScenario {
        self.scenario
    }

    #[must_use]
    pub fn mortality(&self) -> &MortalityModel {
        &self.mortality
    }

    /// Calendar year of `year_index`
    #[must_use]
    pub fn calendar_year(&self, year_index: usize) -> i16 {
        let offset = i16::try_from(year_index).unwrap_or(i16::MAX);
        self.assumptions.start_year.saturating_add(offset)
    }

    /// Funds carrying weight in any participant's allocation
    #[must_use]
    pub fn active_funds(&self) -> Vec<TspFund> {
        TspFund::ALL
            .into_iter()
            .filter(|f| self.plans.iter().any(|p| p.allocation.weight(*f) > 0.0))
            .collect()
    }

    /// First year index in which every living participant is retired for
    /// the whole year
    #[must_use]
    pub fn first_fully_retired_index(&self) -> Option<usize> {
        (0..self.horizon).find(|&idx| {
            let year = self.calendar_year(idx);
            let mut alive = self
                .household
                .ids()
                .filter(|id| !self.mortality.is_deceased(*id, year))
                .peekable();
            alive.peek().is_some() && alive.all(|id| self.plans[id.index()].worked_fraction(year) == 0.0)
        })
    }

    /// State before year index 0
    #[must_use]
    pub fn initial_state(&self) -> YearState {
        let accounts = self
            .household
            .participants
            .iter()
            .map(|p| AccountState {
                traditional: p.tsp_balance_traditional,
                roth: p.tsp_balance_roth,
                balance_at_retirement: None,
                inflation_at_retirement: 1.0,
            })
            .collect();
        YearState {
            accounts,
            household_state: HouseholdState::BothAlive,
            cumulative_inflation: 1.0,
            salary_factor: 1.0,
            ss_cola_factor: 1.0,
            healthcare_factor: 1.0,
            fers_cola_factors: vec![1.0; self.household.len()],
            magi_history: Vec::with_capacity(self.horizon),
        }
    }

    /// Project the full horizon.
    pub fn project(&self, sampler: &mut dyn MarketSampler) -> Result<Projection, ProjectionError> {
        self.project_cancellable(sampler, &|| false)
    }

    /// Project the full horizon, checking `cancelled` before each year.
    pub fn project_cancellable(
        &self,
        sampler: &mut dyn MarketSampler,
        cancelled: &dyn Fn() -> bool,
    ) -> Result<Projection, ProjectionError> {
        self.run(sampler, self.horizon, cancelled)
    }

    /// Project year indices `0..=last_index`.
    ///
    /// Fails with [`ProjectionError::YearOutOfBounds`] when `last_index` is
    /// beyond the horizon.
    pub fn project_through(
        &self,
        sampler: &mut dyn MarketSampler,
        last_index: usize,
    ) -> Result<Projection, ProjectionError> {
        if last_index >= self.horizon {
            return Err(ProjectionError::YearOutOfBounds {
                index: last_index,
                horizon: self.horizon,
            });
        }
        self.run(sampler, last_index + 1, &|| false)
    }

    /// Project with the assumptions' deterministic returns
    pub fn project_deterministic(&self) -> Result<Projection, ProjectionError> {
        self.project(&mut FixedMarket::new(self.assumptions.deterministic_sample()))
    }

    fn run(
        &self,
        sampler: &mut dyn MarketSampler,
        years: usize,
        cancelled: &dyn Fn() -> bool,
    ) -> Result<Projection, ProjectionError> {
        tracing::debug!(
            scenario = %self.scenario.name,
            years,
            "starting projection"
        );

        let mut state = self.initial_state();
        let mut cash_flows = Vec::with_capacity(years);
        let mut depletion = None;
        let mut truncated_at = None;

        for year_index in 0..years {
            if cancelled() {
                return Err(ProjectionError::Cancelled);
            }
            let year = self.calendar_year(year_index);
            if self
                .mortality
                .transition(state.household_state, year)
                .state
                .is_terminal()
            {
                tracing::debug!(scenario = %self.scenario.name, year, "all participants deceased");
                truncated_at = Some(year_index);
                break;
            }

            let sample = sampler.next_year()?;
            let (cash_flow, next) = self.project_year(year_index, &sample, &state)?;
            if depletion.is_none() && cash_flow.shortfall > DEPLETION_THRESHOLD {
                depletion = Some(Depletion { year_index, year });
            }
            cash_flows.push(cash_flow);
            state = next;
        }

        Ok(Projection {
            scenario: self.scenario.name.clone(),
            cash_flows,
            depletion,
            truncated_at,
        })
    }

    /// Compute one year's record and the state for the next year.
    pub fn project_year(
        &self,
        year_index: usize,
        sample: &MarketSample,
        prior: &YearState,
    ) -> Result<(AnnualCashFlow, YearState), ProjectionError> {
        if year_index >= self.horizon {
            return Err(ProjectionError::YearOutOfBounds {
                index: year_index,
                horizon: self.horizon,
            });
        }

        let year = self.calendar_year(year_index);
        let rules = self.assumptions;
        let mut next = prior.clone();

        // Mortality
        let transition = self.mortality.transition(prior.household_state, year);
        let household_state = transition.state;
        let survivor = self.mortality.survivor(household_state);
        if transition.changed() {
            tracing::debug!(
                scenario = %self.scenario.name,
                year,
                deceased = ?transition.newly_deceased,
                state = ?household_state,
                "mortality transition"
            );
        }
        if self.mortality.tsp_disposition == TspDisposition::Merge {
            if let Some(heir) = survivor {
                for dead in &transition.newly_deceased {
                    merge_account(&mut next.accounts, *dead, heir);
                }
            }
        }
        next.household_state = household_state;
        let filing_status = self
            .mortality
            .filing_status(self.base_filing_status, household_state, year);

        // Earned income, benefits and contributions
        let mut participants: Vec<ParticipantYear> = Vec::with_capacity(self.plans.len());
        let mut contributions = vec![(0.0, 0.0); self.plans.len()];
        let mut pretax_deferrals = 0.0;
        let mut fers_contributions = 0.0;
        let mut fica = 0.0;

        for (idx, (participant, plan)) in self
            .household
            .participants
            .iter()
            .zip(&self.plans)
            .enumerate()
        {
            let id = participant_id(idx);
            let age = participant.age_in_year(year);
            let mut py = ParticipantYear {
                id,
                age,
                ..ParticipantYear::default()
            };

            if self.mortality.is_deceased(id, year) {
                py.stage = LifeStage::Deceased;
                participants.push(py);
                continue;
            }

            let worked = plan.worked_fraction(year);
            py.stage = if worked >= 1.0 {
                LifeStage::Working
            } else {
                LifeStage::Retired
            };

            if worked > 0.0 {
                py.salary = participant.current_salary * prior.salary_factor * worked;
                let employee = py.salary * participant.tsp_contribution_rate;
                let roth = employee * participant.roth_contribution_fraction;
                let agency = if participant.is_federal_employee {
                    py.salary
                        * (rules.fers.agency_automatic_rate
                            + rules.fers.agency_match_rate(participant.tsp_contribution_rate))
                } else {
                    0.0
                };
                py.tsp_contribution = employee;
                py.agency_contribution = agency;
                contributions[idx] = (employee - roth + agency, roth);
                pretax_deferrals += employee - roth;
                if participant.is_federal_employee {
                    fers_contributions += py.salary * rules.fers.employee_contribution_rate;
                }
                fica += calculate_fica(py.salary, &rules.fica, prior.salary_factor);
            }

            if let Some(annuity) = &plan.annuity {
                if year >= annuity.start_year {
                    let proration = if annuity.start_year == plan.retirement_year {
                        plan.retirement_proration(year)
                    } else {
                        1.0
                    };
                    py.pension = annuity.annual * prior.fers_cola_factors[idx] * proration;
                }
                if annuity.supplement_annual > 0.0
                    && year >= plan.retirement_year
                    && year < annuity.supplement_end_year
                {
                    py.fers_supplement =
                        annuity.supplement_annual * plan.retirement_proration(year);
                }
            }

            if year >= plan.ss_claim_year {
                let proration = if year == plan.ss_claim_year {
                    remaining_year_fraction(participant.birth_date)
                } else {
                    1.0
                };
                py.social_security = plan.ss_monthly * 12.0 * prior.ss_cola_factor * proration;
            }

            participants.push(py);
        }

        // Survivor benefits
        if let (HouseholdState::OneDeceased(dead), Some(heir)) = (household_state, survivor) {
            let dead_plan = &self.plans[dead.index()];
            let died = self.mortality.death_year(dead).unwrap_or(year);
            let heir_year = &mut participants[heir.index()];

            if heir_year.age >= SURVIVOR_BENEFIT_AGE {
                // Unclaimed benefits pass on at the full retirement age amount
                let monthly = if died >= dead_plan.ss_claim_year {
                    dead_plan.ss_monthly
                } else {
                    self.household
                        .participant(dead)
                        .map_or(0.0, |p| p.ss_benefit_fra)
                };
                let inherited = monthly * 12.0 * prior.ss_cola_factor;
                heir_year.social_security = heir_year.social_security.max(inherited);
            }

            let election = self
                .household
                .participant(dead)
                .map_or(0.0, |p| p.survivor_benefit_election);
            // Deaths in service leave no annuity to continue
            let died_retired = died >= dead_plan.retirement_year;
            if let Some(annuity) = &dead_plan.annuity {
                if election > 0.0 && died_retired && year >= annuity.start_year {
                    heir_year.survivor_annuity =
                        annuity.survivor_annual(election) * prior.fers_cola_factors[dead.index()];
                }
            }
        }

        // Withdrawals, one account at a time in owner order
        let non_withdrawal_income: f64 = participants.iter().map(ParticipantYear::gross_income).sum();
        let mut withdrawn_so_far = 0.0;
        let mut shortfall = 0.0;

        for owner_idx in 0..self.plans.len() {
            let owner = participant_id(owner_idx);
            let actor = if participants[owner_idx].stage != LifeStage::Deceased {
                Some(owner)
            } else if self.mortality.tsp_disposition == TspDisposition::KeepSeparate {
                survivor
            } else {
                None
            };
            let Some(actor) = actor else {
                continue;
            };

            let owner_plan = &self.plans[owner_idx];
            let actor_plan = &self.plans[actor.index()];
            let retired_fraction = 1.0 - actor_plan.worked_fraction(year);
            if retired_fraction <= 0.0 {
                continue;
            }

            let account = &mut next.accounts[owner_idx];
            if account.balance_at_retirement.is_none() {
                account.balance_at_retirement = Some(account.total());
                account.inflation_at_retirement = prior.cumulative_inflation;
            }

            let actor_age = participants[actor.index()].age;
            let ctx = WithdrawalContext {
                traditional_balance: account.traditional,
                roth_balance: account.roth,
                balance_at_retirement: account.balance_at_retirement.unwrap_or(0.0),
                inflation_since_retirement: prior.cumulative_inflation
                    / account.inflation_at_retirement,
                cumulative_inflation: prior.cumulative_inflation,
                other_household_income: non_withdrawal_income + withdrawn_so_far,
                retired_fraction,
                rmd: rules.rmd.required_distribution(actor_age, account.traditional),
            };
            let plan = plan_withdrawal(&owner_plan.withdrawal, owner_plan.source, &ctx);

            account.traditional = (account.traditional - plan.traditional).max(0.0);
            account.roth = (account.roth - plan.roth).max(0.0);
            withdrawn_so_far += plan.total();
            shortfall += plan.shortfall;

            let actor_year = &mut participants[actor.index()];
            actor_year.withdrawal_traditional += plan.traditional;
            actor_year.withdrawal_roth += plan.roth;
            actor_year.rmd += plan.rmd.min(plan.traditional);
        }

        // Taxes
        let sum = |f: fn(&ParticipantYear) -> f64| participants.iter().map(f).sum::<f64>();
        let wages = sum(|p| p.salary);
        let pension = sum(|p| p.pension + p.survivor_annuity + p.fers_supplement);
        let social_security = sum(|p| p.social_security);
        let traditional_withdrawals = sum(|p| p.withdrawal_traditional);
        let gross_income = sum(ParticipantYear::gross_income);
        let employee_contributions = sum(|p| p.tsp_contribution) + fers_contributions;
        let participants_65_plus = participants
            .iter()
            .filter(|p| p.stage != LifeStage::Deceased && p.age >= 65)
            .count();

        let taxes = calculate_income_taxes(
            &TaxableIncome {
                filing_status,
                wages,
                pretax_deferrals,
                pension,
                traditional_withdrawals,
                social_security,
                participants_65_plus,
            },
            rules,
        );
        let magi = taxes.adjusted_gross_income;
        next.magi_history.push(magi);

        // Medicare uses MAGI from two years back
        let irmaa_magi = year_index
            .checked_sub(2)
            .and_then(|i| prior.magi_history.get(i).copied())
            .or(rules.baseline_magi)
            .unwrap_or(magi);
        let medicare_age = i16::from(rules.health.medicare_age);
        let mut medicare_premiums = 0.0;
        for py in &mut participants {
            if py.stage != LifeStage::Deceased && py.age >= medicare_age {
                py.medicare_premium =
                    medicare_part_b_monthly(irmaa_magi, filing_status, &rules.irmaa)
                        * 12.0
                        * prior.healthcare_factor;
                medicare_premiums += py.medicare_premium;
            }
        }

        let health_premiums = self.health_premiums(&participants, household_state, prior.healthcare_factor);

        let net_income = gross_income
            - taxes.total()
            - fica
            - medicare_premiums
            - health_premiums
            - employee_contributions;

        let spending_target = self.scenario.spending_baseline.map(|baseline| {
            baseline * prior.cumulative_inflation * self.mortality.spending_factor(household_state)
        });

        // Contributions and market growth
        for (idx, account) in next.accounts.iter_mut().enumerate() {
            let (traditional, roth) = contributions[idx];
            let growth = 1.0 + self.plans[idx].allocation.portfolio_return(sample);
            account.traditional = ((account.traditional + traditional) * growth).max(0.0);
            account.roth = ((account.roth + roth) * growth).max(0.0);
            participants[idx].traditional_balance = account.traditional;
            participants[idx].roth_balance = account.roth;
        }
        let total_tsp_balance = next.accounts.iter().map(AccountState::total).sum();

        // Factors for next year
        next.cumulative_inflation *= 1.0 + sample.inflation;
        next.salary_factor *= 1.0 + rules.salary_growth_rate;
        next.ss_cola_factor *= 1.0 + sample.cola;
        next.healthcare_factor *= 1.0 + rules.health.inflation_rate;
        for (idx, plan) in self.plans.iter().enumerate() {
            let Some(annuity) = &plan.annuity else {
                continue;
            };
            let receiving = year >= annuity.start_year;
            let eligible = participants[idx].stage == LifeStage::Deceased
                || participants[idx].age + 1 >= FERS_COLA_AGE;
            if receiving && eligible {
                next.fers_cola_factors[idx] *= 1.0 + fers_cola(sample.cola);
            }
        }

        tracing::trace!(year, net_income, total_tsp_balance, "projected year");

        let cash_flow = AnnualCashFlow {
            year_index,
            year,
            participants,
            household_state,
            filing_status,
            gross_income,
            taxable_social_security: taxes.taxable_social_security,
            adjusted_gross_income: taxes.adjusted_gross_income,
            magi,
            federal_tax: taxes.federal,
            state_tax: taxes.state,
            local_tax: taxes.local,
            fica,
            medicare_premiums,
            health_premiums,
            employee_contributions,
            net_income,
            spending_target,
            surplus: spending_target.map(|target| net_income - target),
            total_tsp_balance,
            shortfall,
            inflation_rate: sample.inflation,
            cola_rate: sample.cola,
        };
        Ok((cash_flow, next))
    }

    /// FEHB for the household while the enrollee (or an annuitant survivor)
    /// lives, otherwise marketplace cover for retirees under Medicare age.
    fn health_premiums(
        &self,
        participants: &[ParticipantYear],
        state: HouseholdState,
        healthcare_factor: f64,
    ) -> f64 {
        let health = &self.assumptions.health;
        let medicare_age = i16::from(health.medicare_age);

        let fehb_covered = self.household.fehb_holder().is_some_and(|holder| {
            if participants[holder.index()].stage != LifeStage::Deceased {
                return true;
            }
            let election = self
                .household
                .participant(holder)
                .map_or(0.0, |p| p.survivor_benefit_election);
            let died_retired = self
                .mortality
                .death_year(holder)
                .is_some_and(|died| died >= self.plans[holder.index()].retirement_year);
            matches!(state, HouseholdState::OneDeceased(_)) && election > 0.0 && died_retired
        });
        if fehb_covered {
            return health.fehb_annual * healthcare_factor;
        }

        participants
            .iter()
            .filter(|p| p.stage == LifeStage::Retired && p.age < medicare_age)
            .count() as f64
            * health.marketplace_annual
            * healthcare_factor
    }
}

fn participant_id(index: usize) -> ParticipantId {
    ParticipantId(u16::try_from(index).unwrap_or(u16::MAX))
}

fn merge_account(accounts: &mut [AccountState], from: ParticipantId, into: ParticipantId) {
    let moved = accounts[from.index()];
    accounts[from.index()] = AccountState {
        traditional: 0.0,
        roth: 0.0,
        ..moved
    };
    let heir = &mut accounts[into.index()];
    heir.traditional += moved.traditional;
    heir.roth += moved.roth;
    if let Some(basis) = heir.balance_at_retirement.as_mut() {
        *basis += moved.total();
    }
}

/// Project a single year without holding an engine.
pub fn project_year(
    household: &Household,
    scenario: &GenericScenario,
    assumptions: &GlobalAssumptions,
    year_index: usize,
    sample: &MarketSample,
    prior: &YearState,
) -> Result<(AnnualCashFlow, YearState), ProjectionError> {
    ProjectionEngine::new(household, scenario, assumptions)?.project_year(year_index, sample, prior)
}

/// Deterministic projection using the assumptions' fixed returns
pub fn project_scenario(
    household: &Household,
    scenario: &GenericScenario,
    assumptions: &GlobalAssumptions,
) -> Result<Projection, ProjectionError> {
    ProjectionEngine::new(household, scenario, assumptions)?.project_deterministic()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ParticipantBuilder, ScenarioBuilder};
    use crate::model::ParticipantScenario;
    use jiff::civil::date;

    fn retiree_household() -> Household {
        Household::new(vec![
            ParticipantBuilder::new("Alex", date(1960, 3, 1))
                .tsp(400_000.0, 100_000.0)
                .social_security(1_800.0, 2_400.0, 3_000.0)
                .build(),
            ParticipantBuilder::new("Sam", date(1960, 7, 1))
                .social_security(1_200.0, 1_600.0, 2_000.0)
                .build(),
        ])
        .unwrap()
    }

    fn retired(claim_age: u8) -> ParticipantScenario {
        ParticipantScenario {
            retirement_date: date(2020, 1, 1),
            ss_claim_age: claim_age,
            withdrawal: WithdrawalSpec::None,
            withdrawal_source: WithdrawalSource::TraditionalFirst,
            allocation: TspAllocation::default(),
        }
    }

    #[test]
    fn test_social_security_starts_in_claim_year() {
        let household = retiree_household();
        let scenario = ScenarioBuilder::new("base")
            .participant("Alex", retired(67))
            .participant("Sam", retired(67))
            .build();
        let assumptions = GlobalAssumptions::flat();
        let projection = project_scenario(&household, &scenario, &assumptions).unwrap();

        // Both turn 67 in 2027: Alex in March, Sam in July
        let before = projection.year(2026).unwrap();
        assert_eq!(before.participant(ParticipantId(0)).unwrap().social_security, 0.0);

        let claim = projection.year(2027).unwrap();
        let alex = claim.participant(ParticipantId(0)).unwrap();
        let sam = claim.participant(ParticipantId(1)).unwrap();
        assert!((alex.social_security - 2_400.0 * 10.0).abs() < 1e-6);
        assert!((sam.social_security - 1_600.0 * 6.0).abs() < 1e-6);

        let full = projection.year(2028).unwrap();
        assert!((full.participant(ParticipantId(0)).unwrap().social_security - 28_800.0).abs() < 1e-6);
    }

    #[test]
    fn test_year_out_of_bounds() {
        let household = retiree_household();
        let scenario = ScenarioBuilder::new("base")
            .participant("Alex", retired(67))
            .participant("Sam", retired(67))
            .build();
        let assumptions = GlobalAssumptions::flat();
        let engine = ProjectionEngine::new(&household, &scenario, &assumptions).unwrap();
        let state = engine.initial_state();
        let err = engine
            .project_year(30, &MarketSample::default(), &state)
            .unwrap_err();
        assert_eq!(err, ProjectionError::YearOutOfBounds { index: 30, horizon: 30 });

        let mut market = FixedMarket::new(MarketSample::default());
        assert!(matches!(
            engine.project_through(&mut market, 45),
            Err(ProjectionError::YearOutOfBounds { index: 45, .. })
        ));
    }

    #[test]
    fn test_rmd_floor_forces_withdrawal() {
        let household = retiree_household();
        let scenario = ScenarioBuilder::new("base")
            .participant("Alex", retired(70))
            .participant("Sam", retired(70))
            .build();
        let assumptions = GlobalAssumptions::flat();
        let projection = project_scenario(&household, &scenario, &assumptions).unwrap();

        // Alex turns 73 in 2033
        let before = projection.year(2032).unwrap().participant(ParticipantId(0)).unwrap().clone();
        assert_eq!(before.rmd, 0.0);
        let at = projection.year(2033).unwrap().participant(ParticipantId(0)).unwrap().clone();
        assert!((at.rmd - 400_000.0 / 26.5).abs() < 1e-6, "rmd {}", at.rmd);
        assert_eq!(at.withdrawal_roth, 0.0);
    }

    #[test]
    fn test_working_year_contributions_and_fica() {
        let household = Household::new(vec![
            ParticipantBuilder::federal_employee("Alex", date(1970, 1, 1), date(2000, 1, 1))
                .salary(100_000.0)
                .high_3(95_000.0)
                .contributions(0.05, 0.0)
                .social_security(1_500.0, 2_000.0, 2_600.0)
                .fehb_holder()
                .build(),
        ])
        .unwrap();
        let scenario = ScenarioBuilder::new("work")
            .participant(
                "Alex",
                ParticipantScenario {
                    retirement_date: date(2030, 1, 1),
                    ..retired(67)
                },
            )
            .build();
        let assumptions = GlobalAssumptions::flat();
        let projection = project_scenario(&household, &scenario, &assumptions).unwrap();

        let first = &projection.cash_flows[0];
        let alex = first.participant(ParticipantId(0)).unwrap();
        assert_eq!(alex.stage, LifeStage::Working);
        assert_eq!(alex.salary, 100_000.0);
        assert_eq!(alex.tsp_contribution, 5_000.0);
        assert!((alex.agency_contribution - 5_000.0).abs() < 1e-9);
        assert!((first.fica - 7_650.0).abs() < 1e-6);
        assert!((first.total_tsp_balance - 10_000.0).abs() < 1e-6);
        assert_eq!(first.health_premiums, 7_800.0);

        let retired_year = projection.year(2030).unwrap();
        let alex = retired_year.participant(ParticipantId(0)).unwrap();
        assert_eq!(alex.stage, LifeStage::Retired);
        assert_eq!(alex.salary, 0.0);
        assert!(alex.pension > 0.0);
        // Age-62 benefit x 30 years of service / 40
        assert_eq!(alex.age, 60);
        assert!((alex.fers_supplement - 1_500.0 * 12.0 * 30.0 / 40.0).abs() < 1e-6);
        assert_eq!(retired_year.fica, 0.0);
    }

    #[test]
    fn test_first_fully_retired_index() {
        let household = retiree_household();
        let scenario = ScenarioBuilder::new("late")
            .participant(
                "Alex",
                ParticipantScenario {
                    retirement_date: date(2026, 7, 1),
                    ..retired(67)
                },
            )
            .participant("Sam", retired(67))
            .build();
        let assumptions = GlobalAssumptions::flat();
        let engine = ProjectionEngine::new(&household, &scenario, &assumptions).unwrap();
        assert_eq!(engine.first_fully_retired_index(), Some(2));
    }

    #[test]
    fn test_spending_target_and_surplus() {
        let household = retiree_household();
        let scenario = ScenarioBuilder::new("base")
            .participant("Alex", retired(67))
            .participant("Sam", retired(67))
            .spending_baseline(50_000.0)
            .build();
        let assumptions = GlobalAssumptions {
            inflation_rate: 0.03,
            ..GlobalAssumptions::flat()
        };
        let projection = project_scenario(&household, &scenario, &assumptions).unwrap();
        let second = &projection.cash_flows[1];
        assert!((second.spending_target.unwrap() - 51_500.0).abs() < 1e-6);
        assert!(
            (second.surplus.unwrap() - (second.net_income - 51_500.0)).abs() < 1e-6
        );
    }
}
