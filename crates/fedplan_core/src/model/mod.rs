mod assumptions;
mod cash_flow;
mod household;
mod ids;
mod market;
mod results;
mod rmd;
mod scenario;

pub use assumptions::{
    BracketTable, FersRules, FicaRates, GlobalAssumptions, HealthPremiums, IrmaaSchedule,
    IrmaaTier, StandardDeduction, StateTax, TaxBracket,
};
pub use cash_flow::{AnnualCashFlow, HouseholdState, LifeStage, ParticipantYear};
pub use household::{FilingStatus, Household, Participant};
pub use ids::{ParticipantId, TspFund};
pub use market::{
    FundValues, MarketSample, SeriesParameters, StatisticalParameters, TspAllocation,
};
pub use results::{
    DEPLETION_THRESHOLD, Depletion, MonteCarloConfig, MonteCarloProgress, PercentileSummary,
    Projection, SamplingMode, SimulationResult, SimulationTrial, YearBand,
};
pub use rmd::{RmdRules, RmdTable, RmdTableEntry};
pub use scenario::{
    DeathEvent, FilingStatusSwitch, GenericScenario, MortalitySpec, ParticipantScenario,
    TspDisposition, WithdrawalSource, WithdrawalSpec,
};
