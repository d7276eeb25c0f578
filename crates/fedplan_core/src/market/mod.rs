//! Market data and per-year market samplers

pub mod history_data;
mod provider;
mod sampler;

pub use provider::{AnnualSeries, DataQualityReport, HistoricalDataProvider, InMemoryHistory};
pub use sampler::{
    BootstrapTable, FixedMarket, HistoricalBootstrap, MarketSampler, ScriptedMarket,
    StatisticalSampler,
};
