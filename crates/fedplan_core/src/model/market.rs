//! Per-year market values and TSP fund allocations

use serde::{Deserialize, Serialize};

use crate::error::MarketError;

use super::TspFund;

/// A value for each TSP fund
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FundValues {
    #[serde(default)]
    pub g: f64,
    #[serde(default)]
    pub f: f64,
    #[serde(default)]
    pub c: f64,
    #[serde(default)]
    pub s: f64,
    #[serde(default)]
    pub i: f64,
}

impl FundValues {
    #[must_use]
    pub fn get(&self, fund: TspFund) -> f64 {
        match fund {
            TspFund::G => self.g,
            TspFund::F => self.f,
            TspFund::C => self.c,
            TspFund::S => self.s,
            TspFund::I => self.i,
        }
    }

    pub fn set(&mut self, fund: TspFund, value: f64) {
        match fund {
            TspFund::G => self.g = value,
            TspFund::F => self.f = value,
            TspFund::C => self.c = value,
            TspFund::S => self.s = value,
            TspFund::I => self.i = value,
        }
    }

    /// Same value in every fund
    #[must_use]
    pub fn uniform(value: f64) -> Self {
        Self {
            g: value,
            f: value,
            c: value,
            s: value,
            i: value,
        }
    }
}

/// One year's market conditions
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSample {
    pub fund_returns: FundValues,
    pub inflation: f64,
    pub cola: f64,
}

impl MarketSample {
    /// Every fund returns `rate`; inflation and COLA are as given.
    #[must_use]
    pub fn flat(rate: f64, inflation: f64, cola: f64) -> Self {
        Self {
            fund_returns: FundValues::uniform(rate),
            inflation,
            cola,
        }
    }
}

const ALLOCATION_TOLERANCE: f64 = 1e-6;

/// Weights across TSP funds; must be non-negative and sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TspAllocation(pub FundValues);

impl TspAllocation {
    pub fn new(weights: FundValues) -> Result<Self, MarketError> {
        let allocation = Self(weights);
        allocation.validate()?;
        Ok(allocation)
    }

    /// Entire balance in one fund
    #[must_use]
    pub fn single(fund: TspFund) -> Self {
        let mut weights = FundValues::default();
        weights.set(fund, 1.0);
        Self(weights)
    }

    pub fn validate(&self) -> Result<(), MarketError> {
        let sum: f64 = TspFund::ALL.iter().map(|f| self.0.get(*f)).sum();
        let negative = TspFund::ALL.iter().any(|f| self.0.get(*f) < 0.0);
        if negative || (sum - 1.0).abs() > ALLOCATION_TOLERANCE {
            return Err(MarketError::InvalidAllocation { sum });
        }
        Ok(())
    }

    #[must_use]
    pub fn weight(&self, fund: TspFund) -> f64 {
        self.0.get(fund)
    }

    /// Funds carrying a non-zero weight
    pub fn active_funds(&self) -> impl Iterator<Item = TspFund> + '_ {
        TspFund::ALL.into_iter().filter(|f| self.0.get(*f) > 0.0)
    }

    /// Weighted portfolio return for `sample`, floored at -100%.
    #[must_use]
    pub fn portfolio_return(&self, sample: &MarketSample) -> f64 {
        TspFund::ALL
            .iter()
            .map(|f| self.0.get(*f) * sample.fund_returns.get(*f))
            .sum::<f64>()
            .max(-1.0)
    }
}

impl Default for TspAllocation {
    /// A moderate lifecycle-style mix
    fn default() -> Self {
        Self(FundValues {
            g: 0.20,
            f: 0.20,
            c: 0.40,
            s: 0.10,
            i: 0.10,
        })
    }
}

/// Mean and standard deviation of a normally distributed annual series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesParameters {
    pub mean: f64,
    pub std_dev: f64,
}

impl SeriesParameters {
    #[must_use]
    pub const fn new(mean: f64, std_dev: f64) -> Self {
        Self { mean, std_dev }
    }
}

/// Parameters for the statistical sampler. Series are drawn independently
/// unless `cola_tracks_inflation` ties COLA to the inflation draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatisticalParameters {
    pub g: SeriesParameters,
    pub f: SeriesParameters,
    pub c: SeriesParameters,
    pub s: SeriesParameters,
    pub i: SeriesParameters,
    pub inflation: SeriesParameters,
    pub cola: SeriesParameters,
    #[serde(default)]
    pub cola_tracks_inflation: bool,
}

impl StatisticalParameters {
    #[must_use]
    pub fn fund(&self, fund: TspFund) -> SeriesParameters {
        match fund {
            TspFund::G => self.g,
            TspFund::F => self.f,
            TspFund::C => self.c,
            TspFund::S => self.s,
            TspFund::I => self.i,
        }
    }
}

impl Default for StatisticalParameters {
    /// Moments of the embedded US proxy series
    fn default() -> Self {
        Self {
            g: SeriesParameters::new(0.0341782, 0.0305423),
            f: SeriesParameters::new(0.047717, 0.0700793),
            c: SeriesParameters::new(0.11471, 0.18146),
            s: SeriesParameters::new(0.147749, 0.278003),
            i: SeriesParameters::new(0.0778324, 0.188273),
            inflation: SeriesParameters::new(0.0347068, 0.0279436),
            cola: SeriesParameters::new(0.0347068, 0.0279436),
            cola_tracks_inflation: false,
        }
    }
}
