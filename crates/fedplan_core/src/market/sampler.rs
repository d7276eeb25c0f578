use rand::distr::Distribution;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::Normal;

use crate::error::MarketError;
use crate::model::{FundValues, MarketSample, SeriesParameters, StatisticalParameters, TspFund};

use super::HistoricalDataProvider;

/// Produces one [`MarketSample`] per projection year.
///
/// Implementations bound to a seed are deterministic: the same seed yields
/// the same sequence, and [`MarketSampler::restart`] rewinds to its start.
pub trait MarketSampler {
    fn next_year(&mut self) -> Result<MarketSample, MarketError>;

    /// Rewind to the first year of the sequence
    fn restart(&mut self);
}

/// The same sample every year; drives deterministic projections
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedMarket {
    sample: MarketSample,
}

impl FixedMarket {
    #[must_use]
    pub fn new(sample: MarketSample) -> Self {
        Self { sample }
    }
}

impl MarketSampler for FixedMarket {
    fn next_year(&mut self) -> Result<MarketSample, MarketError> {
        Ok(self.sample)
    }

    fn restart(&mut self) {}
}

/// Replays an explicit sequence, repeating the last entry once exhausted
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedMarket {
    samples: Vec<MarketSample>,
    cursor: usize,
}

impl ScriptedMarket {
    #[must_use]
    pub fn new(samples: Vec<MarketSample>) -> Self {
        Self { samples, cursor: 0 }
    }
}

impl MarketSampler for ScriptedMarket {
    fn next_year(&mut self) -> Result<MarketSample, MarketError> {
        let idx = self.cursor.min(self.samples.len().saturating_sub(1));
        let sample = self
            .samples
            .get(idx)
            .copied()
            .ok_or(MarketError::InsufficientData {
                available: 0,
                required: 1,
            })?;
        self.cursor += 1;
        Ok(sample)
    }

    fn restart(&mut self) {
        self.cursor = 0;
    }
}

/// Every historical year usable for a given allocation, with its joint sample.
///
/// A year qualifies when inflation, COLA and every fund in `required_funds`
/// are present. Funds outside that set fall back to 0.0 when missing.
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapTable {
    entries: Vec<(i16, MarketSample)>,
}

impl BootstrapTable {
    pub fn build(
        provider: &dyn HistoricalDataProvider,
        required_funds: &[TspFund],
    ) -> Result<Self, MarketError> {
        let entries: Vec<(i16, MarketSample)> = provider
            .available_years()
            .into_iter()
            .filter_map(|year| {
                let inflation = provider.inflation_rate(year)?;
                let cola = provider.cola_rate(year)?;
                let mut fund_returns = FundValues::default();
                for fund in TspFund::ALL {
                    match provider.tsp_return(fund, year) {
                        Some(r) => fund_returns.set(fund, r.max(-1.0)),
                        None if required_funds.contains(&fund) => {
                            tracing::trace!(year, %fund, "skipping year without required fund history");
                            return None;
                        }
                        None => {}
                    }
                }
                Some((
                    year,
                    MarketSample {
                        fund_returns,
                        inflation,
                        cola,
                    },
                ))
            })
            .collect();

        if entries.is_empty() {
            return Err(MarketError::InsufficientData {
                available: 0,
                required: 1,
            });
        }
        Ok(Self { entries })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn years(&self) -> impl Iterator<Item = i16> + '_ {
        self.entries.iter().map(|(y, _)| *y)
    }
}

/// Same-year joint bootstrap: each projection year draws one historical
/// calendar year with replacement and uses all of that year's values.
#[derive(Debug, Clone)]
pub struct HistoricalBootstrap<'a> {
    table: &'a BootstrapTable,
    seed: u64,
    rng: SmallRng,
    last_year: Option<i16>,
}

impl<'a> HistoricalBootstrap<'a> {
    #[must_use]
    pub fn new(table: &'a BootstrapTable, seed: u64) -> Self {
        Self {
            table,
            seed,
            rng: SmallRng::seed_from_u64(seed),
            last_year: None,
        }
    }

    /// Calendar year behind the most recent draw
    #[must_use]
    pub fn last_drawn_year(&self) -> Option<i16> {
        self.last_year
    }
}

impl MarketSampler for HistoricalBootstrap<'_> {
    fn next_year(&mut self) -> Result<MarketSample, MarketError> {
        if self.table.is_empty() {
            return Err(MarketError::InsufficientData {
                available: 0,
                required: 1,
            });
        }
        let idx = self.rng.random_range(0..self.table.len());
        let (year, sample) = self.table.entries[idx];
        self.last_year = Some(year);
        Ok(sample)
    }

    fn restart(&mut self) {
        self.rng = SmallRng::seed_from_u64(self.seed);
        self.last_year = None;
    }
}

fn normal(series: &'static str, params: SeriesParameters) -> Result<Normal<f64>, MarketError> {
    if !params.mean.is_finite() {
        return Err(MarketError::InvalidDistributionParameters {
            series,
            mean: params.mean,
            std_dev: params.std_dev,
            reason: "mean must be finite",
        });
    }
    let invalid_std_dev = MarketError::InvalidDistributionParameters {
        series,
        mean: params.mean,
        std_dev: params.std_dev,
        reason: "std_dev must be finite and non-negative",
    };
    // rand_distr only rejects a non-finite std_dev
    if params.std_dev.is_nan() || params.std_dev < 0.0 {
        return Err(invalid_std_dev);
    }
    Normal::new(params.mean, params.std_dev).map_err(|_| invalid_std_dev)
}

/// Independent normal draws per series, in the fixed order G, F, C, S, I,
/// inflation, COLA.
#[derive(Debug, Clone)]
pub struct StatisticalSampler {
    funds: [Normal<f64>; 5],
    inflation: Normal<f64>,
    cola: Normal<f64>,
    cola_tracks_inflation: bool,
    seed: u64,
    rng: SmallRng,
}

impl StatisticalSampler {
    pub fn new(params: &StatisticalParameters, seed: u64) -> Result<Self, MarketError> {
        Ok(Self {
            funds: [
                normal("G fund", params.g)?,
                normal("F fund", params.f)?,
                normal("C fund", params.c)?,
                normal("S fund", params.s)?,
                normal("I fund", params.i)?,
            ],
            inflation: normal("inflation", params.inflation)?,
            cola: normal("COLA", params.cola)?,
            cola_tracks_inflation: params.cola_tracks_inflation,
            seed,
            rng: SmallRng::seed_from_u64(seed),
        })
    }
}

impl MarketSampler for StatisticalSampler {
    fn next_year(&mut self) -> Result<MarketSample, MarketError> {
        let mut fund_returns = FundValues::default();
        for (fund, dist) in TspFund::ALL.iter().zip(&self.funds) {
            fund_returns.set(*fund, dist.sample(&mut self.rng).max(-1.0));
        }
        let inflation = self.inflation.sample(&mut self.rng);
        let cola = if self.cola_tracks_inflation {
            inflation
        } else {
            self.cola.sample(&mut self.rng)
        };
        Ok(MarketSample {
            fund_returns,
            inflation,
            cola,
        })
    }

    fn restart(&mut self) {
        self.rng = SmallRng::seed_from_u64(self.seed);
    }
}
