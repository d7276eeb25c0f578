use std::borrow::Cow;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::MarketError;
use crate::model::TspFund;

use super::history_data;

/// Read-only source of historical annual market data.
///
/// Loaded once and shared across every Monte Carlo worker.
pub trait HistoricalDataProvider: Send + Sync {
    /// Annual return of a TSP fund (or its proxy) in `year`
    fn tsp_return(&self, fund: TspFund, year: i16) -> Option<f64>;

    fn inflation_rate(&self, year: i16) -> Option<f64>;

    /// COLA effective in `year`
    fn cola_rate(&self, year: i16) -> Option<f64>;

    /// Years for which inflation, COLA and at least one fund are known, ascending
    fn available_years(&self) -> Vec<i16>;

    fn validate_data_quality(&self) -> Result<DataQualityReport, MarketError>;
}

/// Summary returned by a successful data-quality check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataQualityReport {
    pub first_year: i16,
    pub last_year: i16,
    pub years: usize,
    /// Years where every fund, inflation and COLA are present
    pub complete_years: usize,
}

/// An annual series indexed from its first year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualSeries {
    pub name: Cow<'static, str>,
    pub start_year: i16,
    pub values: Cow<'static, [f64]>,
}

impl AnnualSeries {
    #[must_use]
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        start_year: i16,
        values: impl Into<Cow<'static, [f64]>>,
    ) -> Self {
        Self {
            name: name.into(),
            start_year,
            values: values.into(),
        }
    }

    #[must_use]
    pub fn get(&self, year: i16) -> Option<f64> {
        let offset = usize::try_from(year.checked_sub(self.start_year)?).ok()?;
        self.values.get(offset).copied()
    }

    #[must_use]
    pub fn end_year(&self) -> i16 {
        let len = i16::try_from(self.values.len()).unwrap_or(i16::MAX);
        self.start_year.saturating_add(len) - 1
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The same values shifted forward by `years`
    #[must_use]
    pub fn lagged(&self, years: i16, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            start_year: self.start_year + years,
            values: self.values.clone(),
        }
    }
}

/// Historical data held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryHistory {
    funds: FxHashMap<TspFund, AnnualSeries>,
    inflation: Option<AnnualSeries>,
    cola: Option<AnnualSeries>,
}

impl InMemoryHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_fund(mut self, fund: TspFund, series: AnnualSeries) -> Self {
        self.funds.insert(fund, series);
        self
    }

    #[must_use]
    pub fn with_inflation(mut self, series: AnnualSeries) -> Self {
        self.inflation = Some(series);
        self
    }

    #[must_use]
    pub fn with_cola(mut self, series: AnnualSeries) -> Self {
        self.cola = Some(series);
        self
    }

    /// Embedded US proxies for the TSP funds.
    ///
    /// C <- S&P 500, S <- US small cap, F <- long government bonds,
    /// G <- 3-month T-bills, I <- developed ex-US (1991+), inflation <- CPI-U,
    /// and the COLA for year y is the CPI-U of year y-1.
    #[must_use]
    pub fn us_proxies() -> Self {
        use history_data::*;

        let cpi = AnnualSeries::new("CPI-U", US_CPI_START, US_CPI);
        Self::new()
            .with_fund(TspFund::C, AnnualSeries::new("S&P 500", SP_500_START, SP_500))
            .with_fund(
                TspFund::S,
                AnnualSeries::new("US Small Cap", US_SMALL_CAP_START, US_SMALL_CAP),
            )
            .with_fund(
                TspFund::F,
                AnnualSeries::new("US Long Bonds", US_LONG_BOND_START, US_LONG_BOND),
            )
            .with_fund(
                TspFund::G,
                AnnualSeries::new("US T-Bills", US_TBILLS_START, US_TBILLS),
            )
            .with_fund(
                TspFund::I,
                AnnualSeries::new("Intl Developed", INTL_DEVELOPED_START, INTL_DEVELOPED),
            )
            .with_cola(cpi.lagged(1, "COLA (prior-year CPI-U)"))
            .with_inflation(cpi)
    }

    fn all_series(&self) -> impl Iterator<Item = &AnnualSeries> {
        self.funds
            .values()
            .chain(self.inflation.iter())
            .chain(self.cola.iter())
    }

    fn year_span(&self) -> Option<(i16, i16)> {
        let first = self.all_series().map(|s| s.start_year).min()?;
        let last = self.all_series().map(AnnualSeries::end_year).max()?;
        Some((first, last))
    }
}

impl HistoricalDataProvider for InMemoryHistory {
    fn tsp_return(&self, fund: TspFund, year: i16) -> Option<f64> {
        self.funds.get(&fund).and_then(|s| s.get(year))
    }

    fn inflation_rate(&self, year: i16) -> Option<f64> {
        self.inflation.as_ref().and_then(|s| s.get(year))
    }

    fn cola_rate(&self, year: i16) -> Option<f64> {
        self.cola.as_ref().and_then(|s| s.get(year))
    }

    fn available_years(&self) -> Vec<i16> {
        let Some((first, last)) = self.year_span() else {
            return Vec::new();
        };
        (first..=last)
            .filter(|&y| {
                self.inflation_rate(y).is_some()
                    && self.cola_rate(y).is_some()
                    && TspFund::ALL.iter().any(|f| self.tsp_return(*f, y).is_some())
            })
            .collect()
    }

    fn validate_data_quality(&self) -> Result<DataQualityReport, MarketError> {
        for series in self.all_series() {
            if let Some((offset, _)) = series
                .values
                .iter()
                .enumerate()
                .find(|(_, v)| !v.is_finite() || **v < -1.0)
            {
                let year = series.start_year + i16::try_from(offset).unwrap_or(i16::MAX);
                return Err(MarketError::MissingValue {
                    series: series.name.to_string(),
                    year,
                });
            }
        }

        let years = self.available_years();
        let (Some(&first_year), Some(&last_year)) = (years.first(), years.last()) else {
            return Err(MarketError::InsufficientData {
                available: 0,
                required: 1,
            });
        };
        let complete_years = years
            .iter()
            .filter(|&&y| TspFund::ALL.iter().all(|f| self.tsp_return(*f, y).is_some()))
            .count();

        Ok(DataQualityReport {
            first_year,
            last_year,
            years: years.len(),
            complete_years,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_lookup() {
        let series = AnnualSeries::new("test", 2000, vec![0.01, 0.02, 0.03]);
        assert_eq!(series.get(1999), None);
        assert_eq!(series.get(2000), Some(0.01));
        assert_eq!(series.get(2002), Some(0.03));
        assert_eq!(series.get(2003), None);
        assert_eq!(series.end_year(), 2002);
    }

    #[test]
    fn test_us_proxies_coverage() {
        let history = InMemoryHistory::us_proxies();
        let years = history.available_years();
        // CPI starts 1948, so COLA starts 1949; bonds end 2023 but small cap runs to 2024
        assert_eq!(years.first(), Some(&1949));
        assert!(years.len() >= 70, "only {} years", years.len());

        assert_eq!(history.cola_rate(1949), history.inflation_rate(1948));
        assert_eq!(history.tsp_return(TspFund::I, 1990), None);
        assert!(history.tsp_return(TspFund::I, 1991).is_some());

        let report = history.validate_data_quality().unwrap();
        assert_eq!(report.complete_years, 33);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let history = InMemoryHistory::new()
            .with_fund(TspFund::C, AnnualSeries::new("C", 2000, vec![0.1, f64::NAN]))
            .with_inflation(AnnualSeries::new("CPI", 2000, vec![0.02, 0.02]))
            .with_cola(AnnualSeries::new("COLA", 2000, vec![0.02, 0.02]));
        assert!(matches!(
            history.validate_data_quality(),
            Err(MarketError::MissingValue { year: 2001, .. })
        ));
    }

    #[test]
    fn test_empty_history_is_insufficient() {
        let history = InMemoryHistory::new();
        assert!(history.available_years().is_empty());
        assert!(matches!(
            history.validate_data_quality(),
            Err(MarketError::InsufficientData { .. })
        ));
    }
}
