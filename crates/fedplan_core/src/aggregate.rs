//! Reduce Monte Carlo trials to summary statistics

use crate::model::{PercentileSummary, SimulationTrial, YearBand};

/// Value at `p` (0.0-1.0) of an ascending slice, linearly interpolating
/// between the two nearest ranks at position `p * (n - 1)`.
///
/// Returns 0.0 for an empty slice.
#[must_use]
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    match sorted {
        [] => 0.0,
        [only] => *only,
        _ => {
            let rank = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
            let lower = rank.floor() as usize;
            let upper = rank.ceil() as usize;
            let weight = rank - lower as f64;
            sorted[lower] + (sorted[upper] - sorted[lower]) * weight
        }
    }
}

impl PercentileSummary {
    /// Percentiles of an unsorted set of values
    #[must_use]
    pub fn from_values(values: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted)
    }

    #[must_use]
    pub fn from_sorted(sorted: &[f64]) -> Self {
        Self {
            p10: percentile(sorted, 0.10),
            p25: percentile(sorted, 0.25),
            p50: percentile(sorted, 0.50),
            p75: percentile(sorted, 0.75),
            p90: percentile(sorted, 0.90),
        }
    }
}

/// Statistics over a set of completed trials
#[derive(Debug, Clone, PartialEq)]
pub struct TrialAggregate {
    pub successful: usize,
    pub depleted: usize,
    pub success_rate: f64,
    pub ending_balance: PercentileSummary,
    pub net_income: PercentileSummary,
    pub median_longevity_years: f64,
    pub yearly_bands: Vec<YearBand>,
}

/// Aggregate completed trials.
///
/// `errored` trials count toward the success-rate denominator as failures.
/// Bands are built for every year index any trial reached; `start_year`
/// labels year index 0.
#[must_use]
pub fn aggregate_trials(trials: &[SimulationTrial], errored: usize, start_year: i16) -> TrialAggregate {
    let successful = trials.iter().filter(|t| t.success).count();
    let depleted = trials.iter().filter(|t| t.depletion_year.is_some()).count();
    let total = trials.len() + errored;
    let success_rate = if total == 0 {
        0.0
    } else {
        successful as f64 / total as f64
    };

    let ending_balance =
        PercentileSummary::from_values(&trials.iter().map(|t| t.ending_balance).collect::<Vec<_>>());
    let net_income = PercentileSummary::from_values(
        &trials.iter().map(|t| t.ending_net_income).collect::<Vec<_>>(),
    );

    let mut longevity: Vec<f64> = trials.iter().map(|t| t.longevity_years as f64).collect();
    longevity.sort_by(f64::total_cmp);
    let median_longevity_years = percentile(&longevity, 0.5);

    let years = trials.iter().map(|t| t.balances.len()).max().unwrap_or(0);
    let yearly_bands = (0..years)
        .map(|year_index| {
            let balances: Vec<f64> = trials
                .iter()
                .filter_map(|t| t.balances.get(year_index).copied())
                .collect();
            let incomes: Vec<f64> = trials
                .iter()
                .filter_map(|t| t.net_incomes.get(year_index).copied())
                .collect();
            YearBand {
                year_index,
                year: start_year.saturating_add(i16::try_from(year_index).unwrap_or(i16::MAX)),
                trials: balances.len(),
                balance: PercentileSummary::from_values(&balances),
                net_income: PercentileSummary::from_values(&incomes),
            }
        })
        .collect();

    TrialAggregate {
        successful,
        depleted,
        success_rate,
        ending_balance,
        net_income,
        median_longevity_years,
        yearly_bands,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trial(index: usize, success: bool, balances: Vec<f64>) -> SimulationTrial {
        let horizon = balances.len();
        SimulationTrial {
            index,
            seed: index as u64,
            success,
            depletion_year: (!success).then_some(2030),
            longevity_years: if success { horizon } else { 5 },
            ending_balance: balances.last().copied().unwrap_or(0.0),
            ending_net_income: 50_000.0 + index as f64,
            net_incomes: vec![50_000.0; horizon],
            balances,
            cash_flows: None,
        }
    }

    #[test]
    fn test_percentiles_of_one_to_hundred() {
        let values: Vec<f64> = (1..=100).map(f64::from).collect();
        let summary = PercentileSummary::from_sorted(&values);
        assert!((summary.p10 - 10.9).abs() < 1e-9);
        assert!((summary.p25 - 25.75).abs() < 1e-9);
        assert!((summary.p50 - 50.5).abs() < 1e-9);
        assert!((summary.p75 - 75.25).abs() < 1e-9);
        assert!((summary.p90 - 90.1).abs() < 1e-9);
    }

    #[test]
    fn test_percentile_edges() {
        assert_eq!(percentile(&[], 0.5), 0.0);
        assert_eq!(percentile(&[7.0], 0.9), 7.0);
        assert_eq!(percentile(&[1.0, 3.0], 0.0), 1.0);
        assert_eq!(percentile(&[1.0, 3.0], 1.0), 3.0);
        assert_eq!(percentile(&[1.0, 3.0], 0.5), 2.0);
    }

    #[test]
    fn test_from_values_sorts() {
        let summary = PercentileSummary::from_values(&[5.0, 1.0, 3.0, 2.0, 4.0]);
        assert_eq!(summary.p50, 3.0);
        assert!(summary.p10 <= summary.p50 && summary.p50 <= summary.p90);
    }

    #[test]
    fn test_aggregate_counts_errors_as_failures() {
        let trials = vec![
            trial(0, true, vec![100.0, 90.0, 80.0]),
            trial(1, true, vec![100.0, 110.0, 120.0]),
            trial(2, false, vec![100.0, 0.0, 0.0]),
        ];
        let agg = aggregate_trials(&trials, 1, 2025);
        assert_eq!(agg.successful, 2);
        assert_eq!(agg.depleted, 1);
        assert!((agg.success_rate - 0.5).abs() < 1e-12);
        assert_eq!(agg.median_longevity_years, 3.0);
        assert_eq!(agg.yearly_bands.len(), 3);
        assert_eq!(agg.yearly_bands[2].year, 2027);
        assert_eq!(agg.yearly_bands[2].balance.p50, 80.0);
    }

    #[test]
    fn test_bands_tolerate_truncated_trials() {
        let trials = vec![
            trial(0, true, vec![100.0, 90.0]),
            trial(1, true, vec![100.0, 110.0, 120.0, 130.0]),
        ];
        let agg = aggregate_trials(&trials, 0, 2025);
        assert_eq!(agg.yearly_bands.len(), 4);
        assert_eq!(agg.yearly_bands[3].trials, 1);
        assert_eq!(agg.yearly_bands[3].balance.p90, 130.0);
    }

    #[test]
    fn test_empty_aggregate() {
        let agg = aggregate_trials(&[], 0, 2025);
        assert_eq!(agg.success_rate, 0.0);
        assert!(agg.yearly_bands.is_empty());
    }
}
