//! The aggregation engine.
//!
//! [`FisheryAnalytics`] is built once from the three base tables and then answers any number of
//! independent analysis calls. Each call reads the stored snapshots, optionally filters them,
//! groups/joins/pivots, derives ratios and percentages, and wraps the rows and a summary in an
//! [`Envelope`]. Calls never mutate the engine, so one instance can be shared across threads.
//!
//! | method | analysis |
//! |---|---|
//! | [`FisheryAnalytics::supply_vs_demand`] | captures vs industrial raw material per year and species |
//! | [`FisheryAnalytics::conversion_efficiency`] | output/raw-material yield per species and line |
//! | [`FisheryAnalytics::regional_dynamics`] | captures vs production per region |
//! | [`FisheryAnalytics::longitudinal_evolution`] | yearly captures and plant counts with variations |
//! | [`FisheryAnalytics::agent_share`] | region × agent-type pivot with shares |
//! | [`FisheryAnalytics::agent_distribution`] | tonnage share per agent type |
//! | [`FisheryAnalytics::top_ports`] | port ranking and concentration |
//! | [`FisheryAnalytics::species_by_agent_breakdown`] | top species × agent-type pivot |
//! | [`FisheryAnalytics::seasonal_context`] | one year's months against the historical mean |
//! | [`FisheryAnalytics::plant_capacity_analysis`] | production per plant, per year and region |
//! | [`FisheryAnalytics::export_all`] | the six headline analyses in one bundle |

mod agents;
mod capacity;
mod conversion;
mod envelope;
mod evolution;
mod export;
mod ports;
mod regional;
mod seasonal;
mod store;
mod supply;

use serde::Serialize;

use crate::config::AnalyticsOptions;
use crate::error::{AnalysisError, SchemaError};
use crate::observability::{AnalysisContext, AnalysisStats, Severity};
use crate::types::DataSet;

pub use agents::{
    AgentDistributionParams, AgentDistributionRow, AgentDistributionSummary, AgentShareParams,
    AgentShareRow, AgentShareSummary, SpeciesBreakdownParams, SpeciesBreakdownRow,
    SpeciesBreakdownSummary,
};
pub use capacity::{PlantCapacityParams, PlantCapacityRow, PlantCapacitySummary};
pub use conversion::{ConversionParams, ConversionRow, ConversionSummary};
pub use envelope::{AnalysisKind, Envelope, Failure, Metadata, Report};
pub use evolution::{EvolutionParams, EvolutionRow, EvolutionSummary};
pub use export::ExportBundle;
pub use ports::{TopPortsParams, TopPortsRow, TopPortsSummary};
pub use regional::{RegionalParams, RegionalRow, RegionalSummary};
pub use seasonal::{SeasonalParams, SeasonalRow, SeasonalSummary};
pub use store::{CaptureIdx, PlantIdx, ProductionIdx, TableStore};
pub use supply::{SupplyDemandParams, SupplyDemandRow, SupplyDemandSummary};

/// Rows and summary of a computed analysis, or why there are none.
type Computed<R, S> = Result<(Vec<R>, S), AnalysisError>;

/// Comparative statistics over captures, production and plants.
///
/// ```rust
/// use fishery_analytics::analytics::{FisheryAnalytics, SupplyDemandParams};
/// use fishery_analytics::types::{DataSet, DataType, Field, Schema, Value};
///
/// let s = |v: &str| Value::Utf8(v.to_string());
/// let captures = DataSet::new(
///     Schema::new(vec![
///         Field::new("Year", DataType::Int64),
///         Field::new("Species", DataType::Utf8),
///         Field::new("Tons", DataType::Float64),
///     ]),
///     vec![vec![Value::Int64(2020), s("salmon"), Value::Float64(1000.0)]],
/// );
/// let production = DataSet::new(
///     Schema::new(vec![
///         Field::new("Year", DataType::Int64),
///         Field::new("Species", DataType::Utf8),
///         Field::new("RawMaterial", DataType::Float64),
///         Field::new("Output", DataType::Float64),
///     ]),
///     vec![vec![Value::Int64(2020), s("SALMON "), Value::Float64(800.0), Value::Float64(700.0)]],
/// );
/// let plants = DataSet::new(
///     Schema::new(vec![
///         Field::new("Year", DataType::Int64),
///         Field::new("Region", DataType::Utf8),
///         Field::new("PlantName", DataType::Utf8),
///     ]),
///     vec![],
/// );
///
/// let engine = FisheryAnalytics::new(&captures, &production, &plants).unwrap();
/// let result = engine.supply_vs_demand(&SupplyDemandParams { start_year: 2020, ..Default::default() });
/// let row = &result.data()[0];
/// assert_eq!(row.species, "SALMON");
/// assert_eq!(row.delta, 200.0);
/// assert_eq!(row.percent_used, 80.0);
/// ```
#[derive(Debug, Clone)]
pub struct FisheryAnalytics {
    store: TableStore,
    options: AnalyticsOptions,
}

impl FisheryAnalytics {
    /// Build an engine with [`AnalyticsOptions::default`].
    pub fn new(
        captures: &DataSet,
        production: &DataSet,
        plants: &DataSet,
    ) -> Result<Self, SchemaError> {
        Self::with_options(captures, production, plants, AnalyticsOptions::default())
    }

    /// Build an engine. Fails if any required column is absent; the inputs are copied, never
    /// modified.
    pub fn with_options(
        captures: &DataSet,
        production: &DataSet,
        plants: &DataSet,
        options: AnalyticsOptions,
    ) -> Result<Self, SchemaError> {
        let store = TableStore::new(captures, production, plants, &options.columns)?;
        Ok(Self { store, options })
    }

    /// The normalized base tables.
    pub fn tables(&self) -> &TableStore {
        &self.store
    }

    pub fn options(&self) -> &AnalyticsOptions {
        &self.options
    }

    /// Wrap a computed result, reporting the outcome to the configured observer.
    fn finish<P: Serialize, R, S>(
        &self,
        kind: AnalysisKind,
        params: &P,
        computed: Computed<R, S>,
    ) -> Envelope<R, S> {
        let ctx = AnalysisContext { analysis: kind };
        match computed {
            Ok((data, summary)) => {
                if let Some(obs) = self.options.observer.as_ref() {
                    obs.on_success(&ctx, AnalysisStats { rows: data.len() });
                }
                Envelope::Success(Report {
                    analysis_type: kind,
                    metadata: Metadata::new(params),
                    data,
                    summary,
                })
            }
            Err(error) => {
                if let Some(obs) = self.options.observer.as_ref() {
                    let sev = Severity::of(&error);
                    obs.on_failure(&ctx, sev, &error);
                    if sev >= self.options.alert_at_or_above {
                        obs.on_alert(&ctx, sev, &error);
                    }
                }
                Envelope::Failure(Failure {
                    analysis_type: kind,
                    error,
                })
            }
        }
    }
}

/// Round half to even at `decimals` places.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

pub(crate) fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

/// `part / whole * 100` rounded to 2 decimals, or `0.0` when `whole` is not positive.
pub(crate) fn percent_of(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        round2(part / whole * 100.0)
    } else {
        0.0
    }
}

pub(crate) fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Index of the first maximum under `key`.
pub(crate) fn first_max_by<T>(items: &[T], key: impl Fn(&T) -> f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, item) in items.iter().enumerate() {
        let v = key(item);
        if best.is_none_or(|(_, b)| v > b) {
            best = Some((i, v));
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::{first_max_by, mean, percent_of, round_to};

    #[test]
    fn rounding_is_half_to_even() {
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(2.5, 0), 2.0);
        assert_eq!(round_to(1.23456, 4), 1.2346);
        assert_eq!(round_to(80.00000000000001, 2), 80.0);
    }

    #[test]
    fn percent_of_zero_whole_is_zero() {
        assert_eq!(percent_of(800.0, 1000.0), 80.0);
        assert_eq!(percent_of(5.0, 0.0), 0.0);
    }

    #[test]
    fn mean_of_nothing_is_absent() {
        assert_eq!(mean([]), None);
        assert_eq!(mean([1.0, 2.0]), Some(1.5));
    }

    #[test]
    fn first_max_keeps_earliest_tie() {
        assert_eq!(first_max_by(&[1.0, 3.0, 3.0], |v| *v), Some(1));
        assert_eq!(first_max_by(&[] as &[f64], |v| *v), None);
    }
}
