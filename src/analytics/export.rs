//! Export-All: the six headline analyses with default arguments, in one document.

use chrono::{DateTime, Local};
use serde::Serialize;

use super::{
    AgentShareRow, AgentShareSummary, ConversionParams, ConversionRow, ConversionSummary, Envelope,
    EvolutionRow, EvolutionSummary, FisheryAnalytics, PlantCapacityRow, PlantCapacitySummary,
    RegionalRow, RegionalSummary, SupplyDemandParams, SupplyDemandRow, SupplyDemandSummary,
};

/// Every headline analysis, keyed by analysis name.
///
/// A failed analysis is embedded as its failure envelope; the bundle itself always exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportBundle {
    pub generated_at: DateTime<Local>,
    pub supply_vs_demand: Envelope<SupplyDemandRow, SupplyDemandSummary>,
    pub conversion_efficiency: Envelope<ConversionRow, ConversionSummary>,
    pub regional_dynamics: Envelope<RegionalRow, RegionalSummary>,
    pub longitudinal_evolution: Envelope<EvolutionRow, EvolutionSummary>,
    pub agent_share: Envelope<AgentShareRow, AgentShareSummary>,
    pub plant_capacity_analysis: Envelope<PlantCapacityRow, PlantCapacitySummary>,
}

impl ExportBundle {
    /// Pretty-printed JSON document.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl FisheryAnalytics {
    /// Run supply-vs-demand, conversion efficiency, regional dynamics, longitudinal evolution,
    /// agent share and plant capacity with their defaults.
    ///
    /// With [`crate::config::AnalyticsOptions::parallel_export`] set, the analyses run on the
    /// rayon pool. The result is the same either way.
    pub fn export_all(&self) -> ExportBundle {
        let generated_at = Local::now();
        let supply = || self.supply_vs_demand(&SupplyDemandParams::default());
        let conversion = || self.conversion_efficiency(&ConversionParams::default());

        if self.options.parallel_export {
            let (headline, rest) = rayon::join(
                || rayon::join(supply, conversion),
                || {
                    rayon::join(
                        || rayon::join(|| self.regional_dynamics(), || self.longitudinal_evolution()),
                        || rayon::join(|| self.agent_share(), || self.plant_capacity_analysis()),
                    )
                },
            );
            let (supply_vs_demand, conversion_efficiency) = headline;
            let ((regional_dynamics, longitudinal_evolution), (agent_share, plant_capacity_analysis)) =
                rest;
            ExportBundle {
                generated_at,
                supply_vs_demand,
                conversion_efficiency,
                regional_dynamics,
                longitudinal_evolution,
                agent_share,
                plant_capacity_analysis,
            }
        } else {
            ExportBundle {
                generated_at,
                supply_vs_demand: supply(),
                conversion_efficiency: conversion(),
                regional_dynamics: self.regional_dynamics(),
                longitudinal_evolution: self.longitudinal_evolution(),
                agent_share: self.agent_share(),
                plant_capacity_analysis: self.plant_capacity_analysis(),
            }
        }
    }
}
