//! Analyses along the agent-type dimension (industrial fleet, artisanal fleet, ...).
//!
//! The agent types are whatever the captures table contains, so pivoted rows carry them as a
//! map and each summary lists the types it found.

use std::collections::{BTreeMap, BTreeSet};

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::store::{text_key, TableStore};
use super::{percent_of, round2, AnalysisKind, Computed, Envelope, FisheryAnalytics};
use crate::error::{AnalysisError, TableKind};
use crate::processing::{filter, group, pivot_sum, Pivot};

/// Agent share takes no parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AgentShareParams {}

/// One region of the agent-share pivot.
///
/// Serializes flat: `Region`, one key per agent type, `Total`, then `<type>_Pct` per agent type.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentShareRow {
    pub region: String,
    /// Tons per agent type. Every observed type is present.
    pub tons: BTreeMap<String, f64>,
    pub total: f64,
    /// Share of `total` per agent type, in percent.
    pub shares: BTreeMap<String, f64>,
}

impl Serialize for AgentShareRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2 + self.tons.len() + self.shares.len()))?;
        map.serialize_entry("Region", &self.region)?;
        for (agent, tons) in &self.tons {
            map.serialize_entry(agent, tons)?;
        }
        map.serialize_entry("Total", &self.total)?;
        for (agent, share) in &self.shares {
            map.serialize_entry(&format!("{agent}_Pct"), share)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentShareSummary {
    pub regiones_analizadas: usize,
    pub tipos_agente: Vec<String>,
    pub total_nacional: f64,
    pub participacion_por_tipo: BTreeMap<String, f64>,
}

/// Parameters of [`FisheryAnalytics::agent_distribution`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AgentDistributionParams {
    pub year: Option<i64>,
    pub region: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentDistributionRow {
    pub tipo_agente: String,
    pub toneladas: f64,
    pub porcentaje: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentDistributionSummary {
    pub total_toneladas: f64,
    pub num_tipos_agente: usize,
    pub tipo_dominante: Option<String>,
    pub porcentaje_dominante: f64,
}

/// Parameters of [`FisheryAnalytics::species_by_agent_breakdown`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeciesBreakdownParams {
    pub year: Option<i64>,
    pub region: Option<String>,
    /// Number of species kept, ranked by total tonnage.
    pub top_n: usize,
}

impl Default for SpeciesBreakdownParams {
    fn default() -> Self {
        Self {
            year: None,
            region: None,
            top_n: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeciesBreakdownRow {
    pub especie: String,
    /// Tons per agent type.
    #[serde(flatten)]
    pub tons: BTreeMap<String, f64>,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeciesBreakdownSummary {
    pub num_especies: usize,
    pub tipos_agente: Vec<String>,
    pub total_toneladas: f64,
    pub especie_lider: Option<String>,
    pub participacion_por_tipo: BTreeMap<String, f64>,
}

impl FisheryAnalytics {
    /// Region × agent-type pivot of tonnage with each type's share of the regional total.
    ///
    /// Needs the agent-type and region columns of the captures table.
    pub fn agent_share(&self) -> Envelope<AgentShareRow, AgentShareSummary> {
        let params = AgentShareParams::default();
        let computed = agent_share(&self.store);
        self.finish(AnalysisKind::AgentShare, &params, computed)
    }

    /// Tonnage and percentage per agent type, optionally for one year and/or region.
    pub fn agent_distribution(
        &self,
        params: &AgentDistributionParams,
    ) -> Envelope<AgentDistributionRow, AgentDistributionSummary> {
        let computed = agent_distribution(&self.store, params);
        self.finish(AnalysisKind::AgentDistribution, params, computed)
    }

    /// The `top_n` species by tonnage, broken down by agent type.
    pub fn species_by_agent_breakdown(
        &self,
        params: &SpeciesBreakdownParams,
    ) -> Envelope<SpeciesBreakdownRow, SpeciesBreakdownSummary> {
        let computed = species_breakdown(&self.store, params);
        self.finish(AnalysisKind::SpeciesByAgentBreakdown, params, computed)
    }
}

fn agent_column(store: &TableStore) -> Result<usize, AnalysisError> {
    store.need(
        store.capture_idx().agent_type,
        TableKind::Captures,
        &store.names().captures.agent_type,
    )
}

/// Per-type sums of already rounded cells.
fn column_totals<'a>(
    columns: &[String],
    rows: impl Iterator<Item = &'a BTreeMap<String, f64>> + Clone,
) -> BTreeMap<String, f64> {
    columns
        .iter()
        .map(|c| {
            let sum: f64 = rows.clone().filter_map(|cells| cells.get(c)).sum();
            (c.clone(), sum)
        })
        .collect()
}

fn agent_share(store: &TableStore) -> Computed<AgentShareRow, AgentShareSummary> {
    let c = store.capture_idx();
    let agent = agent_column(store)?;
    let region = store.need(c.region, TableKind::Captures, &store.names().captures.region)?;

    let Pivot { columns, rows } =
        pivot_sum(store.captures(), |row| text_key(row, region), agent, c.tons);

    let mut rows: Vec<AgentShareRow> = rows
        .into_iter()
        .map(|(region, tons)| {
            let total = Pivot::<String>::row_total(&tons);
            let shares = tons
                .iter()
                .map(|(agent, t)| (agent.clone(), percent_of(*t, total)))
                .collect();
            AgentShareRow {
                region,
                tons,
                total,
                shares,
            }
        })
        .collect();

    rows.sort_by(|a, b| b.total.total_cmp(&a.total));
    for row in &mut rows {
        row.tons.values_mut().for_each(|v| *v = round2(*v));
        row.total = round2(row.total);
    }

    let summary = AgentShareSummary {
        regiones_analizadas: rows.len(),
        total_nacional: rows.iter().map(|r| r.total).sum(),
        participacion_por_tipo: column_totals(&columns, rows.iter().map(|r| &r.tons)),
        tipos_agente: columns,
    };

    Ok((rows, summary))
}

fn agent_distribution(
    store: &TableStore,
    params: &AgentDistributionParams,
) -> Computed<AgentDistributionRow, AgentDistributionSummary> {
    let c = store.capture_idx();
    let agent = agent_column(store)?;

    let captures = store.captures_where(params.year, params.region.as_deref());
    if captures.is_empty() {
        return Err(AnalysisError::NoData);
    }

    let per_agent = group::sum_by(&captures, |row| text_key(row, agent), c.tons);
    let total: f64 = per_agent.values().sum();

    let mut rows: Vec<AgentDistributionRow> = per_agent
        .into_iter()
        .map(|(tipo_agente, toneladas)| AgentDistributionRow {
            porcentaje: percent_of(toneladas, total),
            toneladas: round2(toneladas),
            tipo_agente,
        })
        .collect();
    rows.sort_by(|a, b| b.toneladas.total_cmp(&a.toneladas));

    let summary = AgentDistributionSummary {
        total_toneladas: total,
        num_tipos_agente: rows.len(),
        tipo_dominante: rows.first().map(|r| r.tipo_agente.clone()),
        porcentaje_dominante: rows.first().map_or(0.0, |r| r.porcentaje),
    };

    Ok((rows, summary))
}

fn species_breakdown(
    store: &TableStore,
    params: &SpeciesBreakdownParams,
) -> Computed<SpeciesBreakdownRow, SpeciesBreakdownSummary> {
    let c = store.capture_idx();
    let agent = agent_column(store)?;

    let captures = store.captures_where(params.year, params.region.as_deref());
    if captures.is_empty() {
        return Err(AnalysisError::NoData);
    }

    let mut ranked: Vec<(String, f64)> =
        group::sum_by(&captures, |row| text_key(row, c.species), c.tons)
            .into_iter()
            .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    let top: BTreeSet<String> = ranked
        .into_iter()
        .take(params.top_n)
        .map(|(species, _)| species)
        .collect();

    let selected = filter(&captures, |row| {
        text_key(row, c.species).is_some_and(|s| top.contains(&s))
    });
    let Pivot { columns, rows } = pivot_sum(&selected, |row| text_key(row, c.species), agent, c.tons);

    let mut rows: Vec<SpeciesBreakdownRow> = rows
        .into_iter()
        .map(|(especie, tons)| SpeciesBreakdownRow {
            total: Pivot::<String>::row_total(&tons),
            especie,
            tons,
        })
        .collect();

    rows.sort_by(|a, b| b.total.total_cmp(&a.total));
    for row in &mut rows {
        row.tons.values_mut().for_each(|v| *v = round2(*v));
        row.total = round2(row.total);
    }

    let summary = SpeciesBreakdownSummary {
        num_especies: rows.len(),
        total_toneladas: rows.iter().map(|r| r.total).sum(),
        especie_lider: rows.first().map(|r| r.especie.clone()),
        participacion_por_tipo: column_totals(&columns, rows.iter().map(|r| &r.tons)),
        tipos_agente: columns,
    };

    Ok((rows, summary))
}
