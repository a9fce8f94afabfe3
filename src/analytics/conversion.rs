//! Conversion efficiency: how much product each processing line gets out of its raw material.

use serde::Serialize;

use super::store::{text_key, TableStore};
use super::{mean, round2, AnalysisKind, Computed, Envelope, FisheryAnalytics};
use crate::error::TableKind;
use crate::processing::group;

/// Parameters of [`FisheryAnalytics::conversion_efficiency`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionParams {
    /// Maximum number of rows returned.
    pub top_n: usize,
    /// Groups with less raw material than this are dropped as noise.
    pub min_materia_prima: f64,
}

impl Default for ConversionParams {
    fn default() -> Self {
        Self {
            top_n: 20,
            min_materia_prima: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionRow {
    #[serde(rename = "Especie")]
    pub species: String,
    #[serde(rename = "Linea_Elaboracion")]
    pub processing_line: String,
    #[serde(rename = "Materia_Prima")]
    pub raw_material: f64,
    #[serde(rename = "Produccion")]
    pub output: f64,
    #[serde(rename = "Yield")]
    pub yield_pct: f64,
}

/// Yield statistics are absent when no combination qualifies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionSummary {
    pub yield_promedio: Option<f64>,
    pub yield_maximo: Option<f64>,
    pub yield_minimo: Option<f64>,
    pub combinaciones_analizadas: usize,
    pub especies_unicas: usize,
}

impl FisheryAnalytics {
    /// Yield (`output / raw material × 100`) per (species, processing line), best first.
    ///
    /// Groups below `min_materia_prima` are dropped, and so are groups with no raw material at
    /// all, whose yield is undefined.
    pub fn conversion_efficiency(
        &self,
        params: &ConversionParams,
    ) -> Envelope<ConversionRow, ConversionSummary> {
        let computed = compute(&self.store, params);
        self.finish(AnalysisKind::ConversionEfficiency, params, computed)
    }
}

fn compute(store: &TableStore, params: &ConversionParams) -> Computed<ConversionRow, ConversionSummary> {
    let p = store.production_idx();
    let line = store.need(
        p.processing_line,
        TableKind::Production,
        &store.names().production.processing_line,
    )?;

    let sums = group::sum_many_by(
        store.production(),
        |row| Some((text_key(row, p.species)?, text_key(row, line)?)),
        &[p.raw_material, p.output],
    );

    let mut rows: Vec<ConversionRow> = sums
        .into_iter()
        .filter(|(_, v)| v[0] >= params.min_materia_prima && v[0] > 0.0)
        .map(|((species, processing_line), v)| ConversionRow {
            species,
            processing_line,
            raw_material: v[0],
            output: v[1],
            yield_pct: round2(v[1] / v[0] * 100.0),
        })
        .collect();

    rows.sort_by(|a, b| b.yield_pct.total_cmp(&a.yield_pct));
    rows.truncate(params.top_n);

    for row in &mut rows {
        row.raw_material = round2(row.raw_material);
        row.output = round2(row.output);
    }

    let yields = || rows.iter().map(|r| r.yield_pct);
    let summary = ConversionSummary {
        yield_promedio: mean(yields()),
        yield_maximo: yields().reduce(f64::max),
        yield_minimo: yields().reduce(f64::min),
        combinaciones_analizadas: rows.len(),
        especies_unicas: rows
            .iter()
            .map(|r| r.species.as_str())
            .collect::<std::collections::HashSet<_>>()
            .len(),
    };

    Ok((rows, summary))
}
