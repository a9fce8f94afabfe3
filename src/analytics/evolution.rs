//! Longitudinal evolution: yearly landings next to the number of active plants.

use serde::Serialize;

use super::store::{int_key, TableStore};
use super::{first_max_by, mean, round2, AnalysisKind, Computed, Envelope, FisheryAnalytics};
use crate::processing::group;

/// Longitudinal evolution takes no parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EvolutionParams {}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvolutionRow {
    #[serde(rename = "Año")]
    pub year: i64,
    #[serde(rename = "Capturas_Totales")]
    pub captures: f64,
    #[serde(rename = "Num_Plantas")]
    pub plants: i64,
    /// Change against the previous row, in percent. Absent for the first row and after a zero.
    #[serde(rename = "Capturas_Variacion_Pct", skip_serializing_if = "Option::is_none")]
    pub captures_change_pct: Option<f64>,
    #[serde(rename = "Plantas_Variacion_Pct", skip_serializing_if = "Option::is_none")]
    pub plants_change_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvolutionSummary {
    #[serde(rename = "años_totales")]
    pub anos_totales: usize,
    #[serde(rename = "año_minimo")]
    pub ano_minimo: Option<i64>,
    #[serde(rename = "año_maximo")]
    pub ano_maximo: Option<i64>,
    #[serde(rename = "capturas_año_pico")]
    pub capturas_ano_pico: Option<i64>,
    pub capturas_maximas: Option<f64>,
    /// Only reported when at least one year has a plant.
    #[serde(rename = "plantas_año_pico")]
    pub plantas_ano_pico: Option<i64>,
    pub plantas_maximas: Option<i64>,
    pub tasa_crecimiento_capturas_promedio: f64,
}

impl FisheryAnalytics {
    /// Total captures and distinct plant count per year, with year-over-year variation.
    pub fn longitudinal_evolution(&self) -> Envelope<EvolutionRow, EvolutionSummary> {
        let params = EvolutionParams::default();
        let computed = compute(&self.store);
        self.finish(AnalysisKind::LongitudinalEvolution, &params, computed)
    }
}

fn compute(store: &TableStore) -> Computed<EvolutionRow, EvolutionSummary> {
    let c = store.capture_idx();
    let pl = store.plant_idx();

    let landed = group::sum_by(store.captures(), |row| int_key(row, c.year), c.tons);
    let plants = group::count_distinct_by(store.plants(), |row| int_key(row, pl.year), pl.plant_name);

    let mut rows: Vec<EvolutionRow> = group::outer_join_filled(landed, plants)
        .into_iter()
        .map(|(year, captures, plants)| EvolutionRow {
            year,
            captures: round2(captures),
            plants: plants as i64,
            captures_change_pct: None,
            plants_change_pct: None,
        })
        .collect();

    for i in 1..rows.len() {
        let (prev, cur) = (&rows[i - 1], &rows[i]);
        let captures_change = change_pct(prev.captures, cur.captures);
        let plants_change = change_pct(prev.plants as f64, cur.plants as f64);
        rows[i].captures_change_pct = captures_change;
        rows[i].plants_change_pct = plants_change;
    }

    let peak_captures = first_max_by(&rows, |r| r.captures);
    let peak_plants = first_max_by(&rows, |r| r.plants as f64);
    let plantas_maximas = peak_plants.map(|i| rows[i].plants);

    let summary = EvolutionSummary {
        anos_totales: rows.len(),
        ano_minimo: rows.first().map(|r| r.year),
        ano_maximo: rows.last().map(|r| r.year),
        capturas_ano_pico: peak_captures.map(|i| rows[i].year),
        capturas_maximas: peak_captures.map(|i| rows[i].captures),
        plantas_ano_pico: peak_plants
            .filter(|&i| rows[i].plants > 0)
            .map(|i| rows[i].year),
        plantas_maximas,
        tasa_crecimiento_capturas_promedio: mean(
            rows.iter().filter_map(|r| r.captures_change_pct),
        )
        .unwrap_or(0.0),
    };

    Ok((rows, summary))
}

/// `(cur / prev - 1) × 100` at 2 decimals; absent when there is nothing to compare against.
fn change_pct(prev: f64, cur: f64) -> Option<f64> {
    if prev == 0.0 {
        return None;
    }
    Some(round2((cur / prev - 1.0) * 100.0))
}
