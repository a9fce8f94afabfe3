//! Plant capacity: production per active plant, by year and region.

use std::collections::HashSet;

use serde::Serialize;

use super::store::{int_key, text_key, TableStore};
use super::{first_max_by, mean, round2, AnalysisKind, Computed, Envelope, FisheryAnalytics};
use crate::error::TableKind;
use crate::processing::group;

/// Plant capacity analysis takes no parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlantCapacityParams {}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlantCapacityRow {
    #[serde(rename = "Año")]
    pub year: i64,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Num_Plantas")]
    pub plants: i64,
    #[serde(rename = "Produccion_Total")]
    pub production: f64,
    /// `0.0` when the region reports production but no plants.
    #[serde(rename = "Promedio_Por_Planta")]
    pub per_plant: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlantCapacitySummary {
    #[serde(rename = "años_analizados")]
    pub anos_analizados: usize,
    pub regiones_analizadas: usize,
    pub total_plantas_maximas: Option<i64>,
    pub produccion_total_periodo: f64,
    pub promedio_productividad: Option<f64>,
    pub region_mas_productiva: Option<String>,
}

impl FisheryAnalytics {
    /// Distinct plants and total production per (year, region), with production per plant.
    ///
    /// Needs the region column of the production table.
    pub fn plant_capacity_analysis(&self) -> Envelope<PlantCapacityRow, PlantCapacitySummary> {
        let params = PlantCapacityParams::default();
        let computed = compute(&self.store);
        self.finish(AnalysisKind::PlantCapacityAnalysis, &params, computed)
    }
}

fn compute(store: &TableStore) -> Computed<PlantCapacityRow, PlantCapacitySummary> {
    let p = store.production_idx();
    let pl = store.plant_idx();
    let p_region = store.need(p.region, TableKind::Production, &store.names().production.region)?;

    let plants = group::count_distinct_by(
        store.plants(),
        |row| Some((int_key(row, pl.year)?, text_key(row, pl.region)?)),
        pl.plant_name,
    );
    let produced = group::sum_by(
        store.production(),
        |row| Some((int_key(row, p.year)?, text_key(row, p_region)?)),
        p.output,
    );

    let mut rows: Vec<PlantCapacityRow> = group::outer_join_filled(plants, produced)
        .into_iter()
        .map(|((year, region), plants, production)| PlantCapacityRow {
            year,
            region,
            plants: plants as i64,
            production,
            per_plant: if plants > 0 {
                round2(production / plants as f64)
            } else {
                0.0
            },
        })
        .collect();

    for row in &mut rows {
        row.production = round2(row.production);
    }
    rows.sort_by(|a, b| a.year.cmp(&b.year).then(b.production.total_cmp(&a.production)));

    let summary = PlantCapacitySummary {
        anos_analizados: rows.iter().map(|r| r.year).collect::<HashSet<_>>().len(),
        regiones_analizadas: rows.iter().map(|r| r.region.as_str()).collect::<HashSet<_>>().len(),
        total_plantas_maximas: rows.iter().map(|r| r.plants).max(),
        produccion_total_periodo: rows.iter().map(|r| r.production).sum(),
        promedio_productividad: mean(rows.iter().map(|r| r.per_plant)),
        region_mas_productiva: first_max_by(&rows, |r| r.per_plant).map(|i| rows[i].region.clone()),
    };

    Ok((rows, summary))
}
