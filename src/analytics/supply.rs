//! Supply vs demand: what was landed against what industry took in as raw material.

use serde::Serialize;

use super::store::{int_key, text_key, TableStore};
use super::{mean, round2, percent_of, AnalysisKind, Computed, Envelope, FisheryAnalytics};
use crate::processing::{filter, group, normalize_key, text_equals, year_in};
use crate::types::DataSet;

/// Parameters of [`FisheryAnalytics::supply_vs_demand`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupplyDemandParams {
    /// First year included.
    pub start_year: i64,
    /// Last year included; defaults to the latest year in the captures table.
    pub end_year: Option<i64>,
    /// Restrict both tables to one region (matched after normalization).
    pub region: Option<String>,
}

impl Default for SupplyDemandParams {
    fn default() -> Self {
        Self {
            start_year: 2010,
            end_year: None,
            region: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplyDemandRow {
    #[serde(rename = "Año")]
    pub year: i64,
    #[serde(rename = "Especie")]
    pub species: String,
    #[serde(rename = "Capturas")]
    pub captures: f64,
    #[serde(rename = "Materia Prima")]
    pub raw_material: f64,
    #[serde(rename = "Delta")]
    pub delta: f64,
    #[serde(rename = "Porcentaje_Utilizado")]
    pub percent_used: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplyDemandSummary {
    pub total_capturas: f64,
    pub total_materia_prima: f64,
    pub delta_total: f64,
    pub porcentaje_utilizado_promedio: f64,
    pub especies_analizadas: usize,
    #[serde(rename = "años_analizados")]
    pub anos_analizados: usize,
}

impl FisheryAnalytics {
    /// Captures vs industrial raw material per (year, species).
    ///
    /// Both sides are summed per key and full-outer-joined with zero fill. Rows come ordered by
    /// year ascending, then captures descending. An empty selection is a success with a zeroed
    /// summary.
    pub fn supply_vs_demand(
        &self,
        params: &SupplyDemandParams,
    ) -> Envelope<SupplyDemandRow, SupplyDemandSummary> {
        let mut resolved = params.clone();
        let idx = self.store.capture_idx();
        resolved.end_year = params
            .end_year
            .or_else(|| self.store.captures().max_i64(idx.year));
        let computed = compute(&self.store, &resolved);
        self.finish(AnalysisKind::SupplyVsDemand, &resolved, computed)
    }
}

fn compute(
    store: &TableStore,
    params: &SupplyDemandParams,
) -> Computed<SupplyDemandRow, SupplyDemandSummary> {
    let c = store.capture_idx();
    let p = store.production_idx();

    let (captures, production) = match params.end_year {
        Some(end) => (
            filter(store.captures(), year_in(c.year, params.start_year..=end)),
            filter(store.production(), year_in(p.year, params.start_year..=end)),
        ),
        None => (
            DataSet::empty(store.captures().schema.clone()),
            DataSet::empty(store.production().schema.clone()),
        ),
    };

    let region = params.region.as_deref().map(normalize_key);
    let captures = match (&region, c.region) {
        (Some(r), Some(idx)) => filter(&captures, text_equals(idx, r.clone())),
        _ => captures,
    };
    let production = match (&region, p.region) {
        (Some(r), Some(idx)) => filter(&production, text_equals(idx, r.clone())),
        _ => production,
    };

    let year_species = |year: usize, species: usize| {
        move |row: &[crate::types::Value]| Some((int_key(row, year)?, text_key(row, species)?))
    };
    let landed = group::sum_by(&captures, year_species(c.year, c.species), c.tons);
    let processed = group::sum_by(&production, year_species(p.year, p.species), p.raw_material);

    let mut rows: Vec<SupplyDemandRow> = group::outer_join_filled(landed, processed)
        .into_iter()
        .map(|((year, species), captures, raw_material)| SupplyDemandRow {
            year,
            species,
            captures,
            raw_material,
            delta: captures - raw_material,
            percent_used: percent_of(raw_material, captures),
        })
        .collect();

    rows.sort_by(|a, b| a.year.cmp(&b.year).then(b.captures.total_cmp(&a.captures)));

    for row in &mut rows {
        row.captures = round2(row.captures);
        row.raw_material = round2(row.raw_material);
        row.delta = round2(row.delta);
    }

    let summary = SupplyDemandSummary {
        total_capturas: rows.iter().map(|r| r.captures).sum(),
        total_materia_prima: rows.iter().map(|r| r.raw_material).sum(),
        delta_total: rows.iter().map(|r| r.delta).sum(),
        porcentaje_utilizado_promedio: mean(rows.iter().map(|r| r.percent_used)).unwrap_or(0.0),
        especies_analizadas: distinct(rows.iter().map(|r| r.species.as_str())),
        anos_analizados: distinct(rows.iter().map(|r| r.year)),
    };

    Ok((rows, summary))
}

fn distinct<T: Eq + std::hash::Hash>(items: impl Iterator<Item = T>) -> usize {
    items.collect::<std::collections::HashSet<_>>().len()
}

#[cfg(test)]
mod tests {
    use super::SupplyDemandParams;
    use crate::analytics::FisheryAnalytics;
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn s(v: &str) -> Value {
        Value::Utf8(v.to_string())
    }

    fn engine() -> FisheryAnalytics {
        let captures = DataSet::new(
            Schema::new(vec![
                Field::new("Year", DataType::Int64),
                Field::new("Region", DataType::Utf8),
                Field::new("Species", DataType::Utf8),
                Field::new("Tons", DataType::Float64),
            ]),
            vec![
                vec![Value::Int64(2020), s("LAGOS"), s("salmon"), Value::Float64(1000.0)],
                vec![Value::Int64(2020), s("AYSEN"), s("MERLUZA"), Value::Float64(1500.0)],
                vec![Value::Int64(2021), s("lagos "), s("SALMON"), Value::Float64(1200.0)],
            ],
        );
        let production = DataSet::new(
            Schema::new(vec![
                Field::new("Year", DataType::Int64),
                Field::new("Region", DataType::Utf8),
                Field::new("Species", DataType::Utf8),
                Field::new("RawMaterial", DataType::Float64),
                Field::new("Output", DataType::Float64),
            ]),
            vec![
                vec![Value::Int64(2020), s("LAGOS"), s("SALMON"), Value::Float64(800.0), Value::Float64(700.0)],
                vec![Value::Int64(2019), s("LAGOS"), s("SALMON"), Value::Float64(50.0), Value::Float64(40.0)],
                vec![Value::Int64(2021), s("AYSEN"), s("JUREL"), Value::Float64(30.0), Value::Float64(20.0)],
            ],
        );
        let plants = DataSet::new(
            Schema::new(vec![
                Field::new("Year", DataType::Int64),
                Field::new("Region", DataType::Utf8),
                Field::new("PlantName", DataType::Utf8),
            ]),
            vec![],
        );
        FisheryAnalytics::new(&captures, &production, &plants).unwrap()
    }

    #[test]
    fn outer_join_fills_missing_sides_and_sorts_by_year_then_captures() {
        let env = engine().supply_vs_demand(&SupplyDemandParams {
            start_year: 2020,
            ..Default::default()
        });
        let keys: Vec<(i64, &str, f64)> = env
            .data()
            .iter()
            .map(|r| (r.year, r.species.as_str(), r.captures))
            .collect();
        assert_eq!(
            keys,
            vec![
                (2020, "MERLUZA", 1500.0),
                (2020, "SALMON", 1000.0),
                (2021, "SALMON", 1200.0),
                (2021, "JUREL", 0.0),
            ]
        );

        let jurel = &env.data()[3];
        assert_eq!(jurel.raw_material, 30.0);
        assert_eq!(jurel.delta, -30.0);
        assert_eq!(jurel.percent_used, 0.0);
    }

    #[test]
    fn end_year_defaults_to_latest_capture_year() {
        let env = engine().supply_vs_demand(&SupplyDemandParams::default());
        let meta = env.metadata().unwrap();
        assert_eq!(meta.params["end_year"], serde_json::json!(2021));
        assert_eq!(meta.params["start_year"], serde_json::json!(2010));
        // 2019 production is inside the default window.
        assert!(env.data().iter().any(|r| r.year == 2019));
    }

    #[test]
    fn region_filter_is_normalized() {
        let env = engine().supply_vs_demand(&SupplyDemandParams {
            start_year: 2020,
            end_year: Some(2021),
            region: Some("  Lagos".to_string()),
        });
        assert_eq!(env.data().len(), 2);
        let summary = env.summary().unwrap();
        assert_eq!(summary.total_capturas, 2200.0);
        assert_eq!(summary.total_materia_prima, 800.0);
        assert_eq!(summary.delta_total, 1400.0);
        assert_eq!(summary.porcentaje_utilizado_promedio, 40.0);
        assert_eq!(summary.especies_analizadas, 1);
        assert_eq!(summary.anos_analizados, 2);
    }

    #[test]
    fn unmatched_filter_is_an_empty_success() {
        let env = engine().supply_vs_demand(&SupplyDemandParams {
            start_year: 2030,
            ..Default::default()
        });
        assert!(env.is_success());
        assert!(env.data().is_empty());
        let summary = env.summary().unwrap();
        assert_eq!(summary.total_capturas, 0.0);
        assert_eq!(summary.porcentaje_utilizado_promedio, 0.0);
        assert_eq!(summary.especies_analizadas, 0);
    }
}
