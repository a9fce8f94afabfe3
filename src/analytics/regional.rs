//! Regional dynamics: landings against industrial output, region by region.

use serde::Serialize;

use super::store::{text_key, TableStore};
use super::{first_max_by, round2, round_to, AnalysisKind, Computed, Envelope, FisheryAnalytics};
use crate::error::TableKind;
use crate::processing::group;

/// Regional dynamics takes no parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegionalParams {}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionalRow {
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Capturas_Totales")]
    pub captures: f64,
    #[serde(rename = "Produccion_Total")]
    pub production: f64,
    /// Production per ton landed, 4 decimals; `0.0` for a region with no landings.
    #[serde(rename = "Ratio_Prod_Captura")]
    pub ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionalSummary {
    pub total_capturas_nacional: f64,
    pub total_produccion_nacional: f64,
    pub regiones_analizadas: usize,
    pub region_mayor_captura: Option<String>,
    pub region_mayor_produccion: Option<String>,
}

impl FisheryAnalytics {
    /// Captures and production totals per region, largest landings first.
    ///
    /// Fails with [`crate::error::AnalysisError::MissingColumn`] if either the captures or the
    /// production table has no region column.
    pub fn regional_dynamics(&self) -> Envelope<RegionalRow, RegionalSummary> {
        let params = RegionalParams::default();
        let computed = compute(&self.store);
        self.finish(AnalysisKind::RegionalDynamics, &params, computed)
    }
}

fn compute(store: &TableStore) -> Computed<RegionalRow, RegionalSummary> {
    let c = store.capture_idx();
    let p = store.production_idx();
    let names = store.names();
    let c_region = store.need(c.region, TableKind::Captures, &names.captures.region)?;
    let p_region = store.need(p.region, TableKind::Production, &names.production.region)?;

    let landed = group::sum_by(store.captures(), |row| text_key(row, c_region), c.tons);
    let produced = group::sum_by(store.production(), |row| text_key(row, p_region), p.output);

    let mut rows: Vec<RegionalRow> = group::outer_join_filled(landed, produced)
        .into_iter()
        .map(|(region, captures, production)| RegionalRow {
            region,
            captures,
            production,
            ratio: if captures > 0.0 {
                round_to(production / captures, 4)
            } else {
                0.0
            },
        })
        .collect();

    rows.sort_by(|a, b| b.captures.total_cmp(&a.captures));
    for row in &mut rows {
        row.captures = round2(row.captures);
        row.production = round2(row.production);
    }

    let summary = RegionalSummary {
        total_capturas_nacional: rows.iter().map(|r| r.captures).sum(),
        total_produccion_nacional: rows.iter().map(|r| r.production).sum(),
        regiones_analizadas: rows.len(),
        region_mayor_captura: rows.first().map(|r| r.region.clone()),
        region_mayor_produccion: first_max_by(&rows, |r| r.production)
            .map(|i| rows[i].region.clone()),
    };

    Ok((rows, summary))
}
