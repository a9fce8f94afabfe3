//! Port ranking by landed tonnage.

use serde::Serialize;

use super::store::{text_key, TableStore};
use super::{percent_of, round2, AnalysisKind, Computed, Envelope, FisheryAnalytics};
use crate::error::{AnalysisError, TableKind};
use crate::processing::group;
use crate::processing::reduce::sum_f64;

/// Parameters of [`FisheryAnalytics::top_ports`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopPortsParams {
    pub year: Option<i64>,
    pub region: Option<String>,
    pub top_n: usize,
}

impl Default for TopPortsParams {
    fn default() -> Self {
        Self {
            year: None,
            region: None,
            top_n: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPortsRow {
    pub puerto: String,
    pub toneladas: f64,
    /// 1-based position.
    pub ranking: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPortsSummary {
    pub total_toneladas_top_n: f64,
    pub total_toneladas_general: f64,
    /// Share of the matching tonnage landed in the returned ports.
    pub porcentaje_concentracion: f64,
    pub num_puertos_total: usize,
    pub puerto_lider: Option<String>,
}

impl FisheryAnalytics {
    /// The `top_n` ports by tonnage, optionally for one year and/or region.
    pub fn top_ports(&self, params: &TopPortsParams) -> Envelope<TopPortsRow, TopPortsSummary> {
        let computed = compute(&self.store, params);
        self.finish(AnalysisKind::TopPorts, params, computed)
    }
}

fn compute(store: &TableStore, params: &TopPortsParams) -> Computed<TopPortsRow, TopPortsSummary> {
    let c = store.capture_idx();
    let port = store.need(c.port, TableKind::Captures, &store.names().captures.port)?;

    let captures = store.captures_where(params.year, params.region.as_deref());
    if captures.is_empty() {
        return Err(AnalysisError::NoData);
    }

    let mut ranked: Vec<(String, f64)> = group::sum_by(&captures, |row| text_key(row, port), c.tons)
        .into_iter()
        .collect();
    let num_ports = ranked.len();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let rows: Vec<TopPortsRow> = ranked
        .into_iter()
        .take(params.top_n)
        .enumerate()
        .map(|(i, (puerto, tons))| TopPortsRow {
            puerto,
            toneladas: round2(tons),
            ranking: i + 1,
        })
        .collect();

    let top_total: f64 = rows.iter().map(|r| r.toneladas).sum();
    let general_total = sum_f64(&captures, c.tons);

    let summary = TopPortsSummary {
        total_toneladas_top_n: top_total,
        total_toneladas_general: general_total,
        porcentaje_concentracion: percent_of(top_total, general_total),
        num_puertos_total: num_ports,
        puerto_lider: rows.first().map(|r| r.puerto.clone()),
    };

    Ok((rows, summary))
}

#[cfg(test)]
mod tests {
    use super::TopPortsParams;
    use crate::analytics::FisheryAnalytics;
    use crate::error::AnalysisError;
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn s(v: &str) -> Value {
        Value::Utf8(v.to_string())
    }

    fn engine() -> FisheryAnalytics {
        let row = |year: i64, region: &str, port: Value, tons: f64| {
            vec![Value::Int64(year), s(region), s("JUREL"), port, Value::Float64(tons)]
        };
        let captures = DataSet::new(
            Schema::new(vec![
                Field::new("Year", DataType::Int64),
                Field::new("Region", DataType::Utf8),
                Field::new("Species", DataType::Utf8),
                Field::new("Port", DataType::Utf8),
                Field::new("Tons", DataType::Float64),
            ]),
            vec![
                row(2020, "BIOBIO", s("Talcahuano"), 500.0),
                row(2020, "BIOBIO", s("Coronel"), 300.0),
                row(2020, "LOS LAGOS", s("Puerto Montt"), 150.0),
                row(2020, "LOS LAGOS", s("Calbuco"), 50.0),
                row(2021, "BIOBIO", s("Talcahuano"), 100.0),
                row(2021, "BIOBIO", Value::Null, 400.0),
            ],
        );
        let production = DataSet::new(
            Schema::new(vec![
                Field::new("Year", DataType::Int64),
                Field::new("Species", DataType::Utf8),
                Field::new("RawMaterial", DataType::Float64),
                Field::new("Output", DataType::Float64),
            ]),
            vec![],
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
    fn ranks_ports_and_measures_concentration() {
        let env = engine().top_ports(&TopPortsParams {
            year: Some(2020),
            top_n: 2,
            ..Default::default()
        });
        let rows = env.data();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].puerto, "Talcahuano");
        assert_eq!(rows[0].ranking, 1);
        assert_eq!(rows[1].puerto, "Coronel");
        assert_eq!(rows[1].ranking, 2);

        let summary = env.summary().unwrap();
        assert_eq!(summary.total_toneladas_top_n, 800.0);
        assert_eq!(summary.total_toneladas_general, 1000.0);
        assert_eq!(summary.porcentaje_concentracion, 80.0);
        assert_eq!(summary.num_puertos_total, 4);
        assert_eq!(summary.puerto_lider.as_deref(), Some("Talcahuano"));
    }

    #[test]
    fn unnamed_ports_count_toward_the_general_total_only() {
        let env = engine().top_ports(&TopPortsParams {
            year: Some(2021),
            ..Default::default()
        });
        assert_eq!(env.data().len(), 1);
        let summary = env.summary().unwrap();
        assert_eq!(summary.total_toneladas_general, 500.0);
        assert_eq!(summary.porcentaje_concentracion, 20.0);
    }

    #[test]
    fn no_matching_rows_is_no_data() {
        let env = engine().top_ports(&TopPortsParams {
            year: Some(1999),
            ..Default::default()
        });
        assert_eq!(env.error(), Some(&AnalysisError::NoData));
    }
}
