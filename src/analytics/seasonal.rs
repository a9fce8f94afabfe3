//! Seasonal context: one year's monthly landings against the historical monthly mean.

use serde::Serialize;

use super::store::{int_key, TableStore};
use super::{first_max_by, round2, AnalysisKind, Computed, Envelope, FisheryAnalytics};
use crate::error::{AnalysisError, TableKind};
use crate::processing::reduce::distinct_i64;
use crate::processing::{filter, group, year_before, year_in};

/// Parameters of [`FisheryAnalytics::seasonal_context`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonalParams {
    /// The year compared against every earlier year.
    pub current_year: i64,
    pub region: Option<String>,
}

impl Default for SeasonalParams {
    fn default() -> Self {
        Self {
            current_year: 2023,
            region: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalRow {
    pub mes: u32,
    pub mes_nombre: String,
    pub actual: f64,
    pub historico: f64,
    pub diferencia: f64,
    pub variacion_porcentual: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalSummary {
    #[serde(rename = "año_actual")]
    pub ano_actual: i64,
    #[serde(rename = "años_historicos_incluidos")]
    pub anos_historicos_incluidos: usize,
    pub total_actual: f64,
    pub total_historico: f64,
    pub diferencia_total: f64,
    pub variacion_anual: f64,
    pub mes_mayor_actual: Option<String>,
    pub mes_mayor_historico: Option<String>,
}

impl FisheryAnalytics {
    /// Twelve monthly rows comparing `current_year` with the mean of earlier years' records.
    ///
    /// Months without data read as zero. Fails with `NoData` when the region filter leaves no
    /// captures.
    pub fn seasonal_context(&self, params: &SeasonalParams) -> Envelope<SeasonalRow, SeasonalSummary> {
        let computed = compute(&self.store, params, &self.options.month_names);
        self.finish(AnalysisKind::SeasonalContext, params, computed)
    }
}

fn compute(
    store: &TableStore,
    params: &SeasonalParams,
    month_names: &[String; 12],
) -> Computed<SeasonalRow, SeasonalSummary> {
    let c = store.capture_idx();
    let month = store.need(c.month, TableKind::Captures, &store.names().captures.month)?;

    let captures = store.captures_where(None, params.region.as_deref());
    if captures.is_empty() {
        return Err(AnalysisError::NoData);
    }

    let month_key = |row: &[crate::types::Value]| int_key(row, month).filter(|m| (1..=12).contains(m));
    let current = filter(&captures, year_in(c.year, params.current_year..=params.current_year));
    let history = filter(&captures, year_before(c.year, params.current_year));

    let actual = group::sum_by(&current, month_key, c.tons);
    let historic = group::mean_by(&history, month_key, c.tons);

    let rows: Vec<SeasonalRow> = (1..=12u32)
        .zip(month_names.iter())
        .map(|(mes, name)| {
            let key = i64::from(mes);
            let a = round2(actual.get(&key).copied().unwrap_or(0.0));
            let h = round2(historic.get(&key).copied().flatten().unwrap_or(0.0));
            SeasonalRow {
                mes,
                mes_nombre: name.clone(),
                actual: a,
                historico: h,
                diferencia: round2(a - h),
                variacion_porcentual: variation(a, h),
            }
        })
        .collect();

    let total_actual: f64 = rows.iter().map(|r| r.actual).sum();
    let total_historico: f64 = rows.iter().map(|r| r.historico).sum();
    let peak_name = |key: fn(&SeasonalRow) -> f64, total: f64| {
        (total > 0.0)
            .then(|| first_max_by(&rows, key))
            .flatten()
            .map(|i| rows[i].mes_nombre.clone())
    };

    let summary = SeasonalSummary {
        ano_actual: params.current_year,
        anos_historicos_incluidos: distinct_i64(&history, c.year).len(),
        total_actual,
        total_historico,
        diferencia_total: round2(total_actual - total_historico),
        variacion_anual: variation(total_actual, total_historico),
        mes_mayor_actual: peak_name(|r| r.actual, total_actual),
        mes_mayor_historico: peak_name(|r| r.historico, total_historico),
    };

    Ok((rows, summary))
}

/// Percent change of `actual` over `historic`; `0.0` without a positive baseline.
fn variation(actual: f64, historic: f64) -> f64 {
    if historic > 0.0 {
        round2((actual - historic) / historic * 100.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::SeasonalParams;
    use crate::analytics::FisheryAnalytics;
    use crate::config::{english_month_names, AnalyticsOptions};
    use crate::error::AnalysisError;
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn s(v: &str) -> Value {
        Value::Utf8(v.to_string())
    }

    fn tables(month_header: &str) -> (DataSet, DataSet, DataSet) {
        let row = |year: i64, month: i64, region: &str, tons: f64| {
            vec![Value::Int64(year), Value::Int64(month), s(region), s("JUREL"), Value::Float64(tons)]
        };
        let captures = DataSet::new(
            Schema::new(vec![
                Field::new("Year", DataType::Int64),
                Field::new(month_header, DataType::Int64),
                Field::new("Region", DataType::Utf8),
                Field::new("Species", DataType::Utf8),
                Field::new("Tons", DataType::Float64),
            ]),
            vec![
                row(2023, 1, "BIOBIO", 150.0),
                row(2023, 1, "BIOBIO", 50.0),
                row(2023, 3, "BIOBIO", 300.0),
                row(2022, 1, "BIOBIO", 100.0),
                row(2021, 1, "BIOBIO", 200.0),
                row(2021, 1, "BIOBIO", 60.0),
                row(2022, 2, "LOS LAGOS", 80.0),
                row(2024, 1, "BIOBIO", 9999.0),
                row(2022, 13, "BIOBIO", 9999.0),
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
        (captures, production, plants)
    }

    fn engine() -> FisheryAnalytics {
        let (c, p, pl) = tables("Month");
        FisheryAnalytics::new(&c, &p, &pl).unwrap()
    }

    #[test]
    fn always_twelve_months_with_spanish_labels() {
        let env = engine().seasonal_context(&SeasonalParams::default());
        let rows = env.data();
        assert_eq!(rows.len(), 12);
        assert_eq!(rows[0].mes, 1);
        assert_eq!(rows[0].mes_nombre, "Enero");
        assert_eq!(rows[11].mes_nombre, "Diciembre");
        assert_eq!(rows[5].actual, 0.0);
        assert_eq!(rows[5].historico, 0.0);
        assert_eq!(rows[5].variacion_porcentual, 0.0);
    }

    #[test]
    fn history_is_the_mean_of_earlier_records() {
        let env = engine().seasonal_context(&SeasonalParams::default());
        let rows = env.data();
        assert_eq!(rows[0].actual, 200.0);
        assert_eq!(rows[0].historico, 120.0);
        assert_eq!(rows[0].diferencia, 80.0);
        assert_eq!(rows[0].variacion_porcentual, 66.67);
        assert_eq!(rows[1].historico, 80.0);
        assert_eq!(rows[1].variacion_porcentual, -100.0);
        assert_eq!(rows[2].actual, 300.0);
        assert_eq!(rows[2].variacion_porcentual, 0.0);
    }

    #[test]
    fn summary_totals_and_peaks() {
        let env = engine().seasonal_context(&SeasonalParams::default());
        let summary = env.summary().unwrap();
        assert_eq!(summary.ano_actual, 2023);
        assert_eq!(summary.anos_historicos_incluidos, 2);
        assert_eq!(summary.total_actual, 500.0);
        assert_eq!(summary.total_historico, 200.0);
        assert_eq!(summary.diferencia_total, 300.0);
        assert_eq!(summary.variacion_anual, 150.0);
        assert_eq!(summary.mes_mayor_actual.as_deref(), Some("Marzo"));
        assert_eq!(summary.mes_mayor_historico.as_deref(), Some("Enero"));
    }

    #[test]
    fn region_filter_and_empty_history() {
        let env = engine().seasonal_context(&SeasonalParams {
            current_year: 2021,
            region: Some("biobio".to_string()),
        });
        let summary = env.summary().unwrap();
        assert_eq!(summary.anos_historicos_incluidos, 0);
        assert_eq!(summary.total_historico, 0.0);
        assert_eq!(summary.mes_mayor_historico, None);
        assert_eq!(summary.variacion_anual, 0.0);
        assert_eq!(summary.total_actual, 260.0);
    }

    #[test]
    fn unknown_region_is_no_data() {
        let env = engine().seasonal_context(&SeasonalParams {
            current_year: 2023,
            region: Some("MAGALLANES".to_string()),
        });
        assert_eq!(env.error(), Some(&AnalysisError::NoData));
    }

    #[test]
    fn month_labels_follow_options() {
        let (c, p, pl) = tables("Month");
        let options = AnalyticsOptions {
            month_names: english_month_names(),
            ..Default::default()
        };
        let engine = FisheryAnalytics::with_options(&c, &p, &pl, options).unwrap();
        let env = engine.seasonal_context(&SeasonalParams::default());
        assert_eq!(env.data()[2].mes_nombre, "March");
    }

    #[test]
    fn missing_month_column_fails() {
        let (c, p, pl) = tables("Period");
        let engine = FisheryAnalytics::new(&c, &p, &pl).unwrap();
        assert!(matches!(
            engine.seasonal_context(&SeasonalParams::default()).error(),
            Some(AnalysisError::MissingColumn { .. })
        ));
    }
}
