//! Engine configuration.
//!
//! [`AnalyticsOptions`] tells the engine what the physical columns of each table are called,
//! which month labels to attach, where to report outcomes, and whether Export-All may run its
//! analyses in parallel. Use [`Default`] for the common case.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::observability::{AnalysisObserver, Severity};

/// Physical column names of the captures (landings) table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureColumns {
    pub year: String,
    pub month: String,
    pub region: String,
    pub port: String,
    pub species: String,
    pub agent_type: String,
    pub tons: String,
}

impl Default for CaptureColumns {
    fn default() -> Self {
        Self {
            year: "Year".to_string(),
            month: "Month".to_string(),
            region: "Region".to_string(),
            port: "Port".to_string(),
            species: "Species".to_string(),
            agent_type: "AgentType".to_string(),
            tons: "Tons".to_string(),
        }
    }
}

/// Physical column names of the industrial production table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductionColumns {
    pub year: String,
    pub region: String,
    pub species: String,
    pub processing_line: String,
    pub raw_material: String,
    pub output: String,
}

impl Default for ProductionColumns {
    fn default() -> Self {
        Self {
            year: "Year".to_string(),
            region: "Region".to_string(),
            species: "Species".to_string(),
            processing_line: "ProcessingLine".to_string(),
            raw_material: "RawMaterial".to_string(),
            output: "Output".to_string(),
        }
    }
}

/// Physical column names of the processing-plants table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantColumns {
    pub year: String,
    pub region: String,
    pub plant_name: String,
    pub production_line: String,
}

impl Default for PlantColumns {
    fn default() -> Self {
        Self {
            year: "Year".to_string(),
            region: "Region".to_string(),
            plant_name: "PlantName".to_string(),
            production_line: "ProductionLine".to_string(),
        }
    }
}

/// Column-name mapping for all three tables.
///
/// Every field has a default, so a JSON document only needs to list what differs:
///
/// ```rust
/// use fishery_analytics::config::ColumnNames;
///
/// let names: ColumnNames =
///     serde_json::from_str(r#"{"captures": {"tons": "Toneladas"}}"#).unwrap();
/// assert_eq!(names.captures.tons, "Toneladas");
/// assert_eq!(names.captures.year, "Year");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub captures: CaptureColumns,
    pub production: ProductionColumns,
    pub plants: PlantColumns,
}

impl ColumnNames {
    /// Headers used by the public Chilean fisheries datasets.
    pub fn spanish() -> Self {
        Self {
            captures: CaptureColumns {
                year: "Año".to_string(),
                month: "Mes".to_string(),
                region: "Región".to_string(),
                port: "Puerto".to_string(),
                species: "Especie".to_string(),
                agent_type: "Tipo de agente".to_string(),
                tons: "Toneladas".to_string(),
            },
            production: ProductionColumns {
                year: "Año".to_string(),
                region: "Región".to_string(),
                species: "Especie".to_string(),
                processing_line: "Línea de elaboración".to_string(),
                raw_material: "Materia Prima".to_string(),
                output: "Producción".to_string(),
            },
            plants: PlantColumns {
                year: "Año".to_string(),
                region: "Región".to_string(),
                plant_name: "Nombre Planta".to_string(),
                production_line: "Línea de producción".to_string(),
            },
        }
    }
}

const SPANISH_MONTHS: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

const ENGLISH_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Month labels in Spanish, the labels existing consumers expect.
pub fn spanish_month_names() -> [String; 12] {
    SPANISH_MONTHS.map(str::to_string)
}

/// Month labels in English.
pub fn english_month_names() -> [String; 12] {
    ENGLISH_MONTHS.map(str::to_string)
}

/// Options controlling the analytics engine.
#[derive(Clone)]
pub struct AnalyticsOptions {
    /// Physical column names of the three tables.
    pub columns: ColumnNames,
    /// Labels for months 1 through 12, attached by the seasonal comparison.
    pub month_names: [String; 12],
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn AnalysisObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: Severity,
    /// Run Export-All's analyses on the rayon pool instead of one after another.
    pub parallel_export: bool,
}

impl fmt::Debug for AnalyticsOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyticsOptions")
            .field("columns", &self.columns)
            .field("month_names", &self.month_names)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .field("parallel_export", &self.parallel_export)
            .finish()
    }
}

impl Default for AnalyticsOptions {
    fn default() -> Self {
        Self {
            columns: ColumnNames::default(),
            month_names: spanish_month_names(),
            observer: None,
            alert_at_or_above: Severity::Error,
            parallel_export: false,
        }
    }
}
