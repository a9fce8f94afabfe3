//! Path-based entry points.
//!
//! [`ingest_table`] loads one file; [`load_fishery_data`] loads all three tables and builds the
//! engine from them.

use std::path::Path;

use crate::analytics::FisheryAnalytics;
use crate::config::{AnalyticsOptions, ColumnNames};
use crate::error::{IngestionError, IngestionResult, TableKind};
use crate::types::{DataSet, DataType, Field, Schema};

use super::{csv, json};

/// Supported table formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// JSON array-of-objects or NDJSON.
    Json,
}

impl TableFormat {
    /// Parse a table format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" | "ndjson" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Options controlling table loading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestionOptions {
    /// If `None`, detect the format from the file extension.
    pub format: Option<TableFormat>,
}

/// Column types to enforce while loading `table`.
///
/// Years and months are `Int64`, tonnages `Float64`. Columns not listed here load as text.
pub fn type_hints(names: &ColumnNames, table: TableKind) -> Schema {
    let int = |n: &str| Field::new(n, DataType::Int64);
    let float = |n: &str| Field::new(n, DataType::Float64);
    let fields = match table {
        TableKind::Captures => vec![
            int(&names.captures.year),
            int(&names.captures.month),
            float(&names.captures.tons),
        ],
        TableKind::Production => vec![
            int(&names.production.year),
            float(&names.production.raw_material),
            float(&names.production.output),
        ],
        TableKind::Plants => vec![int(&names.plants.year)],
    };
    Schema::new(fields)
}

/// Load one table from `path`.
///
/// ```no_run
/// use fishery_analytics::config::ColumnNames;
/// use fishery_analytics::error::TableKind;
/// use fishery_analytics::ingestion::{ingest_table, type_hints, IngestionOptions};
///
/// # fn main() -> Result<(), fishery_analytics::IngestionError> {
/// let hints = type_hints(&ColumnNames::spanish(), TableKind::Captures);
/// let captures = ingest_table("desembarques.csv", &hints, &IngestionOptions::default())?;
/// println!("rows={}", captures.row_count());
/// # Ok(())
/// # }
/// ```
pub fn ingest_table(
    path: impl AsRef<Path>,
    hints: &Schema,
    options: &IngestionOptions,
) -> IngestionResult<DataSet> {
    let path = path.as_ref();
    let format = match options.format {
        Some(f) => f,
        None => infer_format_from_path(path)?,
    };

    match format {
        TableFormat::Csv => csv::ingest_csv_from_path(path, hints),
        TableFormat::Json => json::ingest_json_from_path(path, hints),
    }
}

/// Load the captures, production and plants files and build the engine.
///
/// Each file's format comes from its extension. A missing required column surfaces as
/// [`IngestionError::Schema`].
///
/// ```no_run
/// use fishery_analytics::config::{AnalyticsOptions, ColumnNames};
/// use fishery_analytics::ingestion::load_fishery_data;
///
/// # fn main() -> Result<(), fishery_analytics::IngestionError> {
/// let options = AnalyticsOptions {
///     columns: ColumnNames::spanish(),
///     ..Default::default()
/// };
/// let engine = load_fishery_data("desembarques.csv", "produccion.csv", "plantas.csv", options)?;
/// println!("{}", engine.export_all().to_json_pretty().unwrap_or_default());
/// # Ok(())
/// # }
/// ```
pub fn load_fishery_data(
    captures: impl AsRef<Path>,
    production: impl AsRef<Path>,
    plants: impl AsRef<Path>,
    options: AnalyticsOptions,
) -> IngestionResult<FisheryAnalytics> {
    let names = &options.columns;
    let load = IngestionOptions::default();
    let captures = ingest_table(captures, &type_hints(names, TableKind::Captures), &load)?;
    let production = ingest_table(production, &type_hints(names, TableKind::Production), &load)?;
    let plants = ingest_table(plants, &type_hints(names, TableKind::Plants), &load)?;

    Ok(FisheryAnalytics::with_options(
        &captures,
        &production,
        &plants,
        options,
    )?)
}

fn infer_format_from_path(path: &Path) -> IngestionResult<TableFormat> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| IngestionError::UnsupportedFormat {
            message: format!("path has no extension ({})", path.display()),
        })?;

    TableFormat::from_extension(ext).ok_or_else(|| IngestionError::UnsupportedFormat {
        message: format!("extension '{ext}' for path ({})", path.display()),
    })
}
