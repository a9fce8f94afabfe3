//! `fishery-analytics` computes comparative statistics over three fishery tables: landings
//! (captures), industrial production, and processing plants.
//!
//! The engine, [`analytics::FisheryAnalytics`], is built once from three in-memory
//! [`types::DataSet`]s. Each analysis call filters, groups, joins or pivots the stored tables and
//! returns an [`analytics::Envelope`]: either a success carrying ordered rows, a summary and the
//! call metadata, or an in-band failure explaining why no rows could be produced.
//!
//! ## Tables
//!
//! | table | required columns | optional columns |
//! |---|---|---|
//! | captures | Year, Species, Tons | Month, Region, Port, AgentType |
//! | production | Year, Species, RawMaterial, Output | Region, ProcessingLine |
//! | plants | Year, Region, PlantName | ProductionLine |
//!
//! The physical header names are configurable through [`config::ColumnNames`]
//! ([`config::ColumnNames::spanish`] matches the public Chilean datasets). A missing required
//! column is a [`SchemaError`] at construction; a missing optional column only fails the
//! analyses that need it.
//!
//! ## Quick example
//!
//! ```rust
//! use fishery_analytics::analytics::{FisheryAnalytics, SupplyDemandParams};
//! use fishery_analytics::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let s = |v: &str| Value::Utf8(v.to_string());
//! let captures = DataSet::new(
//!     Schema::new(vec![
//!         Field::new("Year", DataType::Int64),
//!         Field::new("Species", DataType::Utf8),
//!         Field::new("Tons", DataType::Float64),
//!     ]),
//!     vec![
//!         vec![Value::Int64(2020), s("SALMON"), Value::Float64(1000.0)],
//!         vec![Value::Int64(2021), s("SALMON"), Value::Float64(1200.0)],
//!     ],
//! );
//! let production = DataSet::new(
//!     Schema::new(vec![
//!         Field::new("Year", DataType::Int64),
//!         Field::new("Species", DataType::Utf8),
//!         Field::new("RawMaterial", DataType::Float64),
//!         Field::new("Output", DataType::Float64),
//!     ]),
//!     vec![vec![Value::Int64(2020), s("SALMON"), Value::Float64(800.0), Value::Float64(700.0)]],
//! );
//! let plants = DataSet::new(
//!     Schema::new(vec![
//!         Field::new("Year", DataType::Int64),
//!         Field::new("Region", DataType::Utf8),
//!         Field::new("PlantName", DataType::Utf8),
//!     ]),
//!     vec![],
//! );
//!
//! let engine = FisheryAnalytics::new(&captures, &production, &plants).unwrap();
//! let result = engine.supply_vs_demand(&SupplyDemandParams { start_year: 2020, ..Default::default() });
//! assert!(result.is_success());
//! assert_eq!(result.data()[1].delta, 1200.0);
//!
//! let json = result.to_json_value().unwrap();
//! assert_eq!(json["data"][0]["Porcentaje_Utilizado"], 80.0);
//! ```
//!
//! ## Loading from files
//!
//! ```no_run
//! use fishery_analytics::config::{AnalyticsOptions, ColumnNames};
//! use fishery_analytics::ingestion::load_fishery_data;
//!
//! # fn main() -> Result<(), fishery_analytics::IngestionError> {
//! let options = AnalyticsOptions {
//!     columns: ColumnNames::spanish(),
//!     ..Default::default()
//! };
//! let engine = load_fishery_data("desembarques.csv", "produccion.json", "plantas.csv", options)?;
//! let bundle = engine.export_all();
//! println!("{}", bundle.to_json_pretty().unwrap_or_default());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`analytics`]: the engine, the result envelope and every analysis
//! - [`processing`]: domain-free filter/map/reduce/group/pivot primitives
//! - [`types`]: schema + in-memory dataset types
//! - [`config`]: column names and engine options
//! - [`observability`]: observer hooks for analysis outcomes
//! - [`ingestion`]: CSV/JSON loading
//! - [`error`]: error types

pub mod analytics;
pub mod config;
pub mod error;
pub mod ingestion;
pub mod observability;
pub mod processing;
pub mod types;

pub use analytics::{Envelope, FisheryAnalytics};
pub use error::{AnalysisError, IngestionError, IngestionResult, SchemaError};
