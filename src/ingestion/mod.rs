//! Table loading: the collaborator that turns files into [`crate::types::DataSet`]s.
//!
//! The analytics core never touches the filesystem. Most callers should use
//! [`load_fishery_data`], which loads the three tables and builds the engine, or
//! [`ingest_table`] for a single file:
//!
//! - the format is detected from the file extension (or forced via [`IngestionOptions`])
//! - column types come from [`type_hints`]; unhinted columns load as text
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - [`json`]

pub mod csv;
pub mod json;
pub mod unified;

pub use unified::{ingest_table, load_fishery_data, type_hints, IngestionOptions, TableFormat};
