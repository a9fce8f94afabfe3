//! In-memory table primitives the analyses are built from.
//!
//! Everything here is domain-free and operates on [`crate::types::DataSet`] values:
//!
//! - [`filter()`]: row filtering by predicate, plus year/text predicate builders
//! - [`map()`]: row mapping, plus categorical key normalization
//! - [`reduce()`]: column reductions (count/sum/min/max/mean/count-distinct)
//! - [`group`]: keyed sums, means and distinct counts, and full outer joins
//! - [`pivot`]: two-key summed matrices with data-driven columns
//!
//! ## Example: filter → group → join
//!
//! ```rust
//! use fishery_analytics::processing::{filter, group, year_in};
//! use fishery_analytics::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let schema = Schema::new(vec![
//!     Field::new("Year", DataType::Int64),
//!     Field::new("Tons", DataType::Float64),
//! ]);
//! let ds = DataSet::new(
//!     schema,
//!     vec![
//!         vec![Value::Int64(2019), Value::Float64(1.0)],
//!         vec![Value::Int64(2020), Value::Float64(10.0)],
//!         vec![Value::Int64(2020), Value::Float64(20.0)],
//!     ],
//! );
//!
//! let recent = filter(&ds, year_in(0, 2020..=2024));
//! let per_year = group::sum_by(&recent, |row| row[0].as_i64(), 1);
//! assert_eq!(per_year[&2020], 30.0);
//!
//! let joined = group::outer_join_filled(per_year, group::sum_by(&ds, |row| row[0].as_i64(), 1));
//! assert_eq!(joined, vec![(2019, 0.0, 1.0), (2020, 30.0, 30.0)]);
//! ```

pub mod filter;
pub mod group;
pub mod map;
pub mod pivot;
pub mod reduce;

pub use filter::{filter, text_equals, year_before, year_in};
pub use map::{map, normalize_key, normalize_text_columns};
pub use pivot::{pivot_sum, Pivot};
pub use reduce::{reduce, ReduceOp};
