//! Row filtering for [`crate::types::DataSet`].
//!
//! Besides the generic [`filter()`], this module provides the predicate builders the analyses
//! share: year ranges, exact years and exact (already normalized) text matches.

use std::ops::RangeInclusive;

use crate::types::{DataSet, Value};

/// Returns a new [`DataSet`] containing only rows for which `predicate` returns `true`.
///
/// This is a convenience wrapper around [`DataSet::filter_rows`].
pub fn filter<F>(dataset: &DataSet, predicate: F) -> DataSet
where
    F: FnMut(&[Value]) -> bool,
{
    dataset.filter_rows(predicate)
}

/// Keeps rows whose integer column `idx` falls inside `years`. Missing years never match.
pub fn year_in(idx: usize, years: RangeInclusive<i64>) -> impl Fn(&[Value]) -> bool {
    move |row| {
        row.get(idx)
            .and_then(Value::as_i64)
            .is_some_and(|y| years.contains(&y))
    }
}

/// Keeps rows whose integer column `idx` is strictly below `year`.
pub fn year_before(idx: usize, year: i64) -> impl Fn(&[Value]) -> bool {
    move |row| row.get(idx).and_then(Value::as_i64).is_some_and(|y| y < year)
}

/// Keeps rows whose text column `idx` equals `needle` exactly.
pub fn text_equals(idx: usize, needle: String) -> impl Fn(&[Value]) -> bool {
    move |row| row.get(idx).and_then(Value::as_str) == Some(needle.as_str())
}

#[cfg(test)]
mod tests {
    use super::{filter, text_equals, year_before, year_in};
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn sample_dataset() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("Year", DataType::Int64),
            Field::new("Region", DataType::Utf8),
        ]);

        let rows = vec![
            vec![Value::Int64(2019), Value::Utf8("LAGOS".to_string())],
            vec![Value::Int64(2020), Value::Utf8("AYSEN".to_string())],
            vec![Value::Null, Value::Utf8("LAGOS".to_string())],
            vec![Value::Float64(2021.0), Value::Null],
        ];

        DataSet::new(schema, rows)
    }

    #[test]
    fn year_range_is_inclusive_and_skips_missing_years() {
        let ds = sample_dataset();
        let out = filter(&ds, year_in(0, 2020..=2021));
        assert_eq!(out.row_count(), 2);
        assert_eq!(out.rows[0][0], Value::Int64(2020));
        assert_eq!(ds.row_count(), 4);
    }

    #[test]
    fn year_before_is_strict() {
        let ds = sample_dataset();
        let out = filter(&ds, year_before(0, 2020));
        assert_eq!(out.row_count(), 1);
        assert_eq!(out.rows[0][0], Value::Int64(2019));
    }

    #[test]
    fn text_equals_is_exact() {
        let ds = sample_dataset();
        assert_eq!(filter(&ds, text_equals(1, "LAGOS".to_string())).row_count(), 2);
        assert_eq!(filter(&ds, text_equals(1, "lagos".to_string())).row_count(), 0);
    }

    #[test]
    fn filter_can_return_empty_dataset() {
        let ds = sample_dataset();
        let out = filter(&ds, |_| false);
        assert_eq!(out.schema, ds.schema);
        assert!(out.is_empty());
    }
}
