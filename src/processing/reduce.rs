//! Reduction operations for [`crate::types::DataSet`].

use std::collections::HashSet;

use crate::types::{DataSet, DataType, Value};

/// Built-in reduction operations over a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    /// Count all rows (including nulls).
    Count,
    /// Sum numeric values, ignoring nulls.
    Sum,
    /// Minimum numeric value, ignoring nulls.
    Min,
    /// Maximum numeric value, ignoring nulls.
    Max,
    /// Arithmetic mean of numeric values, ignoring nulls.
    Mean,
    /// Number of distinct non-null values.
    CountDistinct,
}

/// Reduce a column using a built-in [`ReduceOp`].
///
/// - Returns `None` if `column` does not exist in the schema.
/// - For `Sum`/`Min`/`Max`/`Mean`, returns `Some(Value::Null)` if there are no non-null values.
///   An `Int64` column keeps its type for `Sum`/`Min`/`Max`; `Mean` is always `Float64`.
/// - For `Count` and `CountDistinct`, always returns `Some(Value::Int64(_))`.
pub fn reduce(dataset: &DataSet, column: &str, op: ReduceOp) -> Option<Value> {
    let idx = dataset.schema.index_of(column)?;
    let data_type = dataset.schema.fields.get(idx)?.data_type.clone();

    match op {
        ReduceOp::Count => Some(Value::Int64(dataset.row_count() as i64)),
        ReduceOp::CountDistinct => Some(Value::Int64(dataset.distinct_count(idx) as i64)),
        ReduceOp::Mean => {
            let (sum, n) = dataset
                .column_values(idx)
                .filter_map(Value::as_f64)
                .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
            Some(if n == 0 {
                Value::Null
            } else {
                Value::Float64(sum / n as f64)
            })
        }
        ReduceOp::Sum | ReduceOp::Min | ReduceOp::Max => match data_type {
            DataType::Int64 => Some(
                fold_numeric(dataset.column_values(idx).filter_map(Value::as_i64), op)
                    .map(Value::Int64)
                    .unwrap_or(Value::Null),
            ),
            DataType::Float64 => Some(
                fold_numeric(dataset.column_values(idx).filter_map(Value::as_f64), op)
                    .map(Value::Float64)
                    .unwrap_or(Value::Null),
            ),
            _ => Some(Value::Null),
        },
    }
}

/// Sum of a numeric column treating nulls as absent; `0.0` for an empty or missing column.
pub fn sum_f64(dataset: &DataSet, idx: usize) -> f64 {
    dataset.column_values(idx).filter_map(Value::as_f64).sum()
}

/// Distinct non-null integers of a column.
pub fn distinct_i64(dataset: &DataSet, idx: usize) -> HashSet<i64> {
    dataset.column_values(idx).filter_map(Value::as_i64).collect()
}

fn fold_numeric<T, I>(values: I, op: ReduceOp) -> Option<T>
where
    T: Copy + PartialOrd + std::ops::Add<Output = T>,
    I: Iterator<Item = T>,
{
    values.fold(None, |acc, v| {
        Some(match (op, acc) {
            (_, None) => v,
            (ReduceOp::Sum, Some(a)) => a + v,
            (ReduceOp::Min, Some(a)) => {
                if v < a {
                    v
                } else {
                    a
                }
            }
            (ReduceOp::Max, Some(a)) => {
                if v > a {
                    v
                } else {
                    a
                }
            }
            (_, Some(a)) => a,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::{distinct_i64, reduce, sum_f64, ReduceOp};
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn numeric_dataset_with_nulls() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("Year", DataType::Int64),
            Field::new("Tons", DataType::Float64),
        ]);

        let rows = vec![
            vec![Value::Int64(2020), Value::Float64(10.0)],
            vec![Value::Int64(2020), Value::Null],
            vec![Value::Int64(2021), Value::Float64(5.5)],
        ];

        DataSet::new(schema, rows)
    }

    #[test]
    fn reduce_count_counts_rows() {
        let ds = numeric_dataset_with_nulls();
        assert_eq!(reduce(&ds, "Tons", ReduceOp::Count), Some(Value::Int64(3)));
    }

    #[test]
    fn reduce_sum_ignores_nulls_and_preserves_type() {
        let ds = numeric_dataset_with_nulls();
        assert_eq!(reduce(&ds, "Tons", ReduceOp::Sum), Some(Value::Float64(15.5)));
        assert_eq!(reduce(&ds, "Year", ReduceOp::Sum), Some(Value::Int64(6061)));
    }

    #[test]
    fn reduce_min_max_mean_ignore_nulls() {
        let ds = numeric_dataset_with_nulls();
        assert_eq!(reduce(&ds, "Tons", ReduceOp::Min), Some(Value::Float64(5.5)));
        assert_eq!(reduce(&ds, "Tons", ReduceOp::Max), Some(Value::Float64(10.0)));
        assert_eq!(reduce(&ds, "Tons", ReduceOp::Mean), Some(Value::Float64(7.75)));
        assert_eq!(reduce(&ds, "Year", ReduceOp::Max), Some(Value::Int64(2021)));
    }

    #[test]
    fn reduce_count_distinct_skips_nulls() {
        let ds = numeric_dataset_with_nulls();
        assert_eq!(reduce(&ds, "Year", ReduceOp::CountDistinct), Some(Value::Int64(2)));
        assert_eq!(reduce(&ds, "Tons", ReduceOp::CountDistinct), Some(Value::Int64(2)));
        assert_eq!(distinct_i64(&ds, 0).len(), 2);
    }

    #[test]
    fn reduce_returns_none_for_missing_column() {
        let ds = numeric_dataset_with_nulls();
        assert_eq!(reduce(&ds, "missing", ReduceOp::Count), None);
        assert_eq!(reduce(&ds, "missing", ReduceOp::Sum), None);
    }

    #[test]
    fn reduce_numeric_returns_null_if_all_values_null() {
        let schema = Schema::new(vec![Field::new("Tons", DataType::Float64)]);
        let ds = DataSet::new(schema, vec![vec![Value::Null], vec![Value::Null]]);
        assert_eq!(reduce(&ds, "Tons", ReduceOp::Sum), Some(Value::Null));
        assert_eq!(reduce(&ds, "Tons", ReduceOp::Mean), Some(Value::Null));
        assert_eq!(sum_f64(&ds, 0), 0.0);
    }
}
