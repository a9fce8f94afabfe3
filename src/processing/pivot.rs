//! Two-key pivot tables with data-driven columns.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{DataSet, Value};

/// A summed pivot: one row per row key, one column per distinct column key.
///
/// Every row carries a cell for every column; combinations with no records are `0.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Pivot<R> {
    /// Column keys discovered in the data, ascending.
    pub columns: Vec<String>,
    /// Rows in ascending row-key order.
    pub rows: Vec<(R, BTreeMap<String, f64>)>,
}

impl<R> Pivot<R> {
    /// Sum of one row's cells.
    pub fn row_total(cells: &BTreeMap<String, f64>) -> f64 {
        cells.values().sum()
    }
}

/// Pivots `dataset` into `row_key × column(col_idx)` cells summing column `value_idx`.
///
/// Rows with a null row key or a null column value are dropped.
pub fn pivot_sum<R: Ord>(
    dataset: &DataSet,
    row_key: impl Fn(&[Value]) -> Option<R>,
    col_idx: usize,
    value_idx: usize,
) -> Pivot<R> {
    let mut columns = BTreeSet::new();
    let mut cells: BTreeMap<R, BTreeMap<String, f64>> = BTreeMap::new();

    for row in &dataset.rows {
        let Some(r) = row_key(row.as_slice()) else { continue };
        let Some(c) = row.get(col_idx).and_then(Value::as_text) else { continue };
        let v = row.get(value_idx).and_then(Value::as_f64).unwrap_or(0.0);
        columns.insert(c.clone());
        *cells.entry(r).or_default().entry(c).or_insert(0.0) += v;
    }

    let rows = cells
        .into_iter()
        .map(|(r, mut row)| {
            for c in &columns {
                row.entry(c.clone()).or_insert(0.0);
            }
            (r, row)
        })
        .collect();

    Pivot {
        columns: columns.into_iter().collect(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::{pivot_sum, Pivot};
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn captures() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("Region", DataType::Utf8),
            Field::new("AgentType", DataType::Utf8),
            Field::new("Tons", DataType::Float64),
        ]);
        let s = |v: &str| Value::Utf8(v.to_string());
        let rows = vec![
            vec![s("LAGOS"), s("Industrial"), Value::Float64(10.0)],
            vec![s("LAGOS"), s("Industrial"), Value::Float64(5.0)],
            vec![s("AYSEN"), s("Artesanal"), Value::Float64(3.0)],
            vec![s("AYSEN"), Value::Null, Value::Float64(100.0)],
            vec![Value::Null, s("Industrial"), Value::Float64(100.0)],
        ];
        DataSet::new(schema, rows)
    }

    #[test]
    fn pivot_discovers_columns_and_fills_zero() {
        let p = pivot_sum(&captures(), |row| row[0].as_text(), 1, 2);

        assert_eq!(p.columns, vec!["Artesanal".to_string(), "Industrial".to_string()]);
        assert_eq!(p.rows.len(), 2);

        let (aysen, cells) = &p.rows[0];
        assert_eq!(aysen, "AYSEN");
        assert_eq!(cells["Artesanal"], 3.0);
        assert_eq!(cells["Industrial"], 0.0);

        let (lagos, cells) = &p.rows[1];
        assert_eq!(lagos, "LAGOS");
        assert_eq!(cells["Industrial"], 15.0);
        assert_eq!(Pivot::<String>::row_total(cells), 15.0);
    }

    #[test]
    fn pivot_of_empty_dataset_has_no_columns() {
        let ds = captures().filter_rows(|_| false);
        let p = pivot_sum(&ds, |row| row[0].as_text(), 1, 2);
        assert!(p.columns.is_empty());
        assert!(p.rows.is_empty());
    }
}
