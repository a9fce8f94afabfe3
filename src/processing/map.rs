//! Row mapping for [`crate::types::DataSet`].

use crate::types::{DataSet, Value};

/// Returns a new [`DataSet`] by applying `mapper` to every row.
///
/// This is a convenience wrapper around [`DataSet::map_rows`].
///
/// # Panics
///
/// Panics if `mapper` returns rows with a different length than the schema field count.
pub fn map<F>(dataset: &DataSet, mapper: F) -> DataSet
where
    F: FnMut(&[Value]) -> Vec<Value>,
{
    dataset.map_rows(mapper)
}

/// Canonical form of a categorical key: surrounding whitespace removed, upper-cased.
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Returns a copy of `dataset` where every text cell of the `columns` is normalized with
/// [`normalize_key`]. Non-text cells are left as they are.
pub fn normalize_text_columns(dataset: &DataSet, columns: &[usize]) -> DataSet {
    if columns.is_empty() {
        return dataset.clone();
    }
    map(dataset, |row| {
        let mut out = row.to_vec();
        for &idx in columns {
            if let Some(Value::Utf8(s)) = out.get(idx) {
                out[idx] = Value::Utf8(normalize_key(s));
            }
        }
        out
    })
}
