//! Keyed aggregation and joining.
//!
//! Groups are collected into a [`BTreeMap`], so every aggregate comes out ordered by key. Rows for
//! which the key function returns `None` (a null key component) are dropped, and null values never
//! contribute to a sum, a mean or a distinct count. [`outer_join`] merges two such aggregates
//! in key order.

use std::collections::{BTreeMap, HashSet};

use crate::types::{DataSet, Value};

/// Sums column `value_idx` per key. A group whose values are all null sums to `0.0`.
pub fn sum_by<K: Ord>(dataset: &DataSet, key: impl Fn(&[Value]) -> Option<K>, value_idx: usize) -> BTreeMap<K, f64> {
    let mut out = BTreeMap::new();
    for row in &dataset.rows {
        let Some(k) = key(row.as_slice()) else { continue };
        let v = row.get(value_idx).and_then(Value::as_f64).unwrap_or(0.0);
        *out.entry(k).or_insert(0.0) += v;
    }
    out
}

/// Sums several columns per key at once, in the order given by `value_idxs`.
pub fn sum_many_by<K: Ord>(
    dataset: &DataSet,
    key: impl Fn(&[Value]) -> Option<K>,
    value_idxs: &[usize],
) -> BTreeMap<K, Vec<f64>> {
    let mut out: BTreeMap<K, Vec<f64>> = BTreeMap::new();
    for row in &dataset.rows {
        let Some(k) = key(row.as_slice()) else { continue };
        let acc = out.entry(k).or_insert_with(|| vec![0.0; value_idxs.len()]);
        for (slot, &idx) in acc.iter_mut().zip(value_idxs) {
            *slot += row.get(idx).and_then(Value::as_f64).unwrap_or(0.0);
        }
    }
    out
}

/// Mean of column `value_idx` per key, over the non-null values of each group.
///
/// A group with no non-null values maps to `None`.
pub fn mean_by<K: Ord>(
    dataset: &DataSet,
    key: impl Fn(&[Value]) -> Option<K>,
    value_idx: usize,
) -> BTreeMap<K, Option<f64>> {
    let mut acc: BTreeMap<K, (f64, usize)> = BTreeMap::new();
    for row in &dataset.rows {
        let Some(k) = key(row.as_slice()) else { continue };
        let slot = acc.entry(k).or_insert((0.0, 0));
        if let Some(v) = row.get(value_idx).and_then(Value::as_f64) {
            slot.0 += v;
            slot.1 += 1;
        }
    }
    acc.into_iter()
        .map(|(k, (sum, n))| (k, (n > 0).then(|| sum / n as f64)))
        .collect()
}

/// Number of distinct non-null values of column `value_idx` per key.
pub fn count_distinct_by<K: Ord>(
    dataset: &DataSet,
    key: impl Fn(&[Value]) -> Option<K>,
    value_idx: usize,
) -> BTreeMap<K, usize> {
    let mut sets: BTreeMap<K, HashSet<String>> = BTreeMap::new();
    for row in &dataset.rows {
        let Some(k) = key(row.as_slice()) else { continue };
        let set = sets.entry(k).or_default();
        if let Some(v) = row.get(value_idx).and_then(Value::as_text) {
            set.insert(v);
        }
    }
    sets.into_iter().map(|(k, s)| (k, s.len())).collect()
}

/// Full outer join of two keyed aggregates, in ascending key order.
///
/// Each output entry carries the value from each side when that side has the key.
pub fn outer_join<K: Ord, L, R>(
    left: BTreeMap<K, L>,
    right: BTreeMap<K, R>,
) -> Vec<(K, Option<L>, Option<R>)> {
    let mut out = Vec::with_capacity(left.len().max(right.len()));
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    loop {
        let take_left = match (left.peek(), right.peek()) {
            (None, None) => break,
            (Some(_), None) => Some(true),
            (None, Some(_)) => Some(false),
            (Some((lk, _)), Some((rk, _))) => match lk.cmp(rk) {
                std::cmp::Ordering::Less => Some(true),
                std::cmp::Ordering::Greater => Some(false),
                std::cmp::Ordering::Equal => None,
            },
        };
        match take_left {
            Some(true) => {
                if let Some((k, l)) = left.next() {
                    out.push((k, Some(l), None));
                }
            }
            Some(false) => {
                if let Some((k, r)) = right.next() {
                    out.push((k, None, Some(r)));
                }
            }
            None => {
                if let (Some((k, l)), Some((_, r))) = (left.next(), right.next()) {
                    out.push((k, Some(l), Some(r)));
                }
            }
        }
    }
    out
}

/// [`outer_join`] with absent sides filled by `Default` (zero for numbers).
pub fn outer_join_filled<K: Ord, L: Default, R: Default>(
    left: BTreeMap<K, L>,
    right: BTreeMap<K, R>,
) -> Vec<(K, L, R)> {
    outer_join(left, right)
        .into_iter()
        .map(|(k, l, r)| (k, l.unwrap_or_default(), r.unwrap_or_default()))
        .collect()
}
