//! JSON table loading.
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"Year": 2020}, {"Year": 2021}]`
//! - Newline-delimited JSON (NDJSON): `{"Year": 2020}\n{"Year": 2021}\n`
//!
//! The table's columns are the union of all object keys. A record without a key reads as
//! [`Value::Null`] in that column.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

/// Load a JSON or NDJSON file into a [`DataSet`].
pub fn ingest_json_from_path(path: impl AsRef<Path>, hints: &Schema) -> IngestionResult<DataSet> {
    let text = fs::read_to_string(path)?;
    ingest_json_from_str(&text, hints)
}

/// Load JSON from an in-memory string into a [`DataSet`].
pub fn ingest_json_from_str(input: &str, hints: &Schema) -> IngestionResult<DataSet> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(IngestionError::Json {
            message: "json input is empty".to_string(),
        });
    }

    // A single document first, NDJSON otherwise.
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(trimmed) {
        match v {
            serde_json::Value::Array(items) => ingest_json_values(&items, hints),
            serde_json::Value::Object(_) => ingest_json_values(std::slice::from_ref(&v), hints),
            _ => Err(IngestionError::Json {
                message: "json must be an object, an array of objects, or NDJSON".to_string(),
            }),
        }
    } else {
        let mut values = Vec::new();
        for (i, line) in trimmed.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let v = serde_json::from_str::<serde_json::Value>(line).map_err(|e| IngestionError::Json {
                message: format!("invalid ndjson at line {}: {}", i + 1, e),
            })?;
            values.push(v);
        }
        ingest_json_values(&values, hints)
    }
}

fn ingest_json_values(values: &[serde_json::Value], hints: &Schema) -> IngestionResult<DataSet> {
    let mut objects = Vec::with_capacity(values.len());
    for (idx0, v) in values.iter().enumerate() {
        let obj = v.as_object().ok_or_else(|| IngestionError::Json {
            message: format!("row {} is not a json object", idx0 + 1),
        })?;
        objects.push(obj);
    }

    let names: BTreeSet<&str> = objects
        .iter()
        .flat_map(|obj| obj.keys().map(|k| k.trim()))
        .collect();
    let schema = Schema::new(
        names
            .into_iter()
            .map(|name| Field::new(name, hints.data_type_of(name).cloned().unwrap_or(DataType::Utf8)))
            .collect(),
    );

    let mut rows: Vec<Vec<Value>> = Vec::with_capacity(objects.len());
    for (idx0, obj) in objects.iter().enumerate() {
        let row_num = idx0 + 1;
        let mut row = vec![Value::Null; schema.fields.len()];
        for (key, jv) in obj.iter() {
            let Some(col) = schema.index_of(key.trim()) else { continue };
            let field = &schema.fields[col];
            row[col] = convert_json_value(row_num, &field.name, &field.data_type, jv)?;
        }
        rows.push(row);
    }

    Ok(DataSet::new(schema, rows))
}

fn convert_json_value(
    row: usize,
    column: &str,
    data_type: &DataType,
    v: &serde_json::Value,
) -> IngestionResult<Value> {
    let parse_error = |message: &str| IngestionError::ParseError {
        row,
        column: column.to_string(),
        raw: v.to_string(),
        message: message.to_string(),
    };

    match v {
        serde_json::Value::Null => Ok(Value::Null),
        // Numbers quoted as text go through the same rules as CSV cells.
        serde_json::Value::String(s) => super::csv::parse_typed_value(row, column, data_type, s),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
            Err(parse_error("expected a scalar value"))
        }
        serde_json::Value::Bool(b) => match data_type {
            DataType::Bool => Ok(Value::Bool(*b)),
            DataType::Utf8 => Ok(Value::Utf8(b.to_string())),
            _ => Err(parse_error("expected number")),
        },
        serde_json::Value::Number(n) => match data_type {
            DataType::Int64 => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
                .map(Value::Int64)
                .ok_or_else(|| parse_error("expected integer number")),
            DataType::Float64 => n
                .as_f64()
                .map(Value::Float64)
                .ok_or_else(|| parse_error("expected number")),
            DataType::Utf8 => Ok(Value::Utf8(n.to_string())),
            DataType::Bool => Err(parse_error("expected bool")),
        },
    }
}
