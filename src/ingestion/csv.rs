//! CSV table loading.

use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

/// Load a CSV file into an in-memory [`DataSet`].
///
/// Rules:
///
/// - The file must have a header row; every header becomes a column (surrounding whitespace
///   trimmed).
/// - A column named in `hints` is parsed as the hinted type; every other column is `Utf8`.
/// - Empty cells become [`Value::Null`].
pub fn ingest_csv_from_path(path: impl AsRef<Path>, hints: &Schema) -> IngestionResult<DataSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    ingest_csv_from_reader(&mut rdr, hints)
}

/// Load CSV data from an existing CSV reader.
pub fn ingest_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    hints: &Schema,
) -> IngestionResult<DataSet> {
    let headers = rdr.headers()?.clone();
    let schema = Schema::new(
        headers
            .iter()
            .map(|h| {
                let name = h.trim();
                let data_type = hints.data_type_of(name).cloned().unwrap_or(DataType::Utf8);
                Field::new(name, data_type)
            })
            .collect(),
    );

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // 1-based, and the header is row 1.
        let user_row = row_idx0 + 2;
        let record = result?;

        let mut row: Vec<Value> = Vec::with_capacity(schema.fields.len());
        for (i, field) in schema.fields.iter().enumerate() {
            let raw = record.get(i).unwrap_or("");
            row.push(parse_typed_value(user_row, &field.name, &field.data_type, raw)?);
        }
        rows.push(row);
    }

    Ok(DataSet::new(schema, rows))
}

pub(crate) fn parse_typed_value(
    row: usize,
    column: &str,
    data_type: &DataType,
    raw: &str,
) -> IngestionResult<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }

    let parse_error = |message: String| IngestionError::ParseError {
        row,
        column: column.to_owned(),
        raw: raw.to_owned(),
        message,
    };

    match data_type {
        DataType::Utf8 => Ok(Value::Utf8(trimmed.to_owned())),
        DataType::Int64 => match trimmed.parse::<i64>() {
            Ok(v) => Ok(Value::Int64(v)),
            // Spreadsheet exports write years as `2020.0`.
            Err(e) => match trimmed.parse::<f64>() {
                Ok(f) if f.is_finite() && f.fract() == 0.0 => Ok(Value::Int64(f as i64)),
                _ => Err(parse_error(e.to_string())),
            },
        },
        DataType::Float64 => trimmed
            .parse::<f64>()
            .map(Value::Float64)
            .map_err(|e| parse_error(e.to_string())),
        DataType::Bool => parse_bool(trimmed).map(Value::Bool).map_err(parse_error),
    }
}

fn parse_bool(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Ok(true),
        "false" | "f" | "0" | "no" | "n" => Ok(false),
        _ => Err("expected bool (true/false/1/0/yes/no)".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::ingest_csv_from_reader;
    use crate::error::IngestionError;
    use crate::types::{DataType, Field, Schema, Value};

    fn hints() -> Schema {
        Schema::new(vec![
            Field::new("Year", DataType::Int64),
            Field::new("Tons", DataType::Float64),
        ])
    }

    fn read(text: &str) -> Result<crate::types::DataSet, IngestionError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());
        ingest_csv_from_reader(&mut rdr, &hints())
    }

    #[test]
    fn hinted_columns_are_typed_and_the_rest_are_text() {
        let ds = read(" Year ,Species,Tons\n2020, salmon ,12.5\n2021.0,JUREL,\n").unwrap();
        assert_eq!(ds.schema.field_names().collect::<Vec<_>>(), vec!["Year", "Species", "Tons"]);
        assert_eq!(ds.schema.fields[0].data_type, DataType::Int64);
        assert_eq!(ds.schema.fields[1].data_type, DataType::Utf8);
        assert_eq!(ds.rows[0], vec![Value::Int64(2020), Value::Utf8("salmon".to_string()), Value::Float64(12.5)]);
        assert_eq!(ds.rows[1][0], Value::Int64(2021));
        assert_eq!(ds.rows[1][2], Value::Null);
    }

    #[test]
    fn short_rows_pad_with_nulls() {
        let ds = read("Year,Species,Tons\n2020,SALMON\n").unwrap();
        assert_eq!(ds.rows[0][2], Value::Null);
    }

    #[test]
    fn bad_number_reports_row_and_column() {
        let err = read("Year,Species,Tons\n2020,SALMON,12\n2020,SALMON,lots\n").unwrap_err();
        match err {
            IngestionError::ParseError { row, column, raw, .. } => {
                assert_eq!(row, 3);
                assert_eq!(column, "Tons");
                assert_eq!(raw, "lots");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn fractional_year_is_rejected() {
        assert!(matches!(
            read("Year,Tons\n2020.5,1\n"),
            Err(IngestionError::ParseError { .. })
        ));
    }
}
