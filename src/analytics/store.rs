//! Normalized, validated snapshots of the three base tables.

use crate::config::ColumnNames;
use crate::error::{AnalysisError, SchemaError, TableKind};
use crate::processing::{filter, normalize_key, normalize_text_columns, text_equals, year_in};
use crate::types::{DataSet, Value};

/// Resolved column positions of the captures table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureIdx {
    pub year: usize,
    pub species: usize,
    pub tons: usize,
    pub month: Option<usize>,
    pub region: Option<usize>,
    pub port: Option<usize>,
    pub agent_type: Option<usize>,
}

/// Resolved column positions of the production table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductionIdx {
    pub year: usize,
    pub species: usize,
    pub raw_material: usize,
    pub output: usize,
    pub region: Option<usize>,
    pub processing_line: Option<usize>,
}

/// Resolved column positions of the plants table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlantIdx {
    pub year: usize,
    pub region: usize,
    pub plant_name: usize,
    pub production_line: Option<usize>,
}

/// Owns private copies of the three tables.
///
/// Construction trims column headers, checks the required columns, and upper-cases/trims every
/// Region and Species value. Nothing else is coerced here: numeric parsing and null handling are
/// left to each analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct TableStore {
    captures: DataSet,
    production: DataSet,
    plants: DataSet,
    names: ColumnNames,
    capture_idx: CaptureIdx,
    production_idx: ProductionIdx,
    plant_idx: PlantIdx,
}

impl TableStore {
    /// Copy, validate and normalize the caller's tables. The inputs are never modified.
    ///
    /// Required columns: captures `year, species, tons`; production
    /// `year, species, raw_material, output`; plants `year, region, plant_name`.
    pub fn new(
        captures: &DataSet,
        production: &DataSet,
        plants: &DataSet,
        names: &ColumnNames,
    ) -> Result<Self, SchemaError> {
        let captures = captures.with_trimmed_headers();
        let production = production.with_trimmed_headers();
        let plants = plants.with_trimmed_headers();

        let c = &names.captures;
        let capture_idx = CaptureIdx {
            year: required(&captures, TableKind::Captures, &c.year)?,
            species: required(&captures, TableKind::Captures, &c.species)?,
            tons: required(&captures, TableKind::Captures, &c.tons)?,
            month: captures.column(&c.month),
            region: captures.column(&c.region),
            port: captures.column(&c.port),
            agent_type: captures.column(&c.agent_type),
        };

        let p = &names.production;
        let production_idx = ProductionIdx {
            year: required(&production, TableKind::Production, &p.year)?,
            species: required(&production, TableKind::Production, &p.species)?,
            raw_material: required(&production, TableKind::Production, &p.raw_material)?,
            output: required(&production, TableKind::Production, &p.output)?,
            region: production.column(&p.region),
            processing_line: production.column(&p.processing_line),
        };

        let pl = &names.plants;
        let plant_idx = PlantIdx {
            year: required(&plants, TableKind::Plants, &pl.year)?,
            region: required(&plants, TableKind::Plants, &pl.region)?,
            plant_name: required(&plants, TableKind::Plants, &pl.plant_name)?,
            production_line: plants.column(&pl.production_line),
        };

        let capture_keys: Vec<usize> = capture_idx
            .region
            .into_iter()
            .chain([capture_idx.species])
            .collect();
        let production_keys: Vec<usize> = production_idx
            .region
            .into_iter()
            .chain([production_idx.species])
            .collect();

        Ok(Self {
            captures: normalize_text_columns(&captures, &capture_keys),
            production: normalize_text_columns(&production, &production_keys),
            plants: normalize_text_columns(&plants, &[plant_idx.region]),
            names: names.clone(),
            capture_idx,
            production_idx,
            plant_idx,
        })
    }

    /// Normalized captures (landings) table.
    pub fn captures(&self) -> &DataSet {
        &self.captures
    }

    /// Normalized production table.
    pub fn production(&self) -> &DataSet {
        &self.production
    }

    /// Normalized plants table.
    pub fn plants(&self) -> &DataSet {
        &self.plants
    }

    /// Column names the store was built with.
    pub fn names(&self) -> &ColumnNames {
        &self.names
    }

    pub fn capture_idx(&self) -> CaptureIdx {
        self.capture_idx
    }

    pub fn production_idx(&self) -> ProductionIdx {
        self.production_idx
    }

    pub fn plant_idx(&self) -> PlantIdx {
        self.plant_idx
    }

    /// Captures restricted to one year and/or one region.
    ///
    /// The region is matched after normalization. Without a region column the region filter is
    /// ignored.
    pub(crate) fn captures_where(&self, year: Option<i64>, region: Option<&str>) -> DataSet {
        let idx = self.capture_idx;
        let by_year = match year {
            Some(y) => filter(&self.captures, year_in(idx.year, y..=y)),
            None => self.captures.clone(),
        };
        match (region, idx.region) {
            (Some(r), Some(col)) => filter(&by_year, text_equals(col, normalize_key(r))),
            _ => by_year,
        }
    }

    /// Resolve an optional column an analysis cannot run without.
    pub(crate) fn need(
        &self,
        idx: Option<usize>,
        table: TableKind,
        column: &str,
    ) -> Result<usize, AnalysisError> {
        idx.ok_or_else(|| AnalysisError::MissingColumn {
            table,
            column: column.to_string(),
        })
    }
}

fn required(dataset: &DataSet, table: TableKind, column: &str) -> Result<usize, SchemaError> {
    dataset.column(column).ok_or_else(|| SchemaError {
        table,
        column: column.to_string(),
    })
}

/// Integer grouping key from column `idx`.
pub(crate) fn int_key(row: &[Value], idx: usize) -> Option<i64> {
    row.get(idx).and_then(Value::as_i64)
}

/// Text grouping key from column `idx`.
pub(crate) fn text_key(row: &[Value], idx: usize) -> Option<String> {
    row.get(idx).and_then(Value::as_text)
}

#[cfg(test)]
mod tests {
    use super::TableStore;
    use crate::config::ColumnNames;
    use crate::error::TableKind;
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn s(v: &str) -> Value {
        Value::Utf8(v.to_string())
    }

    fn captures() -> DataSet {
        DataSet::new(
            Schema::new(vec![
                Field::new("Year ", DataType::Int64),
                Field::new("Region", DataType::Utf8),
                Field::new("Species", DataType::Utf8),
                Field::new("Port", DataType::Utf8),
                Field::new("Tons", DataType::Float64),
            ]),
            vec![vec![
                Value::Int64(2020),
                s(" los lagos "),
                s("salmon\t"),
                s(" Puerto Montt "),
                Value::Float64(1.0),
            ]],
        )
    }

    fn production() -> DataSet {
        DataSet::new(
            Schema::new(vec![
                Field::new("Year", DataType::Int64),
                Field::new("Species", DataType::Utf8),
                Field::new("RawMaterial", DataType::Float64),
                Field::new("Output", DataType::Float64),
            ]),
            vec![vec![
                Value::Int64(2020),
                s(" Salmon"),
                Value::Float64(2.0),
                Value::Float64(1.0),
            ]],
        )
    }

    fn plants() -> DataSet {
        DataSet::new(
            Schema::new(vec![
                Field::new("Year", DataType::Int64),
                Field::new("Region", DataType::Utf8),
                Field::new("PlantName", DataType::Utf8),
            ]),
            vec![vec![Value::Int64(2020), s("aysen "), s("Planta A")]],
        )
    }

    #[test]
    fn normalizes_region_and_species_only() {
        let store =
            TableStore::new(&captures(), &production(), &plants(), &ColumnNames::default()).unwrap();

        let row = &store.captures().rows[0];
        assert_eq!(row[1], s("LOS LAGOS"));
        assert_eq!(row[2], s("SALMON"));
        assert_eq!(row[3], s(" Puerto Montt "));
        assert_eq!(store.production().rows[0][1], s("SALMON"));
        assert_eq!(store.plants().rows[0][1], s("AYSEN"));
        assert_eq!(store.plants().rows[0][2], s("Planta A"));
    }

    #[test]
    fn resolves_optional_columns_after_trimming_headers() {
        let store =
            TableStore::new(&captures(), &production(), &plants(), &ColumnNames::default()).unwrap();
        let idx = store.capture_idx();
        assert_eq!(idx.year, 0);
        assert_eq!(idx.port, Some(3));
        assert_eq!(idx.month, None);
        assert_eq!(idx.agent_type, None);
        assert_eq!(store.production_idx().region, None);
    }

    #[test]
    fn does_not_touch_caller_tables() {
        let input = captures();
        let _ = TableStore::new(&input, &production(), &plants(), &ColumnNames::default()).unwrap();
        assert_eq!(input, captures());
    }

    #[test]
    fn captures_where_normalizes_region_and_matches_year_exactly() {
        let store =
            TableStore::new(&captures(), &production(), &plants(), &ColumnNames::default()).unwrap();
        assert_eq!(store.captures_where(Some(2020), Some("Los Lagos ")).row_count(), 1);
        assert_eq!(store.captures_where(Some(2021), None).row_count(), 0);
        assert_eq!(store.captures_where(None, Some("AYSEN")).row_count(), 0);
    }

    #[test]
    fn region_filter_is_ignored_without_region_column() {
        let mut caps = captures();
        caps.schema.fields[1].name = "Zone".to_string();
        let store =
            TableStore::new(&caps, &production(), &plants(), &ColumnNames::default()).unwrap();
        assert_eq!(store.captures_where(None, Some("NOWHERE")).row_count(), 1);
    }

    #[test]
    fn missing_required_column_names_table_and_column() {
        let mut prod = production();
        prod.schema.fields[3].name = "Produccion".to_string();
        let err =
            TableStore::new(&captures(), &prod, &plants(), &ColumnNames::default()).unwrap_err();
        assert_eq!(err.table, TableKind::Production);
        assert_eq!(err.column, "Output");
        assert_eq!(
            err.to_string(),
            "required column 'Output' missing from production table"
        );
    }
}
