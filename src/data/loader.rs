use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

use super::error::LoadError;
use super::model::{Continent, Record, RecordSet, UnknownContinent};

pub type Result<T> = std::result::Result<T, LoadError>;

/// Columns every input file must provide.
pub const REQUIRED_COLUMNS: [&str; 4] = ["country", "continent", "year", "life_exp"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an indicator table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`            – comma-delimited with a header row
/// * `.tsv` / `.tab`   – tab-delimited with a header row
/// * `.json`           – `[{ "country": ..., "continent": ..., ... }, ...]`
/// * `.parquet` / `.pq` – flat columns named like the CSV header
pub fn load_file(path: &Path) -> Result<RecordSet> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_delimited(path, b','),
        "tsv" | "tab" => load_delimited(path, b'\t'),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension: other.to_string(),
        }),
    }
}

fn finish(records: Vec<Record>, path: &Path) -> Result<RecordSet> {
    let set = RecordSet::from_records(records);
    if set.is_empty() {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(set)
}

fn check_required(mut has: impl FnMut(&str) -> bool, path: &Path) -> Result<()> {
    match REQUIRED_COLUMNS.into_iter().find(|col| !has(col)) {
        Some(missing) => Err(LoadError::MissingColumn {
            column: missing.to_string(),
            path: path.to_path_buf(),
        }),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Text rows (CSV / TSV / JSON)
// ---------------------------------------------------------------------------

/// One row as read from a text format, before the continent is checked.
#[derive(Debug, Deserialize)]
struct RawRecord {
    country: String,
    continent: String,
    year: i32,
    #[serde(default)]
    life_exp: Option<f64>,
    #[serde(default)]
    hdi_index: Option<f64>,
    #[serde(default)]
    gdp: Option<f64>,
    #[serde(default)]
    co2_consump: Option<f64>,
    #[serde(default)]
    services: Option<f64>,
}

impl RawRecord {
    fn into_record(self, row: usize, path: &Path) -> Result<Record> {
        let continent: Continent = self
            .continent
            .parse()
            .map_err(|UnknownContinent(value)| LoadError::InvalidValue {
                column: "continent".to_string(),
                value,
                row,
                path: path.to_path_buf(),
            })?;

        Ok(Record {
            country: self.country,
            continent,
            year: self.year,
            life_exp: self.life_exp,
            hdi_index: self.hdi_index,
            gdp: self.gdp,
            co2_consump: self.co2_consump,
            services: self.services,
        }
        .normalized())
    }
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

/// Header row with column names; columns are matched by name and extra
/// columns are ignored.  Empty cells in numeric columns are absent values.
fn load_delimited(path: &Path, delimiter: u8) -> Result<RecordSet> {
    let file = std::fs::File::open(path).map_err(|e| LoadError::from_io(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(file);

    let csv_err = |source: csv::Error| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let headers = reader.headers().map_err(csv_err)?.clone();
    check_required(|col| headers.iter().any(|h| h == col), path)?;

    let mut records = Vec::new();
    for (row_no, row) in reader.deserialize::<RawRecord>().enumerate() {
        records.push(row.map_err(csv_err)?.into_record(row_no, path)?);
    }

    finish(records, path)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "country": "Chile", "continent": "Americas", "year": 2018,
///     "life_exp": 80.0, "hdi_index": 0.85, "gdp": 15100.0 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<RecordSet> {
    let text = std::fs::read_to_string(path).map_err(|e| LoadError::from_io(path, e))?;
    let json_err = |source: serde_json::Error| LoadError::Json {
        path: path.to_path_buf(),
        source,
    };
    let rows: Vec<Map<String, JsonValue>> = serde_json::from_str(&text).map_err(json_err)?;

    let mut records = Vec::with_capacity(rows.len());
    for (row_no, row) in rows.into_iter().enumerate() {
        check_required(|col| row.contains_key(col), path)?;
        let raw: RawRecord = serde_json::from_value(JsonValue::Object(row)).map_err(json_err)?;
        records.push(raw.into_record(row_no, path)?);
    }

    finish(records, path)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<RecordSet> {
    let parquet_err = |e: &dyn std::fmt::Display| LoadError::Parquet {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let file = std::fs::File::open(path).map_err(|e| LoadError::from_io(path, e))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| parquet_err(&e))?;
    let reader = builder.build().map_err(|e| parquet_err(&e))?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.map_err(|e| parquet_err(&e))?;
        let columns = BatchColumns::locate(&batch, path)?;
        let offset = records.len();
        for row in 0..batch.num_rows() {
            records.push(columns.record(row, offset + row, path)?);
        }
    }

    finish(records, path)
}

// -- Parquet / Arrow helpers --

/// Column handles for one record batch, type-checked up front.
struct BatchColumns {
    country: ArrayRef,
    continent: ArrayRef,
    year: ArrayRef,
    life_exp: ArrayRef,
    hdi_index: Option<ArrayRef>,
    gdp: Option<ArrayRef>,
    co2_consump: Option<ArrayRef>,
    services: Option<ArrayRef>,
}

impl BatchColumns {
    fn locate(batch: &RecordBatch, path: &Path) -> Result<Self> {
        let schema = batch.schema();
        check_required(|col| schema.index_of(col).is_ok(), path)?;

        let column = |name: &str| -> Option<ArrayRef> {
            schema.index_of(name).ok().map(|i| batch.column(i).clone())
        };
        let typed = |name: &str, accept: fn(&DataType) -> bool| -> Result<Option<ArrayRef>> {
            match column(name) {
                Some(col) if accept(col.data_type()) => Ok(Some(col)),
                Some(col) => Err(LoadError::ColumnType {
                    column: name.to_string(),
                    found: format!("{:?}", col.data_type()),
                    path: path.to_path_buf(),
                }),
                None => Ok(None),
            }
        };
        let required = |name: &str, accept: fn(&DataType) -> bool| -> Result<ArrayRef> {
            typed(name, accept)?.ok_or_else(|| LoadError::MissingColumn {
                column: name.to_string(),
                path: path.to_path_buf(),
            })
        };

        Ok(BatchColumns {
            country: required("country", is_string)?,
            continent: required("continent", is_string)?,
            year: required("year", is_integer)?,
            life_exp: required("life_exp", is_numeric)?,
            hdi_index: typed("hdi_index", is_numeric)?,
            gdp: typed("gdp", is_numeric)?,
            co2_consump: typed("co2_consump", is_numeric)?,
            services: typed("services", is_numeric)?,
        })
    }

    fn record(&self, row: usize, row_no: usize, path: &Path) -> Result<Record> {
        let invalid = |column: &str, value: String| LoadError::InvalidValue {
            column: column.to_string(),
            value,
            row: row_no,
            path: path.to_path_buf(),
        };

        let country = string_at(&self.country, row).ok_or_else(|| invalid("country", "null".into()))?;
        let continent_text =
            string_at(&self.continent, row).ok_or_else(|| invalid("continent", "null".into()))?;
        let continent: Continent = continent_text
            .parse()
            .map_err(|_| invalid("continent", continent_text.clone()))?;
        let year = integer_at(&self.year, row).ok_or_else(|| invalid("year", "null".into()))?;
        let year = i32::try_from(year).map_err(|_| invalid("year", year.to_string()))?;

        let optional = |col: &Option<ArrayRef>| col.as_ref().and_then(|c| f64_at(c, row));

        Ok(Record {
            country,
            continent,
            year,
            life_exp: f64_at(&self.life_exp, row),
            hdi_index: optional(&self.hdi_index),
            gdp: optional(&self.gdp),
            co2_consump: optional(&self.co2_consump),
            services: optional(&self.services),
        }
        .normalized())
    }
}

fn is_string(dt: &DataType) -> bool {
    matches!(dt, DataType::Utf8 | DataType::LargeUtf8)
}

fn is_integer(dt: &DataType) -> bool {
    matches!(dt, DataType::Int32 | DataType::Int64)
}

fn is_numeric(dt: &DataType) -> bool {
    is_integer(dt) || matches!(dt, DataType::Float32 | DataType::Float64)
}

fn string_at(col: &ArrayRef, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    if let Some(arr) = col.as_string_opt::<i32>() {
        return Some(arr.value(row).to_string());
    }
    col.as_string_opt::<i64>().map(|arr| arr.value(row).to_string())
}

fn integer_at(col: &ArrayRef, row: usize) -> Option<i64> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Int32 => col.as_primitive_opt::<Int32Type>().map(|a| a.value(row) as i64),
        DataType::Int64 => col.as_primitive_opt::<Int64Type>().map(|a| a.value(row)),
        _ => None,
    }
}

fn f64_at(col: &ArrayRef, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Float64 => col.as_primitive_opt::<Float64Type>().map(|a| a.value(row)),
        DataType::Float32 => col.as_primitive_opt::<Float32Type>().map(|a| a.value(row) as f64),
        DataType::Int32 | DataType::Int64 => integer_at(col, row).map(|v| v as f64),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Path-keyed load cache
// ---------------------------------------------------------------------------

/// Write-once cache of loaded datasets keyed by the path they were read from.
///
/// The first successful load of a path reads the file; every later call for
/// the same path hands back the same `Arc` without touching the filesystem.
/// Failed loads are not remembered.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, Arc<RecordSet>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, path: &Path) -> Result<Arc<RecordSet>> {
        if let Some(hit) = self.entries.get(path) {
            log::debug!("Dataset cache hit for {}", path.display());
            return Ok(Arc::clone(hit));
        }

        let dataset = Arc::new(load_file(path)?);
        self.entries.insert(path.to_path_buf(), Arc::clone(&dataset));
        log::info!(
            "Loaded {} rows from {} ({} years, {} continents); {} datasets cached",
            dataset.len(),
            path.display(),
            dataset.years().len(),
            dataset.continents().len(),
            self.len()
        );
        Ok(dataset)
    }

    /// Number of cached paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
