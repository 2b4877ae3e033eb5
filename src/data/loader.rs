use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::DataType;
use log::info;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::model::{EarthquakeDataset, EarthquakeRecord};
use crate::error::DataLoadError;

type Result<T> = std::result::Result<T, DataLoadError>;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an earthquake dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` – comma-delimited with a header row
/// * `.tsv`          – tab-delimited with a header row
/// * `.json`         – `[{ "latitude": .., "longitude": .., "magnitude": .. }, ...]`
/// * `.parquet`      – numeric `latitude`, `longitude`, `magnitude` columns
///
/// Columns other than the three required ones are ignored.
pub fn load_file(path: &Path) -> Result<EarthquakeDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" | "txt" => load_delimited(path, b','),
        "tsv" => load_delimited(path, b'\t'),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(DataLoadError::UnsupportedExtension(other.to_string())),
    }?;

    info!(
        "loaded {} earthquakes from {} ({} columns)",
        dataset.len(),
        path.display(),
        dataset.column_names().len()
    );
    Ok(dataset)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Position of every required column inside `headers`, in
/// [`EarthquakeDataset::REQUIRED_COLUMNS`] order.
fn required_positions(headers: &[String]) -> Result<[usize; 3]> {
    let mut out = [0usize; 3];
    for (slot, name) in out.iter_mut().zip(EarthquakeDataset::REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| DataLoadError::MissingColumn(name.to_string()))?;
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

/// Header row with column names, one earthquake per record.
fn load_delimited(path: &Path, delimiter: u8) -> Result<EarthquakeDataset> {
    let file = open(path)?;
    read_delimited(file, delimiter)
}

/// Parse delimited text from any reader. Split out so callers holding an
/// in-memory buffer do not need a file on disk.
pub fn read_delimited<R: std::io::Read>(source: R, delimiter: u8) -> Result<EarthquakeDataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let positions = required_positions(&headers)?;

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        let mut values = [0.0f64; 3];
        for ((value, &idx), column) in values
            .iter_mut()
            .zip(positions.iter())
            .zip(EarthquakeDataset::REQUIRED_COLUMNS)
        {
            let raw = record.get(idx).unwrap_or("");
            *value = parse_number(raw, row_no, column)?;
        }
        records.push(EarthquakeRecord::new(values[0], values[1], values[2]));
    }

    Ok(EarthquakeDataset::new(records, headers))
}

/// `NaN` and infinities count as missing values, like an empty cell.
fn parse_number(raw: &str, row: usize, column: &str) -> Result<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| invalid(row, column, raw.to_string()))
}

fn invalid(row: usize, column: &str, value: String) -> DataLoadError {
    DataLoadError::InvalidValue {
        row,
        column: column.to_string(),
        value,
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`:
///
/// ```json
/// [
///   { "latitude": 38.3, "longitude": 142.4, "magnitude": 9.1, "depth": 29.0 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<EarthquakeDataset> {
    let text = std::fs::read_to_string(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rows: Vec<Map<String, JsonValue>> = serde_json::from_str(&text)?;

    // Keys in first-seen order across all rows.
    let mut column_names: Vec<String> = Vec::new();
    for key in rows.iter().flat_map(|obj| obj.keys()) {
        if !column_names.contains(key) {
            column_names.push(key.clone());
        }
    }
    if rows.is_empty() {
        column_names = EarthquakeDataset::REQUIRED_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .collect();
    }

    let mut records = Vec::with_capacity(rows.len());
    for (i, obj) in rows.iter().enumerate() {
        let mut values = [0.0f64; 3];
        for (value, column) in values.iter_mut().zip(EarthquakeDataset::REQUIRED_COLUMNS) {
            let cell = obj
                .get(column)
                .ok_or_else(|| DataLoadError::MissingColumn(column.to_string()))?;
            *value = cell
                .as_f64()
                .filter(|v| v.is_finite())
                .ok_or_else(|| invalid(i, column, cell.to_string()))?;
        }
        records.push(EarthquakeRecord::new(values[0], values[1], values[2]));
    }

    Ok(EarthquakeDataset::new(records, column_names))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file written by Pandas (`df.to_parquet()`) or Polars
/// (`df.write_parquet()`). Required columns may be Float64, Float32, Int32
/// or Int64.
fn load_parquet(path: &Path) -> Result<EarthquakeDataset> {
    let file = open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    let column_names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let positions = required_positions(&column_names)?;
    let reader = builder.build()?;

    let mut records = Vec::new();
    let mut row_offset = 0;

    for batch_result in reader {
        let batch = batch_result?;
        let columns: Vec<&Arc<dyn Array>> = positions.iter().map(|&i| batch.column(i)).collect();

        for row in 0..batch.num_rows() {
            let mut values = [0.0f64; 3];
            for ((value, col), column) in values
                .iter_mut()
                .zip(columns.iter())
                .zip(EarthquakeDataset::REQUIRED_COLUMNS)
            {
                *value = match numeric_value(col, row) {
                    Some(v) if v.is_finite() => v,
                    Some(v) => return Err(invalid(row_offset + row, column, v.to_string())),
                    None if col.is_null(row) => {
                        return Err(invalid(row_offset + row, column, "null".to_string()))
                    }
                    None => {
                        return Err(invalid(
                            row_offset + row,
                            column,
                            format!("{:?}", col.data_type()),
                        ))
                    }
                };
            }
            records.push(EarthquakeRecord::new(values[0], values[1], values[2]));
        }
        row_offset += batch.num_rows();
    }

    Ok(EarthquakeDataset::new(records, column_names))
}

/// Read a single numeric cell as `f64`. `None` for nulls and non-numeric types.
fn numeric_value(col: &Arc<dyn Array>, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    let any = col.as_any();
    match col.data_type() {
        DataType::Float64 => any.downcast_ref::<Float64Array>().map(|a| a.value(row)),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int64 => any.downcast_ref::<Int64Array>().map(|a| a.value(row) as f64),
        DataType::Int32 => any.downcast_ref::<Int32Array>().map(|a| a.value(row) as f64),
        _ => None,
    }
}
