use std::io::Write;
use std::sync::Arc;

use arrow::array::{Float32Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use quake_predictor::data::filter::within_radius;
use quake_predictor::{load_file, Coordinate, DataLoadError, DistanceUnit, EarthquakeRecord};

fn temp_with(suffix: &str, contents: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn json_records() {
    let file = temp_with(
        ".json",
        br#"[
            {"time": "2011-03-11", "latitude": 38.297, "longitude": 142.373, "magnitude": 9.1},
            {"time": "2010-02-27", "latitude": -36.122, "longitude": -72.898, "magnitude": 8.8}
        ]"#,
    );
    let ds = load_file(file.path()).unwrap();
    assert_eq!(ds.len(), 2);
    assert_eq!(ds.records()[1], EarthquakeRecord::new(-36.122, -72.898, 8.8));
    assert_eq!(ds.column_names(), ["time", "latitude", "longitude", "magnitude"]);
}

#[test]
fn json_header_keeps_source_order_across_rows() {
    let file = temp_with(
        ".json",
        br#"[
            {"magnitude": 6.1, "longitude": 2.0, "latitude": 1.0},
            {"magnitude": 6.4, "longitude": 4.0, "latitude": 3.0, "depth": 10.0}
        ]"#,
    );
    let ds = load_file(file.path()).unwrap();
    assert_eq!(ds.column_names(), ["magnitude", "longitude", "latitude", "depth"]);
}

#[test]
fn json_out_of_range_number_is_rejected() {
    let file = temp_with(
        ".json",
        br#"[{"latitude": 1.0, "longitude": 2.0, "magnitude": 1e999}]"#,
    );
    let err = load_file(file.path()).unwrap_err();
    assert!(matches!(
        err,
        DataLoadError::Json(_) | DataLoadError::InvalidValue { row: 0, .. }
    ));
}

#[test]
fn json_null_magnitude_is_invalid() {
    let file = temp_with(".json", br#"[{"latitude": 1.0, "longitude": 2.0, "magnitude": null}]"#);
    let err = load_file(file.path()).unwrap_err();
    assert!(matches!(err, DataLoadError::InvalidValue { row: 0, .. }));
}

#[test]
fn malformed_json_is_reported() {
    let file = temp_with(".json", b"{ not json");
    assert!(matches!(load_file(file.path()).unwrap_err(), DataLoadError::Json(_)));
}

fn write_parquet(schema: Arc<Schema>, batch: RecordBatch) -> tempfile::NamedTempFile {
    let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
    let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
    file
}

#[test]
fn parquet_with_mixed_numeric_types() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("place", DataType::Utf8, false),
        Field::new("latitude", DataType::Float64, false),
        Field::new("longitude", DataType::Float32, false),
        Field::new("magnitude", DataType::Int64, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(vec!["Tohoku", "Maule", "Alaska"])),
            Arc::new(Float64Array::from(vec![38.297, -36.122, 61.02])),
            Arc::new(Float32Array::from(vec![142.5f32, -72.5, -147.5])),
            Arc::new(Int64Array::from(vec![9, 8, 9])),
        ],
    )
    .unwrap();
    let file = write_parquet(schema, batch);

    let ds = load_file(file.path()).unwrap();
    assert_eq!(ds.len(), 3);
    assert_eq!(ds.records()[0], EarthquakeRecord::new(38.297, 142.5, 9.0));
    assert_eq!(ds.column_names(), ["place", "latitude", "longitude", "magnitude"]);

    let tohoku = Coordinate::new(38.3, 142.4);
    assert_eq!(within_radius(&ds, tohoku, 50.0, DistanceUnit::Kilometers), vec![0]);
}

#[test]
fn parquet_missing_column() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("latitude", DataType::Float64, false),
        Field::new("longitude", DataType::Float64, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Float64Array::from(vec![1.0])),
            Arc::new(Float64Array::from(vec![2.0])),
        ],
    )
    .unwrap();
    let file = write_parquet(schema, batch);

    let err = load_file(file.path()).unwrap_err();
    assert!(matches!(err, DataLoadError::MissingColumn(ref c) if c == "magnitude"));
}

#[test]
fn parquet_null_is_invalid() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("latitude", DataType::Float64, true),
        Field::new("longitude", DataType::Float64, true),
        Field::new("magnitude", DataType::Float64, true),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Float64Array::from(vec![Some(1.0), Some(2.0)])),
            Arc::new(Float64Array::from(vec![Some(1.0), Some(2.0)])),
            Arc::new(Float64Array::from(vec![Some(6.0), None])),
        ],
    )
    .unwrap();
    let file = write_parquet(schema, batch);

    match load_file(file.path()).unwrap_err() {
        DataLoadError::InvalidValue { row, column, value } => {
            assert_eq!(row, 1);
            assert_eq!(column, "magnitude");
            assert_eq!(value, "null");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn parquet_nan_is_invalid() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("latitude", DataType::Float64, false),
        Field::new("longitude", DataType::Float64, false),
        Field::new("magnitude", DataType::Float32, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Float64Array::from(vec![1.0, 2.0, 3.0])),
            Arc::new(Float64Array::from(vec![1.0, 2.0, 3.0])),
            Arc::new(Float32Array::from(vec![6.0f32, 6.5, f32::NAN])),
        ],
    )
    .unwrap();
    let file = write_parquet(schema, batch);

    match load_file(file.path()).unwrap_err() {
        DataLoadError::InvalidValue { row, column, value } => {
            assert_eq!(row, 2);
            assert_eq!(column, "magnitude");
            assert_eq!(value, "NaN");
        }
        other => panic!("unexpected error: {other}"),
    }
}
