use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// Seismic zone: centre, spread in degrees, and how often it fires.
struct Zone {
    name: &'static str,
    latitude: f64,
    longitude: f64,
    spread: f64,
    weight: u32,
}

const ZONES: &[Zone] = &[
    Zone { name: "Japan Trench", latitude: 38.3, longitude: 142.4, spread: 3.0, weight: 6 },
    Zone { name: "Sunda Arc", latitude: -2.0, longitude: 100.0, spread: 5.0, weight: 5 },
    Zone { name: "Andes", latitude: -25.0, longitude: -70.5, spread: 8.0, weight: 5 },
    Zone { name: "Aleutians", latitude: 52.0, longitude: -175.0, spread: 4.0, weight: 3 },
    Zone { name: "San Andreas", latitude: 36.0, longitude: -120.5, spread: 2.5, weight: 2 },
    Zone { name: "Himalaya", latitude: 29.0, longitude: 84.0, spread: 4.0, weight: 2 },
    Zone { name: "Tonga", latitude: -20.0, longitude: -175.0, spread: 3.0, weight: 4 },
];

#[derive(Serialize)]
struct Row {
    id: i64,
    zone: &'static str,
    latitude: f64,
    longitude: f64,
    depth: f64,
    magnitude: f64,
}

/// Box-Muller transform for a normal sample.
fn gauss(rng: &mut StdRng, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(1e-15);
    let u2: f64 = rng.gen();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}

/// Gutenberg–Richter tail above 5.5 (b = 1), capped at 9.5. Zones further
/// from the equator skew slightly stronger so the model has a signal to learn.
fn magnitude(rng: &mut StdRng, latitude: f64) -> f64 {
    let u: f64 = rng.gen::<f64>().max(1e-12);
    let tail = -u.log10();
    let bias = latitude.abs() / 90.0 * 0.6;
    ((5.5 + tail + bias) * 10.0).round().min(95.0) / 10.0
}

fn wrap_longitude(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

fn main() {
    let mut rng = StdRng::seed_from_u64(42);
    let total_weight: u32 = ZONES.iter().map(|z| z.weight).sum();

    let mut rows = Vec::new();
    for id in 0..2_000i64 {
        let mut pick = rng.gen_range(0..total_weight);
        let zone = ZONES
            .iter()
            .find(|z| {
                if pick < z.weight {
                    true
                } else {
                    pick -= z.weight;
                    false
                }
            })
            .expect("weights cover the range");

        let latitude = gauss(&mut rng, zone.latitude, zone.spread).clamp(-90.0, 90.0);
        let longitude = wrap_longitude(gauss(&mut rng, zone.longitude, zone.spread));
        let depth = gauss(&mut rng, 35.0, 20.0).abs();
        rows.push(Row {
            id,
            zone: zone.name,
            latitude,
            longitude,
            depth,
            magnitude: magnitude(&mut rng, latitude),
        });
    }

    // CSV
    let csv_path = "sample_earthquakes.csv";
    let mut writer = csv::Writer::from_path(csv_path).expect("Failed to create CSV file");
    for row in &rows {
        writer.serialize(row).expect("Failed to write CSV row");
    }
    writer.flush().expect("Failed to flush CSV file");

    // Parquet
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("zone", DataType::Utf8, false),
        Field::new("latitude", DataType::Float64, false),
        Field::new("longitude", DataType::Float64, false),
        Field::new("depth", DataType::Float64, false),
        Field::new("magnitude", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.id))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.zone))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.latitude))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.longitude))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.depth))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.magnitude))),
        ],
    )
    .expect("Failed to create RecordBatch");

    let parquet_path = "sample_earthquakes.parquet";
    let file = std::fs::File::create(parquet_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!(
        "Wrote {} earthquakes from {} zones to {csv_path} and {parquet_path}",
        rows.len(),
        ZONES.len()
    );
}
