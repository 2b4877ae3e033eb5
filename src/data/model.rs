use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// EarthquakeRecord – one row of the source table
// ---------------------------------------------------------------------------

/// A single earthquake (one row of the source table).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EarthquakeRecord {
    /// Degrees north, nominally in [-90, 90].
    pub latitude: f64,
    /// Degrees east, nominally in [-180, 180].
    pub longitude: f64,
    pub magnitude: f64,
}

impl EarthquakeRecord {
    pub fn new(latitude: f64, longitude: f64, magnitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            magnitude,
        }
    }

    /// Feature vector used by the regressor: `[latitude, longitude]`.
    pub fn features(&self) -> [f64; 2] {
        [self.latitude, self.longitude]
    }
}

// ---------------------------------------------------------------------------
// EarthquakeDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct EarthquakeDataset {
    records: Vec<EarthquakeRecord>,
    /// Header of the source file in source order (includes ignored columns).
    column_names: Vec<String>,
}

impl EarthquakeDataset {
    /// Columns every source must provide.
    pub const REQUIRED_COLUMNS: [&'static str; 3] = ["latitude", "longitude", "magnitude"];

    pub fn new(records: Vec<EarthquakeRecord>, column_names: Vec<String>) -> Self {
        Self {
            records,
            column_names,
        }
    }

    /// Build a dataset that only carries the required columns.
    pub fn from_records(records: Vec<EarthquakeRecord>) -> Self {
        let column_names = Self::REQUIRED_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .collect();
        Self::new(records, column_names)
    }

    pub fn records(&self) -> &[EarthquakeRecord] {
        &self.records
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn get(&self, idx: usize) -> Option<&EarthquakeRecord> {
        self.records.get(idx)
    }

    /// Magnitude column in row order.
    pub fn magnitudes(&self) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().map(|r| r.magnitude)
    }

    /// Number of earthquakes.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
