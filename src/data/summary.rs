use std::collections::BTreeMap;

use log::warn;
use serde::Serialize;

use super::model::EarthquakeDataset;

// ---------------------------------------------------------------------------
// Magnitude distribution
// ---------------------------------------------------------------------------

/// Magnitude range shown by the dashboard's distribution chart.
pub const DEFAULT_HISTOGRAM_RANGE: (f64, f64) = (5.5, 10.0);

/// One bar of a magnitude histogram. `[lower, upper)` except the last bin,
/// which also includes `upper`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Count magnitudes into `bins` equal-width bins over `[min, max]`.
///
/// Magnitudes outside the range are skipped. Returns no bins when `bins` is
/// zero or the range is empty.
pub fn magnitude_histogram(
    dataset: &EarthquakeDataset,
    min: f64,
    max: f64,
    bins: usize,
) -> Vec<HistogramBin> {
    if bins == 0 || min.is_nan() || max.is_nan() || max <= min {
        return Vec::new();
    }
    let width = (max - min) / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    let mut skipped = 0usize;
    for m in dataset.magnitudes() {
        if !(min..=max).contains(&m) {
            skipped += 1;
            continue;
        }
        let idx = (((m - min) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    if skipped > 0 {
        warn!("{skipped} magnitudes outside [{min}, {max}] left out of the histogram");
    }
    out
}

// ---------------------------------------------------------------------------
// Highest magnitude per geographic degree
// ---------------------------------------------------------------------------

/// Highest magnitude in each 1°×1° cell, keyed by `(floor(lat), floor(lon))`.
///
/// Latitudes are clamped into [-90, 89] and longitudes into [-180, 179] so the
/// poles and the antimeridian fold into the edge cells. Rows with a NaN
/// coordinate or magnitude are skipped.
pub fn max_magnitude_per_degree(dataset: &EarthquakeDataset) -> BTreeMap<(i32, i32), f64> {
    let mut cells: BTreeMap<(i32, i32), f64> = BTreeMap::new();
    for rec in dataset.records() {
        if rec.latitude.is_nan() || rec.longitude.is_nan() || rec.magnitude.is_nan() {
            continue;
        }
        let lat = (rec.latitude.floor() as i32).clamp(-90, 89);
        let lon = (rec.longitude.floor() as i32).clamp(-180, 179);
        cells
            .entry((lat, lon))
            .and_modify(|m| *m = m.max(rec.magnitude))
            .or_insert(rec.magnitude);
    }
    cells
}

// ---------------------------------------------------------------------------
// Headline numbers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub count: usize,
    pub min_magnitude: f64,
    pub max_magnitude: f64,
    pub mean_magnitude: f64,
}

impl DatasetSummary {
    /// `None` for an empty dataset.
    pub fn from_dataset(dataset: &EarthquakeDataset) -> Option<Self> {
        if dataset.is_empty() {
            return None;
        }
        let min = dataset.magnitudes().fold(f64::INFINITY, f64::min);
        let max = dataset.magnitudes().fold(f64::NEG_INFINITY, f64::max);
        let mean = dataset.magnitudes().sum::<f64>() / dataset.len() as f64;
        Some(Self {
            count: dataset.len(),
            min_magnitude: min,
            max_magnitude: max,
            mean_magnitude: mean,
        })
    }
}
