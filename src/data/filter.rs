use super::model::EarthquakeDataset;
use crate::geo::{Coordinate, DistanceUnit};

/// Return indices of earthquakes no farther than `radius` from `center`.
///
/// Indices come back in dataset order. A NaN `radius` or center matches nothing.
pub fn within_radius(
    dataset: &EarthquakeDataset,
    center: Coordinate,
    radius: f64,
    unit: DistanceUnit,
) -> Vec<usize> {
    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, rec)| {
            let here = Coordinate::new(rec.latitude, rec.longitude);
            center.distance_to(&here, unit) <= radius
        })
        .map(|(i, _)| i)
        .collect()
}
