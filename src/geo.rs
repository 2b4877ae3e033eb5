//! Great-circle distance between coordinates.
//!
//! Uses the [Haversine formula](https://en.wikipedia.org/wiki/Haversine_formula)
//! on a sphere of radius [`EARTH_RADIUS_KM`]. Inputs are trusted: out-of-range
//! degrees still give a well-defined number and NaN propagates.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used by every distance computation.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

pub const KILOMETERS_PER_MILE: f64 = 1.609344;

/// Unit of a returned distance. Miles unless asked otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Miles,
    Kilometers,
}

impl DistanceUnit {
    pub fn from_kilometers_flag(kilometers: bool) -> Self {
        if kilometers {
            DistanceUnit::Kilometers
        } else {
            DistanceUnit::Miles
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            DistanceUnit::Miles => "mi",
            DistanceUnit::Kilometers => "km",
        }
    }
}

/// A (latitude, longitude) pair in degrees. Not range-checked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn distance_to(&self, other: &Coordinate, unit: DistanceUnit) -> f64 {
        distance(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
            unit,
        )
    }
}

/// Great-circle distance between `(lat1, lon1)` and `(lat2, lon2)`.
///
/// Computed in kilometers and converted to miles when `unit` is
/// [`DistanceUnit::Miles`].
pub fn distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64, unit: DistanceUnit) -> f64 {
    let lat1_rad = degrees_to_radians(lat1);
    let lat2_rad = degrees_to_radians(lat2);
    let delta_lat_rad = degrees_to_radians(lat2 - lat1);
    let delta_lon_rad = degrees_to_radians(lon2 - lon1);

    let a = (delta_lat_rad / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon_rad / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    let km = EARTH_RADIUS_KM * c;

    match unit {
        DistanceUnit::Kilometers => km,
        DistanceUnit::Miles => kilometers_to_miles(km),
    }
}

pub fn degrees_to_radians(deg: f64) -> f64 {
    deg * std::f64::consts::PI / 180.0
}

pub fn kilometers_to_miles(kilometers: f64) -> f64 {
    kilometers / KILOMETERS_PER_MILE
}

#[cfg(test)]
mod tests {
    use super::*;

    const SF: (f64, f64) = (37.7749, -122.4194);
    const LA: (f64, f64) = (34.0522, -118.2437);

    #[test]
    fn identical_points_are_zero_apart() {
        for &(lat, lon) in &[(0.0, 0.0), SF, LA, (-89.9, 179.9), (90.0, -180.0)] {
            assert_eq!(distance(lat, lon, lat, lon, DistanceUnit::Kilometers), 0.0);
            assert_eq!(distance(lat, lon, lat, lon, DistanceUnit::Miles), 0.0);
        }
    }

    #[test]
    fn san_francisco_to_los_angeles() {
        let km = distance(SF.0, SF.1, LA.0, LA.1, DistanceUnit::Kilometers);
        let mi = distance(SF.0, SF.1, LA.0, LA.1, DistanceUnit::Miles);
        assert!((km - 559.12).abs() < 0.01 * 559.12, "km = {km}");
        assert!((mi - 347.42).abs() < 0.01 * 347.42, "mi = {mi}");
    }

    #[test]
    fn miles_are_kilometers_over_conversion_factor() {
        let pairs = [
            (SF, LA),
            ((51.5074, -0.1278), (40.7128, -74.0060)),
            ((-33.8688, 151.2093), (35.6762, 139.6503)),
        ];
        for ((a, b), (c, d)) in pairs {
            let km = distance(a, b, c, d, DistanceUnit::Kilometers);
            let mi = distance(a, b, c, d, DistanceUnit::Miles);
            assert!((km / KILOMETERS_PER_MILE - mi).abs() < 1e-9);
        }
    }

    #[test]
    fn default_unit_is_miles() {
        assert_eq!(DistanceUnit::default(), DistanceUnit::Miles);
        assert_eq!(DistanceUnit::from_kilometers_flag(true), DistanceUnit::Kilometers);
    }

    #[test]
    fn out_of_range_inputs_are_not_rejected() {
        let d = distance(120.0, 400.0, -95.0, -250.0, DistanceUnit::Kilometers);
        assert!(d.is_finite());
    }

    #[test]
    fn nan_propagates() {
        assert!(distance(f64::NAN, 0.0, 1.0, 1.0, DistanceUnit::Miles).is_nan());
    }

    #[test]
    fn coordinate_distance_matches_free_function() {
        let sf = Coordinate::new(SF.0, SF.1);
        let la = Coordinate::new(LA.0, LA.1);
        assert_eq!(
            sf.distance_to(&la, DistanceUnit::Kilometers),
            distance(SF.0, SF.1, LA.0, LA.1, DistanceUnit::Kilometers)
        );
    }
}
