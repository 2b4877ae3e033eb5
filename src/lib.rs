//! Earthquake magnitude prediction and great-circle distances.
//!
//! ```text
//!   load_file(path) ──► EarthquakeDataset ──► MagnitudeRegressor::new
//!                              │                   ├── predict(lat, lon)
//!                              │                   └── confidence(digits)
//!                              └──► summary / filter
//!   geo::distance(lat1, lon1, lat2, lon2, unit)
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod geo;
pub mod regressor;

pub use config::RegressorConfig;
pub use data::loader::load_file;
pub use data::model::{EarthquakeDataset, EarthquakeRecord};
pub use error::{DataLoadError, Error, InsufficientDataError};
pub use geo::{distance, Coordinate, DistanceUnit};
pub use regressor::{MagnitudeRegressor, DEFAULT_CONFIDENCE_DIGITS};
