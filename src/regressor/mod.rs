//! Magnitude prediction from coordinates.
//!
//! A [`MagnitudeRegressor`] only exists once its decision tree is fitted, so
//! holding one means the model is ready. Construction shuffles the dataset
//! with a fixed seed, holds out a fraction of rows for scoring, and fits on
//! the rest. Nothing is mutated afterwards; the value can be shared across
//! threads behind an `Arc`.

pub mod observer;
pub mod split;
pub mod tree;

use std::path::Path;
use std::sync::Arc;

use log::info;

use crate::config::RegressorConfig;
use crate::data::loader;
use crate::data::model::{EarthquakeDataset, EarthquakeRecord};
use crate::error::{InsufficientDataError, Result};
use observer::{LogObserver, PredictionEvent, PredictionObserver};
use split::TrainTestSplit;
use tree::DecisionTreeRegressor;

/// Decimal digits reported by [`MagnitudeRegressor::confidence`] by default.
pub const DEFAULT_CONFIDENCE_DIGITS: u32 = 2;

pub struct MagnitudeRegressor {
    model: DecisionTreeRegressor,
    /// Held-out `[latitude, longitude]` rows.
    eval_x: Vec<[f64; 2]>,
    /// Held-out magnitudes, aligned with `eval_x`.
    eval_y: Vec<f64>,
    n_train: usize,
    config: RegressorConfig,
    observer: Arc<dyn PredictionObserver>,
}

impl std::fmt::Debug for MagnitudeRegressor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MagnitudeRegressor")
            .field("config", &self.config)
            .field("n_train", &self.n_train)
            .field("n_eval", &self.eval_y.len())
            .field("leaves", &self.model.leaf_count())
            .finish_non_exhaustive()
    }
}

impl MagnitudeRegressor {
    /// Split `dataset` and fit the tree on the training side.
    pub fn new(
        dataset: &EarthquakeDataset,
        config: RegressorConfig,
    ) -> std::result::Result<Self, InsufficientDataError> {
        let split = TrainTestSplit::of_dataset(dataset, config.test_fraction, config.seed)?;
        let records = dataset.records();

        let (train_x, train_y) = columns(records, &split.train);
        let (eval_x, eval_y) = columns(records, &split.test);

        // The split guarantees a non-empty training side of matching length.
        let model = DecisionTreeRegressor::fit(&train_x, &train_y).map_err(|_| {
            InsufficientDataError {
                rows: dataset.len(),
                test_fraction: config.test_fraction,
                n_train: split.train.len(),
                n_test: split.test.len(),
            }
        })?;

        info!(
            "fitted magnitude regressor on {} rows ({} held out, seed {}): {} leaves, depth {}",
            train_y.len(),
            eval_y.len(),
            config.seed,
            model.leaf_count(),
            model.depth()
        );

        Ok(Self {
            model,
            eval_x,
            eval_y,
            n_train: train_y.len(),
            config,
            observer: Arc::new(LogObserver),
        })
    }

    /// Load a dataset from `path` and build a regressor from it.
    pub fn from_path(path: &Path, config: RegressorConfig) -> Result<Self> {
        let dataset = loader::load_file(path)?;
        Ok(Self::new(&dataset, config)?)
    }

    /// Replace the diagnostics sink (defaults to [`LogObserver`]).
    pub fn with_observer(mut self, observer: Arc<dyn PredictionObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Predicted magnitude at `(latitude, longitude)`. Inputs are not range-checked.
    pub fn predict(&self, latitude: f64, longitude: f64) -> f64 {
        let magnitude = self.model.predict_one(&[latitude, longitude]);
        self.observer.on_prediction(&PredictionEvent {
            latitude,
            longitude,
            magnitude,
        });
        magnitude
    }

    /// `1 - MSE` of the model on the held-out rows, rounded to `digits`.
    ///
    /// Not clamped: an error above 1.0 yields a negative score.
    pub fn confidence(&self, digits: u32) -> f64 {
        let predictions = self.model.predict(&self.eval_x);
        let error = mean_squared_error(&self.eval_y, &predictions);
        round_to(1.0 - error, digits)
    }

    /// Number of rows the tree was fitted on.
    pub fn training_size(&self) -> usize {
        self.n_train
    }

    /// Number of held-out rows used by [`confidence`](Self::confidence).
    pub fn evaluation_size(&self) -> usize {
        self.eval_y.len()
    }

    pub fn tree_depth(&self) -> usize {
        self.model.depth()
    }

    pub fn leaf_count(&self) -> usize {
        self.model.leaf_count()
    }

    pub fn config(&self) -> RegressorConfig {
        self.config
    }
}

fn columns(
    records: &[EarthquakeRecord],
    rows: &[usize],
) -> (Vec<[f64; 2]>, Vec<f64>) {
    rows.iter()
        .map(|&i| (records[i].features(), records[i].magnitude))
        .unzip()
}

/// Mean of squared differences. Zero for empty input.
pub fn mean_squared_error(y_true: &[f64], y_pred: &[f64]) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p).powi(2))
        .sum::<f64>()
        / y_true.len() as f64
}

/// Round to `digits` decimals.
///
/// Works on the exact binary value, so `2.675` (stored just below) rounds down
/// and exact ties go to the even digit. Non-finite values pass through.
pub fn round_to(value: f64, digits: u32) -> f64 {
    format!("{:.*}", digits as usize, value)
        .parse()
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn grid(n: usize) -> EarthquakeDataset {
        EarthquakeDataset::from_records(
            (0..n)
                .map(|i| {
                    let lat = (i % 10) as f64 * 3.0;
                    let lon = (i / 10) as f64 * 5.0 - 100.0;
                    EarthquakeRecord::new(lat, lon, 5.5 + lat / 30.0)
                })
                .collect(),
        )
    }

    #[test]
    fn partition_sizes() {
        let reg = MagnitudeRegressor::new(&grid(40), RegressorConfig::default()).unwrap();
        assert_eq!(reg.evaluation_size(), 2);
        assert_eq!(reg.training_size(), 38);
    }

    #[test]
    fn single_row_is_insufficient() {
        let err = MagnitudeRegressor::new(&grid(1), RegressorConfig::default()).unwrap_err();
        assert_eq!(err.rows, 1);
    }

    #[test]
    fn predict_is_deterministic() {
        let reg = MagnitudeRegressor::new(&grid(40), RegressorConfig::default()).unwrap();
        let a = reg.predict(12.3, -90.1);
        let b = reg.predict(12.3, -90.1);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn confidence_is_stable_and_rounded() {
        let reg = MagnitudeRegressor::new(&grid(60), RegressorConfig::default()).unwrap();
        let first = reg.confidence(DEFAULT_CONFIDENCE_DIGITS);
        assert_eq!(first, reg.confidence(DEFAULT_CONFIDENCE_DIGITS));
        let scaled = first * 100.0;
        assert!((scaled - scaled.round()).abs() < 1e-6, "{first} has more than 2 digits");
    }

    #[test]
    fn observer_sees_each_prediction() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let reg = MagnitudeRegressor::new(&grid(40), RegressorConfig::default())
            .unwrap()
            .with_observer(Arc::new(move |e: &PredictionEvent| {
                sink.lock().unwrap().push(*e);
            }));
        let m = reg.predict(3.0, -95.0);
        let events = seen.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0], PredictionEvent { latitude: 3.0, longitude: -95.0, magnitude: m });
    }

    #[test]
    fn perfect_fit_scores_one() {
        let flat = EarthquakeDataset::from_records(
            (0..20).map(|i| EarthquakeRecord::new(0.0, i as f64, 6.0)).collect(),
        );
        let reg = MagnitudeRegressor::new(&flat, RegressorConfig::default()).unwrap();
        assert_eq!(reg.confidence(2), 1.0);
    }

    #[test]
    fn confidence_can_go_negative() {
        let two = EarthquakeDataset::from_records(vec![
            EarthquakeRecord::new(0.0, 0.0, 0.0),
            EarthquakeRecord::new(0.0, 0.0, 10.0),
        ]);
        let reg = MagnitudeRegressor::new(&two, RegressorConfig::default().with_test_fraction(0.5))
            .unwrap();
        // Trained on one magnitude, scored on the other: MSE = 100.
        assert_eq!(reg.confidence(2), -99.0);
    }

    #[test]
    fn helpers() {
        assert_eq!(mean_squared_error(&[1.0, 2.0], &[1.0, 4.0]), 2.0);
        assert_eq!(mean_squared_error(&[], &[]), 0.0);
        assert_eq!(round_to(0.12345, 2), 0.12);
        assert_eq!(round_to(-98.996, 2), -99.0);
        assert!(round_to(f64::NAN, 2).is_nan());
    }

    #[test]
    fn rounding_uses_the_stored_value_and_ties_to_even() {
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(0.625, 2), 0.62);
        assert_eq!(round_to(1.115, 2), 1.11);
        assert_eq!(round_to(2.675, 2), 2.67);
        assert_eq!(round_to(0.375, 2), 0.38);
    }
}
