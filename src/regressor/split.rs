use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::data::model::EarthquakeDataset;
use crate::error::InsufficientDataError;

/// Row indices of a deterministic train/evaluation partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n_rows` with a seeded [`StdRng`] and hold out the first
/// `ceil(n_rows * test_fraction)` shuffled rows for evaluation.
///
/// Fails when either side would be empty.
pub fn train_test_split(
    n_rows: usize,
    test_fraction: f64,
    seed: u64,
) -> Result<TrainTestSplit, InsufficientDataError> {
    let n_test = if test_fraction.is_finite() && test_fraction > 0.0 {
        ((n_rows as f64 * test_fraction).ceil() as usize).min(n_rows)
    } else {
        0
    };
    let n_train = n_rows - n_test;

    if n_test == 0 || n_train == 0 {
        return Err(InsufficientDataError {
            rows: n_rows,
            test_fraction,
            n_train,
            n_test,
        });
    }

    let mut indices: Vec<usize> = (0..n_rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_test);
    Ok(TrainTestSplit {
        train,
        test: indices,
    })
}

impl TrainTestSplit {
    pub fn of_dataset(
        dataset: &EarthquakeDataset,
        test_fraction: f64,
        seed: u64,
    ) -> Result<Self, InsufficientDataError> {
        train_test_split(dataset.len(), test_fraction, seed)
    }
}
