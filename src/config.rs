use serde::Deserialize;

/// Seed for the train/evaluation shuffle.
pub const DEFAULT_SEED: u64 = 40;

/// Fraction of rows held out for [`confidence`](crate::regressor::MagnitudeRegressor::confidence).
pub const DEFAULT_TEST_FRACTION: f64 = 0.05;

/// Settings fixed at regressor construction.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RegressorConfig {
    pub seed: u64,
    pub test_fraction: f64,
}

impl Default for RegressorConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            test_fraction: DEFAULT_TEST_FRACTION,
        }
    }
}

impl RegressorConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_test_fraction(mut self, test_fraction: f64) -> Self {
        self.test_fraction = test_fraction;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: RegressorConfig = serde_json::from_str(r#"{"seed": 7}"#).unwrap();
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.test_fraction, DEFAULT_TEST_FRACTION);
    }
}
