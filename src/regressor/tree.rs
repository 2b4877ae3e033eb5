//! CART regression tree.
//!
//! Splits minimise the summed squared error of the two children and leaves
//! predict the mean target of their training rows. Nodes live in a flat
//! arena indexed by `usize`; fitting and prediction are both iterative.

use thiserror::Error;

/// Splits whose error reduction falls below this are treated as no-ops.
const MIN_GAIN: f64 = 1e-12;

/// Nodes whose target variance falls below this become leaves.
const MIN_VARIANCE: f64 = 1e-10;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreeError {
    #[error("cannot fit with zero samples")]
    Empty,
    #[error("number of samples in x ({x}) and y ({y}) must match")]
    LengthMismatch { x: usize, y: usize },
}

/// One slot of the flattened tree.
#[derive(Debug, Clone, PartialEq)]
pub enum RegressionTreeNode {
    /// Rows with `x[feature_idx] <= threshold` go to `left`, the rest (and NaN) to `right`.
    Split {
        feature_idx: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf { value: f64, n_samples: usize },
}

/// Hyper-parameters. Defaults grow the tree until every leaf is pure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

impl TreeParams {
    /// Maximum depth (root has depth 0).
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_min_samples_split(mut self, min_samples: usize) -> Self {
        self.min_samples_split = min_samples.max(2);
        self
    }

    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples.max(1);
        self
    }

    /// Fit a tree on `x` (one fixed-width feature row per sample) and `y`.
    pub fn fit<const N: usize>(
        &self,
        x: &[[f64; N]],
        y: &[f64],
    ) -> Result<DecisionTreeRegressor, TreeError> {
        if x.len() != y.len() {
            return Err(TreeError::LengthMismatch {
                x: x.len(),
                y: y.len(),
            });
        }
        if x.is_empty() {
            return Err(TreeError::Empty);
        }

        let mut nodes: Vec<RegressionTreeNode> = Vec::new();
        // (arena slot, rows reaching the node, depth)
        let mut pending: Vec<(usize, Vec<usize>, usize)> = Vec::new();

        nodes.push(RegressionTreeNode::Leaf {
            value: 0.0,
            n_samples: 0,
        });
        pending.push((0, (0..x.len()).collect(), 0));

        while let Some((slot, rows, depth)) = pending.pop() {
            let stats = TargetStats::of(rows.iter().map(|&r| y[r]));

            let stop = rows.len() < self.min_samples_split
                || self.max_depth.is_some_and(|d| depth >= d)
                || stats.variance() < MIN_VARIANCE;

            let split = if stop {
                None
            } else {
                best_split(x, y, &rows, self.min_samples_leaf)
            };

            let Some(split) = split else {
                nodes[slot] = RegressionTreeNode::Leaf {
                    value: stats.mean(),
                    n_samples: rows.len(),
                };
                continue;
            };

            let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
                .iter()
                .copied()
                .partition(|&r| x[r][split.feature_idx] <= split.threshold);

            let left = nodes.len();
            let right = left + 1;
            let placeholder = RegressionTreeNode::Leaf {
                value: 0.0,
                n_samples: 0,
            };
            nodes.push(placeholder.clone());
            nodes.push(placeholder);
            nodes[slot] = RegressionTreeNode::Split {
                feature_idx: split.feature_idx,
                threshold: split.threshold,
                left,
                right,
            };
            pending.push((right, right_rows, depth + 1));
            pending.push((left, left_rows, depth + 1));
        }

        Ok(DecisionTreeRegressor {
            nodes,
            n_features: N,
        })
    }
}

/// A fitted regression tree. Immutable; prediction needs no randomness.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTreeRegressor {
    nodes: Vec<RegressionTreeNode>,
    n_features: usize,
}

impl DecisionTreeRegressor {
    /// Fit with default [`TreeParams`].
    pub fn fit<const N: usize>(x: &[[f64; N]], y: &[f64]) -> Result<Self, TreeError> {
        TreeParams::default().fit(x, y)
    }

    /// Predict the value for a single sample.
    ///
    /// # Panics
    ///
    /// Panics if `sample` has fewer features than the tree was fitted on.
    pub fn predict_one(&self, sample: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                RegressionTreeNode::Leaf { value, .. } => return *value,
                RegressionTreeNode::Split {
                    feature_idx,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if sample[*feature_idx] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    /// Predict every row of `x`.
    pub fn predict<const N: usize>(&self, x: &[[f64; N]]) -> Vec<f64> {
        x.iter().map(|row| self.predict_one(row)).collect()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn nodes(&self) -> &[RegressionTreeNode] {
        &self.nodes
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, RegressionTreeNode::Leaf { .. }))
            .count()
    }

    /// Leaf-only trees have depth 0.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(0usize, 0usize)];
        while let Some((idx, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let RegressionTreeNode::Split { left, right, .. } = &self.nodes[idx] {
                stack.push((*left, depth + 1));
                stack.push((*right, depth + 1));
            }
        }
        max_depth
    }
}

// ---------------------------------------------------------------------------
// Split search
// ---------------------------------------------------------------------------

/// Running count, mean and squared deviation (Welford) for a set of target values.
#[derive(Debug, Clone, Copy, Default)]
struct TargetStats {
    n: usize,
    mean: f64,
    m2: f64,
}

impl TargetStats {
    fn of(values: impl Iterator<Item = f64>) -> Self {
        let mut s = Self::default();
        for v in values {
            s.push(v);
        }
        s
    }

    fn push(&mut self, v: f64) {
        self.n += 1;
        let delta = v - self.mean;
        self.mean += delta / self.n as f64;
        self.m2 += delta * (v - self.mean);
    }

    fn mean(&self) -> f64 {
        self.mean
    }

    /// Sum of squared deviations from the mean.
    fn sse(&self) -> f64 {
        self.m2.max(0.0)
    }

    fn variance(&self) -> f64 {
        if self.n <= 1 {
            0.0
        } else {
            self.sse() / self.n as f64
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Split {
    feature_idx: usize,
    threshold: f64,
    gain: f64,
}

/// Best split over all features, scanning each feature's sorted values once.
///
/// Right-hand statistics come from a reverse sweep rather than subtracting the
/// left side from the total, so large offsets in the target do not cancel.
/// Ties keep the earliest feature and the lowest threshold.
fn best_split<const N: usize>(
    x: &[[f64; N]],
    y: &[f64],
    rows: &[usize],
    min_samples_leaf: usize,
) -> Option<Split> {
    let mut best: Option<Split> = None;
    let mut order = rows.to_vec();
    let mut suffix = vec![TargetStats::default(); rows.len() + 1];

    for feature_idx in 0..N {
        order.sort_by(|&a, &b| x[a][feature_idx].total_cmp(&x[b][feature_idx]));

        // suffix[k] summarises order[k..].
        for k in (0..order.len()).rev() {
            let mut s = suffix[k + 1];
            s.push(y[order[k]]);
            suffix[k] = s;
        }
        let parent_sse = suffix[0].sse();

        let mut left = TargetStats::default();
        for k in 1..order.len() {
            left.push(y[order[k - 1]]);

            let lo = x[order[k - 1]][feature_idx];
            let hi = x[order[k]][feature_idx];
            if lo == hi || hi.is_nan() {
                continue;
            }
            if k < min_samples_leaf || order.len() - k < min_samples_leaf {
                continue;
            }

            let gain = parent_sse - (left.sse() + suffix[k].sse());
            if gain.is_nan() || gain <= MIN_GAIN {
                continue;
            }
            if best.is_some_and(|b| gain <= b.gain) {
                continue;
            }

            let mut threshold = lo / 2.0 + hi / 2.0;
            if threshold >= hi || threshold.is_infinite() {
                threshold = lo;
            }
            best = Some(Split {
                feature_idx,
                threshold,
                gain,
            });
        }
    }

    best
}
