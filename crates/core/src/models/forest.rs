//! Bootstrap-aggregated ensemble of regression stumps
//!
//! Five stumps, each fit on an independent bootstrap resample of the
//! training set (same size, drawn with replacement). Averaging the
//! stumps' constant-leaf outputs decorrelates the single-split bias.

use rand::{Rng, RngCore};

use super::{clamp_score, DecisionStump};

const NUM_TREES: usize = 5;

/// Random forest of depth-1 trees
#[derive(Debug, Clone, Default)]
pub struct RandomForest {
    trees: Vec<DecisionStump>,
}

impl RandomForest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit all trees, each on its own bootstrap sample.
    ///
    /// Previous trees are discarded; a retrained forest never mixes
    /// members from different training sets.
    pub fn train(&mut self, features: &[Vec<f64>], targets: &[f64], rng: &mut dyn RngCore) {
        self.trees.clear();

        for _ in 0..NUM_TREES {
            let indices = bootstrap_indices(features.len(), rng);
            let sampled_features: Vec<Vec<f64>> =
                indices.iter().map(|&i| features[i].clone()).collect();
            let sampled_targets: Vec<f64> = indices.iter().map(|&i| targets[i]).collect();

            let mut tree = DecisionStump::new();
            tree.train(&sampled_features, &sampled_targets);
            self.trees.push(tree);
        }
    }

    /// Mean of all tree predictions, clamped to 0-100
    pub fn predict(&self, features: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.trees.iter().map(|tree| tree.predict(features)).sum();
        clamp_score(sum / self.trees.len() as f64)
    }
}

/// Uniform index resample of the same size, with replacement
fn bootstrap_indices(size: usize, rng: &mut dyn RngCore) -> Vec<usize> {
    (0..size).map(|_| rng.random_range(0..size)).collect()
}
