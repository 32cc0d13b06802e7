//! Depth-1 regression tree ("stump") selected by variance reduction
//!
//! A stump holds a single (feature, threshold) split with a constant
//! prediction on each side. It only exists as a bootstrap ensemble
//! member inside [`RandomForest`](super::RandomForest).
//!
//! Split search scans each feature's sorted distinct values but only
//! the first five of them. That slice is kept as-is for output
//! compatibility with the deployed scorer even though it biases the
//! search toward low thresholds; see DESIGN.md.

use super::variance;

/// Single-split regression tree
#[derive(Debug, Clone, Default)]
pub struct DecisionStump {
    feature_index: usize,
    threshold: f64,
    left_value: f64,
    right_value: f64,
}

/// Candidate thresholds considered per feature (ascending slice, not a sample)
const MAX_THRESHOLDS_PER_FEATURE: usize = 5;

/// Leaf value when a chosen partition turns out empty
const EMPTY_LEAF_VALUE: f64 = 50.0;

impl DecisionStump {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit the best single split by variance-reduction gain.
    ///
    /// When no candidate split beats zero gain the stump keeps its
    /// default (feature 0, threshold 0) split; leaf values are always
    /// recomputed from the final split's own partitions, with an empty
    /// partition defaulting to [`EMPTY_LEAF_VALUE`].
    pub fn train(&mut self, features: &[Vec<f64>], targets: &[f64]) {
        let feature_count = features.first().map_or(0, Vec::len);

        let mut best_gain = 0.0;
        let mut best_feature = 0;
        let mut best_threshold = 0.0;

        let total_variance = variance(targets);

        for feature_idx in 0..feature_count {
            for threshold in sorted_unique_head(features, feature_idx) {
                let (left_targets, right_targets) =
                    partition_targets(features, targets, feature_idx, threshold);
                if left_targets.is_empty() || right_targets.is_empty() {
                    continue;
                }

                let weighted_variance = (left_targets.len() as f64 / targets.len() as f64)
                    * variance(&left_targets)
                    + (right_targets.len() as f64 / targets.len() as f64)
                        * variance(&right_targets);
                let gain = total_variance - weighted_variance;

                if gain > best_gain {
                    best_gain = gain;
                    best_feature = feature_idx;
                    best_threshold = threshold;
                }
            }
        }

        self.feature_index = best_feature;
        self.threshold = best_threshold;

        let (left_targets, right_targets) =
            partition_targets(features, targets, best_feature, best_threshold);
        self.left_value = mean_or_default(&left_targets);
        self.right_value = mean_or_default(&right_targets);
    }

    /// Constant prediction for the side of the split the row falls on
    pub fn predict(&self, features: &[f64]) -> f64 {
        if features[self.feature_index] <= self.threshold {
            self.left_value
        } else {
            self.right_value
        }
    }
}

/// First few distinct values of one feature column, ascending
fn sorted_unique_head(features: &[Vec<f64>], feature_idx: usize) -> Vec<f64> {
    let mut values: Vec<f64> = features.iter().map(|row| row[feature_idx]).collect();
    values.sort_by(f64::total_cmp);
    values.dedup();
    values.truncate(MAX_THRESHOLDS_PER_FEATURE);
    values
}

/// Split targets into (<= threshold, > threshold) by one feature
fn partition_targets(
    features: &[Vec<f64>],
    targets: &[f64],
    feature_idx: usize,
    threshold: f64,
) -> (Vec<f64>, Vec<f64>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    for (row, &target) in features.iter().zip(targets) {
        if row[feature_idx] <= threshold {
            left.push(target);
        } else {
            right.push(target);
        }
    }
    (left, right)
}

fn mean_or_default(targets: &[f64]) -> f64 {
    if targets.is_empty() {
        EMPTY_LEAF_VALUE
    } else {
        targets.iter().sum::<f64>() / targets.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovers_clean_split() {
        // Feature 0 cleanly separates targets at 10.0
        let features = vec![
            vec![5.0, 1.0],
            vec![8.0, 2.0],
            vec![10.0, 1.5],
            vec![20.0, 1.0],
            vec![25.0, 2.0],
        ];
        let targets = vec![10.0, 10.0, 10.0, 90.0, 90.0];

        let mut stump = DecisionStump::new();
        stump.train(&features, &targets);

        assert_eq!(stump.predict(&[6.0, 1.5]), 10.0);
        assert_eq!(stump.predict(&[22.0, 1.5]), 90.0);
    }

    #[test]
    fn test_constant_targets_predict_constant() {
        let features = vec![vec![1.0], vec![2.0], vec![3.0]];
        let targets = vec![42.0, 42.0, 42.0];

        let mut stump = DecisionStump::new();
        stump.train(&features, &targets);

        // Zero variance means no split gains and the default threshold 0
        // stands. Everything above it lands in the right leaf, whose mean
        // is 42; the empty left leaf takes the neutral default.
        for x in [0.5, 1.5, 10.0] {
            assert_eq!(stump.predict(&[x]), 42.0);
        }
        assert_eq!(stump.predict(&[0.0]), 50.0);
    }

    #[test]
    fn test_no_split_leaves_default_threshold() {
        // All feature values positive, constant targets: threshold stays 0,
        // the left partition is empty and takes the documented default.
        let features = vec![vec![3.0], vec![4.0]];
        let targets = vec![42.0, 42.0];

        let mut stump = DecisionStump::new();
        stump.train(&features, &targets);

        assert_eq!(stump.predict(&[-1.0]), 50.0);
        assert_eq!(stump.predict(&[3.5]), 42.0);
    }

    #[test]
    fn test_threshold_slice_limits_search() {
        // The only informative split (<= 6) sits beyond the first five
        // distinct values {1..5}, so the stump cannot find it exactly;
        // it settles on the best of the considered thresholds.
        let features: Vec<Vec<f64>> = (1..=8).map(|v| vec![f64::from(v)]).collect();
        let targets = vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 100.0, 100.0];

        let mut stump = DecisionStump::new();
        stump.train(&features, &targets);

        // Best reachable threshold is 5: left mean 0, right mean (0+100+100)/3
        assert_eq!(stump.predict(&[2.0]), 0.0);
        let right = stump.predict(&[7.5]);
        assert!((right - 200.0 / 3.0).abs() < 1e-9, "right leaf was {}", right);
    }
}
