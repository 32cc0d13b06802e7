//! Single-layer linear regression trained by per-sample gradient descent
//!
//! Intentionally toy-grade optimization: 10 fixed epochs, no shuffling,
//! no convergence check. The model is one vote of three in the forecast
//! ensemble and is retrained from scratch for every request.

use rand::{Rng, RngCore};

use super::{clamp_score, LEARNING_RATE};

const EPOCHS: usize = 10;

/// Linear predictor `score = bias + w · features`, clamped to 0-100
#[derive(Debug, Clone, Default)]
pub struct LinearRegression {
    weights: Vec<f64>,
    bias: f64,
}

impl LinearRegression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit on feature rows and their scalar targets.
    ///
    /// Weights are reinitialized to small random values on every call
    /// (no warm start). Samples are visited in the given order each
    /// epoch; each visit applies an immediate bias and weight update.
    pub fn train(&mut self, features: &[Vec<f64>], targets: &[f64], rng: &mut dyn RngCore) {
        let m = features.first().map_or(0, Vec::len);

        self.weights = (0..m).map(|_| rng.random::<f64>() * 0.01).collect();
        self.bias = 0.0;

        for _epoch in 0..EPOCHS {
            for (row, &target) in features.iter().zip(targets) {
                let prediction = self.raw_prediction(row);
                let error = target - prediction;

                self.bias += LEARNING_RATE * error;
                for (weight, &feature) in self.weights.iter_mut().zip(row) {
                    *weight += LEARNING_RATE * error * feature;
                }
            }
        }
    }

    /// Predict a risk score for one feature row
    pub fn predict(&self, features: &[f64]) -> f64 {
        clamp_score(self.raw_prediction(features))
    }

    fn raw_prediction(&self, features: &[f64]) -> f64 {
        self.bias
            + self
                .weights
                .iter()
                .zip(features)
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_prediction_clamped() {
        let mut model = LinearRegression::new();
        let features = vec![vec![1000.0, 1000.0, 1000.0, 1000.0]];
        let targets = vec![100.0];
        model.train(&features, &targets, &mut rng());

        let high = model.predict(&[1e6, 1e6, 1e6, 1e6]);
        assert!((0.0..=100.0).contains(&high), "prediction was {}", high);
    }

    #[test]
    fn test_seeded_training_deterministic() {
        let features = vec![
            vec![30.0, 40.0, 10.0, 0.0],
            vec![32.0, 35.0, 15.0, 0.0],
            vec![28.0, 55.0, 8.0, 5.0],
        ];
        let targets = vec![60.0, 70.0, 40.0];

        let mut a = LinearRegression::new();
        let mut b = LinearRegression::new();
        a.train(&features, &targets, &mut rng());
        b.train(&features, &targets, &mut rng());

        assert_eq!(a.predict(&[31.0, 38.0, 12.0, 1.0]), b.predict(&[31.0, 38.0, 12.0, 1.0]));
    }

    #[test]
    fn test_retrain_discards_previous_fit() {
        let mut model = LinearRegression::new();
        let features = vec![vec![1.0, 0.0, 0.0, 0.0], vec![2.0, 0.0, 0.0, 0.0]];
        model.train(&features, &[10.0, 20.0], &mut rng());
        let first = model.predict(&[1.5, 0.0, 0.0, 0.0]);

        // Retraining on a very different target scale must not be anchored
        // to the earlier weights.
        model.train(&features, &[90.0, 95.0], &mut rng());
        let second = model.predict(&[1.5, 0.0, 0.0, 0.0]);
        assert!(second > first, "{} should exceed {}", second, first);
    }

    #[test]
    fn test_empty_feature_rows() {
        let mut model = LinearRegression::new();
        model.train(&[], &[], &mut rng());
        // Untrained-but-called model degenerates to its zero bias
        assert_eq!(model.predict(&[25.0, 50.0, 10.0, 0.0]), 0.0);
    }
}
