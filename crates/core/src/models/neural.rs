//! Small feed-forward network: 4 inputs, 8 ReLU hidden units, sigmoid output
//!
//! The backward pass is a simplified approximation kept for output
//! compatibility with the deployed scorer: only the output-layer delta
//! is computed, the hidden weights are updated through the
//! already-updated output weights, and the ReLU derivative is never
//! applied. See DESIGN.md for the compatibility note.

use rand::{Rng, RngCore};

use super::LEARNING_RATE;

const HIDDEN_SIZE: usize = 8;
const EPOCHS: usize = 5;

/// One-hidden-layer regression network scaled to 0-100
#[derive(Debug, Clone, Default)]
pub struct NeuralNetwork {
    /// input × hidden
    weights1: Vec<Vec<f64>>,
    /// hidden × 1
    weights2: Vec<f64>,
    bias1: Vec<f64>,
    bias2: f64,
}

impl NeuralNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit with per-sample stochastic updates over a fixed epoch count.
    ///
    /// All weights are freshly initialized per call; targets are taken
    /// on the 0-100 scale and compared against the raw sigmoid output,
    /// which keeps the sigmoid saturated high for any realistic risk
    /// target (reproduced source behavior).
    pub fn train(&mut self, features: &[Vec<f64>], targets: &[f64], rng: &mut dyn RngCore) {
        let input_size = features.first().map_or(0, Vec::len);

        self.weights1 = (0..input_size)
            .map(|_| (0..HIDDEN_SIZE).map(|_| rng.random::<f64>() * 0.1).collect())
            .collect();
        self.weights2 = (0..HIDDEN_SIZE).map(|_| rng.random::<f64>() * 0.1).collect();
        self.bias1 = vec![0.1; HIDDEN_SIZE];
        self.bias2 = 0.1;

        for _epoch in 0..EPOCHS {
            for (row, &target) in features.iter().zip(targets) {
                let hidden = self.hidden_activations(row);
                let output = sigmoid(dot(&hidden, &self.weights2) + self.bias2);

                let error = target - output;
                let output_gradient = error * output * (1.0 - output);

                for j in 0..HIDDEN_SIZE {
                    self.weights2[j] += LEARNING_RATE * output_gradient * hidden[j];
                }
                self.bias2 += LEARNING_RATE * output_gradient;

                // Hidden layer update reuses the freshly updated output
                // weights and skips the ReLU derivative.
                for i in 0..input_size {
                    for k in 0..HIDDEN_SIZE {
                        self.weights1[i][k] +=
                            LEARNING_RATE * output_gradient * self.weights2[k] * row[i];
                    }
                }
            }
        }
    }

    /// Forward pass only, scaled to the 0-100 risk range
    pub fn predict(&self, features: &[f64]) -> f64 {
        let hidden = self.hidden_activations(features);
        sigmoid(dot(&hidden, &self.weights2) + self.bias2) * 100.0
    }

    fn hidden_activations(&self, features: &[f64]) -> Vec<f64> {
        let mut result = self.bias1.clone();
        for (i, &x) in features.iter().enumerate() {
            for (j, value) in result.iter_mut().enumerate() {
                *value += x * self.weights1[i][j];
            }
        }
        for value in &mut result {
            *value = value.max(0.0);
        }
        result
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(99)
    }

    fn sample_data() -> (Vec<Vec<f64>>, Vec<f64>) {
        (
            vec![
                vec![35.0, 20.0, 30.0, 0.0],
                vec![22.0, 70.0, 5.0, 12.0],
                vec![30.0, 45.0, 15.0, 2.0],
            ],
            vec![85.0, 15.0, 50.0],
        )
    }

    #[test]
    fn test_sigmoid_shape() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
        assert!(sigmoid(10.0) > 0.99);
        assert!(sigmoid(-10.0) < 0.01);
    }

    #[test]
    fn test_prediction_in_range() {
        let (features, targets) = sample_data();
        let mut net = NeuralNetwork::new();
        net.train(&features, &targets, &mut rng());

        for row in &features {
            let score = net.predict(row);
            assert!((0.0..=100.0).contains(&score), "score was {}", score);
        }
    }

    #[test]
    fn test_seeded_training_deterministic() {
        let (features, targets) = sample_data();

        let mut a = NeuralNetwork::new();
        let mut b = NeuralNetwork::new();
        a.train(&features, &targets, &mut rng());
        b.train(&features, &targets, &mut rng());

        let probe = [28.0, 40.0, 20.0, 1.0];
        assert_eq!(a.predict(&probe), b.predict(&probe));
    }

    #[test]
    fn test_saturated_output_for_large_targets() {
        // Targets far above the sigmoid range push the output toward 1,
        // so the scaled prediction approaches 100. This pins the known
        // behavior of comparing 0-100 targets to a 0-1 output.
        let (features, targets) = sample_data();
        let mut net = NeuralNetwork::new();
        net.train(&features, &targets, &mut rng());

        let score = net.predict(&[30.0, 45.0, 15.0, 2.0]);
        assert!(score > 50.0, "saturated network predicted {}", score);
    }
}
