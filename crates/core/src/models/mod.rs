//! Trainable regressors for the risk forecasting ensemble
//!
//! Three independent model families, each mapping a 4-value weather
//! feature row (temperature, humidity, wind speed, precipitation) to a
//! 0-100 risk score. Training is deliberately small-iteration: the
//! models are ensemble members refreshed per forecast request, not
//! long-lived fitted artifacts.

pub mod forest;
pub mod linear;
pub mod neural;
pub mod stump;

pub use forest::RandomForest;
pub use linear::LinearRegression;
pub use neural::NeuralNetwork;
pub use stump::DecisionStump;

/// Shared learning rate for the gradient-based members
pub(crate) const LEARNING_RATE: f64 = 0.01;

/// Clamp a model output to the valid risk score range
pub(crate) fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

/// Population variance of a sample (0 for an empty slice)
pub(crate) fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_variance_empty_and_constant() {
        assert_eq!(variance(&[]), 0.0);
        assert_eq!(variance(&[7.0, 7.0, 7.0]), 0.0);
    }

    #[test]
    fn test_variance_known_value() {
        // Population variance of [2, 4, 6] around mean 4 is 8/3
        assert_abs_diff_eq!(variance(&[2.0, 4.0, 6.0]), 8.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_clamp_score_bounds() {
        assert_eq!(clamp_score(-3.0), 0.0);
        assert_eq!(clamp_score(42.0), 42.0);
        assert_eq!(clamp_score(250.0), 100.0);
    }
}
