//! Hand-rolled LSTM sequence forecaster
//!
//! A second, independent engine for the same 1-7 day forecasting
//! problem: a single recurrent cell with forget/input/output/candidate
//! gates, an output-layer-only training rule, and a three-model
//! ensemble that averages per-day predictions. Gate weights are never
//! trained; only the readout layer learns (reproduced source behavior,
//! see DESIGN.md).

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Dimensions and training schedule for one LSTM predictor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LstmConfig {
    pub input_size: usize,
    pub hidden_size: usize,
    pub output_size: usize,
    pub sequence_length: usize,
    pub learning_rate: f64,
    pub epochs: usize,
}

impl LstmConfig {
    /// Preset used for daily risk series forecasting
    pub fn daily_forecast() -> Self {
        LstmConfig {
            input_size: 1,
            hidden_size: 16,
            output_size: 1,
            sequence_length: 7,
            learning_rate: 0.01,
            epochs: 20,
        }
    }
}

/// Direction of the recent series movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

/// One forecast day from the sequence model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LstmPrediction {
    pub day: u32,
    pub predicted_value: f64,
    pub confidence: f64,
    pub trend: Trend,
}

/// Recurrent cell with the four standard gates
#[derive(Debug, Clone)]
struct LstmCell {
    /// Forget gate, (input + hidden) × hidden
    w_forget: Vec<Vec<f64>>,
    w_input: Vec<Vec<f64>>,
    w_output: Vec<Vec<f64>>,
    /// Cell candidate
    w_candidate: Vec<Vec<f64>>,
    b_forget: Vec<f64>,
    b_input: Vec<f64>,
    b_output: Vec<f64>,
    b_candidate: Vec<f64>,
}

impl LstmCell {
    fn new(input_size: usize, hidden_size: usize, rng: &mut dyn RngCore) -> Self {
        let rows = input_size + hidden_size;
        LstmCell {
            w_forget: random_matrix(rows, hidden_size, rng),
            w_input: random_matrix(rows, hidden_size, rng),
            w_output: random_matrix(rows, hidden_size, rng),
            w_candidate: random_matrix(rows, hidden_size, rng),
            b_forget: vec![0.1; hidden_size],
            b_input: vec![0.1; hidden_size],
            b_output: vec![0.1; hidden_size],
            b_candidate: vec![0.1; hidden_size],
        }
    }

    /// One time step: gate the previous cell state with the new input
    fn forward(&self, x: &[f64], h_prev: &[f64], c_prev: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let mut combined = Vec::with_capacity(x.len() + h_prev.len());
        combined.extend_from_slice(x);
        combined.extend_from_slice(h_prev);

        let forget = sigmoid_vec(&affine(&combined, &self.w_forget, &self.b_forget));
        let input = sigmoid_vec(&affine(&combined, &self.w_input, &self.b_input));
        let output = sigmoid_vec(&affine(&combined, &self.w_output, &self.b_output));
        let candidate: Vec<f64> = affine(&combined, &self.w_candidate, &self.b_candidate)
            .iter()
            .map(|v| v.tanh())
            .collect();

        let cell: Vec<f64> = forget
            .iter()
            .zip(c_prev)
            .zip(input.iter().zip(&candidate))
            .map(|((f, c), (i, cand))| f * c + i * cand)
            .collect();
        let hidden: Vec<f64> = output
            .iter()
            .zip(&cell)
            .map(|(o, c)| o * c.tanh())
            .collect();

        (hidden, cell)
    }
}

/// Single LSTM with a learned linear readout
#[derive(Debug, Clone)]
pub struct LstmPredictor {
    cell: LstmCell,
    readout_weights: Vec<f64>,
    readout_bias: f64,
    config: LstmConfig,
}

impl LstmPredictor {
    pub fn new(config: LstmConfig, rng: &mut dyn RngCore) -> Self {
        let cell = LstmCell::new(config.input_size, config.hidden_size, rng);
        let readout_weights = (0..config.hidden_size)
            .map(|_| (rng.random::<f64>() - 0.5) * 0.1)
            .collect();
        LstmPredictor {
            cell,
            readout_weights,
            readout_bias: 0.1,
            config,
        }
    }

    /// Fit the readout layer on (sequence, next value) pairs.
    ///
    /// The recurrent weights stay at their random initialization; each
    /// epoch runs a full forward pass per sequence and applies one
    /// delta update to the readout.
    pub fn train(&mut self, sequences: &[Vec<f64>], targets: &[f64]) {
        for epoch in 0..self.config.epochs {
            let mut total_loss = 0.0;

            for (sequence, &target) in sequences.iter().zip(targets) {
                let hidden = self.run_sequence(sequence);
                let output = self.readout(&hidden);

                let error = target - output;
                total_loss += error * error;

                self.readout_bias += self.config.learning_rate * error;
                for (weight, &h) in self.readout_weights.iter_mut().zip(&hidden) {
                    *weight += self.config.learning_rate * error * h;
                }
            }

            if epoch % 10 == 0 && !sequences.is_empty() {
                debug!(
                    "lstm epoch {}, loss {:.4}",
                    epoch,
                    total_loss / sequences.len() as f64
                );
            }
        }
    }

    /// Roll the window forward one predicted value at a time
    pub fn predict(&self, sequence: &[f64], days_ahead: u32) -> Vec<LstmPrediction> {
        let mut predictions = Vec::with_capacity(days_ahead as usize);
        let mut current: Vec<f64> = sequence.to_vec();

        for day in 1..=days_ahead {
            let hidden = self.run_sequence(&current);
            let predicted_value = self.readout(&hidden).clamp(0.0, 100.0);

            // Confidence widens with the horizon fraction
            let confidence = 0.7 + (f64::from(day) / f64::from(days_ahead)) * 0.15;

            let tail = &current[current.len().saturating_sub(5)..];
            let trend = classify_trend(tail);

            predictions.push(LstmPrediction {
                day,
                predicted_value,
                confidence,
                trend,
            });

            current.push(predicted_value);
            current.remove(0);
        }

        predictions
    }

    fn run_sequence(&self, sequence: &[f64]) -> Vec<f64> {
        let mut h = vec![0.0; self.config.hidden_size];
        let mut c = vec![0.0; self.config.hidden_size];
        for &value in sequence {
            let (h_new, c_new) = self.cell.forward(&[value], &h, &c);
            h = h_new;
            c = c_new;
        }
        h
    }

    fn readout(&self, hidden: &[f64]) -> f64 {
        self.readout_bias
            + hidden
                .iter()
                .zip(&self.readout_weights)
                .map(|(h, w)| h * w)
                .sum::<f64>()
    }
}

/// Ensemble of independently initialized LSTM predictors
#[derive(Debug, Clone)]
pub struct LstmEnsemble {
    models: Vec<LstmPredictor>,
}

impl LstmEnsemble {
    pub fn new(config: &LstmConfig, num_models: usize, rng: &mut dyn RngCore) -> Self {
        let models = (0..num_models)
            .map(|_| LstmPredictor::new(config.clone(), rng))
            .collect();
        LstmEnsemble { models }
    }

    /// The standard three-member ensemble with the daily forecast preset
    pub fn daily_forecast(rng: &mut dyn RngCore) -> Self {
        Self::new(&LstmConfig::daily_forecast(), 3, rng)
    }

    pub fn train(&mut self, sequences: &[Vec<f64>], targets: &[f64]) {
        let total = self.models.len();
        for (i, model) in self.models.iter_mut().enumerate() {
            debug!("training lstm ensemble member {}/{}", i + 1, total);
            model.train(sequences, targets);
        }
    }

    /// Per-day average of the member forecasts.
    ///
    /// Confidence averages the members' values and is penalized by the
    /// spread between them (variance / 100), floored at 0.5. The trend
    /// label follows the first member.
    pub fn predict_ensemble(&self, sequence: &[f64], days_ahead: u32) -> Vec<LstmPrediction> {
        let all: Vec<Vec<LstmPrediction>> = self
            .models
            .iter()
            .map(|model| model.predict(sequence, days_ahead))
            .collect();

        let mut combined = Vec::with_capacity(days_ahead as usize);
        for day_idx in 0..days_ahead as usize {
            let values: Vec<f64> = all.iter().map(|p| p[day_idx].predicted_value).collect();
            let confidences: Vec<f64> = all.iter().map(|p| p[day_idx].confidence).collect();

            let avg_value = values.iter().sum::<f64>() / values.len() as f64;
            let avg_confidence = confidences.iter().sum::<f64>() / confidences.len() as f64;

            let variance = values
                .iter()
                .map(|v| (v - avg_value).powi(2))
                .sum::<f64>()
                / values.len() as f64;
            let adjusted_confidence = (avg_confidence - variance / 100.0).max(0.5);

            combined.push(LstmPrediction {
                day: day_idx as u32 + 1,
                predicted_value: avg_value,
                confidence: adjusted_confidence,
                trend: all[0][day_idx].trend,
            });
        }

        combined
    }
}

/// Slice a series into fixed-length windows and their next values
pub fn prepare_sequences(data: &[f64], sequence_length: usize) -> (Vec<Vec<f64>>, Vec<f64>) {
    let mut sequences = Vec::new();
    let mut targets = Vec::new();
    if data.len() > sequence_length {
        for i in 0..data.len() - sequence_length {
            sequences.push(data[i..i + sequence_length].to_vec());
            targets.push(data[i + sequence_length]);
        }
    }
    (sequences, targets)
}

/// Scale a series into [0, 1], returning the original bounds
pub fn normalize(data: &[f64]) -> (Vec<f64>, f64, f64) {
    let min = data.iter().copied().fold(f64::INFINITY, f64::min);
    let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = if max - min == 0.0 { 1.0 } else { max - min };
    let normalized = data.iter().map(|v| (v - min) / range).collect();
    (normalized, min, max)
}

/// Invert [`normalize`] with the recorded bounds
pub fn denormalize(normalized: &[f64], min: f64, max: f64) -> Vec<f64> {
    let range = if max - min == 0.0 { 1.0 } else { max - min };
    normalized.iter().map(|v| v * range + min).collect()
}

/// Average step over a short tail, thresholded at ±2 per day
fn classify_trend(values: &[f64]) -> Trend {
    if values.len() < 2 {
        return Trend::Stable;
    }
    let diffs: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
    let avg_diff = diffs.iter().sum::<f64>() / diffs.len() as f64;

    if avg_diff > 2.0 {
        Trend::Increasing
    } else if avg_diff < -2.0 {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}

fn random_matrix(rows: usize, cols: usize, rng: &mut dyn RngCore) -> Vec<Vec<f64>> {
    (0..rows)
        .map(|_| (0..cols).map(|_| (rng.random::<f64>() - 0.5) * 0.1).collect())
        .collect()
}

fn affine(x: &[f64], weights: &[Vec<f64>], bias: &[f64]) -> Vec<f64> {
    let mut result = bias.to_vec();
    for (i, &value) in x.iter().enumerate() {
        for (j, out) in result.iter_mut().enumerate() {
            *out += value * weights[i][j];
        }
    }
    result
}

fn sigmoid_vec(x: &[f64]) -> Vec<f64> {
    x.iter().map(|v| 1.0 / (1.0 + (-v).exp())).collect()
}
