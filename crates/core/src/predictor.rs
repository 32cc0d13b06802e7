//! Multi-day fire risk forecasting ensemble
//!
//! Combines a linear regressor, a bootstrap forest, and a small neural
//! network, all trained per request on the same historical window, into
//! a weighted 1-7 day forecast. Weather factors are extrapolated by a
//! short-window linear trend that rolls forward over the forecast, so
//! each day's trend reflects the days already predicted.

use chrono::{Days, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::{LinearRegression, NeuralNetwork, RandomForest};

/// Training pairs are built from at most this many leading history days
const MAX_TRAINING_WINDOW: usize = 30;

/// Number of trailing values the trend estimator looks at
const TREND_WINDOW: usize = 7;

/// Ensemble score when no model could be trained
const NEUTRAL_SCORE: f64 = 50.0;

/// Ensemble weights: forest carries the most, the two others split the rest
const LINEAR_WEIGHT: f64 = 0.3;
const FOREST_WEIGHT: f64 = 0.4;
const NEURAL_WEIGHT: f64 = 0.3;

/// Equal-length daily observation series for one site.
///
/// `risk_scores` holds the 0-100 risk previously derived for each day,
/// either from historical records or from the physical scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalSeries {
    pub temperature: Vec<f64>,
    pub humidity: Vec<f64>,
    pub wind_speed: Vec<f64>,
    pub precipitation: Vec<f64>,
    pub risk_scores: Vec<f64>,
}

impl HistoricalSeries {
    /// Build a series, rejecting length mismatches between the five columns
    pub fn new(
        temperature: Vec<f64>,
        humidity: Vec<f64>,
        wind_speed: Vec<f64>,
        precipitation: Vec<f64>,
        risk_scores: Vec<f64>,
    ) -> Result<Self, String> {
        let series = HistoricalSeries {
            temperature,
            humidity,
            wind_speed,
            precipitation,
            risk_scores,
        };
        series.check_lengths()?;
        Ok(series)
    }

    /// Verify the five columns cover the same days.
    ///
    /// Deserialized requests construct the series field-by-field and
    /// skip [`HistoricalSeries::new`], so boundaries re-run this check
    /// before indexing across columns.
    pub fn check_lengths(&self) -> Result<(), String> {
        let len = self.temperature.len();
        if [
            &self.humidity,
            &self.wind_speed,
            &self.precipitation,
            &self.risk_scores,
        ]
        .iter()
        .any(|series| series.len() != len)
        {
            return Err(format!(
                "historical series lengths differ: temperature={}, humidity={}, wind={}, precipitation={}, risk={}",
                len,
                self.humidity.len(),
                self.wind_speed.len(),
                self.precipitation.len(),
                self.risk_scores.len()
            ));
        }
        Ok(())
    }

    /// Number of observed days
    pub fn len(&self) -> usize {
        self.temperature.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temperature.is_empty()
    }
}

/// Site descriptor for a forecast request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirePredictionInput {
    /// Opaque site label, not used in the computation
    pub latitude: f64,
    /// Opaque site label, not used in the computation
    pub longitude: f64,
    pub history: HistoricalSeries,
    /// 0-100%
    pub vegetation_density: f64,
    /// meters
    pub elevation: f64,
    /// 1-7
    pub days_ahead: u32,
}

/// Extrapolated weather factors backing one forecast day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastFactors {
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub precipitation: f64,
    pub vegetation: f64,
}

/// Categorical severity bucket derived from the numeric score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Bucket a risk score. Thresholds are strict: exactly 80 is still
    /// `High`, exactly 60 still `Medium`, exactly 40 still `Low`.
    pub fn from_score(score: f64) -> Self {
        if score > 80.0 {
            Severity::Critical
        } else if score > 60.0 {
            Severity::High
        } else if score > 40.0 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

/// One day of the forward forecast
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    /// 1-based forecast day; day 1 is tomorrow
    pub day: u32,
    /// ISO 8601 calendar date
    pub date: String,
    /// 0-100, clamped
    pub predicted_risk_score: f64,
    /// 0.5-0.95
    pub confidence: f64,
    pub factors: ForecastFactors,
    pub recommendation: String,
    pub severity: Severity,
}

/// Router-boundary result shape: failures are values, never panics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResponse {
    pub success: bool,
    pub predictions: Vec<DailyForecast>,
    pub error: Option<String>,
}

impl ForecastResponse {
    fn failure(error: impl Into<String>) -> Self {
        ForecastResponse {
            success: false,
            predictions: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// Ensemble orchestrator owning one instance of each model family.
///
/// Construct one per request or test; instances share no state, so
/// concurrent forecasts cannot interleave training (the process-wide
/// singleton of the earlier deployment is deliberately gone).
#[derive(Debug)]
pub struct FireRiskPredictor {
    linear: LinearRegression,
    forest: RandomForest,
    neural: NeuralNetwork,
    linear_trained: bool,
    forest_trained: bool,
    neural_trained: bool,
    rng: StdRng,
}

impl FireRiskPredictor {
    /// Predictor with an entropy-seeded random source
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_rng(&mut rand::rng()))
    }

    /// Predictor with a fixed seed, for reproducible outputs in tests
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        FireRiskPredictor {
            linear: LinearRegression::new(),
            forest: RandomForest::new(),
            neural: NeuralNetwork::new(),
            linear_trained: false,
            forest_trained: false,
            neural_trained: false,
            rng,
        }
    }

    /// Train all three models on consecutive-day pairs from the history.
    ///
    /// Pair *i* maps the weather factors at day *i* to the risk score at
    /// day *i+1*, over at most the first [`MAX_TRAINING_WINDOW`] days.
    /// Fewer than two observed days yields zero pairs and the call is a
    /// silent no-op: the trained flags stay false and predictions fall
    /// back to the neutral score.
    pub fn train(&mut self, history: &HistoricalSeries) {
        let n = history.len().min(MAX_TRAINING_WINDOW);
        let mut features: Vec<Vec<f64>> = Vec::new();
        let mut targets: Vec<f64> = Vec::new();

        for i in 0..n.saturating_sub(1) {
            features.push(vec![
                history.temperature[i],
                history.humidity[i],
                history.wind_speed[i],
                history.precipitation[i],
            ]);
            targets.push(history.risk_scores[i + 1]);
        }

        if features.is_empty() {
            debug!("insufficient history ({} days), skipping training", history.len());
            return;
        }

        self.linear.train(&features, &targets, &mut self.rng);
        self.linear_trained = true;

        self.forest.train(&features, &targets, &mut self.rng);
        self.forest_trained = true;

        self.neural.train(&features, &targets, &mut self.rng);
        self.neural_trained = true;

        info!("ensemble trained on {} consecutive-day pairs", features.len());
    }

    /// Produce the forward forecast, one entry per day, day 1 = tomorrow.
    ///
    /// Never panics for `days_ahead` in 1-7; an empty history degrades to
    /// neutral predictions with zeroed factors.
    pub fn predict_next_days(&self, input: &FirePredictionInput) -> Vec<DailyForecast> {
        let mut predictions = Vec::with_capacity(input.days_ahead as usize);

        // Rolling working copies: each emitted day is appended (and the
        // oldest dropped) so later trends see earlier forecasts instead
        // of only the observed history.
        let mut recent_temperature = input.history.temperature.clone();
        let mut recent_humidity = input.history.humidity.clone();
        let mut recent_wind = input.history.wind_speed.clone();
        let mut recent_precipitation = input.history.precipitation.clone();

        let last_temperature = last_or_zero(&input.history.temperature);
        let last_humidity = last_or_zero(&input.history.humidity);
        let last_wind = last_or_zero(&input.history.wind_speed);
        let last_precipitation = last_or_zero(&input.history.precipitation);

        let confidence = calculate_confidence(input);
        let today = Utc::now().date_naive();

        for day in 1..=input.days_ahead {
            let factors = ForecastFactors {
                temperature: last_temperature
                    + calculate_trend(&recent_temperature) * f64::from(day),
                humidity: (last_humidity + calculate_trend(&recent_humidity) * f64::from(day))
                    .max(0.0),
                wind_speed: (last_wind + calculate_trend(&recent_wind) * f64::from(day)).max(0.0),
                precipitation: (last_precipitation
                    + calculate_trend(&recent_precipitation) * f64::from(day))
                .max(0.0),
                vegetation: input.vegetation_density,
            };

            let features = [
                factors.temperature,
                factors.humidity,
                factors.wind_speed,
                factors.precipitation,
            ];

            let mut risk_score = self.ensemble_score(&features);

            // Local site adjustments
            let vegetation_factor = input.vegetation_density / 100.0;
            let elevation_factor = (input.elevation / 1000.0).clamp(0.5, 1.5);
            risk_score = risk_score * vegetation_factor * elevation_factor;

            let recommendation = recommendation_for(
                risk_score,
                factors.temperature,
                factors.humidity,
                factors.wind_speed,
            );
            let severity = Severity::from_score(risk_score);

            let date = today
                .checked_add_days(Days::new(u64::from(day)))
                .unwrap_or(today)
                .format("%Y-%m-%d")
                .to_string();

            roll_forward(&mut recent_temperature, factors.temperature);
            roll_forward(&mut recent_humidity, factors.humidity);
            roll_forward(&mut recent_wind, factors.wind_speed);
            roll_forward(&mut recent_precipitation, factors.precipitation);

            predictions.push(DailyForecast {
                day,
                date,
                predicted_risk_score: risk_score.clamp(0.0, 100.0),
                confidence,
                factors,
                recommendation,
                severity,
            });
        }

        predictions
    }

    /// Train on the input's own history and forecast, converting every
    /// failure into a response value. This is the whole contract the
    /// request boundary needs.
    pub fn forecast(&mut self, input: &FirePredictionInput) -> ForecastResponse {
        if !(1..=7).contains(&input.days_ahead) {
            return ForecastResponse::failure(format!(
                "daysAhead must be between 1 and 7, got {}",
                input.days_ahead
            ));
        }
        if let Err(error) = input.history.check_lengths() {
            return ForecastResponse::failure(error);
        }

        self.train(&input.history);
        let predictions = self.predict_next_days(input);

        if predictions
            .iter()
            .any(|p| !p.predicted_risk_score.is_finite() || !p.confidence.is_finite())
        {
            return ForecastResponse::failure("forecast produced non-finite values");
        }

        ForecastResponse {
            success: true,
            predictions,
            error: None,
        }
    }

    /// Weighted average over the trained models, or the neutral score
    fn ensemble_score(&self, features: &[f64]) -> f64 {
        let mut score = 0.0;
        let mut total_weight = 0.0;

        if self.linear_trained {
            score += self.linear.predict(features) * LINEAR_WEIGHT;
            total_weight += LINEAR_WEIGHT;
        }
        if self.forest_trained {
            score += self.forest.predict(features) * FOREST_WEIGHT;
            total_weight += FOREST_WEIGHT;
        }
        if self.neural_trained {
            score += self.neural.predict(features) * NEURAL_WEIGHT;
            total_weight += NEURAL_WEIGHT;
        }

        if total_weight == 0.0 {
            NEUTRAL_SCORE
        } else {
            score / total_weight
        }
    }
}

impl Default for FireRiskPredictor {
    fn default() -> Self {
        Self::new()
    }
}

/// Confidence from history depth and weather stability, 0.5-0.95.
///
/// More observed days raise confidence (capped at +0.3); volatile
/// temperature and humidity lower it through the stability term.
fn calculate_confidence(input: &FirePredictionInput) -> f64 {
    let mut confidence = 0.5;

    let data_points = input.history.len() as f64;
    confidence += (data_points / 100.0).min(0.3);

    let temp_variance = crate::models::variance(&input.history.temperature);
    let humidity_variance = crate::models::variance(&input.history.humidity);
    let stability = 1.0 - (temp_variance + humidity_variance) / 200.0;
    confidence += stability * 0.2;

    confidence.clamp(0.5, 0.95)
}

/// Per-day linear trend over the last [`TREND_WINDOW`] values.
///
/// Position-weighted estimator: values are centered on their window
/// mean, weighted by 1-based position, summed, divided by the window's
/// triangular number, then normalized to a daily rate.
pub fn calculate_trend(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let recent = &data[data.len().saturating_sub(TREND_WINDOW)..];
    let n = recent.len() as f64;
    let mean = recent.iter().sum::<f64>() / n;
    let weighted_sum: f64 = recent
        .iter()
        .enumerate()
        .map(|(i, v)| (i as f64 + 1.0) * (v - mean))
        .sum();
    let trend = weighted_sum / (n * (n + 1.0) / 2.0);
    trend / TREND_WINDOW as f64
}

/// Append a forecast value and drop the oldest observation
fn roll_forward(series: &mut Vec<f64>, value: f64) {
    series.push(value);
    series.remove(0);
}

fn last_or_zero(series: &[f64]) -> f64 {
    series.last().copied().unwrap_or_default()
}

fn recommendation_for(risk_score: f64, temperature: f64, humidity: f64, wind_speed: f64) -> String {
    if risk_score > 80.0 {
        format!(
            "CRITICAL ALERT: Very high fire risk. Temp: {:.1}°C, Humidity: {:.1}%, Wind: {:.1} km/h. Avoid any activity involving fire.",
            temperature, humidity, wind_speed
        )
    } else if risk_score > 60.0 {
        "ALERT: High fire risk. Stay vigilant and keep safety equipment ready.".to_owned()
    } else if risk_score > 40.0 {
        "CAUTION: Moderate risk. Monitor weather conditions.".to_owned()
    } else {
        "Low risk. Conditions are favorable.".to_owned()
    }
}
