//! Environmental Risk Forecasting Core
//!
//! The computational core of a community environmental-incident
//! reporting platform: it scores individual hazard observations and
//! forecasts multi-day fire risk from short historical weather windows.
//!
//! ## Engines
//!
//! - Physical scoring: closed-form formulas per hazard kind (fire,
//!   water pollution, air pollution, drought, deforestation, flooding),
//!   stateless and total.
//! - Ensemble forecasting: linear regression, a bootstrap forest of
//!   regression stumps, and a small feed-forward network trained per
//!   request and blended into a 1-7 day forecast with severity and
//!   recommendation text.
//! - Sequence forecasting: a hand-rolled LSTM ensemble over a single
//!   series, as an alternative forecaster.
//!
//! All computation is synchronous and CPU-bound; randomness (weight
//! initialization, bootstrap sampling) comes from injectable, seedable
//! sources so outputs can be pinned in tests.

pub mod lstm;
pub mod models;
pub mod physics;
pub mod predictor;
pub mod synthetic;

// Re-export the scorer surface
pub use physics::{occurrence_risk, occurrence_risk_from_json, HazardParameters, Vegetation};

// Re-export the forecasting surface
pub use predictor::{
    DailyForecast, FirePredictionInput, FireRiskPredictor, ForecastResponse, HistoricalSeries,
    Severity,
};

pub use lstm::{LstmConfig, LstmEnsemble, LstmPredictor};
pub use synthetic::synthetic_history;
