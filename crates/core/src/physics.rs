//! Physical risk models for environmental hazards
//!
//! Hand-built scoring formulas for six hazard kinds: fire (Arrhenius
//! combustion + Rothermel wind factor), water pollution (Penman
//! evaporation), air pollution (Gaussian plume dispersion), drought,
//! deforestation, and flooding. Each formula maps observation parameters
//! to a 0-100 risk score with no training and no state.

use serde::{Deserialize, Serialize};

/// Vegetation class at a fire observation site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vegetation {
    Grass,
    Shrub,
    Forest,
    Mixed,
}

impl Vegetation {
    /// Fuel load multiplier for the fire risk formula
    pub fn fuel_factor(self) -> f64 {
        match self {
            Vegetation::Grass => 0.6,
            Vegetation::Shrub => 0.8,
            Vegetation::Forest => 1.0,
            Vegetation::Mixed => 0.85,
        }
    }
}

/// Observed water level relative to the seasonal norm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaterLevel {
    Low,
    Normal,
    High,
}

/// Observed water coloration (pollution indicator)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaterColor {
    Clear,
    Cloudy,
    Brown,
    Green,
}

/// Reported ambient air quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AirQuality {
    Good,
    Moderate,
    Poor,
}

/// Reported visibility (particle concentration proxy)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Clear,
    Hazy,
    Poor,
}

/// Site accessibility (logging pressure proxy)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accessibility {
    Low,
    Medium,
    High,
}

/// Per-hazard observation parameters, tagged by hazard kind.
///
/// Matches the `{type, physicalParameters}` shape submitted by report
/// forms: the tag deserializes from the `type` field and the remaining
/// fields from the flattened parameter map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HazardParameters {
    Fire {
        /// °C, formula normalized over 15-45
        temperature: f64,
        /// %, formula normalized over 10-90 (inverted)
        humidity: f64,
        /// km/h, formula normalized over 0-60
        wind_speed: f64,
        vegetation: Vegetation,
    },
    WaterPollution {
        water_level: WaterLevel,
        water_color: WaterColor,
        temperature: Option<f64>,
        humidity: Option<f64>,
    },
    AirPollution {
        air_quality: AirQuality,
        visibility: Visibility,
        wind_speed: Option<f64>,
    },
    Drought {
        temperature: f64,
        humidity: f64,
        /// mm, defaults to 0 (no recent rainfall)
        precipitation: Option<f64>,
    },
    Deforestation {
        /// 0-100%
        vegetation_density: f64,
        accessibility_level: Accessibility,
    },
    Flooding {
        /// meters above sea level
        elevation: f64,
        /// meters to the nearest water body
        proximity_to_water: f64,
        /// degrees
        slope: f64,
    },
}

/// Neutral score returned when a hazard cannot be evaluated
pub const NEUTRAL_RISK: f64 = 50.0;

/// Activation energy for the Arrhenius combustion term (J/mol)
const ACTIVATION_ENERGY: f64 = 50_000.0;
/// Universal gas constant (J/(mol·K))
const GAS_CONSTANT: f64 = 8.314;

/// Calculate the 0-100 risk score for a single observation.
///
/// Pure and total: every parameter combination yields a finite score,
/// and malformed numeric inputs (NaN/infinite) degrade to the neutral
/// [`NEUTRAL_RISK`] instead of propagating.
pub fn occurrence_risk(params: &HazardParameters) -> f64 {
    let raw = match *params {
        HazardParameters::Fire {
            temperature,
            humidity,
            wind_speed,
            vegetation,
        } => fire_risk(temperature, humidity, wind_speed, vegetation),
        HazardParameters::WaterPollution {
            water_level,
            water_color,
            temperature,
            humidity,
        } => water_pollution_risk(water_level, water_color, temperature, humidity),
        HazardParameters::AirPollution {
            air_quality,
            visibility,
            wind_speed,
        } => air_pollution_risk(air_quality, visibility, wind_speed),
        HazardParameters::Drought {
            temperature,
            humidity,
            precipitation,
        } => drought_risk(temperature, humidity, precipitation),
        HazardParameters::Deforestation {
            vegetation_density,
            accessibility_level,
        } => deforestation_risk(vegetation_density, accessibility_level),
        HazardParameters::Flooding {
            elevation,
            proximity_to_water,
            slope,
        } => flooding_risk(elevation, proximity_to_water, slope),
    };

    if raw.is_finite() {
        raw.clamp(0.0, 100.0)
    } else {
        NEUTRAL_RISK
    }
}

/// Scorer entry point for the untyped report boundary.
///
/// Accepts the hazard kind string and the raw parameter map exactly as
/// submitted; an unknown kind or a parameter map that does not match the
/// kind's schema yields the neutral score rather than an error.
pub fn occurrence_risk_from_json(kind: &str, physical_params: &serde_json::Value) -> f64 {
    let mut tagged = match physical_params {
        serde_json::Value::Object(map) => map.clone(),
        _ => serde_json::Map::new(),
    };
    tagged.insert("type".into(), serde_json::Value::String(kind.to_owned()));

    match serde_json::from_value::<HazardParameters>(serde_json::Value::Object(tagged)) {
        Ok(params) => occurrence_risk(&params),
        Err(err) => {
            tracing::warn!("unscorable {kind} report, using neutral risk: {err}");
            NEUTRAL_RISK
        }
    }
}

/// Fire propagation risk (Arrhenius combustion + Rothermel wind factor)
fn fire_risk(temperature: f64, humidity: f64, wind_speed: f64, vegetation: Vegetation) -> f64 {
    let temp_norm = (temperature - 15.0) / 30.0;
    // Inverse: lower humidity = higher risk
    let humidity_norm = (90.0 - humidity) / 80.0;
    let wind_norm = wind_speed / 60.0;

    // Arrhenius-based combustion rate at the absolute air temperature
    let t_abs = temperature + 273.15;
    let arrhenius = (-ACTIVATION_ENERGY / (GAS_CONSTANT * t_abs)).exp();

    // Rothermel wind factor
    let wind_factor = 1.0 + 0.1 * wind_speed;

    (temp_norm * 0.3 + humidity_norm * 0.3 + wind_norm * 0.2 + arrhenius * 0.2)
        * vegetation.fuel_factor()
        * wind_factor
        * 100.0
}

/// Water quality risk (level + coloration + Penman evaporation)
fn water_pollution_risk(
    level: WaterLevel,
    color: WaterColor,
    temperature: Option<f64>,
    humidity: Option<f64>,
) -> f64 {
    let level_factor = match level {
        WaterLevel::Low => 0.3,
        WaterLevel::Normal => 0.5,
        WaterLevel::High => 0.8,
    };
    // Coloration indicates pollution; green = algal bloom
    let color_factor = match color {
        WaterColor::Clear => 0.1,
        WaterColor::Cloudy => 0.4,
        WaterColor::Brown => 0.7,
        WaterColor::Green => 0.9,
    };

    // Penman evaporation factor (affects water availability)
    let temp = temperature.unwrap_or(25.0);
    let humidity = humidity.unwrap_or(60.0);
    let penman = (temp / 40.0) * ((100.0 - humidity) / 100.0);

    (level_factor * 0.4 + color_factor * 0.4 + penman * 0.2) * 100.0
}

/// Air pollution risk (Gaussian plume: wind improves dispersion)
fn air_pollution_risk(
    quality: AirQuality,
    visibility: Visibility,
    wind_speed: Option<f64>,
) -> f64 {
    let quality_factor = match quality {
        AirQuality::Good => 0.1,
        AirQuality::Moderate => 0.5,
        AirQuality::Poor => 0.9,
    };
    let visibility_factor = match visibility {
        Visibility::Clear => 0.1,
        Visibility::Hazy => 0.5,
        Visibility::Poor => 0.9,
    };

    let wind_speed = wind_speed.unwrap_or(5.0);
    let dispersion = (wind_speed / 10.0).min(1.0);

    ((quality_factor * 0.4 + visibility_factor * 0.4) * (1.0 - dispersion * 0.3) + 0.1) * 100.0
}

/// Drought risk from temperature stress, humidity deficit, and rainfall
fn drought_risk(temperature: f64, humidity: f64, precipitation: Option<f64>) -> f64 {
    // Above 25°C increases risk
    let temp_norm = ((temperature - 25.0) / 20.0).max(0.0);
    let humidity_deficit = (100.0 - humidity) / 100.0;

    // Normalized to 100mm; less rain = higher risk
    let precip = precipitation.unwrap_or(0.0);
    let precip_factor = (1.0 - precip / 100.0).max(0.0);

    (temp_norm * 0.3 + humidity_deficit * 0.4 + precip_factor * 0.3) * 100.0
}

/// Deforestation risk from vegetation loss and site accessibility
fn deforestation_risk(vegetation_density: f64, accessibility: Accessibility) -> f64 {
    let veg_risk = (100.0 - vegetation_density) / 100.0;
    let access_factor = match accessibility {
        Accessibility::Low => 0.2,
        Accessibility::Medium => 0.5,
        Accessibility::High => 0.9,
    };

    (veg_risk * 0.6 + access_factor * 0.4) * 100.0
}

/// Flooding risk from elevation, water proximity, and terrain slope
fn flooding_risk(elevation: f64, proximity_to_water: f64, slope: f64) -> f64 {
    let elevation_risk = (1.0 - elevation / 1000.0).max(0.0);
    let proximity_risk = (1.0 - proximity_to_water / 500.0).max(0.0);
    // Flatter terrain drains worse
    let slope_risk = (1.0 - slope / 45.0).max(0.0);

    (elevation_risk * 0.3 + proximity_risk * 0.4 + slope_risk * 0.3) * 100.0
}
