//! Physical scorer contract tests across all hazard kinds

use enviro_risk_core::physics::{
    occurrence_risk, occurrence_risk_from_json, Accessibility, AirQuality, HazardParameters,
    Vegetation, Visibility, WaterColor, WaterLevel,
};
use serde_json::json;

fn all_hazards() -> Vec<HazardParameters> {
    vec![
        HazardParameters::Fire {
            temperature: 38.0,
            humidity: 18.0,
            wind_speed: 42.0,
            vegetation: Vegetation::Forest,
        },
        HazardParameters::WaterPollution {
            water_level: WaterLevel::High,
            water_color: WaterColor::Green,
            temperature: Some(30.0),
            humidity: Some(40.0),
        },
        HazardParameters::AirPollution {
            air_quality: AirQuality::Poor,
            visibility: Visibility::Hazy,
            wind_speed: None,
        },
        HazardParameters::Drought {
            temperature: 41.0,
            humidity: 15.0,
            precipitation: None,
        },
        HazardParameters::Deforestation {
            vegetation_density: 35.0,
            accessibility_level: Accessibility::Medium,
        },
        HazardParameters::Flooding {
            elevation: 120.0,
            proximity_to_water: 40.0,
            slope: 3.0,
        },
    ]
}

#[test]
fn test_every_hazard_scores_in_range() {
    for params in all_hazards() {
        let score = occurrence_risk(&params);
        assert!(
            (0.0..=100.0).contains(&score),
            "{:?} scored {}",
            params,
            score
        );
    }
}

#[test]
fn test_scoring_is_pure() {
    for params in all_hazards() {
        assert_eq!(occurrence_risk(&params), occurrence_risk(&params));
    }
}

#[test]
fn test_fire_extremes_ordered() {
    let catastrophic = occurrence_risk(&HazardParameters::Fire {
        temperature: 45.0,
        humidity: 10.0,
        wind_speed: 60.0,
        vegetation: Vegetation::Forest,
    });
    let benign = occurrence_risk(&HazardParameters::Fire {
        temperature: 15.0,
        humidity: 90.0,
        wind_speed: 0.0,
        vegetation: Vegetation::Grass,
    });
    assert!(
        catastrophic > benign,
        "catastrophic {} must exceed benign {}",
        catastrophic,
        benign
    );
}

#[test]
fn test_report_boundary_accepts_all_kinds() {
    let reports = [
        (
            "fire",
            json!({"temperature": 35.0, "humidity": 25.0, "wind_speed": 20.0, "vegetation": "shrub"}),
        ),
        (
            "water_pollution",
            json!({"water_level": "high", "water_color": "brown"}),
        ),
        (
            "air_pollution",
            json!({"air_quality": "moderate", "visibility": "hazy", "wind_speed": 8.0}),
        ),
        ("drought", json!({"temperature": 33.0, "humidity": 30.0})),
        (
            "deforestation",
            json!({"vegetation_density": 70.0, "accessibility_level": "high"}),
        ),
        (
            "flooding",
            json!({"elevation": 50.0, "proximity_to_water": 100.0, "slope": 5.0}),
        ),
    ];

    for (kind, params) in reports {
        let score = occurrence_risk_from_json(kind, &params);
        assert!(
            (0.0..=100.0).contains(&score),
            "{} scored {}",
            kind,
            score
        );
        // Optional fields were omitted in some reports above; the typed
        // formulas must still produce a non-neutral, deterministic score
        // rather than falling back to the unscorable-report default.
        assert_ne!(score, 50.0, "{} fell back to the neutral score", kind);
        assert_eq!(score, occurrence_risk_from_json(kind, &params));
    }
}

#[test]
fn test_report_boundary_unknown_kind_neutral() {
    assert_eq!(occurrence_risk_from_json("landslide", &json!({})), 50.0);
    assert_eq!(occurrence_risk_from_json("", &json!(null)), 50.0);
}
