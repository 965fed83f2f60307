//! Composite risk scoring and categorical threat classification.
//!
//! Two independent scoring modes share the 0-100 scale but never mix:
//! object-risk mode scores a specific hazardous object from its size,
//! approach velocity, and miss distance; location-vulnerability mode scores
//! a reference location under a hypothetical strike. A third, size-only
//! classification ([`SizeClass`]) buckets raw diameters and is a separate
//! axis from [`ThreatLevel`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geo::ReferenceLocation;

/// Miss distance treated as zero proximity risk (km).
pub const ZERO_RISK_MISS_DISTANCE_KM: f64 = 7_480_000.0;

/// Diameter at which the size sub-score saturates (m).
pub const SIZE_SATURATION_DIAMETER_M: f64 = 1000.0;

/// Velocity at which the velocity sub-score saturates (km/s).
pub const VELOCITY_SATURATION_KM_S: f64 = 30.0;

/// Sub-score weights for object-risk mode: size, velocity, proximity.
pub const OBJECT_RISK_WEIGHTS: (f64, f64, f64) = (0.4, 0.3, 0.3);

/// Categorical threat level for a scored hazardous object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThreatLevel {
    Minimal,
    Low,
    Moderate,
    High,
    Extreme,
}

impl ThreatLevel {
    /// Classify a 0-100 risk score. Lower bounds are inclusive:
    /// >= 80 EXTREME, >= 60 HIGH, >= 40 MODERATE, >= 20 LOW, else MINIMAL.
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            ThreatLevel::Extreme
        } else if score >= 60.0 {
            ThreatLevel::High
        } else if score >= 40.0 {
            ThreatLevel::Moderate
        } else if score >= 20.0 {
            ThreatLevel::Low
        } else {
            ThreatLevel::Minimal
        }
    }
}

/// Size-based classification of a raw diameter. A separate axis from
/// [`ThreatLevel`]; the two must not be conflated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SizeClass {
    MinimalThreat,
    LocalDamage,
    CityDestroyer,
    RegionalCatastrophe,
    CivilizationThreatening,
    ExtinctionLevel,
}

impl SizeClass {
    /// Classify a diameter in meters. Lower bounds are inclusive:
    /// >= 1000 EXTINCTION_LEVEL, >= 500 CIVILIZATION_THREATENING,
    /// >= 200 REGIONAL_CATASTROPHE, >= 100 CITY_DESTROYER,
    /// >= 50 LOCAL_DAMAGE, else MINIMAL_THREAT.
    pub fn from_diameter_m(diameter_m: f64) -> Self {
        if diameter_m >= 1000.0 {
            SizeClass::ExtinctionLevel
        } else if diameter_m >= 500.0 {
            SizeClass::CivilizationThreatening
        } else if diameter_m >= 200.0 {
            SizeClass::RegionalCatastrophe
        } else if diameter_m >= 100.0 {
            SizeClass::CityDestroyer
        } else if diameter_m >= 50.0 {
            SizeClass::LocalDamage
        } else {
            SizeClass::MinimalThreat
        }
    }
}

/// Inputs for object-risk mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectRiskInput {
    pub diameter_m: f64,
    pub velocity_km_s: f64,
    pub miss_distance_km: f64,
}

/// Composite risk assessment: a 0-100 score, the contributing factor
/// breakdown, and (object-risk mode only) a categorical threat level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Composite score, rounded to one decimal.
    pub risk_score: f64,
    /// Normalized 0-100 sub-score per factor name.
    pub factors: BTreeMap<String, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threat_level: Option<ThreatLevel>,
}

fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Score a specific hazardous object from size, velocity, and miss distance.
///
/// Sub-scores are clamped into [0, 100] before weighting, so out-of-range
/// numeric input never fails; only non-finite input is rejected. The stored
/// score is rounded to one decimal while the threat level is derived from
/// the unrounded value.
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] for non-finite input.
pub fn score_object_risk(input: &ObjectRiskInput) -> Result<RiskAssessment> {
    for (field, value) in [
        ("diameter_m", input.diameter_m),
        ("velocity_km_s", input.velocity_km_s),
        ("miss_distance_km", input.miss_distance_km),
    ] {
        if !value.is_finite() {
            return Err(Error::invalid_parameter(format!(
                "{field} must be finite, got {value}"
            )));
        }
    }

    let size_score = clamp_score(input.diameter_m / SIZE_SATURATION_DIAMETER_M * 100.0);
    let velocity_score = clamp_score(input.velocity_km_s / VELOCITY_SATURATION_KM_S * 100.0);
    let proximity_score =
        clamp_score(100.0 - input.miss_distance_km / ZERO_RISK_MISS_DISTANCE_KM * 100.0);

    let (size_weight, velocity_weight, proximity_weight) = OBJECT_RISK_WEIGHTS;
    let score =
        size_score * size_weight + velocity_score * velocity_weight + proximity_score * proximity_weight;

    let mut factors = BTreeMap::new();
    factors.insert("size".to_string(), size_score);
    factors.insert("velocity".to_string(), velocity_score);
    factors.insert("proximity".to_string(), proximity_score);

    Ok(RiskAssessment {
        risk_score: round_one_decimal(score),
        factors,
        threat_level: Some(ThreatLevel::from_score(score)),
    })
}

/// Score a reference location's vulnerability to a hypothetical strike.
///
/// Unweighted mean of four clamped factors: population-density pressure,
/// infrastructure vulnerability (inverse of the infrastructure score),
/// emergency preparedness, and geographic risk (50 when not curated).
pub fn score_location_vulnerability(location: &ReferenceLocation) -> RiskAssessment {
    let density_score = clamp_score(location.population_density / 200.0);
    let infrastructure_score = clamp_score(100.0 - location.infrastructure_score);
    let preparedness_score = clamp_score(location.emergency_preparedness);
    let geographic_score = clamp_score(location.geographic_risk.unwrap_or(50.0));

    let mut factors = BTreeMap::new();
    factors.insert("population_density".to_string(), density_score);
    factors.insert(
        "infrastructure_vulnerability".to_string(),
        infrastructure_score,
    );
    factors.insert("emergency_preparedness".to_string(), preparedness_score);
    factors.insert("geographic_risk".to_string(), geographic_score);

    let score = factors.values().sum::<f64>() / factors.len() as f64;

    RiskAssessment {
        risk_score: round_one_decimal(score),
        factors,
        threat_level: None,
    }
}

/// Derive emergency recommendations for a hypothetical strike of the given
/// diameter on a location.
pub fn recommendations(location: &ReferenceLocation, diameter_m: f64) -> Vec<String> {
    let mut actions = Vec::new();

    if diameter_m > 500.0 {
        actions.push("IMMEDIATE EVACUATION: City-wide evacuation required within 12 hours".to_string());
        actions.push("INTERNATIONAL AID: Request immediate international emergency assistance".to_string());
    } else if diameter_m > 200.0 {
        actions.push("MASS EVACUATION: Evacuate within 50km radius of predicted impact".to_string());
        actions.push("EMERGENCY SHELTERS: Open all available underground facilities".to_string());
    } else {
        actions.push("SELECTIVE EVACUATION: Evacuate high-risk areas and coastal zones".to_string());
        actions.push("SHELTER IN PLACE: Reinforce buildings and prepare emergency supplies".to_string());
    }

    if location.coastal {
        actions.push("TSUNAMI WARNING: Activate coastal evacuation protocols immediately".to_string());
    }

    if location.emergency_preparedness < 70.0 {
        actions.push("EMERGENCY COORDINATION: Establish unified command center".to_string());
    }

    if location.hospitals < 50 {
        actions.push(
            "MEDICAL SURGE: Request additional medical resources from neighboring regions"
                .to_string(),
        );
    }

    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::find_by_key;

    #[test]
    fn threat_level_boundaries_are_inclusive() {
        assert_eq!(ThreatLevel::from_score(80.0), ThreatLevel::Extreme);
        assert_eq!(ThreatLevel::from_score(79.99), ThreatLevel::High);
        assert_eq!(ThreatLevel::from_score(60.0), ThreatLevel::High);
        assert_eq!(ThreatLevel::from_score(59.99), ThreatLevel::Moderate);
        assert_eq!(ThreatLevel::from_score(40.0), ThreatLevel::Moderate);
        assert_eq!(ThreatLevel::from_score(20.0), ThreatLevel::Low);
        assert_eq!(ThreatLevel::from_score(19.99), ThreatLevel::Minimal);
        assert_eq!(ThreatLevel::from_score(0.0), ThreatLevel::Minimal);
    }

    #[test]
    fn size_class_boundaries_are_inclusive() {
        assert_eq!(SizeClass::from_diameter_m(1000.0), SizeClass::ExtinctionLevel);
        assert_eq!(
            SizeClass::from_diameter_m(999.9),
            SizeClass::CivilizationThreatening
        );
        assert_eq!(
            SizeClass::from_diameter_m(500.0),
            SizeClass::CivilizationThreatening
        );
        assert_eq!(
            SizeClass::from_diameter_m(200.0),
            SizeClass::RegionalCatastrophe
        );
        assert_eq!(SizeClass::from_diameter_m(199.9), SizeClass::CityDestroyer);
        assert_eq!(SizeClass::from_diameter_m(100.0), SizeClass::CityDestroyer);
        assert_eq!(SizeClass::from_diameter_m(50.0), SizeClass::LocalDamage);
        assert_eq!(SizeClass::from_diameter_m(10.0), SizeClass::MinimalThreat);
    }

    #[test]
    fn object_score_is_bounded() {
        // Everything saturated high.
        let extreme = score_object_risk(&ObjectRiskInput {
            diameter_m: 50_000.0,
            velocity_km_s: 500.0,
            miss_distance_km: 0.0,
        })
        .unwrap();
        assert_eq!(extreme.risk_score, 100.0);
        assert_eq!(extreme.threat_level, Some(ThreatLevel::Extreme));

        // Everything at the zero-risk end.
        let minimal = score_object_risk(&ObjectRiskInput {
            diameter_m: 0.0,
            velocity_km_s: 0.0,
            miss_distance_km: 1e9,
        })
        .unwrap();
        assert_eq!(minimal.risk_score, 0.0);
        assert_eq!(minimal.threat_level, Some(ThreatLevel::Minimal));
    }

    #[test]
    fn object_score_weights_factors() {
        let assessment = score_object_risk(&ObjectRiskInput {
            diameter_m: 500.0,
            velocity_km_s: 15.0,
            miss_distance_km: 3_740_000.0,
        })
        .unwrap();

        assert_eq!(assessment.factors["size"], 50.0);
        assert_eq!(assessment.factors["velocity"], 50.0);
        assert_eq!(assessment.factors["proximity"], 50.0);
        assert_eq!(assessment.risk_score, 50.0);
        assert_eq!(assessment.threat_level, Some(ThreatLevel::Moderate));
    }

    #[test]
    fn object_score_rejects_non_finite_input() {
        let err = score_object_risk(&ObjectRiskInput {
            diameter_m: f64::NAN,
            velocity_km_s: 20.0,
            miss_distance_km: 100_000.0,
        })
        .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { .. }));
    }

    #[test]
    fn location_vulnerability_matches_curated_factors() {
        let location = find_by_key("new-york").unwrap();
        let assessment = score_location_vulnerability(location);

        assert!((assessment.factors["population_density"] - 53.575).abs() < 1e-9);
        assert_eq!(assessment.factors["infrastructure_vulnerability"], 15.0);
        assert_eq!(assessment.factors["emergency_preparedness"], 78.0);
        assert_eq!(assessment.factors["geographic_risk"], 65.0);

        let mean: f64 = (53.575 + 15.0 + 78.0 + 65.0) / 4.0;
        assert_eq!(assessment.risk_score, (mean * 10.0).round() / 10.0);
        assert!(assessment.threat_level.is_none());
    }

    #[test]
    fn location_vulnerability_defaults_missing_geographic_risk() {
        let mut location = find_by_key("paris").unwrap().clone();
        location.geographic_risk = None;
        let assessment = score_location_vulnerability(&location);

        assert_eq!(assessment.factors["geographic_risk"], 50.0);
    }

    #[test]
    fn recommendations_scale_with_size() {
        let coastal = find_by_key("sydney").unwrap();

        let small = recommendations(coastal, 100.0);
        assert!(small[0].starts_with("SELECTIVE EVACUATION"));

        let medium = recommendations(coastal, 300.0);
        assert!(medium[0].starts_with("MASS EVACUATION"));

        let large = recommendations(coastal, 800.0);
        assert!(large[0].starts_with("IMMEDIATE EVACUATION"));
    }

    #[test]
    fn recommendations_include_tsunami_guidance_for_coastal() {
        let coastal = find_by_key("tokyo").unwrap();
        let inland = find_by_key("london").unwrap();

        assert!(recommendations(coastal, 100.0)
            .iter()
            .any(|action| action.starts_with("TSUNAMI WARNING")));
        assert!(!recommendations(inland, 100.0)
            .iter()
            .any(|action| action.starts_with("TSUNAMI WARNING")));
    }

    #[test]
    fn recommendations_flag_low_preparedness_and_hospitals() {
        let location = find_by_key("paris").unwrap();
        let actions = recommendations(location, 100.0);

        // Paris: hospitals 45 < 50, preparedness 75 >= 70.
        assert!(actions
            .iter()
            .any(|action| action.starts_with("MEDICAL SURGE")));
        assert!(!actions
            .iter()
            .any(|action| action.starts_with("EMERGENCY COORDINATION")));
    }

    #[test]
    fn threat_level_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&ThreatLevel::Extreme).unwrap();
        assert_eq!(json, "\"EXTREME\"");
        let json = serde_json::to_string(&SizeClass::RegionalCatastrophe).unwrap();
        assert_eq!(json, "\"REGIONAL_CATASTROPHE\"");
    }
}
