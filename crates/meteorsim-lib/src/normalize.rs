//! Normalization from request fields or catalog records into validated
//! [`ImpactParameters`].
//!
//! This is the single place where defaults are substituted for *missing*
//! fields. Out-of-domain values (non-positive diameter, negative velocity)
//! are never defaulted away; they fail in `ImpactParameters::new`.
//!
//! Defaults:
//!
//! | field         | source                                 | default | applied when          |
//! |---------------|----------------------------------------|---------|-----------------------|
//! | diameter_m    | mean of meters estimated min/max       | 100.0   | estimate absent       |
//! | velocity_km_s | first close-approach relative velocity | 20.0    | absent or unparseable |
//! | density_kg_m3 | (catalog carries no density)           | 2600.0  | always                |
//! | angle_deg     | (catalog carries no angle)             | 45.0    | always                |

use serde::{Deserialize, Serialize};

use crate::catalog::NeoRecord;
use crate::error::Result;
use crate::physics::{constants, ImpactParameters};

/// Diameter assumed when a catalog record carries no size estimate (m).
pub const DEFAULT_DIAMETER_M: f64 = 100.0;

/// Velocity assumed when no close-approach velocity is available (km/s).
/// Typical Earth-impact velocities run 12-25 km/s.
pub const FALLBACK_VELOCITY_KM_S: f64 = 20.0;

/// Condensed view of a record's first close approach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApproachSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub velocity_km_s: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub miss_distance_km: Option<f64>,
}

/// Normalize a catalog record into impact parameters.
///
/// # Errors
///
/// Returns [`crate::error::Error::InvalidParameter`] when the record's
/// stated values are out of domain (for example a non-positive diameter
/// estimate) - such values are never silently clamped.
pub fn parameters_from_record(record: &NeoRecord) -> Result<ImpactParameters> {
    let diameter_m = record.average_diameter_m().unwrap_or(DEFAULT_DIAMETER_M);
    let velocity_km_s = record
        .first_approach()
        .and_then(|approach| approach.velocity_km_s())
        .unwrap_or(FALLBACK_VELOCITY_KM_S);

    ImpactParameters::new(
        diameter_m,
        velocity_km_s,
        constants::DEFAULT_DENSITY_KG_M3,
        constants::DEFAULT_IMPACT_ANGLE_DEG,
    )
}

/// Normalize explicit request fields into impact parameters, applying the
/// same defaults as catalog normalization for absent fields.
pub fn parameters_from_request(
    diameter_m: Option<f64>,
    velocity_km_s: Option<f64>,
    density_kg_m3: Option<f64>,
    angle_deg: Option<f64>,
) -> Result<ImpactParameters> {
    ImpactParameters::new(
        diameter_m.unwrap_or(DEFAULT_DIAMETER_M),
        velocity_km_s.unwrap_or(FALLBACK_VELOCITY_KM_S),
        density_kg_m3.unwrap_or(constants::DEFAULT_DENSITY_KG_M3),
        angle_deg.unwrap_or(constants::DEFAULT_IMPACT_ANGLE_DEG),
    )
}

/// Condense a record's first close approach for echoing to callers.
pub fn approach_summary(record: &NeoRecord) -> ApproachSummary {
    match record.first_approach() {
        Some(approach) => ApproachSummary {
            date: approach.close_approach_date.clone(),
            velocity_km_s: approach.velocity_km_s(),
            miss_distance_km: approach.miss_distance_km(),
        },
        None => ApproachSummary {
            date: None,
            velocity_km_s: None,
            miss_distance_km: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::NeoRecord;

    fn record(raw: serde_json::Value) -> NeoRecord {
        NeoRecord::from_raw(&raw).unwrap()
    }

    #[test]
    fn uses_mean_diameter_and_first_approach_velocity() {
        let record = record(serde_json::json!({
            "id": "1",
            "estimated_diameter": {
                "meters": { "estimated_diameter_min": 80.0, "estimated_diameter_max": 120.0 }
            },
            "close_approach_data": [
                { "relative_velocity": { "kilometers_per_second": "17.5" } },
                { "relative_velocity": { "kilometers_per_second": "99.0" } }
            ]
        }));

        let params = parameters_from_record(&record).unwrap();
        assert_eq!(params.diameter_m, 100.0);
        assert_eq!(params.velocity_km_s, 17.5);
        assert_eq!(params.density_kg_m3, constants::DEFAULT_DENSITY_KG_M3);
        assert_eq!(params.angle_deg, constants::DEFAULT_IMPACT_ANGLE_DEG);
    }

    #[test]
    fn defaults_absent_diameter() {
        let record = record(serde_json::json!({ "id": "2" }));
        let params = parameters_from_record(&record).unwrap();
        assert_eq!(params.diameter_m, DEFAULT_DIAMETER_M);
    }

    #[test]
    fn defaults_absent_or_unparseable_velocity() {
        let record = record(serde_json::json!({
            "id": "3",
            "close_approach_data": [
                { "relative_velocity": { "kilometers_per_second": "not-a-number" } }
            ]
        }));
        let params = parameters_from_record(&record).unwrap();
        assert_eq!(params.velocity_km_s, FALLBACK_VELOCITY_KM_S);
    }

    #[test]
    fn out_of_domain_diameter_is_never_defaulted() {
        let record = record(serde_json::json!({
            "id": "4",
            "estimated_diameter": {
                "meters": { "estimated_diameter_min": -10.0, "estimated_diameter_max": -2.0 }
            }
        }));
        assert!(parameters_from_record(&record).is_err());
    }

    #[test]
    fn request_normalization_applies_same_defaults() {
        let params = parameters_from_request(None, None, None, None).unwrap();
        assert_eq!(params.diameter_m, DEFAULT_DIAMETER_M);
        assert_eq!(params.velocity_km_s, FALLBACK_VELOCITY_KM_S);

        let explicit = parameters_from_request(Some(250.0), Some(12.0), Some(3000.0), Some(30.0))
            .unwrap();
        assert_eq!(explicit.diameter_m, 250.0);
        assert_eq!(explicit.velocity_km_s, 12.0);
        assert_eq!(explicit.density_kg_m3, 3000.0);
        assert_eq!(explicit.angle_deg, 30.0);
    }

    #[test]
    fn request_normalization_rejects_out_of_domain_values() {
        assert!(parameters_from_request(Some(0.0), None, None, None).is_err());
        assert!(parameters_from_request(None, Some(-3.0), None, None).is_err());
    }

    #[test]
    fn approach_summary_condenses_first_record() {
        let record = record(serde_json::json!({
            "id": "5",
            "close_approach_data": [
                {
                    "close_approach_date": "2027-01-02",
                    "relative_velocity": { "kilometers_per_second": "8.5" },
                    "miss_distance": { "kilometers": "1200000.0" }
                }
            ]
        }));
        let summary = approach_summary(&record);

        assert_eq!(summary.date.as_deref(), Some("2027-01-02"));
        assert_eq!(summary.velocity_km_s, Some(8.5));
        assert_eq!(summary.miss_distance_km, Some(1_200_000.0));
    }

    #[test]
    fn approach_summary_is_empty_without_approaches() {
        let record = record(serde_json::json!({ "id": "6" }));
        let summary = approach_summary(&record);
        assert_eq!(summary, ApproachSummary { date: None, velocity_km_s: None, miss_distance_km: None });
    }
}
