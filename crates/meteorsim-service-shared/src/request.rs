//! Request types and validation for HTTP endpoints.

use serde::{Deserialize, Serialize};

use crate::ProblemDetails;

/// Validation trait for request types.
///
/// Implementations check field-level constraints and return a
/// `ProblemDetails` for invalid input. Returns a boxed problem to avoid
/// large `Result::Err` variants.
pub trait Validate {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>>;
}

/// Request for an explicit-parameter impact simulation.
///
/// Absent physical fields are filled in by the engine's normalization
/// layer; present fields must be in domain. The target is either a
/// reference-location key or a raw coordinate pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulateRequest {
    /// Projectile diameter in meters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diameter_m: Option<f64>,

    /// Impact velocity in km/s.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub velocity_km_s: Option<f64>,

    /// Bulk density in kg/m³.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub density_kg_m3: Option<f64>,

    /// Impact angle in degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle_deg: Option<f64>,

    /// Reference-location key (mutually exclusive with lat/lng).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_key: Option<String>,

    /// Impact latitude.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,

    /// Impact longitude.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

impl Validate for SimulateRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        if let Some(diameter) = self.diameter_m {
            if !diameter.is_finite() || diameter <= 0.0 {
                return Err(Box::new(ProblemDetails::bad_request(
                    "The 'diameter_m' field must be a positive number",
                    request_id,
                )));
            }
        }

        if let Some(velocity) = self.velocity_km_s {
            if !velocity.is_finite() || velocity < 0.0 {
                return Err(Box::new(ProblemDetails::bad_request(
                    "The 'velocity_km_s' field must be a non-negative number",
                    request_id,
                )));
            }
        }

        if let Some(density) = self.density_kg_m3 {
            if !density.is_finite() || density <= 0.0 {
                return Err(Box::new(ProblemDetails::bad_request(
                    "The 'density_kg_m3' field must be a positive number",
                    request_id,
                )));
            }
        }

        let has_key = self
            .location_key
            .as_deref()
            .map(|key| !key.trim().is_empty())
            .unwrap_or(false);
        let has_coordinates = self.lat.is_some() && self.lng.is_some();

        if !has_key && !has_coordinates {
            return Err(Box::new(ProblemDetails::bad_request(
                "Provide either 'location_key' or both 'lat' and 'lng'",
                request_id,
            )));
        }

        if let Some(lat) = self.lat {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(Box::new(ProblemDetails::bad_request(
                    "The 'lat' field must be between -90 and 90",
                    request_id,
                )));
            }
        }

        if let Some(lng) = self.lng {
            if !(-180.0..=180.0).contains(&lng) {
                return Err(Box::new(ProblemDetails::bad_request(
                    "The 'lng' field must be between -180 and 180",
                    request_id,
                )));
            }
        }

        Ok(())
    }
}

/// Request for a location vulnerability assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationRiskRequest {
    /// Reference-location key.
    pub location_key: String,

    /// Hypothetical impactor diameter in meters.
    pub diameter_m: f64,
}

impl Validate for LocationRiskRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        if self.location_key.trim().is_empty() {
            return Err(Box::new(ProblemDetails::bad_request(
                "The 'location_key' field is required and cannot be empty",
                request_id,
            )));
        }

        if !self.diameter_m.is_finite() || self.diameter_m <= 0.0 {
            return Err(Box::new(ProblemDetails::bad_request(
                "The 'diameter_m' field must be a positive number",
                request_id,
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulate_request() -> SimulateRequest {
        SimulateRequest {
            diameter_m: Some(100.0),
            velocity_km_s: Some(20.0),
            density_kg_m3: None,
            angle_deg: None,
            location_key: Some("new-york".to_string()),
            lat: None,
            lng: None,
        }
    }

    #[test]
    fn simulate_request_valid() {
        assert!(simulate_request().validate("test").is_ok());
    }

    #[test]
    fn simulate_request_rejects_non_positive_diameter() {
        let mut request = simulate_request();
        request.diameter_m = Some(0.0);
        let err = request.validate("test").unwrap_err();
        assert!(err.detail.as_deref().unwrap().contains("'diameter_m'"));
    }

    #[test]
    fn simulate_request_rejects_negative_velocity() {
        let mut request = simulate_request();
        request.velocity_km_s = Some(-2.0);
        let err = request.validate("test").unwrap_err();
        assert!(err.detail.as_deref().unwrap().contains("'velocity_km_s'"));
    }

    #[test]
    fn simulate_request_requires_a_target() {
        let mut request = simulate_request();
        request.location_key = None;
        let err = request.validate("test").unwrap_err();
        assert!(err.detail.as_deref().unwrap().contains("location_key"));
    }

    #[test]
    fn simulate_request_accepts_coordinates() {
        let mut request = simulate_request();
        request.location_key = None;
        request.lat = Some(40.7);
        request.lng = Some(-74.0);
        assert!(request.validate("test").is_ok());
    }

    #[test]
    fn simulate_request_rejects_out_of_range_latitude() {
        let mut request = simulate_request();
        request.location_key = None;
        request.lat = Some(120.0);
        request.lng = Some(0.0);
        let err = request.validate("test").unwrap_err();
        assert!(err.detail.as_deref().unwrap().contains("'lat'"));
    }

    #[test]
    fn simulate_request_absent_physical_fields_are_fine() {
        let request = SimulateRequest {
            diameter_m: None,
            velocity_km_s: None,
            density_kg_m3: None,
            angle_deg: None,
            location_key: Some("tokyo".to_string()),
            lat: None,
            lng: None,
        };
        assert!(request.validate("test").is_ok());
    }

    #[test]
    fn location_risk_request_valid() {
        let request = LocationRiskRequest {
            location_key: "paris".to_string(),
            diameter_m: 150.0,
        };
        assert!(request.validate("test").is_ok());
    }

    #[test]
    fn location_risk_request_rejects_empty_key() {
        let request = LocationRiskRequest {
            location_key: "  ".to_string(),
            diameter_m: 150.0,
        };
        let err = request.validate("test").unwrap_err();
        assert!(err.detail.as_deref().unwrap().contains("'location_key'"));
    }

    #[test]
    fn location_risk_request_rejects_bad_diameter() {
        let request = LocationRiskRequest {
            location_key: "paris".to_string(),
            diameter_m: f64::NAN,
        };
        assert!(request.validate("test").is_err());
    }

    #[test]
    fn simulate_request_deserialization_defaults() {
        let json = r#"{"location_key":"london"}"#;
        let request: SimulateRequest = serde_json::from_str(json).unwrap();
        assert!(request.diameter_m.is_none());
        assert!(request.validate("test").is_ok());
    }
}
