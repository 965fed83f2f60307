//! RFC 9457 Problem Details for HTTP APIs.
//!
//! The mapping in [`from_engine_error`] is the only place where library
//! error kinds meet protocol status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use meteorsim_lib::Error as EngineError;

/// Problem type URI for invalid request parameters.
pub const PROBLEM_INVALID_REQUEST: &str = "/problems/invalid-request";

/// Problem type URI for unknown reference-location keys.
pub const PROBLEM_UNKNOWN_LOCATION: &str = "/problems/unknown-location";

/// Problem type URI for catalog/enrichment upstream failures.
pub const PROBLEM_UPSTREAM_UNAVAILABLE: &str = "/problems/upstream-unavailable";

/// Problem type URI for undecodable upstream records.
pub const PROBLEM_MALFORMED_UPSTREAM: &str = "/problems/malformed-upstream-data";

/// Problem type URI for internal server errors.
pub const PROBLEM_INTERNAL_ERROR: &str = "/problems/internal-error";

/// RFC 9457 Problem Details response structure.
///
/// # Example
///
/// ```
/// use meteorsim_service_shared::{ProblemDetails, PROBLEM_UNKNOWN_LOCATION};
/// use axum::http::StatusCode;
///
/// let problem = ProblemDetails::new(
///     PROBLEM_UNKNOWN_LOCATION,
///     "Unknown Location",
///     StatusCode::NOT_FOUND,
/// )
/// .with_detail("Reference location 'gotham' is not in the table")
/// .with_request_id("req-12345");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// URI reference identifying the problem type (relative).
    #[serde(rename = "type")]
    pub type_uri: String,

    /// Short, human-readable summary of the problem.
    pub title: String,

    /// HTTP status code for this problem.
    pub status: u16,

    /// Human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// URI reference identifying the specific occurrence (request ID).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl ProblemDetails {
    /// Create a new ProblemDetails with required fields.
    pub fn new(type_uri: impl Into<String>, title: impl Into<String>, status: StatusCode) -> Self {
        Self {
            type_uri: type_uri.into(),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            instance: None,
        }
    }

    /// Add a detailed explanation of this occurrence.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Add the request identifier for tracing.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.instance = Some(request_id.into());
        self
    }

    /// Create a 400 Bad Request problem for invalid input.
    pub fn bad_request(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INVALID_REQUEST,
            "Invalid Request",
            StatusCode::BAD_REQUEST,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    /// Create a 404 Not Found problem for unknown location keys.
    pub fn unknown_location(key: &str, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_UNKNOWN_LOCATION,
            "Unknown Location",
            StatusCode::NOT_FOUND,
        )
        .with_detail(format!("Reference location '{}' is not in the table", key))
        .with_request_id(request_id)
    }

    /// Create a 500 problem for an unreachable or failing upstream.
    pub fn upstream_unavailable(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_UPSTREAM_UNAVAILABLE,
            "Upstream Unavailable",
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    /// Create a 500 problem for an undecodable upstream record.
    pub fn malformed_upstream(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_MALFORMED_UPSTREAM,
            "Malformed Upstream Data",
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    /// Create a 500 Internal Server Error problem.
    pub fn internal_error(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INTERNAL_ERROR,
            "Internal Error",
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }
}

impl std::fmt::Display for ProblemDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.detail.as_deref().unwrap_or(""))
    }
}

impl std::error::Error for ProblemDetails {}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = Json(&self).into_response();
        response.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("application/problem+json"),
        );
        *response.status_mut() = status;
        response
    }
}

/// Convert engine errors to ProblemDetails.
///
/// The `request_id` is supplied by the handler since engine errors do not
/// carry one.
pub fn from_engine_error(error: &EngineError, request_id: &str) -> ProblemDetails {
    match error {
        EngineError::InvalidParameter { message } => {
            ProblemDetails::bad_request(message.clone(), request_id)
        }
        EngineError::UnknownLocation { key } => ProblemDetails::unknown_location(key, request_id),
        EngineError::UpstreamUnavailable { message } => {
            ProblemDetails::upstream_unavailable(message.clone(), request_id)
        }
        EngineError::MalformedUpstreamData { id, message } => {
            ProblemDetails::malformed_upstream(format!("record '{}': {}", id, message), request_id)
        }
        EngineError::NoReferenceData => {
            ProblemDetails::internal_error("reference location table is empty", request_id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_shape() {
        let problem = ProblemDetails::bad_request("diameter_m must be positive", "req-1");
        assert_eq!(problem.status, 400);
        assert_eq!(problem.type_uri, PROBLEM_INVALID_REQUEST);
        assert_eq!(problem.instance.as_deref(), Some("req-1"));
    }

    #[test]
    fn unknown_location_names_the_key() {
        let problem = ProblemDetails::unknown_location("gotham", "req-2");
        assert_eq!(problem.status, 404);
        assert!(problem.detail.as_deref().unwrap().contains("gotham"));
    }

    #[test]
    fn serialization_uses_type_field() {
        let problem = ProblemDetails::bad_request("nope", "req-3");
        let json = serde_json::to_string(&problem).unwrap();
        assert!(json.contains("\"type\":\"/problems/invalid-request\""));
        assert!(json.contains("\"status\":400"));
    }

    #[test]
    fn engine_error_mapping() {
        let err = EngineError::InvalidParameter {
            message: "diameter_m must be finite and positive, got -1".to_string(),
        };
        assert_eq!(from_engine_error(&err, "req").status, 400);

        let err = EngineError::UnknownLocation {
            key: "gotham".to_string(),
        };
        assert_eq!(from_engine_error(&err, "req").status, 404);

        let err = EngineError::UpstreamUnavailable {
            message: "timed out".to_string(),
        };
        let problem = from_engine_error(&err, "req");
        assert_eq!(problem.status, 500);
        assert_eq!(problem.type_uri, PROBLEM_UPSTREAM_UNAVAILABLE);

        let err = EngineError::MalformedUpstreamData {
            id: "2099942".to_string(),
            message: "missing id".to_string(),
        };
        let problem = from_engine_error(&err, "req");
        assert_eq!(problem.status, 500);
        assert_eq!(problem.type_uri, PROBLEM_MALFORMED_UPSTREAM);

        let problem = from_engine_error(&EngineError::NoReferenceData, "req");
        assert_eq!(problem.status, 500);
        assert_eq!(problem.type_uri, PROBLEM_INTERNAL_ERROR);
    }
}
