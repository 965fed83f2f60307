//! Response wrapper for successful HTTP responses.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Wrapper for successful responses, mirroring `ProblemDetails` on the
/// error side so every response body names its content type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceResponse<T> {
    /// The actual response payload, flattened to the top level.
    #[serde(flatten)]
    pub data: T,

    /// Content type for this response.
    pub content_type: String,
}

impl<T> ServiceResponse<T> {
    /// Wrap a payload with the default JSON content type.
    pub fn new(data: T) -> Self {
        Self {
            data,
            content_type: "application/json".to_string(),
        }
    }
}

impl<T> From<T> for ServiceResponse<T> {
    fn from(data: T) -> Self {
        Self::new(data)
    }
}

impl<T: Serialize> IntoResponse for ServiceResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Serialize)]
    struct Payload {
        count: usize,
    }

    #[test]
    fn payload_is_flattened() {
        let response = ServiceResponse::new(Payload { count: 3 });
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("\"count\":3"));
        assert!(json.contains("\"content_type\":\"application/json\""));
        assert!(!json.contains("\"data\":{"));
    }

    #[test]
    fn from_wraps_payload() {
        let response: ServiceResponse<Payload> = Payload { count: 1 }.into();
        assert_eq!(response.content_type, "application/json");
    }
}
