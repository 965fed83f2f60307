//! MeteorSim impact assessment HTTP service.
//!
//! # Endpoints
//!
//! - `GET  /api/v1/physics/asteroid?asteroid_id=` - physics for a catalog object
//! - `POST /api/v1/impact/simulate` - explicit-parameter impact simulation
//! - `GET  /api/v1/neo/hazardous` - hazardous objects over the default window
//! - `POST /api/v1/risk/location` - location vulnerability assessment
//! - `GET  /api/v1/locations` - reference location table dump
//! - `GET  /health/live`, `GET /health/ready` - probes
//!
//! Handlers are thin: parse, validate, dispatch to `meteorsim-lib` (via
//! `spawn_blocking` for anything that may touch the upstream catalog), and
//! format either a `ServiceResponse` or an RFC 9457 `ProblemDetails`.

#![deny(warnings)]

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use meteorsim_lib::{
    HazardousReport, ImpactEngine, LocationRiskReport, ObjectPhysics, ReferenceLocation,
    Result as EngineResult, SimulationOutcome, SimulationRequest, TargetLocation,
};
use meteorsim_service_shared::{
    from_engine_error, health_live, health_ready, AppState, LocationRiskRequest, ProblemDetails,
    ServiceResponse, SimulateRequest, Validate,
};

/// HTTP response: either a wrapped success payload or a problem document.
#[derive(Debug)]
enum ApiResponse<T> {
    Success(ServiceResponse<T>),
    Error(ProblemDetails),
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiResponse::Success(data) => (StatusCode::OK, Json(data)).into_response(),
            ApiResponse::Error(problem) => problem.into_response(),
        }
    }
}

/// Build the service router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/physics/asteroid", get(physics_handler))
        .route("/api/v1/impact/simulate", post(simulate_handler))
        .route("/api/v1/neo/hazardous", get(hazardous_handler))
        .route("/api/v1/risk/location", post(risk_handler))
        .route("/api/v1/locations", get(locations_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Query string for the physics endpoint.
#[derive(Debug, Deserialize)]
struct PhysicsQuery {
    asteroid_id: Option<String>,
}

/// Reference table dump payload.
#[derive(Debug, Serialize)]
struct LocationsResponse {
    count: usize,
    locations: Vec<ReferenceLocation>,
}

/// Run a blocking engine call on the blocking pool and map both engine and
/// join failures onto problem documents.
async fn run_engine<T, F>(engine: Arc<ImpactEngine>, request_id: &str, call: F) -> ApiResponse<T>
where
    T: Send + 'static,
    F: FnOnce(&ImpactEngine) -> EngineResult<T> + Send + 'static,
{
    let joined = tokio::task::spawn_blocking(move || call(&engine)).await;
    match joined {
        Ok(Ok(value)) => ApiResponse::Success(ServiceResponse::new(value)),
        Ok(Err(err)) => ApiResponse::Error(from_engine_error(&err, request_id)),
        Err(join_err) => ApiResponse::Error(ProblemDetails::internal_error(
            format!("engine task failed: {join_err}"),
            request_id,
        )),
    }
}

/// Handle `GET /api/v1/physics/asteroid`.
async fn physics_handler(
    State(state): State<AppState>,
    Query(query): Query<PhysicsQuery>,
) -> ApiResponse<ObjectPhysics> {
    let request_id = generate_request_id();

    let Some(asteroid_id) = query.asteroid_id.filter(|id| !id.trim().is_empty()) else {
        return ApiResponse::Error(ProblemDetails::bad_request(
            "Provide the 'asteroid_id' query parameter",
            &request_id,
        ));
    };

    info!(request_id = %request_id, asteroid_id = %asteroid_id, "handling physics request");

    run_engine(state.engine_arc(), &request_id, move |engine| {
        engine.object_physics(&asteroid_id)
    })
    .await
}

/// Handle `POST /api/v1/impact/simulate`.
async fn simulate_handler(
    State(state): State<AppState>,
    Json(request): Json<SimulateRequest>,
) -> ApiResponse<SimulationOutcome> {
    let request_id = generate_request_id();

    if let Err(problem) = request.validate(&request_id) {
        return ApiResponse::Error(*problem);
    }

    let target = match (&request.location_key, request.lat, request.lng) {
        (Some(key), _, _) if !key.trim().is_empty() => TargetLocation::Key(key.clone()),
        (_, Some(lat), Some(lng)) => TargetLocation::Coordinates { lat, lng },
        _ => {
            return ApiResponse::Error(ProblemDetails::bad_request(
                "Provide either 'location_key' or both 'lat' and 'lng'",
                &request_id,
            ));
        }
    };

    info!(
        request_id = %request_id,
        diameter_m = ?request.diameter_m,
        velocity_km_s = ?request.velocity_km_s,
        "handling simulate request"
    );

    let simulation = SimulationRequest {
        diameter_m: request.diameter_m,
        velocity_km_s: request.velocity_km_s,
        density_kg_m3: request.density_kg_m3,
        angle_deg: request.angle_deg,
        target,
    };

    run_engine(state.engine_arc(), &request_id, move |engine| {
        engine.simulate(&simulation)
    })
    .await
}

/// Handle `GET /api/v1/neo/hazardous`.
async fn hazardous_handler(State(state): State<AppState>) -> ApiResponse<HazardousReport> {
    let request_id = generate_request_id();
    info!(request_id = %request_id, "handling hazardous listing request");

    run_engine(state.engine_arc(), &request_id, |engine| {
        engine.hazardous_objects()
    })
    .await
}

/// Handle `POST /api/v1/risk/location`.
async fn risk_handler(
    State(state): State<AppState>,
    Json(request): Json<LocationRiskRequest>,
) -> ApiResponse<LocationRiskReport> {
    let request_id = generate_request_id();

    if let Err(problem) = request.validate(&request_id) {
        return ApiResponse::Error(*problem);
    }

    info!(
        request_id = %request_id,
        location_key = %request.location_key,
        diameter_m = request.diameter_m,
        "handling location risk request"
    );

    run_engine(state.engine_arc(), &request_id, move |engine| {
        engine.location_risk(&request.location_key, request.diameter_m)
    })
    .await
}

/// Handle `GET /api/v1/locations`.
async fn locations_handler(State(state): State<AppState>) -> ApiResponse<LocationsResponse> {
    let locations = state.engine().reference_locations().to_vec();
    ApiResponse::Success(ServiceResponse::new(LocationsResponse {
        count: locations.len(),
        locations,
    }))
}

/// Generate a unique request ID for tracing.
fn generate_request_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();

    format!("req-{:x}", timestamp)
}
