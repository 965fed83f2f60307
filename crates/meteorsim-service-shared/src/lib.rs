//! Shared infrastructure for MeteorSim HTTP services.
//!
//! This crate provides the HTTP glue used by the service binaries:
//!
//! - [`AppState`]: pre-built impact engine shared across handlers
//! - [`ProblemDetails`]: RFC 9457 Problem Details for error responses
//! - [`ServiceResponse`]: wrapper for successful responses
//! - [`logging`]: structured logging setup
//! - [`health`]: liveness/readiness probe handlers
//! - Request types with validation for each endpoint
//!
//! All business logic lives in `meteorsim-lib`; handlers parse and validate
//! requests, call the engine, and format responses.

#![deny(warnings)]

mod health;
pub mod logging;
mod problem;
mod request;
mod response;
mod state;

pub use health::{health_live, health_ready, HealthStatus};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use problem::{
    from_engine_error, ProblemDetails, PROBLEM_INTERNAL_ERROR, PROBLEM_INVALID_REQUEST,
    PROBLEM_MALFORMED_UPSTREAM, PROBLEM_UNKNOWN_LOCATION, PROBLEM_UPSTREAM_UNAVAILABLE,
};
pub use request::{LocationRiskRequest, SimulateRequest, Validate};
pub use response::ServiceResponse;
pub use state::AppState;
