//! MeteorSim library entry points.
//!
//! This crate implements the asteroid impact assessment engine: unit-aware
//! impact physics, population-grounded casualty estimation, nearest
//! reference-location resolution, survival-zone derivation, composite risk
//! scoring, short-TTL memoization of catalog lookups, and the normalization
//! layer that turns catalog records or request fields into validated
//! parameters. Higher-level consumers (CLI, HTTP service) should depend on
//! the types exported here instead of reimplementing behavior.

#![deny(warnings)]

pub mod cache;
pub mod casualty;
pub mod catalog;
pub mod engine;
pub mod enrich;
pub mod error;
pub mod geo;
pub mod normalize;
pub mod physics;
pub mod risk;
pub mod zones;

pub use cache::{Clock, SystemClock, TtlCache};
pub use casualty::{estimate_casualties, CasualtyEstimate};
pub use catalog::{CatalogClient, NeoFeed, NeoRecord};
pub use engine::{
    EngineConfig, HazardousObject, HazardousReport, ImpactEngine, LocationRiskReport,
    ObjectPhysics, SimulationOutcome, SimulationRequest, TargetLocation,
};
pub use enrich::{extract_crater_diameter_m, BriefingContext, BriefingProvider, CraterLookup};
pub use error::{Error, Result};
pub use geo::{
    find_by_key, haversine_km, nearest, nearest_reference, reference_locations, ReferenceLocation,
};
pub use normalize::{
    approach_summary, parameters_from_record, parameters_from_request, ApproachSummary,
};
pub use physics::{compute_impact, ImpactParameters, PhysicsResult};
pub use risk::{
    recommendations, score_location_vulnerability, score_object_risk, ObjectRiskInput,
    RiskAssessment, SizeClass, ThreatLevel,
};
pub use zones::{survival_zones, SurvivalZone, ZoneFactors};
