//! Reference locations and great-circle nearest-neighbour resolution.
//!
//! Casualty and vulnerability estimates are grounded in a small curated
//! table of reference locations rather than a live municipal database. The
//! table is read-only and small enough that nearest-location queries are a
//! linear scan.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Mean Earth radius in kilometers, used for haversine distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A curated reference location with population and vulnerability metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLocation {
    /// Stable lookup key (kebab-case).
    pub key: String,
    /// Display name.
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub population: u64,
    pub area_km2: f64,
    /// People per km², as curated (not recomputed from population/area).
    pub population_density: f64,
    /// Infrastructure quality, 0-100.
    pub infrastructure_score: f64,
    /// Emergency preparedness, 0-100.
    pub emergency_preparedness: f64,
    pub hospitals: u32,
    pub shelters: u32,
    pub evacuation_routes: u32,
    /// Exposure to regional natural hazards, 0-100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geographic_risk: Option<f64>,
    pub coastal: bool,
    pub elevation_m: f64,
    /// Building stock, when curated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buildings: Option<u64>,
}

#[allow(clippy::too_many_arguments)]
fn entry(
    key: &str,
    name: &str,
    lat: f64,
    lng: f64,
    population: u64,
    area_km2: f64,
    population_density: f64,
    infrastructure_score: f64,
    emergency_preparedness: f64,
    hospitals: u32,
    shelters: u32,
    evacuation_routes: u32,
    geographic_risk: f64,
    coastal: bool,
    elevation_m: f64,
) -> ReferenceLocation {
    ReferenceLocation {
        key: key.to_string(),
        name: name.to_string(),
        lat,
        lng,
        population,
        area_km2,
        population_density,
        infrastructure_score,
        emergency_preparedness,
        hospitals,
        shelters,
        evacuation_routes,
        geographic_risk: Some(geographic_risk),
        coastal,
        elevation_m,
        buildings: None,
    }
}

/// The fixed reference-location table.
static REFERENCE_LOCATIONS: Lazy<Vec<ReferenceLocation>> = Lazy::new(|| {
    vec![
        entry(
            "new-york", "New York City", 40.7128, -74.0060,
            8_336_817, 778.2, 10_715.0, 85.0, 78.0, 62, 45, 12, 65.0, true, 10.0,
        ),
        entry(
            "london", "London", 51.5074, -0.1278,
            9_648_110, 1572.0, 6140.0, 88.0, 82.0, 78, 52, 15, 45.0, false, 35.0,
        ),
        entry(
            "tokyo", "Tokyo", 35.6762, 139.6503,
            37_400_068, 2194.0, 17_045.0, 92.0, 95.0, 156, 89, 28, 85.0, true, 40.0,
        ),
        entry(
            "paris", "Paris", 48.8566, 2.3522,
            2_161_000, 105.4, 20_500.0, 86.0, 75.0, 45, 32, 8, 35.0, false, 35.0,
        ),
        entry(
            "sydney", "Sydney", -33.8688, 151.2093,
            5_312_163, 12_368.0, 430.0, 84.0, 80.0, 38, 28, 18, 55.0, true, 58.0,
        ),
    ]
});

/// Access the full reference-location table.
pub fn reference_locations() -> &'static [ReferenceLocation] {
    &REFERENCE_LOCATIONS
}

/// Look up a reference location by its key.
///
/// # Errors
///
/// Returns [`Error::UnknownLocation`] when the key is not in the table.
/// Unknown keys are never silently substituted with a default entry.
pub fn find_by_key(key: &str) -> Result<&'static ReferenceLocation> {
    REFERENCE_LOCATIONS
        .iter()
        .find(|location| location.key == key)
        .ok_or_else(|| Error::UnknownLocation {
            key: key.to_string(),
        })
}

/// Great-circle distance between two points in kilometers (haversine).
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlng = (lng2 - lng1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Find the reference location nearest to a coordinate pair.
///
/// Linear scan over the table; ties resolve to the first entry at the
/// minimum distance.
///
/// # Errors
///
/// Returns [`Error::NoReferenceData`] when the table is empty.
pub fn nearest<'a>(lat: f64, lng: f64, table: &'a [ReferenceLocation]) -> Result<&'a ReferenceLocation> {
    let mut best: Option<(&ReferenceLocation, f64)> = None;
    for location in table {
        let distance = haversine_km(lat, lng, location.lat, location.lng);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((location, distance)),
        }
    }
    best.map(|(location, _)| location).ok_or(Error::NoReferenceData)
}

/// Find the nearest entry in the curated table.
pub fn nearest_reference(lat: f64, lng: f64) -> Result<&'static ReferenceLocation> {
    nearest(lat, lng, &REFERENCE_LOCATIONS)
}
