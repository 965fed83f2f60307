//! Casualty and damage estimation over a reference location.
//!
//! Zone-by-zone casualty counts come from damage-zone area, population
//! density, and a per-zone lethality fraction. Every count is capped at the
//! location's population, individually and in total. Outputs are
//! best-effort point estimates with no confidence bounds.

use serde::{Deserialize, Serialize};

use crate::geo::ReferenceLocation;
use crate::physics::PhysicsResult;

/// Lethality fraction inside the fireball radius.
pub const FIREBALL_LETHALITY: f64 = 0.95;
/// Lethality fraction inside the thermal radius.
pub const THERMAL_LETHALITY: f64 = 0.6;
/// Lethality fraction inside the shockwave radius.
pub const SHOCKWAVE_LETHALITY: f64 = 0.3;

/// Buildings per km² assumed when estimating structural losses.
pub const BUILDING_DENSITY_PER_KM2: f64 = 1000.0;
/// Building stock assumed when a location has no curated count.
pub const DEFAULT_BUILDING_STOCK: u64 = 100_000;

/// Economic damage in billions of USD per megaton of impact energy.
pub const ECONOMIC_DAMAGE_BILLION_PER_MT: f64 = 10.0;
/// Infrastructure damage percentage per megaton of impact energy.
pub const INFRASTRUCTURE_DAMAGE_PERCENT_PER_MT: f64 = 5.0;
/// Ceiling on the infrastructure damage percentage.
pub const INFRASTRUCTURE_DAMAGE_PERCENT_MAX: f64 = 90.0;

/// Per-request casualty and damage estimate. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CasualtyEstimate {
    /// Casualties inside the fireball radius.
    pub fireball_zone: u64,
    /// Casualties inside the thermal radius.
    pub thermal_zone: u64,
    /// Casualties inside the shockwave radius.
    pub shockwave_zone: u64,
    /// Combined casualties, capped at the location population.
    pub total: u64,
    /// Percentage of the population expected to survive.
    pub survival_rate_percent: f64,
    pub buildings_destroyed: u64,
    pub economic_damage_billion_usd: f64,
    pub infrastructure_damage_percent: f64,
}

fn zone_area_km2(radius_km: f64) -> f64 {
    std::f64::consts::PI * radius_km.powi(2)
}

fn zone_casualties(radius_km: f64, density: f64, lethality: f64, population: f64) -> f64 {
    (zone_area_km2(radius_km) * density * lethality).min(population)
}

/// Estimate casualties and damage for an impact at a reference location.
///
/// Population density is `population / max(area_km², 1)` to guard the
/// degenerate zero-area case. A zero-population location yields zero
/// casualties and a 100% survival rate.
pub fn estimate_casualties(
    physics: &PhysicsResult,
    location: &ReferenceLocation,
) -> CasualtyEstimate {
    let population = location.population as f64;
    let density = population / location.area_km2.max(1.0);

    let fireball = zone_casualties(
        physics.fireball_radius_km,
        density,
        FIREBALL_LETHALITY,
        population,
    );
    let thermal = zone_casualties(
        physics.thermal_radius_km,
        density,
        THERMAL_LETHALITY,
        population,
    );
    let shockwave = zone_casualties(
        physics.shockwave_radius_km,
        density,
        SHOCKWAVE_LETHALITY,
        population,
    );

    let total = (fireball + thermal + shockwave).min(population);
    let survival_rate_percent = if population > 0.0 {
        ((population - total) / population * 100.0).max(0.0)
    } else {
        100.0
    };

    let building_stock = location.buildings.unwrap_or(DEFAULT_BUILDING_STOCK) as f64;
    let buildings_destroyed =
        (zone_area_km2(physics.shockwave_radius_km) * BUILDING_DENSITY_PER_KM2).min(building_stock);

    let economic_damage_billion_usd =
        (physics.kinetic_energy_mt * ECONOMIC_DAMAGE_BILLION_PER_MT * 100.0).round() / 100.0;
    let infrastructure_damage_percent = (physics.kinetic_energy_mt
        * INFRASTRUCTURE_DAMAGE_PERCENT_PER_MT)
        .min(INFRASTRUCTURE_DAMAGE_PERCENT_MAX);

    CasualtyEstimate {
        fireball_zone: fireball as u64,
        thermal_zone: thermal as u64,
        shockwave_zone: shockwave as u64,
        total: total as u64,
        survival_rate_percent,
        buildings_destroyed: buildings_destroyed as u64,
        economic_damage_billion_usd,
        infrastructure_damage_percent,
    }
}
