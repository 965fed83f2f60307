//! Concentric survival-probability zones.
//!
//! Five fixed rings scale from a single characteristic radius (the
//! shockwave radius in the simulation pipeline). Ordering is significant:
//! ground zero comes first and the sequence is always exactly five zones.

use serde::{Deserialize, Serialize};

/// Per-zone emergency-capability percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneFactors {
    pub shelters: u8,
    pub hospitals: u8,
    pub evacuation_routes: u8,
    pub infrastructure: u8,
}

/// A concentric survival-probability ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurvivalZone {
    /// Stable zone identifier (kebab-case).
    pub id: String,
    pub name: String,
    /// Outer radius of this ring in km.
    pub radius_km: f64,
    pub survival_rate_percent: f64,
    /// Display color (hex).
    pub color: String,
    pub description: String,
    pub factors: ZoneFactors,
}

struct ZoneTemplate {
    id: &'static str,
    name: &'static str,
    radius_multiplier: f64,
    survival_rate_percent: f64,
    color: &'static str,
    description: &'static str,
    factors: ZoneFactors,
}

const ZONE_TEMPLATES: [ZoneTemplate; 5] = [
    ZoneTemplate {
        id: "ground-zero",
        name: "Ground Zero",
        radius_multiplier: 0.2,
        survival_rate_percent: 0.0,
        color: "#DC2626",
        description: "Complete destruction - No survival possible",
        factors: ZoneFactors {
            shelters: 0,
            hospitals: 0,
            evacuation_routes: 0,
            infrastructure: 0,
        },
    },
    ZoneTemplate {
        id: "critical-zone",
        name: "Critical Impact Zone",
        radius_multiplier: 0.5,
        survival_rate_percent: 5.0,
        color: "#EA580C",
        description: "Extreme danger - Survival only in reinforced shelters",
        factors: ZoneFactors {
            shelters: 10,
            hospitals: 5,
            evacuation_routes: 15,
            infrastructure: 20,
        },
    },
    ZoneTemplate {
        id: "severe-zone",
        name: "Severe Damage Zone",
        radius_multiplier: 0.8,
        survival_rate_percent: 25.0,
        color: "#F59E0B",
        description: "Heavy casualties - Underground shelters essential",
        factors: ZoneFactors {
            shelters: 40,
            hospitals: 25,
            evacuation_routes: 35,
            infrastructure: 45,
        },
    },
    ZoneTemplate {
        id: "moderate-zone",
        name: "Moderate Risk Zone",
        radius_multiplier: 1.2,
        survival_rate_percent: 60.0,
        color: "#EAB308",
        description: "Significant risk - Immediate evacuation required",
        factors: ZoneFactors {
            shelters: 70,
            hospitals: 60,
            evacuation_routes: 65,
            infrastructure: 70,
        },
    },
    ZoneTemplate {
        id: "safe-zone",
        name: "Relative Safety Zone",
        radius_multiplier: 2.5,
        survival_rate_percent: 95.0,
        color: "#22C55E",
        description: "High survival rate - Minor injuries possible",
        factors: ZoneFactors {
            shelters: 95,
            hospitals: 90,
            evacuation_routes: 95,
            infrastructure: 95,
        },
    },
];

/// Derive the five survival zones from a characteristic radius in km.
///
/// Radius multipliers are 0.2 / 0.5 / 0.8 / 1.2 / 2.5 and survival rates
/// 0 / 5 / 25 / 60 / 95 percent, innermost first.
pub fn survival_zones(characteristic_radius_km: f64) -> Vec<SurvivalZone> {
    ZONE_TEMPLATES
        .iter()
        .map(|template| SurvivalZone {
            id: template.id.to_string(),
            name: template.name.to_string(),
            radius_km: characteristic_radius_km * template.radius_multiplier,
            survival_rate_percent: template.survival_rate_percent,
            color: template.color.to_string(),
            description: template.description.to_string(),
            factors: template.factors,
        })
        .collect()
}
