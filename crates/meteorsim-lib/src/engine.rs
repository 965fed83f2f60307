//! Engine assembly: the operations consumed by the HTTP service and CLI.
//!
//! The engine owns the catalog client, the result cache, and the optional
//! enrichment hooks. All computation is synchronous; the only blocking
//! calls are upstream catalog fetches, which are routed through the cache.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::cache::TtlCache;
use crate::casualty::{estimate_casualties, CasualtyEstimate};
use crate::catalog::{CatalogClient, NeoFeed, NeoRecord};
use crate::enrich::{fallback_briefing, BriefingContext, BriefingProvider, CraterLookup};
use crate::error::{Error, Result};
use crate::geo::{self, ReferenceLocation};
use crate::normalize::{
    approach_summary, parameters_from_record, parameters_from_request, ApproachSummary,
};
use crate::physics::{compute_impact, ImpactParameters, PhysicsResult};
use crate::risk::{
    recommendations, score_location_vulnerability, score_object_risk, ObjectRiskInput,
    RiskAssessment, SizeClass, ThreatLevel,
};
use crate::zones::{survival_zones, SurvivalZone};

/// Engine tuning knobs.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// TTL for memoized catalog responses.
    pub catalog_cache_ttl: Duration,
    /// Width of the default hazardous-object date window.
    pub hazardous_window_days: i64,
    /// Maximum number of objects returned by the hazardous listing.
    pub hazardous_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            catalog_cache_ttl: Duration::from_secs(300),
            hazardous_window_days: 7,
            hazardous_limit: 10,
        }
    }
}

/// Physics resolution for one catalog object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectPhysics {
    pub asteroid_id: String,
    pub name: String,
    pub is_hazardous: bool,
    pub parameters: ImpactParameters,
    pub physics: PhysicsResult,
    pub close_approach: ApproachSummary,
    /// Human-readable one-paragraph summary.
    pub summary: String,
    /// Raw upstream record, echoed untouched.
    pub raw: serde_json::Value,
}

/// Where a simulated impact lands.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetLocation {
    /// A curated reference-location key.
    Key(String),
    /// Raw coordinates, resolved to the nearest reference location.
    Coordinates { lat: f64, lng: f64 },
}

/// Inputs for an explicit-parameter simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRequest {
    pub diameter_m: Option<f64>,
    pub velocity_km_s: Option<f64>,
    pub density_kg_m3: Option<f64>,
    pub angle_deg: Option<f64>,
    pub target: TargetLocation,
}

/// Assembled simulation result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationOutcome {
    pub parameters: ImpactParameters,
    pub physics: PhysicsResult,
    pub casualties: CasualtyEstimate,
    pub zones: Vec<SurvivalZone>,
    pub location: ReferenceLocation,
    /// Best-effort crater diameter from the external calculator, when the
    /// lookup is configured and the field could be extracted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_crater_m: Option<f64>,
}

/// One scored entry in the hazardous listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardousObject {
    pub id: String,
    pub name: String,
    pub diameter_m: f64,
    pub velocity_km_s: f64,
    pub miss_distance_km: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approach_date: Option<String>,
    pub risk_score: f64,
    pub threat_level: ThreatLevel,
}

/// Hazardous listing: total count found, top entries by risk score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardousReport {
    pub count: usize,
    pub objects: Vec<HazardousObject>,
}

/// Vulnerability assessment for a location under a hypothetical strike.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationRiskReport {
    pub location: ReferenceLocation,
    pub assessment: RiskAssessment,
    pub size_class: SizeClass,
    pub briefing: String,
    pub recommendations: Vec<String>,
}

/// The impact assessment engine.
pub struct ImpactEngine {
    catalog: CatalogClient,
    record_cache: TtlCache<serde_json::Value>,
    briefing_provider: Option<Arc<dyn BriefingProvider>>,
    crater_lookup: Option<CraterLookup>,
    config: EngineConfig,
}

impl ImpactEngine {
    /// Build an engine from the environment (catalog base URL, API key,
    /// optional crater-calculator endpoint).
    pub fn from_env() -> Result<Self> {
        let catalog = CatalogClient::from_env()?;
        let mut engine = Self::new(catalog, EngineConfig::default());
        engine.crater_lookup = CraterLookup::from_env();
        Ok(engine)
    }

    /// Build an engine over an explicit catalog client.
    pub fn new(catalog: CatalogClient, config: EngineConfig) -> Self {
        Self {
            catalog,
            record_cache: TtlCache::new(),
            briefing_provider: None,
            crater_lookup: None,
            config,
        }
    }

    /// Attach an external briefing provider. Advisory only; failures fall
    /// back to the canned briefing.
    pub fn with_briefing_provider(mut self, provider: Arc<dyn BriefingProvider>) -> Self {
        self.briefing_provider = Some(provider);
        self
    }

    /// Attach a crater-calculator lookup.
    pub fn with_crater_lookup(mut self, lookup: CraterLookup) -> Self {
        self.crater_lookup = Some(lookup);
        self
    }

    /// The fixed reference-location table.
    pub fn reference_locations(&self) -> &'static [ReferenceLocation] {
        geo::reference_locations()
    }

    /// Resolve normalized parameters and physics for a catalog object.
    ///
    /// Lookups are memoized for the configured TTL so repeated requests for
    /// the same object do not hit the upstream catalog.
    pub fn object_physics(&self, asteroid_id: &str) -> Result<ObjectPhysics> {
        let asteroid_id = asteroid_id.trim();
        if asteroid_id.is_empty() {
            return Err(Error::invalid_parameter("asteroid_id must not be empty"));
        }

        let cache_key = format!("physics:{asteroid_id}");
        let raw = self
            .record_cache
            .get_or_compute(&cache_key, self.config.catalog_cache_ttl, || {
                self.catalog.lookup(asteroid_id)
            })?;

        let record = NeoRecord::from_raw(&raw)?;
        let parameters = parameters_from_record(&record)?;
        let physics = compute_impact(&parameters)?;
        let close_approach = approach_summary(&record);
        let name = record
            .name
            .clone()
            .unwrap_or_else(|| asteroid_id.to_string());
        let summary = physics_summary(&name, &record, &parameters, &physics, &close_approach);

        info!(
            asteroid_id,
            diameter_m = parameters.diameter_m,
            energy_mt = physics.kinetic_energy_mt,
            "resolved object physics"
        );

        Ok(ObjectPhysics {
            asteroid_id: asteroid_id.to_string(),
            name,
            is_hazardous: record.is_potentially_hazardous_asteroid,
            parameters,
            physics,
            close_approach,
            summary,
            raw,
        })
    }

    /// Simulate an impact with explicit parameters at a target location.
    pub fn simulate(&self, request: &SimulationRequest) -> Result<SimulationOutcome> {
        let parameters = parameters_from_request(
            request.diameter_m,
            request.velocity_km_s,
            request.density_kg_m3,
            request.angle_deg,
        )?;
        let physics = compute_impact(&parameters)?;

        let location = match &request.target {
            TargetLocation::Key(key) => geo::find_by_key(key)?,
            TargetLocation::Coordinates { lat, lng } => geo::nearest_reference(*lat, *lng)?,
        };

        let casualties = estimate_casualties(&physics, location);
        let zones = survival_zones(physics.shockwave_radius_km);
        let reference_crater_m = self
            .crater_lookup
            .as_ref()
            .and_then(|lookup| lookup.reference_crater_m(&parameters));

        Ok(SimulationOutcome {
            parameters,
            physics,
            casualties,
            zones,
            location: location.clone(),
            reference_crater_m,
        })
    }

    /// List hazardous objects over the default near-term window, scored
    /// and sorted by descending risk.
    pub fn hazardous_objects(&self) -> Result<HazardousReport> {
        let start = Utc::now().date_naive();
        let end = start + chrono::Duration::days(self.config.hazardous_window_days);
        self.hazardous_objects_in_window(start, end)
    }

    /// List hazardous objects over an explicit date window.
    pub fn hazardous_objects_in_window(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HazardousReport> {
        let cache_key = format!("hazardous:{start}:{end}");
        let raw = self
            .record_cache
            .get_or_compute(&cache_key, self.config.catalog_cache_ttl, || {
                self.catalog.feed(start, end)
            })?;

        let feed = NeoFeed::from_raw(&raw)?;
        let mut objects = Vec::new();

        for (date, records) in &feed.near_earth_objects {
            for record in records {
                if !record.is_potentially_hazardous_asteroid {
                    continue;
                }
                match self.score_feed_record(record, date) {
                    Some(object) => objects.push(object),
                    None => {
                        warn!(id = %record.id, date = %date, "skipping unscorable hazardous record");
                    }
                }
            }
        }

        objects.sort_by(|a, b| {
            b.risk_score
                .partial_cmp(&a.risk_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let count = objects.len();
        objects.truncate(self.config.hazardous_limit);

        Ok(HazardousReport { count, objects })
    }

    fn score_feed_record(&self, record: &NeoRecord, date: &str) -> Option<HazardousObject> {
        let diameter_m = record.max_diameter_m()?;
        let approach = record.first_approach()?;
        let velocity_km_s = approach.velocity_km_s()?;
        let miss_distance_km = approach.miss_distance_km()?;

        let assessment = score_object_risk(&ObjectRiskInput {
            diameter_m,
            velocity_km_s,
            miss_distance_km,
        })
        .ok()?;

        Some(HazardousObject {
            id: record.id.clone(),
            name: record.name.clone().unwrap_or_else(|| record.id.clone()),
            diameter_m,
            velocity_km_s,
            miss_distance_km,
            approach_date: approach
                .close_approach_date
                .clone()
                .or_else(|| Some(date.to_string())),
            risk_score: assessment.risk_score,
            threat_level: assessment
                .threat_level
                .unwrap_or(ThreatLevel::Minimal),
        })
    }

    /// Assess a reference location's vulnerability to a hypothetical strike.
    pub fn location_risk(&self, key: &str, diameter_m: f64) -> Result<LocationRiskReport> {
        if !diameter_m.is_finite() || diameter_m <= 0.0 {
            return Err(Error::invalid_parameter(format!(
                "diameter_m must be finite and positive, got {diameter_m}"
            )));
        }

        let location = geo::find_by_key(key)?;
        let assessment = score_location_vulnerability(location);
        let size_class = SizeClass::from_diameter_m(diameter_m);

        let parameters = parameters_from_request(Some(diameter_m), None, None, None)?;
        let physics = compute_impact(&parameters)?;
        let context = BriefingContext {
            location,
            diameter_m,
            energy_mt: physics.kinetic_energy_mt,
        };

        let briefing = match &self.briefing_provider {
            Some(provider) => provider.briefing(&context).unwrap_or_else(|err| {
                warn!(error = %err, "briefing provider failed, using fallback");
                fallback_briefing(&context)
            }),
            None => fallback_briefing(&context),
        };

        Ok(LocationRiskReport {
            location: location.clone(),
            assessment,
            size_class,
            briefing,
            recommendations: recommendations(location, diameter_m),
        })
    }
}

/// Build the one-paragraph human-readable summary for an object.
fn physics_summary(
    name: &str,
    record: &NeoRecord,
    parameters: &ImpactParameters,
    physics: &PhysicsResult,
    approach: &ApproachSummary,
) -> String {
    let approach_clause = match &approach.date {
        Some(date) => format!("approaches on {date}"),
        None => "has no recorded close approach".to_string(),
    };
    let miss_clause = match approach.miss_distance_km {
        Some(miss) => format!("Miss distance is roughly {miss:.0} km. "),
        None => String::new(),
    };
    let hazard_clause = if record.is_potentially_hazardous_asteroid {
        "potentially hazardous"
    } else {
        "not hazardous"
    };
    let seismic_clause = match physics.approx_seismic_mw {
        Some(mw) => format!("Seismic-equivalent magnitude is about Mw {mw:.2}. "),
        None => String::new(),
    };

    format!(
        "{name} (~{diameter:.0} m) {approach_clause}. {miss_clause}Cataloged as \
         {hazard_clause}. A direct hit would release about {energy:.3e} J \
         (~{megatons:.2} Mt TNT) and open a crater roughly {crater:.2} km across. \
         {seismic_clause}These figures use simplified visualization-grade scaling, \
         not a rigorous crater-scaling law.",
        diameter = parameters.diameter_m,
        energy = physics.kinetic_energy_j,
        megatons = physics.kinetic_energy_mt,
        crater = physics.crater_diameter_km,
    )
}
