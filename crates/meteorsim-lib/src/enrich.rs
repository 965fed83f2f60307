//! Advisory enrichment seams.
//!
//! Everything in this module is best-effort: a briefing provider failure
//! degrades to a canned paragraph, and the third-party crater lookup can
//! only ever contribute an optional number. Nothing here may fail an
//! overall request, and nothing here is authoritative for numeric fields.

use std::env;

use tracing::{debug, warn};

use crate::error::Result;
use crate::geo::ReferenceLocation;
use crate::physics::ImpactParameters;

const CRATER_URL_ENV: &str = "METEORSIM_CRATER_URL";

/// Grounding context handed to a briefing provider.
#[derive(Debug, Clone)]
pub struct BriefingContext<'a> {
    pub location: &'a ReferenceLocation,
    pub diameter_m: f64,
    pub energy_mt: f64,
}

/// Seam for an external natural-language briefing service.
///
/// Implementations live outside this crate. Output is advisory enrichment
/// only and is never used for numeric fields.
pub trait BriefingProvider: Send + Sync {
    fn briefing(&self, context: &BriefingContext<'_>) -> Result<String>;
}

/// Deterministic briefing used when no provider is configured or a
/// provider fails.
pub fn fallback_briefing(context: &BriefingContext<'_>) -> String {
    format!(
        "{name} shows moderate to high vulnerability at a population density of \
         {density:.0} people/km2. A {diameter:.0} m impactor would release roughly \
         {energy:.2} Mt TNT equivalent; evacuation protocols should be staged by \
         concentric zone. Figures come from simplified visualization-grade scaling, \
         not an authoritative impact model.",
        name = context.location.name,
        density = context.location.population_density,
        diameter = context.diameter_m,
        energy = context.energy_mt,
    )
}

/// Extract a crater diameter in meters from unstructured calculator text.
///
/// Scans for a line mentioning a final crater figure and parses the first
/// numeric token after the colon. Absence, malformed lines, and unparseable
/// tokens all read as `None`.
pub fn extract_crater_diameter_m(text: &str) -> Option<f64> {
    for line in text.lines() {
        if !(line.contains("Final crater diameter") || line.contains("Final crater")) {
            continue;
        }
        let Some((_, rest)) = line.split_once(':') else {
            continue;
        };
        if let Some(token) = rest.split_whitespace().next() {
            if let Ok(value) = token.parse::<f64>() {
                return Some(value);
            }
        }
    }
    None
}

/// Optional best-effort lookup against a third-party crater calculator.
///
/// Disabled unless `METEORSIM_CRATER_URL` is set; every failure mode
/// (transport, status, unparseable body) yields `None`.
pub struct CraterLookup {
    client: reqwest::blocking::Client,
    url: String,
}

impl CraterLookup {
    /// Build a lookup when the endpoint is configured, `None` otherwise.
    pub fn from_env() -> Option<Self> {
        let url = env::var(CRATER_URL_ENV).ok()?;
        if url.trim().is_empty() {
            return None;
        }
        Self::new(url)
    }

    /// Build a lookup against an explicit endpoint.
    pub fn new(url: impl Into<String>) -> Option<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(crate::catalog::UPSTREAM_TIMEOUT)
            .build()
            .ok()?;
        Some(Self {
            client,
            url: url.into(),
        })
    }

    /// Fetch a reference crater diameter for the given parameters.
    pub fn reference_crater_m(&self, params: &ImpactParameters) -> Option<f64> {
        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("diam", params.diameter_m.to_string()),
                ("pdens", params.density_kg_m3.to_string()),
                ("vel", params.velocity_km_s.to_string()),
                ("theta", params.angle_deg.to_string()),
            ])
            .send();

        let response = match response {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                warn!(status = %response.status(), "crater lookup returned non-success status");
                return None;
            }
            Err(err) => {
                warn!(error = %err, "crater lookup failed");
                return None;
            }
        };

        let body = response.text().ok()?;
        let crater = extract_crater_diameter_m(&body);
        debug!(found = crater.is_some(), "crater lookup completed");
        crater
    }
}
