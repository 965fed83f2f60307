//! Upstream near-Earth-object catalog client.
//!
//! Wraps the NEO REST catalog behind a narrow, typed surface. The raw JSON
//! record is preserved for echoing to callers; typed views are parsed from
//! it on demand because the upstream encodes most numerics as strings and
//! omits blocks freely.

use std::collections::BTreeMap;
use std::env;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

const NEO_API_BASE: &str = "https://api.nasa.gov/neo/rest/v1";
const API_BASE_ENV: &str = "METEORSIM_NEO_BASE_URL";
const API_KEY_ENV: &str = "NASA_API_KEY";
const DEFAULT_API_KEY: &str = "DEMO_KEY";

/// Bound on any single upstream request.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// Blocking client for the NEO catalog.
pub struct CatalogClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl CatalogClient {
    /// Build a client from the environment.
    ///
    /// `METEORSIM_NEO_BASE_URL` overrides the catalog base URL (used by
    /// tests to point at a local stub); `NASA_API_KEY` overrides the
    /// rate-limited demo key.
    pub fn from_env() -> Result<Self> {
        let base_url = env::var(API_BASE_ENV).unwrap_or_else(|_| NEO_API_BASE.to_string());
        let api_key = env::var(API_KEY_ENV).unwrap_or_else(|_| DEFAULT_API_KEY.to_string());
        Self::new(base_url, api_key)
    }

    /// Build a client against an explicit base URL and API key.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .user_agent(user_agent())
            .build()
            .map_err(|err| Error::UpstreamUnavailable {
                message: format!("failed to build catalog client: {err}"),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    /// Fetch the raw catalog record for one object.
    ///
    /// # Errors
    ///
    /// [`Error::UpstreamUnavailable`] for transport failures, timeouts, and
    /// non-success statuses; [`Error::MalformedUpstreamData`] when the body
    /// is not JSON.
    pub fn lookup(&self, asteroid_id: &str) -> Result<serde_json::Value> {
        let url = format!("{}/neo/{}", self.base_url, asteroid_id);
        debug!(asteroid_id, "fetching catalog record");
        self.fetch_json(&url, &[], asteroid_id)
    }

    /// Fetch the raw feed of close approaches for a date window.
    pub fn feed(&self, start: NaiveDate, end: NaiveDate) -> Result<serde_json::Value> {
        let url = format!("{}/feed", self.base_url);
        let start = start.format("%Y-%m-%d").to_string();
        let end = end.format("%Y-%m-%d").to_string();
        debug!(start = %start, end = %end, "fetching catalog feed");
        self.fetch_json(
            &url,
            &[("start_date", start.as_str()), ("end_date", end.as_str())],
            "feed",
        )
    }

    fn fetch_json(
        &self,
        url: &str,
        query: &[(&str, &str)],
        context_id: &str,
    ) -> Result<serde_json::Value> {
        let response = self
            .client
            .get(url)
            .query(query)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .map_err(|err| Error::UpstreamUnavailable {
                message: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::UpstreamUnavailable {
                message: format!("catalog returned status {status} for {url}"),
            });
        }

        response
            .json::<serde_json::Value>()
            .map_err(|err| Error::MalformedUpstreamData {
                id: context_id.to_string(),
                message: format!("undecodable response body: {err}"),
            })
    }
}

fn user_agent() -> String {
    format!(
        "meteorsim-lib/{version} ({repo})",
        version = env!("CARGO_PKG_VERSION"),
        repo = "https://github.com/meteorsim/meteorsim-rs"
    )
}

/// Typed view of a catalog object record. Unknown fields are ignored; the
/// raw JSON remains the source of truth for echoing upstream data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeoRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_potentially_hazardous_asteroid: bool,
    #[serde(default)]
    pub estimated_diameter: Option<EstimatedDiameter>,
    #[serde(default)]
    pub close_approach_data: Vec<CloseApproach>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatedDiameter {
    #[serde(default)]
    pub meters: Option<DiameterRange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiameterRange {
    #[serde(default)]
    pub estimated_diameter_min: Option<f64>,
    #[serde(default)]
    pub estimated_diameter_max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloseApproach {
    #[serde(default)]
    pub close_approach_date: Option<String>,
    #[serde(default)]
    pub relative_velocity: Option<RelativeVelocity>,
    #[serde(default)]
    pub miss_distance: Option<MissDistance>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelativeVelocity {
    /// String-encoded km/s, as delivered by the upstream.
    #[serde(default)]
    pub kilometers_per_second: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissDistance {
    /// String-encoded kilometers, as delivered by the upstream.
    #[serde(default)]
    pub kilometers: Option<String>,
}

/// Typed view of the feed response: records grouped by approach date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeoFeed {
    #[serde(default)]
    pub near_earth_objects: BTreeMap<String, Vec<NeoRecord>>,
}

impl NeoRecord {
    /// Parse a typed record view out of a raw catalog record.
    pub fn from_raw(raw: &serde_json::Value) -> Result<Self> {
        serde_json::from_value(raw.clone()).map_err(|err| Error::MalformedUpstreamData {
            id: raw
                .get("id")
                .and_then(|value| value.as_str())
                .unwrap_or("unknown")
                .to_string(),
            message: err.to_string(),
        })
    }

    /// Mean of the min/max diameter estimate in meters, when present.
    pub fn average_diameter_m(&self) -> Option<f64> {
        let range = self.estimated_diameter.as_ref()?.meters.as_ref()?;
        match (range.estimated_diameter_min, range.estimated_diameter_max) {
            (Some(min), Some(max)) => Some((min + max) / 2.0),
            _ => None,
        }
    }

    /// Maximum diameter estimate in meters, when present.
    pub fn max_diameter_m(&self) -> Option<f64> {
        self.estimated_diameter
            .as_ref()?
            .meters
            .as_ref()?
            .estimated_diameter_max
    }

    /// First close-approach record, when present.
    pub fn first_approach(&self) -> Option<&CloseApproach> {
        self.close_approach_data.first()
    }
}

impl NeoFeed {
    /// Parse a typed feed view out of a raw feed response.
    pub fn from_raw(raw: &serde_json::Value) -> Result<Self> {
        serde_json::from_value(raw.clone()).map_err(|err| Error::MalformedUpstreamData {
            id: "feed".to_string(),
            message: err.to_string(),
        })
    }
}

impl CloseApproach {
    /// Relative velocity in km/s; unparseable values read as absent.
    pub fn velocity_km_s(&self) -> Option<f64> {
        self.relative_velocity
            .as_ref()?
            .kilometers_per_second
            .as_deref()?
            .parse()
            .ok()
    }

    /// Miss distance in km; unparseable values read as absent.
    pub fn miss_distance_km(&self) -> Option<f64> {
        self.miss_distance
            .as_ref()?
            .kilometers
            .as_deref()?
            .parse()
            .ok()
    }
}
