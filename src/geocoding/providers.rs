//! Geocoding providers: OpenStreetMap Nominatim.

use super::types::{GeocodeError, Geocoded, Geocoder};
use serde::Deserialize;
use std::time::Duration;
use ureq::{Agent, AgentBuilder};

pub const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_USER_AGENT: &str = "bwes_geocoder";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// ─── Nominatim provider ─────────────────────────────────────────

#[derive(Deserialize, Debug, Clone)]
pub struct NominatimResult {
    pub lat: String,
    pub lon: String,
    pub display_name: String,
}

/// Blocking Nominatim search client. One HTTP request per query.
pub struct NominatimGeocoder {
    agent: Agent,
    search_url: String,
}

impl NominatimGeocoder {
    /// Client against the public Nominatim instance with default settings.
    pub fn new() -> Self {
        Self::with_options(DEFAULT_ENDPOINT, DEFAULT_USER_AGENT, DEFAULT_TIMEOUT)
    }

    /// Client against a specific Nominatim instance (self-hosted or test server).
    pub fn with_options(endpoint: &str, user_agent: &str, timeout: Duration) -> Self {
        let agent = AgentBuilder::new()
            .user_agent(user_agent)
            .timeout(timeout)
            .build();
        Self {
            agent,
            search_url: format!("{}/search", endpoint.trim_end_matches('/')),
        }
    }

    pub fn search_url(&self) -> &str {
        &self.search_url
    }
}

impl Default for NominatimGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Geocoder for NominatimGeocoder {
    fn geocode(&self, query: &str) -> Result<Geocoded, GeocodeError> {
        let response = self
            .agent
            .get(&self.search_url)
            .query("q", query)
            .query("format", "json")
            .query("limit", "1")
            .call()
            .map_err(|e| match e {
                ureq::Error::Status(status, _) => GeocodeError::Service { status },
                ureq::Error::Transport(t) => GeocodeError::Network(t.to_string()),
            })?;

        let results: Vec<NominatimResult> = response
            .into_json()
            .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;

        first_match(query, &results)
    }
}

/// Turn the top Nominatim hit into a `Geocoded`. Coordinates arrive as strings.
fn first_match(query: &str, results: &[NominatimResult]) -> Result<Geocoded, GeocodeError> {
    let top = results
        .first()
        .ok_or_else(|| GeocodeError::NotFound(query.to_string()))?;

    let latitude = parse_coord(&top.lat, "lat")?;
    let longitude = parse_coord(&top.lon, "lon")?;

    Ok(Geocoded {
        address: top.display_name.clone(),
        latitude,
        longitude,
    })
}

fn parse_coord(raw: &str, field: &str) -> Result<f64, GeocodeError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| GeocodeError::InvalidResponse(format!("bad {} '{}'", field, raw)))
}
