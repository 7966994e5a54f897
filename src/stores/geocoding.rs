use std::{io, time::Duration};

use _model::Coordinates;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use ureq::{Agent, AgentBuilder};

use crate::config::GeocodingConfig;

/// Status recorded when the service could not be reached or understood.
pub const TRANSPORT_ERROR: &str = "error";

/// What a lookup came back with. Failures are cached too, as zero
/// coordinates carrying the status the service reported.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<String>,
}

impl GeocodeResult {
    pub fn sentinel(status: impl Into<String>) -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
            status: Some(status.into()),
            accuracy: None,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

pub trait Geocoder {
    /// Never fails: problems come back as a sentinel result.
    fn geocode(&self, address: &str) -> GeocodeResult;
}

/// Logged and turned into a sentinel, never propagated.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("request failed: {0}")]
    Http(Box<ureq::Error>),
    #[error("unreadable response: {0}")]
    Decode(io::Error),
}

/// Google Geocoding API over a blocking agent.
pub struct GoogleGeocoder {
    agent: Agent,
    endpoint: String,
    api_key: String,
    region: String,
}

impl GoogleGeocoder {
    pub fn new(config: &GeocodingConfig, api_key: &str) -> Self {
        let agent = AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("firestore-export/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            agent,
            endpoint: config.endpoint.clone(),
            api_key: api_key.to_string(),
            region: config.region.clone(),
        }
    }

    fn fetch(&self, address: &str) -> Result<GeocodeResponse, GeocodeError> {
        let response = self
            .agent
            .get(&self.endpoint)
            .query("address", address)
            .query("key", &self.api_key)
            .query("region", &self.region)
            .call()
            .map_err(|e| GeocodeError::Http(Box::new(e)))?;
        response.into_json().map_err(GeocodeError::Decode)
    }
}

impl Geocoder for GoogleGeocoder {
    fn geocode(&self, address: &str) -> GeocodeResult {
        debug!(address, "geocoding");
        match self.fetch(address) {
            Ok(response) => interpret(address, response),
            Err(e) => {
                warn!(address, error = %e, "geocoding error");
                GeocodeResult::sentinel(TRANSPORT_ERROR)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: Option<String>,
    #[serde(default)]
    results: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
    location_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

fn interpret(address: &str, response: GeocodeResponse) -> GeocodeResult {
    let Some(status) = response.status else {
        warn!(address, "geocoding response without a status");
        return GeocodeResult::sentinel(TRANSPORT_ERROR);
    };

    match response.results.into_iter().next() {
        Some(Candidate { geometry }) if status == "OK" => GeocodeResult {
            latitude: geometry.location.lat,
            longitude: geometry.location.lng,
            status: Some(status),
            accuracy: Some(
                geometry
                    .location_type
                    .unwrap_or_else(|| "UNKNOWN".to_string()),
            ),
        },
        _ => {
            warn!(address, %status, "geocoding failed");
            GeocodeResult::sentinel(status)
        }
    }
}
