//! Google reverse geocoding backend
//!
//! One GET per lookup against the Geocoding API's `latlng` form. The API key
//! is supplied at runtime; it is never compiled in.

use crate::coord::GeoPoint;
use crate::error::{Error, Result};
use crate::geo::ReverseGeocoder;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("pindrop/", env!("CARGO_PKG_VERSION"));

/// Google geocoding backend
#[derive(Clone)]
pub struct GoogleGeocoder {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

/// Geocode response body
#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    results: Vec<GeocodeResult>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: String,
}

impl GoogleGeocoder {
    /// Create a backend for `endpoint` with a request timeout
    pub fn new(endpoint: &str, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Build the request URL for a coordinate
    pub fn request_url(&self, point: GeoPoint) -> String {
        format!(
            "{}?latlng={},{}&key={}",
            self.endpoint,
            point.latitude,
            point.longitude,
            urlencoding::encode(&self.api_key)
        )
    }

    /// Extract the first formatted address from a response body
    pub fn parse_response(body: &str) -> Result<Option<String>> {
        let data: GeocodeResponse = serde_json::from_str(body)
            .map_err(|e| Error::Geocoding(format!("Failed to parse geocode response: {}", e)))?;

        match data.status.as_deref() {
            None | Some("OK") | Some("ZERO_RESULTS") => {}
            Some(status) => {
                return Err(Error::Geocoding(format!(
                    "Geocode API returned {}: {}",
                    status,
                    data.error_message.as_deref().unwrap_or("no message")
                )));
            }
        }

        Ok(data
            .results
            .into_iter()
            .next()
            .map(|result| result.formatted_address))
    }
}

impl std::fmt::Debug for GoogleGeocoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleGeocoder")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"***")
            .finish()
    }
}

impl ReverseGeocoder for GoogleGeocoder {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn reverse_geocode(&self, point: GeoPoint) -> Result<Option<String>> {
        debug!(%point, "Reverse geocoding via Google");

        let response = self
            .client
            .get(self.request_url(point))
            .send()
            .await
            .map_err(|e| Error::Geocoding(format!("Geocode request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Geocoding(format!(
                "Geocode API returned status: {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Geocoding(format!("Failed to read geocode response: {}", e)))?;

        Self::parse_response(&body)
    }
}
