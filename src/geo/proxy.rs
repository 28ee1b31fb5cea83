//! Proxy geocoding backend
//!
//! Resolves addresses through a running `pindrop serve` instance, which holds
//! the API key server-side.

use crate::constants::api::PROXY_REVERSE_PATH;
use crate::coord::GeoPoint;
use crate::error::{Error, Result};
use crate::geo::{AddressLookup, ReverseGeocoder};
use std::time::Duration;

/// Geocoding backend that calls the pindrop proxy server
#[derive(Debug, Clone)]
pub struct ProxyGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl ProxyGeocoder {
    /// Create a proxy backend for a server base URL (e.g. "http://127.0.0.1:7878")
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build the proxy request URL for a coordinate
    pub fn request_url(&self, point: GeoPoint) -> String {
        format!(
            "{}{}?lat={}&lng={}",
            self.base_url, PROXY_REVERSE_PATH, point.latitude, point.longitude
        )
    }
}

impl ReverseGeocoder for ProxyGeocoder {
    fn name(&self) -> &'static str {
        "proxy"
    }

    async fn reverse_geocode(&self, point: GeoPoint) -> Result<Option<String>> {
        let response = self
            .client
            .get(self.request_url(point))
            .send()
            .await
            .map_err(|e| Error::Geocoding(format!("Proxy request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Geocoding(format!(
                "Proxy returned status: {}",
                response.status()
            )));
        }

        let lookup: AddressLookup = response
            .json()
            .await
            .map_err(|e| Error::Geocoding(format!("Failed to parse proxy response: {}", e)))?;

        Ok(lookup.address)
    }
}
