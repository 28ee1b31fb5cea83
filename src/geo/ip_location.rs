//! IP-based device location
//!
//! Desktop stand-in for a GPS fix, using ip-api.com. There is no permission
//! prompt for this source, so permission is always granted.

use crate::constants::api::IP_API_URL;
use crate::coord::GeoPoint;
use crate::error::{Error, Result};
use crate::geo::device::{LocationProvider, PermissionStatus};
use serde::Deserialize;
use std::time::Duration;

/// IP location service
#[derive(Debug)]
pub struct IpLocationProvider {
    client: reqwest::Client,
    url: String,
}

/// ip-api.com response
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    message: Option<String>,
}

impl IpLocationProvider {
    /// Create a provider for ip-api.com
    pub fn new() -> Result<Self> {
        Self::with_url(IP_API_URL)
    }

    /// Create a provider against a specific ip-api compatible URL
    pub fn with_url(url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// Turn an ip-api response into a point
    fn parse(data: IpApiResponse) -> Result<GeoPoint> {
        if data.status != "success" {
            return Err(Error::PositionUnavailable(format!(
                "IP location lookup failed: {}",
                data.message.as_deref().unwrap_or("unknown reason")
            )));
        }

        let lat = data
            .lat
            .ok_or_else(|| Error::PositionUnavailable("No latitude in response".to_string()))?;
        let lng = data
            .lon
            .ok_or_else(|| Error::PositionUnavailable("No longitude in response".to_string()))?;

        let point = GeoPoint::new(lat, lng);
        point.validate()?;
        Ok(point)
    }
}

impl LocationProvider for IpLocationProvider {
    async fn request_foreground_permission(&self) -> PermissionStatus {
        PermissionStatus::Granted
    }

    async fn current_position(&self) -> Result<GeoPoint> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::PositionUnavailable(format!("IP location request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::PositionUnavailable(format!(
                "IP location API returned status: {}",
                response.status()
            )));
        }

        let data: IpApiResponse = response.json().await.map_err(|e| {
            Error::PositionUnavailable(format!("Failed to parse IP location response: {}", e))
        })?;

        Self::parse(data)
    }
}
