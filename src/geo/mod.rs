//! External location collaborators
//!
//! Provides reverse geocoding (coordinates to address) and the device
//! location service (permission + one-shot position).

pub mod device;
pub mod google;
pub mod ip_location;
pub mod proxy;

use crate::config::Config;
use crate::coord::GeoPoint;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub use device::{DeviceLocation, FixedLocation, LocationProvider, PermissionStatus};
pub use google::GoogleGeocoder;
pub use ip_location::IpLocationProvider;
pub use proxy::ProxyGeocoder;

/// Result of a reverse geocoding lookup, as served by the proxy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressLookup {
    pub latitude: f64,
    pub longitude: f64,
    /// Formatted address of the first result, None when there were no results
    pub address: Option<String>,
}

/// Trait for reverse geocoding backends
pub trait ReverseGeocoder: Send + Sync {
    /// Short backend name for logs and status output
    fn name(&self) -> &'static str;

    /// Resolve a coordinate to the first matching formatted address
    ///
    /// Returns Ok(None) when the service found nothing.
    fn reverse_geocode(
        &self,
        point: GeoPoint,
    ) -> impl std::future::Future<Output = Result<Option<String>>> + Send;
}

/// Geocoder selected by configuration
#[derive(Debug, Clone)]
pub enum Geocoder {
    Google(GoogleGeocoder),
    Proxy(ProxyGeocoder),
    /// No usable backend; every lookup fails with the stored reason
    Unavailable(String),
}

impl ReverseGeocoder for Geocoder {
    fn name(&self) -> &'static str {
        match self {
            Self::Google(g) => g.name(),
            Self::Proxy(p) => p.name(),
            Self::Unavailable(_) => "unavailable",
        }
    }

    async fn reverse_geocode(&self, point: GeoPoint) -> Result<Option<String>> {
        match self {
            Self::Google(g) => g.reverse_geocode(point).await,
            Self::Proxy(p) => p.reverse_geocode(point).await,
            Self::Unavailable(reason) => Err(Error::Geocoding(reason.clone())),
        }
    }
}

/// Build the configured geocoder
///
/// The "google" provider needs an API key from the environment or config.
/// Without one the geocoder is `Unavailable`: lookups fail and get logged,
/// but the screen still runs.
pub fn get_geocoder(config: &Config) -> Result<Geocoder> {
    geocoder_with_key(config, config.google_api_key())
}

fn geocoder_with_key(config: &Config, api_key: Option<String>) -> Result<Geocoder> {
    match config.geocoding.provider.as_str() {
        "google" => match api_key {
            Some(api_key) => Ok(Geocoder::Google(GoogleGeocoder::new(
                &config.geocoding.endpoint,
                api_key,
                config.geocoding_timeout(),
            )?)),
            None => {
                warn!(
                    "No Google API key configured; set {} or api_keys.google, \
                     or use geocoding.provider = \"proxy\". Addresses will stay blank.",
                    crate::constants::api::API_KEY_ENV
                );
                Ok(Geocoder::Unavailable("no API key configured".to_string()))
            }
        },
        "proxy" => Ok(Geocoder::Proxy(ProxyGeocoder::new(
            &config.geocoding.proxy_url,
            config.geocoding_timeout(),
        )?)),
        other => Err(Error::Config(format!("Unknown geocoding provider: {}", other))),
    }
}

/// Build the configured device location provider
pub fn get_location_provider(config: &Config) -> Result<DeviceLocation> {
    match config.location.source.as_str() {
        "ip" => Ok(DeviceLocation::Ip(IpLocationProvider::new()?)),
        "fixed" => {
            let point = GeoPoint::new(config.location.latitude, config.location.longitude);
            point.validate()?;
            Ok(DeviceLocation::Fixed(FixedLocation::at(point)))
        }
        other => Err(Error::Config(format!("Unknown location source: {}", other))),
    }
}
