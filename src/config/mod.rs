//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/pindrop/config.toml

pub mod defaults;

use crate::constants::api::API_KEY_ENV;
use crate::coord::region::{
    DEFAULT_CENTER_LATITUDE, DEFAULT_CENTER_LONGITUDE, DEFAULT_LATITUDE_SPAN,
    DEFAULT_LONGITUDE_SPAN,
};
use crate::coord::{GeoPoint, ViewportRegion};
use crate::error::{Error, Result};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Initial map viewport
    #[serde(default)]
    pub map: MapConfig,

    /// Reverse geocoding settings
    #[serde(default)]
    pub geocoding: GeocodingConfig,

    /// Device location settings
    #[serde(default)]
    pub location: LocationConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// URL generation settings
    #[serde(default)]
    pub url: UrlConfig,

    /// API keys for various services
    #[serde(default)]
    pub api_keys: ApiKeysConfig,
}

/// Initial map viewport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_map_latitude")]
    pub latitude: f64,

    #[serde(default = "default_map_longitude")]
    pub longitude: f64,

    /// Visible latitude span in degrees
    #[serde(default = "default_latitude_span")]
    pub latitude_span: f64,

    /// Visible longitude span in degrees
    #[serde(default = "default_longitude_span")]
    pub longitude_span: f64,
}

/// Reverse geocoding settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// "google" (direct, needs a key) or "proxy" (via `pindrop serve`)
    #[serde(default = "default_geocoding_provider")]
    pub provider: String,

    /// Google-compatible geocode endpoint
    #[serde(default = "default_geocoding_endpoint")]
    pub endpoint: String,

    /// Base URL of the proxy server
    #[serde(default = "default_proxy_url")]
    pub proxy_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_geocoding_timeout")]
    pub timeout_secs: u64,
}

/// Device location settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// "ip" (IP geolocation) or "fixed" (use latitude/longitude below)
    #[serde(default = "default_location_source")]
    pub source: String,

    #[serde(default = "default_map_latitude")]
    pub latitude: f64,

    #[serde(default = "default_map_longitude")]
    pub longitude: f64,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// URL generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlConfig {
    /// Default URL provider
    #[serde(default = "default_url_provider")]
    pub default: String,

    /// Directions URL templates
    #[serde(default = "default_url_providers")]
    pub providers: HashMap<String, String>,
}

/// API keys for external services
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiKeysConfig {
    /// Google geocoding API key
    #[serde(default)]
    pub google: String,
}

// Default value functions for serde
fn default_map_latitude() -> f64 {
    DEFAULT_CENTER_LATITUDE
}
fn default_map_longitude() -> f64 {
    DEFAULT_CENTER_LONGITUDE
}
fn default_latitude_span() -> f64 {
    DEFAULT_LATITUDE_SPAN
}
fn default_longitude_span() -> f64 {
    DEFAULT_LONGITUDE_SPAN
}
fn default_geocoding_provider() -> String {
    DEFAULT_GEOCODING_PROVIDER.to_string()
}
fn default_geocoding_endpoint() -> String {
    DEFAULT_GEOCODING_ENDPOINT.to_string()
}
fn default_proxy_url() -> String {
    DEFAULT_PROXY_URL.to_string()
}
fn default_geocoding_timeout() -> u64 {
    DEFAULT_GEOCODING_TIMEOUT_SECS
}
fn default_location_source() -> String {
    DEFAULT_LOCATION_SOURCE.to_string()
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_url_provider() -> String {
    DEFAULT_URL_PROVIDER.to_string()
}
fn default_url_providers() -> HashMap<String, String> {
    let mut providers = HashMap::new();
    providers.insert(
        "google".to_string(),
        "https://www.google.com/maps/dir/{pickup_lat},{pickup_lng}/{drop_lat},{drop_lng}"
            .to_string(),
    );
    providers.insert(
        "openstreetmap".to_string(),
        "https://www.openstreetmap.org/directions?route={pickup_lat},{pickup_lng};{drop_lat},{drop_lng}"
            .to_string(),
    );
    providers.insert(
        "apple".to_string(),
        "https://maps.apple.com/?saddr={pickup_lat},{pickup_lng}&daddr={drop_lat},{drop_lng}"
            .to_string(),
    );
    providers
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            latitude: default_map_latitude(),
            longitude: default_map_longitude(),
            latitude_span: default_latitude_span(),
            longitude_span: default_longitude_span(),
        }
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            provider: default_geocoding_provider(),
            endpoint: default_geocoding_endpoint(),
            proxy_url: default_proxy_url(),
            timeout_secs: default_geocoding_timeout(),
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            source: default_location_source(),
            latitude: default_map_latitude(),
            longitude: default_map_longitude(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            default: default_url_provider(),
            providers: default_url_providers(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific path, creating it if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            let config: Config = toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })?;
            check_timeout(config.geocoding.timeout_secs)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["map", "latitude"] => Some(self.map.latitude.to_string()),
            ["map", "longitude"] => Some(self.map.longitude.to_string()),
            ["map", "latitude_span"] => Some(self.map.latitude_span.to_string()),
            ["map", "longitude_span"] => Some(self.map.longitude_span.to_string()),

            ["geocoding", "provider"] => Some(self.geocoding.provider.clone()),
            ["geocoding", "endpoint"] => Some(self.geocoding.endpoint.clone()),
            ["geocoding", "proxy_url"] => Some(self.geocoding.proxy_url.clone()),
            ["geocoding", "timeout_secs"] => Some(self.geocoding.timeout_secs.to_string()),

            ["location", "source"] => Some(self.location.source.clone()),
            ["location", "latitude"] => Some(self.location.latitude.to_string()),
            ["location", "longitude"] => Some(self.location.longitude.to_string()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["url", "default"] => Some(self.url.default.clone()),

            ["api_keys", "google"] => Some(self.api_keys.google.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["map", "latitude"] => self.map.latitude = parse_value(key, value)?,
            ["map", "longitude"] => self.map.longitude = parse_value(key, value)?,
            ["map", "latitude_span"] => self.map.latitude_span = parse_value(key, value)?,
            ["map", "longitude_span"] => self.map.longitude_span = parse_value(key, value)?,

            ["geocoding", "provider"] => match value {
                "google" | "proxy" => self.geocoding.provider = value.to_string(),
                _ => {
                    return Err(Error::Config(format!(
                        "Unknown geocoding provider: {} (expected google or proxy)",
                        value
                    )))
                }
            },
            ["geocoding", "endpoint"] => self.geocoding.endpoint = value.to_string(),
            ["geocoding", "proxy_url"] => self.geocoding.proxy_url = value.to_string(),
            ["geocoding", "timeout_secs"] => {
                self.geocoding.timeout_secs = check_timeout(parse_value(key, value)?)?
            }

            ["location", "source"] => match value {
                "ip" | "fixed" => self.location.source = value.to_string(),
                _ => {
                    return Err(Error::Config(format!(
                        "Unknown location source: {} (expected ip or fixed)",
                        value
                    )))
                }
            },
            ["location", "latitude"] => self.location.latitude = parse_value(key, value)?,
            ["location", "longitude"] => self.location.longitude = parse_value(key, value)?,

            ["server", "host"] => self.server.host = value.to_string(),
            ["server", "port"] => self.server.port = parse_value(key, value)?,

            ["url", "default"] => self.url.default = value.to_string(),

            ["api_keys", "google"] => self.api_keys.google = value.to_string(),

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "map.latitude",
            "map.longitude",
            "map.latitude_span",
            "map.longitude_span",
            "geocoding.provider",
            "geocoding.endpoint",
            "geocoding.proxy_url",
            "geocoding.timeout_secs",
            "location.source",
            "location.latitude",
            "location.longitude",
            "server.host",
            "server.port",
            "url.default",
            "api_keys.google",
        ]
    }

    /// Initial viewport built from `[map]`
    pub fn initial_region(&self) -> Result<ViewportRegion> {
        ViewportRegion::new(
            GeoPoint::new(self.map.latitude, self.map.longitude),
            self.map.latitude_span,
            self.map.longitude_span,
        )
    }

    /// Google API key: environment first, then the config file
    ///
    /// Returns None when neither is set.
    pub fn google_api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| Some(self.api_keys.google.clone()).filter(|key| !key.trim().is_empty()))
    }

    /// Geocoding request timeout
    pub fn geocoding_timeout(&self) -> Duration {
        Duration::from_secs(self.geocoding.timeout_secs)
    }

    /// Format a directions URL using the specified provider
    ///
    /// Replaces {pickup_lat}, {pickup_lng}, {drop_lat} and {drop_lng}
    pub fn format_url(
        &self,
        provider: Option<&str>,
        pickup: GeoPoint,
        drop: GeoPoint,
    ) -> Result<String> {
        let provider_name = provider.unwrap_or(&self.url.default);

        let template = self.url.providers.get(provider_name).ok_or_else(|| {
            Error::Config(format!("Unknown URL provider: {}", provider_name))
        })?;

        Ok(template
            .replace("{pickup_lat}", &pickup.latitude.to_string())
            .replace("{pickup_lng}", &pickup.longitude.to_string())
            .replace("{drop_lat}", &drop.latitude.to_string())
            .replace("{drop_lng}", &drop.longitude.to_string()))
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// A zero timeout would fail every request before it is sent
fn check_timeout(secs: u64) -> Result<u64> {
    if secs == 0 {
        return Err(Error::Config(
            "geocoding.timeout_secs must be at least 1".to_string(),
        ));
    }
    Ok(secs)
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid value for {}: {}", key, value)))
}
