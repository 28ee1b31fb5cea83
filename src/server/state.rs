//! Server shared state
//!
//! Holds configuration and the upstream geocoder for the HTTP server.

use crate::config::Config;
use crate::error::Result;
use crate::geo::GoogleGeocoder;
use chrono::{DateTime, Utc};

/// Shared state for the HTTP server
pub struct AppState {
    /// Configuration
    pub config: Config,

    /// Upstream geocoder; None when no API key is configured
    geocoder: Option<GoogleGeocoder>,

    started_at: DateTime<Utc>,
}

impl AppState {
    /// Create application state, building the upstream geocoder when a key exists
    pub fn new(config: Config) -> Result<Self> {
        let geocoder = match config.google_api_key() {
            Some(key) => Some(GoogleGeocoder::new(
                &config.geocoding.endpoint,
                key,
                config.geocoding_timeout(),
            )?),
            None => None,
        };
        Ok(Self::with_geocoder(config, geocoder))
    }

    /// Create application state with an explicit geocoder
    pub fn with_geocoder(config: Config, geocoder: Option<GoogleGeocoder>) -> Self {
        Self {
            config,
            geocoder,
            started_at: Utc::now(),
        }
    }

    pub fn geocoder(&self) -> Option<&GoogleGeocoder> {
        self.geocoder.as_ref()
    }

    pub fn has_geocoder(&self) -> bool {
        self.geocoder.is_some()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Whole seconds since the server started
    pub fn uptime_secs(&self) -> u64 {
        (Utc::now() - self.started_at).num_seconds().max(0) as u64
    }
}
