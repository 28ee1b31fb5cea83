//! Default configuration values
//!
//! Named constants for all tunable parameters

use crate::constants::api::GOOGLE_GEOCODE_URL;

/// Default geocoding provider
pub const DEFAULT_GEOCODING_PROVIDER: &str = "google";

/// Default geocoding endpoint
pub const DEFAULT_GEOCODING_ENDPOINT: &str = GOOGLE_GEOCODE_URL;

/// Default proxy server URL used by the "proxy" provider
pub const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:7878";

/// Default geocoding request timeout in seconds
pub const DEFAULT_GEOCODING_TIMEOUT_SECS: u64 = 10;

/// Default device location source
pub const DEFAULT_LOCATION_SOURCE: &str = "ip";

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7878;

/// Default URL provider
pub const DEFAULT_URL_PROVIDER: &str = "google";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "pindrop";
