//! Centralized constants for the pindrop crate
//!
//! Values shared by the screen, the renderers and the geocoding clients.

/// Geographic constants
pub mod geo {
    /// Mean Earth radius in meters (WGS84 approximation)
    pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;
}

/// External API endpoints
pub mod api {
    /// Google reverse geocoding endpoint
    pub const GOOGLE_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

    /// IP geolocation API (free, no key required)
    pub const IP_API_URL: &str = "http://ip-api.com/json";

    /// Environment variable that overrides `api_keys.google`
    pub const API_KEY_ENV: &str = "PINDROP_GEOCODING_API_KEY";

    /// Path of the reverse geocoding route on the proxy server
    pub const PROXY_REVERSE_PATH: &str = "/api/geocode/reverse";
}

/// Map surface styling
pub mod style {
    /// Pickup marker color
    pub const PICKUP_PIN_COLOR: &str = "blue";

    /// Drop marker color
    pub const DROP_PIN_COLOR: &str = "red";

    /// Pickup marker title
    pub const PICKUP_TITLE: &str = "Picked Location";

    /// Drop marker title
    pub const DROP_TITLE: &str = "Dropped Location";

    /// Route polyline stroke color
    pub const ROUTE_STROKE_COLOR: &str = "#FF0000";

    /// Route polyline stroke width
    pub const ROUTE_STROKE_WIDTH: u32 = 2;

    /// Warning shown when foreground location permission is denied
    pub const PERMISSION_WARNING: &str =
        "Location permission is required. Please enable it in your device settings.";
}
