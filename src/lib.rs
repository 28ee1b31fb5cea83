//! pindrop: Pickup/Drop Location Picker
//!
//! A headless location-picking screen. It centers a map on the device's
//! position, takes the pickup from that fix, takes the drop from map taps,
//! draws a straight line between them and resolves both to addresses with a
//! reverse geocoding service.
//!
//! ## Features
//!
//! - Screen state driven through named transitions
//! - Stale address lookups discarded by a per-role sequence guard
//! - Google geocoding, directly or through the bundled proxy server
//! - JSON, text, GPX and directions-URL rendering of the map scene
//!
//! ## Quick Start
//!
//! ```rust
//! use pindrop::coord::{GeoPoint, ViewportRegion};
//! use pindrop::screen::{Role, ScreenState};
//!
//! let mut state = ScreenState::new(ViewportRegion::default());
//! let pickup = state.fix_position(GeoPoint::new(37.7749, -122.4194)).unwrap();
//! state.complete_lookup(pickup, Ok(Some("Market St".to_string())));
//!
//! state.tap(GeoPoint::new(37.8024, -122.4058));
//! assert_eq!(state.route().len(), 2);
//! assert_eq!(state.label(Role::Pickup).text, "Market St");
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod coord;
pub mod error;
pub mod format;
pub mod geo;
pub mod screen;
pub mod server;

// Re-export commonly used types
pub use config::Config;
pub use coord::{GeoPoint, RouteLine, ViewportRegion};
pub use error::{Error, Result};
pub use screen::{LocationPickerScreen, MapScene, ScreenState};
