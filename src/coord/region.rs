//! Visible map extent

use crate::coord::GeoPoint;
use crate::error::{Error, Result};
use serde::Serialize;

/// Default viewport center latitude (San Francisco)
pub const DEFAULT_CENTER_LATITUDE: f64 = 37.7749;

/// Default viewport center longitude (San Francisco)
pub const DEFAULT_CENTER_LONGITUDE: f64 = -122.4194;

/// Default latitude span in degrees
pub const DEFAULT_LATITUDE_SPAN: f64 = 0.0922;

/// Default longitude span in degrees
pub const DEFAULT_LONGITUDE_SPAN: f64 = 0.0421;

/// The visible map extent: a center and the spans around it
///
/// Spans are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewportRegion {
    center_latitude: f64,
    center_longitude: f64,
    latitude_span: f64,
    longitude_span: f64,
}

impl ViewportRegion {
    /// Create a region, rejecting non-positive or non-finite spans
    pub fn new(center: GeoPoint, latitude_span: f64, longitude_span: f64) -> Result<Self> {
        center.validate()?;
        for (name, span) in [("latitude", latitude_span), ("longitude", longitude_span)] {
            if !span.is_finite() || span <= 0.0 {
                return Err(Error::InvalidRegion(format!(
                    "{} span must be positive, got {}",
                    name, span
                )));
            }
        }
        Ok(Self {
            center_latitude: center.latitude,
            center_longitude: center.longitude,
            latitude_span,
            longitude_span,
        })
    }

    /// Center of the region
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(self.center_latitude, self.center_longitude)
    }

    pub fn latitude_span(&self) -> f64 {
        self.latitude_span
    }

    pub fn longitude_span(&self) -> f64 {
        self.longitude_span
    }

    /// Same spans, new center
    pub fn recentered(&self, center: GeoPoint) -> Self {
        Self {
            center_latitude: center.latitude,
            center_longitude: center.longitude,
            ..*self
        }
    }
}

impl Default for ViewportRegion {
    fn default() -> Self {
        Self {
            center_latitude: DEFAULT_CENTER_LATITUDE,
            center_longitude: DEFAULT_CENTER_LONGITUDE,
            latitude_span: DEFAULT_LATITUDE_SPAN,
            longitude_span: DEFAULT_LONGITUDE_SPAN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_region() {
        let region = ViewportRegion::default();
        assert_eq!(region.center(), GeoPoint::new(37.7749, -122.4194));
        assert_eq!(region.latitude_span(), 0.0922);
        assert_eq!(region.longitude_span(), 0.0421);
    }

    #[test]
    fn test_rejects_non_positive_spans() {
        let center = GeoPoint::new(0.0, 0.0);
        assert!(ViewportRegion::new(center, 0.0, 0.1).is_err());
        assert!(ViewportRegion::new(center, 0.1, -0.1).is_err());
        assert!(ViewportRegion::new(center, f64::NAN, 0.1).is_err());
        assert!(ViewportRegion::new(center, 0.1, 0.1).is_ok());
    }

    #[test]
    fn test_rejects_invalid_center() {
        assert!(ViewportRegion::new(GeoPoint::new(100.0, 0.0), 0.1, 0.1).is_err());
    }

    #[test]
    fn test_recentered_keeps_spans() {
        let region = ViewportRegion::new(GeoPoint::new(0.0, 0.0), 0.5, 0.25).unwrap();
        let moved = region.recentered(GeoPoint::new(51.5, -0.12));

        assert_eq!(moved.center(), GeoPoint::new(51.5, -0.12));
        assert_eq!(moved.latitude_span(), 0.5);
        assert_eq!(moved.longitude_span(), 0.25);
    }
}
