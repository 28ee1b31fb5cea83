//! Straight-line route between pickup and drop

use crate::constants::geo::EARTH_RADIUS_METERS;
use crate::coord::GeoPoint;
use serde::{Serialize, Serializer};

/// Either no route, or exactly `[pickup, drop]`
///
/// A one-point route cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RouteLine {
    segment: Option<[GeoPoint; 2]>,
}

impl RouteLine {
    /// A route with no points
    pub fn empty() -> Self {
        Self { segment: None }
    }

    /// The two-point route from `pickup` to `drop`
    pub fn between(pickup: GeoPoint, drop: GeoPoint) -> Self {
        Self {
            segment: Some([pickup, drop]),
        }
    }

    /// Ordered points of the route (0 or 2)
    pub fn points(&self) -> &[GeoPoint] {
        match &self.segment {
            Some(segment) => segment.as_slice(),
            None => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.points().len()
    }

    pub fn is_empty(&self) -> bool {
        self.segment.is_none()
    }

    /// Great-circle length of the segment in meters (haversine)
    pub fn distance_meters(&self) -> Option<f64> {
        let [from, to] = self.segment?;

        let lat1 = from.latitude.to_radians();
        let lat2 = to.latitude.to_radians();
        let d_lat = lat2 - lat1;
        let d_lng = (to.longitude - from.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
        Some(2.0 * EARTH_RADIUS_METERS * a.sqrt().asin())
    }
}

impl Serialize for RouteLine {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.points())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_route() {
        let route = RouteLine::empty();
        assert!(route.is_empty());
        assert_eq!(route.len(), 0);
        assert!(route.distance_meters().is_none());
    }

    #[test]
    fn test_route_between() {
        let pickup = GeoPoint::new(37.7749, -122.4194);
        let drop = GeoPoint::new(37.8049, -122.4094);
        let route = RouteLine::between(pickup, drop);

        assert_eq!(route.len(), 2);
        assert_eq!(route.points(), &[pickup, drop]);
    }

    #[test]
    fn test_distance_one_degree_latitude() {
        let route = RouteLine::between(GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 0.0));
        let expected = EARTH_RADIUS_METERS * 1.0_f64.to_radians();
        assert_relative_eq!(route.distance_meters().unwrap(), expected, epsilon = 1e-6);
    }

    #[test]
    fn test_distance_same_point() {
        let p = GeoPoint::new(51.5, -0.12);
        assert_relative_eq!(RouteLine::between(p, p).distance_meters().unwrap(), 0.0);
    }

    #[test]
    fn test_serializes_as_array() {
        let empty = serde_json::to_value(RouteLine::empty()).unwrap();
        assert_eq!(empty, serde_json::json!([]));

        let route = RouteLine::between(GeoPoint::new(1.0, 2.0), GeoPoint::new(3.0, 4.0));
        let value = serde_json::to_value(route).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[1]["latitude"], 3.0);
    }
}
