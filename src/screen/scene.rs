//! Render model for the map surface
//!
//! A `MapScene` is everything the map view needs to draw one frame: the
//! viewport, labeled pins, the route polyline and the permission warning.

use crate::constants::style::{
    DROP_PIN_COLOR, DROP_TITLE, PERMISSION_WARNING, PICKUP_PIN_COLOR, PICKUP_TITLE,
    ROUTE_STROKE_COLOR, ROUTE_STROKE_WIDTH,
};
use crate::coord::{GeoPoint, ViewportRegion};
use crate::screen::state::{Role, ScreenState};
use serde::Serialize;

/// A labeled pin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub role: Role,
    pub coordinate: GeoPoint,
    /// Title line followed by the resolved address
    pub title: String,
    pub address: String,
    pub pending: bool,
    pub color: &'static str,
}

/// The route line as drawn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polyline {
    pub coordinates: Vec<GeoPoint>,
    pub stroke_color: &'static str,
    pub stroke_width: u32,
}

/// One frame of the map surface
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapScene {
    pub region: ViewportRegion,
    pub markers: Vec<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polyline: Option<Polyline>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<&'static str>,
    /// Straight-line pickup to drop distance, when both exist
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<f64>,
}

impl MapScene {
    pub fn marker(&self, role: Role) -> Option<&Marker> {
        self.markers.iter().find(|m| m.role == role)
    }
}

impl ScreenState {
    /// Build the map surface frame for the current state
    pub fn scene(&self) -> MapScene {
        let mut markers = Vec::with_capacity(2);

        let pins = [
            (Role::Pickup, self.pickup(), PICKUP_TITLE, PICKUP_PIN_COLOR),
            (Role::Drop, self.drop_point(), DROP_TITLE, DROP_PIN_COLOR),
        ];
        for (role, point, title, color) in pins {
            let Some(coordinate) = point else { continue };
            let label = self.label(role);
            markers.push(Marker {
                role,
                coordinate,
                title: format!("{}\n{}", title, label.text),
                address: label.text.clone(),
                pending: label.pending,
                color,
            });
        }

        let route = self.route();
        let polyline = (route.len() > 1).then(|| Polyline {
            coordinates: route.points().to_vec(),
            stroke_color: ROUTE_STROKE_COLOR,
            stroke_width: ROUTE_STROKE_WIDTH,
        });

        MapScene {
            region: self.region(),
            markers,
            polyline,
            warning: self.permission_denied().then_some(PERMISSION_WARNING),
            distance_meters: route.distance_meters(),
        }
    }
}
