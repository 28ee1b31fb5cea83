//! GPX output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::screen::{MapScene, Marker};

/// GPX formatter - outputs pickup/drop waypoints and the route
pub struct GpxFormatter;

/// Escape text for XML element content or attribute values
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn push_point(gpx: &mut String, tag: &str, indent: &str, marker: &Marker) {
    let name = marker.title.lines().next().unwrap_or_default();
    gpx.push_str(&format!(
        r#"{}<{} lat="{}" lon="{}">"#,
        indent, tag, marker.coordinate.latitude, marker.coordinate.longitude
    ));
    gpx.push('\n');
    gpx.push_str(&format!("{}  <name>{}</name>\n", indent, escape(name)));
    if !marker.address.is_empty() {
        gpx.push_str(&format!("{}  <desc>{}</desc>\n", indent, escape(&marker.address)));
    }
    gpx.push_str(&format!("{}</{}>\n", indent, tag));
}

impl OutputFormatter for GpxFormatter {
    fn name(&self) -> &str {
        "gpx"
    }

    fn description(&self) -> &str {
        "GPX waypoints and route"
    }

    fn format(&self, scene: &MapScene, _config: &Config) -> Result<String> {
        let mut gpx = String::new();

        // XML header
        gpx.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        gpx.push('\n');
        gpx.push_str(r#"<gpx version="1.1" creator="pindrop">"#);
        gpx.push('\n');

        gpx.push_str("  <metadata>\n");
        gpx.push_str("    <name>pindrop trip</name>\n");
        gpx.push_str(&format!("    <time>{}</time>\n", chrono::Utc::now().to_rfc3339()));
        gpx.push_str("  </metadata>\n");

        for marker in &scene.markers {
            push_point(&mut gpx, "wpt", "  ", marker);
        }

        // The route only exists once both pins do
        if scene.polyline.is_some() {
            gpx.push_str("  <rte>\n");
            gpx.push_str("    <name>Pickup to drop</name>\n");
            for marker in &scene.markers {
                push_point(&mut gpx, "rtept", "    ", marker);
            }
            gpx.push_str("  </rte>\n");
        }

        gpx.push_str("</gpx>\n");
        Ok(gpx)
    }
}
