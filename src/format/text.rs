//! Human-readable text output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::screen::{MapScene, Marker};

/// Text formatter - outputs human-readable summary
pub struct TextFormatter;

fn describe(marker: &Marker) -> String {
    let address = if marker.pending {
        "(resolving...)"
    } else if marker.address.is_empty() {
        "(no address)"
    } else {
        marker.address.as_str()
    };
    format!(
        "({:.6}, {:.6}) {}",
        marker.coordinate.latitude, marker.coordinate.longitude, address
    )
}

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format(&self, scene: &MapScene, _config: &Config) -> Result<String> {
        let mut output = String::new();

        if let Some(warning) = scene.warning {
            output.push_str(&format!("! {}\n\n", warning));
        }

        let center = scene.region.center();
        output.push_str(&format!(
            "Map: ({:.6}, {:.6}) span {} x {}\n",
            center.latitude,
            center.longitude,
            scene.region.latitude_span(),
            scene.region.longitude_span()
        ));

        if scene.markers.is_empty() {
            output.push_str("No pins\n");
        }
        for marker in &scene.markers {
            let title = marker.title.lines().next().unwrap_or_default();
            output.push_str(&format!("{}: {}\n", title, describe(marker)));
        }

        if let Some(distance) = scene.distance_meters {
            output.push_str(&format!("Straight line: {:.0} m\n", distance));
        }

        Ok(output)
    }
}
