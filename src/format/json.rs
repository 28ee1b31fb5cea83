//! JSON output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::screen::MapScene;

/// JSON formatter - outputs the full scene as pretty-printed JSON
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Full map scene as JSON"
    }

    fn format(&self, scene: &MapScene, _config: &Config) -> Result<String> {
        Ok(serde_json::to_string_pretty(scene)?)
    }
}
