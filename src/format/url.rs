//! URL output formatter

use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::OutputFormatter;
use crate::screen::{MapScene, Role};

/// URL formatter - outputs a directions link from pickup to drop
#[derive(Debug, Default)]
pub struct UrlFormatter {
    /// Provider override; the config default is used when None
    pub provider: Option<String>,
}

impl UrlFormatter {
    pub fn with_provider(provider: impl Into<String>) -> Self {
        Self {
            provider: Some(provider.into()),
        }
    }
}

impl OutputFormatter for UrlFormatter {
    fn name(&self) -> &str {
        "url"
    }

    fn description(&self) -> &str {
        "Directions URL from pickup to drop"
    }

    fn format(&self, scene: &MapScene, config: &Config) -> Result<String> {
        let pickup = scene
            .marker(Role::Pickup)
            .ok_or_else(|| Error::Config("No pickup location to link".to_string()))?;
        let drop = scene
            .marker(Role::Drop)
            .ok_or_else(|| Error::Config("No drop location to link".to_string()))?;

        config.format_url(self.provider.as_deref(), pickup.coordinate, drop.coordinate)
    }
}
