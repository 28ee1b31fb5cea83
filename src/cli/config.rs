//! Config command handler
//!
//! View and modify configuration settings.

use crate::config::Config;
use crate::error::{Error, Result};
use clap::Args;

/// Config command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Configuration key (e.g., "geocoding.provider")
    pub key: Option<String>,

    /// Value to set (if not provided, shows current value)
    #[arg(allow_hyphen_values = true)]
    pub value: Option<String>,

    /// Show config file path
    #[arg(long)]
    pub path: bool,

    /// Reset config to defaults
    #[arg(long)]
    pub reset: bool,
}

/// Run the config command
pub fn run(args: ConfigArgs) -> Result<()> {
    if args.path {
        let path = Config::config_path()?;
        println!("{}", path.display());
        return Ok(());
    }

    if args.reset {
        Config::default().save()?;
        println!("Configuration reset to defaults");
        return Ok(());
    }

    let mut config = Config::load()?;

    match (&args.key, &args.value) {
        (None, None) => show_all_config(&config),

        (Some(key), None) => match config.get(key) {
            Some(value) if key == "api_keys.google" => println!("{}", mask(&value)),
            Some(value) => println!("{}", value),
            None => {
                eprintln!("Available keys:");
                for k in Config::available_keys() {
                    eprintln!("  {}", k);
                }
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        },

        (Some(key), Some(value)) => {
            config.set(key, value)?;
            config.save()?;
            if key == "api_keys.google" {
                println!("{} = {}", key, mask(value));
            } else {
                println!("{} = {}", key, value);
            }
        }

        // Value without key: not valid
        (None, Some(_)) => {
            return Err(Error::Config("Must specify a key to set a value".to_string()));
        }
    }

    Ok(())
}

fn mask(secret: &str) -> &'static str {
    if secret.is_empty() {
        "\"\" # not configured"
    } else {
        "\"***\" # configured"
    }
}

/// Display all configuration values
fn show_all_config(config: &Config) {
    println!("[map]");
    println!("latitude = {}", config.map.latitude);
    println!("longitude = {}", config.map.longitude);
    println!("latitude_span = {}", config.map.latitude_span);
    println!("longitude_span = {}", config.map.longitude_span);
    println!();

    println!("[geocoding]");
    println!("provider = \"{}\"", config.geocoding.provider);
    println!("endpoint = \"{}\"", config.geocoding.endpoint);
    println!("proxy_url = \"{}\"", config.geocoding.proxy_url);
    println!("timeout_secs = {}", config.geocoding.timeout_secs);
    println!();

    println!("[location]");
    println!("source = \"{}\"", config.location.source);
    println!("latitude = {}", config.location.latitude);
    println!("longitude = {}", config.location.longitude);
    println!();

    println!("[server]");
    println!("host = \"{}\"", config.server.host);
    println!("port = {}", config.server.port);
    println!();

    println!("[url]");
    println!("default = \"{}\"", config.url.default);
    println!();

    println!("[url.providers]");
    for (name, template) in &config.url.providers {
        println!("{} = \"{}\"", name, template);
    }
    println!();

    println!("[api_keys]");
    println!("google = {}", mask(&config.api_keys.google));
}
