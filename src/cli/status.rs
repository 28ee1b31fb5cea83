//! Status command handler
//!
//! Shows the effective configuration and, optionally, the proxy server status.

use crate::config::Config;
use crate::error::Result;
use crate::server::routes::StatusResponse;
use clap::Args;

/// Status command arguments
#[derive(Args)]
pub struct StatusArgs {
    /// Check if the proxy server is running (tries to connect)
    #[arg(long)]
    pub server: bool,
}

/// Run the status command
pub async fn run(args: StatusArgs) -> Result<()> {
    let config = Config::load()?;

    println!("pindrop v{}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("Geocoding: {}", config.geocoding.provider);
    match config.geocoding.provider.as_str() {
        "google" => println!(
            "  API key: {}",
            if config.google_api_key().is_some() {
                "configured"
            } else {
                "MISSING"
            }
        ),
        _ => println!("  Proxy: {}", config.geocoding.proxy_url),
    }
    println!("  Timeout: {}s", config.geocoding.timeout_secs);
    println!("Location source: {}", config.location.source);
    println!();

    if args.server {
        check_server_status(&config).await;
    }

    Ok(())
}

/// Check if the server is running
async fn check_server_status(config: &Config) {
    let url = format!("http://{}/api/status", config.server_addr());

    match reqwest::get(&url).await {
        Ok(response) if response.status().is_success() => {
            println!("Server: RUNNING on {}", config.server_addr());
            if let Ok(status) = response.json::<StatusResponse>().await {
                println!("  Version: {}", status.version);
                println!("  Geocoder configured: {}", status.geocoder_configured);
                println!("  Uptime: {}s", status.uptime_secs);
            }
        }
        Ok(response) => println!("Server: ERROR (status {})", response.status()),
        Err(_) => println!("Server: NOT RUNNING on {}", config.server_addr()),
    }
}
