//! Geocode command handler
//!
//! Resolves a single coordinate with the configured geocoder.

use crate::config::Config;
use crate::coord::GeoPoint;
use crate::error::Result;
use crate::geo::{get_geocoder, ReverseGeocoder};
use clap::Args;

/// Geocode command arguments
#[derive(Args)]
pub struct GeocodeArgs {
    /// Latitude
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,
}

/// Run the geocode command
pub async fn run(args: GeocodeArgs) -> Result<()> {
    let point = GeoPoint::new(args.lat, args.lng);
    point.validate()?;

    let config = Config::load()?;
    let geocoder = get_geocoder(&config)?;

    match geocoder.reverse_geocode(point).await? {
        Some(address) => println!("{}", address),
        None => eprintln!("No address found for {}", point),
    }

    Ok(())
}
