//! Pick command handler
//!
//! Mounts the location picker, replays taps, waits for addresses and renders
//! the resulting map scene.

use crate::config::Config;
use crate::coord::GeoPoint;
use crate::error::{Error, Result};
use crate::format::url::UrlFormatter;
use crate::format::{available_formats, get_formatter, OutputFormatter};
use crate::geo::{get_geocoder, get_location_provider, DeviceLocation, FixedLocation};
use crate::screen::{LocationPickerScreen, ScreenState};
use clap::Args;

/// Pick command arguments
#[derive(Args)]
pub struct PickArgs {
    /// Device latitude (instead of the configured location source)
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Device longitude
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lng: Option<f64>,

    /// Use IP geolocation as the device position
    #[arg(long, conflicts_with_all = ["lat", "lng"])]
    pub here: bool,

    /// Simulate a denied location permission
    #[arg(long, conflicts_with_all = ["lat", "lng", "here"])]
    pub deny_permission: bool,

    /// Tap the map at LAT,LNG (repeatable; the last tap is the drop point)
    #[arg(long = "tap", value_name = "LAT,LNG", allow_hyphen_values = true)]
    pub taps: Vec<GeoPoint>,

    /// Press the chat button
    #[arg(long)]
    pub chat: bool,

    /// Output format
    #[arg(long, short = 'f', default_value = "text")]
    pub format: String,

    /// Map provider for the url format
    #[arg(long)]
    pub provider: Option<String>,

    /// Write output to file
    #[arg(long, short = 'o')]
    pub output: Option<String>,

    /// List available formats
    #[arg(short = 'F', long = "list-formats")]
    pub list_formats: bool,
}

/// Run the pick command
pub async fn run(args: PickArgs) -> Result<()> {
    if args.list_formats {
        list_formats();
        return Ok(());
    }

    let config = Config::load()?;

    let formatter: Box<dyn OutputFormatter> = match &args.provider {
        Some(provider) if args.format.eq_ignore_ascii_case("url") => {
            Box::new(UrlFormatter::with_provider(provider.clone()))
        }
        _ => get_formatter(&args.format)
            .ok_or_else(|| Error::Config(format!("Unknown format: {}", args.format)))?,
    };

    let state = drive_screen(&args, &config).await?;
    let output = formatter.format(&state.scene(), &config)?;

    if let Some(path) = args.output {
        std::fs::write(&path, &output)?;
        eprintln!("Output written to {}", path);
    } else {
        println!("{}", output);
    }

    // The scene already carries the warning; the exit status reports it too
    if state.permission_denied() {
        return Err(Error::PermissionDenied);
    }

    Ok(())
}

/// Mount the screen, replay taps and wait for every address lookup
async fn drive_screen(args: &PickArgs, config: &Config) -> Result<ScreenState> {
    let location = device_location(args, config)?;
    let geocoder = get_geocoder(config)?;
    let screen = LocationPickerScreen::new(config.initial_region()?, location, geocoder);

    screen.mount().await;
    for tap in &args.taps {
        if !screen.tap(*tap).await {
            eprintln!("Tap at {} ignored: no pickup location", tap);
        }
    }
    if args.chat {
        screen.open_chat();
    }
    screen.settle().await;

    Ok(screen.snapshot().await)
}

/// Pick the device location source from flags, falling back to config
fn device_location(args: &PickArgs, config: &Config) -> Result<DeviceLocation> {
    if args.deny_permission {
        return Ok(DeviceLocation::Fixed(FixedLocation::denied()));
    }
    if let (Some(lat), Some(lng)) = (args.lat, args.lng) {
        let point = GeoPoint::new(lat, lng);
        point.validate()?;
        return Ok(DeviceLocation::Fixed(FixedLocation::at(point)));
    }
    if args.here {
        return Ok(DeviceLocation::Ip(crate::geo::IpLocationProvider::new()?));
    }
    get_location_provider(config)
}

/// Print available output formats
fn list_formats() {
    println!("Available output formats:");
    for format in available_formats() {
        println!("  {:6} - {}", format.name, format.description);
    }
}
