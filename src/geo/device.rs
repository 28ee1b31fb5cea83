//! Device location service
//!
//! The platform side of the screen: a foreground-permission prompt and a
//! one-shot position query.

use crate::coord::GeoPoint;
use crate::error::{Error, Result};
use crate::geo::ip_location::IpLocationProvider;
use serde::{Deserialize, Serialize};

/// Outcome of a foreground location permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Trait for device location backends
pub trait LocationProvider: Send + Sync {
    /// Ask for foreground location permission
    fn request_foreground_permission(
        &self,
    ) -> impl std::future::Future<Output = PermissionStatus> + Send;

    /// Query the current position once
    fn current_position(&self) -> impl std::future::Future<Output = Result<GeoPoint>> + Send;
}

/// A device with a predetermined permission answer and position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedLocation {
    permission: PermissionStatus,
    position: Option<GeoPoint>,
}

impl FixedLocation {
    /// Permission granted, position available
    pub fn at(position: GeoPoint) -> Self {
        Self {
            permission: PermissionStatus::Granted,
            position: Some(position),
        }
    }

    /// Permission denied
    pub fn denied() -> Self {
        Self {
            permission: PermissionStatus::Denied,
            position: None,
        }
    }

    /// Permission granted, but no position fix
    pub fn unavailable() -> Self {
        Self {
            permission: PermissionStatus::Granted,
            position: None,
        }
    }

    pub fn position(&self) -> Option<GeoPoint> {
        self.position
    }
}

impl LocationProvider for FixedLocation {
    async fn request_foreground_permission(&self) -> PermissionStatus {
        self.permission
    }

    async fn current_position(&self) -> Result<GeoPoint> {
        self.position
            .ok_or_else(|| Error::PositionUnavailable("no position fix".to_string()))
    }
}

/// Location source selected by configuration
#[derive(Debug)]
pub enum DeviceLocation {
    Fixed(FixedLocation),
    Ip(IpLocationProvider),
}

impl LocationProvider for DeviceLocation {
    async fn request_foreground_permission(&self) -> PermissionStatus {
        match self {
            Self::Fixed(fixed) => fixed.request_foreground_permission().await,
            Self::Ip(ip) => ip.request_foreground_permission().await,
        }
    }

    async fn current_position(&self) -> Result<GeoPoint> {
        match self {
            Self::Fixed(fixed) => fixed.current_position().await,
            Self::Ip(ip) => ip.current_position().await,
        }
    }
}
