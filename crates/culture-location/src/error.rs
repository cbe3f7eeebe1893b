//! Error types for location acquisition.

use culture_core::LocationStatus;
use serde::{Deserialize, Serialize};

/// Reason codes reported by the platform geolocation capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeoFailure {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
}

/// Why an acquisition fell back to the default coordinates.
///
/// Never fatal: the provider substitutes the default reference point and
/// reports the failure only through the status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("location unavailable")]
    Unavailable,
    #[error("location request timed out")]
    Timeout,
    #[error("geolocation is not supported")]
    Unsupported,
}

impl LocationError {
    /// The status this failure settles into.
    pub fn status(&self) -> LocationStatus {
        match self {
            LocationError::PermissionDenied => LocationStatus::Denied,
            LocationError::Unavailable => LocationStatus::Unavailable,
            LocationError::Timeout => LocationStatus::TimedOut,
            LocationError::Unsupported => LocationStatus::Unsupported,
        }
    }
}

impl From<GeoFailure> for LocationError {
    fn from(failure: GeoFailure) -> Self {
        match failure {
            GeoFailure::PermissionDenied => LocationError::PermissionDenied,
            GeoFailure::PositionUnavailable => LocationError::Unavailable,
            GeoFailure::Timeout => LocationError::Timeout,
        }
    }
}
