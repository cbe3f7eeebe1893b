//! The location provider.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use culture_core::config::LocationConfig;
use culture_core::{Coordinates, LocationState, LocationStatus};
use culture_places::PointOfInterestCatalog;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::{GeoFailure, LocationError};

/// Options forwarded to the platform geolocation capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    pub max_age: Duration,
}

impl From<&LocationConfig> for PositionOptions {
    fn from(config: &LocationConfig) -> Self {
        Self {
            high_accuracy: config.high_accuracy,
            timeout: Duration::from_millis(config.timeout_ms),
            max_age: Duration::from_millis(config.max_age_ms),
        }
    }
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self::from(&LocationConfig::default())
    }
}

/// Platform geolocation capability.
#[async_trait]
pub trait Geolocation: Send + Sync {
    async fn request_position(&self, options: &PositionOptions) -> Result<Coordinates, GeoFailure>;
}

/// Result of one settled acquisition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Acquisition {
    pub status: LocationStatus,
    /// The detected position, or the default after a failure.
    pub coordinates: Coordinates,
    pub error: Option<LocationError>,
}

/// Resets the in-flight flag even if the acquisition future is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct LocationProvider {
    geolocation: Option<Arc<dyn Geolocation>>,
    options: PositionOptions,
    default_coordinates: Coordinates,
    state: watch::Sender<LocationState>,
    catalog: Arc<PointOfInterestCatalog>,
    in_flight: AtomicBool,
}

impl LocationProvider {
    /// `geolocation` is `None` when the platform has no location capability.
    pub fn new(
        geolocation: Option<Arc<dyn Geolocation>>,
        config: &LocationConfig,
        catalog: Arc<PointOfInterestCatalog>,
    ) -> Self {
        let (state, _) = watch::channel(LocationState::default());
        Self {
            geolocation,
            options: PositionOptions::from(config),
            default_coordinates: config.default_coordinates(),
            state,
            catalog,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<LocationState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> LocationState {
        self.state.borrow().clone()
    }

    pub fn status(&self) -> LocationStatus {
        self.state.borrow().status
    }

    pub fn options(&self) -> &PositionOptions {
        &self.options
    }

    pub fn is_acquiring(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Acquire the current position and refresh the catalog around it.
    ///
    /// Returns `None` without doing anything if an acquisition is already in
    /// flight.
    pub async fn acquire(&self) -> Option<Acquisition> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Location acquisition already in flight");
            return None;
        }
        let _guard = InFlight(&self.in_flight);

        self.state.send_modify(|s| s.status = LocationStatus::Pending);

        let outcome = match &self.geolocation {
            None => Err(LocationError::Unsupported),
            Some(geo) => self.request(geo.as_ref()).await,
        };

        Some(self.settle(outcome))
    }

    /// Manual retry from a settled state.
    ///
    /// Returns `None` while the status is `Pending`, which covers both an
    /// acquisition in flight and a provider that has never acquired.
    pub async fn retry(&self) -> Option<Acquisition> {
        if self.status() == LocationStatus::Pending || self.is_acquiring() {
            debug!("Ignoring retry while location is pending");
            return None;
        }
        info!("Retrying location acquisition");
        self.acquire().await
    }

    async fn request(&self, geo: &dyn Geolocation) -> Result<Coordinates, LocationError> {
        let result = tokio::time::timeout(self.options.timeout, geo.request_position(&self.options))
            .await
            .map_err(|_| LocationError::Timeout)?;

        match result {
            Ok(coords) if coords.is_valid() => Ok(coords),
            Ok(coords) => {
                warn!(lat = coords.lat, lng = coords.lng, "Geolocation returned invalid coordinates");
                Err(LocationError::Unavailable)
            }
            Err(failure) => Err(failure.into()),
        }
    }

    fn settle(&self, outcome: Result<Coordinates, LocationError>) -> Acquisition {
        let acquisition = match outcome {
            Ok(coordinates) => {
                info!(%coordinates, "Location detected");
                Acquisition {
                    status: LocationStatus::Detected,
                    coordinates,
                    error: None,
                }
            }
            Err(e) => {
                warn!(
                    default = %self.default_coordinates,
                    "Location acquisition failed: {}. Using default location.",
                    e
                );
                Acquisition {
                    status: e.status(),
                    coordinates: self.default_coordinates,
                    error: Some(e),
                }
            }
        };

        self.state.send_replace(LocationState::settled(
            acquisition.status,
            acquisition.coordinates,
        ));
        self.catalog.refresh(acquisition.coordinates);
        acquisition
    }
}
