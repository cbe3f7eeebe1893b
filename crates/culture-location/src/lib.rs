//! Location acquisition for CultureGuide.
//!
//! Sole writer of the shared location state. Every settled acquisition,
//! successful or not, publishes a usable coordinate and triggers exactly one
//! catalog refresh.

pub mod error;
pub mod provider;

pub use error::{GeoFailure, LocationError};
pub use provider::{Acquisition, Geolocation, LocationProvider, PositionOptions};
