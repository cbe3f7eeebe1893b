//! Map view synchronization and marker actions for CultureGuide.

pub mod commands;
pub mod directions;
pub mod error;
pub mod view;

pub use commands::{ActiveView, MarkerCommand, MarkerDispatcher, MarkerOutcome, Notice};
pub use directions::{directions_url, DirectionsOpener};
pub use error::MapError;
pub use view::{MapView, MapViewSync, Marker, Viewport};
