//! Point-of-interest catalog for CultureGuide.
//!
//! Holds the current point set (static seed, generated nearby set, or live
//! search results), publishes every replacement over a watch channel, and
//! owns the map's re-center target.

pub mod catalog;
pub mod error;
pub mod generator;
pub mod search;

pub use catalog::{parse_category_filter, PointOfInterestCatalog};
pub use error::SearchError;
pub use generator::{nearby_points, seed_points};
pub use search::{PlaceRecord, PlacesClient, PlacesResponse, PlacesSearch};
