use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Mean Earth radius used for great-circle distances.
const EARTH_RADIUS_KM: f64 = 6371.0;

// =============================================================================
// Coordinates
// =============================================================================

/// A WGS84 position in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Fixed reference point substituted whenever no real position is known.
    pub const DEFAULT: Coordinates = Coordinates {
        lat: 40.7128,
        lng: -74.0060,
    };

    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Build coordinates, rejecting values outside the WGS84 ranges.
    pub fn try_new(lat: f64, lng: f64) -> Result<Self, CoreError> {
        let coords = Self { lat, lng };
        if coords.is_valid() {
            Ok(coords)
        } else {
            Err(CoreError::InvalidCoordinates { lat, lng })
        }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Shift by fixed degree deltas.
    ///
    /// Latitude is clamped at the poles and longitude wraps across the
    /// antimeridian, so a valid origin always yields a valid result.
    pub fn offset(&self, dlat: f64, dlng: f64) -> Self {
        let mut lng = self.lng + dlng;
        if lng > 180.0 {
            lng -= 360.0;
        } else if lng < -180.0 {
            lng += 360.0;
        }
        Self {
            lat: (self.lat + dlat).clamp(-90.0, 90.0),
            lng,
        }
    }

    /// Great-circle (haversine) distance in kilometres.
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        const EPSILON: f64 = 1e-10;
        if (self.lat - other.lat).abs() < EPSILON && (self.lng - other.lng).abs() < EPSILON {
            return 0.0;
        }

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lng = (other.lng - self.lng).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();
        EARTH_RADIUS_KM * c
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lng)
    }
}

// =============================================================================
// LocationStatus
// =============================================================================

/// Outcome of the most recent location acquisition.
///
/// `Pending -> Detected` on success, `Pending -> {Denied, Unavailable,
/// TimedOut, Unsupported}` on failure. A manual retry re-enters `Pending`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationStatus {
    #[default]
    Pending,
    Detected,
    Denied,
    Unavailable,
    TimedOut,
    Unsupported,
}

impl LocationStatus {
    /// True once acquisition has finished, successfully or not.
    pub fn is_settled(&self) -> bool {
        !matches!(self, LocationStatus::Pending)
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            LocationStatus::Denied
                | LocationStatus::Unavailable
                | LocationStatus::TimedOut
                | LocationStatus::Unsupported
        )
    }

    /// Short status-indicator text.
    pub fn label(&self) -> &'static str {
        match self {
            LocationStatus::Pending => "Getting location...",
            LocationStatus::Detected => "Location detected",
            LocationStatus::Denied => "Location access denied",
            LocationStatus::Unavailable => "Location unavailable",
            LocationStatus::TimedOut => "Location timeout",
            LocationStatus::Unsupported => "Geolocation not supported",
        }
    }
}

impl fmt::Display for LocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Location as published to readers: the status plus the position in effect.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationState {
    pub coordinates: Option<Coordinates>,
    pub status: LocationStatus,
}

impl LocationState {
    pub fn settled(status: LocationStatus, coordinates: Coordinates) -> Self {
        Self {
            coordinates: Some(coordinates),
            status,
        }
    }

    /// Coordinates usable for directions: only after acquisition settled.
    pub fn settled_coordinates(&self) -> Option<Coordinates> {
        if self.status.is_settled() {
            self.coordinates
        } else {
            None
        }
    }
}

// =============================================================================
// Category
// =============================================================================

/// Kind of cultural point of interest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Museum,
    Performance,
    Local,
    Historical,
    Workshop,
    Gallery,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Museum,
        Category::Performance,
        Category::Local,
        Category::Historical,
        Category::Workshop,
        Category::Gallery,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Museum => "museum",
            Category::Performance => "performance",
            Category::Local => "local",
            Category::Historical => "historical",
            Category::Workshop => "workshop",
            Category::Gallery => "gallery",
        }
    }

    /// Marker fill color for the map view.
    pub fn marker_color(&self) -> &'static str {
        match self {
            Category::Museum => "#2563eb",
            Category::Performance => "#7c3aed",
            Category::Local => "#f59e0b",
            Category::Historical => "#10b981",
            Category::Workshop => "#ef4444",
            Category::Gallery => "#8b5cf6",
        }
    }

    /// Infer a category from a free-form provider label such as "Art museum".
    ///
    /// Keywords match whole words only. Unrecognised labels map to `Local`.
    pub fn from_provider_label(label: &str) -> Category {
        LABEL_PATTERNS
            .iter()
            .find(|(_, re)| re.is_match(label))
            .map(|(category, _)| *category)
            .unwrap_or(Category::Local)
    }
}

/// Label keywords, checked in order.
static LABEL_PATTERNS: LazyLock<Vec<(Category, Regex)>> = LazyLock::new(|| {
    let mk = |p: &str| Regex::new(&format!(r"(?i)\b(?:{})\b", p)).expect("Invalid label regex");
    vec![
        (Category::Museum, mk(r"museums?")),
        (Category::Gallery, mk(r"galler(?:y|ies)|art")),
        (
            Category::Performance,
            mk(r"theat(?:er|re)s?|concerts?|opera|music(?:al)?|performing"),
        ),
        (
            Category::Historical,
            mk(r"historic(?:al)?|monuments?|heritage|landmarks?|memorials?"),
        ),
        (
            Category::Workshop,
            mk(r"workshops?|crafts?|class(?:es)?|studios?"),
        ),
    ]
});

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "museum" => Ok(Category::Museum),
            "performance" => Ok(Category::Performance),
            "local" => Ok(Category::Local),
            "historical" => Ok(Category::Historical),
            "workshop" => Ok(Category::Workshop),
            "gallery" => Ok(Category::Gallery),
            other => Err(format!("Unknown category: {}", other)),
        }
    }
}

// =============================================================================
// PointOfInterest
// =============================================================================

/// A named place shown on the map and referenced in conversation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    /// Unique within one catalog snapshot.
    pub id: String,
    pub name: String,
    pub description: String,
    pub coordinates: Coordinates,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<String>,
    /// In `[0, 5]` when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
}

impl PointOfInterest {
    /// Normalise a provider rating into `[0, 5]`, dropping non-finite values.
    pub fn clamp_rating(rating: Option<f32>) -> Option<f32> {
        rating.filter(|r| r.is_finite()).map(|r| r.clamp(0.0, 5.0))
    }
}

// =============================================================================
// Catalog snapshot
// =============================================================================

/// Where the current point set came from.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogSource {
    /// Static seed installed before any refresh.
    #[default]
    Seed,
    /// Deterministic nearby set generated around a center.
    Generated { center: Coordinates },
    /// Live places-search results.
    Search {
        query: String,
        category: Option<Category>,
    },
}

/// One complete, immutable point set. Replaced wholesale, never patched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    /// Increments by one on every replace-all.
    pub revision: u64,
    pub source: CatalogSource,
    pub points: Vec<PointOfInterest>,
}

impl CatalogSnapshot {
    pub fn find(&self, id: &str) -> Option<&PointOfInterest> {
        self.points.iter().find(|p| p.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

// =============================================================================
// ConversationContext
// =============================================================================

/// Read-only view of location and nearby points for answer generation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConversationContext {
    pub location: Option<Coordinates>,
    pub points: Vec<PointOfInterest>,
    pub status: LocationStatus,
}

impl ConversationContext {
    pub fn new(
        location: Option<Coordinates>,
        points: Vec<PointOfInterest>,
        status: LocationStatus,
    ) -> Self {
        Self {
            location,
            points,
            status,
        }
    }
}
