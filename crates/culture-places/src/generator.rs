//! Static seed and deterministic nearby-point generation.
//!
//! Stands in for a real nearby lookup when no search has been run. The
//! generated set is a pure function of the center.

use culture_core::{Category, Coordinates, PointOfInterest};

struct SeedEntry {
    name: &'static str,
    category: Category,
    lat: f64,
    lng: f64,
    description: &'static str,
}

const SEED: [SeedEntry; 6] = [
    SeedEntry {
        name: "Historical Museum",
        category: Category::Museum,
        lat: 40.7128,
        lng: -74.006,
        description: "Local history and artifacts museum",
    },
    SeedEntry {
        name: "Cultural Theater",
        category: Category::Performance,
        lat: 40.7145,
        lng: -74.0082,
        description: "Traditional performances venue",
    },
    SeedEntry {
        name: "Traditional Market",
        category: Category::Local,
        lat: 40.711,
        lng: -74.0095,
        description: "Local food and crafts market",
    },
    SeedEntry {
        name: "Heritage Site",
        category: Category::Historical,
        lat: 40.7135,
        lng: -74.0045,
        description: "UNESCO World Heritage site",
    },
    SeedEntry {
        name: "Art Gallery",
        category: Category::Museum,
        lat: 40.715,
        lng: -74.007,
        description: "Contemporary local art gallery",
    },
    SeedEntry {
        name: "Craft Workshop",
        category: Category::Workshop,
        lat: 40.7105,
        lng: -74.0055,
        description: "Traditional craft workshops",
    },
];

struct NearbyEntry {
    name: &'static str,
    category: Category,
    dlat: f64,
    dlng: f64,
    description: &'static str,
    distance: &'static str,
    rating: f32,
}

const NEARBY: [NearbyEntry; 20] = [
    NearbyEntry {
        name: "Historic Downtown Art District",
        category: Category::Historical,
        dlat: 0.08,
        dlng: 0.05,
        description: "Victorian-era buildings housing galleries, cafes, and artisan shops",
        distance: "12.3 km",
        rating: 4.8,
    },
    NearbyEntry {
        name: "Regional Heritage Museum",
        category: Category::Museum,
        dlat: -0.06,
        dlng: 0.12,
        description: "Interactive exhibits on regional history and indigenous culture",
        distance: "15.7 km",
        rating: 4.7,
    },
    NearbyEntry {
        name: "Riverside Cultural Center",
        category: Category::Performance,
        dlat: 0.15,
        dlng: -0.08,
        description: "Live music, theater performances, and cultural festivals",
        distance: "18.9 km",
        rating: 4.9,
    },
    NearbyEntry {
        name: "Central Farmers Market",
        category: Category::Local,
        dlat: -0.04,
        dlng: -0.07,
        description: "Local craftspeople, organic foods, and traditional cooking demos",
        distance: "8.2 km",
        rating: 4.6,
    },
    NearbyEntry {
        name: "Modern Art Gallery",
        category: Category::Museum,
        dlat: 0.11,
        dlng: 0.14,
        description: "Contemporary works by emerging local and international artists",
        distance: "19.4 km",
        rating: 4.5,
    },
    NearbyEntry {
        name: "Traditional Craft Village",
        category: Category::Workshop,
        dlat: -0.13,
        dlng: 0.06,
        description: "Pottery, weaving, and woodworking workshops with master artisans",
        distance: "16.8 km",
        rating: 4.8,
    },
    NearbyEntry {
        name: "Historic Cemetery & Chapel",
        category: Category::Historical,
        dlat: 0.03,
        dlng: 0.05,
        description: "19th-century cemetery with notable graves and historic chapel",
        distance: "5.1 km",
        rating: 4.4,
    },
    NearbyEntry {
        name: "Botanical Gardens",
        category: Category::Local,
        dlat: -0.09,
        dlng: -0.16,
        description: "Native plant gardens with outdoor concerts and art installations",
        distance: "19.7 km",
        rating: 4.7,
    },
    NearbyEntry {
        name: "Old Town Square",
        category: Category::Historical,
        dlat: 0.02,
        dlng: -0.03,
        description: "Historic town center with colonial architecture and weekend markets",
        distance: "3.8 km",
        rating: 4.6,
    },
    NearbyEntry {
        name: "Science & Discovery Center",
        category: Category::Museum,
        dlat: -0.08,
        dlng: 0.09,
        description: "Interactive science exhibits and planetarium shows",
        distance: "13.2 km",
        rating: 4.3,
    },
    NearbyEntry {
        name: "Community Theater",
        category: Category::Performance,
        dlat: 0.05,
        dlng: 0.08,
        description: "Local theater productions and musical performances",
        distance: "9.7 km",
        rating: 4.4,
    },
    NearbyEntry {
        name: "Antique District",
        category: Category::Local,
        dlat: -0.02,
        dlng: 0.04,
        description: "Historic antique shops and vintage collectibles",
        distance: "4.5 km",
        rating: 4.2,
    },
    NearbyEntry {
        name: "Lakeside Park & Amphitheater",
        category: Category::Performance,
        dlat: 0.12,
        dlng: 0.02,
        description: "Outdoor concerts and festivals by the lake",
        distance: "14.1 km",
        rating: 4.8,
    },
    NearbyEntry {
        name: "Historic Mill & Museum",
        category: Category::Historical,
        dlat: -0.07,
        dlng: -0.11,
        description: "Restored 1800s gristmill with working demonstrations",
        distance: "12.9 km",
        rating: 4.5,
    },
    NearbyEntry {
        name: "Cultural Heritage Trail",
        category: Category::Historical,
        dlat: 0.06,
        dlng: -0.05,
        description: "Self-guided walking trail through historic neighborhoods",
        distance: "7.8 km",
        rating: 4.3,
    },
    NearbyEntry {
        name: "Artisan Brewery & Tours",
        category: Category::Local,
        dlat: -0.05,
        dlng: 0.07,
        description: "Local craft brewery with tours and tasting rooms",
        distance: "8.9 km",
        rating: 4.6,
    },
    NearbyEntry {
        name: "Children's Discovery Museum",
        category: Category::Museum,
        dlat: 0.04,
        dlng: 0.11,
        description: "Interactive exhibits and hands-on learning for families",
        distance: "11.8 km",
        rating: 4.7,
    },
    NearbyEntry {
        name: "Historic Train Station",
        category: Category::Historical,
        dlat: -0.03,
        dlng: -0.09,
        description: "Restored 1920s train station with railway museum",
        distance: "9.4 km",
        rating: 4.4,
    },
    NearbyEntry {
        name: "Local Music Venue",
        category: Category::Performance,
        dlat: 0.07,
        dlng: 0.06,
        description: "Intimate venue featuring local and touring musicians",
        distance: "10.2 km",
        rating: 4.5,
    },
    NearbyEntry {
        name: "Sculpture Garden",
        category: Category::Museum,
        dlat: -0.1,
        dlng: 0.03,
        description: "Outdoor sculpture park with rotating contemporary installations",
        distance: "11.1 km",
        rating: 4.6,
    },
];

/// The fixed points shown before any location is known.
pub fn seed_points() -> Vec<PointOfInterest> {
    SEED.iter()
        .enumerate()
        .map(|(i, e)| PointOfInterest {
            id: (i + 1).to_string(),
            name: e.name.to_string(),
            description: e.description.to_string(),
            coordinates: Coordinates::new(e.lat, e.lng),
            category: e.category,
            distance: None,
            rating: None,
        })
        .collect()
}

/// Generate the nearby set around `center`.
///
/// Same center, same output. Offsets wrap at the antimeridian and clamp at
/// the poles. Ids run `"1"` through `"20"`.
pub fn nearby_points(center: Coordinates) -> Vec<PointOfInterest> {
    NEARBY
        .iter()
        .enumerate()
        .map(|(i, e)| PointOfInterest {
            id: (i + 1).to_string(),
            name: e.name.to_string(),
            description: e.description.to_string(),
            coordinates: center.offset(e.dlat, e.dlng),
            category: e.category,
            distance: Some(e.distance.to_string()),
            rating: Some(e.rating),
        })
        .collect()
}
