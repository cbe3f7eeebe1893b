//! Offline canned-answer generation.
//!
//! The always-available answer source: pure, deterministic, and free of I/O.
//! Two tones share one intent table.

use culture_core::{Category, ConversationContext, PointOfInterest};

use crate::intent::{Intent, IntentClassifier};
use crate::types::Tone;

/// Maximum number of catalog entries quoted in one answer.
const MAX_MENTIONS: usize = 3;

const NEUTRAL_OVERVIEW: &str = "I can help you with information about cultural activities, local \
experiences, navigation, festivals, and creating personalized itineraries. Could you please be \
more specific about what you'd like to know?";

const ENTHUSIASTIC_OVERVIEW: &str = "I am here to tell you about amazing locations and the \
incredibly fun activities you can experience there. Could you mention a specific place or area \
you are interested in?";

#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseSynthesizer {
    tone: Tone,
    classifier: IntentClassifier,
}

impl ResponseSynthesizer {
    pub fn new(tone: Tone) -> Self {
        Self {
            tone,
            classifier: IntentClassifier::new(tone),
        }
    }

    /// Answer `text` from `context` alone.
    pub fn synthesize(&self, text: &str, context: &ConversationContext) -> String {
        let Some(intent) = self.classifier.classify(text) else {
            return self.overview().to_string();
        };

        let has_context = context.location.is_some() && !context.points.is_empty();
        if !has_context {
            return self.no_context(intent).to_string();
        }

        match self.tone {
            Tone::Neutral => neutral(intent, context),
            Tone::Enthusiastic => enthusiastic(intent, context),
        }
    }

    fn overview(&self) -> &'static str {
        match self.tone {
            Tone::Neutral => NEUTRAL_OVERVIEW,
            Tone::Enthusiastic => ENTHUSIASTIC_OVERVIEW,
        }
    }

    fn no_context(&self, intent: Intent) -> &'static str {
        match (self.tone, intent) {
            (Tone::Neutral, Intent::Nearby) => {
                "I need access to your location to show nearby activities. Please enable location \
                 services and try again."
            }
            (Tone::Neutral, Intent::Activity) => {
                "Based on your interests, I recommend these cultural activities: 1) Historical \
                 Museum (open 9AM-6PM), 2) Traditional Pottery Workshop (hands-on experience), 3) \
                 Cultural Theater (nightly performances). Would you like more details about any \
                 of these?"
            }
            (Tone::Neutral, Intent::Food) => {
                "For authentic local cuisine, I recommend: 1) Traditional Market for street food, \
                 2) Family-run restaurant in the old town, 3) Cooking class to learn local \
                 recipes. The market is open daily from 6AM-8PM."
            }
            (Tone::Neutral, Intent::Directions) => {
                "I can provide directions to any cultural site! Choose Get Directions on any map \
                 marker, or tell me which specific location you'd like to visit."
            }
            (Tone::Neutral, Intent::Festival) => {
                "This month's cultural festivals: 1) Traditional Dance Festival (weekend, free \
                 entry), 2) Food & Culture Fair (next Saturday), 3) Heritage Day (guided tours). \
                 Check the activities section for details."
            }
            (Tone::Neutral, Intent::Itinerary) => {
                "For a 3-day cultural itinerary: Day 1: Historical sites & museum. Day 2: \
                 Workshop & local market. Day 3: Cultural performance & heritage tour. I can \
                 customize this based on your preferences."
            }
            (Tone::Neutral, Intent::Location) => {
                "I don't have access to your location. Please enable location services to get \
                 personalized recommendations."
            }
            (Tone::Enthusiastic, Intent::Nearby) => {
                "I need access to your location to show you the amazing activities nearby. Please \
                 enable location services to discover fun experiences around you."
            }
            (Tone::Enthusiastic, Intent::Activity) => {
                "Tell me a location, and I will share the most amazing and fun activities you can \
                 do there."
            }
            (Tone::Enthusiastic, Intent::Food) => {
                "Local markets and family-run kitchens are where the most delicious adventures \
                 happen. Share your location and I will point you to the tastiest spots around."
            }
            (Tone::Enthusiastic, Intent::Directions) => {
                "Getting there is half the fun! Pick any marker on the map and choose Get \
                 Directions, or tell me which place you want to reach."
            }
            (Tone::Enthusiastic, Intent::Festival) => {
                "Festivals are the most exciting way to experience a place. Share your location \
                 and I will find the venues where the celebrations happen."
            }
            (Tone::Enthusiastic, Intent::Itinerary) => {
                "An unforgettable trip starts with the right places. Share your location and I \
                 will build a fun plan around the best spots nearby."
            }
            (Tone::Enthusiastic, Intent::Location) => {
                "I need your location to tell you about the incredible places around you. Please \
                 enable location services so we can start exploring."
            }
        }
    }
}

/// Up to three points, entries of `preferred` first, otherwise catalog order.
fn pick(points: &[PointOfInterest], preferred: Option<Category>) -> Vec<&PointOfInterest> {
    let Some(category) = preferred else {
        return points.iter().take(MAX_MENTIONS).collect();
    };
    points
        .iter()
        .filter(|p| p.category == category)
        .chain(points.iter().filter(|p| p.category != category))
        .take(MAX_MENTIONS)
        .collect()
}

/// `Name (12.3 km, 4.8★)`, omitting whatever is absent.
fn mention(point: &PointOfInterest) -> String {
    let mut details = Vec::new();
    if let Some(d) = &point.distance {
        details.push(d.clone());
    }
    if let Some(r) = point.rating {
        details.push(format!("{:.1}★", r));
    }
    if details.is_empty() {
        point.name.clone()
    } else {
        format!("{} ({})", point.name, details.join(", "))
    }
}

fn mention_list(points: &[&PointOfInterest]) -> String {
    points
        .iter()
        .map(|p| mention(p))
        .collect::<Vec<_>>()
        .join(", ")
}

fn neutral(intent: Intent, ctx: &ConversationContext) -> String {
    match intent {
        Intent::Nearby => format!(
            "Based on your current location, here are nearby cultural activities: {}. Would you \
             like more details about any of these?",
            mention_list(&pick(&ctx.points, None))
        ),
        Intent::Activity => format!(
            "Based on your location, I recommend: {}. Ask me for directions to any of them.",
            mention_list(&pick(&ctx.points, None))
        ),
        Intent::Food => format!(
            "For authentic local food, start with {}. Local markets and family-run restaurants \
             are the best way to taste traditional recipes.",
            mention_list(&pick(&ctx.points, Some(Category::Local)))
        ),
        Intent::Directions => format!(
            "I can provide directions to any cultural site, including {}. Choose Get Directions \
             on a map marker, or tell me which place you'd like to visit.",
            mention_list(&pick(&ctx.points, None))
        ),
        Intent::Festival => format!(
            "Cultural events and festivals are hosted at {}. Check their schedules for \
             performances this month.",
            mention_list(&pick(&ctx.points, Some(Category::Performance)))
        ),
        Intent::Itinerary => {
            let days: Vec<String> = pick(&ctx.points, None)
                .iter()
                .enumerate()
                .map(|(i, p)| format!("Day {}: {}.", i + 1, mention(p)))
                .collect();
            format!(
                "For a {}-day cultural itinerary: {} I can customize this based on your \
                 preferences.",
                days.len(),
                days.join(" ")
            )
        }
        Intent::Location => {
            let mut answer = String::new();
            if let Some(loc) = ctx.location {
                answer.push_str(&format!("You are currently at coordinates {}. ", loc));
            }
            if ctx.status.is_failure() {
                answer.push_str(&format!(
                    "{}, so I'm showing a default area. ",
                    ctx.status.label()
                ));
            }
            answer.push_str(&format!(
                "I've found {} cultural activities near your location!",
                ctx.points.len()
            ));
            answer
        }
    }
}

fn enthusiastic(intent: Intent, ctx: &ConversationContext) -> String {
    match intent {
        Intent::Nearby => {
            let mut answer = String::from("Right around you, there are some amazing activities. ");
            for p in pick(&ctx.points, None) {
                answer.push_str(&format!(
                    "At {} which is {} you can enjoy {}. ",
                    p.name,
                    p.distance.as_deref().unwrap_or("just steps away"),
                    lowercase_first(&p.description)
                ));
                if let Some(r) = p.rating {
                    answer.push_str(&format!("With a {:.1} star rating, it's incredibly fun. ", r));
                }
            }
            answer.push_str("Which location sounds most exciting to you?");
            answer
        }
        Intent::Activity => {
            let mut answer = String::from("Here are some fantastic activities at amazing locations. ");
            for p in pick(&ctx.points, None) {
                answer.push_str(&format!(
                    "{} offers {}. ",
                    p.name,
                    lowercase_first(&p.description)
                ));
                if let Some(d) = &p.distance {
                    answer.push_str(&format!(
                        "Located {} away, this is an absolutely fun experience. ",
                        d
                    ));
                }
            }
            answer.push_str("These locations promise unforgettable adventures.");
            answer
        }
        Intent::Food => format!(
            "Get ready for a delicious adventure! {} will treat you to amazing local flavors. \
             Which one makes your mouth water?",
            joined_names(&pick(&ctx.points, Some(Category::Local)))
        ),
        Intent::Directions => format!(
            "Getting there is half the fun! Pick {} on the map and choose Get Directions to \
             start your adventure.",
            joined_names(&pick(&ctx.points, None))
        ),
        Intent::Festival => format!(
            "The celebrations at {} are absolutely electric. Check their schedules and join the \
             fun!",
            joined_names(&pick(&ctx.points, Some(Category::Performance)))
        ),
        Intent::Itinerary => {
            let days: Vec<String> = pick(&ctx.points, None)
                .iter()
                .enumerate()
                .map(|(i, p)| format!("Day {} is all about {}.", i + 1, p.name))
                .collect();
            format!(
                "Here is an unforgettable plan! {} Every stop is packed with fun.",
                days.join(" ")
            )
        }
        Intent::Location => {
            let names: Vec<&PointOfInterest> = ctx.points.iter().take(2).collect();
            format!(
                "The {} locations are absolutely incredible. At these places, you will find \
                 amazing cultural experiences that are so much fun. Which specific location \
                 would you like to explore?",
                joined_names(&names)
            )
        }
    }
}

/// `A`, `A and B`, `A, B and C`.
fn joined_names(points: &[&PointOfInterest]) -> String {
    match points {
        [] => String::new(),
        [only] => only.name.clone(),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(|p| p.name.as_str()).collect();
            format!("{} and {}", head.join(", "), last.name)
        }
    }
}

fn lowercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use culture_core::{Coordinates, LocationStatus};

    fn poi(name: &str, category: Category, distance: Option<&str>, rating: Option<f32>) -> PointOfInterest {
        PointOfInterest {
            id: name.to_lowercase(),
            name: name.to_string(),
            description: "Live music and theater".to_string(),
            coordinates: Coordinates::DEFAULT,
            category,
            distance: distance.map(String::from),
            rating,
        }
    }

    fn context() -> ConversationContext {
        ConversationContext::new(
            Some(Coordinates::new(40.7128, -74.006)),
            vec![
                poi("Riverside Cultural Center", Category::Performance, Some("18.9 km"), Some(4.9)),
                poi("Central Farmers Market", Category::Local, Some("8.2 km"), Some(4.6)),
                poi("Modern Art Gallery", Category::Museum, None, None),
                poi("Old Town Square", Category::Historical, Some("3.8 km"), Some(4.6)),
            ],
            LocationStatus::Detected,
        )
    }

    #[test]
    fn test_deterministic() {
        let s = ResponseSynthesizer::new(Tone::Neutral);
        let ctx = context();
        for text in ["what cultural activities are near me", "food?", "xyz"] {
            assert_eq!(s.synthesize(text, &ctx), s.synthesize(text, &ctx));
        }
    }

    #[test]
    fn test_nearby_mentions_catalog_entries() {
        let ctx = context();
        for tone in [Tone::Neutral, Tone::Enthusiastic] {
            let answer = ResponseSynthesizer::new(tone)
                .synthesize("what cultural activities are near me", &ctx);
            assert!(answer.contains("Riverside Cultural Center"), "{}", answer);
            assert!(!answer.contains("Old Town Square"), "at most three entries");
        }
    }

    #[test]
    fn test_neutral_mention_format() {
        let answer = ResponseSynthesizer::new(Tone::Neutral).synthesize("nearby", &context());
        assert!(answer.contains("Riverside Cultural Center (18.9 km, 4.9★)"));
        assert!(answer.contains("Modern Art Gallery,") || answer.contains("Modern Art Gallery."));
    }

    #[test]
    fn test_food_prefers_local() {
        let answer = ResponseSynthesizer::new(Tone::Neutral)
            .synthesize("Where can I try authentic local cuisine?", &context());
        assert!(answer.starts_with("For authentic local food, start with Central Farmers Market"));
    }

    #[test]
    fn test_festival_prefers_performance() {
        let answer =
            ResponseSynthesizer::new(Tone::Enthusiastic).synthesize("any festivals?", &context());
        assert!(answer.starts_with("The celebrations at Riverside Cultural Center"));
    }

    #[test]
    fn test_itinerary_days() {
        let answer = ResponseSynthesizer::new(Tone::Neutral).synthesize("plan my trip", &context());
        assert!(answer.starts_with("For a 3-day cultural itinerary: Day 1: Riverside"));
        assert!(answer.contains("Day 3: Modern Art Gallery."));
    }

    #[test]
    fn test_location_reports_coordinates_and_fallback() {
        let mut ctx = context();
        ctx.status = LocationStatus::TimedOut;
        let answer = ResponseSynthesizer::new(Tone::Neutral).synthesize("where am i", &ctx);
        assert!(answer.contains("40.7128, -74.0060"));
        assert!(answer.contains("Location timeout"));
        assert!(answer.contains("found 4 cultural activities"));
    }

    #[test]
    fn test_enthusiastic_location_names_two() {
        let answer =
            ResponseSynthesizer::new(Tone::Enthusiastic).synthesize("Exciting places?", &context());
        assert!(answer.starts_with(
            "The Riverside Cultural Center and Central Farmers Market locations"
        ));
    }

    #[test]
    fn test_no_context_when_location_unset() {
        let mut ctx = context();
        ctx.location = None;
        let answer = ResponseSynthesizer::new(Tone::Neutral).synthesize("near me", &ctx);
        assert!(answer.starts_with("I need access to your location"));
    }

    #[test]
    fn test_no_context_when_catalog_empty() {
        let ctx = ConversationContext::new(Some(Coordinates::DEFAULT), vec![], LocationStatus::Detected);
        let answer = ResponseSynthesizer::new(Tone::Neutral)
            .synthesize("Where can I try authentic local cuisine?", &ctx);
        assert!(answer.starts_with("For authentic local cuisine, I recommend"));
        assert!(!answer.contains("Central Farmers Market"));
    }

    #[test]
    fn test_overview_on_no_match() {
        let ctx = context();
        assert_eq!(
            ResponseSynthesizer::new(Tone::Neutral).synthesize("hello", &ctx),
            NEUTRAL_OVERVIEW
        );
        assert_eq!(
            ResponseSynthesizer::new(Tone::Enthusiastic).synthesize("hello", &ctx),
            ENTHUSIASTIC_OVERVIEW
        );
    }

    #[test]
    fn test_loose_question_answered_per_tone() {
        let ctx = context();
        let text = "Anything fun around?";
        assert_eq!(
            ResponseSynthesizer::new(Tone::Neutral).synthesize(text, &ctx),
            NEUTRAL_OVERVIEW
        );
        let answer = ResponseSynthesizer::new(Tone::Enthusiastic).synthesize(text, &ctx);
        assert!(answer.ends_with("Which location sounds most exciting to you?"), "{}", answer);
    }

    #[test]
    fn test_enthusiastic_nearby_uses_steps_away() {
        let answer = ResponseSynthesizer::new(Tone::Enthusiastic).synthesize("around", &context());
        assert!(answer.contains("At Modern Art Gallery which is just steps away"));
        assert!(answer.contains("With a 4.9 star rating"));
        assert!(answer.ends_with("Which location sounds most exciting to you?"));
    }

    #[test]
    fn test_joined_names() {
        let a = poi("A", Category::Local, None, None);
        let b = poi("B", Category::Local, None, None);
        let c = poi("C", Category::Local, None, None);
        assert_eq!(joined_names(&[]), "");
        assert_eq!(joined_names(&[&a]), "A");
        assert_eq!(joined_names(&[&a, &b]), "A and B");
        assert_eq!(joined_names(&[&a, &b, &c]), "A, B and C");
    }

    #[test]
    fn test_lowercase_first() {
        assert_eq!(lowercase_first("Live music"), "live music");
        assert_eq!(lowercase_first(""), "");
    }
}
