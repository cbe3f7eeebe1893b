//! Keyword intent classification for the offline fallback.
//!
//! Matching is case-insensitive on whole words, checked in a fixed priority
//! order; the first intent with a hit wins. Each tone has its own keyword
//! table: the enthusiastic voice also treats loose words such as "around",
//! "fun", "place" and "where" as intents, while the neutral voice leaves
//! them to the overview answer.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::Tone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Nearby,
    Activity,
    Food,
    Directions,
    Festival,
    Itinerary,
    Location,
}

impl Intent {
    /// Priority order used by the classifier.
    pub const PRIORITY: [Intent; 7] = [
        Intent::Nearby,
        Intent::Activity,
        Intent::Food,
        Intent::Directions,
        Intent::Festival,
        Intent::Itinerary,
        Intent::Location,
    ];
}

// =============================================================================
// Compiled keyword sets (compiled once, reused across calls)
// =============================================================================

type PatternTable = Vec<(Intent, Regex)>;

fn compile(nearby: &str, activity: &str, location: &str) -> PatternTable {
    let mk = |p: &str| Regex::new(&format!(r"(?i)\b(?:{})\b", p)).expect("Invalid intent regex");
    vec![
        (Intent::Nearby, mk(nearby)),
        (Intent::Activity, mk(activity)),
        (
            Intent::Food,
            mk(r"food|restaurants?|eat(?:ing)?|cuisine|dining"),
        ),
        (Intent::Directions, mk(r"how\s+to\s+get|directions?|route")),
        (Intent::Festival, mk(r"festivals?|events?")),
        (
            Intent::Itinerary,
            mk(r"itinerar(?:y|ies)|plan(?:s|ning)?|schedule"),
        ),
        (Intent::Location, mk(location)),
    ]
}

static NEUTRAL_PATTERNS: LazyLock<PatternTable> = LazyLock::new(|| {
    compile(
        r"near\s+me|nearby",
        r"activit(?:y|ies)|what\s+to\s+do|things\s+to\s+do",
        r"location|where\s+am\s+i",
    )
});

static ENTHUSIASTIC_PATTERNS: LazyLock<PatternTable> = LazyLock::new(|| {
    compile(
        r"near\s+me|nearby|around",
        r"activit(?:y|ies)|what\s+to\s+do|things\s+to\s+do|fun",
        r"location|where\s+am\s+i|places?|where",
    )
});

/// Stateless keyword classifier for one tone.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntentClassifier {
    tone: Tone,
}

impl IntentClassifier {
    pub fn new(tone: Tone) -> Self {
        Self { tone }
    }

    fn patterns(&self) -> &'static PatternTable {
        match self.tone {
            Tone::Neutral => &NEUTRAL_PATTERNS,
            Tone::Enthusiastic => &ENTHUSIASTIC_PATTERNS,
        }
    }

    /// First matching intent in priority order, or `None`.
    pub fn classify(&self, text: &str) -> Option<Intent> {
        self.patterns()
            .iter()
            .find(|(_, re)| re.is_match(text))
            .map(|(intent, _)| *intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neutral(text: &str) -> Option<Intent> {
        IntentClassifier::new(Tone::Neutral).classify(text)
    }

    fn enthusiastic(text: &str) -> Option<Intent> {
        IntentClassifier::new(Tone::Enthusiastic).classify(text)
    }

    #[test]
    fn test_patterns_follow_priority_order() {
        for table in [&*NEUTRAL_PATTERNS, &*ENTHUSIASTIC_PATTERNS] {
            let order: Vec<Intent> = table.iter().map(|(i, _)| *i).collect();
            assert_eq!(order, Intent::PRIORITY.to_vec());
        }
    }

    #[test]
    fn test_each_intent() {
        for classify in [neutral, enthusiastic] {
            assert_eq!(classify("anything nearby?"), Some(Intent::Nearby));
            assert_eq!(classify("What to do today"), Some(Intent::Activity));
            assert_eq!(classify("Good FOOD please"), Some(Intent::Food));
            assert_eq!(classify("how to get to the museum"), Some(Intent::Directions));
            assert_eq!(classify("any festivals?"), Some(Intent::Festival));
            assert_eq!(classify("help me plan a trip"), Some(Intent::Itinerary));
            assert_eq!(classify("what is my location"), Some(Intent::Location));
        }
    }

    #[test]
    fn test_loose_words_depend_on_tone() {
        assert_eq!(neutral("What is around here?"), None);
        assert_eq!(enthusiastic("What is around here?"), Some(Intent::Nearby));

        assert_eq!(neutral("Something fun"), None);
        assert_eq!(enthusiastic("Something fun"), Some(Intent::Activity));

        assert_eq!(neutral("Exciting cultural places?"), None);
        assert_eq!(enthusiastic("Exciting cultural places?"), Some(Intent::Location));

        assert_eq!(neutral("Where should I go?"), None);
        assert_eq!(enthusiastic("Where should I go?"), Some(Intent::Location));
    }

    #[test]
    fn test_priority_nearby_beats_food() {
        assert_eq!(
            neutral("Best traditional restaurants near me"),
            Some(Intent::Nearby)
        );
    }

    #[test]
    fn test_priority_food_beats_location() {
        for classify in [neutral, enthusiastic] {
            assert_eq!(
                classify("Where can I try authentic local cuisine?"),
                Some(Intent::Food)
            );
        }
    }

    #[test]
    fn test_guide_quick_replies() {
        assert_eq!(
            neutral("What cultural activities are near me?"),
            Some(Intent::Nearby)
        );
        assert_eq!(
            neutral("Are there any festivals this month?"),
            Some(Intent::Festival)
        );
        assert_eq!(
            neutral("Where am I and what can I do here?"),
            Some(Intent::Location)
        );
    }

    #[test]
    fn test_companion_quick_replies() {
        assert_eq!(enthusiastic("What amazing things near me?"), Some(Intent::Nearby));
        assert_eq!(enthusiastic("Most fun location around?"), Some(Intent::Nearby));
        assert_eq!(enthusiastic("Top activity spots?"), Some(Intent::Activity));
        assert_eq!(enthusiastic("Exciting cultural places?"), Some(Intent::Location));
    }

    #[test]
    fn test_word_boundaries() {
        // "theater" contains "eat", "eventually" contains "event".
        for classify in [neutral, enthusiastic] {
            assert_eq!(classify("tell me about the theater"), None);
            assert_eq!(classify("eventually"), None);
            assert_eq!(classify("funding"), None);
            assert_eq!(classify("somewhere"), None);
        }
    }

    #[test]
    fn test_no_match() {
        assert_eq!(neutral("hello there"), None);
        assert_eq!(enthusiastic(""), None);
    }
}
