//! Keyword rule tables
//!
//! Every classifier in this crate is a plain substring test over a lower-cased
//! message. The tables below are ordered: for first-match-wins rules the first
//! entry whose keyword list matches decides the value, for last-write-wins rules
//! every matching entry is applied in order and the last one sticks.
//!
//! Bump `RULESET_VERSION` whenever a table changes, since reordering or adding a
//! keyword can change how existing messages classify ("seafood" contains "food").

use super::types::Topic;

pub const RULESET_VERSION: &str = "2024.1";

/// An ordered rule: `value` applies if the message contains any of `keywords`.
pub type Rule<V> = (V, &'static [&'static str]);

/// Messages shorter than this (after trimming) are never classified
pub const MIN_TOPIC_MESSAGE_CHARS: usize = 3;

/// Questions about the assistant itself; these suppress topic detection
pub const META_QUERIES: &[&str] = &[
    "what can you do",
    "what do you do",
    "help",
    "who are you",
    "what are you",
    "what is this",
    "how does this work",
    "how do you work",
    "capabilities",
    "tell me about yourself",
    "introduce yourself",
];

const DINING_KEYWORDS: &[&str] = &[
    // generic
    "food", "restaurant", "dining", "dine", "dinner", "lunch", "breakfast", "brunch",
    "hungry", "meal", "cuisine", "where to eat", "place to eat", "eating", "snack",
    "dessert", "cafe", "menu", "takeout", "take-out",
    // dishes & ingredients
    "chicken", "bbq", "barbecue", "pizza", "burger", "pasta", "seafood", "fish",
    "lobster", "shrimp", "conch", "snapper", "mahi", "steak", "pork", "goat",
    "salad", "sandwich", "soup", "curry", "roti", "rice and peas",
    // cooking methods
    "grilled", "fried", "roasted", "baked", "steamed", "jerk", "stewed", "smoked",
    // local dishes
    "goat water", "saltfish", "johnny cake", "johnnycake", "conkies", "ducana",
    "souse", "cook-up", "pelau", "breadfruit", "plantain", "callaloo",
    "coconut dumpling", "rum punch", "black pudding",
];

const BEACH_KEYWORDS: &[&str] = &[
    "beach", "swim", "sand", "ocean", "water activities", "snorkel",
];

const ACTIVITY_KEYWORDS: &[&str] = &[
    "activity", "activities", "tour", "adventure", "hiking", "sightseeing",
    "things to do", "attractions",
];

const ACCOMMODATION_KEYWORDS: &[&str] = &[
    "hotel", "stay", "accommodation", "resort", "lodge", "room",
];

const SAFETY_KEYWORDS: &[&str] = &[
    "safe", "safety", "crime", "secure", "emergency", "health",
];

/// Topic precedence: earlier rows win
pub const TOPIC_RULES: &[Rule<Topic>] = &[
    (Topic::Dining, DINING_KEYWORDS),
    (Topic::Beaches, BEACH_KEYWORDS),
    (Topic::Activities, ACTIVITY_KEYWORDS),
    (Topic::Accommodation, ACCOMMODATION_KEYWORDS),
    (Topic::Safety, SAFETY_KEYWORDS),
];

// ---- shared slots (first match wins) ----

/// Low is checked before high so "inexpensive" never reads as "expensive"
pub const BUDGET_RULES: &[Rule<&str>] = &[
    ("low", &["cheap", "budget", "affordable", "inexpensive", "low cost", "low-cost", "economical"]),
    ("high", &["expensive", "luxury", "upscale", "fine dining", "high end", "high-end", "fancy", "premium"]),
    ("medium", &["moderate", "mid-range", "mid range", "reasonable", "average"]),
];

pub const LOCATION_RULES: &[Rule<&str>] = &[
    ("beach", &["beach", "seaside", "waterfront", "oceanfront", "by the sea"]),
    ("frigate_bay", &["frigate bay"]),
    ("basseterre", &["basseterre"]),
    ("downtown", &["downtown", "town", "city center", "city centre", "central"]),
];

pub const GROUP_SIZE_RULES: &[Rule<&str>] = &[
    ("couple", &["couple", "romantic", "partner", "wife", "husband", "girlfriend", "boyfriend", "honeymoon", "two of us"]),
    ("family", &["family", "kids", "children", "child"]),
    ("solo", &["solo", "alone", "by myself", "just me"]),
    ("group", &["group", "friends", "party of"]),
];

// ---- topic-specific slots (last match wins) ----

pub const DISH_RULES: &[Rule<&str>] = &[
    ("chicken", &["chicken"]),
    ("bbq chicken", &["bbq chicken", "barbecue chicken"]),
    ("pizza", &["pizza"]),
    ("burger", &["burger"]),
    ("pasta", &["pasta", "spaghetti", "lasagna"]),
    ("seafood", &["seafood", "lobster", "shrimp", "conch"]),
];

pub const CUISINE_RULES: &[Rule<&str>] = &[
    ("bbq", &["bbq", "barbecue"]),
    ("pizza", &["pizza"]),
    ("seafood", &["seafood", "fish", "lobster"]),
    ("caribbean", &["caribbean", "local", "west indian", "creole", "goat water", "saltfish", "johnny cake", "pelau"]),
    ("italian", &["italian"]),
    ("american", &["american"]),
    ("chinese", &["chinese"]),
    ("mexican", &["mexican", "taco", "burrito"]),
    ("vegetarian", &["vegetarian", "vegan", "plant-based", "plant based"]),
];

pub const TIME_OF_DAY_RULES: &[Rule<&str>] = &[
    ("breakfast", &["breakfast"]),
    ("lunch", &["lunch"]),
    ("dinner", &["dinner"]),
    ("brunch", &["brunch"]),
];

pub const ACTIVITY_TYPE_RULES: &[Rule<&str>] = &[
    ("water", &["snorkel", "diving", "scuba", "kayak", "sailing", "boat", "catamaran", "water"]),
    ("cultural", &["history", "historic", "heritage", "museum", "culture", "cultural", "fort", "brimstone"]),
    ("adventure", &["hike", "hiking", "zipline", "zip line", "volcano", "rainforest", "atv", "adventure"]),
    ("relaxing", &["relax", "spa", "massage", "chill", "yoga", "quiet"]),
];

pub const ACCOMMODATION_TYPE_RULES: &[Rule<&str>] = &[
    ("resort", &["resort", "all-inclusive", "all inclusive"]),
    ("boutique", &["boutique", "guesthouse", "guest house", "bed and breakfast", "villa"]),
    ("beachfront", &["beachfront", "beach front", "oceanfront", "on the beach"]),
];

/// True if `haystack` (already lower-cased) contains any keyword
pub fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| haystack.contains(keyword))
}

/// First rule whose keywords appear in `haystack`
pub fn first_match<V: Copy>(haystack: &str, rules: &[Rule<V>]) -> Option<V> {
    rules
        .iter()
        .find(|(_, keywords)| contains_any(haystack, keywords))
        .map(|(value, _)| *value)
}

/// Last rule whose keywords appear in `haystack` (every match overwrites the previous)
pub fn last_match<V: Copy>(haystack: &str, rules: &[Rule<V>]) -> Option<V> {
    rules
        .iter()
        .filter(|(_, keywords)| contains_any(haystack, keywords))
        .map(|(value, _)| *value)
        .last()
}
