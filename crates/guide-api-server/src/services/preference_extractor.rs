use tracing::debug;

use crate::services::conversation::keywords::{
    first_match, last_match, Rule, ACCOMMODATION_TYPE_RULES, ACTIVITY_TYPE_RULES, BUDGET_RULES,
    CUISINE_RULES, DISH_RULES, GROUP_SIZE_RULES, LOCATION_RULES, TIME_OF_DAY_RULES,
};
use crate::services::conversation::types::{keys, Preferences, Topic};

/// Stateless slot extraction from free text.
///
/// Only the keys that could be inferred are returned; merging into stored
/// conversation state is the caller's decision.
pub struct PreferenceExtractor;

impl PreferenceExtractor {
    pub fn extract(message: &str, topic: Option<Topic>) -> Preferences {
        let message_lower = message.to_lowercase();
        let mut preferences = Preferences::new();

        // Shared slots: first matching bucket wins
        let shared = [
            (keys::BUDGET, first_match(&message_lower, BUDGET_RULES)),
            (keys::LOCATION, first_match(&message_lower, LOCATION_RULES)),
            (keys::GROUP_SIZE, first_match(&message_lower, GROUP_SIZE_RULES)),
        ];
        for (key, value) in shared {
            if let Some(value) = value {
                preferences.set(key, value);
            }
        }

        // Topic slots: every matching rule applies, later ones overwrite earlier ones
        let topic_slots: &[(&str, &[Rule<&str>])] = match topic {
            Some(Topic::Dining) => &[
                (keys::DISH, DISH_RULES),
                (keys::CUISINE, CUISINE_RULES),
                (keys::TIME_OF_DAY, TIME_OF_DAY_RULES),
            ],
            Some(Topic::Activities) => &[(keys::ACTIVITY_TYPE, ACTIVITY_TYPE_RULES)],
            Some(Topic::Accommodation) => &[(keys::ACCOMMODATION_TYPE, ACCOMMODATION_TYPE_RULES)],
            _ => &[],
        };
        for (key, rules) in topic_slots {
            if let Some(value) = last_match(&message_lower, rules) {
                preferences.set(*key, value);
            }
        }

        debug!(
            "Extracted {} preference(s) for topic {:?}",
            preferences.len(),
            topic.map(|t| t.as_str())
        );
        preferences
    }
}
