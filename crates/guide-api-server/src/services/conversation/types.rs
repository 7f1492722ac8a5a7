use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier used when the caller does not supply one
pub const DEFAULT_USER_ID: &str = "default";

/// Conversation progress marker (driven by the caller, not enforced here)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStep {
    #[default]
    Initial,
    GatheringPreferences,
    ProvidingDetails,
}

/// Coarse classification of what the user is asking about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Dining,
    Beaches,
    Activities,
    Accommodation,
    Safety,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Dining => "dining",
            Topic::Beaches => "beaches",
            Topic::Activities => "activities",
            Topic::Accommodation => "accommodation",
            Topic::Safety => "safety",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Well-known preference keys. The map stays open to any other key.
pub mod keys {
    pub const BUDGET: &str = "budget";
    pub const LOCATION: &str = "location";
    pub const CUISINE: &str = "cuisine";
    pub const ACTIVITY_TYPE: &str = "activity_type";
    pub const GROUP_SIZE: &str = "group_size";
    pub const TIME_OF_DAY: &str = "time_of_day";
    pub const ACCOMMODATION_TYPE: &str = "accommodation_type";
    pub const DISH: &str = "dish";
}

/// Structured slot values inferred from free text (key -> value)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Preferences(BTreeMap<String, String>);

impl Preferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Insert a value, overwriting any previous value for the same key
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if at least one of `keys` is present
    pub fn has_any(&self, keys: &[&str]) -> bool {
        keys.iter().any(|key| self.contains(key))
    }

    /// Overlay `other` on top of self; values from `other` win on conflict
    pub fn merge(&mut self, other: Preferences) {
        self.0.extend(other.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Preferences {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Per-user conversation state stored in the in-memory table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    pub user_id: String,
    pub step: ConversationStep,
    pub topic: Option<Topic>,
    pub preferences: Preferences,
    pub last_message: Option<String>,

    /// Last mutation time; only the staleness sweep reads it
    pub timestamp: DateTime<Utc>,
}

impl ConversationState {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            step: ConversationStep::Initial,
            topic: None,
            preferences: Preferences::new(),
            last_message: None,
            timestamp: Utc::now(),
        }
    }

    /// Shallow field replacement of every field present in `update`
    pub fn apply(&mut self, update: StateUpdate) {
        if let Some(step) = update.step {
            self.step = step;
        }
        if let Some(topic) = update.topic {
            self.topic = topic;
        }
        if let Some(preferences) = update.preferences {
            self.preferences = preferences;
        }
        if let Some(last_message) = update.last_message {
            self.last_message = Some(last_message);
        }
    }

    pub fn touch(&mut self) {
        self.timestamp = Utc::now();
    }

    /// True if the entry was last touched strictly before `cutoff`
    pub fn is_stale(&self, cutoff: DateTime<Utc>) -> bool {
        self.timestamp < cutoff
    }
}

/// Partial update merged into a `ConversationState`.
///
/// `topic` is doubly optional so callers can distinguish "leave as is" (absent)
/// from "clear the topic" (`null`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<ConversationStep>,

    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub topic: Option<Option<Topic>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Preferences>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<String>,
}

impl StateUpdate {
    pub fn step(mut self, step: ConversationStep) -> Self {
        self.step = Some(step);
        self
    }

    pub fn topic(mut self, topic: Option<Topic>) -> Self {
        self.topic = Some(topic);
        self
    }

    pub fn preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = Some(preferences);
        self
    }

    pub fn last_message(mut self, message: impl Into<String>) -> Self {
        self.last_message = Some(message.into());
        self
    }
}

// A present field (even `null`) deserializes to `Some(..)`; an absent one hits `default`.
pub(crate) fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Result of one chat turn run through the manager
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnOutcome {
    pub user_id: String,
    pub topic: Option<Topic>,
    pub step: ConversationStep,
    pub preferences: Preferences,
    /// Enough is known to answer instead of asking
    pub ready: bool,
    pub follow_up_questions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_blank() {
        let state = ConversationState::new(DEFAULT_USER_ID);
        assert_eq!(state.user_id, "default");
        assert_eq!(state.step, ConversationStep::Initial);
        assert!(state.topic.is_none());
        assert!(state.preferences.is_empty());
        assert!(state.last_message.is_none());
    }

    #[test]
    fn test_apply_replaces_preferences_shallowly() {
        let mut state = ConversationState::new("a");
        state.preferences.set(keys::BUDGET, "low");

        let replacement: Preferences = [(keys::DISH, "pizza")].into_iter().collect();
        state.apply(StateUpdate::default().preferences(replacement));

        assert_eq!(state.preferences.get(keys::DISH), Some("pizza"));
        assert!(!state.preferences.contains(keys::BUDGET));
    }

    #[test]
    fn test_apply_leaves_absent_fields_alone() {
        let mut state = ConversationState::new("a");
        state.topic = Some(Topic::Dining);
        state.step = ConversationStep::GatheringPreferences;

        state.apply(StateUpdate::default().last_message("hello there"));

        assert_eq!(state.topic, Some(Topic::Dining));
        assert_eq!(state.step, ConversationStep::GatheringPreferences);
        assert_eq!(state.last_message.as_deref(), Some("hello there"));
    }

    #[test]
    fn test_update_topic_null_vs_absent() {
        let cleared: StateUpdate = serde_json::from_str(r#"{"topic": null}"#).unwrap();
        assert_eq!(cleared.topic, Some(None));

        let untouched: StateUpdate = serde_json::from_str(r#"{"step": "providing_details"}"#).unwrap();
        assert_eq!(untouched.topic, None);
        assert_eq!(untouched.step, Some(ConversationStep::ProvidingDetails));

        let set: StateUpdate = serde_json::from_str(r#"{"topic": "beaches"}"#).unwrap();
        assert_eq!(set.topic, Some(Some(Topic::Beaches)));
    }

    #[test]
    fn test_merge_overwrites_and_keeps_unrelated_keys() {
        let mut prefs: Preferences = [(keys::BUDGET, "low"), (keys::LOCATION, "beach")]
            .into_iter()
            .collect();
        prefs.merge([(keys::BUDGET, "high"), ("pets", "dog")].into_iter().collect());

        assert_eq!(prefs.get(keys::BUDGET), Some("high"));
        assert_eq!(prefs.get(keys::LOCATION), Some("beach"));
        assert_eq!(prefs.get("pets"), Some("dog"));
        assert_eq!(prefs.len(), 3);
    }

    #[test]
    fn test_preferences_serialize_as_plain_map() {
        let prefs: Preferences = [(keys::CUISINE, "caribbean")].into_iter().collect();
        let json = serde_json::to_value(&prefs).unwrap();
        assert_eq!(json, serde_json::json!({ "cuisine": "caribbean" }));
    }
}
