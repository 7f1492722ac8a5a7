/// manager.rs
use chrono::{Duration, Utc};
use tracing::{debug, info, warn};

use crate::services::{PreferenceExtractor, TopicAnalyzer};

use super::cache::{CacheStats, ConversationCache};
use super::follow_up;
use super::types::{
    ConversationState, ConversationStep, Preferences, StateUpdate, Topic, TurnOutcome,
    DEFAULT_USER_ID,
};

/// Entries idle longer than this are dropped by the sweep
pub const DEFAULT_STALE_AFTER_MINUTES: i64 = 60;

/// Owns the per-user conversation table and the rule-based dialogue logic.
///
/// Construct one per application and share it behind an `Arc`; the host is
/// responsible for calling [`ConversationManager::cleanup_old_conversations`]
/// on a timer.
pub struct ConversationManager {
    cache: ConversationCache,
    stale_after: Duration,
}

impl ConversationManager {
    pub fn new() -> Self {
        Self::with_stale_after(Duration::minutes(DEFAULT_STALE_AFTER_MINUTES))
    }

    pub fn with_stale_after(stale_after: Duration) -> Self {
        info!(
            "Conversation manager ready (stale after {} min)",
            stale_after.num_minutes()
        );
        Self {
            cache: ConversationCache::new(),
            stale_after,
        }
    }

    // ===== state table =====

    /// Current state for `user_id` (or `"default"`), created on first access
    pub fn get_conversation_state(&self, user_id: Option<&str>) -> ConversationState {
        self.cache.get_or_create(user_id.unwrap_or(DEFAULT_USER_ID))
    }

    /// Shallow-merge `update` into the user's state and refresh its timestamp.
    /// Preferences are replaced wholesale; pass an already merged map to keep old keys.
    pub fn update_conversation_state(&self, user_id: &str, update: StateUpdate) -> ConversationState {
        self.cache.update(user_id, update)
    }

    /// Replace the user's state with a blank one
    pub fn reset_conversation(&self, user_id: &str) -> ConversationState {
        let state = ConversationState::new(user_id);
        self.cache.set(state.clone());
        debug!("Reset conversation for {}", user_id);
        state
    }

    /// Remove every entry idle for longer than the staleness threshold.
    /// The cutoff is taken once, at call time.
    pub fn cleanup_old_conversations(&self) -> usize {
        // A threshold reaching past the earliest representable time means nothing is stale yet
        let Some(cutoff) = Utc::now().checked_sub_signed(self.stale_after) else {
            warn!(
                "Staleness threshold of {} min is out of range, skipping sweep",
                self.stale_after.num_minutes()
            );
            return 0;
        };
        self.cache.cleanup_older_than(cutoff)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn stale_after(&self) -> Duration {
        self.stale_after
    }

    // ===== classification =====

    pub fn detect_topic(&self, message: &str) -> Option<Topic> {
        TopicAnalyzer::detect_topic(message)
    }

    pub fn extract_preferences(&self, message: &str, topic: Option<Topic>) -> Preferences {
        PreferenceExtractor::extract(message, topic)
    }

    pub fn has_enough_preferences(&self, topic: Option<Topic>, preferences: &Preferences) -> bool {
        follow_up::has_enough_preferences(topic, preferences)
    }

    pub fn generate_follow_up_questions(
        &self,
        topic: Option<Topic>,
        preferences: &Preferences,
    ) -> Vec<String> {
        follow_up::generate_follow_up_questions(topic, preferences)
    }

    // ===== chat turn =====

    /// Run one user message through detection, extraction, merge and the sufficiency check,
    /// then persist the result.
    pub fn process_turn(&self, user_id: Option<&str>, message: &str) -> TurnOutcome {
        let user_id = user_id.unwrap_or(DEFAULT_USER_ID);
        let state = self.cache.get_or_create(user_id);

        let is_meta = TopicAnalyzer::is_meta_query(message);
        let detected = self.detect_topic(message);
        let topic = detected.or(state.topic);

        // A new subject starts with a clean slot set
        let mut preferences = match (detected, state.topic) {
            (Some(new), Some(old)) if new != old => {
                debug!("Topic changed {} -> {} for {}", old, new, user_id);
                Preferences::new()
            }
            _ => state.preferences,
        };

        if !is_meta {
            preferences.merge(self.extract_preferences(message, topic));
        }

        let ready = self.has_enough_preferences(topic, &preferences);
        let step = match (topic, ready) {
            (None, _) => ConversationStep::Initial,
            (Some(_), true) => ConversationStep::ProvidingDetails,
            (Some(_), false) => ConversationStep::GatheringPreferences,
        };
        let follow_up_questions = if ready {
            Vec::new()
        } else {
            self.generate_follow_up_questions(topic, &preferences)
        };

        self.cache.update(
            user_id,
            StateUpdate::default()
                .step(step)
                .topic(topic)
                .preferences(preferences.clone())
                .last_message(message),
        );

        info!(
            "Turn processed: user={}, topic={:?}, prefs={}, ready={}",
            user_id,
            topic.map(|t| t.as_str()),
            preferences.len(),
            ready
        );

        TurnOutcome {
            user_id: user_id.to_string(),
            topic,
            step,
            preferences,
            ready,
            follow_up_questions,
        }
    }

    #[cfg(test)]
    pub(crate) fn cache(&self) -> &ConversationCache {
        &self.cache
    }
}

impl Default for ConversationManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::conversation::types::keys;
    use std::sync::Arc;

    #[test]
    fn test_unseen_user_gets_blank_state() {
        let manager = ConversationManager::new();
        let state = manager.get_conversation_state(Some("new-user"));
        assert_eq!(state.step, ConversationStep::Initial);
        assert!(state.topic.is_none());
        assert!(state.preferences.is_empty());

        let default = manager.get_conversation_state(None);
        assert_eq!(default.user_id, DEFAULT_USER_ID);
    }

    #[test]
    fn test_get_is_idempotent() {
        let manager = ConversationManager::new();
        let first = manager.get_conversation_state(Some("a"));
        let second = manager.get_conversation_state(Some("a"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_update_refreshes_timestamp() {
        let manager = ConversationManager::new();
        let mut state = ConversationState::new("a");
        state.timestamp = Utc::now() - Duration::minutes(30);
        let before = state.timestamp;
        manager.cache().set(state);

        let updated = manager.update_conversation_state("a", StateUpdate::default().last_message("hi"));
        assert!(updated.timestamp > before);
        assert_eq!(updated.last_message.as_deref(), Some("hi"));
    }

    #[test]
    fn test_reset_clears_everything() {
        let manager = ConversationManager::new();
        let prefs: Preferences = [(keys::BUDGET, "high")].into_iter().collect();
        manager.update_conversation_state(
            "a",
            StateUpdate::default()
                .step(ConversationStep::ProvidingDetails)
                .topic(Some(Topic::Dining))
                .preferences(prefs),
        );

        manager.reset_conversation("a");
        let state = manager.get_conversation_state(Some("a"));
        assert_eq!(state.step, ConversationStep::Initial);
        assert!(state.topic.is_none());
        assert!(state.preferences.is_empty());
    }

    #[test]
    fn test_users_do_not_interfere() {
        let manager = ConversationManager::new();
        let prefs: Preferences = [(keys::CUISINE, "caribbean")].into_iter().collect();
        manager.update_conversation_state(
            "B",
            StateUpdate::default().topic(Some(Topic::Dining)).preferences(prefs.clone()),
        );

        manager.update_conversation_state(
            "A",
            StateUpdate::default()
                .topic(Some(Topic::Safety))
                .preferences([(keys::GROUP_SIZE, "solo")].into_iter().collect()),
        );

        let b = manager.get_conversation_state(Some("B"));
        assert_eq!(b.topic, Some(Topic::Dining));
        assert_eq!(b.preferences, prefs);
    }

    #[test]
    fn test_sweep_removes_only_stale_entries() {
        let manager = ConversationManager::new();
        let now = Utc::now();

        let mut stale = ConversationState::new("stale");
        stale.timestamp = now - Duration::minutes(61);
        manager.cache().set(stale);

        let mut fresh = ConversationState::new("fresh");
        fresh.timestamp = now - Duration::minutes(59);
        manager.cache().set(fresh);

        assert_eq!(manager.cleanup_old_conversations(), 1);
        assert_eq!(manager.cleanup_old_conversations(), 0);
        assert!(!manager.cache().contains("stale"));
        assert!(manager.cache().contains("fresh"));
    }

    #[test]
    fn test_sweep_with_out_of_range_threshold_keeps_everything() {
        let manager = ConversationManager::with_stale_after(Duration::days(200_000_000));

        let mut old = ConversationState::new("old");
        old.timestamp = Utc::now() - Duration::days(3650);
        manager.cache().set(old);

        assert_eq!(manager.cleanup_old_conversations(), 0);
        assert!(manager.cache().contains("old"));
    }

    #[test]
    fn test_turn_gathers_then_provides() {
        let manager = ConversationManager::new();

        let first = manager.process_turn(Some("u1"), "I'm hungry");
        assert_eq!(first.topic, Some(Topic::Dining));
        assert_eq!(first.step, ConversationStep::GatheringPreferences);
        assert!(!first.ready);
        assert_eq!(first.follow_up_questions.len(), 2);

        // no topic keyword here; the stored topic carries over
        let second = manager.process_turn(Some("u1"), "something cheap near Basseterre");
        assert_eq!(second.topic, Some(Topic::Dining));
        assert!(second.ready);
        assert_eq!(second.step, ConversationStep::ProvidingDetails);
        assert!(second.follow_up_questions.is_empty());
        assert_eq!(second.preferences.get(keys::BUDGET), Some("low"));
        assert_eq!(second.preferences.get(keys::LOCATION), Some("basseterre"));

        let stored = manager.get_conversation_state(Some("u1"));
        assert_eq!(stored.step, ConversationStep::ProvidingDetails);
        assert_eq!(stored.last_message.as_deref(), Some("something cheap near Basseterre"));
    }

    #[test]
    fn test_turn_topic_change_drops_old_preferences() {
        let manager = ConversationManager::new();
        manager.process_turn(Some("u2"), "cheap pizza please");
        let outcome = manager.process_turn(Some("u2"), "now find me a resort");

        assert_eq!(outcome.topic, Some(Topic::Accommodation));
        assert!(!outcome.preferences.contains(keys::DISH));
        assert!(!outcome.preferences.contains(keys::BUDGET));
        assert_eq!(outcome.preferences.get(keys::ACCOMMODATION_TYPE), Some("resort"));
    }

    #[test]
    fn test_turn_meta_query_keeps_state() {
        let manager = ConversationManager::new();
        manager.process_turn(Some("u3"), "snorkeling near the beach");
        let outcome = manager.process_turn(Some("u3"), "what can you do");

        assert_eq!(outcome.topic, Some(Topic::Beaches));
        assert_eq!(outcome.preferences.get(keys::LOCATION), Some("beach"));
        assert!(outcome.ready);
    }

    #[test]
    fn test_turn_without_topic_asks_generic_question() {
        let manager = ConversationManager::new();
        let outcome = manager.process_turn(None, "hello there");

        assert_eq!(outcome.user_id, DEFAULT_USER_ID);
        assert_eq!(outcome.topic, None);
        assert_eq!(outcome.step, ConversationStep::Initial);
        assert_eq!(outcome.follow_up_questions, vec![follow_up::GENERIC_QUESTION]);
    }

    #[test]
    fn test_beach_follow_up_answer_moves_turn_forward() {
        let manager = ConversationManager::new();

        let first = manager.process_turn(Some("u5"), "want to go swimming");
        assert_eq!(first.topic, Some(Topic::Beaches));
        assert!(!first.ready);
        assert_eq!(first.follow_up_questions.len(), 2);

        // answering the party-size question is enough for beaches
        let second = manager.process_turn(Some("u5"), "just me and my partner");
        assert_eq!(second.topic, Some(Topic::Beaches));
        assert_eq!(second.preferences.get(keys::GROUP_SIZE), Some("couple"));
        assert!(second.ready);
        assert_eq!(second.step, ConversationStep::ProvidingDetails);
        assert_ne!(second.follow_up_questions, first.follow_up_questions);
    }

    #[test]
    fn test_concurrent_turns_for_distinct_users() {
        let manager = Arc::new(ConversationManager::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let manager = manager.clone();
                std::thread::spawn(move || {
                    let user = format!("user-{}", i);
                    for _ in 0..50 {
                        manager.process_turn(Some(user.as_str()), "cheap seafood in Frigate Bay");
                        manager.cleanup_old_conversations();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(manager.cache_stats().active_sessions, 8);
        let state = manager.get_conversation_state(Some("user-3"));
        assert_eq!(state.preferences.get(keys::CUISINE), Some("seafood"));
    }
}
