use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use super::types::{ConversationState, StateUpdate};

/// Thread-safe in-memory conversation table
/// Uses DashMap so different users only contend on shard collisions
#[derive(Clone, Default)]
pub struct ConversationCache {
    /// user_id -> ConversationState
    storage: Arc<DashMap<String, ConversationState>>,
}

impl ConversationCache {
    pub fn new() -> Self {
        info!("Initializing conversation cache with DashMap");
        Self {
            storage: Arc::new(DashMap::new()),
        }
    }

    /// Snapshot of the entry for `user_id`, creating a blank one first if needed.
    /// Reading never refreshes the timestamp.
    pub fn get_or_create(&self, user_id: &str) -> ConversationState {
        if let Some(entry) = self.storage.get(user_id) {
            return entry.value().clone();
        }

        self.storage
            .entry(user_id.to_string())
            .or_insert_with(|| {
                debug!("Creating conversation state for {}", user_id);
                ConversationState::new(user_id)
            })
            .value()
            .clone()
    }

    /// Apply a partial update to the entry (created if absent) and touch it
    pub fn update(&self, user_id: &str, update: StateUpdate) -> ConversationState {
        let mut entry = self
            .storage
            .entry(user_id.to_string())
            .or_insert_with(|| ConversationState::new(user_id));

        entry.apply(update);
        entry.touch();
        debug!("Updated session {} in cache", user_id);
        entry.value().clone()
    }

    /// Insert or replace a whole state
    pub fn set(&self, state: ConversationState) {
        self.storage.insert(state.user_id.clone(), state);
    }

    pub fn remove(&self, user_id: &str) -> Option<ConversationState> {
        self.storage.remove(user_id).map(|(_, state)| state)
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.storage.contains_key(user_id)
    }

    /// Get number of active sessions
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Drop every entry last touched before `cutoff`.
    /// Returns number of sessions removed
    pub fn cleanup_older_than(&self, cutoff: DateTime<Utc>) -> usize {
        let start_len = self.storage.len();
        self.storage
            .retain(|_, state: &mut ConversationState| !state.is_stale(cutoff));
        let end_len = self.storage.len();

        let count = start_len.saturating_sub(end_len);

        if count > 0 {
            info!("Cleaned up {} stale sessions", count);
        }

        count
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        let oldest = self
            .storage
            .iter()
            .map(|entry| entry.value().timestamp)
            .min();

        CacheStats {
            active_sessions: self.len(),
            oldest_entry_age_secs: oldest.map(|ts| (Utc::now() - ts).num_seconds().max(0)),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub active_sessions: usize,
    pub oldest_entry_age_secs: Option<i64>,
}
