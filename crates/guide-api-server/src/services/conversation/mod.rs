//! Conversation memory management module
//!
//! Provides in-memory conversation state management with:
//! - Thread-safe per-user state table (DashMap)
//! - Ordered keyword rule tables for topic and slot detection
//! - Sufficiency checks and follow-up question banks

mod cache;
mod follow_up;
pub mod keywords;
pub mod manager;
pub mod types;

pub use cache::{CacheStats, ConversationCache};
pub use follow_up::{GENERIC_QUESTION, MAX_FOLLOW_UP_QUESTIONS};
pub use manager::ConversationManager;
pub use types::{
    keys, ConversationState, ConversationStep, Preferences, StateUpdate, Topic, TurnOutcome,
    DEFAULT_USER_ID,
};
