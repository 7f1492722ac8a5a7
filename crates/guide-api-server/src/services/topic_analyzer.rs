/// Topic Analyzer
/// Classifies a raw chat message into one of the guide topics
/// (dining, beaches, activities, accommodation, safety) by keyword containment.

use tracing::debug;

use crate::services::conversation::keywords::{
    contains_any, META_QUERIES, MIN_TOPIC_MESSAGE_CHARS, TOPIC_RULES,
};
use crate::services::conversation::Topic;

pub struct TopicAnalyzer;

impl TopicAnalyzer {
    /// Detect the topic of a message.
    ///
    /// Questions about the assistant itself ("what can you do", "help", ...) and
    /// messages shorter than three characters never get a topic. Otherwise the first
    /// topic in precedence order with a matching keyword wins.
    pub fn detect_topic(message: &str) -> Option<Topic> {
        let message_lower = message.trim().to_lowercase();

        if Self::is_meta_query(&message_lower) {
            debug!("Meta query, skipping topic detection");
            return None;
        }

        for (topic, keywords) in TOPIC_RULES {
            if contains_any(&message_lower, keywords) {
                debug!("Detected topic '{}'", topic);
                return Some(*topic);
            }
        }

        debug!("No topic detected");
        None
    }

    /// Check if a message is about the assistant rather than the island
    pub fn is_meta_query(message: &str) -> bool {
        let message_lower = message.trim().to_lowercase();
        message_lower.chars().count() < MIN_TOPIC_MESSAGE_CHARS
            || contains_any(&message_lower, META_QUERIES)
    }
}
