pub mod conversation;
pub mod preference_extractor;
pub mod sweeper;
pub mod topic_analyzer;

pub use conversation::ConversationManager;
pub use preference_extractor::PreferenceExtractor;
pub use sweeper::spawn_sweeper;
pub use topic_analyzer::TopicAnalyzer;
