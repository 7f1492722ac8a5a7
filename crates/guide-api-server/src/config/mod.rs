pub mod settings;

pub use settings::{ConversationConfig, LoggingConfig, ServerConfig, Settings};
