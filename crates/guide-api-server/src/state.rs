use std::sync::Arc;
use axum::extract::FromRef;

use crate::config::Settings;
use crate::services::ConversationManager;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub conversation_manager: Arc<ConversationManager>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(conversation_manager: Arc<ConversationManager>, settings: Settings) -> Self {
        Self {
            conversation_manager,
            settings: Arc::new(settings),
        }
    }
}

impl FromRef<AppState> for Arc<ConversationManager> {
    fn from_ref(state: &AppState) -> Self {
        state.conversation_manager.clone()
    }
}

impl FromRef<AppState> for Arc<Settings> {
    fn from_ref(state: &AppState) -> Self {
        state.settings.clone()
    }
}
