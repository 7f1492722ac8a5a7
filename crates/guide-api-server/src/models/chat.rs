use serde::{Deserialize, Serialize};

use crate::services::conversation::{Preferences, Topic};

// ===== REQUEST MODELS =====

#[derive(Debug, Deserialize)]
pub struct ChatTurnRequest {
    /// Falls back to the shared "default" session
    #[serde(default)]
    pub user_id: Option<String>,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct DetectTopicRequest {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ExtractPreferencesRequest {
    pub message: String,
    /// Absent: detected from the message. `null`: no topic, shared slots only.
    #[serde(
        default,
        deserialize_with = "crate::services::conversation::types::present_or_null"
    )]
    pub topic: Option<Option<Topic>>,
}

// ===== RESPONSE MODELS =====

#[derive(Debug, Serialize)]
pub struct DetectTopicResponse {
    pub topic: Option<Topic>,
}

#[derive(Debug, Serialize)]
pub struct ExtractPreferencesResponse {
    pub topic: Option<Topic>,
    pub preferences: Preferences,
    pub sufficient: bool,
    pub follow_up_questions: Vec<String>,
}
