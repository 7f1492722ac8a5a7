use axum::{extract::rejection::JsonRejection, extract::State, Json};
use std::sync::Arc;
use tracing::info;

use crate::models::chat::*;
use crate::services::conversation::TurnOutcome;
use crate::services::ConversationManager;
use crate::utils::error::ApiError;

// Any message text is accepted: empty, huge or unrecognised input degrades to
// "no topic" / "no preferences". Only unreadable bodies are rejected.

pub async fn chat_turn_handler(
    State(manager): State<Arc<ConversationManager>>,
    payload: Result<Json<ChatTurnRequest>, JsonRejection>,
) -> Result<Json<TurnOutcome>, ApiError> {
    let Json(request) = payload?;

    info!(
        "Chat turn: user={}, message_len={}",
        request.user_id.as_deref().unwrap_or("<default>"),
        request.message.len()
    );

    let outcome = manager.process_turn(request.user_id.as_deref(), &request.message);
    Ok(Json(outcome))
}

pub async fn detect_topic_handler(
    State(manager): State<Arc<ConversationManager>>,
    payload: Result<Json<DetectTopicRequest>, JsonRejection>,
) -> Result<Json<DetectTopicResponse>, ApiError> {
    let Json(request) = payload?;

    Ok(Json(DetectTopicResponse {
        topic: manager.detect_topic(&request.message),
    }))
}

pub async fn extract_preferences_handler(
    State(manager): State<Arc<ConversationManager>>,
    payload: Result<Json<ExtractPreferencesRequest>, JsonRejection>,
) -> Result<Json<ExtractPreferencesResponse>, ApiError> {
    let Json(request) = payload?;

    // absent: detect from the message; explicit null: shared slots only
    let topic = match request.topic {
        Some(topic) => topic,
        None => manager.detect_topic(&request.message),
    };
    let preferences = manager.extract_preferences(&request.message, topic);
    let sufficient = manager.has_enough_preferences(topic, &preferences);
    let follow_up_questions = if sufficient {
        Vec::new()
    } else {
        manager.generate_follow_up_questions(topic, &preferences)
    };

    Ok(Json(ExtractPreferencesResponse {
        topic,
        preferences,
        sufficient,
        follow_up_questions,
    }))
}
