use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::services::conversation::{ConversationState, StateUpdate};
use crate::services::ConversationManager;
use crate::utils::error::ApiError;

pub async fn get_state_handler(
    State(manager): State<Arc<ConversationManager>>,
    Path(user_id): Path<String>,
) -> Json<ConversationState> {
    Json(manager.get_conversation_state(Some(user_id.as_str())))
}

pub async fn update_state_handler(
    State(manager): State<Arc<ConversationManager>>,
    Path(user_id): Path<String>,
    payload: Result<Json<StateUpdate>, JsonRejection>,
) -> Result<Json<ConversationState>, ApiError> {
    let Json(update) = payload?;
    Ok(Json(manager.update_conversation_state(&user_id, update)))
}

pub async fn reset_handler(
    State(manager): State<Arc<ConversationManager>>,
    Path(user_id): Path<String>,
) -> Json<ConversationState> {
    info!("Resetting conversation for {}", user_id);
    Json(manager.reset_conversation(&user_id))
}
