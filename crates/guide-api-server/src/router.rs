use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let max_body_bytes = state.settings.server.max_body_bytes;

    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check));

    let api_routes = Router::new()
        .route("/api/chat/turn", post(handlers::chat::chat_turn_handler))
        .route("/api/topic/detect", post(handlers::chat::detect_topic_handler))
        .route(
            "/api/preferences/extract",
            post(handlers::chat::extract_preferences_handler),
        )
        .route(
            "/api/conversations/{user_id}",
            get(handlers::conversation::get_state_handler)
                .patch(handlers::conversation::update_state_handler),
        )
        .route(
            "/api/conversations/{user_id}/reset",
            post(handlers::conversation::reset_handler),
        );

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .with_state(state)
        // Size guard lives at the transport; message text itself is never rejected
        .layer(DefaultBodyLimit::max(max_body_bytes))
        // CORS
        .layer(CorsLayer::permissive())
        // Tracing
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
}
