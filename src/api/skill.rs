//! Voice platform webhook

use std::sync::Arc;

use axum::{Json, Router, body::Bytes, extract::State, routing::post};

use super::ApiState;
use crate::response::SpeechResponse;

/// Handle one platform request
///
/// The body is read raw rather than through the `Json` extractor so that a
/// malformed payload still gets a spoken envelope instead of a 4xx.
pub async fn handle_event(State(state): State<Arc<ApiState>>, body: Bytes) -> Json<SpeechResponse> {
    let event = serde_json::from_slice(&body).unwrap_or_else(|e| {
        tracing::warn!(error = %e, bytes = body.len(), "request body is not JSON");
        serde_json::Value::Null
    });

    Json(state.skill.handle(&event).await)
}

/// Build skill router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/", post(handle_event))
        .route("/skill", post(handle_event))
        .with_state(state)
}
