//! Read-only admin introspection under `/admin/*`.
//!
//! Gated by `x-api-key` == `ADMIN_KEY`. No route here mutates state.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;

use crate::error::RelayError;

use super::api::{error_response, json_error};
use super::auth::api_key_matches;
use super::AxumState;

fn check_admin(state: &AxumState, headers: &HeaderMap) -> Result<(), Response> {
    if api_key_matches(headers, state.admin_key.as_deref()) {
        return Ok(());
    }
    warn!(channel_id = %state.channel_id, "rejected admin request with invalid key");
    Err((StatusCode::FORBIDDEN, json_error("Invalid admin key")).into_response())
}

/// GET /admin/stats
pub(super) async fn stats(State(state): State<AxumState>, headers: HeaderMap) -> Response {
    if let Err(resp) = check_admin(&state, &headers) {
        return resp;
    }
    (StatusCode::OK, Json(state.relay.memory().stats())).into_response()
}

/// GET /admin/sessions
pub(super) async fn sessions(State(state): State<AxumState>, headers: HeaderMap) -> Response {
    if let Err(resp) = check_admin(&state, &headers) {
        return resp;
    }
    let sessions = state.relay.memory().session_ids();
    (StatusCode::OK, Json(json!({ "sessions": sessions }))).into_response()
}

/// GET /admin/session/{session_id}
pub(super) async fn session_detail(
    State(state): State<AxumState>,
    headers: HeaderMap,
    Path(session_id): Path<String>,
) -> Response {
    if let Err(resp) = check_admin(&state, &headers) {
        return resp;
    }
    match state.relay.memory().find(&session_id) {
        Some(history) => (
            StatusCode::OK,
            Json(json!({ "session_id": session_id, "history": history })),
        )
            .into_response(),
        None => error_response(&RelayError::NotFound("Session not found".into())),
    }
}

/// GET /admin/env: default model names, never keys.
pub(super) async fn env(State(state): State<AxumState>, headers: HeaderMap) -> Response {
    if let Err(resp) = check_admin(&state, &headers) {
        return resp;
    }
    (
        StatusCode::OK,
        Json(json!({
            "default_openai_model": state.models.openai,
            "default_gemini_model": state.models.gemini,
        })),
    )
        .into_response()
}

/// GET /admin/health
pub(super) async fn health(State(state): State<AxumState>, headers: HeaderMap) -> Response {
    if let Err(resp) = check_admin(&state, &headers) {
        return resp;
    }
    (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response()
}
