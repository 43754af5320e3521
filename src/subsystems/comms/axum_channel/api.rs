//! Axum handlers for the relay routes.
//!
//! Each handler receives [`AxumState`] via [`axum::extract::State`] and
//! returns an axum [`Response`]. The shared secret is checked before the
//! body is looked at, so a bad key never reaches the relay.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::error::RelayError;
use crate::subsystems::relay::compose::{ChatInput, ChatRequest};
use crate::subsystems::relay::marking::MarkRequest;

use super::auth::api_key_matches;
use super::AxumState;

// ── Request types ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct ResetRequest {
    session_id: String,
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Build a JSON error response body.
pub(super) fn json_error(msg: impl std::fmt::Display) -> Json<serde_json::Value> {
    Json(json!({ "error": format!("{msg}") }))
}

fn provider_label(provider: &str) -> &str {
    match provider {
        "gemini" => "Gemini",
        "openai" => "OpenAI",
        other => other,
    }
}

/// Map a [`RelayError`] to its HTTP status and `{error, details?}` body.
pub(super) fn error_response(err: &RelayError) -> Response {
    match err {
        RelayError::MissingInput | RelayError::InvalidRequest(_) => {
            (StatusCode::BAD_REQUEST, json_error(err)).into_response()
        }
        RelayError::Auth => (StatusCode::FORBIDDEN, json_error(err)).into_response(),
        RelayError::NotFound(what) => (StatusCode::NOT_FOUND, json_error(what)).into_response(),
        RelayError::Upstream { provider, status, body } => (
            StatusCode::BAD_GATEWAY,
            Json(json!({
                "error": format!("{} API failed", provider_label(provider)),
                "status_code": status,
                "details": body,
            })),
        )
            .into_response(),
        RelayError::UpstreamTimeout { provider, seconds } => (
            StatusCode::GATEWAY_TIMEOUT,
            Json(json!({
                "error": format!("{} API timed out", provider_label(provider)),
                "details": format!("no response within {seconds}s"),
            })),
        )
            .into_response(),
        RelayError::Provider { provider, source } => (
            StatusCode::BAD_GATEWAY,
            Json(json!({
                "error": format!("{} request failed", provider_label(provider)),
                "details": source.to_string(),
            })),
        )
            .into_response(),
        RelayError::MalformedReply(details) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": "Malformed reply", "details": details })),
        )
            .into_response(),
    }
}

/// Check the shared secret, then unwrap the JSON body.
fn authorized_body<T>(
    state: &AxumState,
    headers: &HeaderMap,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, Response> {
    if !api_key_matches(headers, state.api_secret.as_deref()) {
        warn!(channel_id = %state.channel_id, "rejected request with invalid api key");
        return Err(error_response(&RelayError::Auth));
    }
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            debug!(channel_id = %state.channel_id, "bad request body: {rejection}");
            Err(error_response(&RelayError::InvalidRequest(rejection.body_text())))
        }
    }
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// GET /health: unauthenticated liveness probe.
pub(super) async fn health() -> Response {
    (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response()
}

/// POST /gemini
pub(super) async fn gemini(
    State(state): State<AxumState>,
    headers: HeaderMap,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let req = match authorized_body(&state, &headers, payload) {
        Ok(req) => req,
        Err(resp) => return resp,
    };

    let input = match ChatInput::try_from(req) {
        Ok(input) => input,
        Err(e) => return error_response(&e),
    };

    match state.relay.chat(input).await {
        Ok(reply) => (StatusCode::OK, Json(json!({ "reply": reply }))).into_response(),
        Err(e) => {
            warn!(channel_id = %state.channel_id, "chat failed: {e}");
            error_response(&e)
        }
    }
}

/// POST /reset
pub(super) async fn reset(
    State(state): State<AxumState>,
    headers: HeaderMap,
    payload: Result<Json<ResetRequest>, JsonRejection>,
) -> Response {
    let req = match authorized_body(&state, &headers, payload) {
        Ok(req) => req,
        Err(resp) => return resp,
    };

    match state.relay.reset(req.session_id).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "success": true }))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// POST /mark-answer
pub(super) async fn mark_answer(
    State(state): State<AxumState>,
    headers: HeaderMap,
    payload: Result<Json<MarkRequest>, JsonRejection>,
) -> Response {
    let req = match authorized_body(&state, &headers, payload) {
        Ok(req) => req,
        Err(resp) => return resp,
    };

    let task = match req.validate(state.relay.marking().default_provider) {
        Ok(task) => task,
        Err(e) => return error_response(&e),
    };

    match state.relay.mark(task).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => {
            warn!(channel_id = %state.channel_id, "marking failed: {e}");
            error_response(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ProviderError;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn upstream_error_carries_status_and_details() {
        let resp = error_response(&RelayError::Upstream {
            provider: "gemini",
            status: 500,
            body: "rate limited".into(),
        });
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(resp).await;
        assert_eq!(body["error"], "Gemini API failed");
        assert_eq!(body["status_code"], 500);
        assert_eq!(body["details"], "rate limited");
    }

    #[tokio::test]
    async fn timeout_maps_to_gateway_timeout() {
        let resp = error_response(&RelayError::UpstreamTimeout { provider: "openai", seconds: 30 });
        assert_eq!(resp.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body_json(resp).await["error"], "OpenAI API timed out");
    }

    #[tokio::test]
    async fn transport_failure_is_bad_gateway() {
        let resp = error_response(&RelayError::from_provider(
            "gemini",
            ProviderError::Transport("connection refused".into()),
        ));
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        assert!(body_json(resp).await["details"].as_str().unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn input_errors_are_bad_request() {
        let resp = error_response(&RelayError::MissingInput);
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"], "Missing message or sub-question.");
    }

    #[tokio::test]
    async fn auth_is_forbidden() {
        let resp = error_response(&RelayError::Auth);
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(resp).await["error"], "Invalid API Key");
    }
}
