//! Axum-based HTTP channel for the relay.
//!
//! Implements [`Component`] so it slots into the comms subsystem lifecycle:
//! `run()` drives the axum event loop; the shared [`CancellationToken`]
//! is wired to axum's graceful shutdown.
//!
//! ## URL layout
//!
//! ```text
//! GET  /health                     liveness, unauthenticated
//! POST /gemini                     chat turn            (x-api-key = API_SECRET)
//! POST /reset                      clear a session      (x-api-key = API_SECRET)
//! POST /mark-answer                grade an answer      (x-api-key = API_SECRET)
//! GET  /admin/stats                                     (x-api-key = ADMIN_KEY)
//! GET  /admin/sessions
//! GET  /admin/session/{session_id}
//! GET  /admin/env
//! GET  /admin/health
//! ```

#[cfg(feature = "admin")]
mod admin;
mod api;
mod auth;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::Config;
use crate::error::AppError;
use crate::subsystems::relay::Relay;
use crate::subsystems::runtime::{Component, ComponentFuture};

// ── Shared request state ──────────────────────────────────────────────────────

/// Default model names reported by `/admin/env`.
#[derive(Debug, Clone)]
pub struct ModelNames {
    pub gemini: String,
    pub openai: String,
}

/// Axum router state injected into every handler via [`axum::extract::State`].
///
/// Cheap to clone; all fields are reference-counted.
#[derive(Clone)]
pub struct AxumState {
    /// Channel identifier used in log spans.
    pub channel_id: Arc<str>,
    pub relay: Arc<Relay>,
    /// Expected `x-api-key` on relay routes; `None` rejects every request.
    pub api_secret: Option<Arc<str>>,
    /// Expected `x-api-key` on admin routes; `None` rejects every request.
    pub admin_key: Option<Arc<str>>,
    pub models: Arc<ModelNames>,
}

impl AxumState {
    pub fn new(channel_id: &str, relay: Arc<Relay>, config: &Config) -> Self {
        Self {
            channel_id: Arc::from(channel_id),
            relay,
            api_secret: config.secrets.api_secret.as_deref().map(Arc::from),
            admin_key: config.secrets.admin_key.as_deref().map(Arc::from),
            models: Arc::new(ModelNames {
                gemini: config.gemini.model.clone(),
                openai: config.openai.model.clone(),
            }),
        }
    }
}

// ── AxumChannel ───────────────────────────────────────────────────────────────

pub struct AxumChannel {
    bind_addr: String,
    state: AxumState,
}

impl AxumChannel {
    pub fn new(bind_addr: impl Into<String>, state: AxumState) -> Self {
        Self { bind_addr: bind_addr.into(), state }
    }
}

impl Component for AxumChannel {
    fn id(&self) -> &str {
        &self.state.channel_id
    }

    fn run(self: Box<Self>, shutdown: CancellationToken) -> ComponentFuture {
        Box::pin(run_axum(self.bind_addr, self.state, shutdown))
    }
}

// ── Server loop ───────────────────────────────────────────────────────────────

async fn run_axum(
    bind_addr: String,
    state: AxumState,
    shutdown: CancellationToken,
) -> Result<(), AppError> {
    let channel_id = state.channel_id.clone();
    let router = build_router(state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| AppError::Server(format!("axum bind failed on {bind_addr}: {e}")))?;

    info!(%channel_id, %bind_addr, "axum channel listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| AppError::Server(format!("axum server error: {e}")))?;

    info!(%channel_id, "axum channel shut down");
    Ok(())
}

// ── Router ────────────────────────────────────────────────────────────────────

pub fn build_router(state: AxumState) -> Router {
    let router = Router::new()
        .route("/health",      get(api::health))
        .route("/gemini",      post(api::gemini))
        .route("/reset",       post(api::reset))
        .route("/mark-answer", post(api::mark_answer));

    #[cfg(feature = "admin")]
    let router = router
        .route("/admin/stats",               get(admin::stats))
        .route("/admin/sessions",            get(admin::sessions))
        .route("/admin/session/{session_id}", get(admin::session_detail))
        .route("/admin/env",                 get(admin::env))
        .route("/admin/health",              get(admin::health));

    router.with_state(state)
}
