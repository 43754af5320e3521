//! Comms subsystem: external I/O channels.
//!
//! Each channel implements [`runtime::Component`](crate::subsystems::runtime::Component)
//! and is spawned by [`start`] via
//! [`spawn_components`](crate::subsystems::runtime::spawn_components).
//! Channels capture the shared [`Relay`] at construction time; no state is
//! passed through the generic `Component::run` signature.
//!
//! # Starting
//!
//! [`start`] is synchronous; it returns a [`SubsystemHandle`] as soon as
//! the tasks are spawned. The caller decides when (or whether) to await it.

pub mod axum_channel;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::Config;
use crate::subsystems::relay::Relay;
use crate::subsystems::runtime::{spawn_components, Component, SubsystemHandle};

use axum_channel::{AxumChannel, AxumState};

/// Spawn the HTTP channel and return a [`SubsystemHandle`].
///
/// If the channel exits with an error the shared `shutdown` token is
/// cancelled. The handle resolves when the channel has exited.
pub fn start(config: &Config, relay: Arc<Relay>, shutdown: CancellationToken) -> SubsystemHandle {
    let state = AxumState::new("http0", relay, config);

    info!(bind = %config.server.bind, "loading axum channel");
    let components: Vec<Box<dyn Component>> =
        vec![Box::new(AxumChannel::new(config.server.bind.clone(), state))];

    spawn_components(components, shutdown)
}
