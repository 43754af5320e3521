//! Application-wide error types.
//!
//! [`AppError`] covers startup and server lifecycle failures.
//! [`RelayError`] is the request pipeline error surfaced to HTTP callers.

use thiserror::Error;

use crate::llm::ProviderError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("logger error: {0}")]
    Logger(String),

    #[error("server error: {0}")]
    Server(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors produced while handling a relay request.
///
/// Input and auth errors are raised before any transcript mutation.
/// Upstream errors carry the provider's diagnostic detail.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Missing message or sub-question.")]
    MissingInput,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid API Key")]
    Auth,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{provider} API failed with HTTP {status}")]
    Upstream {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{provider} API timed out after {seconds}s")]
    UpstreamTimeout {
        provider: &'static str,
        seconds: u64,
    },

    #[error("{provider} request failed: {source}")]
    Provider {
        provider: &'static str,
        #[source]
        source: ProviderError,
    },

    /// Only raised internally by the marking flow; converted to a
    /// zero-mark result before reaching the caller.
    #[error("malformed reply: {0}")]
    MalformedReply(String),
}

impl RelayError {
    /// Attach the provider name to a [`ProviderError`].
    pub fn from_provider(provider: &'static str, err: ProviderError) -> Self {
        match err {
            ProviderError::Upstream { status, body } => RelayError::Upstream { provider, status, body },
            ProviderError::Timeout { seconds } => RelayError::UpstreamTimeout { provider, seconds },
            source => RelayError::Provider { provider, source },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn config_error_display() {
        let e = AppError::Config("missing field".into());
        assert!(e.to_string().contains("missing field"));
        assert!(e.to_string().contains("config error"));
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let e: AppError = io_err.into();
        assert!(e.to_string().contains("io error"));
        let _: &dyn Error = &e;
    }

    #[test]
    fn missing_input_message_matches_client_contract() {
        assert_eq!(RelayError::MissingInput.to_string(), "Missing message or sub-question.");
    }

    #[test]
    fn upstream_provider_error_keeps_status_and_body() {
        let e = RelayError::from_provider(
            "gemini",
            ProviderError::Upstream { status: 500, body: "rate limited".into() },
        );
        match e {
            RelayError::Upstream { provider, status, body } => {
                assert_eq!(provider, "gemini");
                assert_eq!(status, 500);
                assert_eq!(body, "rate limited");
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
    }

    #[test]
    fn timeout_provider_error_maps_to_upstream_timeout() {
        let e = RelayError::from_provider("openai", ProviderError::Timeout { seconds: 30 });
        assert!(matches!(e, RelayError::UpstreamTimeout { provider: "openai", seconds: 30 }));
        assert!(e.to_string().contains("30s"));
    }

    #[test]
    fn transport_error_keeps_source() {
        let e = RelayError::from_provider("gemini", ProviderError::Transport("refused".into()));
        assert!(e.source().is_some());
        assert!(e.to_string().contains("refused"));
    }
}
