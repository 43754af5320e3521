//! LLM provider implementations.
//!
//! `build_gemini` / `build_openai` are the factories, called at startup,
//! one per provider slot. Each slot can be pointed at the `dummy` backend
//! for offline development.

pub mod dummy;
pub mod gemini;
pub mod openai;

use tracing::error;

use crate::config::{GeminiConfig, OpenAiConfig};
use crate::llm::{LlmProvider, ProviderError};

/// Construct the Gemini slot. `api_key` comes from `GEMINI_API_KEY` env.
pub fn build_gemini(config: &GeminiConfig, api_key: Option<String>) -> Result<LlmProvider, ProviderError> {
    match config.backend.as_str() {
        "dummy" => Ok(LlmProvider::Dummy(dummy::DummyProvider)),
        "gemini" => {
            let p = gemini::GeminiProvider::new(
                config.api_base_url.clone(),
                config.model.clone(),
                config.timeout_seconds,
                api_key,
            )?;
            Ok(LlmProvider::Gemini(p))
        }
        other => Err(ProviderError::UnknownProvider(other.to_string())),
    }
}

/// Construct the OpenAI slot. `api_key` comes from `OPENAI_API_KEY` env.
pub fn build_openai(config: &OpenAiConfig, api_key: Option<String>) -> Result<LlmProvider, ProviderError> {
    match config.backend.as_str() {
        "dummy" => Ok(LlmProvider::Dummy(dummy::DummyProvider)),
        "openai" => {
            let p = openai::OpenAiProvider::new(
                config.api_base_url.clone(),
                config.model.clone(),
                config.temperature,
                config.timeout_seconds,
                api_key,
            )?;
            Ok(LlmProvider::OpenAi(p))
        }
        other => Err(ProviderError::UnknownProvider(other.to_string())),
    }
}

/// Build a `reqwest::Client` with the per-request timeout applied.
pub(crate) fn http_client(timeout_seconds: u64) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .build()
        .map_err(|e| ProviderError::Build(e.to_string()))
}

/// Classify a reqwest failure: client timeouts become [`ProviderError::Timeout`].
///
/// The request URL is stripped from the error before it is logged or returned.
pub(crate) fn transport_error(e: reqwest::Error, url: &str, timeout_seconds: u64) -> ProviderError {
    let e = e.without_url();
    if e.is_timeout() {
        error!(%url, timeout_seconds, "LLM request timed out");
        ProviderError::Timeout { seconds: timeout_seconds }
    } else {
        error!(%url, error = %e, "LLM HTTP request failed (transport)");
        ProviderError::Transport(e.to_string())
    }
}

/// Consume the response and return it if successful, or the raw status and body.
pub(crate) async fn check_status(
    response: reqwest::Response,
    timeout_seconds: u64,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) if e.is_timeout() => {
            error!(%status, timeout_seconds, "timed out reading LLM error body");
            return Err(ProviderError::Timeout { seconds: timeout_seconds });
        }
        Err(_) => "<failed to read error body>".to_string(),
    };

    error!(%status, %body, "LLM request returned HTTP error");
    Err(ProviderError::Upstream { status: status.as_u16(), body })
}
