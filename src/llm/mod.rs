//! LLM provider abstraction.
//!
//! `LlmProvider` is an enum over concrete provider implementations.
//! Add a new variant + module in `providers/` for each additional backend.
//!
//! Every backend accepts the same [`ProviderRequest`] (a running transcript
//! or a single assembled prompt) and returns the reply text, so the relay
//! flows never see a provider's wire envelope.
//!
//! Provider instances are shared immutable capabilities; clone them freely.

pub mod providers;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::subsystems::memory::Turn;

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
    /// Non-success HTTP status; `body` is the raw upstream response text.
    #[error("HTTP {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("request timed out after {seconds}s")]
    Timeout { seconds: u64 },
    #[error("transport error: {0}")]
    Transport(String),
    /// The response parsed but the reply text was not where it should be.
    #[error("unexpected response envelope: {0}")]
    Envelope(String),
    #[error("failed to build HTTP client: {0}")]
    Build(String),
}

// ── Provider selection ────────────────────────────────────────────────────────

/// The two provider slots a request can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Gemini,
    OpenAi,
}

impl ProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::OpenAi => "openai",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ProviderError;

    /// Case-insensitive: `"gemini"`, `"openai"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(ProviderKind::Gemini),
            "openai" => Ok(ProviderKind::OpenAi),
            _ => Err(ProviderError::UnknownProvider(s.to_string())),
        }
    }
}

// ── Request shape ─────────────────────────────────────────────────────────────

/// What gets sent upstream.
#[derive(Debug, Clone, Copy)]
pub enum ProviderRequest<'a> {
    /// The whole accumulated session, oldest turn first.
    Transcript(&'a [Turn]),
    /// One self-contained prompt with an optional system instruction.
    Prompt { system: Option<&'a str>, user: &'a str },
}

// ── Provider enum ─────────────────────────────────────────────────────────────

/// All available provider backends.
///
/// Enum dispatch avoids `dyn` trait objects and the `async-trait` dependency.
/// Adding a backend = new module + new variant + new `send` arm.
#[derive(Debug, Clone)]
pub enum LlmProvider {
    Gemini(providers::gemini::GeminiProvider),
    OpenAi(providers::openai::OpenAiProvider),
    Dummy(providers::dummy::DummyProvider),
}

impl LlmProvider {
    /// Send `request` to the provider and return its raw reply text.
    pub async fn send(&self, request: ProviderRequest<'_>) -> Result<String, ProviderError> {
        match self {
            LlmProvider::Gemini(p) => p.send(request).await,
            LlmProvider::OpenAi(p) => p.send(request).await,
            LlmProvider::Dummy(p) => p.send(request).await,
        }
    }

    /// Backend name for logs.
    pub fn backend(&self) -> &'static str {
        match self {
            LlmProvider::Gemini(_) => "gemini",
            LlmProvider::OpenAi(_) => "openai",
            LlmProvider::Dummy(_) => "dummy",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_kind_parses_case_insensitively() {
        assert_eq!("gemini".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
        assert_eq!("OpenAI".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert_eq!(" GEMINI ".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
    }

    #[test]
    fn unknown_provider_kind_errors() {
        let err = "claude".parse::<ProviderKind>().unwrap_err();
        assert!(matches!(err, ProviderError::UnknownProvider(ref s) if s == "claude"));
    }

    #[test]
    fn upstream_error_display_includes_body() {
        let e = ProviderError::Upstream { status: 429, body: "slow down".into() };
        assert_eq!(e.to_string(), "HTTP 429: slow down");
    }
}
