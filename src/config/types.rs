//! Public configuration structs consumed by the relay and the HTTP channel.

use std::path::PathBuf;

use crate::llm::ProviderKind;

/// HTTP listener settings (`[server]`).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address the axum channel binds to.
    pub bind: String,
}

/// Gemini slot settings (`[gemini]`).
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// `"gemini"` for the live API or `"dummy"` for the offline echo backend.
    pub backend: String,
    /// API root, without the `/models/...` suffix.
    pub api_base_url: String,
    pub model: String,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
}

/// OpenAI slot settings (`[openai]`).
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// `"openai"` for the live API or `"dummy"` for the offline echo backend.
    pub backend: String,
    /// Full chat completions endpoint URL.
    pub api_base_url: String,
    pub model: String,
    pub temperature: f32,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
}

/// Marking flow settings (`[marking]`).
#[derive(Debug, Clone)]
pub struct MarkingConfig {
    /// Provider used when a mark request does not name one.
    pub default_provider: ProviderKind,
    /// Directory holding `mark_answer.txt`.
    pub prompts_dir: PathBuf,
    /// System instruction sent alongside the grading prompt.
    pub system_prompt: String,
}

/// Secrets sourced from the environment only, never from TOML.
#[derive(Clone, Default)]
pub struct Secrets {
    pub gemini_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    /// Shared secret expected in `x-api-key` on mutating endpoints.
    pub api_secret: Option<String>,
    /// Key expected in `x-api-key` on `/admin/*` routes.
    pub admin_key: Option<String>,
}

impl Secrets {
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Self {
            gemini_api_key: var("GEMINI_API_KEY"),
            openai_api_key: var("OPENAI_API_KEY"),
            api_secret: var("API_SECRET"),
            admin_key: var("ADMIN_KEY"),
        }
    }
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let set = |v: &Option<String>| if v.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("Secrets")
            .field("gemini_api_key", &set(&self.gemini_api_key))
            .field("openai_api_key", &set(&self.openai_api_key))
            .field("api_secret", &set(&self.api_secret))
            .field("admin_key", &set(&self.admin_key))
            .finish()
    }
}

/// Fully-resolved relay configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub server: ServerConfig,
    pub gemini: GeminiConfig,
    pub openai: OpenAiConfig,
    pub marking: MarkingConfig,
    pub secrets: Secrets,
}

/// Env-var overrides applied on top of the TOML values.
///
/// Tests construct this directly instead of mutating the process env.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bind: Option<String>,
    pub log_level: Option<String>,
    pub gemini_model: Option<String>,
    pub openai_model: Option<String>,
}

impl Overrides {
    /// `EXAM_RELAY_BIND`, `EXAM_RELAY_LOG_LEVEL`, `GEMINI_MODEL`, `OPENAI_MODEL`.
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Self {
            bind: var("EXAM_RELAY_BIND"),
            log_level: var("EXAM_RELAY_LOG_LEVEL"),
            gemini_model: var("GEMINI_MODEL"),
            openai_model: var("OPENAI_MODEL"),
        }
    }
}
