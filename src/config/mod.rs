//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory
//! (or the path passed with `-f`), then applies `EXAM_RELAY_BIND`,
//! `EXAM_RELAY_LOG_LEVEL`, `GEMINI_MODEL` and `OPENAI_MODEL` overrides.
//! Provider keys and the shared secrets come from the environment only.
//!
//! # Module layout
//!
//! - **types**: Public configuration structs (`Config`, `GeminiConfig`, …).
//! - **raw**: Raw TOML deserialization types; kept private.
//! - **load**: Loading logic: `load`, `load_from`.

mod load;
mod raw;
mod types;

pub use load::{load, load_from};
pub use types::*;

impl Config {
    /// Offline `Config` for tests: dummy backends, no secrets, no external calls.
    pub fn test_default() -> Self {
        Self {
            log_level: "info".into(),
            server: ServerConfig { bind: raw::default_bind() },
            gemini: GeminiConfig {
                backend: "dummy".into(),
                api_base_url: "http://127.0.0.1:0".into(),
                model: "test-gemini".into(),
                timeout_seconds: 1,
            },
            openai: OpenAiConfig {
                backend: "dummy".into(),
                api_base_url: "http://127.0.0.1:0/v1/chat/completions".into(),
                model: "test-openai".into(),
                temperature: 0.0,
                timeout_seconds: 1,
            },
            marking: MarkingConfig {
                default_provider: crate::llm::ProviderKind::OpenAi,
                prompts_dir: std::path::PathBuf::from("config/prompts"),
                system_prompt: raw::default_system_prompt(),
            },
            secrets: Secrets::default(),
        }
    }
}
