//! Raw TOML deserialization types.
//!
//! These structs mirror the TOML file shape and use `serde` defaults, so an
//! empty document deserialises to the shipped defaults. The `load` module
//! converts them into the public `types` structs.

use serde::Deserialize;

// ── Top-level ────────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub(super) struct RawConfig {
    #[serde(default)]
    pub server: RawServer,
    #[serde(default)]
    pub gemini: RawGemini,
    #[serde(default)]
    pub openai: RawOpenAi,
    #[serde(default)]
    pub marking: RawMarking,
}

#[derive(Deserialize)]
pub(super) struct RawServer {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for RawServer {
    fn default() -> Self {
        Self { bind: default_bind(), log_level: default_log_level() }
    }
}

// ── Providers ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct RawGemini {
    #[serde(default = "default_gemini_backend")]
    pub backend: String,
    #[serde(default = "default_gemini_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_gemini_model")]
    pub model: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for RawGemini {
    fn default() -> Self {
        Self {
            backend: default_gemini_backend(),
            api_base_url: default_gemini_api_base_url(),
            model: default_gemini_model(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

#[derive(Deserialize)]
pub(super) struct RawOpenAi {
    #[serde(default = "default_openai_backend")]
    pub backend: String,
    #[serde(default = "default_openai_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_openai_model")]
    pub model: String,
    #[serde(default = "default_openai_temperature")]
    pub temperature: f32,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for RawOpenAi {
    fn default() -> Self {
        Self {
            backend: default_openai_backend(),
            api_base_url: default_openai_api_base_url(),
            model: default_openai_model(),
            temperature: default_openai_temperature(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

// ── Marking ──────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct RawMarking {
    #[serde(default = "default_marking_provider")]
    pub default_provider: String,
    #[serde(default = "default_prompts_dir")]
    pub prompts_dir: String,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

impl Default for RawMarking {
    fn default() -> Self {
        Self {
            default_provider: default_marking_provider(),
            prompts_dir: default_prompts_dir(),
            system_prompt: default_system_prompt(),
        }
    }
}

// ── Defaults ─────────────────────────────────────────────────────────────────

pub(super) fn default_bind() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_gemini_backend() -> String {
    "gemini".to_string()
}

fn default_gemini_api_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_openai_backend() -> String {
    "openai".to_string()
}

fn default_openai_api_base_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o".to_string()
}

fn default_openai_temperature() -> f32 {
    0.2
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_marking_provider() -> String {
    "openai".to_string()
}

fn default_prompts_dir() -> String {
    "config/prompts".to_string()
}

pub(super) fn default_system_prompt() -> String {
    "You are a strict exam marker.".to_string()
}
