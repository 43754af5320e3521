//! Relay subsystem: the request pipeline between the HTTP surface and the
//! LLM providers.
//!
//! [`Relay`] is the long-lived application context. It owns the
//! [`MemorySystem`], one [`LlmProvider`] per provider slot and the cached
//! marking template. The HTTP channel holds it behind an `Arc`.
//!
//! Two flows run through it:
//!
//! - **chat** (`chat.rs`): compose a user turn, append it, send the whole
//!   transcript to the Gemini slot, append the reply.
//! - **marking** (`marking.rs`): render the grading template, send it as a
//!   single prompt, normalize and parse the reply. Stateless.

pub mod chat;
pub mod compose;
pub mod marking;
pub mod normalize;
pub mod prompt;

use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::error::{AppError, RelayError};
use crate::llm::{providers, LlmProvider, ProviderKind};
use crate::subsystems::memory::MemorySystem;

use prompt::{PromptBuilder, DEFAULT_MARK_TEMPLATE, MARK_TEMPLATE_FILE};

/// Marking flow settings resolved at startup.
#[derive(Debug, Clone)]
pub struct MarkingSettings {
    /// Unrendered grading template with `{{var}}` placeholders.
    pub template: String,
    pub system_prompt: String,
    pub default_provider: ProviderKind,
}

impl Default for MarkingSettings {
    fn default() -> Self {
        Self {
            template: DEFAULT_MARK_TEMPLATE.to_string(),
            system_prompt: "You are a strict exam marker.".to_string(),
            default_provider: ProviderKind::OpenAi,
        }
    }
}

pub struct Relay {
    memory: Arc<MemorySystem>,
    gemini: LlmProvider,
    openai: LlmProvider,
    marking: MarkingSettings,
}

impl Relay {
    pub fn new(
        memory: Arc<MemorySystem>,
        gemini: LlmProvider,
        openai: LlmProvider,
        marking: MarkingSettings,
    ) -> Self {
        Self { memory, gemini, openai, marking }
    }

    /// Build both provider slots and load the marking template from `config`.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let gemini = providers::build_gemini(&config.gemini, config.secrets.gemini_api_key.clone())
            .map_err(|e| AppError::Config(format!("[gemini] {e}")))?;
        let openai = providers::build_openai(&config.openai, config.secrets.openai_api_key.clone())
            .map_err(|e| AppError::Config(format!("[openai] {e}")))?;

        let template = PromptBuilder::new(&config.marking.prompts_dir)
            .layer_or(MARK_TEMPLATE_FILE, DEFAULT_MARK_TEMPLATE)
            .template();

        info!(
            gemini = gemini.backend(),
            openai = openai.backend(),
            marking_default = %config.marking.default_provider,
            "relay initialised"
        );

        Ok(Self::new(
            Arc::new(MemorySystem::new()),
            gemini,
            openai,
            MarkingSettings {
                template,
                system_prompt: config.marking.system_prompt.clone(),
                default_provider: config.marking.default_provider,
            },
        ))
    }

    pub fn memory(&self) -> &Arc<MemorySystem> {
        &self.memory
    }

    pub fn provider(&self, kind: ProviderKind) -> &LlmProvider {
        match kind {
            ProviderKind::Gemini => &self.gemini,
            ProviderKind::OpenAi => &self.openai,
        }
    }

    pub fn marking(&self) -> &MarkingSettings {
        &self.marking
    }

    /// Clear a session's transcript. Waits for any in-flight chat on it.
    pub async fn reset(&self, session_id: String) -> Result<(), RelayError> {
        let session_id = compose::require_session_id(session_id)?;
        self.memory.reset(&session_id).await;
        Ok(())
    }
}
