//! Marking flow: grade one student answer against a markscheme.
//!
//! Stateless. The session id is carried for logging only and the session
//! transcript is never touched.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::RelayError;
use crate::llm::{ProviderKind, ProviderRequest};

use super::compose::require_session_id;
use super::normalize::{normalize, parse_structured, MarkResult};
use super::prompt::render;
use super::Relay;

/// Body of `POST /mark-answer`.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkRequest {
    pub session_id: String,
    pub question_number: String,
    pub marks: i64,
    pub question_content: String,
    pub markscheme: String,
    pub student_answer: String,
    /// `"openai"` or `"gemini"`; the configured default when absent.
    #[serde(default)]
    pub model: Option<String>,
}

/// A validated grading job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkingTask {
    pub session_id: String,
    pub question_number: String,
    pub max_marks: u32,
    pub question: String,
    pub markscheme: String,
    pub student_answer: String,
    pub provider: ProviderKind,
}

impl MarkRequest {
    pub fn validate(self, default_provider: ProviderKind) -> Result<MarkingTask, RelayError> {
        let session_id = require_session_id(self.session_id)?;

        let max_marks = u32::try_from(self.marks).map_err(|_| {
            let reason = if self.marks < 0 { "must not be negative" } else { "is too large" };
            RelayError::InvalidRequest(format!("marks {reason}, got {}", self.marks))
        })?;

        let provider = match self.model.as_deref().filter(|m| !m.trim().is_empty()) {
            None => default_provider,
            Some(name) => name
                .parse::<ProviderKind>()
                .map_err(|_| {
                    RelayError::InvalidRequest(format!("unknown model '{name}', expected 'openai' or 'gemini'"))
                })?,
        };

        Ok(MarkingTask {
            session_id,
            question_number: self.question_number,
            max_marks,
            question: self.question_content,
            markscheme: self.markscheme,
            student_answer: self.student_answer,
            provider,
        })
    }
}

impl MarkingTask {
    /// Render the grading prompt from `template`.
    pub fn prompt(&self, template: &str) -> String {
        let vars = HashMap::from([
            ("question".to_string(), self.question.clone()),
            ("markscheme".to_string(), self.markscheme.clone()),
            ("max_marks".to_string(), self.max_marks.to_string()),
            ("student_answer".to_string(), self.student_answer.clone()),
        ]);
        render(template, &vars)
    }
}

impl Relay {
    /// Grade `task` with its provider.
    ///
    /// Provider failures are surfaced; a reply that is not the expected JSON
    /// becomes a zero-mark [`MarkResult`] instead.
    pub async fn mark(&self, task: MarkingTask) -> Result<MarkResult, RelayError> {
        let settings = self.marking();
        let provider = self.provider(task.provider);
        let prompt = task.prompt(&settings.template);

        debug!(
            session_id = %task.session_id,
            question = %task.question_number,
            provider = %task.provider,
            backend = provider.backend(),
            "sending marking prompt"
        );

        let raw = provider
            .send(ProviderRequest::Prompt { system: Some(settings.system_prompt.as_str()), user: &prompt })
            .await
            .map_err(|e| {
                warn!(session_id = %task.session_id, provider = %task.provider, error = %e, "marking provider call failed");
                RelayError::from_provider(task.provider.as_str(), e)
            })?;

        let result = parse_structured(&normalize(&raw));

        if !(0..=i64::from(task.max_marks)).contains(&result.final_marks) {
            warn!(
                session_id = %task.session_id,
                question = %task.question_number,
                final_marks = result.final_marks,
                max_marks = task.max_marks,
                "model awarded marks outside the allowed range"
            );
        }

        info!(
            session_id = %task.session_id,
            question = %task.question_number,
            final_marks = result.final_marks,
            max_marks = task.max_marks,
            "answer marked"
        );
        Ok(result)
    }
}
