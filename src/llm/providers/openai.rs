//! OpenAI chat completion provider (`/v1/chat/completions`).
//!
//! Stateless per call: the marking flow sends one system instruction plus
//! one assembled user prompt. Transcripts are accepted too, with `model`
//! turns mapped to the `assistant` role. The reply is read from
//! `choices[0].message.content`.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::llm::{ProviderError, ProviderRequest};
use crate::subsystems::memory::Role;

use super::{check_status, http_client, transport_error};

/// Adapter for any HTTP endpoint implementing `/v1/chat/completions`.
///
/// Constructed once at startup, then cheaply cloned because
/// `reqwest::Client` is an `Arc` internally.
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    client: Client,
    api_base_url: String,
    model: String,
    temperature: f32,
    timeout_seconds: u64,
    api_key: Option<String>,
}

impl OpenAiProvider {
    /// `api_key` is sent as `Authorization: Bearer <key>` when present.
    pub fn new(
        api_base_url: String,
        model: String,
        temperature: f32,
        timeout_seconds: u64,
        api_key: Option<String>,
    ) -> Result<Self, ProviderError> {
        let client = http_client(timeout_seconds)?;
        Ok(Self { client, api_base_url, model, temperature, timeout_seconds, api_key })
    }

    pub async fn send(&self, request: ProviderRequest<'_>) -> Result<String, ProviderError> {
        // Some models (gpt-5 family) do not accept a temperature parameter.
        let temperature = if self.model.starts_with("gpt-5") {
            None
        } else {
            Some(self.temperature)
        };

        let payload = ChatCompletionRequest {
            model: &self.model,
            messages: messages(request),
            temperature,
        };

        debug!(
            model = %payload.model,
            temperature = ?payload.temperature,
            messages = payload.messages.len(),
            "sending OpenAI request"
        );
        if tracing::enabled!(tracing::Level::TRACE) {
            let json = serde_json::to_string_pretty(&payload)
                .unwrap_or_else(|e| format!("<serialization failed: {e}>"));
            trace!(payload = %json, "full OpenAI request payload");
        }

        let mut req = self.client.post(&self.api_base_url).json(&payload);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let response = req
            .send()
            .await
            .map_err(|e| transport_error(e, &self.api_base_url, self.timeout_seconds))?;
        let response = check_status(response, self.timeout_seconds).await?;

        let parsed = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    transport_error(e, &self.api_base_url, self.timeout_seconds)
                } else {
                    ProviderError::Envelope(format!("failed to parse response body: {e}"))
                }
            })?;

        debug!(choices = parsed.choices.len(), "received OpenAI response");

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ProviderError::Envelope("missing choices[0].message.content".into()))
    }
}

fn messages(request: ProviderRequest<'_>) -> Vec<Message<'_>> {
    match request {
        ProviderRequest::Transcript(turns) => turns
            .iter()
            .map(|t| Message {
                role: match t.role {
                    Role::User => "user",
                    Role::Model => "assistant",
                },
                content: &t.text,
            })
            .collect(),
        ProviderRequest::Prompt { system, user } => {
            let mut out = Vec::with_capacity(2);
            if let Some(sys) = system {
                out.push(Message { role: "system", content: sys });
            }
            out.push(Message { role: "user", content: user });
            out
        }
    }
}

// ── Private wire types ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}
