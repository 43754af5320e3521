//! Gemini `generateContent` provider.
//!
//! Session-oriented: the conversational flow posts the entire accumulated
//! transcript as `contents` on every call. The reply is read from
//! `candidates[0].content.parts[0].text`. All Gemini wire types are private
//! to this module.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::llm::{ProviderError, ProviderRequest};

use super::{check_status, http_client, transport_error};

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Clone)]
pub struct GeminiProvider {
    client: Client,
    api_base_url: String,
    model: String,
    timeout_seconds: u64,
    api_key: Option<String>,
}

impl GeminiProvider {
    /// `api_base_url` is the API root (e.g. `https://generativelanguage.googleapis.com/v1beta`).
    /// `api_key` is sent in the `x-goog-api-key` header when present, never in the URL.
    pub fn new(
        api_base_url: String,
        model: String,
        timeout_seconds: u64,
        api_key: Option<String>,
    ) -> Result<Self, ProviderError> {
        let client = http_client(timeout_seconds)?;
        Ok(Self { client, api_base_url, model, timeout_seconds, api_key })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base_url, self.model)
    }

    pub async fn send(&self, request: ProviderRequest<'_>) -> Result<String, ProviderError> {
        let payload = GenerateContentRequest::from(request);
        let url = self.endpoint();

        debug!(
            model = %self.model,
            contents = payload.contents.len(),
            "sending Gemini request"
        );
        if tracing::enabled!(tracing::Level::TRACE) {
            let json = serde_json::to_string_pretty(&payload)
                .unwrap_or_else(|e| format!("<serialization failed: {e}>"));
            trace!(payload = %json, "full Gemini request payload");
        }

        let mut req = self.client.post(&url).json(&payload);
        if let Some(key) = &self.api_key {
            req = req.header(API_KEY_HEADER, key);
        }

        let response = req
            .send()
            .await
            .map_err(|e| transport_error(e, &url, self.timeout_seconds))?;
        let response = check_status(response, self.timeout_seconds).await?;

        let parsed = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    transport_error(e, &url, self.timeout_seconds)
                } else {
                    ProviderError::Envelope(format!("failed to parse response body: {e}"))
                }
            })?;

        debug!(candidates = parsed.candidates.len(), "received Gemini response");

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| ProviderError::Envelope("missing candidates[0].content.parts[0].text".into()))
    }
}

// ── Private wire types ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Instruction<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Instruction<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

impl<'a> From<ProviderRequest<'a>> for GenerateContentRequest<'a> {
    fn from(request: ProviderRequest<'a>) -> Self {
        match request {
            ProviderRequest::Transcript(turns) => Self {
                contents: turns
                    .iter()
                    .map(|t| Content { role: t.role.as_str(), parts: vec![Part { text: &t.text }] })
                    .collect(),
                system_instruction: None,
            },
            ProviderRequest::Prompt { system, user } => Self {
                contents: vec![Content { role: "user", parts: vec![Part { text: user }] }],
                system_instruction: system.map(|s| Instruction { parts: vec![Part { text: s }] }),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}
