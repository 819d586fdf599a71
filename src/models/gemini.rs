//! Gemini API client
//!
//! Calls `POST {base_url}/v1beta/models/{model}:generateContent` with the
//! system instruction, the full turn list and the generation config. The API
//! key travels in the `x-goog-api-key` header, never in the URL.
//!
//! Failure categories reported to the orchestrator:
//! - `MissingApiKey`: no key configured
//! - `HttpError`: transport failure
//! - `ApiError`: non-2xx status or an `error` body
//! - `MalformedResponse`: body could not be decoded

use crate::errors::{ConversationError, Result};
use crate::models::service::{GenerationRequest, GenerationService};
use crate::types::{Part, TurnRecord};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default Gemini API endpoint
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";

/// Environment variable holding the API key
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Request timeout (120 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini generation client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GeminiClient {
    /// Create Gemini client with custom configuration
    pub fn with_config(base_url: &str, api_key: Option<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(ConversationError::HttpError)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    /// Get base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self, model: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl GenerationService for GeminiClient {
    async fn complete(&self, request: &GenerationRequest) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ConversationError::generation(
                "MissingApiKey",
                format!("Gemini API key not found. Set {} in the environment.", DEFAULT_API_KEY_ENV),
            )
        })?;

        let url = self.endpoint(&request.model);
        debug!(url = %url, turns = request.turns.len(), "Sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, api_key)
            .json(&GenerateContentRequest::from(request))
            .send()
            .await
            .map_err(|e| ConversationError::HttpError(e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ConversationError::HttpError(e.without_url()))?;

        if !status.is_success() {
            return Err(ConversationError::generation(
                "ApiError",
                format!("HTTP {}: {}", status, body),
            ));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| ConversationError::generation("MalformedResponse", e.to_string()))?;

        parsed.into_text()
    }
}

/// generateContent request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<TurnRecord>,
    system_instruction: SystemInstruction,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

impl From<&GenerationRequest> for GenerateContentRequest {
    fn from(request: &GenerationRequest) -> Self {
        Self {
            contents: request.turns.iter().cloned().map(TurnRecord::from).collect(),
            system_instruction: SystemInstruction {
                parts: vec![Part {
                    text: request.system_instruction.clone(),
                }],
            },
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_output_tokens,
            },
        }
    }
}

/// generateContent response body
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl GenerateContentResponse {
    /// Text of the first candidate; empty when the model produced none
    fn into_text(self) -> Result<String> {
        if let Some(error) = self.error {
            return Err(ConversationError::generation("ApiError", error.message));
        }

        let text = self
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        Ok(text)
    }
}
