//! Generation service boundary
//!
//! The orchestrator only needs to know whether a call failed; the failure
//! category is carried along for the user-facing message.

use crate::errors::Result;
use crate::types::Turn;
use async_trait::async_trait;

/// Default model identifier
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default maximum output size (tokens)
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 512;

/// One completion request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub system_instruction: String,
    pub turns: Vec<Turn>,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

/// Remote text-generation service
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Produce a completion for the request
    ///
    /// `Ok` may carry empty text; deciding what that means is up to the caller.
    async fn complete(&self, request: &GenerationRequest) -> Result<String>;
}
