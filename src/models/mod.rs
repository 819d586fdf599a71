//! Text-generation service module
//!
//! This module provides the generation boundary used by the conversation
//! manager and its Gemini implementation:
//! - `GenerationService` trait and request type
//! - `GeminiClient` over the generateContent REST API

pub mod gemini;
pub mod service;

// Re-export key types for convenience
pub use gemini::GeminiClient;
pub use service::{
    GenerationRequest, GenerationService, DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_MODEL,
    DEFAULT_TEMPERATURE,
};
