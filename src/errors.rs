//! Error types for ConvoBuddy
//!
//! Every collaborator boundary (tokenizer, generation service, durable store)
//! returns these typed errors. The orchestrator decides which ones degrade to
//! a safe default and which ones become in-band text for the user.

use thiserror::Error;

/// Main error type for conversation sessions
#[derive(Error, Debug)]
pub enum ConversationError {
    /// User prompt was empty or whitespace only
    #[error("User prompt is empty")]
    EmptyPrompt,

    /// Persona lookup missed
    #[error("Unknown persona: '{name}'. Available personas: {available:?}")]
    UnknownPersona {
        name: String,
        available: Vec<String>,
    },

    /// Custom persona text was empty or whitespace only
    #[error("Custom system message cannot be empty")]
    InvalidPersonaText,

    /// Oldest-turn eviction attempted on an empty history
    #[error("Cannot evict from an empty history")]
    EmptyHistory,

    /// Durable record exists but could not be decoded
    #[error("History record '{key}' is corrupted: {reason}")]
    CorruptHistory { key: String, reason: String },

    /// Durable record could not be read or written
    #[error("Could not persist history to '{key}': {reason}")]
    PersistenceFailure { key: String, reason: String },

    /// Generation service failed
    #[error("Generation failed ({category}): {detail}")]
    GenerationFailure { category: String, detail: String },

    /// Generation service returned no usable text
    #[error("Model returned an empty response")]
    EmptyGenerationResponse,

    /// Token counting errors
    #[error("Token counting failed: {0}")]
    TokenCountError(String),

    /// Completion state machine transition errors
    #[error("Invalid state transition from {from:?} to {to:?}: {reason}")]
    InvalidTransition {
        from: String,
        to: String,
        reason: String,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic errors with context
    #[error("Conversation error: {0}")]
    Generic(String),
}

impl ConversationError {
    /// Stable type name used in user-facing messages.
    ///
    /// For generation failures this is the category reported by the service.
    pub fn category(&self) -> &str {
        match self {
            ConversationError::EmptyPrompt => "EmptyPrompt",
            ConversationError::UnknownPersona { .. } => "UnknownPersona",
            ConversationError::InvalidPersonaText => "InvalidPersonaText",
            ConversationError::EmptyHistory => "EmptyHistory",
            ConversationError::CorruptHistory { .. } => "CorruptHistory",
            ConversationError::PersistenceFailure { .. } => "PersistenceFailure",
            ConversationError::GenerationFailure { category, .. } => category,
            ConversationError::EmptyGenerationResponse => "EmptyGenerationResponse",
            ConversationError::TokenCountError(_) => "TokenCountError",
            ConversationError::InvalidTransition { .. } => "InvalidTransition",
            ConversationError::ConfigError(_) => "ConfigError",
            ConversationError::HttpError(_) => "HttpError",
            ConversationError::SerializationError(_) => "SerializationError",
            ConversationError::IoError(_) => "IoError",
            ConversationError::Generic(_) => "Generic",
        }
    }

    /// Shorthand for a categorized generation failure
    pub fn generation(category: impl Into<String>, detail: impl Into<String>) -> Self {
        ConversationError::GenerationFailure {
            category: category.into(),
            detail: detail.into(),
        }
    }
}

/// Result type alias for conversation operations
pub type Result<T> = std::result::Result<T, ConversationError>;

/// Convert anyhow errors to ConversationError
impl From<anyhow::Error> for ConversationError {
    fn from(err: anyhow::Error) -> Self {
        ConversationError::Generic(err.to_string())
    }
}
