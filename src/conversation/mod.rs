//! Conversation orchestration
//!
//! Ties personas, token accounting, budget enforcement, history persistence
//! and the generation service into one session.

pub mod manager;
pub mod state;

pub use manager::{
    failure_reply, CompletionOptions, ConversationManager, HistoryEntry, EMPTY_PROMPT_REPLY,
    EMPTY_RESPONSE_REPLY,
};
pub use state::{CompletionEvent, CompletionState};
