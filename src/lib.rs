//! ConvoBuddy v0.1.0 - Budget-bounded chat sessions
//!
//! Keeps one persistent conversation with a remote text-generation service
//! inside a fixed token budget.
//!
//! # Architecture
//!
//! - **persona**: named system-instruction presets plus a custom slot
//! - **context**: token counting, aggregate accounting, FIFO budget enforcement
//! - **session**: ordered history and its durable record
//! - **models**: generation service boundary and the Gemini client
//! - **conversation**: per-exchange orchestration with rollback

pub mod errors;
pub mod types;

pub mod config;
pub mod context;
pub mod conversation;
pub mod models;
pub mod persona;
pub mod session;

// Terminal front end
pub mod cli;
pub mod repl;

// Re-export commonly used types
pub use conversation::{CompletionOptions, ConversationManager};
pub use errors::{ConversationError, Result};
