//! Type definitions module
//!
//! Core types for conversation turns and their durable record format.

pub mod messages;

// Re-export commonly used types
pub use messages::{Part, Role, Turn, TurnRecord};
