//! Context management module
//!
//! Handles token counting, aggregate cost accounting and budget enforcement.

pub mod accountant;
pub mod counter;
pub mod enforcer;

// Re-export commonly used types
pub use accountant::TokenAccountant;
pub use counter::{HeuristicTokenizer, HfTokenizer, Tokenizer};
pub use enforcer::{BudgetEnforcer, EvictedTurn, DEFAULT_TOKEN_BUDGET, EVICTION_PREVIEW_CHARS};
