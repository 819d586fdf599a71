//! Session history and its durable storage
//!
//! Components:
//! - History Store: ordered turns with FIFO eviction and rollback primitives
//! - Persistence: one durable record per session (JSON file or in-memory)

pub mod history;
pub mod persistence;

// Re-export key types
pub use history::{HistoryStore, LoadOutcome};
pub use persistence::{DurableStore, JsonFileStore, MemoryStore};
