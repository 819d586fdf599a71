//! Persona management
//!
//! Named system-instruction presets plus one mutable custom slot, owned by
//! each session rather than shared process-wide.

pub mod registry;

// Re-export commonly used types
pub use registry::{Persona, PersonaRegistry, ACTIVATION_PREVIEW_CHARS};
