//! Persona registry
//!
//! Holds the built-in presets, the custom slot and the active system message.
//! Lookups are case-insensitive; failed lookups never touch the active text.

use crate::errors::{ConversationError, Result};
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// Number of characters of the active text shown when a persona is activated
pub const ACTIVATION_PREVIEW_CHARS: usize = 60;

const FRIENDLY: &str = "You are a warm, encouraging, and helpful tutor. Always respond positively and offer constructive advice.";
const SARCASTIC: &str = "You are a cynical, witty, and condescending critic. Your responses should be slightly mean but smart.";
const ACADEMIC: &str = "You are a precise, formal, and highly knowledgeable subject matter expert. Use complex vocabulary and objective tone.";
const SASSY: &str = "You are a sassy assistant who is fed up with answering questions. Your responses should be short and dismissive.";
const DEFAULT_CUSTOM: &str = "You are a helpful assistant.";

/// Built-in persona names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Persona {
    Friendly,
    Sarcastic,
    Academic,
    Sassy,
    Custom,
}

impl Persona {
    /// All personas in listing order
    pub const ALL: [Persona; 5] = [
        Persona::Friendly,
        Persona::Sarcastic,
        Persona::Academic,
        Persona::Sassy,
        Persona::Custom,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Persona::Friendly => "friendly",
            Persona::Sarcastic => "sarcastic",
            Persona::Academic => "academic",
            Persona::Sassy => "sassy",
            Persona::Custom => "custom",
        }
    }

    /// Preset instruction text; `None` for the mutable custom slot
    fn preset(&self) -> Option<&'static str> {
        match self {
            Persona::Friendly => Some(FRIENDLY),
            Persona::Sarcastic => Some(SARCASTIC),
            Persona::Academic => Some(ACADEMIC),
            Persona::Sassy => Some(SASSY),
            Persona::Custom => None,
        }
    }

    /// Names of every persona, in listing order
    pub fn names() -> Vec<String> {
        Self::ALL.iter().map(|p| p.name().to_string()).collect()
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Persona {
    type Err = ConversationError;

    fn from_str(name: &str) -> Result<Self> {
        let key = name.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.name() == key)
            .ok_or_else(|| ConversationError::UnknownPersona {
                name: name.to_string(),
                available: Self::names(),
            })
    }
}

/// Persona presets and the currently active system message
#[derive(Debug, Clone)]
pub struct PersonaRegistry {
    custom: String,
    active: String,
    active_persona: Option<Persona>,
}

impl PersonaRegistry {
    /// Registry with the sassy preset active
    pub fn new() -> Self {
        Self {
            custom: DEFAULT_CUSTOM.to_string(),
            active: SASSY.to_string(),
            active_persona: Some(Persona::Sassy),
        }
    }

    /// Registry whose active text is an arbitrary instruction
    ///
    /// The text is not stored in any slot; the custom slot keeps its default.
    pub fn with_system_message(text: impl Into<String>) -> Self {
        Self {
            custom: DEFAULT_CUSTOM.to_string(),
            active: text.into(),
            active_persona: None,
        }
    }

    /// Instruction text stored under a persona
    pub fn text_of(&self, persona: Persona) -> &str {
        persona.preset().unwrap_or(self.custom.as_str())
    }

    /// Activate a persona by name (case-insensitive)
    pub fn select(&mut self, name: &str) -> Result<Persona> {
        let persona: Persona = name.parse()?;
        self.active = self.text_of(persona).to_string();
        self.active_persona = Some(persona);

        info!(persona = %persona, "Persona changed to '{}'", persona);
        self.log_activation();
        Ok(persona)
    }

    /// Store a custom instruction and activate it
    pub fn set_custom(&mut self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(ConversationError::InvalidPersonaText);
        }

        self.custom = text.to_string();
        self.active = self.custom.clone();
        self.active_persona = Some(Persona::Custom);

        info!("Custom persona set and activated");
        self.log_activation();
        Ok(())
    }

    /// Currently active system message
    pub fn active(&self) -> &str {
        &self.active
    }

    /// Persona the active text came from, if any
    pub fn active_persona(&self) -> Option<Persona> {
        self.active_persona
    }

    fn log_activation(&self) {
        let preview: String = self.active.chars().take(ACTIVATION_PREVIEW_CHARS).collect();
        info!("System message updated to: '{}...'", preview);
    }
}

impl Default for PersonaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_sassy() {
        let registry = PersonaRegistry::new();
        assert_eq!(registry.active(), SASSY);
        assert_eq!(registry.active_persona(), Some(Persona::Sassy));
    }

    #[test]
    fn test_select_is_case_insensitive() {
        let mut registry = PersonaRegistry::new();
        let persona = registry.select("FrIeNdLy").unwrap();

        assert_eq!(persona, Persona::Friendly);
        assert_eq!(registry.active(), FRIENDLY);
    }

    #[test]
    fn test_unknown_persona_keeps_active_text() {
        let mut registry = PersonaRegistry::new();
        registry.select("academic").unwrap();

        let err = registry.select("grumpy").unwrap_err();
        match err {
            ConversationError::UnknownPersona { name, available } => {
                assert_eq!(name, "grumpy");
                assert_eq!(available, Persona::names());
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert_eq!(registry.active(), ACADEMIC);
        assert_eq!(registry.active_persona(), Some(Persona::Academic));
    }

    #[test]
    fn test_set_custom_activates_and_persists_slot() {
        let mut registry = PersonaRegistry::new();
        registry.set_custom("You only answer in haiku.").unwrap();

        assert_eq!(registry.active(), "You only answer in haiku.");
        assert_eq!(registry.active_persona(), Some(Persona::Custom));

        registry.select("sassy").unwrap();
        registry.select("custom").unwrap();
        assert_eq!(registry.active(), "You only answer in haiku.");
    }

    #[test]
    fn test_blank_custom_rejected() {
        let mut registry = PersonaRegistry::new();

        for text in ["", "   ", "\n\t"] {
            let err = registry.set_custom(text).unwrap_err();
            assert!(matches!(err, ConversationError::InvalidPersonaText));
        }

        assert_eq!(registry.active(), SASSY);
        assert_eq!(registry.text_of(Persona::Custom), DEFAULT_CUSTOM);
    }

    #[test]
    fn test_with_system_message() {
        let registry = PersonaRegistry::with_system_message("Be brief.");
        assert_eq!(registry.active(), "Be brief.");
        assert_eq!(registry.active_persona(), None);
        assert_eq!(registry.text_of(Persona::Custom), DEFAULT_CUSTOM);
    }

    #[test]
    fn test_registries_are_independent() {
        let mut first = PersonaRegistry::new();
        let second = PersonaRegistry::new();

        first.set_custom("Only first sees this.").unwrap();
        assert_eq!(second.text_of(Persona::Custom), DEFAULT_CUSTOM);
    }
}
