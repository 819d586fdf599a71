//! Conversation manager - request orchestration around the generation call
//!
//! Each exchange runs the [`CompletionState`] machine:
//! validate → append user turn → enforce budget → generate →
//! commit + persist, or roll back the user turn.
//!
//! Collaborator failures never escape [`ConversationManager::chat_completion`]:
//! they become a fallback value (cost 0, empty history) or in-band text.

use crate::config::SessionConfig;
use crate::context::{BudgetEnforcer, EvictedTurn, TokenAccountant, Tokenizer};
use crate::conversation::state::{CompletionEvent, CompletionState};
use crate::errors::{ConversationError, Result};
use crate::models::{GenerationRequest, GenerationService};
use crate::persona::{Persona, PersonaRegistry};
use crate::session::{DurableStore, HistoryStore, LoadOutcome};
use crate::types::{Role, Turn};
use std::collections::VecDeque;
use tracing::{debug, error, info, warn};

/// Returned when the prompt is empty or whitespace only
pub const EMPTY_PROMPT_REPLY: &str =
    "Please provide a non-empty message to continue the conversation.";

/// Returned when the model answers with blank text
pub const EMPTY_RESPONSE_REPLY: &str =
    "The model returned an empty response. Please try rephrasing your query.";

/// Characters of content shown per row of the history report
pub const REPORT_PREVIEW_CHARS: usize = 80;

/// Apology returned when generation fails
pub fn failure_reply(category: &str) -> String {
    format!(
        "I'm sorry, I cannot generate a response at this time due to a connection or system error ({}). Please try again shortly.",
        category
    )
}

/// Per-call overrides of the session's generation defaults
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionOptions {
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

/// One row of the history report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// 1-based position, oldest first
    pub index: usize,
    pub role: Role,
    pub tokens: usize,
    pub preview: String,
}

/// Budget-bounded, persona-aware chat session
pub struct ConversationManager {
    personas: PersonaRegistry,
    accountant: TokenAccountant,
    enforcer: BudgetEnforcer,
    history: HistoryStore,
    history_key: String,
    store: Box<dyn DurableStore>,
    generator: Box<dyn GenerationService>,
    default_model: String,
    default_temperature: f32,
    default_max_output_tokens: u32,
}

impl ConversationManager {
    /// Create a session and restore its history from the durable store
    ///
    /// Fails only on invalid configuration; a missing or corrupt history
    /// record starts the session empty.
    pub fn new(
        config: SessionConfig,
        tokenizer: Box<dyn Tokenizer>,
        generator: Box<dyn GenerationService>,
        store: Box<dyn DurableStore>,
    ) -> Result<Self> {
        config.validate()?;

        let mut personas = match &config.system_message {
            Some(text) if !text.trim().is_empty() => PersonaRegistry::with_system_message(text.clone()),
            _ => PersonaRegistry::new(),
        };
        if let Some(name) = &config.persona {
            personas.select(name)?;
        }

        let history_key = config.history_key();
        let mut history = HistoryStore::new();
        if let LoadOutcome::Discarded(e) = history.load(store.as_ref(), &history_key) {
            warn!(error = %e, "Continuing with empty history");
        }

        Ok(Self {
            personas,
            accountant: TokenAccountant::new(tokenizer),
            enforcer: BudgetEnforcer::new(config.token_budget)?,
            history,
            history_key,
            store,
            generator,
            default_model: config.model,
            default_temperature: config.temperature,
            default_max_output_tokens: config.max_output_tokens,
        })
    }

    /// Activate a named persona (case-insensitive)
    ///
    /// On failure the active system message is unchanged and the error lists
    /// the valid names.
    pub fn set_persona(&mut self, name: &str) -> Result<Persona> {
        self.personas.select(name).map_err(|e| {
            error!(error = %e, "Failed to set persona");
            e
        })
    }

    /// Store and activate a custom system message
    pub fn set_custom_system_message(&mut self, text: &str) -> Result<()> {
        self.personas.set_custom(text).map_err(|e| {
            error!(error = %e, "Failed to set custom system message");
            e
        })
    }

    /// Currently active system message
    pub fn system_message(&self) -> &str {
        self.personas.active()
    }

    pub fn personas(&self) -> &PersonaRegistry {
        &self.personas
    }

    /// Ordered turns, oldest first
    pub fn history(&self) -> &VecDeque<Turn> {
        self.history.turns()
    }

    /// Durable record key of this session
    pub fn history_key(&self) -> &str {
        &self.history_key
    }

    pub fn token_budget(&self) -> usize {
        self.enforcer.token_budget()
    }

    /// Token cost of arbitrary text (0 if counting fails)
    pub fn count_tokens(&self, text: &str) -> usize {
        self.accountant.cost(text)
    }

    /// Cost of the system message plus every stored turn
    pub fn total_tokens_used(&self) -> usize {
        self.accountant
            .total_cost(self.personas.active(), &self.history)
    }

    /// Evict oldest turns until the session fits its budget (or one turn remains)
    pub fn enforce_token_budget(&mut self) -> Vec<EvictedTurn> {
        self.enforcer
            .enforce(&self.accountant, self.personas.active(), &mut self.history)
    }

    /// Per-turn breakdown of the current history
    pub fn history_report(&self) -> Vec<HistoryEntry> {
        self.history
            .turns()
            .iter()
            .enumerate()
            .map(|(i, turn)| HistoryEntry {
                index: i + 1,
                role: turn.role,
                tokens: self.accountant.cost(&turn.content),
                preview: turn.preview(REPORT_PREVIEW_CHARS),
            })
            .collect()
    }

    /// Run one exchange, always answering with text
    ///
    /// Failures become the fallback strings [`EMPTY_PROMPT_REPLY`],
    /// [`EMPTY_RESPONSE_REPLY`] or [`failure_reply`].
    pub async fn chat_completion(&mut self, prompt: &str, options: CompletionOptions) -> String {
        match self.try_chat_completion(prompt, options).await {
            Ok(text) => text,
            Err(ConversationError::EmptyPrompt) => EMPTY_PROMPT_REPLY.to_string(),
            Err(ConversationError::EmptyGenerationResponse) => EMPTY_RESPONSE_REPLY.to_string(),
            Err(e) => failure_reply(e.category()),
        }
    }

    /// Run one exchange, returning failures as typed errors
    ///
    /// On `Err`, history is exactly as it was before the call, except for
    /// turns evicted to meet the budget.
    pub async fn try_chat_completion(
        &mut self,
        prompt: &str,
        options: CompletionOptions,
    ) -> Result<String> {
        let mut state = CompletionState::Validating;

        if prompt.trim().is_empty() {
            state = state.transition(CompletionEvent::PromptRejected)?;
            error!(state = state.display_name(), "User prompt is empty");
            return Err(ConversationError::EmptyPrompt);
        }
        state = self.advance(state, CompletionEvent::PromptAccepted)?;

        let user_turn = Turn::user(prompt);
        self.history.append(user_turn.clone());
        state = self.advance(state, CompletionEvent::TurnAppended)?;

        let current = self.total_tokens_used();
        info!(
            tokens = current,
            "Tokens used (system + history + new prompt): {}", current
        );
        self.enforce_token_budget();
        state = self.advance(state, CompletionEvent::BudgetEnforced)?;

        let request = GenerationRequest {
            model: options.model.unwrap_or_else(|| self.default_model.clone()),
            system_instruction: self.personas.active().to_string(),
            turns: self.history.to_vec(),
            temperature: options.temperature.unwrap_or(self.default_temperature),
            max_output_tokens: options
                .max_output_tokens
                .unwrap_or(self.default_max_output_tokens),
        };

        let failure = match self.generator.complete(&request).await {
            Ok(text) if !text.trim().is_empty() => {
                state = self.advance(state, CompletionEvent::ResponseReceived)?;
                self.history.append(Turn::model(text.clone()));
                state = self.advance(state, CompletionEvent::TurnCommitted)?;

                if let Err(e) = self.history.save(self.store.as_ref(), &self.history_key) {
                    warn!(error = %e, "Could not save history; continuing with in-memory session");
                }
                self.advance(state, CompletionEvent::Persisted)?;

                return Ok(text);
            }
            Ok(_) => {
                state = self.advance(state, CompletionEvent::EmptyResponse)?;
                warn!("Model returned empty or blank response text. Not saving to history.");
                ConversationError::EmptyGenerationResponse
            }
            Err(e) => {
                state = self.advance(state, CompletionEvent::GenerationFailed)?;
                error!(
                    category = e.category(),
                    error = %e,
                    "Failed to get response from generation service"
                );
                match e {
                    ConversationError::GenerationFailure { .. } => e,
                    other => ConversationError::generation(other.category(), other.to_string()),
                }
            }
        };

        self.history.remove_last_if_matches(&user_turn);
        self.advance(state, CompletionEvent::RolledBack)?;

        Err(failure)
    }

    fn advance(&self, state: CompletionState, event: CompletionEvent) -> Result<CompletionState> {
        let next = state.transition(event)?;
        debug!(from = state.display_name(), to = next.display_name(), "Completion state");
        Ok(next)
    }
}
