//! Completion state machine
//!
//! One pass of `chat_completion` walks a deterministic finite state machine:
//!
//! ```text
//! Validating ──PromptAccepted──▶ Appending ──TurnAppended──▶ Enforcing
//!     │                                                         │
//!     └─PromptRejected─▶ Rejected                       BudgetEnforced
//!                                                               ▼
//!              ┌──────GenerationFailed / EmptyResponse──── Generating
//!              ▼                                                │
//!         RollingBack ──RolledBack──▶ Done            ResponseReceived
//!                                      ▲                        ▼
//!                                      └─Persisted── Persisting ◀─TurnCommitted── Committing
//! ```
//!
//! `Done` and `Rejected` are terminal. A rolled-back exchange is never
//! persisted.

use crate::errors::{ConversationError, Result};
use serde::{Deserialize, Serialize};

/// Completion states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompletionState {
    /// Checking the prompt; nothing mutated yet
    Validating,

    /// Adding the user turn
    Appending,

    /// Evicting old turns to meet the budget
    Enforcing,

    /// Waiting on the generation service
    Generating,

    /// Adding the model turn
    Committing,

    /// Removing the speculative user turn
    RollingBack,

    /// Writing history to the durable store
    Persisting,

    /// Exchange finished (terminal)
    Done,

    /// Prompt refused before any mutation (terminal)
    Rejected,
}

/// Events that trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionEvent {
    PromptAccepted,
    PromptRejected,
    TurnAppended,
    BudgetEnforced,
    ResponseReceived,
    GenerationFailed,
    EmptyResponse,
    TurnCommitted,
    RolledBack,
    Persisted,
}

impl CompletionState {
    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, CompletionState::Done | CompletionState::Rejected)
    }

    /// Attempt state transition with validation
    pub fn transition(&self, event: CompletionEvent) -> Result<CompletionState> {
        use CompletionEvent::*;
        use CompletionState::*;

        let next_state = match (self, event) {
            (Validating, PromptAccepted) => Appending,
            (Validating, PromptRejected) => Rejected,

            (Appending, TurnAppended) => Enforcing,

            (Enforcing, BudgetEnforced) => Generating,

            (Generating, ResponseReceived) => Committing,
            (Generating, GenerationFailed) => RollingBack,
            (Generating, EmptyResponse) => RollingBack,

            (Committing, TurnCommitted) => Persisting,
            (Persisting, Persisted) => Done,

            (RollingBack, RolledBack) => Done,

            (from, event) => {
                return Err(ConversationError::InvalidTransition {
                    from: format!("{:?}", from),
                    to: format!("(via {:?})", event),
                    reason: format!("No valid transition from {:?} on {:?}", from, event),
                });
            }
        };

        Ok(next_state)
    }

    /// Human-readable state name
    pub fn display_name(&self) -> &'static str {
        match self {
            CompletionState::Validating => "Validating prompt",
            CompletionState::Appending => "Appending user turn",
            CompletionState::Enforcing => "Enforcing token budget",
            CompletionState::Generating => "Generating response",
            CompletionState::Committing => "Committing model turn",
            CompletionState::RollingBack => "Rolling back user turn",
            CompletionState::Persisting => "Persisting history",
            CompletionState::Done => "Done",
            CompletionState::Rejected => "Rejected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CompletionEvent::*;
    use CompletionState::*;

    fn walk(events: &[CompletionEvent]) -> Result<CompletionState> {
        events
            .iter()
            .try_fold(Validating, |state, event| state.transition(*event))
    }

    #[test]
    fn test_success_path() {
        let state = walk(&[
            PromptAccepted,
            TurnAppended,
            BudgetEnforced,
            ResponseReceived,
            TurnCommitted,
            Persisted,
        ])
        .unwrap();
        assert_eq!(state, Done);
    }

    #[test]
    fn test_failure_paths_skip_persisting() {
        for failure in [GenerationFailed, EmptyResponse] {
            let state = walk(&[PromptAccepted, TurnAppended, BudgetEnforced, failure]).unwrap();
            assert_eq!(state, RollingBack);
            assert!(state.transition(Persisted).is_err());
            assert_eq!(state.transition(RolledBack).unwrap(), Done);
        }
    }

    #[test]
    fn test_rejected_prompt_is_terminal() {
        let state = Validating.transition(PromptRejected).unwrap();
        assert_eq!(state, Rejected);
        assert!(state.is_terminal());
        assert!(state.transition(PromptAccepted).is_err());
    }

    #[test]
    fn test_invalid_transitions() {
        // Cannot generate before the budget is enforced
        assert!(Appending.transition(ResponseReceived).is_err());
        // Done does not restart
        assert!(Done.transition(PromptAccepted).is_err());
    }

    #[test]
    fn test_terminal_states() {
        assert!(Done.is_terminal());
        assert!(Rejected.is_terminal());
        assert!(!Generating.is_terminal());
        assert!(!RollingBack.is_terminal());
    }
}
