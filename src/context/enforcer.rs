//! Token budget enforcement with FIFO eviction
//!
//! # Algorithm
//!
//! ```text
//! loop:
//!   if total_cost(system + history) <= budget: stop
//!   if len(history) <= 1:                      stop (floor)
//!   evict history[0]
//! ```
//!
//! Guarantee on return: `total_cost <= budget || len(history) <= 1`.
//! Surviving turns keep their relative order. A single turn that alone
//! exceeds the budget is kept as-is.

use crate::context::accountant::TokenAccountant;
use crate::errors::{ConversationError, Result};
use crate::session::HistoryStore;
use crate::types::{Role, Turn};
use tracing::{info, warn};

/// Default token budget for a session
pub const DEFAULT_TOKEN_BUDGET: usize = 30_000;

/// Characters of evicted content shown in the eviction report
pub const EVICTION_PREVIEW_CHARS: usize = 50;

/// Record of a turn removed to meet the budget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvictedTurn {
    pub role: Role,
    pub tokens: usize,
    pub preview: String,
}

/// Evicts oldest turns until the session fits its budget
#[derive(Debug, Clone, Copy)]
pub struct BudgetEnforcer {
    token_budget: usize,
}

impl BudgetEnforcer {
    /// Create enforcer; the budget must be positive
    pub fn new(token_budget: usize) -> Result<Self> {
        if token_budget == 0 {
            return Err(ConversationError::ConfigError(
                "Token budget must be a positive integer".to_string(),
            ));
        }

        Ok(Self { token_budget })
    }

    pub fn token_budget(&self) -> usize {
        self.token_budget
    }

    /// Check whether a total fits within the budget
    pub fn within_budget(&self, total_tokens: usize) -> bool {
        total_tokens <= self.token_budget
    }

    /// Evict oldest turns until the budget is met or one turn remains
    ///
    /// Returns the evicted turns, oldest first.
    ///
    /// # Complexity
    /// O(n²) token counts in the worst case - totals are recomputed after
    /// every eviction
    pub fn enforce(
        &self,
        accountant: &TokenAccountant,
        system_message: &str,
        history: &mut HistoryStore,
    ) -> Vec<EvictedTurn> {
        let mut evicted = Vec::new();

        while !self.within_budget(accountant.total_cost(system_message, history)) {
            if history.len() <= 1 {
                break;
            }

            match history.pop_oldest() {
                Ok(removed) => evicted.push(self.report(accountant, &removed)),
                Err(e) => {
                    // Unreachable while the floor check above holds
                    warn!(error = %e, "History trimming stopped unexpectedly");
                    break;
                }
            }
        }

        let remaining = accountant.total_cost(system_message, history);
        if !self.within_budget(remaining) {
            warn!(
                tokens = remaining,
                budget = self.token_budget,
                "Single remaining turn exceeds budget; keeping it"
            );
        }
        info!(tokens = remaining, "Tokens after enforcement: {}", remaining);

        evicted
    }

    fn report(&self, accountant: &TokenAccountant, removed: &Turn) -> EvictedTurn {
        let tokens = accountant.cost(&removed.content);
        let preview = removed.preview(EVICTION_PREVIEW_CHARS);

        info!(
            role = %removed.role,
            tokens,
            "Removing oldest [{}] message ({} tokens) to meet budget. Removed content: {}...",
            removed.role.as_str().to_uppercase(),
            tokens,
            preview
        );

        EvictedTurn {
            role: removed.role,
            tokens,
            preview,
        }
    }
}
