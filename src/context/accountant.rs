//! Token accounting for a session
//!
//! Wraps a [`Tokenizer`] and never lets its failures escape: a text that
//! cannot be counted costs 0 and a degraded-accounting warning is logged.

use crate::context::counter::{HeuristicTokenizer, Tokenizer};
use crate::session::HistoryStore;
use tracing::warn;

/// Per-text and aggregate cost calculator
pub struct TokenAccountant {
    tokenizer: Box<dyn Tokenizer>,
}

impl TokenAccountant {
    pub fn new(tokenizer: Box<dyn Tokenizer>) -> Self {
        Self { tokenizer }
    }

    /// Cost of a text
    ///
    /// ```
    /// # use convobuddy::context::TokenAccountant;
    /// let accountant = TokenAccountant::default();
    /// assert_eq!(accountant.cost("abcd"), 1);
    /// assert_eq!(accountant.cost_opt(None), 0);
    /// ```
    pub fn cost(&self, text: &str) -> usize {
        match self.tokenizer.count(text) {
            Ok(count) => count,
            Err(e) => {
                warn!(error = %e, "Failed to count tokens, accounting degraded. Returning 0.");
                0
            }
        }
    }

    /// Cost of an optional text; absent text costs 0
    pub fn cost_opt(&self, text: Option<&str>) -> usize {
        self.cost(text.unwrap_or(""))
    }

    /// Cost of the system message plus every stored turn
    ///
    /// # Complexity
    /// O(n) - recomputed from scratch on every call
    pub fn total_cost(&self, system_message: &str, history: &HistoryStore) -> usize {
        let history_cost: usize = history
            .turns()
            .iter()
            .map(|turn| self.cost(&turn.content))
            .sum();

        self.cost(system_message) + history_cost
    }
}

impl Default for TokenAccountant {
    fn default() -> Self {
        Self::new(Box::new(HeuristicTokenizer::new()))
    }
}

impl std::fmt::Debug for TokenAccountant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenAccountant").finish_non_exhaustive()
    }
}
