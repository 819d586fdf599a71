//! Command-line argument parsing for ConvoBuddy
//!
//! Flags override values from the configuration file.

use crate::config::SessionConfig;
use clap::Parser;
use std::path::PathBuf;

/// ConvoBuddy - budget-bounded chat sessions that survive restarts
#[derive(Parser, Debug)]
#[command(name = "convobuddy")]
#[command(version)]
#[command(about = "Chat with a persona-aware assistant whose history survives restarts", long_about = None)]
pub struct Args {
    /// Send a single prompt and exit (interactive mode when omitted)
    #[arg(value_name = "PROMPT")]
    pub prompt: Option<String>,

    /// Persona to activate (friendly, sarcastic, academic, sassy, custom)
    #[arg(short, long)]
    pub persona: Option<String>,

    /// Custom system message, stored in the custom slot and activated
    #[arg(long)]
    pub system_message: Option<String>,

    /// Model identifier
    #[arg(short, long)]
    pub model: Option<String>,

    /// Sampling temperature
    #[arg(short, long)]
    pub temperature: Option<f32>,

    /// Maximum output size in tokens
    #[arg(long)]
    pub max_output_tokens: Option<u32>,

    /// Token budget for system message plus history
    #[arg(short, long)]
    pub budget: Option<usize>,

    /// History record name (timestamp-derived when omitted)
    #[arg(long)]
    pub history_file: Option<String>,

    /// Directory holding history records
    #[arg(long)]
    pub history_dir: Option<PathBuf>,

    /// HuggingFace tokenizer.json for exact token counts
    #[arg(long)]
    pub tokenizer: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbosity level: default (warnings), -v (info), -vv (debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }

    /// Apply command-line overrides on top of file configuration
    ///
    /// `--system-message` is applied later through the custom persona slot,
    /// so it does not touch `session.system_message`.
    pub fn apply_to(&self, session: &mut SessionConfig) {
        if let Some(persona) = &self.persona {
            session.persona = Some(persona.clone());
        }
        if let Some(model) = &self.model {
            session.model = model.clone();
        }
        if let Some(temperature) = self.temperature {
            session.temperature = temperature;
        }
        if let Some(max_output_tokens) = self.max_output_tokens {
            session.max_output_tokens = max_output_tokens;
        }
        if let Some(budget) = self.budget {
            session.token_budget = budget;
        }
        if let Some(history_file) = &self.history_file {
            session.history_file = Some(history_file.clone());
        }
        if let Some(history_dir) = &self.history_dir {
            session.history_dir = Some(history_dir.clone());
        }
        if let Some(tokenizer) = &self.tokenizer {
            session.tokenizer_path = Some(tokenizer.clone());
        }
    }
}

impl Verbosity {
    /// Default tracing filter directive for this level
    pub fn filter_directive(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "info",
            Verbosity::VeryVerbose => "debug",
        }
    }
}
