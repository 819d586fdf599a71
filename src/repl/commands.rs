//! Command handler for REPL built-in commands
//!
//! Slash commands inspect or reconfigure the session; anything else is a
//! prompt for the model.

use crate::conversation::ConversationManager;
use crate::persona::Persona;
use colored::*;

/// REPL command types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Persona { name: String },
    Custom { text: String },
    Personas,
    History,
    Tokens,
    Exit,
    Unknown { input: String },
}

/// Command handler for parsing and executing REPL commands
#[derive(Debug, Default)]
pub struct CommandHandler;

impl CommandHandler {
    pub fn new() -> Self {
        CommandHandler
    }

    /// Parse input string into a command
    pub fn parse(&self, input: &str) -> Command {
        let trimmed = input.trim();

        let Some(body) = trimmed.strip_prefix('/') else {
            return Command::Unknown { input: input.to_string() };
        };

        let (word, rest) = match body.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (body, ""),
        };

        match word.to_lowercase().as_str() {
            "help" | "h" => Command::Help,
            "exit" | "quit" | "q" => Command::Exit,
            "persona" if !rest.is_empty() => Command::Persona { name: rest.to_string() },
            "custom" => Command::Custom { text: rest.to_string() },
            "personas" => Command::Personas,
            "history" => Command::History,
            "tokens" | "budget" => Command::Tokens,
            _ => Command::Unknown { input: input.to_string() },
        }
    }

    /// Execute a command
    ///
    /// Returns true if REPL should continue, false if should exit
    pub fn execute(&self, command: Command, manager: &mut ConversationManager) -> bool {
        match command {
            Command::Help => self.show_help(),
            Command::Exit => {
                println!("{}", "Goodbye!".green());
                return false;
            }
            Command::Persona { name } => match manager.set_persona(&name) {
                Ok(persona) => println!("{}", format!("Persona changed to '{}'.", persona).green()),
                Err(e) => println!("{}", format!("Failed to set persona: {}", e).red()),
            },
            Command::Custom { text } => match manager.set_custom_system_message(&text) {
                Ok(()) => println!("{}", "Custom persona set and activated.".green()),
                Err(e) => println!("{}", format!("Failed to set custom system message: {}", e).red()),
            },
            Command::Personas => self.show_personas(manager),
            Command::History => self.show_history(manager),
            Command::Tokens => self.show_tokens(manager),
            Command::Unknown { input } => {
                println!("{}", format!("Unknown command: {}", input).red());
                println!("Type {} for available commands", "/help".cyan());
            }
        }
        true
    }

    fn show_help(&self) {
        println!("\n{}", "Available Commands:".bold().cyan());
        println!("{}", "=".repeat(60).cyan());

        let commands = [
            ("/help, /h", "Show this help message"),
            ("/persona <name>", "Switch persona"),
            ("/custom <text>", "Set and activate a custom system message"),
            ("/personas", "List personas"),
            ("/history", "Show stored turns with token costs"),
            ("/tokens", "Show token usage against the budget"),
            ("/exit, /quit, /q", "Exit REPL"),
        ];

        for (cmd, desc) in commands {
            println!("  {:<20} {}", cmd.green(), desc);
        }
        println!();
    }

    fn show_personas(&self, manager: &ConversationManager) {
        let active = manager.personas().active_persona();

        println!("\n{}", "Personas:".bold().cyan());
        for persona in Persona::ALL {
            let marker = if Some(persona) == active { "*".green() } else { " ".normal() };
            let text: String = manager.personas().text_of(persona).chars().take(60).collect();
            println!("  {} {:<10} {}", marker, persona.name().cyan(), text.dimmed());
        }
        println!();
    }

    fn show_history(&self, manager: &ConversationManager) {
        let report = manager.history_report();

        if report.is_empty() {
            println!("{}", "No turns in history yet.".yellow());
            return;
        }

        println!("\n{}", format!("Conversation History ({}):", manager.history_key()).bold().cyan());
        println!("{}", "=".repeat(70).cyan());

        for entry in report {
            let role = entry.role.as_str().to_uppercase();
            println!(
                "[{}] [{}] ({} tokens): {}...",
                entry.index.to_string().cyan(),
                role.bold(),
                entry.tokens,
                entry.preview
            );
        }
        println!("{}", "=".repeat(70).cyan());
        println!();
    }

    fn show_tokens(&self, manager: &ConversationManager) {
        let used = manager.total_tokens_used();
        let budget = manager.token_budget();
        let used_str = used.to_string();

        println!("\n{}", "Token Usage:".bold().cyan());
        println!(
            "  Total (system + history): {}",
            if used <= budget { used_str.green() } else { used_str.red() }
        );
        println!("  Token budget:             {}", budget.to_string().green());
        println!("  Turns stored:             {}", manager.history().len().to_string().green());
        println!();
    }
}

/// Check if input is a command (starts with /)
pub fn is_command(input: &str) -> bool {
    input.trim().starts_with('/')
}
