//! REPL (Read-Eval-Print Loop) module for interactive chat
//!
//! Lines starting with `/` are built-in commands; everything else is sent
//! to the model through the conversation manager.

pub mod commands;
pub mod input;

use anyhow::Result;
use colored::*;
use std::path::PathBuf;

use crate::conversation::{CompletionOptions, ConversationManager};
use crate::repl::commands::{is_command, CommandHandler};
use crate::repl::input::InputHandler;

/// REPL session coordinator
pub struct ReplSession {
    input_handler: InputHandler,
    command_handler: CommandHandler,
    manager: ConversationManager,
}

impl ReplSession {
    pub fn new(manager: ConversationManager) -> Result<Self> {
        Ok(ReplSession {
            input_handler: InputHandler::new()?,
            command_handler: CommandHandler::new(),
            manager,
        })
    }

    /// Create REPL session with persistent line history
    pub fn with_history(manager: ConversationManager, history_path: PathBuf) -> Result<Self> {
        Ok(ReplSession {
            input_handler: InputHandler::with_history(history_path)?,
            command_handler: CommandHandler::new(),
            manager,
        })
    }

    /// Show welcome banner
    pub fn show_welcome(&self, version: &str) {
        println!("{}", format!("ConvoBuddy v{}", version).bold().cyan());
        println!(
            "Record: {}  |  Turns restored: {}  |  Budget: {} tokens",
            self.manager.history_key().green(),
            self.manager.history().len().to_string().green(),
            self.manager.token_budget().to_string().green()
        );
        println!("Type {} for commands, {} to quit.\n", "/help".cyan(), "/exit".cyan());
    }

    /// Run the loop until `/exit` or EOF
    pub async fn run(&mut self) -> Result<()> {
        while let Some(line) = self.input_handler.read_line()? {
            if !self.handle_input(&line).await {
                break;
            }
        }

        self.input_handler.save_history()?;
        Ok(())
    }

    /// Handle one line of input
    ///
    /// Returns true if session should continue, false to exit
    pub async fn handle_input(&mut self, input: &str) -> bool {
        if input.trim().is_empty() {
            return true;
        }

        if is_command(input) {
            let command = self.command_handler.parse(input);
            return self.command_handler.execute(command, &mut self.manager);
        }

        let reply = self
            .manager
            .chat_completion(input, CompletionOptions::default())
            .await;
        println!("\n{}\n", reply);
        true
    }
}
