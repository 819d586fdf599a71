//! Input handler for REPL using rustyline
//!
//! Provides readline functionality with line editing and persistent history.

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// Readline interface with optional on-disk history
pub struct InputHandler {
    editor: DefaultEditor,
    history_path: Option<PathBuf>,
    prompt: String,
}

impl InputHandler {
    pub fn new() -> Result<Self> {
        Ok(InputHandler {
            editor: DefaultEditor::new()?,
            history_path: None,
            prompt: ">convobuddy: ".to_string(),
        })
    }

    /// Create input handler with persistent line history
    pub fn with_history(history_file: PathBuf) -> Result<Self> {
        let mut editor = DefaultEditor::new()?;

        // Load existing history if file exists
        if history_file.exists() {
            let _ = editor.load_history(&history_file);
        }

        Ok(InputHandler {
            editor,
            history_path: Some(history_file),
            prompt: ">convobuddy: ".to_string(),
        })
    }

    /// Read a line of input from user
    ///
    /// Returns:
    /// - Ok(Some(input)) for normal input, exactly as typed
    /// - Ok(None) for EOF (Ctrl-D) or interrupt (Ctrl-C)
    pub fn read_line(&mut self) -> Result<Option<String>> {
        match self.editor.readline(&self.prompt) {
            Ok(line) => Ok(Some(self.accept_line(line))),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(anyhow::anyhow!("Readline error: {}", err)),
        }
    }

    /// Record the line in history (trimmed) and return it unchanged
    fn accept_line(&mut self, line: String) -> String {
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            let _ = self.editor.add_history_entry(trimmed);
        }
        line
    }

    /// Save line history to disk
    pub fn save_history(&mut self) -> Result<()> {
        if let Some(ref path) = self.history_path {
            self.editor.save_history(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustyline::history::History;

    #[test]
    fn test_accept_line_keeps_whitespace() {
        let mut handler = InputHandler::new().unwrap();

        let line = handler.accept_line("  indented prompt  ".to_string());
        assert_eq!(line, "  indented prompt  ");
        assert_eq!(handler.editor.history().len(), 1);
    }

    #[test]
    fn test_blank_line_not_added_to_history() {
        let mut handler = InputHandler::new().unwrap();

        assert_eq!(handler.accept_line("   ".to_string()), "   ");
        assert!(handler.editor.history().is_empty());
    }
}
