//! Configuration management for ConvoBuddy
//!
//! TOML-based configuration with defaults for every field.
//! Location: ~/.convobuddy/config.toml

use crate::context::counter::{HeuristicTokenizer, HfTokenizer, Tokenizer};
use crate::context::enforcer::DEFAULT_TOKEN_BUDGET;
use crate::errors::{ConversationError, Result};
use crate::models::gemini::{DEFAULT_API_KEY_ENV, DEFAULT_GEMINI_URL, DEFAULT_TIMEOUT_SECS};
use crate::models::service::{DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete configuration for ConvoBuddy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub session: SessionConfig,
    pub gemini: GeminiConfig,
}

/// Per-session settings, all optional with defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Initial system message; the sassy preset when unset
    pub system_message: Option<String>,

    /// Named persona to activate after construction
    pub persona: Option<String>,

    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub token_budget: usize,

    /// Durable record name; timestamp-derived when unset
    pub history_file: Option<String>,

    /// Directory holding history records; current directory when unset
    pub history_dir: Option<PathBuf>,

    /// HuggingFace `tokenizer.json`; heuristic counting when unset
    pub tokenizer_path: Option<PathBuf>,
}

/// Gemini connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub base_url: String,
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            system_message: None,
            persona: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            token_budget: DEFAULT_TOKEN_BUDGET,
            history_file: None,
            history_dir: None,
            tokenizer_path: None,
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GEMINI_URL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Timestamp-derived history record name, e.g. `history_20250101_120000.json`
pub fn default_history_file() -> String {
    format!("history_{}.json", chrono::Local::now().format("%Y%m%d_%H%M%S"))
}

impl SessionConfig {
    /// Durable record key for this session
    pub fn history_key(&self) -> String {
        self.history_file
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(default_history_file)
    }

    /// Directory holding history records
    pub fn history_dir(&self) -> PathBuf {
        self.history_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Build the configured tokenizer
    pub fn build_tokenizer(&self) -> Result<Box<dyn Tokenizer>> {
        match &self.tokenizer_path {
            Some(path) => Ok(Box::new(HfTokenizer::from_file(path)?)),
            None => Ok(Box::new(HeuristicTokenizer::new())),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.token_budget == 0 {
            return Err(ConversationError::ConfigError(
                "token_budget must be greater than 0".to_string(),
            ));
        }

        if self.max_output_tokens == 0 {
            return Err(ConversationError::ConfigError(
                "max_output_tokens must be greater than 0".to_string(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(ConversationError::ConfigError("model cannot be empty".to_string()));
        }

        if !self.temperature.is_finite() || self.temperature < 0.0 {
            return Err(ConversationError::ConfigError(format!(
                "temperature must be a non-negative number, got {}",
                self.temperature
            )));
        }

        Ok(())
    }
}

impl GeminiConfig {
    /// API key from the configured environment variable
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env).ok()
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(&config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ConversationError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_toml(&contents)
    }

    /// Load from the default location, falling back to defaults when absent
    pub fn load_default() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Parse and validate TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)
            .map_err(|e| ConversationError::ConfigError(format!("Failed to parse config: {}", e)))?;

        config.session.validate()?;
        Ok(config)
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ConversationError::ConfigError(format!("Failed to serialize config: {}", e)))
    }

    /// Get the configuration file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".convobuddy").join("config.toml"))
    }
}
