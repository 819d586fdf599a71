//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use convobuddy::config::SessionConfig;
use convobuddy::context::HeuristicTokenizer;
use convobuddy::models::{GenerationRequest, GenerationService};
use convobuddy::session::JsonFileStore;
use convobuddy::{ConversationManager, Result};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};

pub const HISTORY_TEST_FILE: &str = "session_test_history.json";

/// Generation service that replays scripted replies and records requests
#[derive(Clone, Default)]
pub struct ScriptedService {
    replies: Arc<Mutex<VecDeque<Result<String>>>>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl ScriptedService {
    pub fn replying(replies: Vec<Result<String>>) -> Self {
        let service = Self::default();
        service.replies.lock().unwrap().extend(replies);
        service
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationService for ScriptedService {
    async fn complete(&self, request: &GenerationRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("Noted.".to_string()))
    }
}

pub fn session_config(budget: usize) -> SessionConfig {
    SessionConfig {
        token_budget: budget,
        history_file: Some(HISTORY_TEST_FILE.to_string()),
        ..SessionConfig::default()
    }
}

/// Manager backed by a JSON file store in `dir`
pub fn file_manager(dir: &Path, budget: usize, service: &ScriptedService) -> ConversationManager {
    ConversationManager::new(
        session_config(budget),
        Box::new(HeuristicTokenizer::new()),
        Box::new(service.clone()),
        Box::new(JsonFileStore::new(dir)),
    )
    .unwrap()
}
