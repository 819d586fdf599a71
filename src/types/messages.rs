//! Conversation turn types
//!
//! A [`Turn`] is one role-tagged message. On disk (and on the wire to the
//! generation service) a turn is written as
//! `{"role": "user"|"model", "parts": [{"text": "..."}]}`.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Author of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Human side of the conversation
    User,

    /// Generation service side of the conversation
    Model,
}

impl Role {
    /// Wire name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One role-tagged message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TurnRecord", into = "TurnRecord")]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self::new(Role::Model, content)
    }

    /// Single-line preview of the content, at most `max_chars` characters
    pub fn preview(&self, max_chars: usize) -> String {
        self.content
            .replace('\n', " ")
            .chars()
            .take(max_chars)
            .collect()
    }
}

/// Text fragment of a turn record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    /// Missing or `null` text reads as empty
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Serialized shape of a turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub role: Role,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl From<TurnRecord> for Turn {
    /// Only the first part carries content; a record without parts is an
    /// empty turn.
    fn from(record: TurnRecord) -> Self {
        let content = record
            .parts
            .into_iter()
            .next()
            .map(|part| part.text)
            .unwrap_or_default();

        Turn {
            role: record.role,
            content,
        }
    }
}

impl From<Turn> for TurnRecord {
    fn from(turn: Turn) -> Self {
        TurnRecord {
            role: turn.role,
            parts: vec![Part { text: turn.content }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_serializes_as_parts_record() {
        let turn = Turn::user("Please remember this random word: ZEBRA");
        let value = serde_json::to_value(&turn).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "role": "user",
                "parts": [{ "text": "Please remember this random word: ZEBRA" }]
            })
        );
    }

    #[test]
    fn test_turn_reads_first_part_only() {
        let json = r#"{"role":"model","parts":[{"text":"first"},{"text":"second"}]}"#;
        let turn: Turn = serde_json::from_str(json).unwrap();

        assert_eq!(turn.role, Role::Model);
        assert_eq!(turn.content, "first");
    }

    #[test]
    fn test_turn_without_parts_is_empty() {
        let turn: Turn = serde_json::from_str(r#"{"role":"user"}"#).unwrap();
        assert_eq!(turn.content, "");
    }

    #[test]
    fn test_null_text_is_empty() {
        let turn: Turn = serde_json::from_str(r#"{"role":"model","parts":[{"text":null}]}"#).unwrap();
        assert_eq!(turn, Turn::model(""));

        let turn: Turn = serde_json::from_str(r#"{"role":"user","parts":[{}]}"#).unwrap();
        assert_eq!(turn.content, "");
    }

    #[test]
    fn test_unknown_role_rejected() {
        let result: serde_json::Result<Turn> =
            serde_json::from_str(r#"{"role":"system","parts":[{"text":"x"}]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_preview_flattens_newlines() {
        let turn = Turn::model("line one\nline two\nline three");
        assert_eq!(turn.preview(13), "line one line");
    }
}
