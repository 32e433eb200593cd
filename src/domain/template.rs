//! Prompt template shapes
//!
//! A prompt is either a single text string or an ordered list of chat messages.
//! Only a message's `content` is ever substituted; everything else rides along.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Variable name -> replacement value, as supplied by the caller
pub type VariableBindings = BTreeMap<String, String>;

/// Distinct variable names in first-occurrence order
pub type VariableSet = Vec<String>;

/// Prompt kind as reported by Langfuse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptType {
    Text,
    Chat,
}

/// A prompt template, before or after compilation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Template {
    Text(String),
    Chat(Vec<ChatMessage>),
}

impl Template {
    /// The shape of this template
    pub fn prompt_type(&self) -> PromptType {
        match self {
            Template::Text(_) => PromptType::Text,
            Template::Chat(_) => PromptType::Chat,
        }
    }

    /// Every piece of text subject to placeholder substitution, in order
    pub fn texts(&self) -> Vec<&str> {
        match self {
            Template::Text(text) => vec![text.as_str()],
            Template::Chat(messages) => messages.iter().map(|m| m.content.as_str()).collect(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Template::Text(text) => Some(text.as_str()),
            Template::Chat(_) => None,
        }
    }

    pub fn as_chat(&self) -> Option<&[ChatMessage]> {
        match self {
            Template::Text(_) => None,
            Template::Chat(messages) => Some(messages.as_slice()),
        }
    }
}

impl From<&str> for Template {
    fn from(text: &str) -> Self {
        Template::Text(text.to_string())
    }
}

impl From<String> for Template {
    fn from(text: String) -> Self {
        Template::Text(text)
    }
}

impl From<Vec<ChatMessage>> for Template {
    fn from(messages: Vec<ChatMessage>) -> Self {
        Template::Chat(messages)
    }
}

/// One message of a chat prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub role: String,

    #[serde(default)]
    pub content: String,

    /// Any other fields Langfuse sends along with the message
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
            extra: Map::new(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }

    /// Attach an extra field, kept verbatim through compilation
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Same message with different content and every other field copied
    pub fn with_content(&self, content: String) -> Self {
        Self {
            role: self.role.clone(),
            content,
            extra: self.extra.clone(),
        }
    }
}
