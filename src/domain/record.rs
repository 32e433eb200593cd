//! Fetched prompt records and their compiled form

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::template::{PromptType, Template, VariableBindings};

/// A prompt as returned by the Langfuse public API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptRecord {
    //=== Identity ===
    pub id: String,
    pub name: String,
    pub version: u32,

    //=== Content ===
    #[serde(rename = "type")]
    pub prompt_type: PromptType,
    pub prompt: Template,

    //=== Metadata ===
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PromptRecord {
    /// Build a record in memory, typing it from the template shape
    pub fn new(id: impl Into<String>, name: impl Into<String>, version: u32, prompt: Template) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version,
            prompt_type: prompt.prompt_type(),
            prompt,
            labels: Vec::new(),
            tags: Vec::new(),
            config: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_labels(mut self, labels: &[&str]) -> Self {
        self.labels = labels.iter().map(|l| l.to_string()).collect();
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_config(mut self, config: Value) -> Self {
        self.config = Some(config);
        self
    }
}

/// A compiled prompt: the record's identity plus substituted content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledOutput {
    pub id: String,
    pub name: String,
    pub version: u32,
    #[serde(rename = "type")]
    pub prompt_type: PromptType,
    pub labels: Vec<String>,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
    pub compiled_prompt: Template,
    /// The bindings that were applied
    pub variables: VariableBindings,
}

impl CompiledOutput {
    /// Consume a fetched record, replacing its template with the compiled one
    pub fn from_record(record: PromptRecord, compiled_prompt: Template, variables: VariableBindings) -> Self {
        Self {
            id: record.id,
            name: record.name,
            version: record.version,
            prompt_type: record.prompt_type,
            labels: record.labels,
            tags: record.tags,
            config: record.config,
            compiled_prompt,
            variables,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn langfuse_text_response() -> Value {
        json!({
            "id": "prompt-123",
            "name": "test-prompt",
            "version": 1,
            "prompt": "Hello {{name}}! Tell me about {{topic}}.",
            "type": "text",
            "labels": ["production"],
            "tags": [],
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-01-01T00:00:00Z"
        })
    }

    #[test]
    fn test_deserialize_text_record() {
        let record: PromptRecord = serde_json::from_value(langfuse_text_response()).unwrap();

        assert_eq!(record.id, "prompt-123");
        assert_eq!(record.version, 1);
        assert_eq!(record.prompt_type, PromptType::Text);
        assert_eq!(record.prompt.as_text(), Some("Hello {{name}}! Tell me about {{topic}}."));
        assert_eq!(record.labels, vec!["production"]);
        assert!(record.config.is_none());
        assert!(record.created_at.is_some());
    }

    #[test]
    fn test_deserialize_chat_record_with_config() {
        let record: PromptRecord = serde_json::from_value(json!({
            "id": "prompt-456",
            "name": "chat-prompt",
            "version": 2,
            "prompt": [
                { "role": "system", "content": "You are {{role}}" },
                { "role": "user", "content": "Hello" }
            ],
            "type": "chat",
            "labels": ["staging"],
            "tags": ["test"],
            "config": { "temperature": 0.2 }
        }))
        .unwrap();

        assert_eq!(record.prompt_type, PromptType::Chat);
        assert_eq!(record.prompt.as_chat().map(|m| m.len()), Some(2));
        assert_eq!(record.config, Some(json!({ "temperature": 0.2 })));
        assert!(record.updated_at.is_none());
    }

    #[test]
    fn test_missing_labels_and_tags_default_to_empty() {
        let record: PromptRecord = serde_json::from_value(json!({
            "id": "p",
            "name": "n",
            "version": 3,
            "prompt": "x",
            "type": "text"
        }))
        .unwrap();

        assert!(record.labels.is_empty());
        assert!(record.tags.is_empty());
    }

    #[test]
    fn test_compiled_output_serialization() {
        let record = PromptRecord::new("prompt-123", "test-prompt", 1, Template::from("Hello {{name}}"))
            .with_labels(&["production"]);
        let mut variables = VariableBindings::new();
        variables.insert("name".to_string(), "Alice".to_string());

        let output = CompiledOutput::from_record(record, Template::from("Hello Alice"), variables);
        let value = serde_json::to_value(&output).unwrap();

        assert_eq!(value["id"], "prompt-123");
        assert_eq!(value["type"], "text");
        assert_eq!(value["compiledPrompt"], "Hello Alice");
        assert_eq!(value["variables"]["name"], "Alice");
        assert_eq!(value["labels"], json!(["production"]));
        assert!(value.get("config").is_none());
    }

    #[test]
    fn test_builder_sets_type_from_template() {
        let record = PromptRecord::new("id", "name", 1, Template::Chat(vec![]));
        assert_eq!(record.prompt_type, PromptType::Chat);

        let record = record.with_tags(&["a", "b"]).with_config(json!({ "model": "x" }));
        assert_eq!(record.tags, vec!["a", "b"]);
        assert!(record.config.is_some());
    }
}
