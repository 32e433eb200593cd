//! Batch work items and per-item results

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::record::CompiledOutput;
use super::template::VariableBindings;
use crate::error::Result;

/// True when a prompt name or label is missing, including whitespace-only values
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// One unit of compilation work
#[derive(Debug, Clone, PartialEq)]
pub struct BatchItem {
    /// Position in the submitted batch
    pub index: usize,
    pub prompt_name: String,
    pub label: String,
    pub variables: VariableBindings,
}

impl BatchItem {
    pub fn new(index: usize, prompt_name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            index,
            prompt_name: prompt_name.into(),
            label: label.into(),
            variables: VariableBindings::new(),
        }
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn with_variables(mut self, variables: VariableBindings) -> Self {
        self.variables = variables;
        self
    }
}

/// A batch entry as written in a batch file; indices come from file order
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchEntry {
    #[serde(default, alias = "prompt_name")]
    pub prompt_name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub variables: VariableBindings,
}

impl BatchEntry {
    /// Number entries in order, turning them into batch items
    pub fn into_items(entries: Vec<BatchEntry>) -> Vec<BatchItem> {
        entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| BatchItem {
                index,
                prompt_name: entry.prompt_name,
                label: entry.label,
                variables: entry.variables,
            })
            .collect()
    }

    /// Read a YAML or JSON list of entries and number them
    pub fn load_file(path: impl AsRef<Path>) -> Result<Vec<BatchItem>> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let entries: Vec<BatchEntry> = serde_yaml::from_str(&content)?;
        Ok(Self::into_items(entries))
    }
}

/// A failed item, recorded in place of its output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorRecord {
    pub index: usize,
    #[serde(rename = "error")]
    pub message: String,
}

/// Result for one batch item
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BatchOutput {
    Success {
        index: usize,
        #[serde(flatten)]
        output: CompiledOutput,
    },
    Failure(ErrorRecord),
}

impl BatchOutput {
    /// Index of the input item that produced this result
    pub fn index(&self) -> usize {
        match self {
            BatchOutput::Success { index, .. } => *index,
            BatchOutput::Failure(record) => record.index,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BatchOutput::Success { .. })
    }

    pub fn output(&self) -> Option<&CompiledOutput> {
        match self {
            BatchOutput::Success { output, .. } => Some(output),
            BatchOutput::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorRecord> {
        match self {
            BatchOutput::Success { .. } => None,
            BatchOutput::Failure(record) => Some(record),
        }
    }
}
