//! Picker support - prompt search, label choices and variable discovery
//!
//! These back interactive selection (the CLI `list`, `labels` and `variables`
//! commands). Label and variable lookups never fail; they degrade to defaults.

use serde::Serialize;

use super::source::PromptSource;
use crate::domain::{VariableSet, is_blank};
use crate::prompt::extract_variables;

/// A selectable label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelOption {
    pub name: String,
    pub value: String,
}

impl LabelOption {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A selectable prompt, displayed with its latest version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptOption {
    pub name: String,
    pub value: String,
}

/// Labels offered when nothing better is known
pub fn default_labels() -> Vec<LabelOption> {
    vec![
        LabelOption::new("Production", "production"),
        LabelOption::new("Latest", "latest"),
    ]
}

/// Labels of `prompt_name`, or the defaults when it is empty, unknown, unlabelled
/// or the listing fails
pub async fn label_options<S: PromptSource + ?Sized>(source: &S, prompt_name: &str) -> Vec<LabelOption> {
    if is_blank(prompt_name) {
        return default_labels();
    }

    let prompts = match source.list_prompts().await {
        Ok(prompts) => prompts,
        Err(e) => {
            log::warn!("Failed to list prompts for label options: {}", e);
            return default_labels();
        }
    };

    match prompts.into_iter().find(|p| p.name == prompt_name) {
        Some(prompt) if !prompt.labels.is_empty() => prompt
            .labels
            .into_iter()
            .map(|label| LabelOption::new(label.clone(), label))
            .collect(),
        _ => default_labels(),
    }
}

/// Prompts whose name contains `filter` (case-insensitive)
pub async fn search_prompts<S: PromptSource + ?Sized>(
    source: &S,
    filter: Option<&str>,
) -> Result<Vec<PromptOption>, super::FetchError> {
    let needle = filter.filter(|f| !f.is_empty()).map(str::to_lowercase);
    let prompts = source.list_prompts().await?;

    Ok(prompts
        .into_iter()
        .filter(|p| needle.as_ref().is_none_or(|n| p.name.to_lowercase().contains(n)))
        .map(|p| {
            let name = match p.latest_version() {
                Some(version) => format!("{} (v{})", p.name, version),
                None => p.name.clone(),
            };
            PromptOption { name, value: p.name }
        })
        .collect())
}

/// Variables a prompt expects, or none when it cannot be resolved
pub async fn mapping_variables<S: PromptSource + ?Sized>(source: &S, prompt_name: &str, label: &str) -> VariableSet {
    if is_blank(prompt_name) || is_blank(label) {
        return Vec::new();
    }

    match source.fetch_prompt(prompt_name, label).await {
        Ok(record) => extract_variables(&record.prompt),
        Err(e) => {
            log::warn!("Failed to fetch '{}' for variable discovery: {}", prompt_name, e);
            Vec::new()
        }
    }
}
