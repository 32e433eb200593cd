//! Wire types for the Langfuse prompt listing endpoint

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of `GET /api/public/v2/prompts`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptSummary {
    pub name: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub versions: Vec<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated_at: Option<DateTime<Utc>>,
}

impl PromptSummary {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            labels: Vec::new(),
            versions: Vec::new(),
            tags: Vec::new(),
            last_updated_at: None,
        }
    }

    pub fn with_labels(mut self, labels: &[&str]) -> Self {
        self.labels = labels.iter().map(|l| l.to_string()).collect();
        self
    }

    pub fn with_versions(mut self, versions: &[u32]) -> Self {
        self.versions = versions.to_vec();
        self
    }

    /// Highest published version, if any
    pub fn latest_version(&self) -> Option<u32> {
        self.versions.iter().copied().max()
    }
}

/// Page of prompt summaries
#[derive(Debug, Clone, Deserialize)]
pub struct PromptListResponse {
    #[serde(default)]
    pub data: Vec<PromptSummary>,
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub total_items: u32,
    pub total_pages: u32,
}
