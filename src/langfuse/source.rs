//! Prompt source trait and the errors a source can raise

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::types::PromptSummary;
use crate::domain::PromptRecord;

/// Where a prompt is fetched from - the batch runner's only collaborator
///
/// Implementations do their own transport, auth and timeouts. The runner never
/// retries or caches.
#[async_trait]
pub trait PromptSource: Send + Sync {
    /// Fetch the prompt `name` currently carrying `label`
    async fn fetch_prompt(&self, name: &str, label: &str) -> Result<PromptRecord, FetchError>;

    /// All prompts known to the source, for pickers
    async fn list_prompts(&self) -> Result<Vec<PromptSummary>, FetchError>;
}

/// Which revision of a prompt to fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptSelector {
    /// Whatever the service serves by default (the `production` label)
    Default,
    Label(String),
    Version(u32),
}

impl fmt::Display for PromptSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptSelector::Default => write!(f, "default label"),
            PromptSelector::Label(label) => write!(f, "label '{}'", label),
            PromptSelector::Version(version) => write!(f, "version {}", version),
        }
    }
}

/// Errors that can occur while talking to a prompt source
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Prompt '{name}' with {selector} not found")]
    NotFound { name: String, selector: PromptSelector },

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid host '{0}'")]
    InvalidHost(String),

    #[error("Missing credentials: {0} not set")]
    MissingCredentials(String),

    #[error("{0}")]
    Other(String),
}

impl FetchError {
    pub fn not_found(name: impl Into<String>, label: impl Into<String>) -> Self {
        FetchError::NotFound {
            name: name.into(),
            selector: PromptSelector::Label(label.into()),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound { .. })
    }
}

/// In-memory prompt source for tests and dry runs
#[derive(Default)]
pub struct MockPromptSource {
    prompts: HashMap<(String, String), PromptRecord>,
    failures: HashMap<(String, String), String>,
    summaries: Vec<PromptSummary>,
    list_error: Option<String>,
    calls: Mutex<Vec<(String, String)>>,
    list_calls: AtomicUsize,
}

impl MockPromptSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `record` for its name under `label`
    pub fn with_prompt(mut self, label: impl Into<String>, record: PromptRecord) -> Self {
        self.prompts.insert((record.name.clone(), label.into()), record);
        self
    }

    /// Fail fetches of `name`/`label` with `message`
    pub fn with_failure(mut self, name: impl Into<String>, label: impl Into<String>, message: impl Into<String>) -> Self {
        self.failures.insert((name.into(), label.into()), message.into());
        self
    }

    pub fn with_summaries(mut self, summaries: Vec<PromptSummary>) -> Self {
        self.summaries = summaries;
        self
    }

    pub fn with_list_error(mut self, message: impl Into<String>) -> Self {
        self.list_error = Some(message.into());
        self
    }

    /// Every (name, label) fetched so far, in call order
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Number of listing requests so far
    pub fn list_call_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PromptSource for MockPromptSource {
    async fn fetch_prompt(&self, name: &str, label: &str) -> Result<PromptRecord, FetchError> {
        let key = (name.to_string(), label.to_string());
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).push(key.clone());

        if let Some(message) = self.failures.get(&key) {
            return Err(FetchError::Other(message.clone()));
        }

        self.prompts
            .get(&key)
            .cloned()
            .ok_or_else(|| FetchError::not_found(name, label))
    }

    async fn list_prompts(&self) -> Result<Vec<PromptSummary>, FetchError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        match &self.list_error {
            Some(message) => Err(FetchError::Other(message.clone())),
            None => Ok(self.summaries.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Template;

    #[test]
    fn test_selector_display() {
        assert_eq!(PromptSelector::Default.to_string(), "default label");
        assert_eq!(PromptSelector::Label("latest".into()).to_string(), "label 'latest'");
        assert_eq!(PromptSelector::Version(7).to_string(), "version 7");
    }

    #[test]
    fn test_fetch_error_messages() {
        let err = FetchError::not_found("greeting", "production");
        assert_eq!(err.to_string(), "Prompt 'greeting' with label 'production' not found");
        assert!(err.is_not_found());

        let err = FetchError::Api {
            status: 401,
            message: "Unauthorized".to_string(),
        };
        assert_eq!(err.to_string(), "API error 401: Unauthorized");
        assert!(!err.is_not_found());

        let err = FetchError::MissingCredentials("LANGFUSE_SECRET_KEY".to_string());
        assert_eq!(err.to_string(), "Missing credentials: LANGFUSE_SECRET_KEY not set");
    }

    #[tokio::test]
    async fn test_mock_serves_by_name_and_label() {
        let source = MockPromptSource::new()
            .with_prompt("production", PromptRecord::new("p1", "greeting", 1, Template::from("Hi")));

        let record = source.fetch_prompt("greeting", "production").await.unwrap();
        assert_eq!(record.id, "p1");

        let missing = source.fetch_prompt("greeting", "staging").await;
        assert!(matches!(missing, Err(FetchError::NotFound { .. })));

        assert_eq!(
            source.calls(),
            vec![
                ("greeting".to_string(), "production".to_string()),
                ("greeting".to_string(), "staging".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_mock_failure_and_listing() {
        let source = MockPromptSource::new()
            .with_failure("broken", "production", "boom")
            .with_list_error("listing down");

        let err = source.fetch_prompt("broken", "production").await.unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert_eq!(source.call_count(), 1);

        assert!(source.list_prompts().await.is_err());
        assert_eq!(source.list_call_count(), 1);
    }
}
