//! Batch runner - fetch and compile prompts for a list of work items.
//!
//! Items are processed one at a time in submission order. Each item is validated,
//! fetched through the injected PromptSource and compiled against its bindings.
//! A failure either aborts the batch or, with continue-on-fail, is recorded in
//! place of that item's output.

use std::sync::Arc;

use crate::domain::{BatchItem, BatchOutput, CompiledOutput, ErrorRecord, is_blank};
use crate::error::{PromptError, Result};
use crate::langfuse::PromptSource;
use crate::prompt::compile_prompt;

/// Message for items missing a prompt name or label
pub const MISSING_SELECTOR: &str = "Prompt name and label are required";

/// Configuration for the BatchRunner.
#[derive(Debug, Clone, Default)]
pub struct BatchRunnerConfig {
    /// Record per-item failures instead of aborting the batch
    pub continue_on_fail: bool,
}

impl BatchRunnerConfig {
    pub fn continue_on_fail() -> Self {
        Self { continue_on_fail: true }
    }
}

/// Runs compile batches against a prompt source
pub struct BatchRunner<S>
where
    S: PromptSource + ?Sized,
{
    /// Where prompts are fetched from
    source: Arc<S>,
    /// Configuration
    config: BatchRunnerConfig,
}

impl<S> BatchRunner<S>
where
    S: PromptSource + ?Sized,
{
    /// Create a new BatchRunner that aborts on the first failure.
    pub fn new(source: Arc<S>) -> Self {
        Self {
            source,
            config: BatchRunnerConfig::default(),
        }
    }

    /// Create a new BatchRunner with custom configuration.
    pub fn with_config(source: Arc<S>, config: BatchRunnerConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &BatchRunnerConfig {
        &self.config
    }

    /// Process every item, returning one output per item in input order.
    ///
    /// Without continue-on-fail the first failing item's error is returned and
    /// no outputs are produced.
    pub async fn run(&self, items: Vec<BatchItem>) -> Result<Vec<BatchOutput>> {
        let mut results = Vec::with_capacity(items.len());

        for item in items {
            let index = item.index;

            match self.process_item(item).await {
                Ok(output) => {
                    tracing::debug!(index, prompt = %output.name, version = output.version, "Item compiled");
                    results.push(BatchOutput::Success { index, output });
                }
                Err(error) if self.config.continue_on_fail => {
                    tracing::warn!(index, error = %error, "Item failed, continuing");
                    results.push(BatchOutput::Failure(ErrorRecord {
                        index,
                        message: error.item_message(),
                    }));
                }
                Err(error) => {
                    tracing::error!(index, error = %error, "Item failed, aborting batch");
                    return Err(error);
                }
            }
        }

        Ok(results)
    }

    /// Validate, fetch and compile a single item.
    async fn process_item(&self, item: BatchItem) -> Result<CompiledOutput> {
        validate(&item)?;

        tracing::debug!(index = item.index, prompt = %item.prompt_name, label = %item.label, "Fetching prompt");
        let record = self
            .source
            .fetch_prompt(&item.prompt_name, &item.label)
            .await
            .map_err(|source| PromptError::Fetch {
                index: item.index,
                name: item.prompt_name.clone(),
                label: item.label.clone(),
                source,
            })?;

        let compiled = compile_prompt(&record.prompt, &item.variables);
        Ok(CompiledOutput::from_record(record, compiled, item.variables))
    }
}

/// Both selectors must be present before anything is fetched
fn validate(item: &BatchItem) -> Result<()> {
    if is_blank(&item.prompt_name) || is_blank(&item.label) {
        return Err(PromptError::Validation {
            index: item.index,
            message: MISSING_SELECTOR.to_string(),
        });
    }
    Ok(())
}
