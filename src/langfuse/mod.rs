//! Langfuse integration - prompt source trait, HTTP client and picker helpers
//!
//! This module provides:
//! - PromptSource trait, the fetch collaborator used by the batch runner
//! - LangfuseClient implementation over the public REST API
//! - MockPromptSource for tests
//! - Option helpers for prompt, label and variable pickers

pub mod client;
pub mod options;
pub mod source;
pub mod types;

pub use client::{DEFAULT_HOST, LangfuseClient, LangfuseConfig, LangfuseCredentials};
pub use options::{LabelOption, PromptOption, default_labels, label_options, mapping_variables, search_prompts};
pub use source::{FetchError, MockPromptSource, PromptSelector, PromptSource};
pub use types::{PageMeta, PromptListResponse, PromptSummary};
