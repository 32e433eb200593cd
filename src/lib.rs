//! lfprompt - Fetch and compile Langfuse prompt templates
//!
//! lfprompt retrieves versioned, labelled prompts from Langfuse and substitutes
//! `{{variable}}` placeholders with caller-supplied values, for text and chat
//! prompts alike, one item or a whole batch at a time.

pub mod domain;
pub mod error;
pub mod langfuse;
pub mod prompt;
pub mod runner;

pub use error::{PromptError, Result};
