//! Domain types for lfprompt
//!
//! This module contains all core domain types:
//! - Template: Text or chat prompt content, plus the chat message type
//! - PromptRecord: A prompt fetched from Langfuse
//! - CompiledOutput: A prompt after variable substitution
//! - BatchItem / BatchOutput: Batch work items and their per-item results

pub mod batch;
pub mod record;
pub mod template;

pub use batch::{BatchEntry, BatchItem, BatchOutput, ErrorRecord, is_blank};
pub use record::{CompiledOutput, PromptRecord};
pub use template::{ChatMessage, PromptType, Template, VariableBindings, VariableSet};
