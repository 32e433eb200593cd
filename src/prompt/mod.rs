//! Prompt System - Variable extraction and compilation
//!
//! This module finds `{{variable}}` placeholders in Langfuse prompt templates
//! and substitutes caller-supplied values into them, for both text and chat prompts.

mod compile;
mod extract;

pub use compile::{PromptCompiler, compile_prompt, compile_text};
pub use extract::{extract_from_text, extract_variables};
