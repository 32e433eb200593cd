//! Batch runner module - fetch-then-compile over a list of work items.
//!
//! This module provides:
//! - BatchRunner for sequential batch compilation
//! - BatchRunnerConfig for abort vs. continue-on-fail behavior

mod batch_runner;

pub use batch_runner::{BatchRunner, BatchRunnerConfig, MISSING_SELECTOR};
