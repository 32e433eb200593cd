//! CLI module for lfprompt - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for fetching, compiling
//! and browsing Langfuse prompts.

pub mod commands;

pub use commands::Cli;
