//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - get: fetch a prompt as-is
//! - compile: fetch a prompt and substitute variables
//! - variables / labels / list: picker helpers
//! - batch: compile a file of work items

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// lfprompt - Fetch and compile Langfuse prompts
#[derive(Parser, Debug)]
#[command(name = "lfprompt")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a prompt without compiling it
    Get {
        /// Prompt name
        name: String,

        /// Label to fetch (defaults to the service's production label)
        #[arg(short, long)]
        label: Option<String>,

        /// Exact version to fetch
        #[arg(long, conflicts_with = "label")]
        version: Option<u32>,
    },

    /// Fetch a prompt and substitute variables
    Compile {
        /// Prompt name
        name: String,

        /// Label to fetch
        #[arg(short, long, default_value = "production")]
        label: String,

        /// Variable binding, repeatable
        #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_var)]
        vars: Vec<(String, String)>,

        /// Print an error record instead of failing
        #[arg(long)]
        continue_on_fail: bool,
    },

    /// List the variables a prompt expects
    Variables {
        /// Prompt name
        name: String,

        /// Label to fetch
        #[arg(short, long, default_value = "production")]
        label: String,
    },

    /// List labels available for a prompt
    Labels {
        /// Prompt name
        name: String,
    },

    /// Search prompts by name
    List {
        /// Case-insensitive name filter
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Compile every entry of a YAML/JSON batch file
    Batch {
        /// Batch file: a list of { promptName, label, variables }
        file: PathBuf,

        /// Record failed items and keep going
        #[arg(long)]
        continue_on_fail: bool,
    },
}

/// Parse `KEY=VALUE`, splitting on the first `=`
pub fn parse_var(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))
}
