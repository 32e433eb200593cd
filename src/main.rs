use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lfprompt::domain::{BatchEntry, BatchItem, BatchOutput, VariableBindings};
use lfprompt::langfuse::{LangfuseClient, PromptSelector, label_options, mapping_variables, search_prompts};
use lfprompt::runner::BatchRunner;

mod cli;
mod config;

use cli::Cli;
use cli::commands::Commands;
use config::Config;

fn setup_logging(level: &str) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lfprompt")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("lfprompt.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn build_client(config: &Config) -> Result<Arc<LangfuseClient>> {
    let credentials = config.credentials().context("Langfuse credentials are not configured")?;
    let client = LangfuseClient::new(credentials, config.client_config()).context("Failed to create Langfuse client")?;
    info!("Using Langfuse host: {}", client.host());
    Ok(Arc::new(client))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("Failed to serialize output")?);
    Ok(())
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        eprintln!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        Commands::Get { name, label, version } => handle_get_command(name, label.as_deref(), *version, config).await,
        Commands::Compile {
            name,
            label,
            vars,
            continue_on_fail,
        } => handle_compile_command(name, label, vars, *continue_on_fail, config).await,
        Commands::Variables { name, label } => handle_variables_command(name, label, config).await,
        Commands::Labels { name } => handle_labels_command(name, config).await,
        Commands::List { filter } => handle_list_command(filter.as_deref(), config).await,
        Commands::Batch { file, continue_on_fail } => handle_batch_command(file, *continue_on_fail, config).await,
    }
}

async fn handle_get_command(name: &str, label: Option<&str>, version: Option<u32>, config: &Config) -> Result<()> {
    let selector = match (label, version) {
        (_, Some(version)) => PromptSelector::Version(version),
        (Some(label), None) => PromptSelector::Label(label.to_string()),
        (None, None) => PromptSelector::Default,
    };
    info!("Fetching prompt '{}' ({})", name, selector);

    let client = build_client(config)?;
    let record = client
        .get_prompt(name, &selector)
        .await
        .context(format!("Failed to fetch prompt '{}'", name))?;

    print_json(&record)
}

async fn handle_compile_command(
    name: &str,
    label: &str,
    vars: &[(String, String)],
    continue_on_fail: bool,
    config: &Config,
) -> Result<()> {
    info!("Compiling prompt '{}' with label '{}'", name, label);

    let variables: VariableBindings = vars.iter().cloned().collect();
    let item = BatchItem::new(0, name, label).with_variables(variables);

    let results = run_batch(vec![item], continue_on_fail, config).await?;
    match results.first() {
        Some(BatchOutput::Success { output, .. }) => print_json(output),
        Some(failure) => print_json(failure),
        None => Ok(()),
    }
}

async fn handle_variables_command(name: &str, label: &str, config: &Config) -> Result<()> {
    info!("Listing variables for '{}' ({})", name, label);

    let client = build_client(config)?;
    let variables = mapping_variables(client.as_ref(), name, label).await;

    if variables.is_empty() {
        eprintln!("{}", "No variables found".yellow());
    }
    for variable in variables {
        println!("{}", variable);
    }
    Ok(())
}

async fn handle_labels_command(name: &str, config: &Config) -> Result<()> {
    info!("Listing labels for '{}'", name);

    let client = build_client(config)?;
    for option in label_options(client.as_ref(), name).await {
        println!("{}", option.value);
    }
    Ok(())
}

async fn handle_list_command(filter: Option<&str>, config: &Config) -> Result<()> {
    info!("Searching prompts - filter: {:?}", filter);

    let client = build_client(config)?;
    let prompts = search_prompts(client.as_ref(), filter)
        .await
        .context("Failed to fetch prompts")?;

    for prompt in prompts {
        println!("{}", prompt.name);
    }
    Ok(())
}

async fn handle_batch_command(file: &Path, continue_on_fail: bool, config: &Config) -> Result<()> {
    info!("Running batch from {}", file.display());

    let items = BatchEntry::load_file(file).context(format!("Failed to load batch file {}", file.display()))?;
    let results = run_batch(items, continue_on_fail, config).await?;

    let failed = results.iter().filter(|r| !r.is_success()).count();
    let compiled = results.len() - failed;
    if failed > 0 {
        eprintln!("{} {} compiled, {} failed", "Done:".yellow(), compiled, failed);
    } else {
        eprintln!("{} {} compiled", "Done:".green(), compiled);
    }

    print_json(&results)
}

async fn run_batch(items: Vec<BatchItem>, continue_on_fail: bool, config: &Config) -> Result<Vec<BatchOutput>> {
    let client = build_client(config)?;
    let runner = BatchRunner::with_config(client, config.runner_config(continue_on_fail));
    let results = runner.run(items).await.context("Batch aborted")?;
    Ok(results)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    // Setup logging
    let level = if cli.is_verbose() {
        "debug"
    } else {
        config.log_level.as_deref().unwrap_or("info")
    };
    setup_logging(level).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
