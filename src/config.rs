use eyre::{Context, Result};
use lfprompt::langfuse::{
    DEFAULT_HOST, FetchError, LangfuseConfig, LangfuseCredentials,
    client::{HOST_ENV, PUBLIC_KEY_ENV, SECRET_KEY_ENV},
};
use lfprompt::runner::BatchRunnerConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub langfuse: LangfuseSettings,
    pub batch: BatchSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LangfuseSettings {
    pub host: String,
    pub public_key: Option<String>,
    pub secret_key: Option<String>,
    pub timeout_ms: u64,
}

impl Default for LangfuseSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            public_key: None,
            secret_key: None,
            timeout_ms: 30000,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    pub continue_on_fail: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            langfuse: LangfuseSettings::default(),
            batch: BatchSettings::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain, then apply LANGFUSE_* overrides
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let config = Self::load_file_chain(config_path)?;
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    fn load_file_chain(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let project_name = env!("CARGO_PKG_NAME");
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Environment wins over the file for host and keys
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(HOST_ENV).filter(|v| !v.is_empty()) {
            self.langfuse.host = host;
        }
        if let Some(key) = lookup(PUBLIC_KEY_ENV).filter(|v| !v.is_empty()) {
            self.langfuse.public_key = Some(key);
        }
        if let Some(key) = lookup(SECRET_KEY_ENV).filter(|v| !v.is_empty()) {
            self.langfuse.secret_key = Some(key);
        }
        self
    }

    pub fn credentials(&self) -> std::result::Result<LangfuseCredentials, FetchError> {
        let public_key = self
            .langfuse
            .public_key
            .clone()
            .ok_or_else(|| FetchError::MissingCredentials(PUBLIC_KEY_ENV.to_string()))?;
        let secret_key = self
            .langfuse
            .secret_key
            .clone()
            .ok_or_else(|| FetchError::MissingCredentials(SECRET_KEY_ENV.to_string()))?;
        Ok(LangfuseCredentials::new(self.langfuse.host.clone(), public_key, secret_key))
    }

    pub fn client_config(&self) -> LangfuseConfig {
        LangfuseConfig {
            timeout: Duration::from_millis(self.langfuse.timeout_ms),
        }
    }

    /// Batch behavior, with the command-line flag able to switch on continue-on-fail
    pub fn runner_config(&self, continue_on_fail: bool) -> BatchRunnerConfig {
        BatchRunnerConfig {
            continue_on_fail: continue_on_fail || self.batch.continue_on_fail,
        }
    }
}
