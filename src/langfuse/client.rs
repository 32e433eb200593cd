//! Langfuse API client implementation
//!
//! This module implements the PromptSource trait for the Langfuse public API.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use super::source::{FetchError, PromptSelector, PromptSource};
use super::types::{PromptListResponse, PromptSummary};
use crate::domain::PromptRecord;

/// Langfuse Cloud (EU)
pub const DEFAULT_HOST: &str = "https://cloud.langfuse.com";

/// Path of the prompt API below the host
const PROMPTS_PATH: [&str; 4] = ["api", "public", "v2", "prompts"];

/// Page size used when listing prompts
const LIST_PAGE_LIMIT: u32 = 100;

/// Upper bound on listing requests, whatever the server reports
const MAX_LIST_PAGES: u32 = 500;

pub const HOST_ENV: &str = "LANGFUSE_HOST";
pub const PUBLIC_KEY_ENV: &str = "LANGFUSE_PUBLIC_KEY";
pub const SECRET_KEY_ENV: &str = "LANGFUSE_SECRET_KEY";

/// Host and key pair for one Langfuse project
#[derive(Clone)]
pub struct LangfuseCredentials {
    pub host: String,
    pub public_key: String,
    pub secret_key: String,
}

impl LangfuseCredentials {
    pub fn new(host: impl Into<String>, public_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            public_key: public_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Read credentials from LANGFUSE_* environment variables
    ///
    /// The host defaults to Langfuse Cloud; both keys are required.
    pub fn from_env() -> Result<Self, FetchError> {
        let host = std::env::var(HOST_ENV).unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let public_key =
            std::env::var(PUBLIC_KEY_ENV).map_err(|_| FetchError::MissingCredentials(PUBLIC_KEY_ENV.to_string()))?;
        let secret_key =
            std::env::var(SECRET_KEY_ENV).map_err(|_| FetchError::MissingCredentials(SECRET_KEY_ENV.to_string()))?;
        Ok(Self::new(host, public_key, secret_key))
    }
}

impl fmt::Debug for LangfuseCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LangfuseCredentials")
            .field("host", &self.host)
            .field("public_key", &self.public_key)
            .field("secret_key", &"***")
            .finish()
    }
}

/// Configuration for the Langfuse client
#[derive(Debug, Clone)]
pub struct LangfuseConfig {
    pub timeout: Duration,
}

impl Default for LangfuseConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

/// Langfuse API client
pub struct LangfuseClient {
    client: Client,
    base_url: Url,
    credentials: LangfuseCredentials,
}

impl LangfuseClient {
    /// Create a client from environment credentials
    pub fn from_env(config: LangfuseConfig) -> Result<Self, FetchError> {
        Self::new(LangfuseCredentials::from_env()?, config)
    }

    /// Create a client with explicit credentials
    pub fn new(credentials: LangfuseCredentials, config: LangfuseConfig) -> Result<Self, FetchError> {
        if credentials.public_key.is_empty() {
            return Err(FetchError::MissingCredentials("public key".to_string()));
        }
        if credentials.secret_key.is_empty() {
            return Err(FetchError::MissingCredentials("secret key".to_string()));
        }

        let base_url =
            Url::parse(credentials.host.trim()).map_err(|_| FetchError::InvalidHost(credentials.host.clone()))?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidHost(credentials.host.clone()));
        }

        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    /// `{host}/api/public/v2/prompts[/{name}]`, with the name percent-encoded
    fn prompts_url(&self, name: Option<&str>) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| FetchError::InvalidHost(self.credentials.host.clone()))?;
            segments.pop_if_empty().extend(PROMPTS_PATH);
            if let Some(name) = name {
                segments.push(name);
            }
        }
        Ok(url)
    }

    fn get(&self, url: Url) -> RequestBuilder {
        self.client
            .get(url)
            .basic_auth(&self.credentials.public_key, Some(&self.credentials.secret_key))
    }

    /// Fetch one prompt by name and selector
    pub async fn get_prompt(&self, name: &str, selector: &PromptSelector) -> Result<PromptRecord, FetchError> {
        let url = self.prompts_url(Some(name))?;
        let request = match selector {
            PromptSelector::Default => self.get(url),
            PromptSelector::Label(label) => self.get(url).query(&[("label", label.as_str())]),
            PromptSelector::Version(version) => self.get(url).query(&[("version", version.to_string())]),
        };

        log::debug!("Fetching prompt '{}' ({})", name, selector);
        let response = request.send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                name: name.to_string(),
                selector: selector.clone(),
            });
        }

        read_json(response).await
    }

    /// Fetch every page of the prompt listing
    pub async fn list_all(&self) -> Result<Vec<PromptSummary>, FetchError> {
        let mut prompts = Vec::new();
        let mut page: u32 = 1;

        loop {
            let url = self.prompts_url(None)?;
            let response = self
                .get(url)
                .query(&[("page", page.to_string()), ("limit", LIST_PAGE_LIMIT.to_string())])
                .send()
                .await?;

            let listing: PromptListResponse = read_json(response).await?;
            if listing.data.is_empty() {
                break;
            }
            prompts.extend(listing.data);

            // Paging is driven by the local counter; the echoed page number is not trusted
            match listing.meta {
                Some(meta) if page < meta.total_pages && page < MAX_LIST_PAGES => page += 1,
                _ => break,
            }
        }

        log::debug!("Listed {} prompts", prompts.len());
        Ok(prompts)
    }

    pub fn host(&self) -> &str {
        &self.credentials.host
    }
}

/// Map non-success statuses to API errors and parse the body
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, FetchError> {
    let status = response.status();

    if !status.is_success() {
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(FetchError::Api {
            status: status.as_u16(),
            message: error_body,
        });
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| FetchError::InvalidResponse(format!("Failed to parse response: {}", e)))
}

#[async_trait]
impl PromptSource for LangfuseClient {
    async fn fetch_prompt(&self, name: &str, label: &str) -> Result<PromptRecord, FetchError> {
        self.get_prompt(name, &PromptSelector::Label(label.to_string())).await
    }

    async fn list_prompts(&self) -> Result<Vec<PromptSummary>, FetchError> {
        self.list_all().await
    }
}

impl fmt::Debug for LangfuseClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LangfuseClient")
            .field("host", &self.credentials.host)
            .field("public_key", &self.credentials.public_key)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(host: &str) -> LangfuseClient {
        LangfuseClient::new(
            LangfuseCredentials::new(host, "pk-lf-123", "sk-lf-456"),
            LangfuseConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_config_default() {
        assert_eq!(LangfuseConfig::default().timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_prompt_url() {
        let client = client("https://cloud.langfuse.com");
        let url = client.prompts_url(Some("test-prompt")).unwrap();
        assert_eq!(url.as_str(), "https://cloud.langfuse.com/api/public/v2/prompts/test-prompt");
    }

    #[test]
    fn test_prompt_url_keeps_host_path_and_encodes_name() {
        let client = client("https://example.com/langfuse/");
        let url = client.prompts_url(Some("team/my prompt")).unwrap();
        assert_eq!(url.as_str(), "https://example.com/langfuse/api/public/v2/prompts/team%2Fmy%20prompt");

        let listing = client.prompts_url(None).unwrap();
        assert_eq!(listing.as_str(), "https://example.com/langfuse/api/public/v2/prompts");
    }

    #[test]
    fn test_invalid_host() {
        let result = LangfuseClient::new(
            LangfuseCredentials::new("not a url", "pk", "sk"),
            LangfuseConfig::default(),
        );
        assert!(matches!(result, Err(FetchError::InvalidHost(_))));
    }

    #[test]
    fn test_missing_keys() {
        let result = LangfuseClient::new(
            LangfuseCredentials::new(DEFAULT_HOST, "", "sk"),
            LangfuseConfig::default(),
        );
        assert!(matches!(result, Err(FetchError::MissingCredentials(_))));

        let result = LangfuseClient::new(
            LangfuseCredentials::new(DEFAULT_HOST, "pk", ""),
            LangfuseConfig::default(),
        );
        assert!(matches!(result, Err(FetchError::MissingCredentials(_))));
    }

    #[test]
    fn test_debug_hides_secret() {
        let credentials = LangfuseCredentials::new(DEFAULT_HOST, "pk-lf-123", "sk-lf-456");
        let debug = format!("{:?}", credentials);
        assert!(debug.contains("pk-lf-123"));
        assert!(!debug.contains("sk-lf-456"));

        let debug = format!("{:?}", client(DEFAULT_HOST));
        assert!(!debug.contains("sk-lf-456"));
    }
}
