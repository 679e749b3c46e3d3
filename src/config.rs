//! Client configuration.
//!
//! A [`ClientConfig`] can be built in code, loaded from YAML, or assembled from
//! the environment. Environment knobs mirror the transport defaults:
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `AI_AUDIO_BASE_URL` | API base URL (default `https://api.openai.com/v1`) |
//! | `AI_HTTP_TIMEOUT_SECS` | Request timeout in seconds (default 60) |
//! | `AI_PROXY_URL` | Proxy for all requests |
//! | `OPENAI_ORG_ID` | Sent as `OpenAI-Organization` |
//! | `OPENAI_API_KEY` | API key, used when the OS keyring has none |

use crate::{Error, ErrorContext, Result};
use keyring::Entry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_AZURE_API_VERSION: &str = "2023-05-15";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

const KEYRING_SERVICE: &str = "ai-audio";
const KEYRING_USER: &str = "openai";

/// Flavour of the remote API, which decides URL layout and auth header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiType {
    #[default]
    OpenAi,
    Azure,
    AzureAd,
}

impl ApiType {
    pub fn is_azure(&self) -> bool {
        matches!(self, Self::Azure | Self::AzureAd)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_type: ApiType,
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    /// Azure only: model name to deployment name.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub azure_model_mapping: HashMap<String, String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            api_type: ApiType::OpenAi,
            api_version: None,
            organization: None,
            azure_model_mapping: HashMap::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            proxy_url: None,
        }
    }
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Configuration for an Azure OpenAI resource (`https://<name>.openai.azure.com`).
    pub fn azure(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: Some(api_key.into()),
            api_type: ApiType::Azure,
            api_version: Some(DEFAULT_AZURE_API_VERSION.to_string()),
            ..Self::default()
        }
    }

    /// Assemble a configuration from environment variables and the OS keyring.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = env::var("AI_AUDIO_BASE_URL") {
            config.base_url = url;
        }
        if let Some(secs) = env::var("AI_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            config.timeout_secs = secs;
        }
        config.proxy_url = env::var("AI_PROXY_URL").ok();
        config.organization = env::var("OPENAI_ORG_ID").ok();
        config.api_key = resolve_api_key();
        config
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| {
            Error::configuration_with_context(
                format!("Invalid client configuration: {}", e),
                ErrorContext::new().with_source("config"),
            )
        })
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::io_with_context(
                e,
                ErrorContext::new()
                    .with_details(path.display().to_string())
                    .with_source("config"),
            )
        })?;
        let mut config = Self::from_yaml_str(&text)?;
        if config.api_key.is_none() {
            config.api_key = resolve_api_key();
        }
        Ok(config)
    }

    /// API version to send, falling back to the Azure default for Azure types.
    pub fn api_version(&self) -> Option<&str> {
        match (&self.api_version, self.api_type.is_azure()) {
            (Some(v), _) => Some(v.as_str()),
            (None, true) => Some(DEFAULT_AZURE_API_VERSION),
            (None, false) => None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let ctx = || ErrorContext::new().with_source("config");
        if self.base_url.trim().is_empty() {
            return Err(Error::configuration_with_context(
                "Base URL must not be empty",
                ctx().with_field_path("base_url"),
            ));
        }
        url::Url::parse(&self.base_url).map_err(|e| {
            Error::configuration_with_context(
                format!("Invalid base URL: {}", e),
                ctx()
                    .with_field_path("base_url")
                    .with_details(self.base_url.clone()),
            )
        })?;
        if self.timeout_secs == 0 {
            return Err(Error::configuration_with_context(
                "Timeout must be greater than zero",
                ctx().with_field_path("timeout_secs"),
            ));
        }
        if self.api_type.is_azure()
            && matches!(self.api_version.as_deref(), Some(v) if v.trim().is_empty())
        {
            return Err(Error::configuration_with_context(
                "Azure API version must not be empty",
                ctx().with_field_path("api_version"),
            ));
        }
        Ok(())
    }
}

pub(crate) fn resolve_api_key() -> Option<String> {
    // 1. Try Keyring
    if let Ok(entry) = Entry::new(KEYRING_SERVICE, KEYRING_USER) {
        if let Ok(key) = entry.get_password() {
            return Some(key);
        }
    }

    // 2. Try Environment Variable
    env::var("OPENAI_API_KEY").ok()
}
