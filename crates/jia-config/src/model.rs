//! Configuration schema for the jia console.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Default remote request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Root config for the console.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct JiaConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
}

impl JiaConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> JiaConfigBuilder {
        JiaConfigBuilder::new()
    }

    /// Validate configuration invariants that cannot be expressed in serde.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.url.trim().is_empty() {
            return Err(ConfigError::Invalid("store.url is required".to_string()));
        }
        if !is_http_url(&self.store.url) {
            return Err(ConfigError::Invalid(format!(
                "store.url must be an http(s) URL: {}",
                self.store.url
            )));
        }
        if self.store.api_key.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "store.api_key is required".to_string(),
            ));
        }
        if self.assistant.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "assistant.base_url is required".to_string(),
            ));
        }
        if !is_http_url(&self.assistant.base_url) {
            return Err(ConfigError::Invalid(format!(
                "assistant.base_url must be an http(s) URL: {}",
                self.assistant.base_url
            )));
        }
        if self.assistant.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "assistant.timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Builder for assembling a `JiaConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct JiaConfigBuilder {
    config: JiaConfig,
}

impl JiaConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: JiaConfig::default(),
        }
    }

    /// Replace the store configuration.
    pub fn store(mut self, store: StoreConfig) -> Self {
        self.config.store = store;
        self
    }

    /// Replace the assistant configuration.
    pub fn assistant(mut self, assistant: AssistantConfig) -> Self {
        self.config.assistant = assistant;
        self
    }

    /// Finalize and return the built `JiaConfig`.
    pub fn build(self) -> JiaConfig {
        self.config
    }
}

/// Hosted relational store endpoint and credential.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct StoreConfig {
    /// Base URL of the hosted store, e.g. `https://example.supabase.co`.
    #[serde(default)]
    pub url: String,
    /// API key sent with every store request.
    #[serde(default)]
    pub api_key: String,
}

/// Remote assistant service endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssistantConfig {
    /// Base URL of the extraction/matching service.
    #[serde(default)]
    pub base_url: String,
    /// Request timeout applied to every assistant call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[cfg(test)]
mod tests {
    use super::{AssistantConfig, JiaConfig, StoreConfig};
    use pretty_assertions::assert_eq;

    fn valid_config() -> JiaConfig {
        JiaConfig::builder()
            .store(StoreConfig {
                url: "https://store.example".to_string(),
                api_key: "key".to_string(),
            })
            .assistant(AssistantConfig {
                base_url: "https://assistant.example".to_string(),
                timeout_secs: 30,
            })
            .build()
    }

    #[test]
    fn builder_produces_valid_config() {
        let config = valid_config();
        config.validate().expect("valid");
        assert_eq!(config.assistant.timeout_secs, 30);
    }

    #[test]
    fn default_timeout_applies_when_unset() {
        let config: JiaConfig =
            serde_json::from_str(r#"{"assistant": {"base_url": "https://a.example"}}"#)
                .expect("decode");
        assert_eq!(config.assistant.timeout_secs, 30);
    }

    #[test]
    fn validate_rejects_missing_store_credential() {
        let mut config = valid_config();
        config.store.api_key.clear();
        let err = config.validate().expect_err("invalid");
        assert!(err.to_string().contains("store.api_key"));
    }

    #[test]
    fn validate_rejects_non_http_endpoint() {
        let mut config = valid_config();
        config.assistant.base_url = "ftp://assistant.example".to_string();
        assert!(config.validate().is_err());
    }
}
