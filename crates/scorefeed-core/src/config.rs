//! File-backed pipeline configuration.
//!
//! ```json
//! {
//!   "endpoint": { "url": "https://scores.example.test/v1/latest", "timeout_ms": 30000 },
//!   "retry": { "max_attempts": 3, "initial_delay_ms": 1000, "backoff_multiplier": 2.0 },
//!   "schema": { "id": "number", "name": "string", "score": "number", "timestamp": "string" }
//! }
//! ```
//!
//! Every section is optional except `endpoint.url`, which may also be
//! supplied later through [`PipelineConfig::with_url`].

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::endpoint::{Endpoint, DEFAULT_TIMEOUT};
use crate::error::ConfigError;
use crate::retry::{
    RetryPolicy, DEFAULT_BACKOFF_MULTIPLIER, DEFAULT_INITIAL_DELAY, DEFAULT_MAX_ATTEMPTS,
};
use crate::schema::SchemaDescriptor;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            url: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub backoff_multiplier: f64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay_ms: DEFAULT_INITIAL_DELAY.as_millis() as u64,
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
        }
    }
}

impl RetrySettings {
    pub fn to_policy(&self) -> Result<RetryPolicy, ConfigError> {
        RetryPolicy::new(
            self.max_attempts,
            Duration::from_millis(self.initial_delay_ms),
            self.backoff_multiplier,
        )
    }
}

/// Raw configuration as read from disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    #[serde(default)]
    pub endpoint: EndpointSettings,
    #[serde(default)]
    pub retry: RetrySettings,
    #[serde(default = "SchemaDescriptor::scores")]
    pub schema: SchemaDescriptor,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            endpoint: EndpointSettings::default(),
            retry: RetrySettings::default(),
            schema: SchemaDescriptor::scores(),
        }
    }
}

/// Validated, immutable values built from a [`PipelineConfig`].
#[derive(Debug, Clone)]
pub struct PipelineParts {
    pub endpoint: Endpoint,
    pub retry_policy: RetryPolicy,
    pub schema: SchemaDescriptor,
}

impl PipelineConfig {
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(input).map_err(|error| ConfigError::Parse(error.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|error| ConfigError::Read {
            path: path.display().to_string(),
            message: error.to_string(),
        })?;
        Self::from_json_str(&content)
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint.url = Some(url.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.endpoint.timeout_ms = timeout_ms;
        self
    }

    pub fn endpoint(&self) -> Result<Endpoint, ConfigError> {
        let url = self.endpoint.url.as_deref().ok_or(ConfigError::MissingUrl)?;
        Endpoint::new(url, Duration::from_millis(self.endpoint.timeout_ms))
    }

    /// Validate every section. Retry and schema are checked even when the url is absent.
    pub fn into_parts(self) -> Result<PipelineParts, ConfigError> {
        let retry_policy = self.retry.to_policy()?;
        let endpoint = self.endpoint()?;

        Ok(PipelineParts {
            endpoint,
            retry_policy,
            schema: self.schema,
        })
    }
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT.as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldType;

    #[test]
    fn empty_document_uses_defaults_but_needs_a_url() {
        let config = PipelineConfig::from_json_str("{}").expect("valid json");

        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.clone().into_parts().err(), Some(ConfigError::MissingUrl));

        let parts = config
            .with_url("https://scores.example.test/v1")
            .into_parts()
            .expect("complete config");
        assert_eq!(parts.endpoint.timeout(), Duration::from_secs(30));
        assert_eq!(parts.retry_policy.max_attempts(), 3);
        assert_eq!(parts.schema, SchemaDescriptor::scores());
    }

    #[test]
    fn full_document_round_trips_into_parts() {
        let config = PipelineConfig::from_json_str(
            r#"{
                "endpoint": {"url": "http://localhost:9000/scores", "timeout_ms": 2500},
                "retry": {"max_attempts": 5, "initial_delay_ms": 200, "backoff_multiplier": 1.5},
                "schema": {"player": "string", "points": "number"}
            }"#,
        )
        .expect("valid config");

        let parts = config.into_parts().expect("valid parts");
        assert_eq!(parts.endpoint.as_str(), "http://localhost:9000/scores");
        assert_eq!(parts.endpoint.timeout(), Duration::from_millis(2_500));
        assert_eq!(parts.retry_policy.max_attempts(), 5);
        assert_eq!(parts.retry_policy.delay_after_attempt(2), Duration::from_millis(300));
        assert_eq!(parts.schema.get("points"), Some(FieldType::Number));
        assert_eq!(parts.schema.get("id"), None);
    }

    #[test]
    fn unknown_keys_and_type_tags_are_rejected() {
        assert!(matches!(
            PipelineConfig::from_json_str(r#"{"endpoints": {}}"#),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            PipelineConfig::from_json_str(r#"{"schema": {"id": "int"}}"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn invalid_retry_is_reported_before_missing_url() {
        let config = PipelineConfig::from_json_str(r#"{"retry": {"max_attempts": 0}}"#)
            .expect("valid json");
        assert!(matches!(
            config.into_parts(),
            Err(ConfigError::InvalidRetry(_))
        ));
    }

    #[test]
    fn missing_file_names_the_path() {
        let error = PipelineConfig::from_path("/no/such/scorefeed.json").expect_err("missing");
        assert!(error.to_string().contains("/no/such/scorefeed.json"));
    }
}
