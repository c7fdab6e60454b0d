//! # Configuration Module
//!
//! Provides configuration for talking to the content management API and the
//! per-field plugin parameters persisted by the host.
//!
//! ## Overview
//!
//! [`CmaConfig`] is built through [`CmaConfigBuilder`] and validated before
//! use, so a connector never starts with a missing token or a zero retry
//! budget. The config is an explicit value handed to the connector; there is
//! no process-wide client.
//!
//! [`PluginParams`] is the only state the plugin persists: the naming
//! template of one gallery field, stored by the host's parameter mechanism.
//!
//! ## Usage
//!
//! ```
//! use core_runtime::config::CmaConfig;
//!
//! let config = CmaConfig::builder()
//!     .api_token("limited-access-token")
//!     .environment("staging")
//!     .build()
//!     .expect("valid config");
//!
//! assert_eq!(config.environment, "staging");
//! ```
//!
//! ## Error Handling
//!
//! ```should_panic
//! use core_runtime::config::CmaConfig;
//!
//! // The API token is mandatory
//! let config = CmaConfig::builder()
//!     .environment("main")
//!     .build()
//!     .expect("Should fail - missing API token");
//! ```

use crate::error::{Error, Result};
use crate::logging::redact_if_sensitive;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default CMA endpoint
pub const DEFAULT_BASE_URL: &str = "https://site-api.datocms.com";

/// Environment used when none is configured
pub const DEFAULT_ENVIRONMENT: &str = "main";

/// Environment variable holding the API token
pub const ENV_API_TOKEN: &str = "DATOCMS_API_TOKEN";
/// Environment variable holding the environment name
pub const ENV_ENVIRONMENT: &str = "DATOCMS_ENVIRONMENT";
/// Environment variable overriding the base URL
pub const ENV_BASE_URL: &str = "DATOCMS_BASE_URL";

/// Connection settings for the content management API.
///
/// Use [`CmaConfig::builder`] or [`CmaConfig::from_env`] to construct.
#[derive(Clone, PartialEq, Eq)]
pub struct CmaConfig {
    /// Bearer token; a limited-permission token is preferred over the
    /// editor's own session token
    pub api_token: String,

    /// Sandbox or primary environment name
    pub environment: String,

    /// API root without trailing slash
    pub base_url: String,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Attempts per request for throttled or failed calls, first included
    pub max_attempts: u32,

    /// Attempts when polling an asynchronous job result
    pub job_poll_attempts: u32,

    /// Delay between job result polls
    pub job_poll_interval: Duration,
}

impl std::fmt::Debug for CmaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CmaConfig")
            .field("api_token", &redact_if_sensitive("api_token", &self.api_token))
            .field("environment", &self.environment)
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .field("max_attempts", &self.max_attempts)
            .field("job_poll_attempts", &self.job_poll_attempts)
            .field("job_poll_interval", &self.job_poll_interval)
            .finish()
    }
}

impl CmaConfig {
    /// Creates a new builder for constructing a `CmaConfig`.
    pub fn builder() -> CmaConfigBuilder {
        CmaConfigBuilder::default()
    }

    /// Builds a config from `DATOCMS_API_TOKEN`, `DATOCMS_ENVIRONMENT` and
    /// `DATOCMS_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable
    /// source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();

        if let Some(token) = lookup(ENV_API_TOKEN) {
            builder = builder.api_token(token);
        }
        if let Some(environment) = lookup(ENV_ENVIRONMENT).filter(|e| !e.trim().is_empty()) {
            builder = builder.environment(environment);
        }
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|u| !u.trim().is_empty()) {
            builder = builder.base_url(base_url);
        }

        builder.build()
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.api_token.trim().is_empty() {
            return Err(Error::Config("API token cannot be empty".to_string()));
        }

        if self.environment.trim().is_empty() {
            return Err(Error::Config("Environment cannot be empty".to_string()));
        }

        if !self.base_url.starts_with("https://") && !self.base_url.starts_with("http://") {
            return Err(Error::Config(format!(
                "Base URL must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }

        if self.request_timeout.is_zero() {
            return Err(Error::Config(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        if self.max_attempts == 0 {
            return Err(Error::Config(
                "Max attempts must be at least 1".to_string(),
            ));
        }

        if self.job_poll_attempts == 0 {
            return Err(Error::Config(
                "Job poll attempts must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for constructing [`CmaConfig`] instances.
#[derive(Default)]
pub struct CmaConfigBuilder {
    api_token: Option<String>,
    environment: Option<String>,
    base_url: Option<String>,
    request_timeout: Option<Duration>,
    max_attempts: Option<u32>,
    job_poll_attempts: Option<u32>,
    job_poll_interval: Option<Duration>,
}

impl CmaConfigBuilder {
    /// Sets the API token (required).
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Sets the environment. Default: `main`
    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Sets the API root. A trailing slash is stripped.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Default: 30 seconds
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Default: 3
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Default: 10 polls, 500ms apart
    pub fn job_polling(mut self, attempts: u32, interval: Duration) -> Self {
        self.job_poll_attempts = Some(attempts);
        self.job_poll_interval = Some(interval);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapabilityMissing`] without an API token and
    /// [`Error::Config`] for any invalid value.
    pub fn build(self) -> Result<CmaConfig> {
        let api_token = self.api_token.ok_or_else(|| Error::CapabilityMissing {
            capability: "ApiToken".to_string(),
            message: format!(
                "An API token is required. Use .api_token() or set {}.",
                ENV_API_TOKEN
            ),
        })?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let config = CmaConfig {
            api_token,
            environment: self
                .environment
                .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()),
            base_url,
            request_timeout: self.request_timeout.unwrap_or(Duration::from_secs(30)),
            max_attempts: self.max_attempts.unwrap_or(3),
            job_poll_attempts: self.job_poll_attempts.unwrap_or(10),
            job_poll_interval: self
                .job_poll_interval
                .unwrap_or(Duration::from_millis(500)),
        };

        config.validate()?;

        Ok(config)
    }
}

/// Parameters the host persists for one gallery field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_string: Option<String>,
}

impl PluginParams {
    pub fn with_template(template: impl Into<String>) -> Self {
        Self {
            template_string: Some(template.into()),
        }
    }

    /// Parses the host's parameter blob. Unknown keys are ignored.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| Error::Config(format!("Invalid plugin parameters: {}", e)))
    }

    pub fn to_json(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self)
            .map_err(|e| Error::Internal(format!("Failed to serialize plugin parameters: {}", e)))
    }

    /// The template, or `None` when unset or blank.
    pub fn template(&self) -> Option<&str> {
        self.template_string
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_builder_defaults() {
        let config = CmaConfig::builder().api_token("token").build().unwrap();

        assert_eq!(config.environment, DEFAULT_ENVIRONMENT);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.job_poll_attempts, 10);
    }

    #[test]
    fn test_builder_strips_trailing_slash() {
        let config = CmaConfig::builder()
            .api_token("token")
            .base_url("http://localhost:8080/")
            .build()
            .unwrap();

        assert_eq!(config.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_missing_token_is_capability_error() {
        let err = CmaConfig::builder().build().unwrap_err();
        assert!(matches!(err, Error::CapabilityMissing { .. }));
        assert!(err.to_string().contains(ENV_API_TOKEN));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(CmaConfig::builder().api_token("  ").build().is_err());
        assert!(CmaConfig::builder()
            .api_token("token")
            .base_url("site-api.datocms.com")
            .build()
            .is_err());
        assert!(CmaConfig::builder()
            .api_token("token")
            .max_attempts(0)
            .build()
            .is_err());
        assert!(CmaConfig::builder()
            .api_token("token")
            .request_timeout(Duration::ZERO)
            .build()
            .is_err());
        assert!(CmaConfig::builder()
            .api_token("token")
            .job_polling(0, Duration::from_millis(10))
            .build()
            .is_err());
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            (ENV_API_TOKEN, "env-token"),
            (ENV_ENVIRONMENT, "sandbox"),
            (ENV_BASE_URL, ""),
        ]
        .into_iter()
        .collect();

        let config = CmaConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();

        assert_eq!(config.api_token, "env-token");
        assert_eq!(config.environment, "sandbox");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_from_lookup_without_token_fails() {
        assert!(CmaConfig::from_lookup(|_| None).is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = CmaConfig::builder().api_token("super-secret").build().unwrap();
        let rendered = format!("{:?}", config);

        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn test_plugin_params_round_trip_uses_camel_case() {
        let params = PluginParams::with_template("{handle}");
        let value = params.to_json().unwrap();

        assert_eq!(value, json!({"templateString": "{handle}"}));
        assert_eq!(PluginParams::from_json(value).unwrap(), params);
    }

    #[test]
    fn test_plugin_params_template_blank_is_none() {
        assert_eq!(PluginParams::from_json(json!({})).unwrap().template(), None);
        assert_eq!(PluginParams::with_template("   ").template(), None);
        assert_eq!(
            PluginParams::with_template(" {handle} ").template(),
            Some("{handle}")
        );
    }

    #[test]
    fn test_plugin_params_rejects_wrong_type() {
        assert!(PluginParams::from_json(json!({"templateString": 42})).is_err());
    }
}
