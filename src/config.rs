//! Provider configuration block.
//!
//! Values come from the `provider "vpsie" {}` block first and fall back to
//! the environment:
//!
//! | Attribute         | Environment          |
//! |-------------------|----------------------|
//! | `access_token`    | `VPSIE_ACCESS_TOKEN` |
//! | `endpoint`        | `VPSIE_ENDPOINT`     |
//! | `timeout_seconds` | none                 |

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::client::{ClientConfig, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
use crate::error::ProviderError;
use crate::schema::{Attribute, AttributeFlags, AttributeType, Diagnostic, Schema};

/// Environment variable holding the API access token.
pub const ACCESS_TOKEN_ENV: &str = "VPSIE_ACCESS_TOKEN";

/// Environment variable overriding the API base URL.
pub const ENDPOINT_ENV: &str = "VPSIE_ENDPOINT";

/// Schema of the provider configuration block.
pub fn schema() -> Schema {
    Schema::v0()
        .with_description("Settings for the VPSie API.")
        .with_attribute(
            "access_token",
            Attribute::optional_string()
                .sensitive()
                .with_description(format!("API access token. Defaults to ${}.", ACCESS_TOKEN_ENV)),
        )
        .with_attribute(
            "endpoint",
            Attribute::optional_string().with_description(format!(
                "API base URL. Defaults to ${} or {}.",
                ENDPOINT_ENV, DEFAULT_ENDPOINT
            )),
        )
        .with_attribute(
            "timeout_seconds",
            Attribute::new(AttributeType::Int64, AttributeFlags::optional())
                .with_description("Per-request timeout in seconds. Defaults to 60."),
        )
}

/// The decoded provider block.
#[derive(Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// API access token.
    pub access_token: Option<String>,
    /// API base URL.
    pub endpoint: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_seconds: Option<i64>,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("access_token", &self.access_token.as_ref().map(|_| "(sensitive value)"))
            .field("endpoint", &self.endpoint)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl ProviderConfig {
    /// Decode the provider block. A null block is an empty configuration.
    pub fn from_value(value: Value) -> Result<Self, ProviderError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Fill unset or blank values from `lookup`, which maps an environment
    /// variable name to its value.
    pub fn with_env_fallbacks<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_env = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        if is_blank(&self.access_token) {
            self.access_token = from_env(ACCESS_TOKEN_ENV);
        }
        if is_blank(&self.endpoint) {
            self.endpoint = from_env(ENDPOINT_ENV);
        }
        self
    }

    /// Check values that the schema alone cannot.
    pub fn validate(&self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        if let Some(timeout) = self.timeout_seconds {
            if timeout <= 0 {
                diagnostics.push(
                    Diagnostic::error("Invalid timeout")
                        .with_detail(format!("timeout_seconds must be positive, got {}", timeout))
                        .with_attribute("timeout_seconds"),
                );
            }
        }

        if let Some(endpoint) = self.endpoint.as_deref().filter(|e| !e.is_empty()) {
            if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
                diagnostics.push(
                    Diagnostic::error("Invalid endpoint")
                        .with_detail(format!("endpoint must be an http(s) URL, got {:?}", endpoint))
                        .with_attribute("endpoint"),
                );
            }
        }

        diagnostics
    }

    /// Build client settings. Fails when no access token is available.
    pub fn client_config(&self) -> Result<ClientConfig, Diagnostic> {
        let token = self
            .access_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                Diagnostic::error("Missing VPSie access token")
                    .with_detail(format!(
                        "Set access_token in the provider block or the {} environment variable.",
                        ACCESS_TOKEN_ENV
                    ))
                    .with_attribute("access_token")
            })?;

        let mut config = ClientConfig::new(token);
        if let Some(endpoint) = self.endpoint.as_deref().filter(|e| !e.is_empty()) {
            config = config.with_endpoint(endpoint);
        }
        config = config.with_timeout(self.timeout());
        Ok(config)
    }

    fn timeout(&self) -> Duration {
        match self.timeout_seconds {
            Some(secs) if secs > 0 => Duration::from_secs(secs as u64),
            _ => DEFAULT_TIMEOUT,
        }
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map(str::trim).unwrap_or_default().is_empty()
}
