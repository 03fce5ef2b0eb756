//! Configuration management for the Gmail tools
//!
//! Handles environment variables and Gmail API constants. Nothing is read
//! from or written to disk; the bearer token arrives with every call.

use std::time::Duration;

use crate::error::{ConfigError, GmailToolsError, Result};

/// Configuration for the Gmail tools
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Gmail REST API (no trailing slash)
    pub api_base_url: String,

    /// Gmail user ID the endpoints are scoped to
    pub user_id: String,

    /// Per-request HTTP timeout
    pub request_timeout: Duration,

    /// Page size used when `maxResults` is absent or zero
    pub default_max_results: u32,
}

impl Config {
    /// Create a configuration from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        let api_base_url = std::env::var("GMAIL_API_BASE_URL")
            .unwrap_or_else(|_| gmail::API_BASE_URL.to_string());

        let user_id = std::env::var("GMAIL_USER_ID").unwrap_or_else(|_| gmail::USER_ID.to_string());

        let request_timeout = match std::env::var("GMAIL_HTTP_TIMEOUT_SECS") {
            Ok(v) => Duration::from_secs(parse_env_number("GMAIL_HTTP_TIMEOUT_SECS", &v)?),
            Err(_) => Duration::from_secs(gmail::DEFAULT_TIMEOUT_SECS),
        };

        let default_max_results = match std::env::var("GMAIL_DEFAULT_MAX_RESULTS") {
            Ok(v) => parse_max_results(&v)?,
            Err(_) => gmail::DEFAULT_MAX_RESULTS,
        };

        Self {
            api_base_url,
            user_id,
            request_timeout,
            default_max_results,
        }
        .validated()
    }

    /// Create a configuration pointing at a different API host (proxies, tests)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self {
            api_base_url: base_url.into(),
            ..Self::default()
        }
        .validated()
    }

    fn validated(mut self) -> Result<Self> {
        self.api_base_url = self.api_base_url.trim_end_matches('/').to_string();

        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://")) {
            return Err(invalid(format!(
                "API base URL must be http(s): {}",
                self.api_base_url
            )));
        }
        if self.user_id.is_empty() {
            return Err(invalid("user ID must not be empty"));
        }
        if self.default_max_results == 0 {
            return Err(invalid("default max results must be positive"));
        }

        Ok(self)
    }

    /// Base URL for messages
    pub fn messages_url(&self) -> String {
        format!("{}/users/{}/messages", self.api_base_url, self.user_id)
    }

    /// Base URL for drafts
    pub fn drafts_url(&self) -> String {
        format!("{}/users/{}/drafts", self.api_base_url, self.user_id)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: gmail::API_BASE_URL.to_string(),
            user_id: gmail::USER_ID.to_string(),
            request_timeout: Duration::from_secs(gmail::DEFAULT_TIMEOUT_SECS),
            default_max_results: gmail::DEFAULT_MAX_RESULTS,
        }
    }
}

fn parse_env_number(var: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(format!("{} must be a non-negative integer, got {:?}", var, value)))
}

fn parse_max_results(value: &str) -> Result<u32> {
    let n = parse_env_number("GMAIL_DEFAULT_MAX_RESULTS", value)?;
    u32::try_from(n).map_err(|_| invalid(format!("GMAIL_DEFAULT_MAX_RESULTS out of range: {}", n)))
}

fn invalid(message: impl Into<String>) -> GmailToolsError {
    GmailToolsError::Config(ConfigError::InvalidConfig {
        message: message.into(),
    })
}

/// Gmail API constants
pub mod gmail {
    /// Base URL for Gmail API
    pub const API_BASE_URL: &str = "https://gmail.googleapis.com/gmail/v1";

    /// User ID for the authenticated user
    pub const USER_ID: &str = "me";

    pub const DEFAULT_MAX_RESULTS: u32 = 10;

    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
}
