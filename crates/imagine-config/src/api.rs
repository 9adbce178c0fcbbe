//! Backend API endpoint configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_base_url() -> String {
    "http://localhost:8000/api/v1".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    "imagine-cli/0.1".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// REST base URL, including the version prefix.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// WebSocket base URL. Empty means derive `ws(s)://<host>/ws` from `base_url`.
    #[serde(default)]
    pub ws_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            ws_url: String::new(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl ApiConfig {
    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Check the values can be turned into working HTTP and WebSocket clients.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] for a blank `base_url` or
    /// `user_agent`, and [`ConfigError::InvalidValue`] for a non-http(s)
    /// `base_url`, a non-ws(s) `ws_url`, a zero timeout, or a `user_agent`
    /// with control characters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.base_url.trim();
        if base.is_empty() {
            return Err(ConfigError::Missing {
                field: "api.base_url",
                env: "IMAGINE_API__BASE_URL",
            });
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "api.base_url".into(),
                reason: format!("'{base}' must start with http:// or https://"),
            });
        }

        let ws = self.ws_url.trim();
        if !ws.is_empty() && !(ws.starts_with("ws://") || ws.starts_with("wss://")) {
            return Err(ConfigError::InvalidValue {
                field: "api.ws_url".into(),
                reason: format!("'{ws}' must start with ws:// or wss://"),
            });
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "api.timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }

        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::Missing {
                field: "api.user_agent",
                env: "IMAGINE_API__USER_AGENT",
            });
        }
        // Sent verbatim as the User-Agent header.
        if self.user_agent.chars().any(|c| c != '\t' && c.is_control()) {
            return Err(ConfigError::InvalidValue {
                field: "api.user_agent".into(),
                reason: "must not contain control characters".into(),
            });
        }

        Ok(())
    }
}
