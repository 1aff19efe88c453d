//! Client connection settings

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default API root of a local development backend
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";
/// Path that exchanges username/password for a token pair
pub const DEFAULT_TOKEN_PATH: &str = "/token/";
/// Path that exchanges a refresh token for a new access token
pub const DEFAULT_REFRESH_PATH: &str = "/token/refresh/";

/// Settings for building an [`ApiClient`](super::ApiClient)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API root that every relative path is appended to
    pub base_url: String,
    /// Login endpoint, relative to `base_url`
    pub token_path: String,
    /// Refresh endpoint, relative to `base_url`
    pub refresh_path: String,
    /// Request timeout in seconds (0 disables the timeout)
    pub timeout_secs: u64,
    /// User agent override
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token_path: DEFAULT_TOKEN_PATH.to_string(),
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
            timeout_secs: 30,
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// Configured timeout, if any
    pub const fn timeout(&self) -> Option<Duration> {
        if self.timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.timeout_secs))
        }
    }
}
