//! Client configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default server address for a local deployment.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Connection settings for [`HttpTransport`](crate::HttpTransport).
///
/// Resolved once at startup; the transport never reads the environment
/// while serving requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Scheme, host and port. Paths are appended verbatim.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Value of the `session` cookie for an authenticated user.
    pub session_cookie: Option<String>,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            session_cookie: None,
            user_agent: format!("healthcard/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Joins `path` onto the base URL.
    pub fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_server() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.session_cookie.is_none());
    }

    #[test]
    fn url_joins_without_double_slash() {
        let config = ClientConfig::default().with_base_url("http://host:1/");
        assert_eq!(config.url("/api/allergies"), "http://host:1/api/allergies");
        assert_eq!(config.url("api/allergies"), "http://host:1/api/allergies");
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"base_url": "http://x", "timeout_secs": 5}"#).unwrap();
        assert_eq!(config.base_url, "http://x");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.user_agent, ClientConfig::default().user_agent);
    }
}
