//! HTTP client configuration and building logic
//!
//! This module handles the configuration and construction of the HTTP
//! client used to read the manifest from the remote store.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::constants::http;
use crate::errors::{SourceError, SourceResult};

/// Configuration for the HTTP client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Request timeout
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Connect timeout
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
    /// TCP keep-alive interval (None = disabled)
    #[serde(with = "humantime_serde")]
    pub tcp_keepalive: Option<Duration>,
    /// Connection pool idle timeout (None = no timeout)
    #[serde(with = "humantime_serde")]
    pub pool_idle_timeout: Option<Duration>,
    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: http::DEFAULT_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            tcp_keepalive: Some(http::TCP_KEEPALIVE),
            pool_idle_timeout: Some(http::POOL_IDLE_TIMEOUT),
            user_agent: http::USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Builds the HTTP client with the specified configuration
    pub fn build_http_client(&self) -> SourceResult<Client> {
        let mut client_builder = Client::builder()
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(self.user_agent.as_str());

        // Configure TCP keep-alive if specified
        if let Some(keepalive) = self.tcp_keepalive {
            client_builder = client_builder.tcp_keepalive(keepalive);
        }

        // Configure connection pool idle timeout
        if let Some(idle_timeout) = self.pool_idle_timeout {
            client_builder = client_builder.pool_idle_timeout(idle_timeout);
        }

        client_builder.build().map_err(SourceError::Http)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.request_timeout, http::DEFAULT_TIMEOUT);
        assert_eq!(config.user_agent, http::USER_AGENT);
        assert!(config.tcp_keepalive.is_some());
    }

    #[test]
    fn test_http_client_creation() {
        let config = ClientConfig::default();
        assert!(config.build_http_client().is_ok());
    }

    #[test]
    fn test_http_client_without_optional_settings() {
        let config = ClientConfig {
            tcp_keepalive: None,
            pool_idle_timeout: None,
            request_timeout: Duration::from_secs(5),
            ..Default::default()
        };
        assert!(config.build_http_client().is_ok());
    }

    #[test]
    fn test_humantime_deserialization() {
        let config: ClientConfig = toml::from_str(
            r#"
request_timeout = "15s"
connect_timeout = "2s 500ms"
"#,
        )
        .unwrap();

        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert_eq!(config.connect_timeout, Duration::from_millis(2500));
        assert_eq!(config.user_agent, http::USER_AGENT);
    }
}
