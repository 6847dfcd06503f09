//! HTTP client for the remote artifact store
//!
//! The store is a read-only HTTP resource: the viewer only ever reads the
//! manifest from it. Artifacts themselves are embedded by URL and fetched by
//! whatever displays them.
//!
//! The module is organized into:
//! - `config`: HTTP client configuration and building
//! - `http`: request execution and status handling

use url::Url;

use crate::errors::SourceResult;

// Module declarations
pub mod config;
pub mod http;

pub use config::ClientConfig;

use http::HttpHandler;

/// Read-only client for the artifact store
#[derive(Debug, Clone)]
pub struct StoreClient {
    http_handler: HttpHandler,
}

impl StoreClient {
    /// Creates a client with default configuration
    ///
    /// # Errors
    ///
    /// Returns `SourceError` if HTTP client creation fails
    pub fn new() -> SourceResult<Self> {
        Self::with_config(&ClientConfig::default())
    }

    /// Creates a client with custom configuration
    ///
    /// # Errors
    ///
    /// Returns `SourceError` if HTTP client creation fails
    pub fn with_config(config: &ClientConfig) -> SourceResult<Self> {
        let client = config.build_http_client()?;
        tracing::debug!("Created store client (user agent: {})", config.user_agent);

        Ok(Self {
            http_handler: HttpHandler::new(client),
        })
    }

    /// Fetches a text resource
    ///
    /// # Errors
    ///
    /// Returns `SourceError` if the request fails or returns a non-success status
    pub async fn get_text(&self, url: &Url) -> SourceResult<String> {
        self.http_handler.get_text(url).await
    }
}
