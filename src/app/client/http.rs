//! Core HTTP operations
//!
//! A single GET per manifest load. There is no retry or backoff: a failed
//! request surfaces immediately and the user decides when to reload.

use reqwest::Client;
use url::Url;

use crate::errors::{SourceError, SourceResult};

/// HTTP operations handler
#[derive(Debug, Clone)]
pub struct HttpHandler {
    client: Client,
}

impl HttpHandler {
    /// Creates a new HttpHandler around the given client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetches a successful HTTP response
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Http` if the request fails and
    /// `SourceError::Status` if the server answers with a non-success status.
    pub async fn get_response(&self, url: &Url) -> SourceResult<reqwest::Response> {
        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Request to {} returned HTTP {}", url, status);
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        tracing::debug!("Successfully fetched response: {}", url);
        Ok(response)
    }

    /// Fetches the body of a resource as text
    ///
    /// # Errors
    ///
    /// Returns `SourceError` if the request fails or the body cannot be read
    pub async fn get_text(&self, url: &Url) -> SourceResult<String> {
        let response = self.get_response(url).await?;
        let text = response.text().await?;
        tracing::debug!("Read {} bytes from {}", text.len(), url);
        Ok(text)
    }
}
