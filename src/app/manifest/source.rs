//! Memoized manifest loading
//!
//! A [`ManifestSource`] fetches and parses the manifest at most once per
//! session. The cached table is shared read-only through an `Arc` and is
//! only dropped by an explicit [`ManifestSource::invalidate`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

use super::parse::parse_manifest_str;
use super::types::{ManifestLoad, ManifestLocation, ManifestStats};
use crate::app::client::{ClientConfig, StoreClient};
use crate::app::models::ManifestTable;
use crate::errors::{SourceError, SourceResult};

/// Fetches the manifest table from its configured location
#[derive(Debug)]
pub struct ManifestSource {
    location: ManifestLocation,
    client_config: ClientConfig,
    client: Option<StoreClient>,
    cached: Option<Arc<ManifestTable>>,
    loaded_at: Option<DateTime<Utc>>,
    fetch_count: usize,
}

impl ManifestSource {
    /// Create a source with default client settings
    pub fn new(location: ManifestLocation) -> Self {
        Self::with_client_config(location, ClientConfig::default())
    }

    /// Create a source with custom client settings
    pub fn with_client_config(location: ManifestLocation, client_config: ClientConfig) -> Self {
        Self {
            location,
            client_config,
            client: None,
            cached: None,
            loaded_at: None,
            fetch_count: 0,
        }
    }

    /// Where the manifest is read from
    pub fn location(&self) -> &ManifestLocation {
        &self.location
    }

    /// Whether a table is memoized
    pub fn is_loaded(&self) -> bool {
        self.cached.is_some()
    }

    /// Number of real fetches performed since creation
    pub fn fetch_count(&self) -> usize {
        self.fetch_count
    }

    /// When the memoized table was fetched
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    /// Load the manifest, fetching only if nothing is memoized
    ///
    /// # Errors
    ///
    /// Returns `SourceError` if the manifest cannot be fetched or parsed.
    /// Failures are not memoized.
    pub async fn load(&mut self) -> SourceResult<Arc<ManifestTable>> {
        if let Some(table) = &self.cached {
            debug!("Using memoized manifest from {}", self.location);
            return Ok(Arc::clone(table));
        }

        info!("Loading manifest from {}", self.location);
        self.fetch_count += 1;

        let body = self.fetch_body().await?;
        let table = Arc::new(parse_manifest_str(&body)?);

        info!("Loaded {} manifest rows from {}", table.len(), self.location);
        self.cached = Some(Arc::clone(&table));
        self.loaded_at = Some(Utc::now());

        Ok(table)
    }

    /// Load the manifest, converting any failure into an empty table and a diagnostic
    pub async fn load_or_empty(&mut self) -> ManifestLoad {
        match self.load().await {
            Ok(table) => ManifestLoad {
                table,
                diagnostic: None,
            },
            Err(e) => {
                error!("Could not load manifest from {}: {}", self.location, e);
                ManifestLoad {
                    table: Arc::new(ManifestTable::empty()),
                    diagnostic: Some(format!(
                        "Could not load manifest file from {}. Please check the configured owner, repository and path. ({})",
                        self.location, e
                    )),
                }
            }
        }
    }

    /// Statistics for the memoized table
    pub fn stats(&self) -> Option<ManifestStats> {
        self.cached
            .as_ref()
            .map(|table| ManifestStats::from_table(table, self.loaded_at))
    }

    /// Drop the memoized table so the next load fetches again
    pub fn invalidate(&mut self) {
        if self.cached.take().is_some() {
            debug!("Invalidated memoized manifest from {}", self.location);
        }
        self.loaded_at = None;
    }

    async fn fetch_body(&mut self) -> SourceResult<String> {
        match self.location.clone() {
            ManifestLocation::Remote(url) => {
                let client = match self.client.take() {
                    Some(client) => client,
                    None => StoreClient::with_config(&self.client_config)?,
                };
                let body = client.get_text(&url).await;
                self.client = Some(client);
                body
            }
            ManifestLocation::Local(path) => tokio::fs::read_to_string(&path)
                .await
                .map_err(|source| SourceError::Io { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::NamedTempFile;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use url::Url;

    const MANIFEST: &str = "date,status1,status2,shuttle,filename\n\
                            250925,A,X,1,p1.html\n\
                            250925,B,Y,2,p2.html\n\
                            250924,A,X,1,p3.html\n";

    fn create_test_manifest(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn local_source(file: &NamedTempFile) -> ManifestSource {
        ManifestSource::new(ManifestLocation::Local(file.path().to_path_buf()))
    }

    #[tokio::test]
    async fn test_load_is_memoized() {
        let file = create_test_manifest(MANIFEST);
        let mut source = local_source(&file);

        let first = source.load().await.unwrap();
        let second = source.load().await.unwrap();

        assert_eq!(first.len(), 3);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.fetch_count(), 1);
        assert!(source.loaded_at().is_some());
    }

    #[tokio::test]
    async fn test_memoized_table_survives_file_changes_until_invalidated() {
        let file = create_test_manifest(MANIFEST);
        let mut source = local_source(&file);
        source.load().await.unwrap();

        std::fs::write(
            file.path(),
            "date,status1,status2,shuttle,filename\n250101,A,X,1,p9.html\n",
        )
        .unwrap();
        assert_eq!(source.load().await.unwrap().len(), 3);

        source.invalidate();
        assert!(!source.is_loaded());
        let reloaded = source.load().await.unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(source.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let mut source = ManifestSource::new(ManifestLocation::Local(
            "/nonexistent/plot-viewer/manifest.csv".into(),
        ));
        assert!(matches!(source.load().await, Err(SourceError::Io { .. })));
        assert!(!source.is_loaded());
    }

    #[tokio::test]
    async fn test_load_or_empty_converts_missing_column() {
        let file = create_test_manifest("date,status1,status2,filename\n250925,A,X,p1.html\n");
        let mut source = local_source(&file);

        let load = source.load_or_empty().await;
        assert!(load.is_failed());
        assert!(load.table.is_empty());
        let diagnostic = load.diagnostic.unwrap();
        assert!(diagnostic.contains("Could not load manifest file"));
        assert!(diagnostic.contains("shuttle"));
    }

    #[tokio::test]
    async fn test_stats_available_after_load() {
        let file = create_test_manifest(MANIFEST);
        let mut source = local_source(&file);
        assert!(source.stats().is_none());

        source.load().await.unwrap();
        let stats = source.stats().unwrap();
        assert_eq!(stats.rows, 3);
        assert_eq!(stats.latest_date().map(String::as_str), Some("250925"));
    }

    /// Serve one canned HTTP response per connection on a loopback port
    async fn serve(status: &'static str, body: &'static str) -> (Url, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);

                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: text/csv\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        let url = Url::parse(&format!("http://{}/plot_outputs/manifest.csv", addr)).unwrap();
        (url, hits)
    }

    #[tokio::test]
    async fn test_remote_load_is_parsed_and_memoized() {
        let (url, hits) = serve("200 OK", MANIFEST).await;
        let mut source = ManifestSource::new(ManifestLocation::Remote(url));

        let first = source.load().await.unwrap();
        let second = source.load().await.unwrap();

        assert_eq!(first.len(), 3);
        assert_eq!(first.rows()[1].status1, "B");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.fetch_count(), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_remote_not_found_is_status_error() {
        let (url, _) = serve("404 Not Found", "no such manifest").await;
        let mut source = ManifestSource::new(ManifestLocation::Remote(url.clone()));

        match source.load().await {
            Err(SourceError::Status { status, url: failed }) => {
                assert_eq!(status, 404);
                assert_eq!(failed, url.to_string());
            }
            other => panic!("expected status error, got {:?}", other),
        }
        assert!(!source.is_loaded());

        let load = source.load_or_empty().await;
        assert!(load.is_failed());
        assert!(load.table.is_empty());
        assert!(load.diagnostic.unwrap().contains("404"));
    }

    #[tokio::test]
    async fn test_remote_missing_column_yields_empty_table() {
        let (url, _) = serve("200 OK", "date,status1,status2,filename\n250925,A,X,p1.html\n").await;
        let mut source = ManifestSource::new(ManifestLocation::Remote(url));

        let load = source.load_or_empty().await;
        assert!(load.is_failed());
        assert!(load.table.is_empty());
        let diagnostic = load.diagnostic.unwrap();
        assert!(diagnostic.contains("Could not load manifest file"));
        assert!(diagnostic.contains("shuttle"));
    }
}
