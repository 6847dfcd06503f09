//! Artifact location resolution
//!
//! All URL construction goes through [`ResourceBase::join`]. Configuration
//! values are split on `/` and empty pieces dropped before they become path
//! segments, so a base with or without trailing separators, or a prefix
//! with leading ones, always yields exactly one separator between segments.

use tracing::{debug, warn};
use url::Url;

use crate::app::models::{ManifestRecord, ManifestTable, ResolvedResource};
use crate::errors::{ResolveError, ResolveResult};

/// Normalized base location for manifest and artifact URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceBase {
    url: Url,
}

impl ResourceBase {
    /// Parse a complete base URL (e.g. "https://host/owner/repo/main")
    pub fn parse(base: &str) -> ResolveResult<Self> {
        let mut url = Url::parse(base.trim()).map_err(|e| ResolveError::InvalidBase {
            base: base.to_string(),
            reason: e.to_string(),
        })?;

        if url.cannot_be_a_base() {
            return Err(ResolveError::InvalidBase {
                base: base.to_string(),
                reason: "URL cannot carry a path".to_string(),
            });
        }

        let segments: Vec<String> = url
            .path_segments()
            .map(|parts| {
                parts
                    .filter(|part| !part.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        url.set_path(&format!("/{}", segments.join("/")));
        url.set_query(None);
        url.set_fragment(None);

        Ok(Self { url })
    }

    /// Compose a base from an origin and raw path parts
    ///
    /// Each part may itself contain `/`; every piece becomes one segment.
    pub fn from_parts<I, S>(origin: &str, parts: I) -> ResolveResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let base = Self::parse(origin)?;
        let url = base.extend(origin, parts)?;
        Ok(Self { url })
    }

    /// Join path parts onto the base
    pub fn join<I, S>(&self, parts: I) -> ResolveResult<Url>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extend(self.url.as_str(), parts)
    }

    /// The normalized base URL
    pub fn as_url(&self) -> &Url {
        &self.url
    }

    fn extend<I, S>(&self, label: &str, parts: I) -> ResolveResult<Url>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut url = self.url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| ResolveError::InvalidBase {
                base: label.to_string(),
                reason: "URL cannot carry a path".to_string(),
            })?;
            path.pop_if_empty();
            for part in parts {
                path.extend(split_segments(part.as_ref()));
            }
        }
        Ok(url)
    }
}

impl std::fmt::Display for ResourceBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url)
    }
}

fn split_segments(value: &str) -> impl Iterator<Item = &str> {
    value.split('/').filter(|piece| !piece.is_empty())
}

/// Rows resolved for one render pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Resources in table order
    pub resources: Vec<ResolvedResource>,
    /// Rows skipped because their filename was unusable
    pub skipped: Vec<ResolveError>,
}

/// Maps manifest rows to artifact locations
#[derive(Debug, Clone)]
pub struct ResourceResolver {
    base: ResourceBase,
    artifacts_dir: Vec<String>,
}

impl ResourceResolver {
    /// Create a resolver for artifacts stored under `artifacts_dir` below `base`
    pub fn new(base: ResourceBase, artifacts_dir: &str) -> Self {
        Self {
            base,
            artifacts_dir: split_segments(artifacts_dir).map(str::to_string).collect(),
        }
    }

    /// The base location artifacts are resolved against
    pub fn base(&self) -> &ResourceBase {
        &self.base
    }

    /// Resolve a single record
    ///
    /// # Errors
    ///
    /// Returns `ResolveError` if the filename is empty or would produce a
    /// malformed location.
    pub fn resolve(&self, record: &ManifestRecord) -> ResolveResult<ResolvedResource> {
        validate_filename(record.row, &record.filename)?;

        let url = self
            .base
            .join(self.artifacts_dir.iter().map(String::as_str).chain([record.filename.as_str()]))?;

        Ok(ResolvedResource {
            label: record.label(),
            url,
            row: record.row,
            date: record.date.clone(),
        })
    }

    /// Resolve every row, skipping invalid ones with a diagnostic
    pub fn resolve_all(&self, table: &ManifestTable) -> Resolution {
        let mut resolution = Resolution::default();

        for record in table {
            match self.resolve(record) {
                Ok(resource) => {
                    debug!("Resolved row {} to {}", record.row, resource.url);
                    resolution.resources.push(resource);
                }
                Err(e) => {
                    warn!("Skipping manifest row: {}", e);
                    resolution.skipped.push(e);
                }
            }
        }

        resolution
    }
}

/// Check that a filename is a clean relative path
fn validate_filename(row: usize, filename: &str) -> ResolveResult<()> {
    let invalid = |reason: &str| ResolveError::InvalidFilename {
        row,
        filename: filename.to_string(),
        reason: reason.to_string(),
    };

    if filename.trim().is_empty() {
        return Err(ResolveError::EmptyFilename { row });
    }
    if filename.starts_with('/') {
        return Err(invalid("absolute paths are not allowed"));
    }
    if filename.contains('\\') {
        return Err(invalid("backslashes are not allowed"));
    }
    if filename.chars().any(char::is_control) {
        return Err(invalid("control characters are not allowed"));
    }

    for segment in filename.split('/') {
        match segment {
            "" => return Err(invalid("empty path segment")),
            "." | ".." => return Err(invalid("relative path segments are not allowed")),
            _ => {}
        }
    }

    Ok(())
}
