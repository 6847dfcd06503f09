//! Core types for manifest loading
//!
//! This module contains the location a manifest is read from, the outcome
//! handed to callers once source errors have been converted, and summary
//! statistics for the `manifest info` command.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use url::Url;

use crate::app::models::{ManifestField, ManifestTable};
use crate::app::filter::FilterPipeline;
use crate::errors::{SourceError, SourceResult};

/// Where the manifest is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestLocation {
    /// Served over HTTP(S)
    Remote(Url),
    /// Read from the local file system
    Local(PathBuf),
}

impl ManifestLocation {
    /// Interpret a user-supplied location
    ///
    /// Values starting with `http://` or `https://` are remote; anything
    /// else is treated as a local path.
    pub fn parse(value: &str) -> SourceResult<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Err(SourceError::InvalidLocation {
                location: value.to_string(),
            });
        }

        let lower = value.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            let url = Url::parse(value).map_err(|_| SourceError::InvalidLocation {
                location: value.to_string(),
            })?;
            Ok(Self::Remote(url))
        } else {
            Ok(Self::Local(PathBuf::from(value)))
        }
    }

    /// Whether this location needs the network
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

impl std::fmt::Display for ManifestLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote(url) => write!(f, "{}", url),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Outcome of a boundary-converted load
///
/// A failed load is represented by an empty table plus a diagnostic meant
/// for the user; it is never an unhandled error.
#[derive(Debug, Clone)]
pub struct ManifestLoad {
    /// Loaded table (empty on failure)
    pub table: Arc<ManifestTable>,
    /// User-visible explanation when the load failed
    pub diagnostic: Option<String>,
}

impl ManifestLoad {
    /// Whether the load failed
    pub fn is_failed(&self) -> bool {
        self.diagnostic.is_some()
    }
}

/// Statistics about a loaded manifest
#[derive(Debug, Clone, Default, Serialize)]
pub struct ManifestStats {
    /// Total rows
    pub rows: usize,
    /// Distinct dates, most recent first
    pub dates: Vec<String>,
    /// Distinct status1 values
    pub status1_values: usize,
    /// Distinct status2 values
    pub status2_values: usize,
    /// Distinct shuttle values
    pub shuttle_values: usize,
    /// Rows whose filename is empty
    pub empty_filenames: usize,
    /// When the manifest was fetched
    pub loaded_at: Option<DateTime<Utc>>,
}

impl ManifestStats {
    /// Summarize a table
    pub fn from_table(table: &ManifestTable, loaded_at: Option<DateTime<Utc>>) -> Self {
        Self {
            rows: table.len(),
            dates: FilterPipeline::available_dates(table),
            status1_values: table.distinct(ManifestField::Status1).len(),
            status2_values: table.distinct(ManifestField::Status2).len(),
            shuttle_values: table.distinct(ManifestField::Shuttle).len(),
            empty_filenames: table
                .iter()
                .filter(|record| record.filename.trim().is_empty())
                .count(),
            loaded_at,
        }
    }

    /// Most recent date, if any
    pub fn latest_date(&self) -> Option<&String> {
        self.dates.first()
    }

    /// Earliest date, if any
    pub fn earliest_date(&self) -> Option<&String> {
        self.dates.last()
    }

    /// Format the date range (e.g. "250901-250925", or a single date)
    pub fn date_range(&self) -> String {
        match (self.earliest_date(), self.latest_date()) {
            (Some(earliest), Some(latest)) if earliest == latest => earliest.clone(),
            (Some(earliest), Some(latest)) => format!("{}-{}", earliest, latest),
            _ => "N/A".to_string(),
        }
    }
}
