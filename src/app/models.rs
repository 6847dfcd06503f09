//! Data models for Plot Viewer
//!
//! This module defines the core data structures used throughout the
//! application: manifest records and tables, the user's filter selection,
//! and the resolved resources handed to the renderer.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::manifest::REQUIRED_COLUMNS;

/// A column of the manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ManifestField {
    /// Measurement date identifier (e.g. "250925")
    Date,
    /// First machine status
    Status1,
    /// Second machine status
    Status2,
    /// Shuttle identifier
    Shuttle,
    /// Relative artifact path
    Filename,
}

impl ManifestField {
    /// All fields in manifest column order
    pub const ALL: [ManifestField; 5] = [
        ManifestField::Date,
        ManifestField::Status1,
        ManifestField::Status2,
        ManifestField::Shuttle,
        ManifestField::Filename,
    ];

    /// Categorical fields filtered after the date, in cascade order
    pub const CATEGORICAL: [ManifestField; 3] = [
        ManifestField::Status1,
        ManifestField::Status2,
        ManifestField::Shuttle,
    ];

    /// Get the CSV column name for this field
    pub fn column(&self) -> &'static str {
        match self {
            Self::Date => REQUIRED_COLUMNS[0],
            Self::Status1 => REQUIRED_COLUMNS[1],
            Self::Status2 => REQUIRED_COLUMNS[2],
            Self::Shuttle => REQUIRED_COLUMNS[3],
            Self::Filename => REQUIRED_COLUMNS[4],
        }
    }

    /// Parse a column name (case-insensitive)
    pub fn from_column(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.column().eq_ignore_ascii_case(name.trim()))
    }
}

impl std::fmt::Display for ManifestField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column())
    }
}

/// One row of the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRecord {
    /// Zero-based position in the loaded manifest (row identity)
    #[serde(skip)]
    pub row: usize,
    /// Date identifier, compared as an opaque string
    pub date: String,
    /// First machine status
    pub status1: String,
    /// Second machine status
    pub status2: String,
    /// Shuttle identifier, kept in its textual form
    pub shuttle: String,
    /// Artifact path relative to the artifacts folder
    pub filename: String,
}

impl ManifestRecord {
    /// Create a record at the given row position
    pub fn new(
        row: usize,
        date: impl Into<String>,
        status1: impl Into<String>,
        status2: impl Into<String>,
        shuttle: impl Into<String>,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            row,
            date: date.into(),
            status1: status1.into(),
            status2: status2.into(),
            shuttle: shuttle.into(),
            filename: filename.into(),
        }
    }

    /// Get the value of a field
    pub fn field(&self, field: ManifestField) -> &str {
        match field {
            ManifestField::Date => &self.date,
            ManifestField::Status1 => &self.status1,
            ManifestField::Status2 => &self.status2,
            ManifestField::Shuttle => &self.shuttle,
            ManifestField::Filename => &self.filename,
        }
    }

    /// Display label (e.g. "A_X on Shuttle 1")
    pub fn label(&self) -> String {
        format!(
            "{}_{} on Shuttle {}",
            self.status1, self.status2, self.shuttle
        )
    }
}

/// An ordered, immutable collection of manifest records
///
/// Tables are never mutated once built; filtering produces new tables whose
/// records keep the row identity they had in the loaded manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestTable {
    rows: Vec<ManifestRecord>,
}

impl ManifestTable {
    /// Create an empty table
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a freshly loaded table, numbering rows by position
    pub fn from_records(records: impl IntoIterator<Item = ManifestRecord>) -> Self {
        let rows = records
            .into_iter()
            .enumerate()
            .map(|(row, mut record)| {
                record.row = row;
                record
            })
            .collect();
        Self { rows }
    }

    /// Derive a new table from the rows matching `predicate`, preserving order and identity
    pub fn select<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&ManifestRecord) -> bool,
    {
        Self {
            rows: self
                .rows
                .iter()
                .filter(|record| predicate(record))
                .cloned()
                .collect(),
        }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows in order
    pub fn rows(&self) -> &[ManifestRecord] {
        &self.rows
    }

    /// Iterate over rows in order
    pub fn iter(&self) -> std::slice::Iter<'_, ManifestRecord> {
        self.rows.iter()
    }

    /// Row identities in order
    pub fn row_ids(&self) -> Vec<usize> {
        self.rows.iter().map(|record| record.row).collect()
    }

    /// Distinct values of a field
    pub fn distinct(&self, field: ManifestField) -> BTreeSet<&str> {
        self.rows.iter().map(|record| record.field(field)).collect()
    }
}

impl<'a> IntoIterator for &'a ManifestTable {
    type Item = &'a ManifestRecord;
    type IntoIter = std::slice::Iter<'a, ManifestRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Order categorical option values
///
/// Values that both parse as integers compare numerically, so shuttle "10"
/// sorts after "9"; anything else compares as plain strings.
pub fn compare_options(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        _ => a.cmp(b),
    }
}

/// The user's current filter choice
///
/// The date is mandatory; an empty set for any categorical field means the
/// field is not restricted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    /// Selected date
    pub date: String,
    /// Allowed status1 values
    pub status1: BTreeSet<String>,
    /// Allowed status2 values
    pub status2: BTreeSet<String>,
    /// Allowed shuttle values
    pub shuttle: BTreeSet<String>,
}

impl FilterSelection {
    /// Create a selection for a date with no other restriction
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            ..Default::default()
        }
    }

    /// Default selection: the most recent date in the table, nothing else selected
    pub fn latest(table: &ManifestTable) -> Option<Self> {
        table
            .distinct(ManifestField::Date)
            .into_iter()
            .next_back()
            .map(Self::new)
    }

    /// Replace the allowed values of a categorical field
    pub fn with<I, S>(mut self, field: ManifestField, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Some(set) = self.values_mut(field) {
            *set = values.into_iter().map(Into::into).collect();
        }
        self
    }

    /// Allowed values of a categorical field (`None` for date and filename)
    pub fn values(&self, field: ManifestField) -> Option<&BTreeSet<String>> {
        match field {
            ManifestField::Status1 => Some(&self.status1),
            ManifestField::Status2 => Some(&self.status2),
            ManifestField::Shuttle => Some(&self.shuttle),
            ManifestField::Date | ManifestField::Filename => None,
        }
    }

    /// Mutable access to the allowed values of a categorical field
    pub fn values_mut(&mut self, field: ManifestField) -> Option<&mut BTreeSet<String>> {
        match field {
            ManifestField::Status1 => Some(&mut self.status1),
            ManifestField::Status2 => Some(&mut self.status2),
            ManifestField::Shuttle => Some(&mut self.shuttle),
            ManifestField::Date | ManifestField::Filename => None,
        }
    }
}

/// A selection as the user expressed it, before the default date is applied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionRequest {
    /// Requested date; `None` means the most recent one
    pub date: Option<String>,
    /// Allowed status1 values
    pub status1: BTreeSet<String>,
    /// Allowed status2 values
    pub status2: BTreeSet<String>,
    /// Allowed shuttle values
    pub shuttle: BTreeSet<String>,
}

impl SelectionRequest {
    /// Resolve against a table, defaulting the date to the most recent one
    ///
    /// Returns `None` only when no date is requested and the table is empty.
    pub fn resolve(&self, table: &ManifestTable) -> Option<FilterSelection> {
        let date = match &self.date {
            Some(date) => date.clone(),
            None => FilterSelection::latest(table)?.date,
        };

        Some(FilterSelection {
            date,
            status1: self.status1.clone(),
            status2: self.status2.clone(),
            shuttle: self.shuttle.clone(),
        })
    }

    /// Mutable access to the allowed values of a categorical field
    pub fn values_mut(&mut self, field: ManifestField) -> Option<&mut BTreeSet<String>> {
        match field {
            ManifestField::Status1 => Some(&mut self.status1),
            ManifestField::Status2 => Some(&mut self.status2),
            ManifestField::Shuttle => Some(&mut self.shuttle),
            ManifestField::Date | ManifestField::Filename => None,
        }
    }
}

/// A display label and fetchable location derived from one manifest row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedResource {
    /// Human-readable label
    pub label: String,
    /// Artifact location
    pub url: Url,
    /// Row identity of the source record
    pub row: usize,
    /// Date of the source record
    pub date: String,
}
