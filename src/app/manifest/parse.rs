//! Manifest CSV parsing
//!
//! The manifest is a comma-delimited file with a header row. Column names
//! are matched case-insensitively and extra columns are ignored. A missing
//! required column or a malformed row fails the whole parse: a table is
//! either complete or not produced at all.

use std::io::Read;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::app::models::{ManifestRecord, ManifestTable};
use crate::constants::manifest::REQUIRED_COLUMNS;
use crate::errors::{SourceError, SourceResult};

/// Parse a manifest from any reader
///
/// # Errors
///
/// Returns `SourceError::MissingColumns` if the header lacks a required
/// column and `SourceError::Csv` if a row cannot be decoded.
pub fn parse_manifest<R: Read>(input: R) -> SourceResult<ManifestTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(input);

    let headers = normalize_headers(reader.headers()?);
    check_required_columns(&headers)?;
    reader.set_headers(headers);

    let mut records = Vec::new();
    for result in reader.deserialize::<ManifestRecord>() {
        records.push(result?);
    }

    debug!("Parsed {} manifest rows", records.len());
    Ok(ManifestTable::from_records(records))
}

/// Parse a manifest held in memory
pub fn parse_manifest_str(body: &str) -> SourceResult<ManifestTable> {
    parse_manifest(body.as_bytes())
}

fn normalize_headers(headers: &StringRecord) -> StringRecord {
    headers
        .iter()
        .map(|header| header.trim().to_ascii_lowercase())
        .collect()
}

fn check_required_columns(headers: &StringRecord) -> SourceResult<()> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|header| header == **column))
        .map(|column| column.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SourceError::MissingColumns { missing })
    }
}
