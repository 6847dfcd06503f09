//! Error types for Plot Viewer
//!
//! This module defines the error types for every component of the viewer.
//! Manifest failures are recovered at the source boundary (empty table plus
//! diagnostic), invalid records are skipped row by row, and only
//! configuration and output failures ever reach the process exit path.

use std::path::PathBuf;
use thiserror::Error;

/// Manifest fetch and parse errors
///
/// Every variant belongs to the "source unavailable" class: the manifest
/// could not be fetched, or it was fetched but does not have the expected
/// schema.
#[derive(Error, Debug)]
pub enum SourceError {
    /// HTTP request failed before a response was received
    #[error("HTTP request for manifest failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Manifest request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Local manifest file could not be read
    #[error("Could not read manifest file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV body could not be decoded
    #[error("Malformed manifest CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Header row lacks one or more required columns
    #[error("Manifest is missing required column(s): {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    /// Manifest location could not be interpreted
    #[error("Invalid manifest location: {location}")]
    InvalidLocation { location: String },
}

/// Record resolution errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Row has no filename
    #[error("Manifest row {row} has an empty filename")]
    EmptyFilename { row: usize },

    /// Filename would produce a malformed artifact location
    #[error("Manifest row {row} has an invalid filename '{filename}': {reason}")]
    InvalidFilename {
        row: usize,
        filename: String,
        reason: String,
    },

    /// Configured base location is not a usable URL
    #[error("Invalid resource base '{base}': {reason}")]
    InvalidBase { base: String, reason: String },
}

/// Output errors raised by presenters
#[derive(Error, Debug)]
pub enum RenderError {
    /// Writing to the output failed
    #[error("Failed to write output")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed
    #[error("Failed to serialize resources as JSON")]
    Json(#[from] serde_json::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Invalid configuration format
    #[error("Invalid configuration format in {path}: {source}")]
    InvalidFormat {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// File I/O error while reading or writing configuration
    #[error("Configuration file I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No per-user configuration directory on this platform
    #[error("Could not determine user config directory")]
    NoConfigDir,
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Manifest source error
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Record resolution error
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Rendering error
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Check if the error can be cleared by reloading the session
    ///
    /// Source failures are never retried automatically, but a user-triggered
    /// reload may succeed once the remote store is reachable again.
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Source(SourceError::Http(_))
            | AppError::Source(SourceError::Status { .. })
            | AppError::Source(SourceError::Io { .. }) => true,

            AppError::Source(SourceError::Csv(_))
            | AppError::Source(SourceError::MissingColumns { .. })
            | AppError::Source(SourceError::InvalidLocation { .. })
            | AppError::Resolve(_)
            | AppError::Config(_) => false,

            _ => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Source(_) => "source",
            AppError::Resolve(_) => "resolve",
            AppError::Render(_) => "render",
            AppError::Config(_) => "config",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Manifest source result type alias
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Resolution result type alias
pub type ResolveResult<T> = std::result::Result<T, ResolveError>;

/// Rendering result type alias
pub type RenderResult<T> = std::result::Result<T, RenderError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
