//! Plot Viewer Library
//!
//! Loads a CSV manifest of pre-generated plots, narrows it through a
//! cascade of date, status and shuttle filters, and resolves every
//! surviving row to the URL of its plot for display.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};
