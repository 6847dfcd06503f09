//! Command-line argument parsing for Plot Viewer
//!
//! This module defines the CLI structure using clap derive macros:
//! one-shot views, option listing, an interactive browser, manifest
//! statistics and configuration management.

use std::collections::BTreeSet;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::app::models::SelectionRequest;

/// Plot Viewer - browse pre-generated NVH plots through manifest filters
#[derive(Parser, Debug)]
#[command(
    name = "plot_viewer",
    version,
    about = "Browse pre-generated plots described by a CSV manifest",
    long_about = "Loads a manifest of published plots, narrows it by date, status and shuttle,
and shows where each matching plot lives. Output can be plain text, a self-contained
HTML page embedding every plot, or JSON."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Manifest location (URL or local file), overriding the configured one
    #[arg(long, global = true, value_name = "PATH_OR_URL")]
    pub manifest: Option<String>,

    /// Base URL the plots are resolved against
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the plots matching a selection
    View(ViewArgs),

    /// List the filter options offered for a date
    Options(OptionsArgs),

    /// Interactive filter loop
    Browse,

    /// Inspect the manifest
    Manifest(ManifestArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Filter values shared by `view` and `options`
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Date to show (defaults to the most recent one)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Allowed status1 values (repeatable)
    #[arg(long = "status1", value_name = "VALUE")]
    pub status1: Vec<String>,

    /// Allowed status2 values (repeatable)
    #[arg(long = "status2", value_name = "VALUE")]
    pub status2: Vec<String>,

    /// Allowed shuttle values (repeatable)
    #[arg(long, value_name = "VALUE")]
    pub shuttle: Vec<String>,
}

impl SelectionArgs {
    /// Convert into a selection request
    pub fn to_request(&self) -> SelectionRequest {
        fn set(values: &[String]) -> BTreeSet<String> {
            values
                .iter()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .collect()
        }

        SelectionRequest {
            date: self.date.clone().filter(|date| !date.trim().is_empty()),
            status1: set(&self.status1),
            status2: set(&self.status2),
            shuttle: set(&self.shuttle),
        }
    }
}

/// Output format for `view`
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text
    #[default]
    Text,
    /// Self-contained HTML page
    Html,
    /// JSON document
    Json,
}

/// Arguments for the view command
#[derive(Args, Debug, Clone, Default)]
pub struct ViewArgs {
    /// Filter values
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for the options command
#[derive(Args, Debug, Clone, Default)]
pub struct OptionsArgs {
    /// Date whose options are listed (defaults to the most recent one)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for manifest inspection
#[derive(Args, Debug)]
pub struct ManifestArgs {
    #[command(subcommand)]
    pub action: ManifestAction,
}

/// Manifest actions
#[derive(Subcommand, Debug)]
pub enum ManifestAction {
    /// Show manifest information and statistics
    Info,
}

/// Arguments for configuration management
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the logging level from the flags, if any was given
    pub fn requested_log_level(&self) -> Option<tracing::Level> {
        if self.global.quiet {
            Some(tracing::Level::ERROR)
        } else if self.global.very_verbose {
            Some(tracing::Level::DEBUG)
        } else if self.global.verbose {
            Some(tracing::Level::INFO)
        } else {
            None
        }
    }

    /// Get the logging level based on global arguments
    pub fn log_level(&self) -> tracing::Level {
        self.requested_log_level().unwrap_or(tracing::Level::WARN)
    }
}
