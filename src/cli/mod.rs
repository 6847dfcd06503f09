//! Command-line interface components
//!
//! This module contains CLI-specific code for the Plot Viewer application,
//! including argument parsing, command handlers and the interactive browser.

pub mod args;
pub mod browse;
pub mod commands;

pub use args::{
    Cli, Commands, ConfigAction, ConfigArgs, GlobalArgs, ManifestAction, ManifestArgs,
    OptionsArgs, OutputFormat, SelectionArgs, ViewArgs,
};
pub use browse::{parse_command, run_browse, BrowseCommand};
pub use commands::{
    build_session, handle_browse, handle_config, handle_manifest, handle_options, handle_view,
};
