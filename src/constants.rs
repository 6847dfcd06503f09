//! Application constants for Plot Viewer
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain for maintainability and clarity.

use std::time::Duration;

/// Environment variable names for configuration overrides
pub mod env {
    /// Origin host of the artifact store
    pub const ORIGIN: &str = "PLOT_VIEWER_ORIGIN";

    /// Owner (user or organisation) of the artifact repository
    pub const OWNER: &str = "PLOT_VIEWER_OWNER";

    /// Repository holding the manifest and plots
    pub const REPOSITORY: &str = "PLOT_VIEWER_REPOSITORY";

    /// Revision reference (branch, tag or commit)
    pub const REVISION: &str = "PLOT_VIEWER_REVISION";

    /// Optional sub-path inside the repository
    pub const PATH_PREFIX: &str = "PLOT_VIEWER_PATH_PREFIX";

    /// Explicit manifest location (URL or local path)
    pub const MANIFEST: &str = "PLOT_VIEWER_MANIFEST";
}

/// Remote artifact store defaults
pub mod source {
    /// Raw file host serving the repository contents
    pub const DEFAULT_ORIGIN: &str = "https://raw.githubusercontent.com";

    /// Repository owner
    pub const DEFAULT_OWNER: &str = "meliaph-monitech";

    /// Repository name
    pub const DEFAULT_REPOSITORY: &str = "NVH_PowerSource_Plotly_Viz";

    /// Branch the artifacts are published on
    pub const DEFAULT_REVISION: &str = "main";

    /// Manifest file name, relative to the base location
    pub const MANIFEST_FILENAME: &str = "manifest.csv";

    /// Folder holding the plot artifacts, relative to the base location
    pub const ARTIFACTS_DIR: &str = "plot_outputs";
}

/// Manifest schema
pub mod manifest {
    /// Columns every manifest must carry, in canonical order
    pub const REQUIRED_COLUMNS: [&str; 5] = ["date", "status1", "status2", "shuttle", "filename"];
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = concat!("Plot-Viewer/", env!("CARGO_PKG_VERSION"));

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

    /// TCP keep-alive interval
    pub const TCP_KEEPALIVE: Duration = Duration::from_secs(30);

    /// Connection pool idle timeout
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);
}

/// Presentation defaults
pub mod display {
    /// Height of each embedded plot, in pixels
    pub const EMBED_HEIGHT: u32 = 600;

    /// Whether embedded plots scroll
    pub const EMBED_SCROLLING: bool = true;

    /// Page title used for HTML output
    pub const PAGE_TITLE: &str = "NVH Plot Viewer";

    /// Main heading shown above the results
    pub const APP_HEADING: &str = "NVH Power Source & Plasma Data Viewer";

    /// Notice shown when the filters leave nothing to display
    pub const NO_MATCH_NOTICE: &str = "No plots match the selected filter criteria.";

    /// Notice shown when the manifest is empty or failed to load
    pub const EMPTY_MANIFEST_NOTICE: &str = "Manifest file is empty or could not be loaded.";

    /// Width of the separator line in terminal output
    pub const SEPARATOR_WIDTH: usize = 72;
}

/// Configuration file locations
pub mod config {
    /// Directory name under the user config dir
    pub const APP_DIR: &str = "plot-viewer";

    /// Config file name inside `APP_DIR`
    pub const FILE_NAME: &str = "config.toml";

    /// Project-local config file name
    pub const LOCAL_FILE_NAME: &str = "plot-viewer.toml";
}
