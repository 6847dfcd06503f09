//! Configuration management for Plot Viewer
//!
//! Settings are layered: built-in defaults, then a TOML config file, then
//! environment variables (a `.env` file is honoured by `main`), then
//! command-line overrides. Every section is optional in the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::app::client::ClientConfig;
use crate::app::manifest::ManifestLocation;
use crate::app::render::EmbedOptions;
use crate::app::resolve::{ResourceBase, ResourceResolver};
use crate::constants::{config as paths, display, env, source};
use crate::errors::{ConfigError, ConfigResult, Result};

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where the manifest and plots live
    pub source: SourceConfig,
    /// HTTP client settings
    pub client: ClientConfig,
    /// Presentation settings
    pub display: DisplayConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Location of the artifact store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Scheme and host serving raw repository files
    pub origin: String,
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repository: String,
    /// Branch, tag or commit
    pub revision: String,
    /// Optional sub-path inside the repository
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_prefix: Option<String>,
    /// Complete base URL; replaces origin/owner/repository/revision/path_prefix
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Explicit manifest location (URL or local path)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<String>,
    /// Manifest file name relative to the base
    pub manifest_file: String,
    /// Plot folder relative to the base
    pub artifacts_dir: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            origin: source::DEFAULT_ORIGIN.to_string(),
            owner: source::DEFAULT_OWNER.to_string(),
            repository: source::DEFAULT_REPOSITORY.to_string(),
            revision: source::DEFAULT_REVISION.to_string(),
            path_prefix: None,
            base_url: None,
            manifest: None,
            manifest_file: source::MANIFEST_FILENAME.to_string(),
            artifacts_dir: source::ARTIFACTS_DIR.to_string(),
        }
    }
}

/// Presentation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Height of each embedded plot in pixels
    pub height: u32,
    /// Whether embedded plots scroll
    pub scrolling: bool,
    /// Title of generated HTML pages
    pub page_title: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            height: display::EMBED_HEIGHT,
            scrolling: display::EMBED_SCROLLING,
            page_title: display::PAGE_TITLE.to_string(),
        }
    }
}

impl DisplayConfig {
    /// Embed settings for the renderer
    pub fn embed_options(&self) -> EmbedOptions {
        EmbedOptions {
            height: self.height,
            scrolling: self.scrolling,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level used when no verbosity flag is given
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration with multi-source precedence:
    /// 1. Default values
    /// 2. Config file (if exists)
    /// 3. Environment variables
    ///
    /// Command-line overrides are applied afterwards by the caller.
    pub async fn load(config_file_override: Option<PathBuf>) -> Result<Self> {
        let mut config = Self::default();

        let config_path = match &config_file_override {
            Some(path) => Some(path.clone()),
            None => Self::find_config_file(),
        };

        if let Some(path) = config_path {
            if path.exists() {
                debug!("Loading config from: {}", path.display());
                config = Self::load_from_file(&path).await?;
            } else if config_file_override.is_some() {
                return Err(ConfigError::NotFound { path }.into());
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Apply `PLOT_VIEWER_*` environment variables
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key/value lookup
    ///
    /// Empty values are ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(origin) = get(env::ORIGIN) {
            debug!("{} overrides origin", env::ORIGIN);
            self.source.origin = origin;
        }
        if let Some(owner) = get(env::OWNER) {
            self.source.owner = owner;
        }
        if let Some(repository) = get(env::REPOSITORY) {
            self.source.repository = repository;
        }
        if let Some(revision) = get(env::REVISION) {
            self.source.revision = revision;
        }
        if let Some(prefix) = get(env::PATH_PREFIX) {
            self.source.path_prefix = Some(prefix);
        }
        if let Some(manifest) = get(env::MANIFEST) {
            debug!("{} overrides manifest location", env::MANIFEST);
            self.source.manifest = Some(manifest);
        }
    }

    /// Apply command-line overrides
    pub fn apply_cli_overrides(&mut self, manifest: Option<&str>, base_url: Option<&str>) {
        if let Some(manifest) = manifest {
            self.source.manifest = Some(manifest.to_string());
        }
        if let Some(base_url) = base_url {
            self.source.base_url = Some(base_url.to_string());
        }
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> ConfigResult<()> {
        let required = [
            ("source.origin", &self.source.origin),
            ("source.owner", &self.source.owner),
            ("source.repository", &self.source.repository),
            ("source.revision", &self.source.revision),
            ("source.manifest_file", &self.source.manifest_file),
            ("source.artifacts_dir", &self.source.artifacts_dir),
        ];
        for (field, value) in required {
            if value.trim_matches(|c: char| c == '/' || c.is_whitespace()).is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: value.clone(),
                    reason: "must not be empty".to_string(),
                });
            }
        }

        if self.display.height == 0 {
            return Err(ConfigError::InvalidValue {
                field: "display.height".to_string(),
                value: "0".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                value: self.logging.level.clone(),
                reason: format!("expected one of {}", LOG_LEVELS.join(", ")),
            });
        }

        Ok(())
    }

    /// Base location for the manifest and plots
    pub fn resource_base(&self) -> Result<ResourceBase> {
        let base = match &self.source.base_url {
            Some(base_url) => ResourceBase::parse(base_url)?,
            None => ResourceBase::from_parts(
                &self.source.origin,
                [
                    Some(self.source.owner.as_str()),
                    Some(self.source.repository.as_str()),
                    Some(self.source.revision.as_str()),
                    self.source.path_prefix.as_deref(),
                ]
                .into_iter()
                .flatten(),
            )?,
        };
        Ok(base)
    }

    /// Where the manifest is read from
    pub fn manifest_location(&self) -> Result<ManifestLocation> {
        match &self.source.manifest {
            Some(manifest) => Ok(ManifestLocation::parse(manifest)?),
            None => {
                let url = self
                    .resource_base()?
                    .join([self.source.manifest_file.as_str()])?;
                Ok(ManifestLocation::Remote(url))
            }
        }
    }

    /// Resolver for plot locations
    pub fn resolver(&self) -> Result<ResourceResolver> {
        Ok(ResourceResolver::new(
            self.resource_base()?,
            &self.source.artifacts_dir,
        ))
    }

    /// Write a default config file to the user config directory
    ///
    /// An existing file is left alone unless `force` is set. Returns the
    /// path and whether a file was written.
    pub async fn initialize(force: bool) -> Result<(PathBuf, bool)> {
        let config_path = Self::get_default_config_path()?;

        if config_path.exists() && !force {
            return Ok((config_path, false));
        }

        Self::write_default(&config_path).await?;
        info!("Created configuration file: {}", config_path.display());
        Ok((config_path, true))
    }

    /// Write the commented default configuration to `path`
    pub async fn write_default(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| ConfigError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        tokio::fs::write(path, Self::generate_default_config_content())
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(())
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| crate::errors::AppError::generic(format!("Failed to serialize config: {}", e)))
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(".").join(paths::LOCAL_FILE_NAME)];
        if let Ok(path) = Self::get_default_config_path() {
            search_paths.push(path);
        }

        let found = search_paths.into_iter().find(|path| path.exists());
        match &found {
            Some(path) => debug!("Found config file: {}", path.display()),
            None => debug!("No config file found in standard locations"),
        }
        found
    }

    /// Get the default config file path for the current user
    pub fn get_default_config_path() -> ConfigResult<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join(paths::APP_DIR).join(paths::FILE_NAME))
    }

    /// Load configuration from a TOML file
    async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let config: AppConfig =
            toml::from_str(&content).map_err(|source| ConfigError::InvalidFormat {
                path: path.to_path_buf(),
                source,
            })?;

        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Generate default configuration content with helpful comments
    pub fn generate_default_config_content() -> String {
        format!(
            r#"# Plot Viewer Configuration
# Values here are overridden by PLOT_VIEWER_* environment variables
# and by command-line flags.

[source]
# Raw file host and repository holding manifest.csv and the plots
origin = "{origin}"
owner = "{owner}"
repository = "{repository}"
revision = "{revision}"
# path_prefix = "sub/folder"

# Use a complete base URL instead of origin/owner/repository/revision
# base_url = "https://example.com/plots"

# Read the manifest from an explicit URL or local file
# manifest = "./manifest.csv"

manifest_file = "{manifest_file}"
artifacts_dir = "{artifacts_dir}"

[client]
request_timeout = "60s"
connect_timeout = "30s"
tcp_keepalive = "30s"
pool_idle_timeout = "90s"

[display]
height = {height}
scrolling = {scrolling}
page_title = "{page_title}"

[logging]
level = "warn"  # error, warn, info, debug, trace
"#,
            origin = source::DEFAULT_ORIGIN,
            owner = source::DEFAULT_OWNER,
            repository = source::DEFAULT_REPOSITORY,
            revision = source::DEFAULT_REVISION,
            manifest_file = source::MANIFEST_FILENAME,
            artifacts_dir = source::ARTIFACTS_DIR,
            height = display::EMBED_HEIGHT,
            scrolling = display::EMBED_SCROLLING,
            page_title = display::PAGE_TITLE,
        )
    }
}
