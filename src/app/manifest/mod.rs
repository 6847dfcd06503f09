//! Manifest loading and parsing
//!
//! The manifest is a CSV table describing every published plot: one row per
//! artifact with its date, machine statuses, shuttle and file name. It is
//! read once per session from the remote store (or a local file) and then
//! shared read-only by every filter pass.
//!
//! # Module Organization
//!
//! - [`types`] - Manifest location, load outcome and statistics
//! - [`parse`] - CSV parsing with required-column checks
//! - [`source`] - Memoized loading with boundary error conversion
//!
//! # Examples
//!
//! ```rust,no_run
//! use plot_viewer::app::manifest::{ManifestLocation, ManifestSource};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let location = ManifestLocation::parse("./manifest.csv")?;
//! let mut source = ManifestSource::new(location);
//!
//! let load = source.load_or_empty().await;
//! if let Some(diagnostic) = &load.diagnostic {
//!     eprintln!("{}", diagnostic);
//! }
//! println!("{} rows", load.table.len());
//! # Ok(())
//! # }
//! ```

pub mod parse;
pub mod source;
pub mod types;

pub use parse::{parse_manifest, parse_manifest_str};
pub use source::ManifestSource;
pub use types::{ManifestLoad, ManifestLocation, ManifestStats};
