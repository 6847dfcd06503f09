//! Core application logic for Plot Viewer
//!
//! This module contains the manifest source, the filter cascade, resource
//! resolution, presentation and the session that drives them.
//!
//! # Examples
//!
//! ```rust,no_run
//! use plot_viewer::app::{
//!     EmbedOptions, ManifestLocation, ManifestSource, ResourceBase, ResourceResolver,
//!     SelectionRequest, Session, TextPresenter, ViewRenderer,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let base = ResourceBase::parse("https://raw.githubusercontent.com/owner/repo/main")?;
//! let location = ManifestLocation::Remote(base.join(["manifest.csv"])?);
//!
//! let mut session = Session::new(
//!     ManifestSource::new(location),
//!     ResourceResolver::new(base, "plot_outputs"),
//! );
//! let mut renderer = ViewRenderer::new(TextPresenter::new(std::io::stdout()), EmbedOptions::default());
//!
//! // Most recent date, no other restriction
//! let report = session.pass(&SelectionRequest::default(), &mut renderer).await?;
//! println!("{} plot(s) shown", report.rendered);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod filter;
pub mod manifest;
pub mod models;
pub mod render;
pub mod resolve;
pub mod session;

// Re-export main public API
pub use client::{ClientConfig, StoreClient};
pub use filter::{FilterOptions, FilterOutcome, FilterPipeline};
pub use manifest::{
    parse_manifest, parse_manifest_str, ManifestLoad, ManifestLocation, ManifestSource,
    ManifestStats,
};
pub use models::{
    compare_options, FilterSelection, ManifestField, ManifestRecord, ManifestTable,
    ResolvedResource, SelectionRequest,
};
pub use render::{
    EmbedOptions, HtmlPresenter, JsonPresenter, NoticeLevel, Presenter, RenderOutcome,
    TextPresenter, ViewRenderer,
};
pub use resolve::{Resolution, ResourceBase, ResourceResolver};
pub use session::{PassReport, Session, SessionState};
