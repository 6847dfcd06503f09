//! Prelude module for Plot Viewer Library
//!
//! Re-exports the items most integrations need, so a single
//! `use plot_viewer::prelude::*;` is enough to run a session.

// Core result types
pub use crate::errors::{AppError, Result};

// Session pipeline
pub use crate::app::{
    EmbedOptions, FilterPipeline, FilterSelection, HtmlPresenter, JsonPresenter, ManifestLocation,
    ManifestSource, ManifestTable, PassReport, Presenter, RenderOutcome, ResolvedResource,
    ResourceBase, ResourceResolver, SelectionRequest, Session, SessionState, TextPresenter,
    ViewRenderer,
};

// Configuration
pub use crate::config::AppConfig;

pub use std::sync::Arc;
