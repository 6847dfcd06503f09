//! Viewing session
//!
//! A [`Session`] ties the manifest source, the filter cascade, the resolver
//! and a renderer together. The manifest is fetched at most once; every
//! control change afterwards re-runs a synchronous pass over the memoized
//! table. A failed fetch leaves the session uninitialized with its
//! diagnostic stored, and nothing is fetched again until [`Session::reload`].

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::app::filter::{FilterOptions, FilterPipeline};
use crate::app::manifest::ManifestSource;
use crate::app::models::{ManifestTable, SelectionRequest};
use crate::app::render::{Presenter, RenderOutcome, ViewRenderer};
use crate::app::resolve::ResourceResolver;
use crate::errors::RenderResult;

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SessionState {
    /// No table yet; `failed` is set after an unsuccessful fetch
    Uninitialized { failed: bool },
    /// Table fetched, no selection applied yet
    Loaded,
    /// Selection applied, nothing rendered yet
    Filtered,
    /// At least one resource was rendered
    Rendered,
    /// The last pass matched nothing
    Empty,
}

/// Summary of one pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassReport {
    /// Whether a manifest table was available
    pub loaded: bool,
    /// Date the pass filtered on
    pub date: Option<String>,
    /// Options offered for that date
    pub options: FilterOptions,
    /// Rows surviving the filters
    pub matched: usize,
    /// Resources handed to the renderer
    pub rendered: usize,
    /// Rows skipped by the resolver
    pub skipped: usize,
    /// What the renderer produced
    pub outcome: RenderOutcome,
}

impl PassReport {
    fn unavailable() -> Self {
        Self {
            loaded: false,
            date: None,
            options: FilterOptions::default(),
            matched: 0,
            rendered: 0,
            skipped: 0,
            outcome: RenderOutcome::Empty,
        }
    }
}

/// One user session over a manifest
#[derive(Debug)]
pub struct Session {
    source: ManifestSource,
    resolver: ResourceResolver,
    state: SessionState,
    diagnostic: Option<String>,
    table: Option<Arc<ManifestTable>>,
}

impl Session {
    /// Create a session; nothing is fetched until the first pass
    pub fn new(source: ManifestSource, resolver: ResourceResolver) -> Self {
        Self {
            source,
            resolver,
            state: SessionState::Uninitialized { failed: false },
            diagnostic: None,
            table: None,
        }
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Diagnostic of the last failed fetch
    pub fn diagnostic(&self) -> Option<&str> {
        self.diagnostic.as_deref()
    }

    /// The manifest source
    pub fn source(&self) -> &ManifestSource {
        &self.source
    }

    /// The resolver
    pub fn resolver(&self) -> &ResourceResolver {
        &self.resolver
    }

    /// The loaded table, if any
    pub fn table(&self) -> Option<&Arc<ManifestTable>> {
        self.table.as_ref()
    }

    fn is_failed(&self) -> bool {
        matches!(self.state, SessionState::Uninitialized { failed: true })
    }

    /// Load the manifest unless it is already loaded or the load failed
    ///
    /// Returns `None` when no table is available; the reason is kept in
    /// [`Session::diagnostic`].
    pub async fn ensure_loaded(&mut self) -> Option<Arc<ManifestTable>> {
        if let Some(table) = &self.table {
            return Some(Arc::clone(table));
        }
        if self.is_failed() {
            debug!("Manifest load failed earlier; waiting for reload");
            return None;
        }

        let load = self.source.load_or_empty().await;
        match load.diagnostic {
            Some(diagnostic) => {
                self.state = SessionState::Uninitialized { failed: true };
                self.diagnostic = Some(diagnostic);
                None
            }
            None => {
                info!("Session loaded {} manifest rows", load.table.len());
                self.state = SessionState::Loaded;
                self.table = Some(Arc::clone(&load.table));
                Some(load.table)
            }
        }
    }

    /// Option lists for a request without rendering anything
    pub async fn options(&mut self, request: &SelectionRequest) -> Option<FilterOptions> {
        let table = self.ensure_loaded().await?;
        Some(match request.resolve(&table) {
            Some(selection) => FilterPipeline::options(&table, &selection.date),
            None => FilterOptions::default(),
        })
    }

    /// Run one full pass: load (memoized), filter, resolve and render
    ///
    /// # Errors
    ///
    /// Only presenter failures are returned. An unavailable manifest is
    /// reported through the renderer.
    pub async fn pass<P: Presenter>(
        &mut self,
        request: &SelectionRequest,
        renderer: &mut ViewRenderer<P>,
    ) -> RenderResult<PassReport> {
        let Some(table) = self.ensure_loaded().await else {
            let diagnostic = self
                .diagnostic
                .clone()
                .unwrap_or_else(|| "Manifest could not be loaded".to_string());
            renderer.render_unavailable(&diagnostic)?;
            return Ok(PassReport::unavailable());
        };

        let Some(selection) = request.resolve(&table) else {
            warn!("Manifest has no rows; nothing to display");
            self.state = SessionState::Filtered;
            let outcome = renderer.render("", &[])?;
            self.state = SessionState::Empty;
            return Ok(PassReport {
                loaded: true,
                outcome,
                ..PassReport::unavailable()
            });
        };

        let filtered = FilterPipeline::run(&table, &selection);
        self.state = SessionState::Filtered;

        let resolution = self.resolver.resolve_all(&filtered.rows);
        let outcome = renderer.render(&selection.date, &resolution.resources)?;
        renderer.render_skipped(resolution.skipped.len())?;

        self.state = match outcome {
            RenderOutcome::Rendered(_) => SessionState::Rendered,
            RenderOutcome::Empty => SessionState::Empty,
        };

        Ok(PassReport {
            loaded: true,
            date: Some(selection.date),
            options: filtered.options,
            matched: filtered.rows.len(),
            rendered: resolution.resources.len(),
            skipped: resolution.skipped.len(),
            outcome,
        })
    }

    /// Start over: drop the memoized table and clear any failure
    pub fn reload(&mut self) {
        info!("Reloading manifest from {}", self.source.location());
        self.source.invalidate();
        self.table = None;
        self.diagnostic = None;
        self.state = SessionState::Uninitialized { failed: false };
    }
}
