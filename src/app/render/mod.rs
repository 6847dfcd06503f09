//! Presentation of resolved resources
//!
//! The renderer owns the ordering and empty-result rules; how things look
//! is delegated to a [`Presenter`]. Three presenters ship with the crate:
//! terminal text, a self-contained HTML page embedding each plot in an
//! iframe, and JSON.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::app::models::ResolvedResource;
use crate::constants::display;
use crate::errors::RenderResult;

pub mod html;
pub mod json;
pub mod text;

pub use html::HtmlPresenter;
pub use json::JsonPresenter;
pub use text::TextPresenter;

/// Severity of a user-visible notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    /// Informational
    Info,
    /// Nothing to show, or a recoverable problem
    Warning,
    /// Something failed
    Error,
}

/// How embedded resources are displayed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedOptions {
    /// Height of each embed in pixels
    pub height: u32,
    /// Whether the embed scrolls
    pub scrolling: bool,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self {
            height: display::EMBED_HEIGHT,
            scrolling: display::EMBED_SCROLLING,
        }
    }
}

/// The display capability the renderer drives
pub trait Presenter {
    /// Show a section heading
    fn heading(&mut self, text: &str) -> RenderResult<()>;

    /// Show a notice
    fn notice(&mut self, level: NoticeLevel, text: &str) -> RenderResult<()>;

    /// Show the label of the next resource
    fn label(&mut self, text: &str) -> RenderResult<()>;

    /// Display a resource at its URL
    fn embed(&mut self, resource: &ResolvedResource, options: &EmbedOptions) -> RenderResult<()>;

    /// Separate two entries
    fn separator(&mut self) -> RenderResult<()>;

    /// Flush anything buffered
    fn finish(&mut self) -> RenderResult<()> {
        Ok(())
    }
}

/// What a render pass produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RenderOutcome {
    /// This many resources were displayed
    Rendered(usize),
    /// Nothing matched; the "no match" notice was shown
    Empty,
}

/// Drives a presenter over a list of resolved resources
#[derive(Debug)]
pub struct ViewRenderer<P: Presenter> {
    presenter: P,
    embed: EmbedOptions,
}

impl<P: Presenter> ViewRenderer<P> {
    /// Create a renderer
    pub fn new(presenter: P, embed: EmbedOptions) -> Self {
        Self { presenter, embed }
    }

    /// Render resources for a date
    ///
    /// An empty list produces exactly one "no match" notice and nothing
    /// else. Otherwise a heading is followed, for each resource in order, by
    /// its label, its embed and a separator.
    pub fn render(&mut self, date: &str, resources: &[ResolvedResource]) -> RenderResult<RenderOutcome> {
        if resources.is_empty() {
            debug!("No resources to render for {}", date);
            self.presenter
                .notice(NoticeLevel::Warning, display::NO_MATCH_NOTICE)?;
            return Ok(RenderOutcome::Empty);
        }

        self.presenter.heading(&format!(
            "Displaying {} Plot(s) for {}",
            resources.len(),
            date
        ))?;

        for resource in resources {
            self.presenter.label(&resource.label)?;
            self.presenter.embed(resource, &self.embed)?;
            self.presenter.separator()?;
        }

        debug!("Rendered {} resources for {}", resources.len(), date);
        Ok(RenderOutcome::Rendered(resources.len()))
    }

    /// Report a manifest that could not be loaded
    pub fn render_unavailable(&mut self, diagnostic: &str) -> RenderResult<()> {
        self.presenter.notice(NoticeLevel::Error, diagnostic)?;
        self.presenter
            .notice(NoticeLevel::Warning, display::EMPTY_MANIFEST_NOTICE)
    }

    /// Report rows that were skipped during resolution
    pub fn render_skipped(&mut self, skipped: usize) -> RenderResult<()> {
        if skipped == 0 {
            return Ok(());
        }
        self.presenter.notice(
            NoticeLevel::Info,
            &format!("{} manifest row(s) skipped because of invalid file names", skipped),
        )
    }

    /// Flush the presenter
    pub fn finish(&mut self) -> RenderResult<()> {
        self.presenter.finish()
    }

    /// Embed settings in use
    pub fn embed_options(&self) -> &EmbedOptions {
        &self.embed
    }

    /// Borrow the presenter
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Mutably borrow the presenter
    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Take the presenter back
    pub fn into_presenter(self) -> P {
        self.presenter
    }
}

/// HTML-escape text for element content and attribute values
pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
