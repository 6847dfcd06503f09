//! Terminal presenter

use std::io::Write;

use super::{EmbedOptions, NoticeLevel, Presenter};
use crate::app::models::ResolvedResource;
use crate::constants::display;
use crate::errors::RenderResult;

/// Writes plain text to any writer (usually stdout)
#[derive(Debug)]
pub struct TextPresenter<W: Write> {
    writer: W,
}

impl<W: Write> TextPresenter<W> {
    /// Create a presenter writing to `writer`
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Borrow the writer, for output outside a render pass
    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Take the writer back
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Presenter for TextPresenter<W> {
    fn heading(&mut self, text: &str) -> RenderResult<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", text)?;
        writeln!(self.writer, "{}", "=".repeat(text.chars().count()))?;
        Ok(())
    }

    fn notice(&mut self, level: NoticeLevel, text: &str) -> RenderResult<()> {
        let prefix = match level {
            NoticeLevel::Info => "ℹ️ ",
            NoticeLevel::Warning => "⚠️ ",
            NoticeLevel::Error => "❌",
        };
        writeln!(self.writer, "{} {}", prefix, text)?;
        Ok(())
    }

    fn label(&mut self, text: &str) -> RenderResult<()> {
        writeln!(self.writer, "Plot: {}", text)?;
        Ok(())
    }

    fn embed(&mut self, resource: &ResolvedResource, options: &EmbedOptions) -> RenderResult<()> {
        writeln!(
            self.writer,
            "  {}  ({}px{})",
            resource.url,
            options.height,
            if options.scrolling { ", scrolling" } else { "" }
        )?;
        Ok(())
    }

    fn separator(&mut self) -> RenderResult<()> {
        writeln!(self.writer, "{}", "-".repeat(display::SEPARATOR_WIDTH))?;
        Ok(())
    }

    fn finish(&mut self) -> RenderResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}
