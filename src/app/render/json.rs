//! JSON presenter

use std::io::Write;

use serde::Serialize;

use super::{EmbedOptions, NoticeLevel, Presenter};
use crate::app::models::ResolvedResource;
use crate::errors::RenderResult;

#[derive(Debug, Default, Serialize)]
struct Document {
    heading: Option<String>,
    notices: Vec<Notice>,
    plots: Vec<Plot>,
}

#[derive(Debug, Serialize)]
struct Notice {
    level: NoticeLevel,
    message: String,
}

#[derive(Debug, Serialize)]
struct Plot {
    #[serde(flatten)]
    resource: ResolvedResource,
    height: u32,
    scrolling: bool,
}

/// Collects the pass and writes one JSON document on `finish`
#[derive(Debug)]
pub struct JsonPresenter<W: Write> {
    writer: W,
    document: Document,
}

impl<W: Write> JsonPresenter<W> {
    /// Create a presenter writing to `writer`
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            document: Document::default(),
        }
    }

    /// Take the writer back
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Presenter for JsonPresenter<W> {
    fn heading(&mut self, text: &str) -> RenderResult<()> {
        self.document.heading = Some(text.to_string());
        Ok(())
    }

    fn notice(&mut self, level: NoticeLevel, text: &str) -> RenderResult<()> {
        self.document.notices.push(Notice {
            level,
            message: text.to_string(),
        });
        Ok(())
    }

    // Labels travel with each plot entry
    fn label(&mut self, _text: &str) -> RenderResult<()> {
        Ok(())
    }

    fn embed(&mut self, resource: &ResolvedResource, options: &EmbedOptions) -> RenderResult<()> {
        self.document.plots.push(Plot {
            resource: resource.clone(),
            height: options.height,
            scrolling: options.scrolling,
        });
        Ok(())
    }

    fn separator(&mut self) -> RenderResult<()> {
        Ok(())
    }

    fn finish(&mut self) -> RenderResult<()> {
        let document = std::mem::take(&mut self.document);
        serde_json::to_writer_pretty(&mut self.writer, &document)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
