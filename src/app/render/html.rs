//! HTML page presenter
//!
//! Builds one self-contained page with an iframe per plot. The body is
//! buffered and the complete document is written on `finish`.

use std::io::Write;

use chrono::Utc;

use super::{escape_html, EmbedOptions, NoticeLevel, Presenter};
use crate::app::models::ResolvedResource;
use crate::constants::display;
use crate::errors::RenderResult;

const STYLE: &str = "body{font-family:sans-serif;margin:2rem auto;max-width:1200px;padding:0 1rem}\
iframe{width:100%;border:1px solid #ddd}\
.notice{padding:.75rem 1rem;border-radius:4px;margin:1rem 0}\
.notice.info{background:#e8f1fb}\
.notice.warning{background:#fff4d6}\
.notice.error{background:#fde2e1}\
footer{color:#777;font-size:.8rem;margin-top:2rem}";

/// Writes a complete HTML document
#[derive(Debug)]
pub struct HtmlPresenter<W: Write> {
    writer: W,
    title: String,
    body: String,
}

impl<W: Write> HtmlPresenter<W> {
    /// Create a presenter writing a page titled `title`
    pub fn new(writer: W, title: impl Into<String>) -> Self {
        Self {
            writer,
            title: title.into(),
            body: String::new(),
        }
    }

    /// Take the writer back
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Presenter for HtmlPresenter<W> {
    fn heading(&mut self, text: &str) -> RenderResult<()> {
        self.body
            .push_str(&format!("<h2>{}</h2>\n", escape_html(text)));
        Ok(())
    }

    fn notice(&mut self, level: NoticeLevel, text: &str) -> RenderResult<()> {
        let class = match level {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        self.body.push_str(&format!(
            "<div class=\"notice {}\">{}</div>\n",
            class,
            escape_html(text)
        ));
        Ok(())
    }

    fn label(&mut self, text: &str) -> RenderResult<()> {
        self.body
            .push_str(&format!("<h3>Plot: {}</h3>\n", escape_html(text)));
        Ok(())
    }

    fn embed(&mut self, resource: &ResolvedResource, options: &EmbedOptions) -> RenderResult<()> {
        self.body.push_str(&format!(
            "<iframe src=\"{}\" height=\"{}\" scrolling=\"{}\" loading=\"lazy\" title=\"{}\"></iframe>\n",
            escape_html(resource.url.as_str()),
            options.height,
            if options.scrolling { "yes" } else { "no" },
            escape_html(&resource.label)
        ));
        Ok(())
    }

    fn separator(&mut self) -> RenderResult<()> {
        self.body.push_str("<hr>\n");
        Ok(())
    }

    fn finish(&mut self) -> RenderResult<()> {
        let title = escape_html(&self.title);
        write!(
            self.writer,
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
             <h1>{heading}</h1>\n{body}<footer>Generated {generated}</footer>\n</body>\n</html>\n",
            title = title,
            heading = escape_html(display::APP_HEADING),
            body = self.body,
            generated = Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
        )?;
        self.writer.flush()?;
        self.body.clear();
        Ok(())
    }
}
