//! HTML rendering of the document.
//!
//! Two flavours share one writer: plain HTML for inspection and tests, and
//! the editor surface HTML, which additionally carries `data-pos` on every
//! paragraph and chip so DOM nodes can be mapped back to document positions.

use std::fmt;

use markdown_weaver_escape::{StrWrite, escape_html};

use crate::config::ClassNames;
use crate::node::{Chip, Document, Inline};

/// String-backed output for the HTML writer.
#[derive(Debug, Clone, Default)]
pub struct HtmlBuffer {
    html: String,
}

impl HtmlBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_string(self) -> String {
        self.html
    }
}

impl StrWrite for HtmlBuffer {
    type Error = fmt::Error;

    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.html.push_str(s);
        Ok(())
    }

    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        fmt::Write::write_fmt(&mut self.html, args)
    }
}

/// Writes a document as `<p>` paragraphs with chips as non-editable spans.
pub struct DocumentWriter<'a, W> {
    writer: W,
    classes: &'a ClassNames,
    positions: bool,
}

impl<'a, W: StrWrite> DocumentWriter<'a, W> {
    pub fn new(writer: W, classes: &'a ClassNames) -> Self {
        Self {
            writer,
            classes,
            positions: false,
        }
    }

    /// Annotate paragraphs and chips with their document positions.
    pub fn with_positions(mut self) -> Self {
        self.positions = true;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    pub fn write_document(&mut self, doc: &Document) -> Result<(), W::Error> {
        let mut start = 0;
        for para in doc.paragraphs() {
            if self.positions {
                write!(self.writer, "<p data-pos=\"{}\">", start)?;
            } else {
                self.writer.write_str("<p>")?;
            }

            let mut pos = start + 1;
            for node in para.content() {
                match node {
                    Inline::Text(text) => escape_html(&mut self.writer, text)?,
                    Inline::Chip(chip) => self.write_chip(chip, pos)?,
                }
                pos += node.node_size();
            }

            // An empty paragraph needs something to give it a line box.
            if self.positions && para.is_empty() {
                self.writer.write_str("<br>")?;
            }
            self.writer.write_str("</p>")?;
            start += para.node_size();
        }
        Ok(())
    }

    fn write_chip(&mut self, chip: &Chip, pos: usize) -> Result<(), W::Error> {
        self.writer.write_str("<span class=\"")?;
        escape_html(&mut self.writer, &self.classes.chip)?;
        self.writer.write_str("\" data-label=\"")?;
        escape_html(&mut self.writer, chip.text())?;
        self.writer.write_str("\"")?;
        if self.positions {
            write!(self.writer, " data-pos=\"{}\"", pos)?;
        }
        self.writer
            .write_str(" draggable=\"true\" contenteditable=\"false\">")?;
        escape_html(&mut self.writer, chip.text())?;
        self.writer.write_str("</span>")
    }
}

/// Render the document as plain HTML.
pub fn render_html(doc: &Document, classes: &ClassNames) -> String {
    render(doc, classes, false)
}

/// Render the editor surface: plain HTML plus `data-pos` annotations.
pub fn render_editor_html(doc: &Document, classes: &ClassNames) -> String {
    render(doc, classes, true)
}

fn render(doc: &Document, classes: &ClassNames, positions: bool) -> String {
    let mut writer = DocumentWriter::new(HtmlBuffer::new(), classes);
    if positions {
        writer = writer.with_positions();
    }
    if let Err(err) = writer.write_document(doc) {
        tracing::warn!(%err, "failed to render document");
    }
    writer.into_inner().into_string()
}
