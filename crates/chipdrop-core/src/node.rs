//! Document model: paragraphs of text runs and atomic chips.
//!
//! Positions follow a flat token model. Each paragraph contributes an
//! opening token, one unit per character of text, one unit per chip and a
//! closing token. Position `0` is before the first paragraph and
//! `Document::size()` is after the last one.
//!
//! ```text
//!  <p> H a p p y </p><p> [chip] </p>
//! 0   1 2 3 4 5 6    7  8      9    10
//! ```
//!
//! Positions strictly inside a paragraph are *inline* positions, everything
//! else is a *block* position. Chips can only ever be inserted at inline
//! positions, and because a chip is a single unit no position can fall
//! inside one.

use smol_str::{SmolStr, ToSmolStr};

use crate::error::EditError;

/// An atomic inline label.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Chip {
    text: SmolStr,
}

impl Chip {
    /// Create a chip, trimming surrounding whitespace from the label.
    pub fn new(text: impl AsRef<str>) -> Self {
        Self {
            text: text.as_ref().trim().to_smolstr(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Inline content of a paragraph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inline {
    /// A run of plain text. Each char is one position.
    Text(SmolStr),
    /// An atomic chip. Always one position.
    Chip(Chip),
}

impl Inline {
    pub fn text(text: impl AsRef<str>) -> Self {
        Inline::Text(text.as_ref().to_smolstr())
    }

    pub fn chip(text: impl AsRef<str>) -> Self {
        Inline::Chip(Chip::new(text))
    }

    /// Size of this node in the position space.
    pub fn node_size(&self) -> usize {
        match self {
            Inline::Text(text) => text.chars().count(),
            Inline::Chip(_) => 1,
        }
    }

    pub fn as_chip(&self) -> Option<&Chip> {
        match self {
            Inline::Chip(chip) => Some(chip),
            Inline::Text(_) => None,
        }
    }
}

/// A block of inline content.
///
/// Content is kept normalized: no empty text runs, no two adjacent text runs.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Paragraph {
    content: Vec<Inline>,
}

impl Paragraph {
    pub fn new(content: Vec<Inline>) -> Self {
        let mut para = Self { content };
        para.normalize();
        para
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &[Inline] {
        &self.content
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Size of the content, excluding the open/close tokens.
    pub fn content_size(&self) -> usize {
        self.content.iter().map(Inline::node_size).sum()
    }

    /// Size including the open/close tokens.
    pub fn node_size(&self) -> usize {
        self.content_size() + 2
    }

    /// The child that starts at or spans `offset`, with its start offset.
    pub fn child_at(&self, offset: usize) -> Option<(usize, &Inline)> {
        let mut at = 0;
        for node in &self.content {
            let size = node.node_size();
            if offset >= at && offset < at + size {
                return Some((at, node));
            }
            at += size;
        }
        None
    }

    pub fn chips(&self) -> impl Iterator<Item = &Chip> {
        self.content.iter().filter_map(Inline::as_chip)
    }

    /// Plain text of the paragraph; chips contribute their label.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for node in &self.content {
            match node {
                Inline::Text(text) => out.push_str(text),
                Inline::Chip(chip) => out.push_str(chip.text()),
            }
        }
        out
    }

    /// Split content at `offset` into the nodes before and after it.
    ///
    /// A text run spanning the offset is cut in two. `offset` must be
    /// `<= content_size()`.
    fn split_content(&self, offset: usize) -> (Vec<Inline>, Vec<Inline>) {
        let mut before = Vec::new();
        let mut after = Vec::new();
        let mut at = 0;

        for node in &self.content {
            let size = node.node_size();
            if at + size <= offset {
                before.push(node.clone());
            } else if at >= offset {
                after.push(node.clone());
            } else if let Inline::Text(text) = node {
                let (head, tail) = split_chars(text, offset - at);
                before.push(Inline::Text(head));
                after.push(Inline::Text(tail));
            }
            at += size;
        }

        (before, after)
    }

    fn normalize(&mut self) {
        let mut merged: Vec<Inline> = Vec::with_capacity(self.content.len());
        for node in self.content.drain(..) {
            match node {
                Inline::Text(text) if text.is_empty() => {}
                Inline::Text(text) => {
                    if let Some(Inline::Text(prev)) = merged.last_mut() {
                        let mut joined = prev.to_string();
                        joined.push_str(&text);
                        *prev = joined.to_smolstr();
                    } else {
                        merged.push(Inline::Text(text));
                    }
                }
                chip @ Inline::Chip(_) => merged.push(chip),
            }
        }
        self.content = merged;
    }
}

fn split_chars(text: &str, chars: usize) -> (SmolStr, SmolStr) {
    let byte = text
        .char_indices()
        .nth(chars)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());
    (text[..byte].to_smolstr(), text[byte..].to_smolstr())
}

/// A position resolved against the paragraph structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedPos {
    /// Between paragraphs, directly before paragraph `index`.
    /// `index == paragraph count` is the end of the document.
    Block { index: usize },
    /// Inside paragraph `paragraph`, which opens at `start`, `offset` units
    /// into its content.
    Inline {
        paragraph: usize,
        start: usize,
        offset: usize,
    },
}

impl ResolvedPos {
    pub fn is_inline(&self) -> bool {
        matches!(self, ResolvedPos::Inline { .. })
    }
}

/// The whole editable document.
///
/// Always holds at least one paragraph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    paragraphs: Vec<Paragraph>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            paragraphs: vec![Paragraph::empty()],
        }
    }
}

impl Document {
    /// Create a document from paragraphs. An empty list yields one empty paragraph.
    pub fn new(paragraphs: Vec<Paragraph>) -> Self {
        if paragraphs.is_empty() {
            return Self::default();
        }
        Self { paragraphs }
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// Total size of the position space.
    pub fn size(&self) -> usize {
        self.paragraphs.iter().map(Paragraph::node_size).sum()
    }

    /// Position of the opening token of paragraph `index`.
    pub fn paragraph_start(&self, index: usize) -> Option<usize> {
        if index >= self.paragraphs.len() {
            return None;
        }
        Some(
            self.paragraphs[..index]
                .iter()
                .map(Paragraph::node_size)
                .sum(),
        )
    }

    /// Resolve a position against the paragraph structure.
    ///
    /// Returns `None` for positions past the end of the document.
    pub fn resolve(&self, pos: usize) -> Option<ResolvedPos> {
        let mut at = 0;
        for (index, para) in self.paragraphs.iter().enumerate() {
            if pos == at {
                return Some(ResolvedPos::Block { index });
            }
            let size = para.node_size();
            if pos < at + size {
                return Some(ResolvedPos::Inline {
                    paragraph: index,
                    start: at,
                    offset: pos - at - 1,
                });
            }
            at += size;
        }
        (pos == at).then_some(ResolvedPos::Block {
            index: self.paragraphs.len(),
        })
    }

    /// Whether any node follows `pos` inside its enclosing parent.
    ///
    /// For block positions the parent is the document; for inline positions
    /// it is the paragraph.
    pub fn has_node_after(&self, pos: usize) -> bool {
        match self.resolve(pos) {
            Some(ResolvedPos::Block { index }) => index < self.paragraphs.len(),
            Some(ResolvedPos::Inline {
                paragraph, offset, ..
            }) => offset < self.paragraphs[paragraph].content_size(),
            None => false,
        }
    }

    /// The chip starting at `pos`, if there is one.
    pub fn chip_at(&self, pos: usize) -> Option<&Chip> {
        let ResolvedPos::Inline {
            paragraph, offset, ..
        } = self.resolve(pos)?
        else {
            return None;
        };
        match self.paragraphs[paragraph].child_at(offset)? {
            (start, Inline::Chip(chip)) if start == offset => Some(chip),
            _ => None,
        }
    }

    /// All chips with their positions, in document order.
    pub fn chips(&self) -> Vec<(usize, &Chip)> {
        let mut out = Vec::new();
        let mut at = 0;
        for para in &self.paragraphs {
            let mut pos = at + 1;
            for node in para.content() {
                if let Inline::Chip(chip) = node {
                    out.push((pos, chip));
                }
                pos += node.node_size();
            }
            at += para.node_size();
        }
        out
    }

    pub fn chip_count(&self) -> usize {
        self.paragraphs.iter().map(|p| p.chips().count()).sum()
    }

    pub fn chip_texts(&self) -> Vec<&str> {
        self.chips().into_iter().map(|(_, chip)| chip.text()).collect()
    }

    /// Plain text of every paragraph joined with newlines.
    pub fn text_content(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text_content)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn inline_pos(&self, pos: usize) -> Result<(usize, usize), EditError> {
        match self.resolve(pos) {
            Some(ResolvedPos::Inline {
                paragraph, offset, ..
            }) => Ok((paragraph, offset)),
            Some(ResolvedPos::Block { .. }) => Err(EditError::NotInline(pos)),
            None => Err(EditError::OutOfBounds {
                pos,
                size: self.size(),
            }),
        }
    }

    /// Insert an inline node at an inline position.
    pub(crate) fn insert_inline(&mut self, pos: usize, node: Inline) -> Result<(), EditError> {
        let (index, offset) = self.inline_pos(pos)?;
        if node.node_size() == 0 {
            return Ok(());
        }
        let (mut before, after) = self.paragraphs[index].split_content(offset);
        before.push(node);
        before.extend(after);
        self.paragraphs[index] = Paragraph::new(before);
        Ok(())
    }

    /// Delete everything between two inline positions.
    ///
    /// When the endpoints sit in different paragraphs the remainder of the
    /// first and the tail of the last are joined into one paragraph.
    pub(crate) fn delete_range(&mut self, from: usize, to: usize) -> Result<(), EditError> {
        let size = self.size();
        if from > to || to > size {
            return Err(EditError::InvalidRange { from, to, size });
        }
        if from == to {
            return Ok(());
        }
        let (first, from_offset) = self
            .inline_pos(from)
            .map_err(|_| EditError::SplitsNode { from, to })?;
        let (last, to_offset) = self
            .inline_pos(to)
            .map_err(|_| EditError::SplitsNode { from, to })?;

        let (mut head, _) = self.paragraphs[first].split_content(from_offset);
        let (_, tail) = self.paragraphs[last].split_content(to_offset);
        head.extend(tail);
        self.paragraphs[first] = Paragraph::new(head);
        self.paragraphs.drain(first + 1..=last);
        Ok(())
    }

    /// Split the paragraph containing `pos` in two at that position.
    pub(crate) fn split_paragraph(&mut self, pos: usize) -> Result<(), EditError> {
        let (index, offset) = self.inline_pos(pos)?;
        let (head, tail) = self.paragraphs[index].split_content(offset);
        self.paragraphs[index] = Paragraph::new(head);
        self.paragraphs.insert(index + 1, Paragraph::new(tail));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(paragraphs: Vec<Vec<Inline>>) -> Document {
        Document::new(paragraphs.into_iter().map(Paragraph::new).collect())
    }

    #[test]
    fn test_empty_document() {
        let d = Document::default();
        assert_eq!(d.paragraphs().len(), 1);
        assert_eq!(d.size(), 2);
        assert_eq!(Document::new(vec![]), d);
    }

    #[test]
    fn test_sizes() {
        let d = doc(vec![
            vec![Inline::text("Happy")],
            vec![Inline::chip("Sunny")],
        ]);
        assert_eq!(d.size(), 10);
        assert_eq!(d.paragraph_start(1), Some(7));
        assert_eq!(d.paragraph_start(2), None);
    }

    #[test]
    fn test_resolve() {
        let d = doc(vec![
            vec![Inline::text("ab")],
            vec![Inline::chip("Sunny")],
        ]);
        // <p> a b </p><p> chip </p>
        // 0  1 2 3    4  5    6    7
        assert_eq!(d.resolve(0), Some(ResolvedPos::Block { index: 0 }));
        assert_eq!(
            d.resolve(1),
            Some(ResolvedPos::Inline {
                paragraph: 0,
                start: 0,
                offset: 0
            })
        );
        assert_eq!(
            d.resolve(3),
            Some(ResolvedPos::Inline {
                paragraph: 0,
                start: 0,
                offset: 2
            })
        );
        assert_eq!(d.resolve(4), Some(ResolvedPos::Block { index: 1 }));
        assert_eq!(
            d.resolve(6),
            Some(ResolvedPos::Inline {
                paragraph: 1,
                start: 4,
                offset: 1
            })
        );
        assert_eq!(d.resolve(7), Some(ResolvedPos::Block { index: 2 }));
        assert_eq!(d.resolve(8), None);
    }

    #[test]
    fn test_has_node_after() {
        let d = doc(vec![vec![Inline::chip("Happy")]]);
        assert!(d.has_node_after(0));
        assert!(d.has_node_after(1));
        assert!(!d.has_node_after(2));
        assert!(!d.has_node_after(3));
    }

    #[test]
    fn test_chip_at() {
        let d = doc(vec![vec![
            Inline::text("hi "),
            Inline::chip("Happy"),
            Inline::chip("Sunny"),
        ]]);
        assert_eq!(d.chip_at(4).map(Chip::text), Some("Happy"));
        assert_eq!(d.chip_at(5).map(Chip::text), Some("Sunny"));
        assert!(d.chip_at(1).is_none());
        assert!(d.chip_at(0).is_none());
        assert!(d.chip_at(6).is_none());
        assert!(d.chip_at(100).is_none());
    }

    #[test]
    fn test_chips_positions() {
        let d = doc(vec![
            vec![Inline::chip("Happy")],
            vec![Inline::text("x"), Inline::chip("Sunny")],
        ]);
        let chips: Vec<_> = d.chips().into_iter().map(|(p, c)| (p, c.text())).collect();
        assert_eq!(chips, vec![(1, "Happy"), (5, "Sunny")]);
        assert_eq!(d.chip_count(), 2);
    }

    #[test]
    fn test_normalize_merges_text() {
        let p = Paragraph::new(vec![
            Inline::text("ab"),
            Inline::text(""),
            Inline::text("cd"),
            Inline::chip("X"),
        ]);
        assert_eq!(p.content(), &[Inline::text("abcd"), Inline::chip("X")]);
    }

    #[test]
    fn test_chip_trims_label() {
        assert_eq!(Chip::new("  Happy ").text(), "Happy");
    }

    #[test]
    fn test_insert_inside_text() {
        let mut d = doc(vec![vec![Inline::text("héllo")]]);
        d.insert_inline(3, Inline::chip("X")).unwrap();
        assert_eq!(
            d.paragraphs()[0].content(),
            &[Inline::text("hé"), Inline::chip("X"), Inline::text("llo")]
        );
    }

    #[test]
    fn test_insert_at_block_position_fails() {
        let mut d = Document::default();
        assert_eq!(
            d.insert_inline(0, Inline::chip("X")),
            Err(EditError::NotInline(0))
        );
        assert_eq!(
            d.insert_inline(9, Inline::chip("X")),
            Err(EditError::OutOfBounds { pos: 9, size: 2 })
        );
        assert_eq!(d, Document::default());
    }

    #[test]
    fn test_delete_within_paragraph() {
        let mut d = doc(vec![vec![
            Inline::text("ab"),
            Inline::chip("X"),
            Inline::text("cd"),
        ]]);
        d.delete_range(3, 4).unwrap();
        assert_eq!(d.paragraphs()[0].content(), &[Inline::text("abcd")]);
    }

    #[test]
    fn test_delete_across_paragraphs_joins() {
        let mut d = doc(vec![vec![Inline::text("ab")], vec![Inline::text("cd")]]);
        // end of first content is 3, start of second content is 5
        d.delete_range(3, 5).unwrap();
        assert_eq!(d.paragraphs().len(), 1);
        assert_eq!(d.text_content(), "abcd");
    }

    #[test]
    fn test_delete_rejects_block_endpoints() {
        let mut d = doc(vec![vec![Inline::text("ab")]]);
        assert_eq!(
            d.delete_range(0, 4),
            Err(EditError::SplitsNode { from: 0, to: 4 })
        );
        assert_eq!(
            d.delete_range(3, 1),
            Err(EditError::InvalidRange {
                from: 3,
                to: 1,
                size: 4
            })
        );
    }

    #[test]
    fn test_split_paragraph() {
        let mut d = doc(vec![vec![Inline::text("abcd")]]);
        d.split_paragraph(3).unwrap();
        assert_eq!(d.text_content(), "ab\ncd");
        assert_eq!(d.size(), 8);
    }
}
