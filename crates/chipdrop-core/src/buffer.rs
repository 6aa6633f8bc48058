//! Document storage abstraction.
//!
//! The `DocumentBuffer` trait is the narrow interface the editor uses to read
//! the current document and install a new one after a transaction commits.
//! `Document` itself is the plain implementation; `UndoableBuffer` wraps any
//! buffer and records history.

use crate::node::{Chip, Document};
use crate::types::Selection;

/// Storage for the current document state.
pub trait DocumentBuffer {
    /// The current document.
    fn doc(&self) -> &Document;

    /// Install a new document state.
    ///
    /// `selection_before` is the selection that was current before the change,
    /// so history implementations can restore it.
    fn replace(&mut self, doc: Document, selection_before: Selection);

    /// Size of the position space.
    fn size(&self) -> usize {
        self.doc().size()
    }

    /// The chip starting at `pos`, if any.
    fn chip_at(&self, pos: usize) -> Option<&Chip> {
        self.doc().chip_at(pos)
    }
}

impl DocumentBuffer for Document {
    fn doc(&self) -> &Document {
        self
    }

    fn replace(&mut self, doc: Document, _selection_before: Selection) {
        *self = doc;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Inline, Paragraph};

    #[test]
    fn test_plain_document_buffer() {
        let mut buf = Document::default();
        assert_eq!(buf.size(), 2);

        let next = Document::new(vec![Paragraph::new(vec![Inline::chip("Happy")])]);
        buf.replace(next.clone(), Selection::collapsed(1));
        assert_eq!(buf, next);
        assert_eq!(buf.chip_at(1).map(Chip::text), Some("Happy"));
    }
}
