//! Undo/redo management for committed transactions.
//!
//! Provides:
//! - `UndoManager` trait for abstracting undo implementations
//! - `UndoableBuffer<T>` - wraps a DocumentBuffer and provides undo/redo

use crate::buffer::DocumentBuffer;
use crate::node::Document;
use crate::types::Selection;

/// Trait for managing undo/redo operations.
///
/// Implementations must actually perform the undo/redo, not just track state.
/// Undo and redo return the selection to restore, or `None` when there was
/// nothing to do.
pub trait UndoManager {
    /// Check if undo is available.
    fn can_undo(&self) -> bool;

    /// Check if redo is available.
    fn can_redo(&self) -> bool;

    /// Perform undo. `current` is the selection at the time of the call.
    fn undo(&mut self, current: Selection) -> Option<Selection>;

    /// Perform redo. `current` is the selection at the time of the call.
    fn redo(&mut self, current: Selection) -> Option<Selection>;

    /// Clear all undo/redo history.
    fn clear_history(&mut self);
}

/// A recorded document state.
#[derive(Debug, Clone)]
struct Snapshot {
    doc: Document,
    selection: Selection,
}

/// A DocumentBuffer wrapper that records every replaced state.
///
/// Documents are small (a handful of paragraphs and chips), so whole-state
/// snapshots are kept rather than inverted steps.
pub struct UndoableBuffer<T> {
    buffer: T,
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    max_steps: usize,
}

impl<T: Clone> Clone for UndoableBuffer<T> {
    fn clone(&self) -> Self {
        Self {
            buffer: self.buffer.clone(),
            undo_stack: self.undo_stack.clone(),
            redo_stack: self.redo_stack.clone(),
            max_steps: self.max_steps,
        }
    }
}

impl<T: DocumentBuffer + Default> Default for UndoableBuffer<T> {
    fn default() -> Self {
        Self::new(T::default(), 100)
    }
}

impl<T: DocumentBuffer> UndoableBuffer<T> {
    /// Create a new undoable buffer wrapping the given buffer.
    pub fn new(buffer: T, max_steps: usize) -> Self {
        Self {
            buffer,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_steps,
        }
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    fn snapshot(&self, selection: Selection) -> Snapshot {
        Snapshot {
            doc: self.buffer.doc().clone(),
            selection,
        }
    }
}

impl<T: DocumentBuffer> DocumentBuffer for UndoableBuffer<T> {
    fn doc(&self) -> &Document {
        self.buffer.doc()
    }

    fn replace(&mut self, doc: Document, selection_before: Selection) {
        // Clear redo stack on new edit
        self.redo_stack.clear();
        let snapshot = self.snapshot(selection_before);
        self.undo_stack.push(snapshot);

        // Trim if over max
        while self.undo_stack.len() > self.max_steps {
            self.undo_stack.remove(0);
        }

        self.buffer.replace(doc, selection_before);
    }
}

impl<T: DocumentBuffer> UndoManager for UndoableBuffer<T> {
    fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    fn undo(&mut self, current: Selection) -> Option<Selection> {
        let snapshot = self.undo_stack.pop()?;
        let redo = self.snapshot(current);
        self.redo_stack.push(redo);
        self.buffer.replace(snapshot.doc, current);
        Some(snapshot.selection)
    }

    fn redo(&mut self, current: Selection) -> Option<Selection> {
        let snapshot = self.redo_stack.pop()?;
        let undo = self.snapshot(current);
        self.undo_stack.push(undo);
        self.buffer.replace(snapshot.doc, current);
        Some(snapshot.selection)
    }

    fn clear_history(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Inline, Paragraph};

    fn chips(texts: &[&str]) -> Document {
        Document::new(vec![Paragraph::new(
            texts.iter().map(|t| Inline::chip(t)).collect(),
        )])
    }

    #[test]
    fn test_replace_undo_redo() {
        let mut buf = UndoableBuffer::new(Document::default(), 100);
        assert!(!buf.can_undo());

        buf.replace(chips(&["Happy"]), Selection::collapsed(1));
        assert_eq!(buf.doc().chip_texts(), vec!["Happy"]);
        assert!(buf.can_undo());

        assert_eq!(buf.undo(Selection::collapsed(2)), Some(Selection::collapsed(1)));
        assert_eq!(buf.doc(), &Document::default());
        assert!(!buf.can_undo());
        assert!(buf.can_redo());

        assert_eq!(buf.redo(Selection::collapsed(1)), Some(Selection::collapsed(2)));
        assert_eq!(buf.doc().chip_texts(), vec!["Happy"]);
        assert!(buf.can_undo());
        assert!(!buf.can_redo());
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut buf = UndoableBuffer::new(Document::default(), 100);
        buf.replace(chips(&["A"]), Selection::collapsed(1));
        assert!(buf.undo(Selection::collapsed(2)).is_some());
        assert!(buf.can_redo());

        buf.replace(chips(&["B"]), Selection::collapsed(1));
        assert!(!buf.can_redo());
    }

    #[test]
    fn test_max_steps() {
        let mut buf = UndoableBuffer::new(Document::default(), 2);
        buf.replace(chips(&["A"]), Selection::collapsed(1));
        buf.replace(chips(&["A", "B"]), Selection::collapsed(2));
        buf.replace(chips(&["A", "B", "C"]), Selection::collapsed(3)); // evicts the empty state

        assert_eq!(buf.undo_depth(), 2);
        assert!(buf.undo(Selection::collapsed(4)).is_some());
        assert!(buf.undo(Selection::collapsed(3)).is_some());
        assert!(buf.undo(Selection::collapsed(2)).is_none());
        assert_eq!(buf.doc().chip_texts(), vec!["A"]);
    }

    #[test]
    fn test_nothing_to_undo() {
        let mut buf: UndoableBuffer<Document> = UndoableBuffer::default();
        assert_eq!(buf.undo(Selection::collapsed(1)), None);
        assert_eq!(buf.redo(Selection::collapsed(1)), None);
    }
}
