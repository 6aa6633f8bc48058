//! Core editor document trait and implementations.
//!
//! Defines the `EditorDocument` trait for abstracting editor state, allowing
//! different storage strategies (plain fields vs reactive cells) while sharing
//! the transaction dispatch and history logic.

use crate::buffer::DocumentBuffer;
use crate::node::{Chip, Document};
use crate::transaction::{Assoc, Transaction};
use crate::types::{EditInfo, Selection};
use crate::undo::{UndoManager, UndoableBuffer};

/// Core trait for editor documents.
///
/// The trait is generic over the buffer type, which must implement both
/// `DocumentBuffer` (for document access) and `UndoManager` (for undo/redo).
pub trait EditorDocument {
    /// The buffer type used for document storage and undo.
    type Buffer: DocumentBuffer + UndoManager;

    // === Required: Buffer access ===

    /// Get a reference to the underlying buffer.
    fn buffer(&self) -> &Self::Buffer;

    /// Get a mutable reference to the underlying buffer.
    fn buffer_mut(&mut self) -> &mut Self::Buffer;

    // === Required: Selection state ===

    /// Get the current selection.
    fn selection(&self) -> Selection;

    /// Set the selection.
    fn set_selection(&mut self, selection: Selection);

    // === Required: Edit tracking ===

    /// Get the last edit info, if any.
    fn last_edit(&self) -> Option<EditInfo>;

    /// Set the last edit info.
    fn set_last_edit(&mut self, edit: Option<EditInfo>);

    // === Provided: Convenience accessors ===

    /// The current document.
    fn doc(&self) -> &Document {
        self.buffer().doc()
    }

    /// Size of the position space.
    fn size(&self) -> usize {
        self.buffer().size()
    }

    /// The chip starting at `pos`, if any.
    fn chip_at(&self, pos: usize) -> Option<&Chip> {
        self.buffer().chip_at(pos)
    }

    /// Caret position (selection head).
    fn caret(&self) -> usize {
        self.selection().head
    }

    /// Collapse the selection to `pos`, clamped to the document.
    fn set_caret(&mut self, pos: usize) {
        let pos = pos.min(self.size());
        self.set_selection(Selection::collapsed(pos));
    }

    // === Provided: Transactions ===

    /// Start a transaction against the current document.
    fn transaction(&self) -> Transaction {
        Transaction::new(self.doc())
    }

    /// Commit a transaction as a single atomic change.
    ///
    /// The new document and selection become visible together and form one
    /// history entry. A transaction without steps only updates the selection.
    /// Returns the edit summary, or `None` if the document did not change.
    fn dispatch(&mut self, tr: Transaction) -> Option<EditInfo> {
        let info = tr.edit_info();
        let current = self.selection();
        let mapped = Selection::new(
            tr.map(current.anchor, Assoc::After),
            tr.map(current.head, Assoc::After),
        );
        let changed = tr.doc_changed();
        let (doc, selection) = tr.into_parts();

        if changed {
            self.buffer_mut().replace(doc, current);
            self.set_last_edit(info.clone());
        }

        let size = self.size();
        self.set_selection(selection.unwrap_or(mapped).clamp(size));

        if let Some(info) = &info {
            tracing::debug!(
                pos = info.edit_pos,
                inserted = info.inserted_len,
                deleted = info.deleted_len,
                steps = info.steps,
                size = info.doc_size_after,
                "dispatched transaction"
            );
        }
        info
    }

    // === Provided: Undo/Redo ===

    fn undo(&mut self) -> bool {
        let current = self.selection();
        match self.buffer_mut().undo(current) {
            Some(selection) => {
                let size = self.size();
                self.set_selection(selection.clamp(size));
                self.set_last_edit(None);
                true
            }
            None => false,
        }
    }

    fn redo(&mut self) -> bool {
        let current = self.selection();
        match self.buffer_mut().redo(current) {
            Some(selection) => {
                let size = self.size();
                self.set_selection(selection.clamp(size));
                self.set_last_edit(None);
                true
            }
            None => false,
        }
    }

    fn can_undo(&self) -> bool {
        self.buffer().can_undo()
    }

    fn can_redo(&self) -> bool {
        self.buffer().can_redo()
    }

    fn clear_history(&mut self) {
        self.buffer_mut().clear_history();
    }
}

/// Simple field-based implementation of EditorDocument.
///
/// Stores selection and edit state as plain fields.
/// Use this for non-reactive contexts or as a base for testing.
#[derive(Clone)]
pub struct PlainEditor<T: DocumentBuffer + UndoManager> {
    buffer: T,
    selection: Selection,
    last_edit: Option<EditInfo>,
}

impl<T: DocumentBuffer + UndoManager + Default> Default for PlainEditor<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: DocumentBuffer + UndoManager> PlainEditor<T> {
    /// Create a new editor with the given buffer.
    pub fn new(buffer: T) -> Self {
        Self {
            buffer,
            selection: Selection::default(),
            last_edit: None,
        }
    }
}

/// The standard local editor: a plain document with bounded history.
pub type LocalEditor = PlainEditor<UndoableBuffer<Document>>;

impl LocalEditor {
    /// Create an editor over `doc` keeping at most `history_depth` undo steps.
    pub fn with_document(doc: Document, history_depth: usize) -> Self {
        Self::new(UndoableBuffer::new(doc, history_depth))
    }
}

impl<T: DocumentBuffer + UndoManager> EditorDocument for PlainEditor<T> {
    type Buffer = T;

    fn buffer(&self) -> &Self::Buffer {
        &self.buffer
    }

    fn buffer_mut(&mut self) -> &mut Self::Buffer {
        &mut self.buffer
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    fn last_edit(&self) -> Option<EditInfo> {
        self.last_edit.clone()
    }

    fn set_last_edit(&mut self, edit: Option<EditInfo>) {
        self.last_edit = edit;
    }
}
