//! Editor actions and input types.
//!
//! Platform-agnostic definitions for text editing operations. The `EditorAction`
//! enum represents semantic editing operations, while `InputType` represents the
//! semantic intent from input events (browser beforeinput, programmatic input).
//! Chip placement is not an action here; it goes through [`crate::mutator`].

/// A range in the document, in document positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub start: usize,
    pub end: usize,
}

impl Range {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn is_caret(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Normalize range so start <= end.
    pub fn normalize(self) -> Self {
        if self.start <= self.end {
            self
        } else {
            Self {
                start: self.end,
                end: self.start,
            }
        }
    }
}

impl From<std::ops::Range<usize>> for Range {
    fn from(r: std::ops::Range<usize>) -> Self {
        Self::new(r.start, r.end)
    }
}

impl From<Range> for std::ops::Range<usize> {
    fn from(r: Range) -> Self {
        r.start..r.end
    }
}

/// Semantic input types from input events.
///
/// A subset of the W3C Input Events `inputType` values: the ones a paragraph
/// and chip document can act on, plus a catch-all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputType {
    // === Insertion ===
    /// Insert typed text.
    InsertText,
    /// Insert text from IME composition.
    InsertCompositionText,
    /// Insert a line break (Shift+Enter). Treated as a paragraph break.
    InsertLineBreak,
    /// Insert a paragraph break (Enter).
    InsertParagraph,
    /// Insert from paste operation.
    InsertFromPaste,
    /// Insert dropped content. Chip drops the placement engine declined
    /// arrive here as plain text.
    InsertFromDrop,
    /// Insert replacement text (e.g., spell check correction).
    InsertReplacementText,

    // === Deletion ===
    /// Delete content backward (Backspace).
    DeleteContentBackward,
    /// Delete content forward (Delete key).
    DeleteContentForward,
    /// Delete word backward (Ctrl/Alt+Backspace).
    DeleteWordBackward,
    /// Delete word forward (Ctrl/Alt+Delete).
    DeleteWordForward,
    /// Delete by cut operation.
    DeleteByCut,
    /// Generic content deletion.
    DeleteContent,
    /// Removal of dragged content from its source. Chip moves are applied by
    /// the drag controller, so this never maps to an action.
    DeleteByDrag,

    // === History ===
    HistoryUndo,
    HistoryRedo,

    // === Unknown ===
    /// Unrecognized input type.
    Unknown(String),
}

impl InputType {
    /// Map an input type to an editor action over `range`.
    ///
    /// `data` is the text carried by the input event, if any. Returns `None`
    /// for input types the document does not handle.
    pub fn to_action(&self, data: Option<&str>, range: Range) -> Option<EditorAction> {
        let action = match self {
            Self::InsertText
            | Self::InsertCompositionText
            | Self::InsertFromPaste
            | Self::InsertFromDrop
            | Self::InsertReplacementText => EditorAction::Insert {
                text: data?.to_string(),
                range,
            },
            Self::InsertLineBreak | Self::InsertParagraph => {
                EditorAction::InsertParagraph { range }
            }
            Self::DeleteContentBackward | Self::DeleteWordBackward => {
                EditorAction::DeleteBackward { range }
            }
            Self::DeleteContentForward | Self::DeleteWordForward => {
                EditorAction::DeleteForward { range }
            }
            Self::DeleteByCut | Self::DeleteContent if !range.is_caret() => {
                EditorAction::DeleteBackward { range }
            }
            Self::HistoryUndo => EditorAction::Undo,
            Self::HistoryRedo => EditorAction::Redo,
            _ => return None,
        };
        Some(action)
    }
}

/// All possible text editing actions.
///
/// These represent semantic operations on the document, decoupled from
/// how they're triggered (keyboard, touch, programmatic).
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    /// Insert text at the given range (replacing any selected content).
    /// Newlines in `text` become paragraph breaks.
    Insert { text: String, range: Range },

    /// Split the paragraph at the range (Enter).
    InsertParagraph { range: Range },

    /// Delete content backward (Backspace).
    DeleteBackward { range: Range },

    /// Delete content forward (Delete key).
    DeleteForward { range: Range },

    /// Undo the last change.
    Undo,

    /// Redo the last undone change.
    Redo,

    /// Select all content.
    SelectAll,

    /// Move cursor to position.
    MoveCursor { offset: usize },
}
