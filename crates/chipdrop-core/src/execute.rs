//! Action execution for editor documents.
//!
//! This module provides the `execute_action` function that applies `EditorAction`
//! operations to any type implementing `EditorDocument`. Every action that edits
//! builds one transaction, so each is a single undo step.

use crate::actions::{EditorAction, Range};
use crate::document::EditorDocument;
use crate::error::EditError;
use crate::node::{Inline, ResolvedPos};
use crate::resolve::fit_inline;
use crate::transaction::Transaction;
use crate::types::Selection;

/// Execute an editor action on a document.
///
/// This is the central dispatch point for text editing operations.
/// Returns true if the action was handled.
pub fn execute_action<D: EditorDocument>(doc: &mut D, action: &EditorAction) -> bool {
    let result = match action {
        EditorAction::Insert { text, range } => execute_insert(doc, text, *range),
        EditorAction::InsertParagraph { range } => execute_insert_paragraph(doc, *range),
        EditorAction::DeleteBackward { range } => execute_delete_backward(doc, *range),
        EditorAction::DeleteForward { range } => execute_delete_forward(doc, *range),
        EditorAction::Undo => Ok(doc.undo()),
        EditorAction::Redo => Ok(doc.redo()),
        EditorAction::SelectAll => Ok(execute_select_all(doc)),
        EditorAction::MoveCursor { offset } => {
            doc.set_caret(*offset);
            Ok(true)
        }
    };

    result.unwrap_or_else(|err| {
        tracing::warn!(?action, %err, "editor action failed");
        false
    })
}

/// Fit both ends of a range into paragraphs and delete what lies between.
///
/// Returns the transaction and the (inline) position the range collapsed to.
fn delete_selection<D: EditorDocument>(
    doc: &D,
    range: Range,
) -> Result<(Transaction, usize), EditError> {
    let range = range.normalize();
    let size = doc.size();
    let start = fit_inline(doc.doc(), range.start.min(size)).ok_or(EditError::Unresolved)?;
    let end = fit_inline(doc.doc(), range.end.min(size)).ok_or(EditError::Unresolved)?;

    let mut tr = doc.transaction();
    if start < end {
        tr.delete(start, end)?;
    }
    Ok((tr, start))
}

fn execute_insert<D: EditorDocument>(
    doc: &mut D,
    text: &str,
    range: Range,
) -> Result<bool, EditError> {
    let (mut tr, mut at) = delete_selection(doc, range)?;

    // Pasted text may carry CRLF or bare CR line endings.
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            tr.split(at)?;
            at += 2;
        }
        if !line.is_empty() {
            tr.insert(at, Inline::text(line))?;
            at += line.chars().count();
        }
    }

    tr.set_selection(Selection::collapsed(at));
    doc.dispatch(tr);
    Ok(true)
}

fn execute_insert_paragraph<D: EditorDocument>(
    doc: &mut D,
    range: Range,
) -> Result<bool, EditError> {
    let (mut tr, at) = delete_selection(doc, range)?;
    tr.split(at)?;
    tr.set_selection(Selection::collapsed(at + 2));
    doc.dispatch(tr);
    Ok(true)
}

fn execute_delete_backward<D: EditorDocument>(
    doc: &mut D,
    range: Range,
) -> Result<bool, EditError> {
    if !range.is_caret() {
        let (mut tr, at) = delete_selection(doc, range)?;
        tr.set_selection(Selection::collapsed(at));
        doc.dispatch(tr);
        return Ok(true);
    }

    let cursor = range.start;
    let from = match doc.doc().resolve(cursor) {
        Some(ResolvedPos::Inline { offset, .. }) if offset > 0 => cursor - 1,
        // Start of a paragraph: join with the previous one.
        Some(ResolvedPos::Inline {
            paragraph, offset: 0, ..
        }) if paragraph > 0 => cursor - 2,
        _ => return Ok(false),
    };

    let mut tr = doc.transaction();
    tr.delete(from, cursor)?;
    tr.set_selection(Selection::collapsed(from));
    doc.dispatch(tr);
    Ok(true)
}

fn execute_delete_forward<D: EditorDocument>(
    doc: &mut D,
    range: Range,
) -> Result<bool, EditError> {
    if !range.is_caret() {
        let (mut tr, at) = delete_selection(doc, range)?;
        tr.set_selection(Selection::collapsed(at));
        doc.dispatch(tr);
        return Ok(true);
    }

    let cursor = range.start;
    let paragraphs = doc.doc().paragraphs().len();
    let to = match doc.doc().resolve(cursor) {
        Some(ResolvedPos::Inline {
            paragraph, offset, ..
        }) => {
            let content = doc.doc().paragraphs()[paragraph].content_size();
            if offset < content {
                cursor + 1
            } else if paragraph + 1 < paragraphs {
                // End of a paragraph: pull the next one up.
                cursor + 2
            } else {
                return Ok(false);
            }
        }
        _ => return Ok(false),
    };

    let mut tr = doc.transaction();
    tr.delete(cursor, to)?;
    tr.set_selection(Selection::collapsed(cursor));
    doc.dispatch(tr);
    Ok(true)
}

fn execute_select_all<D: EditorDocument>(doc: &mut D) -> bool {
    let size = doc.size();
    doc.set_selection(Selection::new(1, size.saturating_sub(1)));
    true
}
