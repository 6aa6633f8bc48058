//! Chip insertion, relocation and deletion.
//!
//! Every edit is validated against the current document and built as a
//! single [`Transaction`]. If any check or step fails the transaction is
//! dropped, the failure is logged, and the document stays as it was.

use smol_str::SmolStr;

use crate::document::EditorDocument;
use crate::error::EditError;
use crate::node::{Chip, Document, Inline, ResolvedPos};
use crate::resolve::fit_inline;
use crate::transaction::{Assoc, Transaction};
use crate::types::Selection;

/// A chip as seen at some earlier point: where it was and what it said.
///
/// References go stale when other edits shift positions, so they are always
/// re-checked against the live document before use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipRef {
    pub pos: usize,
    pub text: SmolStr,
}

impl ChipRef {
    pub fn new(pos: usize, text: impl Into<SmolStr>) -> Self {
        Self {
            pos,
            text: text.into(),
        }
    }
}

/// A chip edit requested by a drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Palette item dropped into the document.
    InsertNew { pos: usize, text: SmolStr },
    /// Existing chip dragged to a new position.
    Relocate { chip: ChipRef, target: usize },
    /// Existing chip dropped on the trash.
    Delete { chip: ChipRef },
}

/// What a successful edit did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Inserted { pos: usize },
    Moved { from: usize, to: usize },
    Deleted { pos: usize },
    Relabeled { pos: usize },
    /// The edit was valid but had no effect (a chip dropped onto itself).
    Unchanged,
}

/// Knobs for chip insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MutatorOptions {
    /// Surround newly inserted chips with spaces and put the caret after the
    /// trailing one.
    pub pad_with_spaces: bool,
}

/// Apply a chip edit as one transaction.
pub fn apply_edit<D: EditorDocument>(
    doc: &mut D,
    edit: &Edit,
    options: MutatorOptions,
) -> Result<EditOutcome, EditError> {
    let result = build_edit(doc.doc(), edit, options);
    match result {
        Ok((Some(tr), outcome)) => {
            doc.dispatch(tr);
            tracing::debug!(?outcome, "chip edit applied");
            Ok(outcome)
        }
        Ok((None, outcome)) => Ok(outcome),
        Err(err) => {
            tracing::warn!(?edit, %err, "chip edit rejected");
            Err(err)
        }
    }
}

fn build_edit(
    doc: &Document,
    edit: &Edit,
    options: MutatorOptions,
) -> Result<(Option<Transaction>, EditOutcome), EditError> {
    match edit {
        Edit::InsertNew { pos, text } => {
            let chip = label_chip(text)?;
            let mut tr = Transaction::new(doc);
            let at = insertion_point(tr.doc(), *pos)?;
            let at = insert_chip(&mut tr, at, chip, options)?;
            Ok((Some(tr), EditOutcome::Inserted { pos: at }))
        }
        Edit::Relocate { chip, target } => {
            let node = validate_chip(doc, chip)?;
            let mut tr = Transaction::new(doc);
            let target = (*target).min(doc.size());
            tr.delete(chip.pos, chip.pos + 1)?;
            // Re-clamp against the post-deletion document.
            let mapped = tr.map(target, Assoc::Before).min(tr.doc().size());
            let at = insertion_point(tr.doc(), mapped)?;
            // Landing where the chip came out of leaves the document as it was.
            if at == chip.pos {
                return Ok((None, EditOutcome::Unchanged));
            }
            tr.insert(at, Inline::Chip(node))?;
            tr.set_selection(Selection::collapsed(at + 1));
            Ok((Some(tr), EditOutcome::Moved { from: chip.pos, to: at }))
        }
        Edit::Delete { chip } => {
            validate_chip(doc, chip)?;
            let mut tr = Transaction::new(doc);
            tr.delete(chip.pos, chip.pos + 1)?;
            tr.set_selection(Selection::collapsed(chip.pos));
            Ok((Some(tr), EditOutcome::Deleted { pos: chip.pos }))
        }
    }
}

/// Build a chip from label text, rejecting empty labels.
pub(crate) fn label_chip(text: &str) -> Result<Chip, EditError> {
    let chip = Chip::new(text);
    if chip.text().is_empty() {
        return Err(EditError::EmptyLabel);
    }
    Ok(chip)
}

/// Check that `chip` still names a live chip node with the expected label.
pub(crate) fn validate_chip(doc: &Document, chip: &ChipRef) -> Result<Chip, EditError> {
    let size = doc.size();
    if chip.pos + 1 > size {
        return Err(EditError::OutOfBounds {
            pos: chip.pos + 1,
            size,
        });
    }
    match doc.chip_at(chip.pos) {
        Some(node) if node.text() == chip.text.trim() => Ok(node.clone()),
        _ => Err(EditError::StaleChip {
            pos: chip.pos,
            expected: chip.text.clone(),
        }),
    }
}

/// Clamp a target into the document and move it inside a paragraph.
fn insertion_point(doc: &Document, pos: usize) -> Result<usize, EditError> {
    let clamped = pos.min(doc.size());
    fit_inline(doc, clamped).ok_or(EditError::NotInline(clamped))
}

/// Insert `chip` at an inline position and place the caret after it.
///
/// Returns the position the chip ended up at.
fn insert_chip(
    tr: &mut Transaction,
    pos: usize,
    chip: Chip,
    options: MutatorOptions,
) -> Result<usize, EditError> {
    if !options.pad_with_spaces {
        tr.insert(pos, Inline::Chip(chip))?;
        tr.set_selection(Selection::collapsed(pos + 1));
        return Ok(pos);
    }

    let at_paragraph_start = matches!(
        tr.doc().resolve(pos),
        Some(ResolvedPos::Inline { offset: 0, .. })
    );
    let mut at = pos;
    if !at_paragraph_start {
        tr.insert(at, Inline::text(" "))?;
        at += 1;
    }
    tr.insert(at, Inline::Chip(chip))?;
    tr.insert(at + 1, Inline::text(" "))?;
    tr.set_selection(Selection::collapsed(at + 2));
    Ok(at)
}
