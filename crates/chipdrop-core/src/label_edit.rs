//! Editing a chip's label in place.
//!
//! A label edit holds the input: from the moment the prompt opens until it is
//! answered or dismissed, no drag may start. [`LabelEdit`] is that hold; the
//! drag controller owns at most one.

use crate::document::EditorDocument;
use crate::error::EditError;
use crate::mutator::{ChipRef, EditOutcome, label_chip, validate_chip};
use crate::node::Inline;
use crate::types::Selection;

/// An open label edit for one chip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEdit {
    chip: ChipRef,
}

impl LabelEdit {
    pub fn new(chip: ChipRef) -> Self {
        Self { chip }
    }

    pub fn chip(&self) -> &ChipRef {
        &self.chip
    }

    /// Resolve the edit with the prompt's answer.
    ///
    /// `None` (dismissed) changes nothing. Otherwise the chip is replaced at
    /// the same position by one carrying the trimmed answer and the caret is
    /// placed after it.
    pub fn finish<D: EditorDocument>(
        self,
        doc: &mut D,
        answer: Option<&str>,
    ) -> Result<EditOutcome, EditError> {
        match answer {
            None => {
                tracing::debug!(chip = ?self.chip, "label edit dismissed");
                Ok(EditOutcome::Unchanged)
            }
            Some(text) => replace_label(doc, &self.chip, text),
        }
    }
}

/// Replace the label of the chip at `chip.pos` as one transaction.
pub fn replace_label<D: EditorDocument>(
    doc: &mut D,
    chip: &ChipRef,
    text: &str,
) -> Result<EditOutcome, EditError> {
    let result = validate_chip(doc.doc(), chip).and_then(|old| {
        let new = label_chip(text)?;
        if new == old {
            return Ok(None);
        }
        let mut tr = doc.transaction();
        tr.delete(chip.pos, chip.pos + 1)?;
        tr.insert(chip.pos, Inline::Chip(new))?;
        tr.set_selection(Selection::collapsed(chip.pos + 1));
        Ok(Some(tr))
    });

    match result {
        Ok(Some(tr)) => {
            doc.dispatch(tr);
            tracing::debug!(pos = chip.pos, text, "label replaced");
            Ok(EditOutcome::Relabeled { pos: chip.pos })
        }
        Ok(None) => {
            doc.set_caret(chip.pos + 1);
            Ok(EditOutcome::Unchanged)
        }
        Err(err) => {
            tracing::warn!(?chip, %err, "label edit rejected");
            Err(err)
        }
    }
}
