//! Atomic multi-step document edits.
//!
//! A `Transaction` works on a private copy of the document. Steps are applied
//! to that copy one at a time and each records a `StepMap` describing how it
//! shifted positions. Nothing becomes visible until the transaction is
//! dispatched through [`EditorDocument::dispatch`](crate::EditorDocument::dispatch);
//! dropping a transaction (for example after a failed step) discards every
//! step it holds.

use web_time::Instant;

use crate::error::EditError;
use crate::node::{Document, Inline};
use crate::types::{EditInfo, Selection};

/// A single primitive change to the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Insert an inline node at an inline position.
    Insert { pos: usize, node: Inline },
    /// Delete the content between two inline positions.
    Delete { from: usize, to: usize },
    /// Split the paragraph containing `pos`.
    Split { pos: usize },
}

impl Step {
    /// Apply the step, returning how it moved positions.
    ///
    /// On error the document is left exactly as it was.
    pub fn apply(&self, doc: &mut Document) -> Result<StepMap, EditError> {
        match self {
            Step::Insert { pos, node } => {
                doc.insert_inline(*pos, node.clone())?;
                Ok(StepMap::new(*pos, 0, node.node_size()))
            }
            Step::Delete { from, to } => {
                doc.delete_range(*from, *to)?;
                Ok(StepMap::new(*from, to - from, 0))
            }
            Step::Split { pos } => {
                doc.split_paragraph(*pos)?;
                Ok(StepMap::new(*pos, 0, 2))
            }
        }
    }
}

/// Which side a position sticks to when content is inserted exactly there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Assoc {
    /// Stay before inserted content.
    #[default]
    Before,
    /// Move past inserted content.
    After,
}

/// Position mapping for one step: `deleted` units at `pos` were replaced by
/// `inserted` units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepMap {
    pub pos: usize,
    pub deleted: usize,
    pub inserted: usize,
}

impl StepMap {
    pub fn new(pos: usize, deleted: usize, inserted: usize) -> Self {
        Self {
            pos,
            deleted,
            inserted,
        }
    }

    /// Map a position from before the step to after it.
    ///
    /// Positions inside a deleted range collapse onto the edit point.
    pub fn map(&self, pos: usize, assoc: Assoc) -> usize {
        let end = self.pos + self.deleted;
        if pos < self.pos {
            pos
        } else if pos > end {
            pos - self.deleted + self.inserted
        } else {
            match assoc {
                Assoc::Before => self.pos,
                Assoc::After => self.pos + self.inserted,
            }
        }
    }
}

/// A batch of steps committed as one unit.
#[derive(Debug, Clone)]
pub struct Transaction {
    doc: Document,
    steps: Vec<Step>,
    maps: Vec<StepMap>,
    selection: Option<Selection>,
}

impl Transaction {
    /// Start a transaction against the given document state.
    pub fn new(doc: &Document) -> Self {
        Self {
            doc: doc.clone(),
            steps: Vec::new(),
            maps: Vec::new(),
            selection: None,
        }
    }

    /// The document as it looks with every step so far applied.
    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Whether any step changed the document.
    pub fn doc_changed(&self) -> bool {
        !self.steps.is_empty()
    }

    /// Apply a step to the working copy.
    pub fn step(&mut self, step: Step) -> Result<&mut Self, EditError> {
        let map = step.apply(&mut self.doc)?;
        tracing::trace!(?step, ?map, "transaction step");
        self.steps.push(step);
        self.maps.push(map);
        Ok(self)
    }

    pub fn insert(&mut self, pos: usize, node: Inline) -> Result<&mut Self, EditError> {
        self.step(Step::Insert { pos, node })
    }

    pub fn delete(&mut self, from: usize, to: usize) -> Result<&mut Self, EditError> {
        self.step(Step::Delete { from, to })
    }

    pub fn split(&mut self, pos: usize) -> Result<&mut Self, EditError> {
        self.step(Step::Split { pos })
    }

    /// Set the selection that becomes current when the transaction commits.
    pub fn set_selection(&mut self, selection: Selection) -> &mut Self {
        self.selection = Some(selection);
        self
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Map a position from the starting document through every step so far.
    pub fn map(&self, pos: usize, assoc: Assoc) -> usize {
        self.maps.iter().fold(pos, |pos, map| map.map(pos, assoc))
    }

    /// Summary of the transaction, `None` if it changed nothing.
    pub fn edit_info(&self) -> Option<EditInfo> {
        let first = self.maps.first()?;
        Some(EditInfo {
            edit_pos: first.pos,
            inserted_len: self.maps.iter().map(|m| m.inserted).sum(),
            deleted_len: self.maps.iter().map(|m| m.deleted).sum(),
            steps: self.maps.len(),
            doc_size_after: self.doc.size(),
            timestamp: Instant::now(),
        })
    }

    /// Consume the transaction into its resulting document and selection.
    pub(crate) fn into_parts(self) -> (Document, Option<Selection>) {
        (self.doc, self.selection)
    }
}
