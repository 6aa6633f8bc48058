//! Error types for document edits and configuration.

use smol_str::SmolStr;
use thiserror::Error;

/// Errors that can occur while building or applying a document edit.
///
/// None of these are fatal: a failed edit leaves the document untouched and
/// the triggering gesture simply has no effect.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EditError {
    /// A position lies outside `0..=size`.
    #[error("position {pos} is outside the document (size {size})")]
    OutOfBounds { pos: usize, size: usize },

    /// A range extends past the end of the document or is inverted.
    #[error("range {from}..{to} is invalid for a document of size {size}")]
    InvalidRange { from: usize, to: usize, size: usize },

    /// A chip reference no longer points at the chip it was taken from.
    #[error("no chip {expected:?} at position {pos}")]
    StaleChip { pos: usize, expected: SmolStr },

    /// The dragged chip's element left the page before the drop.
    #[error("dragged chip {expected:?} is no longer in the document")]
    DetachedChip { expected: SmolStr },

    /// A position that must be inside a paragraph sits between blocks.
    #[error("position {0} is not inside a paragraph")]
    NotInline(usize),

    /// A range would cut through a chip or cross a structure that can't be joined.
    #[error("range {from}..{to} does not cover whole nodes")]
    SplitsNode { from: usize, to: usize },

    /// Label text was empty after trimming.
    #[error("label text is empty")]
    EmptyLabel,

    /// The point could not be mapped to a document position.
    #[error("no document position under the pointer")]
    Unresolved,
}

/// Errors from validating an [`EditorConfig`](crate::config::EditorConfig).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// A palette word is empty after trimming.
    #[error("palette word {index} is empty")]
    EmptyWord { index: usize },

    /// A selector or class name is empty.
    #[error("`{0}` must not be empty")]
    EmptyName(&'static str),

    /// History depth of zero would make every edit un-undoable.
    #[error("history depth must be at least 1")]
    ZeroHistory,
}
