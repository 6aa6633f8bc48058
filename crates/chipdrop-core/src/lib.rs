//! chipdrop-core: Document model and drag-and-drop placement engine.
//!
//! This crate provides:
//! - `Document` - paragraphs of text and atomic chips over a flat position space
//! - `Transaction` - atomic multi-step edits, committed through `EditorDocument`
//! - `UndoableBuffer<T>` - bounded undo/redo over committed transactions
//! - Coordinate resolution, chip insert/move/delete, and the drag state machine
//!
//! Nothing here touches the DOM. Platform work sits behind the
//! `PositionGeometry` and `DragPlatform` traits.

pub mod actions;
pub mod buffer;
pub mod config;
pub mod document;
pub mod error;
pub mod execute;
pub mod label_edit;
pub mod mutator;
pub mod node;
pub mod palette;
pub mod platform;
pub mod render;
pub mod resolve;
pub mod session;
pub mod transaction;
pub mod trash;
pub mod types;
pub mod undo;

pub use actions::{EditorAction, InputType, Range};
pub use buffer::DocumentBuffer;
pub use config::{ClassNames, EditorConfig, FeedbackConfig, Selectors};
pub use document::{EditorDocument, LocalEditor, PlainEditor};
pub use error::{ConfigError, EditError};
pub use execute::execute_action;
pub use label_edit::{LabelEdit, replace_label};
pub use mutator::{ChipRef, Edit, EditOutcome, MutatorOptions, apply_edit};
pub use node::{Chip, Document, Inline, Paragraph, ResolvedPos};
pub use palette::{DEFAULT_WORDS, Palette, PaletteItem};
pub use platform::{DragPlatform, PlatformError};
pub use render::{render_editor_html, render_html};
pub use resolve::{PositionGeometry, correct_trailing_edge, fit_inline, resolve_drop_position};
pub use session::{
    DragController, DragOrigin, DragState, DropOutcome, Gesture, GesturePhase, Modality,
};
pub use smol_str::SmolStr;
pub use transaction::{Assoc, Step, StepMap, Transaction};
pub use types::{EditInfo, Point, Rect, Selection};
pub use undo::{UndoManager, UndoableBuffer};
