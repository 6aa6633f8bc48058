//! Browser DOM layer for the chipdrop label editor.
//!
//! This crate implements the `chipdrop-core` platform traits over the DOM and
//! turns browser events into core inputs. It assumes a
//! `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `dom_sync`: rendering, DOM ↔ document position mapping, selection sync
//! - `geometry`: `PositionGeometry` over the rendered surface
//! - `feedback`: `DragPlatform` (dragging class, touch clone, trash hover)
//! - `gesture`: drag and touch events to `Gesture`s
//! - `events`: beforeinput handling
//! - `palette`: palette rendering
//!
//! # Re-exports
//!
//! This crate re-exports `chipdrop-core` for convenience, so consumers
//! only need to depend on `chipdrop-browser`.

// Re-export core crate
pub use chipdrop_core;
pub use chipdrop_core::*;

pub mod dom_sync;
pub mod events;
pub mod feedback;
pub mod geometry;
pub mod gesture;
pub mod palette;

pub use dom_sync::{refresh, render_document, sync_selection_from_dom};
pub use events::{
    BeforeInputContext, BeforeInputResult, handle_beforeinput, parse_browser_input_type,
};
pub use feedback::BrowserDragPlatform;
pub use geometry::BrowserGeometry;
pub use palette::populate_palette;
