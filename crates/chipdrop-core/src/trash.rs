//! Trash drop target: containment and hover state.

use crate::types::{Point, Rect};

/// Hover tracking for the trash target.
///
/// Only records what has been pushed to the platform, so repeated moves over
/// the same side of the border don't re-toggle the class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrashState {
    hover: bool,
}

impl TrashState {
    pub fn is_hovered(&self) -> bool {
        self.hover
    }

    /// Update the hover flag. Returns the new value if it changed.
    pub fn update(&mut self, hover: bool) -> Option<bool> {
        if self.hover == hover {
            return None;
        }
        self.hover = hover;
        Some(hover)
    }

    /// Clear the hover flag. Returns `Some(false)` if it was set.
    pub fn clear(&mut self) -> Option<bool> {
        self.update(false)
    }
}

/// Whether `point` is inside the trash. Points on the border count.
pub fn is_inside(bounds: Option<Rect>, point: Point) -> bool {
    bounds.is_some_and(|rect| rect.contains(point))
}
