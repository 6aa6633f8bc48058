//! Platform abstraction traits for drag feedback.
//!
//! These traits define the interface between the drag state machine and the
//! platform-specific implementation (browser DOM in `chipdrop-browser`, a
//! recording mock in tests). Point↔position geometry lives in
//! [`crate::resolve::PositionGeometry`].

use crate::types::{Point, Rect};

/// Error type for platform operations.
#[derive(Debug, Clone)]
pub struct PlatformError(pub String);

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for PlatformError {}

impl From<&str> for PlatformError {
    fn from(s: &str) -> Self {
        PlatformError(s.to_string())
    }
}

impl From<String> for PlatformError {
    fn from(s: String) -> Self {
        PlatformError(s)
    }
}

/// Visual feedback and hit-testing used by a drag session.
///
/// None of these operations may fail loudly: a missing element simply means
/// there is no feedback to show. Implementations log what they could not do.
pub trait DragPlatform {
    /// Handle to a drag source (palette item or in-document chip).
    type Element: Clone;
    /// Handle to a floating feedback element that follows the pointer.
    type Feedback;

    /// Add or remove the "being dragged" marker on a source element.
    fn mark_dragging(&self, element: &Self::Element, dragging: bool);

    /// Create a floating copy of `element` at `point`.
    ///
    /// `point` is the pointer position; implementations apply their own
    /// anchor offset.
    fn spawn_feedback(&self, element: &Self::Element, point: Point) -> Option<Self::Feedback>;

    /// Move a floating copy so it follows the pointer.
    fn move_feedback(&self, feedback: &Self::Feedback, point: Point);

    /// Remove a floating copy. Consumes the handle so it can only happen once.
    fn remove_feedback(&self, feedback: Self::Feedback);

    /// Toggle the trash hover state.
    fn set_trash_hover(&self, hover: bool);

    /// Viewport bounds of the trash target, if it is on the page.
    fn trash_bounds(&self) -> Option<Rect>;

    /// Viewport bounds of the editable document surface.
    fn document_bounds(&self) -> Option<Rect>;

    /// Current document position of an in-document chip element.
    ///
    /// Resolved at drop time, since earlier edits may have moved the chip.
    fn chip_position(&self, element: &Self::Element) -> Option<usize>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_error_display() {
        let err = PlatformError::from("no trash element");
        assert_eq!(err.to_string(), "no trash element");
        let err: PlatformError = format!("missing {}", "#editor").into();
        assert_eq!(err.0, "missing #editor");
    }
}
