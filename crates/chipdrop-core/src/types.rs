//! Core editor types: selection, screen geometry, and edit tracking.
//!
//! These types are framework-agnostic and shared by the document model,
//! the drag state machine and the platform layers.

use std::ops::Range;

use web_time::Instant;

/// Selection with anchor and head positions in document position space.
///
/// The anchor is where the selection started, the head is where the caret is now.
/// They may be in any order - use `start()` and `end()` for ordered bounds.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Where selection started
    pub anchor: usize,
    /// Where caret is now
    pub head: usize,
}

impl Selection {
    /// Create a new selection.
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// Create a collapsed selection (caret position).
    pub fn collapsed(pos: usize) -> Self {
        Self {
            anchor: pos,
            head: pos,
        }
    }

    /// Get the start (lower bound) of the selection.
    pub fn start(&self) -> usize {
        self.anchor.min(self.head)
    }

    /// Get the end (upper bound) of the selection.
    pub fn end(&self) -> usize {
        self.anchor.max(self.head)
    }

    /// Check if the selection is collapsed (caret only).
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.head
    }

    /// Check if a position is within the selection.
    pub fn contains(&self, pos: usize) -> bool {
        pos >= self.start() && pos < self.end()
    }

    /// Get the selection length.
    pub fn len(&self) -> usize {
        self.end() - self.start()
    }

    /// Check if empty (same as is_collapsed).
    pub fn is_empty(&self) -> bool {
        self.is_collapsed()
    }

    /// Convert to a Range<usize> (ordered).
    pub fn to_range(&self) -> Range<usize> {
        self.start()..self.end()
    }

    /// Clamp both ends into `0..=max`.
    pub fn clamp(self, max: usize) -> Self {
        Self {
            anchor: self.anchor.min(max),
            head: self.head.min(max),
        }
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::collapsed(1)
    }
}

/// A point in viewport (client) coordinates.
#[derive(Clone, Debug, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Offset this point by `(-dx, -dy)`.
    pub fn anchored(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x - dx,
            y: self.y - dy,
        }
    }
}

/// Axis-aligned rectangle in viewport coordinates.
#[derive(Clone, Debug, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Horizontal midpoint.
    pub fn mid_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Inclusive containment: points on the border count as inside.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }
}

/// Information about the most recent committed transaction.
///
/// Tracks enough to tell whether a position computed earlier is still
/// meaningful: if the document size no longer matches `doc_size_after`,
/// something else has been committed since.
#[derive(Clone, Debug)]
pub struct EditInfo {
    /// Position where the first step of the edit applied
    pub edit_pos: usize,
    /// Number of positions inserted across all steps
    pub inserted_len: usize,
    /// Number of positions deleted across all steps
    pub deleted_len: usize,
    /// Number of steps in the transaction
    pub steps: usize,
    /// Document size after this edit was applied.
    pub doc_size_after: usize,
    /// When this edit occurred.
    pub timestamp: Instant,
}

impl PartialEq for EditInfo {
    fn eq(&self, other: &Self) -> bool {
        // Compare all fields except timestamp (not meaningful for equality)
        self.edit_pos == other.edit_pos
            && self.inserted_len == other.inserted_len
            && self.deleted_len == other.deleted_len
            && self.steps == other.steps
            && self.doc_size_after == other.doc_size_after
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_bounds() {
        // Forward selection
        let sel = Selection::new(5, 10);
        assert_eq!(sel.start(), 5);
        assert_eq!(sel.end(), 10);

        // Backward selection
        let sel = Selection::new(10, 5);
        assert_eq!(sel.start(), 5);
        assert_eq!(sel.end(), 10);
        assert_eq!(sel.to_range(), 5..10);
    }

    #[test]
    fn test_selection_collapsed() {
        let sel = Selection::collapsed(7);
        assert!(sel.is_collapsed());
        assert!(sel.is_empty());
        assert_eq!(sel.len(), 0);
        assert!(!sel.contains(7));
    }

    #[test]
    fn test_selection_clamp() {
        let sel = Selection::new(3, 40).clamp(10);
        assert_eq!(sel, Selection::new(3, 10));
    }

    #[test]
    fn test_rect_contains_is_inclusive() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert!(rect.contains(Point::new(10.0, 20.0)));
        assert!(rect.contains(Point::new(110.0, 70.0)));
        assert!(rect.contains(Point::new(60.0, 45.0)));
        assert!(!rect.contains(Point::new(9.9, 45.0)));
        assert!(!rect.contains(Point::new(60.0, 70.1)));
    }

    #[test]
    fn test_point_anchored() {
        let p = Point::new(120.0, 80.0).anchored(50.0, 25.0);
        assert_eq!(p, Point::new(70.0, 55.0));
    }

    #[test]
    fn test_edit_info_ignores_timestamp() {
        let edit = EditInfo {
            edit_pos: 5,
            inserted_len: 1,
            deleted_len: 0,
            steps: 1,
            doc_size_after: 12,
            timestamp: Instant::now(),
        };
        let later = EditInfo {
            timestamp: Instant::now(),
            ..edit.clone()
        };
        assert_eq!(edit, later);
        assert_ne!(edit, EditInfo { doc_size_after: 13, ..later });
    }
}
