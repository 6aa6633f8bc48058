//! Mapping screen points to document insertion positions.
//!
//! The raw point→position lookup is platform work (DOM caret hit testing in
//! the browser) behind [`PositionGeometry`]. This module applies the policy on
//! top of it: clamping, trailing-edge correction and fitting block positions
//! into a paragraph.

use crate::node::{Document, ResolvedPos};
use crate::types::{Point, Rect};

/// Point↔position geometry of a rendered document.
pub trait PositionGeometry {
    /// Document position closest to a viewport point, `None` if the point is
    /// not over any addressable position.
    fn pos_at_coords(&self, point: Point) -> Option<usize>;

    /// Viewport rectangle of the caret at `pos`.
    fn coords_at_pos(&self, pos: usize) -> Option<Rect>;
}

/// Resolve a drop point to an insertion position.
///
/// The raw position is clamped into `0..=size`. A position at the trailing
/// edge of the document (a block position with nothing after it) is moved
/// back by one, into the last paragraph, so dropping below the content never
/// opens a new block.
pub fn resolve_drop_position<G: PositionGeometry + ?Sized>(
    doc: &Document,
    geometry: &G,
    point: Point,
) -> Option<usize> {
    let Some(raw) = geometry.pos_at_coords(point) else {
        tracing::debug!(x = point.x, y = point.y, "no document position under point");
        return None;
    };
    let pos = raw.min(doc.size());
    let corrected = correct_trailing_edge(doc, pos);
    tracing::trace!(raw, pos, corrected, "resolved drop position");
    Some(corrected)
}

/// Step back from a block position that has no following node.
pub fn correct_trailing_edge(doc: &Document, pos: usize) -> usize {
    match doc.resolve(pos) {
        Some(ResolvedPos::Block { .. }) if !doc.has_node_after(pos) => pos.saturating_sub(1),
        _ => pos,
    }
}

/// Move a block position into the neighbouring paragraph.
///
/// Inline positions are returned unchanged. A block position goes to the
/// start of the following paragraph, or the end of the preceding one when it
/// is the end of the document.
pub fn fit_inline(doc: &Document, pos: usize) -> Option<usize> {
    match doc.resolve(pos)? {
        ResolvedPos::Inline { .. } => Some(pos),
        ResolvedPos::Block { index } if index < doc.paragraphs().len() => Some(pos + 1),
        ResolvedPos::Block { .. } => pos.checked_sub(1),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::node::{Inline, Paragraph};

    /// Geometry that maps a point's x coordinate straight to a position.
    pub(crate) struct LinearGeometry;

    impl PositionGeometry for LinearGeometry {
        fn pos_at_coords(&self, point: Point) -> Option<usize> {
            (point.x >= 0.0).then(|| point.x as usize)
        }

        fn coords_at_pos(&self, pos: usize) -> Option<Rect> {
            Some(Rect::new(pos as f64, 0.0, 0.0, 10.0))
        }
    }

    fn at(x: f64) -> Point {
        Point::new(x, 5.0)
    }

    #[test]
    fn test_empty_document_lands_inside_paragraph() {
        let doc = Document::default();
        // End of document (after </p>) steps back inside.
        assert_eq!(resolve_drop_position(&doc, &LinearGeometry, at(2.0)), Some(1));
        // Anything past the end is clamped first.
        assert_eq!(resolve_drop_position(&doc, &LinearGeometry, at(40.0)), Some(1));
        assert_eq!(resolve_drop_position(&doc, &LinearGeometry, at(1.0)), Some(1));
    }

    #[test]
    fn test_not_found() {
        let doc = Document::default();
        assert_eq!(resolve_drop_position(&doc, &LinearGeometry, at(-3.0)), None);
    }

    #[test]
    fn test_inline_positions_untouched() {
        let doc = Document::new(vec![Paragraph::new(vec![
            Inline::chip("Happy"),
            Inline::chip("Sunny"),
        ])]);
        assert_eq!(resolve_drop_position(&doc, &LinearGeometry, at(1.0)), Some(1));
        assert_eq!(resolve_drop_position(&doc, &LinearGeometry, at(3.0)), Some(3));
        assert_eq!(resolve_drop_position(&doc, &LinearGeometry, at(4.0)), Some(3));
    }

    #[test]
    fn test_block_position_with_following_node_kept() {
        let doc = Document::new(vec![Paragraph::empty(), Paragraph::empty()]);
        assert_eq!(correct_trailing_edge(&doc, 0), 0);
        assert_eq!(correct_trailing_edge(&doc, 2), 2);
        assert_eq!(correct_trailing_edge(&doc, 4), 3);
    }

    #[test]
    fn test_fit_inline() {
        let doc = Document::new(vec![Paragraph::empty(), Paragraph::empty()]);
        assert_eq!(fit_inline(&doc, 0), Some(1));
        assert_eq!(fit_inline(&doc, 1), Some(1));
        assert_eq!(fit_inline(&doc, 2), Some(3));
        assert_eq!(fit_inline(&doc, 4), Some(3));
        assert_eq!(fit_inline(&doc, 5), None);
    }
}
