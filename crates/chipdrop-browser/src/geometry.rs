//! Point↔position geometry over the rendered editor surface.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use chipdrop_core::{Point, PositionGeometry, Rect};

use crate::dom_sync::{doc_pos_to_dom_position, dom_position_to_doc_pos, element_pos, enclosing_chip};

// === caretRangeFromPoint binding ===
//
// WebKit/Blink expose `document.caretRangeFromPoint`, which web-sys doesn't
// bind. Firefox only has the standard `caretPositionFromPoint`, which it does.

#[wasm_bindgen]
extern "C" {
    type CaretRangeLookup;

    #[wasm_bindgen(method, js_name = caretRangeFromPoint)]
    fn caret_range_from_point(this: &CaretRangeLookup, x: f64, y: f64) -> Option<web_sys::Range>;
}

pub(crate) fn dom_rect(rect: &web_sys::DomRect) -> Rect {
    Rect::new(rect.x(), rect.y(), rect.width(), rect.height())
}

/// Geometry of the editor element as currently rendered.
#[derive(Clone)]
pub struct BrowserGeometry {
    editor: web_sys::Element,
}

impl BrowserGeometry {
    pub fn new(editor: web_sys::Element) -> Self {
        Self { editor }
    }

    pub fn editor(&self) -> &web_sys::Element {
        &self.editor
    }

    /// DOM caret (node + offset) under a viewport point.
    fn caret_at(&self, document: &web_sys::Document, point: Point) -> Option<(web_sys::Node, u32)> {
        let has_range_lookup =
            js_sys::Reflect::has(document, &JsValue::from_str("caretRangeFromPoint"))
                .unwrap_or(false);
        if has_range_lookup {
            let lookup: &CaretRangeLookup = document.unchecked_ref();
            let range = lookup.caret_range_from_point(point.x, point.y)?;
            let node = range.start_container().ok()?;
            let offset = range.start_offset().ok()?;
            return Some((node, offset));
        }

        let caret = document.caret_position_from_point(point.x as f32, point.y as f32)?;
        Some((caret.offset_node()?, caret.offset()))
    }
}

impl PositionGeometry for BrowserGeometry {
    fn pos_at_coords(&self, point: Point) -> Option<usize> {
        let document = self.editor.owner_document()?;
        let editor_node: &web_sys::Node = self.editor.as_ref();

        // Over a chip: pick the side by the chip's horizontal midpoint. Caret
        // lookups inside non-editable content are unreliable across browsers.
        if let Some(hit) = document.element_from_point(point.x as f32, point.y as f32) {
            let hit_node: &web_sys::Node = hit.as_ref();
            if editor_node.contains(Some(hit_node)) {
                if let Some(chip) = enclosing_chip(hit_node) {
                    let pos = element_pos(&chip)?;
                    let rect = dom_rect(&chip.get_bounding_client_rect());
                    return Some(if point.x >= rect.mid_x() { pos + 1 } else { pos });
                }
            }
        }

        let (node, offset) = self.caret_at(&document, point)?;
        if !editor_node.contains(Some(&node)) {
            tracing::trace!(x = point.x, y = point.y, "caret lookup landed outside editor");
            return None;
        }
        dom_position_to_doc_pos(&self.editor, &node, offset as usize)
    }

    fn coords_at_pos(&self, pos: usize) -> Option<Rect> {
        let document = self.editor.owner_document()?;
        let (node, offset) = doc_pos_to_dom_position(&self.editor, pos)?;
        let range = document.create_range().ok()?;
        range.set_start(&node, offset).ok()?;
        range.collapse_with_to_start(true);
        Some(dom_rect(&range.get_bounding_client_rect()))
    }
}
