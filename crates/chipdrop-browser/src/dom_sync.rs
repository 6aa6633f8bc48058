//! DOM synchronization for the chip editor.
//!
//! The editor surface is rendered from the document with `data-pos` on every
//! paragraph and chip (see [`chipdrop_core::render_editor_html`]). Mapping
//! between DOM positions (node + offset) and document positions only reads the
//! DOM: paragraphs supply their start position, and sizes inside a paragraph
//! are recounted from its children. Text node offsets are UTF-16 code units
//! and are converted to chars.

use wasm_bindgen::JsCast;

use chipdrop_core::{
    ClassNames, Document, EditorDocument, PlatformError, Selection, render_editor_html,
};

/// Attribute carrying the document position of a paragraph or chip.
pub const POS_ATTR: &str = "data-pos";

/// Attribute carrying a chip's label.
pub const LABEL_ATTR: &str = "data-label";

/// Convert a UTF-16 offset within `text` to a char offset.
///
/// An offset in the middle of a surrogate pair rounds down.
pub fn utf16_to_char_offset(text: &str, utf16: usize) -> usize {
    let mut units = 0;
    for (chars, c) in text.chars().enumerate() {
        let next = units + c.len_utf16();
        if next > utf16 {
            return chars;
        }
        units = next;
    }
    text.chars().count()
}

/// Convert a char offset within `text` to a UTF-16 offset.
pub fn char_to_utf16_offset(text: &str, chars: usize) -> usize {
    text.chars().take(chars).map(char::len_utf16).sum()
}

/// Document position recorded on an element.
pub fn element_pos(element: &web_sys::Element) -> Option<usize> {
    element.get_attribute(POS_ATTR)?.parse().ok()
}

/// Whether `element` is a rendered chip.
pub fn is_chip_element(element: &web_sys::Element) -> bool {
    element.get_attribute("contenteditable").as_deref() == Some("false")
        && element.has_attribute(POS_ATTR)
}

/// The chip element containing `node`, if any.
pub fn enclosing_chip(node: &web_sys::Node) -> Option<web_sys::Element> {
    let mut current = Some(node.clone());
    while let Some(node) = current {
        if let Some(element) = node.dyn_ref::<web_sys::Element>() {
            if is_chip_element(element) {
                return Some(element.clone());
            }
        }
        current = node.parent_node();
    }
    None
}

/// Size of a DOM node in document positions.
fn dom_node_size(node: &web_sys::Node) -> usize {
    if node.node_type() == web_sys::Node::TEXT_NODE {
        return node
            .text_content()
            .map(|t| t.chars().count())
            .unwrap_or(0);
    }
    let Some(element) = node.dyn_ref::<web_sys::Element>() else {
        return 0;
    };
    if is_chip_element(element) {
        return 1;
    }
    children_size(node, usize::MAX)
}

/// Total size of the first `limit` children of `node`.
fn children_size(node: &web_sys::Node, limit: usize) -> usize {
    let children = node.child_nodes();
    let count = (children.length() as usize).min(limit);
    (0..count)
        .filter_map(|i| children.get(i as u32))
        .map(|child| dom_node_size(&child))
        .sum()
}

/// Paragraph elements of the editor, in order.
pub fn paragraph_elements(editor: &web_sys::Element) -> Vec<web_sys::Element> {
    let mut out = Vec::new();
    let mut child = editor.first_element_child();
    while let Some(element) = child {
        if element.has_attribute(POS_ATTR) {
            out.push(element.clone());
        }
        child = element.next_element_sibling();
    }
    out
}

/// Content size of a rendered paragraph.
pub fn paragraph_content_size(paragraph: &web_sys::Element) -> usize {
    children_size(paragraph, usize::MAX)
}

/// Document size as rendered.
pub fn rendered_size(editor: &web_sys::Element) -> usize {
    paragraph_elements(editor)
        .last()
        .and_then(|p| Some(element_pos(p)? + paragraph_content_size(p) + 2))
        .unwrap_or(0)
}

/// The direct child of `editor` that contains `node`.
fn containing_paragraph(editor: &web_sys::Element, node: &web_sys::Node) -> Option<web_sys::Element> {
    let editor_node: &web_sys::Node = editor.as_ref();
    let mut current = node.clone();
    loop {
        let parent = current.parent_node()?;
        if &parent == editor_node {
            return current.dyn_into::<web_sys::Element>().ok();
        }
        current = parent;
    }
}

/// Convert a DOM position (node + offset) to a document position.
///
/// For text nodes `offset` is a UTF-16 offset; for elements it is a child
/// index. A position anywhere inside a chip maps to the position before it.
pub fn dom_position_to_doc_pos(
    editor: &web_sys::Element,
    node: &web_sys::Node,
    offset: usize,
) -> Option<usize> {
    let editor_node: &web_sys::Node = editor.as_ref();

    if node == editor_node {
        // Offset is a child index between paragraphs.
        let children = editor.child_nodes();
        let before = (0..offset.min(children.length() as usize))
            .filter_map(|i| children.get(i as u32))
            .filter_map(|c| c.dyn_into::<web_sys::Element>().ok())
            .filter(|e| e.has_attribute(POS_ATTR))
            .count();
        let paragraphs = paragraph_elements(editor);
        return match paragraphs.get(before) {
            Some(p) => element_pos(p),
            None => Some(rendered_size(editor)),
        };
    }

    if let Some(chip) = enclosing_chip(node) {
        return element_pos(&chip);
    }

    let paragraph = containing_paragraph(editor, node)?;
    let start = element_pos(&paragraph)?;
    let paragraph_node: &web_sys::Node = paragraph.as_ref();

    let inner = if node.node_type() == web_sys::Node::TEXT_NODE {
        let text = node.text_content().unwrap_or_default();
        utf16_to_char_offset(&text, offset)
    } else {
        children_size(node, offset)
    };

    // Everything before `node` inside the paragraph.
    let mut before = 0;
    let mut current = node.clone();
    while &current != paragraph_node {
        let mut sibling = current.previous_sibling();
        while let Some(s) = sibling {
            before += dom_node_size(&s);
            sibling = s.previous_sibling();
        }
        current = current.parent_node()?;
    }

    Some(start + 1 + before + inner)
}

/// Convert a document position to a DOM position for placing the caret.
///
/// Block positions are placed at the start of the following paragraph's
/// content, or the end of the last one.
pub fn doc_pos_to_dom_position(
    editor: &web_sys::Element,
    pos: usize,
) -> Option<(web_sys::Node, u32)> {
    let paragraphs = paragraph_elements(editor);
    let paragraph = paragraphs
        .iter()
        .rev()
        .find(|p| element_pos(p).is_some_and(|start| start <= pos))
        .or(paragraphs.first())?;
    let start = element_pos(paragraph)?;
    let content_size = paragraph_content_size(paragraph);
    let mut offset = pos.saturating_sub(start + 1).min(content_size);

    let children = paragraph.child_nodes();
    for i in 0..children.length() {
        let Some(child) = children.get(i) else {
            continue;
        };
        if child.node_type() == web_sys::Node::TEXT_NODE {
            let text = child.text_content().unwrap_or_default();
            let chars = text.chars().count();
            if offset <= chars {
                return Some((child, char_to_utf16_offset(&text, offset) as u32));
            }
            offset -= chars;
        } else {
            if offset == 0 {
                return Some((paragraph.clone().into(), i));
            }
            offset = offset.saturating_sub(dom_node_size(&child));
        }
    }
    Some((paragraph.clone().into(), children.length()))
}

/// Replace the editor surface with a fresh render of `doc`.
pub fn render_document(editor: &web_sys::Element, doc: &Document, classes: &ClassNames) {
    editor.set_inner_html(&render_editor_html(doc, classes));
}

/// Read the browser selection as a document selection.
pub fn read_dom_selection(editor: &web_sys::Element) -> Option<Selection> {
    let selection = web_sys::window()?.get_selection().ok()??;
    let anchor_node = selection.anchor_node()?;
    let focus_node = selection.focus_node()?;
    let editor_node: &web_sys::Node = editor.as_ref();
    if !editor_node.contains(Some(&anchor_node)) || !editor_node.contains(Some(&focus_node)) {
        return None;
    }

    let anchor =
        dom_position_to_doc_pos(editor, &anchor_node, selection.anchor_offset() as usize)?;
    let head = dom_position_to_doc_pos(editor, &focus_node, selection.focus_offset() as usize)?;
    tracing::trace!(anchor, head, "read DOM selection");
    Some(Selection::new(anchor, head))
}

/// Sync the document selection from the browser selection.
pub fn sync_selection_from_dom<D: EditorDocument>(doc: &mut D, editor: &web_sys::Element) {
    if let Some(selection) = read_dom_selection(editor) {
        let size = doc.size();
        doc.set_selection(selection.clamp(size));
    }
}

/// Place the browser selection to match `selection`.
pub fn restore_selection(
    editor: &web_sys::Element,
    selection: Selection,
) -> Result<(), PlatformError> {
    let window = web_sys::window().ok_or("no window")?;
    let dom_selection = window
        .get_selection()
        .map_err(|e| PlatformError(format!("{e:?}")))?
        .ok_or("no selection object")?;

    let (anchor_node, anchor_offset) =
        doc_pos_to_dom_position(editor, selection.anchor).ok_or("anchor not rendered")?;
    let (focus_node, focus_offset) =
        doc_pos_to_dom_position(editor, selection.head).ok_or("head not rendered")?;

    dom_selection
        .set_base_and_extent(&anchor_node, anchor_offset, &focus_node, focus_offset)
        .map_err(|e| PlatformError(format!("set_base_and_extent failed: {e:?}")))
}

/// Re-render the surface and put the caret back.
pub fn refresh<D: EditorDocument>(doc: &D, editor: &web_sys::Element, classes: &ClassNames) {
    render_document(editor, doc.doc(), classes);
    if let Err(err) = restore_selection(editor, doc.selection()) {
        tracing::debug!(%err, "could not restore selection after render");
    }
}
