//! Browser event handling for the editor.
//!
//! Typing inside the editor surface goes through `beforeinput`: the browser's
//! intent is turned into an [`chipdrop_core::EditorAction`] and applied to the document,
//! and the default DOM mutation is suppressed so chips stay intact.

use wasm_bindgen::prelude::*;

use chipdrop_core::{EditorDocument, InputType, Range, execute_action};

use crate::dom_sync::dom_position_to_doc_pos;

// === StaticRange binding ===
//
// Custom wasm_bindgen binding for StaticRange since web-sys doesn't expose it.
// StaticRange is returned by InputEvent.getTargetRanges() and represents
// a fixed range that doesn't update when the DOM changes.

#[wasm_bindgen]
extern "C" {
    /// The StaticRange interface represents a static range of text in the DOM.
    pub type StaticRange;

    #[wasm_bindgen(method, getter, structural)]
    pub fn startContainer(this: &StaticRange) -> web_sys::Node;

    #[wasm_bindgen(method, getter, structural)]
    pub fn startOffset(this: &StaticRange) -> u32;

    #[wasm_bindgen(method, getter, structural)]
    pub fn endContainer(this: &StaticRange) -> web_sys::Node;

    #[wasm_bindgen(method, getter, structural)]
    pub fn endOffset(this: &StaticRange) -> u32;
}

/// Parse a browser inputType string to an InputType enum.
///
/// Only the input types the editor acts on are named; everything else is
/// [`InputType::Unknown`] and left to the browser.
pub fn parse_browser_input_type(s: &str) -> InputType {
    match s {
        "insertText" => InputType::InsertText,
        "insertCompositionText" => InputType::InsertCompositionText,
        "insertLineBreak" => InputType::InsertLineBreak,
        "insertParagraph" => InputType::InsertParagraph,
        "insertFromPaste" => InputType::InsertFromPaste,
        "insertFromDrop" => InputType::InsertFromDrop,
        "insertReplacementText" => InputType::InsertReplacementText,

        "deleteContentBackward" => InputType::DeleteContentBackward,
        "deleteContentForward" => InputType::DeleteContentForward,
        "deleteWordBackward" => InputType::DeleteWordBackward,
        "deleteWordForward" => InputType::DeleteWordForward,
        "deleteByCut" => InputType::DeleteByCut,
        "deleteContent" => InputType::DeleteContent,
        "deleteByDrag" => InputType::DeleteByDrag,

        "historyUndo" => InputType::HistoryUndo,
        "historyRedo" => InputType::HistoryRedo,

        other => InputType::Unknown(other.to_string()),
    }
}

/// Result of handling a beforeinput event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeforeInputResult {
    /// Event was handled, prevent default browser behavior.
    Handled,
    /// Event should be handled by browser (e.g., during composition).
    PassThrough,
}

/// Context for beforeinput handling.
#[derive(Debug, Clone)]
pub struct BeforeInputContext {
    pub input_type: InputType,
    /// Text to insert, if any.
    pub data: Option<String>,
    /// The range the browser wants to modify, from getTargetRanges().
    pub target_range: Option<Range>,
    pub is_composing: bool,
}

impl BeforeInputContext {
    /// Read everything needed from a beforeinput event.
    pub fn from_event(event: &web_sys::InputEvent, editor: &web_sys::Element) -> Self {
        Self {
            input_type: get_input_type_from_event(event),
            data: get_data_from_event(event),
            target_range: get_target_range_from_event(event, editor),
            is_composing: event.is_composing(),
        }
    }
}

/// Extract target range from a beforeinput event.
pub fn get_target_range_from_event(
    event: &web_sys::InputEvent,
    editor: &web_sys::Element,
) -> Option<Range> {
    use wasm_bindgen::JsCast;

    let ranges = event.get_target_ranges();
    if ranges.length() == 0 {
        return None;
    }
    let static_range: StaticRange = ranges.get(0).unchecked_into();

    let start = dom_position_to_doc_pos(
        editor,
        &static_range.startContainer(),
        static_range.startOffset() as usize,
    )?;
    let end = dom_position_to_doc_pos(
        editor,
        &static_range.endContainer(),
        static_range.endOffset() as usize,
    )?;
    Some(Range::new(start, end))
}

/// Get data from a beforeinput event, handling different sources.
pub fn get_data_from_event(event: &web_sys::InputEvent) -> Option<String> {
    if let Some(data) = event.data() {
        if !data.is_empty() {
            return Some(data);
        }
    }

    // Paste and drop carry their text on dataTransfer.
    let text = event.data_transfer()?.get_data("text/plain").ok()?;
    (!text.is_empty()).then_some(text)
}

/// Get input type from a beforeinput event.
pub fn get_input_type_from_event(event: &web_sys::InputEvent) -> InputType {
    parse_browser_input_type(&event.input_type())
}

/// Handle a beforeinput event against the document.
///
/// `current_range` is used when the event carries no target range.
pub fn handle_beforeinput<D: EditorDocument>(
    doc: &mut D,
    ctx: &BeforeInputContext,
    current_range: Range,
) -> BeforeInputResult {
    // Composition is left to the browser; history still goes through us.
    if ctx.is_composing
        && !matches!(ctx.input_type, InputType::HistoryUndo | InputType::HistoryRedo)
    {
        return BeforeInputResult::PassThrough;
    }
    if ctx.input_type == InputType::InsertCompositionText {
        return BeforeInputResult::PassThrough;
    }

    let range = ctx.target_range.unwrap_or(current_range);
    match ctx.input_type.to_action(ctx.data.as_deref(), range) {
        Some(action) => {
            tracing::trace!(?action, "beforeinput");
            execute_action(doc, &action);
            BeforeInputResult::Handled
        }
        // Cut or clear over a caret has nothing to remove. Drag removals are
        // owned by the drag controller and must not touch the DOM.
        None if matches!(
            ctx.input_type,
            InputType::DeleteByCut | InputType::DeleteContent | InputType::DeleteByDrag
        ) =>
        {
            BeforeInputResult::Handled
        }
        None => BeforeInputResult::PassThrough,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chipdrop_core::{Document, LocalEditor};

    fn ctx(input_type: InputType, data: Option<&str>) -> BeforeInputContext {
        BeforeInputContext {
            input_type,
            data: data.map(str::to_string),
            target_range: None,
            is_composing: false,
        }
    }

    #[test]
    fn test_parse_known_and_unknown() {
        assert_eq!(parse_browser_input_type("insertText"), InputType::InsertText);
        assert_eq!(
            parse_browser_input_type("historyUndo"),
            InputType::HistoryUndo
        );
        assert_eq!(
            parse_browser_input_type("formatBold"),
            InputType::Unknown("formatBold".into())
        );
    }

    #[test]
    fn test_insert_text_handled() {
        let mut editor = LocalEditor::with_document(Document::default(), 10);
        let result = handle_beforeinput(
            &mut editor,
            &ctx(InputType::InsertText, Some("hi")),
            Range::caret(1),
        );
        assert_eq!(result, BeforeInputResult::Handled);
        assert_eq!(editor.doc().text_content(), "hi");
    }

    #[test]
    fn test_composition_passes_through() {
        let mut editor = LocalEditor::with_document(Document::default(), 10);
        let mut context = ctx(InputType::InsertText, Some("x"));
        context.is_composing = true;
        let result = handle_beforeinput(&mut editor, &context, Range::caret(1));
        assert_eq!(result, BeforeInputResult::PassThrough);
        assert_eq!(editor.doc().text_content(), "");
    }

    #[test]
    fn test_delete_by_drag_is_swallowed() {
        let mut editor = LocalEditor::with_document(Document::default(), 10);
        assert!(execute_action(
            &mut editor,
            &chipdrop_core::EditorAction::Insert {
                text: "abc".into(),
                range: Range::caret(1),
            },
        ));
        let before = editor.doc().clone();

        let mut context = ctx(InputType::DeleteByDrag, None);
        context.target_range = Some(Range::new(1, 3));
        let result = handle_beforeinput(&mut editor, &context, Range::caret(1));
        assert_eq!(result, BeforeInputResult::Handled);
        assert_eq!(editor.doc(), &before);
        assert_eq!(parse_browser_input_type("deleteByDrag"), InputType::DeleteByDrag);
    }

    #[test]
    fn test_unknown_passes_through() {
        let mut editor = LocalEditor::with_document(Document::default(), 10);
        let result = handle_beforeinput(
            &mut editor,
            &ctx(InputType::Unknown("formatBold".into()), None),
            Range::caret(1),
        );
        assert_eq!(result, BeforeInputResult::PassThrough);
    }
}
