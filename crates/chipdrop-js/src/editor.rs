//! ChipEditor - the mounted editor exposed to JavaScript.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use chipdrop_browser::dom_sync::{LABEL_ATTR, element_pos, refresh, sync_selection_from_dom};
use chipdrop_browser::gesture::{drag_start, mouse_gesture, touch_gesture, touch_start};
use chipdrop_browser::{
    BeforeInputContext, BeforeInputResult, BrowserDragPlatform, BrowserGeometry, handle_beforeinput,
    populate_palette, render_document,
};
use chipdrop_core::{
    ChipRef, Document, DragController, DragState, DropOutcome, EditOutcome, EditorConfig,
    EditorDocument, Gesture, GesturePhase, LocalEditor, Modality, MutatorOptions, Palette, Range,
    render_html,
};

/// Everything one mounted editor owns. Shared by all its listeners.
struct EditorState {
    editor: LocalEditor,
    controller: DragController<BrowserDragPlatform>,
    geometry: BrowserGeometry,
    config: EditorConfig,
}

type Shared = Rc<RefCell<EditorState>>;

impl EditorState {
    fn refresh(&self) {
        refresh(&self.editor, self.geometry.editor(), &self.config.classes);
    }

    /// Feed a gesture through the controller, re-rendering after an edit.
    fn gesture(&mut self, gesture: Gesture<web_sys::Element>) -> Option<DropOutcome> {
        let outcome = self
            .controller
            .handle(&mut self.editor, &self.geometry, gesture);
        match &outcome {
            Some(DropOutcome::Applied(EditOutcome::Unchanged)) | None => {}
            Some(DropOutcome::Applied(done)) => {
                tracing::debug!(?done, "drop applied");
                self.refresh();
            }
            Some(other) => tracing::debug!(?other, "drop not applied"),
        }
        outcome
    }

    fn edit_label(&mut self, chip: &web_sys::Element) {
        let Some(pos) = element_pos(chip) else {
            return;
        };
        let text = chip.get_attribute(LABEL_ATTR).unwrap_or_default();
        if !self.controller.begin_label_edit(ChipRef::new(pos, text.as_str())) {
            return;
        }

        let answer = web_sys::window()
            .and_then(|w| w.prompt_with_message_and_default("Edit label", &text).ok())
            .flatten();
        // Rejections are logged where they happen.
        if let Some(Ok(EditOutcome::Relabeled { pos })) = self
            .controller
            .finish_label_edit(&mut self.editor, answer.as_deref())
        {
            tracing::debug!(pos, "label replaced");
            self.refresh();
        }
    }
}

/// Run `f` with the editor state, dropping the event if it is in use.
fn with_state<T>(state: &Shared, event: &str, f: impl FnOnce(&mut EditorState) -> T) -> Option<T> {
    match state.try_borrow_mut() {
        Ok(mut state) => Some(f(&mut state)),
        Err(_) => {
            tracing::warn!(event, "editor busy, event dropped");
            None
        }
    }
}

fn active_options() -> EventListenerOptions {
    EventListenerOptions::enable_prevent_default()
}

/// A label editor mounted on the page.
///
/// Dropping it (or calling `free()` from JavaScript) removes every listener
/// and any drag feedback still on screen.
#[wasm_bindgen]
pub struct ChipEditor {
    // Declared first so listener closures release their state handles first.
    listeners: Vec<EventListener>,
    state: Shared,
}

#[wasm_bindgen]
impl ChipEditor {
    /// Mount onto the current page.
    ///
    /// `config` is an optional plain object; missing fields take defaults.
    #[wasm_bindgen]
    pub fn mount(config: JsValue) -> Result<ChipEditor, JsError> {
        let config: EditorConfig = if config.is_undefined() || config.is_null() {
            EditorConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))?
        };
        config
            .validate()
            .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))?;

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsError::new("no document"))?;
        let find = |selector: &str| -> Result<web_sys::Element, JsError> {
            document
                .query_selector(selector)
                .ok()
                .flatten()
                .ok_or_else(|| JsError::new(&format!("element not found: {selector}")))
        };
        let palette_el = find(config.selectors.palette.as_str())?;
        let editor_el = find(config.selectors.editor.as_str())?;
        let container_el = find(config.selectors.editor_container.as_str())?;

        populate_palette(
            &document,
            &palette_el,
            &Palette::new(&config.words),
            &config.classes,
        )
        .map_err(|e| JsError::new(&e.to_string()))?;

        let editor = LocalEditor::with_document(Document::default(), config.history_depth);
        render_document(&editor_el, editor.doc(), &config.classes);

        let platform = BrowserDragPlatform::new(document.clone(), &config);
        let options = MutatorOptions {
            pad_with_spaces: config.pad_chips,
        };
        let state = Rc::new(RefCell::new(EditorState {
            editor,
            controller: DragController::new(platform, options),
            geometry: BrowserGeometry::new(editor_el.clone()),
            config,
        }));

        let listeners = wire_listeners(&state, &document, &editor_el, &container_el);
        tracing::info!(listeners = listeners.len(), "chip editor mounted");
        Ok(ChipEditor { listeners, state })
    }

    /// Number of chips in the document.
    #[wasm_bindgen(js_name = chipCount)]
    pub fn chip_count(&self) -> Result<usize, JsError> {
        self.read(|s| s.editor.doc().chip_count())
    }

    /// Chip labels in document order.
    #[wasm_bindgen(js_name = chipTexts)]
    pub fn chip_texts(&self) -> Result<Vec<String>, JsError> {
        self.read(|s| {
            s.editor
                .doc()
                .chip_texts()
                .into_iter()
                .map(str::to_string)
                .collect()
        })
    }

    /// The document as HTML, without position annotations.
    #[wasm_bindgen]
    pub fn html(&self) -> Result<String, JsError> {
        self.read(|s| render_html(s.editor.doc(), &s.config.classes))
    }

    #[wasm_bindgen]
    pub fn undo(&self) -> Result<bool, JsError> {
        self.history(|editor| editor.undo())
    }

    #[wasm_bindgen]
    pub fn redo(&self) -> Result<bool, JsError> {
        self.history(|editor| editor.redo())
    }

    /// Abort any drag in progress, removing its feedback.
    #[wasm_bindgen(js_name = cancelDrag)]
    pub fn cancel_drag(&self) -> Result<(), JsError> {
        let mut state = self.borrow_mut()?;
        state.controller.reset();
        Ok(())
    }

    /// Whether a drag is in progress.
    #[wasm_bindgen(js_name = isDragging)]
    pub fn is_dragging(&self) -> Result<bool, JsError> {
        self.read(|s| s.controller.state() != DragState::Idle)
    }
}

impl ChipEditor {
    fn read<T>(&self, f: impl FnOnce(&EditorState) -> T) -> Result<T, JsError> {
        let state = self
            .state
            .try_borrow()
            .map_err(|_| JsError::new("editor busy"))?;
        Ok(f(&state))
    }

    fn borrow_mut(&self) -> Result<std::cell::RefMut<'_, EditorState>, JsError> {
        self.state
            .try_borrow_mut()
            .map_err(|_| JsError::new("editor busy"))
    }

    fn history(&self, f: impl FnOnce(&mut LocalEditor) -> bool) -> Result<bool, JsError> {
        let mut state = self.borrow_mut()?;
        let changed = f(&mut state.editor);
        if changed {
            state.refresh();
        }
        Ok(changed)
    }
}

fn wire_listeners(
    state: &Shared,
    document: &web_sys::Document,
    editor_el: &web_sys::Element,
    container_el: &web_sys::Element,
) -> Vec<EventListener> {
    let mut listeners = Vec::new();

    // === Mouse drag ===

    let s = state.clone();
    listeners.push(EventListener::new(document, "dragstart", move |event| {
        let Some(event) = event.dyn_ref::<web_sys::DragEvent>() else {
            return;
        };
        with_state(&s, "dragstart", |state| {
            let config = &state.config;
            if let Some(gesture) = drag_start(event, &config.selectors, &config.classes) {
                state.gesture(gesture);
            }
        });
    }));

    let s = state.clone();
    listeners.push(EventListener::new_with_options(
        document,
        "dragover",
        active_options(),
        move |event| {
            let Some(event) = event.dyn_ref::<web_sys::DragEvent>() else {
                return;
            };
            with_state(&s, "dragover", |state| {
                let effect = match state.controller.state() {
                    DragState::Idle => return,
                    DragState::DraggingPaletteItem => "copy",
                    DragState::DraggingDocumentChip => "move",
                };
                event.prevent_default();
                if let Some(transfer) = event.data_transfer() {
                    transfer.set_drop_effect(effect);
                }
                state.gesture(mouse_gesture(GesturePhase::Move, event));
            });
        },
    ));

    let s = state.clone();
    listeners.push(EventListener::new_with_options(
        document,
        "drop",
        active_options(),
        move |event| {
            let Some(event) = event.dyn_ref::<web_sys::DragEvent>() else {
                return;
            };
            with_state(&s, "drop", |state| {
                let moving_chip = state.controller.state() == DragState::DraggingDocumentChip;
                let outcome = state.gesture(mouse_gesture(GesturePhase::Drop, event));
                // Only an unresolved point falls through to the default
                // drop, which arrives as an `insertFromDrop` beforeinput.
                if outcome.is_some_and(|o| o.is_handled()) {
                    event.prevent_default();
                }
                // The re-render detaches a dragged chip, so its dragend never
                // reaches the document.
                if moving_chip {
                    state.gesture(mouse_gesture(GesturePhase::End, event));
                }
            });
        },
    ));

    let s = state.clone();
    listeners.push(EventListener::new(document, "dragend", move |event| {
        let Some(event) = event.dyn_ref::<web_sys::DragEvent>() else {
            return;
        };
        with_state(&s, "dragend", |state| {
            state.gesture(mouse_gesture(GesturePhase::End, event));
        });
    }));

    // === Touch drag ===

    let s = state.clone();
    listeners.push(EventListener::new(document, "touchstart", move |event| {
        let Some(event) = event.dyn_ref::<web_sys::TouchEvent>() else {
            return;
        };
        with_state(&s, "touchstart", |state| {
            let config = &state.config;
            if let Some(gesture) = touch_start(event, &config.selectors, &config.classes) {
                state.gesture(gesture);
            }
        });
    }));

    let s = state.clone();
    listeners.push(EventListener::new_with_options(
        document,
        "touchmove",
        active_options(),
        move |event| {
            let Some(event) = event.dyn_ref::<web_sys::TouchEvent>() else {
                return;
            };
            with_state(&s, "touchmove", |state| {
                if state.controller.modality() != Some(Modality::Touch) {
                    return;
                }
                // Keep the page from scrolling under the drag.
                event.prevent_default();
                if let Some(gesture) = touch_gesture(GesturePhase::Move, event) {
                    state.gesture(gesture);
                }
            });
        },
    ));

    for (name, phase) in [
        ("touchend", GesturePhase::End),
        ("touchcancel", GesturePhase::Cancel),
    ] {
        let s = state.clone();
        listeners.push(EventListener::new(document, name, move |event| {
            let Some(event) = event.dyn_ref::<web_sys::TouchEvent>() else {
                return;
            };
            with_state(&s, name, |state| {
                if state.controller.modality() != Some(Modality::Touch) {
                    return;
                }
                match touch_gesture(phase.clone(), event) {
                    Some(gesture) => {
                        state.gesture(gesture);
                    }
                    None => state.controller.cancel(Modality::Touch),
                }
            });
        }));
    }

    // === Label editing ===

    let s = state.clone();
    listeners.push(EventListener::new(container_el, "click", move |event| {
        let Some(target) = event.target() else {
            return;
        };
        let Some(target) = target.dyn_ref::<web_sys::Element>() else {
            return;
        };
        with_state(&s, "click", |state| {
            let selector = format!(".{}", state.config.classes.chip);
            if let Some(chip) = target.closest(&selector).ok().flatten() {
                state.edit_label(&chip);
            }
        });
    }));

    // === Typing ===

    let s = state.clone();
    let editor = editor_el.clone();
    listeners.push(EventListener::new_with_options(
        editor_el,
        "beforeinput",
        active_options(),
        move |event| {
            let Some(event) = event.dyn_ref::<web_sys::InputEvent>() else {
                return;
            };
            with_state(&s, "beforeinput", |state| {
                sync_selection_from_dom(&mut state.editor, &editor);
                let selection = state.editor.selection();
                let current = Range::new(selection.start(), selection.end());
                let ctx = BeforeInputContext::from_event(event, &editor);
                if handle_beforeinput(&mut state.editor, &ctx, current)
                    == BeforeInputResult::Handled
                {
                    event.prevent_default();
                    state.refresh();
                }
            });
        },
    ));

    listeners
}
