//! Browser implementation of drag feedback.
//!
//! Marks the dragged element with a class, shows a floating clone under the
//! finger during touch drags, and toggles the trash hover class.

use wasm_bindgen::JsCast;

use chipdrop_core::{
    ClassNames, DragPlatform, EditorConfig, FeedbackConfig, PlatformError, Point, Rect, Selectors,
};

use crate::dom_sync::element_pos;
use crate::geometry::dom_rect;

/// DOM-backed [`DragPlatform`].
pub struct BrowserDragPlatform {
    document: web_sys::Document,
    selectors: Selectors,
    classes: ClassNames,
    feedback: FeedbackConfig,
}

impl BrowserDragPlatform {
    pub fn new(document: web_sys::Document, config: &EditorConfig) -> Self {
        Self {
            document,
            selectors: config.selectors.clone(),
            classes: config.classes.clone(),
            feedback: config.feedback.clone(),
        }
    }

    /// Create a platform for the window's document.
    pub fn for_window(config: &EditorConfig) -> Result<Self, PlatformError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("no document")?;
        Ok(Self::new(document, config))
    }

    fn query(&self, selector: &str) -> Option<web_sys::Element> {
        match self.document.query_selector(selector) {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!(selector, ?err, "invalid selector");
                None
            }
        }
    }

    fn bounds(&self, selector: &str) -> Option<Rect> {
        self.query(selector)
            .map(|el| dom_rect(&el.get_bounding_client_rect()))
    }

    fn place(&self, style: &web_sys::CssStyleDeclaration, point: Point) {
        let at = point.anchored(self.feedback.anchor_x, self.feedback.anchor_y);
        let _ = style.set_property("left", &format!("{}px", at.x));
        let _ = style.set_property("top", &format!("{}px", at.y));
    }

    fn build_clone(
        &self,
        element: &web_sys::Element,
        point: Point,
    ) -> Result<web_sys::HtmlElement, PlatformError> {
        let clone = element
            .clone_node_with_deep(true)
            .map_err(|e| PlatformError(format!("clone failed: {e:?}")))?
            .dyn_into::<web_sys::HtmlElement>()
            .map_err(|_| "dragged element is not an HTML element")?;

        clone.set_id(&self.feedback.clone_id);
        let _ = clone.class_list().remove_1(&self.classes.dragging);
        let style = clone.style();
        for (name, value) in [
            ("position", "fixed"),
            ("pointer-events", "none"),
            ("z-index", "1000"),
        ] {
            let _ = style.set_property(name, value);
        }
        let _ = style.set_property("opacity", &self.feedback.opacity.to_string());
        self.place(&style, point);

        let body = self.document.body().ok_or("no body")?;
        body.append_child(&clone)
            .map_err(|e| PlatformError(format!("append failed: {e:?}")))?;
        Ok(clone)
    }
}

impl DragPlatform for BrowserDragPlatform {
    type Element = web_sys::Element;
    type Feedback = web_sys::HtmlElement;

    fn mark_dragging(&self, element: &web_sys::Element, dragging: bool) {
        let _ = element
            .class_list()
            .toggle_with_force(&self.classes.dragging, dragging);
    }

    fn spawn_feedback(&self, element: &web_sys::Element, point: Point) -> Option<web_sys::HtmlElement> {
        match self.build_clone(element, point) {
            Ok(clone) => Some(clone),
            Err(err) => {
                tracing::warn!(%err, "could not create drag feedback");
                None
            }
        }
    }

    fn move_feedback(&self, feedback: &web_sys::HtmlElement, point: Point) {
        self.place(&feedback.style(), point);
    }

    fn remove_feedback(&self, feedback: web_sys::HtmlElement) {
        feedback.remove();
    }

    fn set_trash_hover(&self, hover: bool) {
        if let Some(trash) = self.query(&self.selectors.trash) {
            let _ = trash
                .class_list()
                .toggle_with_force(&self.classes.trash_hover, hover);
        }
    }

    fn trash_bounds(&self) -> Option<Rect> {
        self.bounds(&self.selectors.trash)
    }

    /// The container, not the editable surface: drops in its padding still
    /// land in the document.
    fn document_bounds(&self) -> Option<Rect> {
        self.bounds(&self.selectors.editor_container)
    }

    fn chip_position(&self, element: &web_sys::Element) -> Option<usize> {
        if !element.is_connected() {
            return None;
        }
        element_pos(element)
    }
}
