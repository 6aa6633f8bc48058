//! Reduce browser drag and touch events to [`Gesture`]s.

use smol_str::SmolStr;
use wasm_bindgen::JsCast;

use chipdrop_core::{ClassNames, DragOrigin, Gesture, GesturePhase, Modality, Point, Selectors};

use crate::dom_sync::LABEL_ATTR;

/// Viewport point of a mouse or drag event.
pub fn mouse_point(event: &web_sys::MouseEvent) -> Point {
    Point::new(event.client_x() as f64, event.client_y() as f64)
}

/// Viewport point of the first changed touch.
///
/// `touchend` has no active touches left, so this reads `changedTouches`.
pub fn touch_point(event: &web_sys::TouchEvent) -> Option<Point> {
    let touch = event.changed_touches().get(0)?;
    Some(Point::new(touch.client_x() as f64, touch.client_y() as f64))
}

fn closest(element: &web_sys::Element, selector: &str) -> Option<web_sys::Element> {
    element.closest(selector).ok().flatten()
}

fn class_selector(class: &str) -> String {
    format!(".{class}")
}

fn label_text(element: &web_sys::Element) -> Option<SmolStr> {
    let text = element
        .get_attribute(LABEL_ATTR)
        .or_else(|| element.text_content())?;
    let text = text.trim();
    (!text.is_empty()).then(|| SmolStr::new(text))
}

/// Work out what a drag starting on `target` picks up.
///
/// Palette items only count inside the palette container; chips anywhere.
pub fn drag_origin_from_target(
    target: &web_sys::EventTarget,
    selectors: &Selectors,
    classes: &ClassNames,
) -> Option<DragOrigin<web_sys::Element>> {
    let element = match target.dyn_ref::<web_sys::Element>() {
        Some(element) => element.clone(),
        // Text nodes report themselves as the target in some engines.
        None => target.dyn_ref::<web_sys::Node>()?.parent_element()?,
    };

    if let Some(chip) = closest(&element, &class_selector(&classes.chip)) {
        let text = label_text(&chip)?;
        return Some(DragOrigin::Chip {
            element: chip,
            text,
        });
    }

    let item = closest(&element, &class_selector(&classes.palette_item))?;
    closest(&item, &selectors.palette)?;
    let text = label_text(&item)?;
    Some(DragOrigin::Palette {
        element: item,
        text,
    })
}

/// Gesture for a `dragstart`, if it started on something draggable.
pub fn drag_start(
    event: &web_sys::DragEvent,
    selectors: &Selectors,
    classes: &ClassNames,
) -> Option<Gesture<web_sys::Element>> {
    let origin = drag_origin_from_target(&event.target()?, selectors, classes)?;
    if let Some(transfer) = event.data_transfer() {
        let _ = transfer.set_data("text/plain", origin.text());
        transfer.set_effect_allowed(match &origin {
            DragOrigin::Palette { .. } => "copy",
            DragOrigin::Chip { .. } => "move",
        });
    }
    Some(Gesture::new(
        GesturePhase::Start(origin),
        Modality::Mouse,
        mouse_point(event),
    ))
}

/// Gesture for a `touchstart`, if it landed on something draggable.
pub fn touch_start(
    event: &web_sys::TouchEvent,
    selectors: &Selectors,
    classes: &ClassNames,
) -> Option<Gesture<web_sys::Element>> {
    let origin = drag_origin_from_target(&event.target()?, selectors, classes)?;
    let point = touch_point(event)?;
    Some(Gesture::new(GesturePhase::Start(origin), Modality::Touch, point))
}

/// Gesture for a non-start mouse drag event.
pub fn mouse_gesture(
    phase: GesturePhase<web_sys::Element>,
    event: &web_sys::DragEvent,
) -> Gesture<web_sys::Element> {
    Gesture::new(phase, Modality::Mouse, mouse_point(event))
}

/// Gesture for a non-start touch event.
pub fn touch_gesture(
    phase: GesturePhase<web_sys::Element>,
    event: &web_sys::TouchEvent,
) -> Option<Gesture<web_sys::Element>> {
    Some(Gesture::new(phase, Modality::Touch, touch_point(event)?))
}
