//! Palette rendering.

use chipdrop_core::{ClassNames, Palette, PlatformError};

use crate::dom_sync::LABEL_ATTR;

/// Fill `container` with one draggable element per palette item.
///
/// Existing children are replaced. Returns the created elements in order.
pub fn populate_palette(
    document: &web_sys::Document,
    container: &web_sys::Element,
    palette: &Palette,
    classes: &ClassNames,
) -> Result<Vec<web_sys::Element>, PlatformError> {
    container.set_inner_html("");

    let mut elements = Vec::with_capacity(palette.len());
    for item in palette.items() {
        let element = document
            .create_element("div")
            .map_err(|e| PlatformError(format!("create_element failed: {e:?}")))?;
        element.set_class_name(&classes.palette_item);
        let attrs = [("draggable", "true"), (LABEL_ATTR, item.text.as_str())];
        for (name, value) in attrs {
            element
                .set_attribute(name, value)
                .map_err(|e| PlatformError(format!("set_attribute {name} failed: {e:?}")))?;
        }
        element.set_text_content(Some(&item.text));
        container
            .append_child(&element)
            .map_err(|e| PlatformError(format!("append failed: {e:?}")))?;
        elements.push(element);
    }

    tracing::debug!(items = elements.len(), "palette populated");
    Ok(elements)
}
