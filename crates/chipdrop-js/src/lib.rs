//! WASM bindings for the chipdrop label editor.
//!
//! Mounts the editor onto an existing page (palette container, editable
//! surface and trash) and wires every browser event to the core state
//! machine. See [`ChipEditor`].

mod editor;

pub use editor::*;

use wasm_bindgen::prelude::*;

/// Install the panic hook and the console tracing subscriber.
#[wasm_bindgen(start)]
pub fn init() {
    use tracing::Level;
    use tracing::subscriber::set_global_default;
    use tracing_subscriber::Registry;
    use tracing_subscriber::layer::SubscriberExt;

    console_error_panic_hook::set_once();

    let console_level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let wasm_layer = tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(console_level)
            .build(),
    );

    // A host page that already installed a subscriber keeps it.
    let _ = set_global_default(Registry::default().with(wasm_layer));
}
