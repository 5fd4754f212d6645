//! Cropstage WASM - WebAssembly bindings for Cropstage
//!
//! This crate exposes the cropstage-core geometry engine to
//! JavaScript/TypeScript canvas frontends. The frontend stays a thin
//! render shell: it forwards pointer and transformer events through
//! [`JsEditor`] and redraws its scene-graph nodes from the snapshot
//! `scene()` returns.
//!
//! # Module Structure
//!
//! - `editor` - the `JsEditor` handle wrapping the core editor facade
//! - `types` - WASM-compatible wrapper types and serde conversion
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsEditor } from '@cropstage/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const editor = new JsEditor(800, 600);
//! const id = editor.add_image(img.naturalWidth, img.naturalHeight);
//! editor.pointer_down_image(id);
//! editor.begin_crop();
//! render(editor.scene());
//! ```

use wasm_bindgen::prelude::*;

mod editor;
mod types;

// Re-export public types
pub use editor::JsEditor;
pub use types::JsPlacedImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(
        &format!("cropstage-wasm {} initialized", env!("CARGO_PKG_VERSION")).into(),
    );
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
