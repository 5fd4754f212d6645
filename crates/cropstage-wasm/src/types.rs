//! WASM-compatible wrapper types for engine state.
//!
//! This module provides JavaScript-friendly views of the core Cropstage
//! types, handling the conversion between Rust and JavaScript data
//! representations. Structured geometry (scene snapshots) crosses the
//! boundary through `serde-wasm-bindgen`; single images are exposed as
//! a getter-based wrapper so the frontend can query placement without
//! deserializing a whole object.

use cropstage_core::{EditorError, PlacedImage};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Serialize a core value into a JavaScript object.
pub(crate) fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization failed: {}", e)))
}

/// Map an editor error onto a JavaScript error string.
pub(crate) fn editor_error(err: EditorError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Read-only view of one placed image for JavaScript.
///
/// A snapshot, not a live reference: the wrapper owns a copy of the
/// image state at the time it was handed out.
#[wasm_bindgen]
pub struct JsPlacedImage {
    inner: PlacedImage,
}

impl JsPlacedImage {
    pub(crate) fn new(inner: PlacedImage) -> Self {
        Self { inner }
    }
}

#[wasm_bindgen]
impl JsPlacedImage {
    /// Absolute x position on the canvas
    #[wasm_bindgen(getter)]
    pub fn x(&self) -> f64 {
        self.inner.position.x
    }

    /// Absolute y position on the canvas
    #[wasm_bindgen(getter)]
    pub fn y(&self) -> f64 {
        self.inner.position.y
    }

    /// Rotation in degrees, clockwise
    #[wasm_bindgen(getter)]
    pub fn rotation(&self) -> f64 {
        self.inner.rotation
    }

    /// Display-space width (scale already folded in)
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> f64 {
        self.inner.display_size.width
    }

    /// Display-space height (scale already folded in)
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> f64 {
        self.inner.display_size.height
    }

    /// Crop window left edge, in source pixels
    #[wasm_bindgen(getter)]
    pub fn crop_x(&self) -> f64 {
        self.inner.crop_window.x
    }

    /// Crop window top edge, in source pixels
    #[wasm_bindgen(getter)]
    pub fn crop_y(&self) -> f64 {
        self.inner.crop_window.y
    }

    /// Crop window width, in source pixels
    #[wasm_bindgen(getter)]
    pub fn crop_width(&self) -> f64 {
        self.inner.crop_window.width
    }

    /// Crop window height, in source pixels
    #[wasm_bindgen(getter)]
    pub fn crop_height(&self) -> f64 {
        self.inner.crop_window.height
    }

    /// Source bitmap width, in natural pixels
    #[wasm_bindgen(getter)]
    pub fn natural_width(&self) -> u32 {
        self.inner.bitmap.natural_width
    }

    /// Source bitmap height, in natural pixels
    #[wasm_bindgen(getter)]
    pub fn natural_height(&self) -> u32 {
        self.inner.bitmap.natural_height
    }
}
