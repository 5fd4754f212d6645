//! WASM bindings for the editor facade.
//!
//! This module exposes the whole engine behind one `JsEditor` handle.
//! The frontend forwards pointer and transformer events into it and
//! redraws from the scene snapshot it returns; all geometry decisions
//! stay on the Rust side.
//!
//! Per-frame gesture methods mirror the core's silent-no-op contract:
//! they never throw, they just leave the state unchanged when there is
//! nothing to act on. Lifecycle methods (`begin_crop`, `commit_crop`,
//! `cancel_crop`) surface errors to JavaScript.

use crate::types::{editor_error, to_js, JsPlacedImage};
use cropstage_core::{
    Anchor, Editor, HitTarget, ImageId, Point, Rect, RescaleOutcome, Size, SourceBitmap,
};
use wasm_bindgen::prelude::*;

/// The Cropstage engine, owned by JavaScript.
#[wasm_bindgen]
pub struct JsEditor {
    inner: Editor,
}

#[wasm_bindgen]
impl JsEditor {
    /// Create an editor for a canvas container of the given size.
    #[wasm_bindgen(constructor)]
    pub fn new(container_width: f64, container_height: f64) -> JsEditor {
        JsEditor {
            inner: Editor::new(Size::new(container_width, container_height)),
        }
    }

    /// Place a decoded bitmap on the canvas.
    ///
    /// # Arguments
    /// * `natural_width` - Decoded bitmap width in source pixels
    /// * `natural_height` - Decoded bitmap height in source pixels
    ///
    /// # Returns
    /// The new image's id, used for hit reporting and lookups.
    pub fn add_image(&mut self, natural_width: u32, natural_height: u32) -> u32 {
        self.inner
            .add_image(SourceBitmap::new(natural_width, natural_height))
            .0
    }

    /// Number of images on the canvas.
    pub fn image_count(&self) -> usize {
        self.inner.images().len()
    }

    /// Snapshot of one placed image, or `undefined` for an unknown id.
    pub fn get_image(&self, id: u32) -> Option<JsPlacedImage> {
        self.inner
            .image(ImageId(id))
            .cloned()
            .map(JsPlacedImage::new)
    }

    /// Pointer-down on the empty stage background.
    pub fn pointer_down_background(&mut self) {
        self.inner.pointer_down(HitTarget::Background);
    }

    /// Pointer-down on a placed image node.
    pub fn pointer_down_image(&mut self, id: u32) {
        self.inner.pointer_down(HitTarget::Image(ImageId(id)));
    }

    /// Pointer-down on the darkening mask overlay (commits an open
    /// crop session).
    pub fn pointer_down_mask(&mut self) {
        self.inner.pointer_down(HitTarget::Mask);
    }

    /// Enter crop mode for the selected image (double-click in the UI).
    ///
    /// # Errors
    /// Throws if nothing is selected or a session is already open.
    pub fn begin_crop(&mut self) -> Result<(), JsValue> {
        self.inner.begin_crop().map_err(editor_error)
    }

    /// Commit the open crop session into its target image.
    pub fn commit_crop(&mut self) -> Result<(), JsValue> {
        self.inner.commit_crop().map_err(editor_error)
    }

    /// Discard the open crop session; the target image is unchanged.
    pub fn cancel_crop(&mut self) -> Result<(), JsValue> {
        self.inner.cancel_crop().map_err(editor_error)
    }

    /// Whether a crop session currently owns the handles.
    pub fn is_cropping(&self) -> bool {
        self.inner.session().is_some()
    }

    /// Id of the image owning the handles, or `undefined` when nothing
    /// is selected.
    pub fn selected_image_id(&self) -> Option<u32> {
        self.inner.selection().selected_image().map(|id| id.0)
    }

    /// Drag frame: move the selected image.
    pub fn drag_selected(&mut self, x: f64, y: f64) {
        self.inner.drag_selected(Point::new(x, y));
    }

    /// Rotate frame: set the selected image's rotation, in degrees.
    pub fn rotate_selected(&mut self, degrees: f64) {
        self.inner.rotate_selected(degrees);
    }

    /// Transform-start event on the selected image's handles.
    pub fn resize_start(&mut self) {
        self.inner.resize_start();
    }

    /// Incremental transform event on the selected image.
    ///
    /// # Arguments
    /// * `scale_x`, `scale_y` - Scale factors reported by the transformer
    /// * `anchor` - Active anchor name (`"middle-right"`, `"top-left"`, ...)
    ///
    /// An unrecognized anchor name is ignored, like every other
    /// malformed gesture frame.
    pub fn resize_move(&mut self, scale_x: f64, scale_y: f64, anchor: &str) {
        if let Some(anchor) = Anchor::from_name(anchor) {
            self.inner.resize_move(scale_x, scale_y, anchor);
        }
    }

    /// Transform-end event on the selected image.
    pub fn resize_end(&mut self) {
        self.inner.resize_end();
    }

    /// Drag frame of the clip rectangle, in crop-group local space.
    pub fn drag_clip(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.inner.drag_clip(Rect::new(x, y, width, height));
    }

    /// Resize frame of the clip rectangle's own handles.
    pub fn transform_clip(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        scale_x: f64,
        scale_y: f64,
    ) {
        self.inner
            .transform_clip(Rect::new(x, y, width, height), scale_x, scale_y);
    }

    /// Rescale frame of the origin proxy.
    ///
    /// # Arguments
    /// * `scale_x`, `scale_y` - Scale factors reported by the transformer
    /// * `abs_x`, `abs_y` - The proxy's reported absolute position
    ///
    /// # Returns
    /// `true` if the frame was accepted, `false` if it was rolled back
    /// (the frontend then snaps the proxy node back to the scene state).
    pub fn rescale_origin(&mut self, scale_x: f64, scale_y: f64, abs_x: f64, abs_y: f64) -> bool {
        self.inner
            .rescale_origin(scale_x, scale_y, Point::new(abs_x, abs_y))
            == RescaleOutcome::Accepted
    }

    /// Derive the frame to render: placed images plus the optional crop
    /// overlay (origin proxy, mask, clip rectangle).
    ///
    /// # Returns
    /// A plain object mirroring the core `Scene` type.
    pub fn scene(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.scene())
    }
}
