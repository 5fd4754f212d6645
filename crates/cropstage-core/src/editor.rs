//! Editor facade.
//!
//! Owns the placed images, the selection registry, the resize-crop
//! adjuster, and at most one live crop session, and routes pointer and
//! gesture events between them:
//!
//! - click on an image selects it; click on the empty background clears
//!   the selection
//! - `begin_crop` opens a session for the selected image (the original
//!   UI triggers this on double-click)
//! - while a session is open, pointer-down on the darkening mask
//!   commits it; the target image is owned by the session and ordinary
//!   move/resize handlers stand down
//!
//! The facade also derives [`Scene`] snapshots for the rendering
//! collaborator. Derivation is pure (engine state in, geometry out);
//! the render layer applies them last and holds no state of its own.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{Point, Rect, Size};
use crate::image::{ImageId, PlacedImage, SourceBitmap};
use crate::resize::{Anchor, ResizeCropAdjuster};
use crate::selection::{HitTarget, Selection};
use crate::session::{CropSession, RescaleOutcome, SessionError};

/// Error from an editor lifecycle command.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("no image is selected")]
    NoSelection,
    #[error("a crop session is already active")]
    SessionAlreadyActive,
    #[error("no crop session is active")]
    NoActiveSession,
    #[error("unknown image id {0}")]
    UnknownImage(u32),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// One placed image as the render layer should draw it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageNode {
    pub id: ImageId,
    pub position: Point,
    pub rotation: f64,
    pub size: Size,
    /// Source-pixel crop window to sample the bitmap through.
    pub crop: Rect,
    /// Whether this image owns the visible transform handles.
    pub selected: bool,
    /// Hidden while a crop session shows its proxies instead.
    pub hidden: bool,
}

/// Session geometry for the render layer: origin proxy, darkening mask,
/// clipped preview, and the crop transformer's anchor position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionOverlay {
    /// Absolute position shared by the origin proxy and the clip group.
    pub group_position: Point,
    pub rotation: f64,
    /// Origin proxy (and preview proxy) size.
    pub origin_size: Size,
    /// Clip rectangle in group-local space; doubles as the clip region
    /// of the preview group.
    pub clip_rect: Rect,
    /// Absolute position of the clip rectangle, for the crop transformer.
    pub clip_absolute: Point,
}

/// Everything the render layer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub images: Vec<ImageNode>,
    pub session: Option<SessionOverlay>,
}

/// The engine's top-level state.
#[derive(Debug, Default)]
pub struct Editor {
    container: Size,
    images: Vec<PlacedImage>,
    selection: Selection,
    adjuster: ResizeCropAdjuster,
    session: Option<CropSession>,
}

impl Editor {
    pub fn new(container: Size) -> Self {
        Self {
            container,
            ..Self::default()
        }
    }

    /// Place a decoded bitmap on the canvas and return its id.
    pub fn add_image(&mut self, bitmap: SourceBitmap) -> ImageId {
        let id = ImageId(self.images.len() as u32);
        self.images.push(PlacedImage::place(bitmap, self.container));
        id
    }

    pub fn image(&self, id: ImageId) -> Option<&PlacedImage> {
        self.images.get(id.0 as usize)
    }

    pub fn images(&self) -> &[PlacedImage] {
        &self.images
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn session(&self) -> Option<&CropSession> {
        self.session.as_ref()
    }

    fn image_mut(&mut self, id: ImageId) -> Option<&mut PlacedImage> {
        self.images.get_mut(id.0 as usize)
    }

    fn selected_image_mut(&mut self) -> Option<&mut PlacedImage> {
        // The session owns the target exclusively; ordinary handlers
        // must not touch it until commit or cancel.
        if self.session.is_some() {
            return None;
        }
        let id = self.selection.selected_image()?;
        self.image_mut(id)
    }

    /// Route a pointer-down event from the rendering collaborator.
    pub fn pointer_down(&mut self, hit: HitTarget) {
        if self.session.is_some() {
            // The mask is the only commit trigger; hits on the session's
            // own surfaces (proxies, clip rect, handles) do nothing.
            if hit == HitTarget::Mask {
                // A stored session is always Active, so this cannot fail.
                self.commit_crop().ok();
            }
            return;
        }
        match hit {
            HitTarget::Background => self.selection.clear(),
            HitTarget::Image(id) => {
                if (id.0 as usize) < self.images.len() {
                    self.selection.select(id);
                }
            }
            HitTarget::Mask => {}
        }
    }

    /// Enter crop mode for the selected image.
    pub fn begin_crop(&mut self) -> Result<(), EditorError> {
        if self.session.is_some() {
            return Err(EditorError::SessionAlreadyActive);
        }
        let id = self
            .selection
            .selected_image()
            .ok_or(EditorError::NoSelection)?;
        let image = self.image(id).ok_or(EditorError::UnknownImage(id.0))?;

        self.session = Some(CropSession::begin(id, image));
        self.selection.enter_session();
        Ok(())
    }

    /// Commit the active session into its target image.
    pub fn commit_crop(&mut self) -> Result<(), EditorError> {
        let mut session = self.session.take().ok_or(EditorError::NoActiveSession)?;
        let target = session.target();
        let image = self
            .images
            .get_mut(target.0 as usize)
            .ok_or(EditorError::UnknownImage(target.0))?;

        session.commit(image)?;
        self.selection.leave_session();
        Ok(())
    }

    /// Discard the active session; the target image is left unchanged.
    pub fn cancel_crop(&mut self) -> Result<(), EditorError> {
        let mut session = self.session.take().ok_or(EditorError::NoActiveSession)?;
        session.cancel()?;
        self.selection.leave_session();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Placed-image gesture handlers (no session open). All silent no-ops
    // when there is nothing to act on.
    // ------------------------------------------------------------------

    /// Drag frame: move the selected image.
    pub fn drag_selected(&mut self, position: Point) {
        if let Some(image) = self.selected_image_mut() {
            image.position = position;
        }
    }

    /// Rotate frame: set the selected image's rotation, in degrees.
    pub fn rotate_selected(&mut self, rotation: f64) {
        if let Some(image) = self.selected_image_mut() {
            image.rotation = rotation;
        }
    }

    /// Transform-start event: snapshot the selected image's geometry.
    pub fn resize_start(&mut self) {
        if self.session.is_some() {
            return;
        }
        let Some(id) = self.selection.selected_image() else {
            return;
        };
        if let Some(image) = self.images.get(id.0 as usize) {
            self.adjuster.begin(image);
        }
    }

    /// Incremental transform event: fold the reported scale into the
    /// display size, then let the adjuster track the crop window for
    /// edge-midpoint anchors.
    pub fn resize_move(&mut self, scale_x: f64, scale_y: f64, anchor: Anchor) {
        if self.session.is_some() || !self.adjuster.is_active() {
            return;
        }
        let Some(id) = self.selection.selected_image() else {
            return;
        };
        if let Some(image) = self.images.get_mut(id.0 as usize) {
            image.apply_scale(scale_x, scale_y);
            self.adjuster.update(image, anchor);
        }
    }

    /// Transform-end event: clear the gesture snapshot.
    pub fn resize_end(&mut self) {
        self.adjuster.end();
    }

    // ------------------------------------------------------------------
    // Session gesture handlers, forwarded while a session is open.
    // ------------------------------------------------------------------

    pub fn drag_clip(&mut self, requested: Rect) {
        if let Some(session) = self.session.as_mut() {
            session.drag_clip(requested);
        }
    }

    pub fn transform_clip(&mut self, rect: Rect, scale_x: f64, scale_y: f64) {
        if let Some(session) = self.session.as_mut() {
            session.transform_clip(rect, scale_x, scale_y);
        }
    }

    pub fn rescale_origin(
        &mut self,
        scale_x: f64,
        scale_y: f64,
        origin_abs: Point,
    ) -> RescaleOutcome {
        match self.session.as_mut() {
            Some(session) => session.rescale_origin(scale_x, scale_y, origin_abs),
            None => RescaleOutcome::RolledBack,
        }
    }

    /// Derive the current frame for the rendering collaborator.
    pub fn scene(&self) -> Scene {
        let cropping = self.session.as_ref().map(CropSession::target);
        let images = self
            .images
            .iter()
            .enumerate()
            .map(|(index, image)| {
                let id = ImageId(index as u32);
                ImageNode {
                    id,
                    position: image.position,
                    rotation: image.rotation,
                    size: image.display_size,
                    crop: image.crop_window,
                    selected: cropping.is_none()
                        && self.selection.selected_image() == Some(id),
                    hidden: cropping == Some(id),
                }
            })
            .collect();

        let session = self.session.as_ref().map(|session| SessionOverlay {
            group_position: session.group_position(),
            rotation: session.rotation(),
            origin_size: session.origin_size(),
            clip_rect: session.clip_rect(),
            clip_absolute: session.clip_rect_absolute(),
        });

        Scene { images, session }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionState;

    fn editor_with_image() -> (Editor, ImageId) {
        let mut editor = Editor::new(Size::new(800.0, 600.0));
        let id = editor.add_image(SourceBitmap::new(800, 600));
        (editor, id)
    }

    #[test]
    fn test_add_image_places_and_ids() {
        let (editor, id) = editor_with_image();
        let image = editor.image(id).unwrap();

        assert!(image.crop_window_valid());
        assert_eq!(image.crop_window, Rect::new(0.0, 0.0, 800.0, 600.0));
    }

    #[test]
    fn test_click_selects_and_background_clears() {
        let (mut editor, id) = editor_with_image();

        editor.pointer_down(HitTarget::Image(id));
        assert_eq!(editor.selection().selected_image(), Some(id));

        editor.pointer_down(HitTarget::Background);
        assert_eq!(editor.selection().selected_image(), None);
    }

    #[test]
    fn test_begin_crop_requires_selection() {
        let (mut editor, _) = editor_with_image();
        assert!(matches!(
            editor.begin_crop(),
            Err(EditorError::NoSelection)
        ));
    }

    #[test]
    fn test_crop_flow_commit_via_mask() {
        let (mut editor, id) = editor_with_image();
        editor.pointer_down(HitTarget::Image(id));
        editor.begin_crop().unwrap();

        assert!(editor.session().is_some());
        assert!(editor.selection().is_cropping());

        // Shrink the pending crop to the left half of the proxy
        let clip = editor.session().unwrap().clip_rect();
        editor.transform_clip(clip, 0.5, 1.0);

        editor.pointer_down(HitTarget::Mask);
        assert!(editor.session().is_none());
        assert!(!editor.selection().is_cropping());

        let image = editor.image(id).unwrap();
        assert!((image.crop_window.width - 400.0).abs() < 1e-6);
        assert_eq!(image.crop_window.height, 600.0);
        assert!(image.crop_window_valid());
    }

    #[test]
    fn test_begin_crop_twice_is_rejected() {
        let (mut editor, id) = editor_with_image();
        editor.pointer_down(HitTarget::Image(id));
        editor.begin_crop().unwrap();

        assert!(matches!(
            editor.begin_crop(),
            Err(EditorError::SessionAlreadyActive)
        ));
    }

    #[test]
    fn test_cancel_crop_restores_normal_ownership() {
        let (mut editor, id) = editor_with_image();
        editor.pointer_down(HitTarget::Image(id));
        let before = editor.image(id).unwrap().clone();

        editor.begin_crop().unwrap();
        editor.drag_clip(Rect::new(50.0, 50.0, 100.0, 100.0));
        editor.cancel_crop().unwrap();

        assert!(editor.session().is_none());
        assert_eq!(editor.image(id).unwrap(), &before);
        // The image is selectable and movable again
        editor.drag_selected(Point::new(10.0, 20.0));
        assert_eq!(editor.image(id).unwrap().position, Point::new(10.0, 20.0));
    }

    #[test]
    fn test_session_owns_target_exclusively() {
        let (mut editor, id) = editor_with_image();
        editor.pointer_down(HitTarget::Image(id));
        editor.begin_crop().unwrap();
        let before = editor.image(id).unwrap().clone();

        // Ordinary handlers stand down while the session is open
        editor.drag_selected(Point::new(0.0, 0.0));
        editor.rotate_selected(45.0);
        editor.resize_start();
        editor.resize_move(2.0, 2.0, Anchor::MiddleRight);
        editor.resize_end();

        assert_eq!(editor.image(id).unwrap(), &before);
        assert_eq!(
            editor.session().unwrap().state(),
            SessionState::Active
        );
    }

    #[test]
    fn test_image_clicks_ignored_while_cropping() {
        let mut editor = Editor::new(Size::new(800.0, 600.0));
        let first = editor.add_image(SourceBitmap::new(800, 600));
        let second = editor.add_image(SourceBitmap::new(400, 400));

        editor.pointer_down(HitTarget::Image(first));
        editor.begin_crop().unwrap();

        editor.pointer_down(HitTarget::Image(second));
        assert!(editor.session().is_some());
        assert_eq!(editor.selection().selected_image(), Some(first));
    }

    #[test]
    fn test_resize_gesture_adjusts_crop() {
        let (mut editor, id) = editor_with_image();
        editor.pointer_down(HitTarget::Image(id));

        editor.resize_start();
        // Display width halves; the crop width follows proportionally
        editor.resize_move(0.5, 1.0, Anchor::MiddleLeft);
        editor.resize_end();

        let image = editor.image(id).unwrap();
        assert!((image.crop_window.width - 400.0).abs() < 1e-6);
        assert_eq!(image.crop_window.height, 600.0);
    }

    #[test]
    fn test_resize_move_without_start_is_noop() {
        let (mut editor, id) = editor_with_image();
        editor.pointer_down(HitTarget::Image(id));
        let before = editor.image(id).unwrap().clone();

        editor.resize_move(0.5, 1.0, Anchor::MiddleLeft);
        assert_eq!(editor.image(id).unwrap(), &before);
    }

    #[test]
    fn test_scene_hides_crop_target_and_shows_overlay() {
        let (mut editor, id) = editor_with_image();
        editor.pointer_down(HitTarget::Image(id));

        let scene = editor.scene();
        assert!(scene.images[0].selected);
        assert!(!scene.images[0].hidden);
        assert!(scene.session.is_none());

        editor.begin_crop().unwrap();
        let scene = editor.scene();
        assert!(scene.images[0].hidden);
        assert!(!scene.images[0].selected);

        let overlay = scene.session.unwrap();
        let session = editor.session().unwrap();
        assert_eq!(overlay.origin_size, session.origin_size());
        assert_eq!(overlay.clip_rect, session.clip_rect());
        assert_eq!(overlay.group_position, session.group_position());
    }

    #[test]
    fn test_commit_without_session_errors() {
        let (mut editor, _) = editor_with_image();
        assert!(matches!(
            editor.commit_crop(),
            Err(EditorError::NoActiveSession)
        ));
        assert!(matches!(
            editor.cancel_crop(),
            Err(EditorError::NoActiveSession)
        ));
    }
}
