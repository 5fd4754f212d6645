//! Crop session state machine.
//!
//! Entered on "start crop" for the selected image, a [`CropSession`]
//! owns the transient geometry of the crop UI: an origin proxy showing
//! the full bitmap at the image's apparent natural scale, a masked
//! preview revealed only inside the clip rectangle, and the clip
//! rectangle itself. The session operates purely on this derived
//! geometry; the target image is only written at commit, when the clip
//! rectangle is inverted back into a source-pixel crop window.
//!
//! # States
//!
//! `Initializing -> Active -> { Committed | Cancelled }` (terminal).
//! Setup completes synchronously inside [`CropSession::begin`], so
//! callers only ever observe an `Active` or terminal session. Every
//! per-frame handler guards on `Active` and is a silent no-op otherwise.
//!
//! # Geometry
//!
//! All session-local coordinates live in the crop group's space, whose
//! absolute placement (`group_position`, `rotation`) is kept in lockstep
//! with the target image so the preview overlays the original exactly.
//! With `ratio = display_width / crop_width` at entry:
//!
//! - origin proxy size = `(ratio * natural_w, ratio * natural_h)`
//! - clip rectangle = the display box, local-positioned at
//!   `(crop_x * ratio, crop_y * ratio)`
//! - the group is shifted by the inverse crop mapping so the point for
//!   `(crop_x, crop_y)` in source space lands at the target's position
//!
//! Commit inverts with `ratio = origin_width / natural_width`, which is
//! the reciprocal mapping; entering and immediately committing leaves
//! the image numerically unchanged.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{to_absolute, to_local, Point, Rect, Size};
use crate::image::{ImageId, PlacedImage};

/// Lifecycle state of a crop session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Initializing,
    Active,
    Committed,
    Cancelled,
}

/// Error from a session lifecycle command.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("crop session is not active (state: {0:?})")]
    NotActive(SessionState),
}

/// Whether a rescale frame was applied or rolled back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RescaleOutcome {
    Accepted,
    RolledBack,
}

/// The one authoritative "last accepted" geometry snapshot the rescale
/// handler rolls back to. Updated only when a rescale frame is accepted,
/// so it always matches the live geometry between gestures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct AcceptedGeometry {
    origin_size: Size,
    group_position: Point,
}

/// Transient state of one crop interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropSession {
    state: SessionState,
    target: ImageId,
    /// Rotation shared by the origin proxy and the clip group.
    rotation: f64,
    /// Origin proxy size, in group-local units.
    origin_size: Size,
    /// Absolute position of the crop group (and the origin proxy, which
    /// sits at the group's local origin).
    group_position: Point,
    /// The pending crop, in group-local space.
    clip_rect: Rect,
    last_accepted: AcceptedGeometry,
}

impl CropSession {
    /// Open a session for `image`.
    ///
    /// Derives the origin-proxy geometry from the image's current crop
    /// window and placement, positions the clip rectangle over the
    /// visible region, and transitions straight to `Active`.
    pub fn begin(target: ImageId, image: &PlacedImage) -> Self {
        let natural = image.bitmap.natural_size();
        let ratio = image.display_size.width / image.crop_window.width;
        let origin_size = Size::new(ratio * natural.width, ratio * natural.height);

        // Local offset of the visible region inside the origin proxy
        let crop_offset = Point::new(image.crop_window.x * ratio, image.crop_window.y * ratio);

        // Shift the group by the inverse crop mapping: the proxy point
        // corresponding to (crop_x, crop_y) must land on the target's
        // current absolute position.
        let group_position = to_absolute(
            image.position,
            image.rotation,
            Point::new(-crop_offset.x, -crop_offset.y),
        );

        let clip_rect = Rect::new(
            crop_offset.x,
            crop_offset.y,
            image.display_size.width,
            image.display_size.height,
        )
        .clamp_within(origin_size);

        let mut session = Self {
            state: SessionState::Initializing,
            target,
            rotation: image.rotation,
            origin_size,
            group_position,
            clip_rect,
            last_accepted: AcceptedGeometry {
                origin_size,
                group_position,
            },
        };
        session.state = SessionState::Active;
        session
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn target(&self) -> ImageId {
        self.target
    }

    pub fn clip_rect(&self) -> Rect {
        self.clip_rect
    }

    pub fn origin_size(&self) -> Size {
        self.origin_size
    }

    pub fn group_position(&self) -> Point {
        self.group_position
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Absolute position of the clip rectangle's top-left corner.
    pub fn clip_rect_absolute(&self) -> Point {
        to_absolute(self.group_position, self.rotation, self.clip_rect.position())
    }

    /// Handle a drag frame of the clip rectangle.
    ///
    /// The requested rectangle (new position, unchanged size) is clamped
    /// into the origin proxy's bounds; a drag keeps the size, so the
    /// position is pushed back until the far edge fits. Silent no-op
    /// unless `Active`.
    pub fn drag_clip(&mut self, requested: Rect) {
        if self.state != SessionState::Active {
            return;
        }
        self.clip_rect = requested.clamp_within(self.origin_size);
    }

    /// Handle a resize frame of the clip rectangle's own handles.
    ///
    /// The transformer reports the rectangle plus accumulated scale
    /// factors; the scale is folded into the size, then the extent is
    /// trimmed to the room remaining at the rectangle's position. The
    /// position holds: only the size gives, so edges the user did not
    /// grab stay put. Silent no-op unless `Active`.
    pub fn transform_clip(&mut self, rect: Rect, scale_x: f64, scale_y: f64) {
        if self.state != SessionState::Active {
            return;
        }
        let scaled = Rect::new(rect.x, rect.y, rect.width * scale_x, rect.height * scale_y);
        self.clip_rect = scaled.trim_within(self.origin_size);
    }

    /// Handle a rescale frame of the origin proxy.
    ///
    /// `origin_abs` is the proxy's absolute position as reported by the
    /// gesture (scaling around a far anchor moves it). The new geometry
    /// is accepted only if the clip rectangle stays strictly inside the
    /// resized proxy (closed boundary test); otherwise everything rolls
    /// back to the last accepted geometry and the clip rectangle keeps
    /// its absolute position. Idempotent per frame; no state transition
    /// either way.
    pub fn rescale_origin(
        &mut self,
        scale_x: f64,
        scale_y: f64,
        origin_abs: Point,
    ) -> RescaleOutcome {
        if self.state != SessionState::Active {
            return RescaleOutcome::RolledBack;
        }

        let new_size = self.origin_size.scaled(scale_x, scale_y);

        // The clip rectangle holds its place on the canvas while the
        // group adopts the proxy's reported position.
        let clip_abs = self.clip_rect_absolute();
        let candidate_local = to_local(origin_abs, self.rotation, clip_abs);
        let candidate = Rect::new(
            candidate_local.x,
            candidate_local.y,
            self.clip_rect.width,
            self.clip_rect.height,
        );

        if !candidate.strictly_inside(new_size) {
            // Reject the frame wholesale: geometry returns to the last
            // accepted snapshot, scale renormalized to 1.
            self.origin_size = self.last_accepted.origin_size;
            self.group_position = self.last_accepted.group_position;
            let restored = to_local(self.group_position, self.rotation, clip_abs);
            self.clip_rect.x = restored.x;
            self.clip_rect.y = restored.y;
            return RescaleOutcome::RolledBack;
        }

        self.origin_size = new_size;
        self.group_position = origin_abs;
        self.clip_rect.x = candidate.x;
        self.clip_rect.y = candidate.y;
        self.last_accepted = AcceptedGeometry {
            origin_size: new_size,
            group_position: origin_abs,
        };
        RescaleOutcome::Accepted
    }

    /// Commit the pending crop into the target image.
    ///
    /// Inverts the clip geometry into source-pixel space with
    /// `ratio = origin_width / natural_width`, applies the clip size as
    /// the new display size and the clip rectangle's absolute position
    /// as the new placement, and transitions to `Committed`.
    pub fn commit(&mut self, image: &mut PlacedImage) -> Result<(), SessionError> {
        if self.state != SessionState::Active {
            return Err(SessionError::NotActive(self.state));
        }

        // Re-read the true source resolution at commit time
        let natural = image.bitmap.natural_size();
        let ratio = self.origin_size.width / natural.width;
        let crop_window = Rect::new(
            self.clip_rect.x / ratio,
            self.clip_rect.y / ratio,
            self.clip_rect.width * natural.width / self.origin_size.width,
            self.clip_rect.height * natural.height / self.origin_size.height,
        );
        let position = self.clip_rect_absolute();

        image.apply_crop_commit(crop_window, self.clip_rect.size(), position);
        self.state = SessionState::Committed;
        Ok(())
    }

    /// Discard the session; the target image is left untouched.
    pub fn cancel(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Active {
            return Err(SessionError::NotActive(self.state));
        }
        self.state = SessionState::Cancelled;
        Ok(())
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
