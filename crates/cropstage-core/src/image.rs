//! Placed image model.
//!
//! A [`PlacedImage`] is one raster image instance on the canvas. Its
//! placement (position, rotation, display size) lives in display space;
//! its crop window lives in source-pixel space and selects the visible
//! sub-bitmap. The two are linked only through ratios, never through a
//! persistent scale factor: every resize folds the transformer's scale
//! back into `display_size` so crop math always runs against pixel sizes.
//!
//! # Crop window invariant
//!
//! At rest the crop window always satisfies:
//!
//! - `0 <= x` and `0 <= y`
//! - `x + width <= natural_width` and `y + height <= natural_height`
//! - `width > 0` and `height > 0`
//!
//! Mutations enforce this by clamping, never by rejecting.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect, Size};

/// Padding kept between a newly placed image and the container edges.
pub const FIT_PADDING: f64 = 12.0;

/// Identifier for a placed image within an editor document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageId(pub u32);

/// Natural dimensions of a decoded bitmap, in source-pixel units.
///
/// Decoding itself is the bitmap-source collaborator's job; the engine
/// only ever consumes the decoded result's dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceBitmap {
    pub natural_width: u32,
    pub natural_height: u32,
}

impl SourceBitmap {
    pub fn new(natural_width: u32, natural_height: u32) -> Self {
        Self {
            natural_width,
            natural_height,
        }
    }

    /// Natural dimensions as a display-space-compatible size.
    pub fn natural_size(&self) -> Size {
        Size::new(f64::from(self.natural_width), f64::from(self.natural_height))
    }

    /// The crop window covering the entire bitmap.
    pub fn full_window(&self) -> Rect {
        Rect::from_size(self.natural_size())
    }
}

/// One image instance on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedImage {
    /// Immutable decoded source bitmap dimensions.
    pub bitmap: SourceBitmap,
    /// Absolute position on the canvas (top-left corner of the display box).
    pub position: Point,
    /// Rotation in degrees, clockwise.
    pub rotation: f64,
    /// Display-space size. Scale is always folded in here, never stored.
    pub display_size: Size,
    /// Visible sub-bitmap, in source-pixel space.
    pub crop_window: Rect,
}

impl PlacedImage {
    /// Place a freshly loaded bitmap inside a container.
    ///
    /// The display size scales the bitmap to fit within the container
    /// minus [`FIT_PADDING`] on each side, never upscaling past 1:1, and
    /// the image is centered. The crop window starts as the full bitmap.
    pub fn place(bitmap: SourceBitmap, container: Size) -> Self {
        let natural = bitmap.natural_size();
        let scale_x = (container.width - FIT_PADDING * 2.0) / natural.width;
        let scale_y = (container.height - FIT_PADDING * 2.0) / natural.height;
        let scale = scale_x.min(scale_y).min(1.0);

        // A container smaller than the padding would invert the fit;
        // keep at least one display pixel per axis.
        let display_size = Size::new(
            (natural.width * scale).max(1.0),
            (natural.height * scale).max(1.0),
        );
        let position = Point::new(
            container.width / 2.0 - display_size.width / 2.0,
            container.height / 2.0 - display_size.height / 2.0,
        );

        Self {
            bitmap,
            position,
            rotation: 0.0,
            display_size,
            crop_window: bitmap.full_window(),
        }
    }

    /// Fold transformer scale factors into the display size.
    ///
    /// Must run before any crop-window math so that crop ratios are
    /// computed against pixel sizes, not scale factors.
    pub fn apply_scale(&mut self, scale_x: f64, scale_y: f64) {
        self.display_size = self.display_size.scaled(scale_x, scale_y);
    }

    /// Atomically replace crop window, display size, and position at the
    /// end of a crop session. The crop window is clamped into the bitmap
    /// bounds before being applied.
    pub fn apply_crop_commit(&mut self, crop_window: Rect, display_size: Size, position: Point) {
        self.crop_window = self.clamp_crop_window(crop_window);
        self.display_size = display_size;
        self.position = position;
    }

    /// Clamp a candidate crop window into the bitmap bounds.
    ///
    /// A negative origin folds into the width/height (the overlap with
    /// the bitmap is what survives), the far edge is cut at the bitmap
    /// boundary, and at least one source pixel is always kept.
    pub fn clamp_crop_window(&self, crop: Rect) -> Rect {
        let natural = self.bitmap.natural_size();

        let mut x = crop.x;
        let mut width = crop.width;
        if x < 0.0 {
            width += x;
            x = 0.0;
        }
        let mut y = crop.y;
        let mut height = crop.height;
        if y < 0.0 {
            height += y;
            y = 0.0;
        }

        x = x.min(natural.width - 1.0).max(0.0);
        y = y.min(natural.height - 1.0).max(0.0);
        width = width.max(1.0).min(natural.width - x);
        height = height.max(1.0).min(natural.height - y);

        Rect::new(x, y, width, height)
    }

    /// Check the crop-window invariant. Holds for any image at rest.
    pub fn crop_window_valid(&self) -> bool {
        let crop = self.crop_window;
        let natural = self.bitmap.natural_size();
        crop.x >= 0.0
            && crop.y >= 0.0
            && crop.right() <= natural.width
            && crop.bottom() <= natural.height
            && crop.width > 0.0
            && crop.height > 0.0
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
