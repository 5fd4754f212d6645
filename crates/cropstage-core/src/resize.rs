//! Resize-crop adjuster.
//!
//! Runs on every incremental resize of a placed image while *not* in a
//! crop session. Dragging an edge-midpoint handle changes one axis of
//! the display box; the crop window is recomputed proportionally so the
//! visible portion of the bitmap tracks the new box without stretching
//! the pixels and without ever requesting source pixels outside the
//! bitmap.
//!
//! Corner handles scale the display box uniformly and leave the crop
//! window alone; the adjuster ignores them.
//!
//! # Algorithm (width family; height is symmetric)
//!
//! Against the `lastSize`/`lastCrop` snapshot captured at gesture start:
//!
//! - Shrinking: the crop width scales down by `curWidth / lastWidth`.
//! - Growing: the crop width the new display aspect would need is
//!   `curWidth * lastCropHeight / lastHeight`. If that exceeds the room
//!   left in the bitmap past the crop origin, the *cross* axis's crop
//!   extent is constrained instead, from the space-limited ratio.
//!
//! Exactly one crop-window field changes per event.

use serde::{Deserialize, Serialize};

use crate::geometry::{Rect, Size};
use crate::image::PlacedImage;

/// Identity of the transform handle driving a gesture, passed in
/// explicitly by the caller rather than read back from the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anchor {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
    Rotater,
}

/// Display-box axis an edge-midpoint handle affects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResizeAxis {
    Width,
    Height,
}

impl Anchor {
    /// Parse a transformer anchor name (`"middle-right"`, `"rotater"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "top-left" => Some(Self::TopLeft),
            "top-center" => Some(Self::TopCenter),
            "top-right" => Some(Self::TopRight),
            "middle-left" => Some(Self::MiddleLeft),
            "middle-right" => Some(Self::MiddleRight),
            "bottom-left" => Some(Self::BottomLeft),
            "bottom-center" => Some(Self::BottomCenter),
            "bottom-right" => Some(Self::BottomRight),
            "rotater" => Some(Self::Rotater),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopCenter => "top-center",
            Self::TopRight => "top-right",
            Self::MiddleLeft => "middle-left",
            Self::MiddleRight => "middle-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomCenter => "bottom-center",
            Self::BottomRight => "bottom-right",
            Self::Rotater => "rotater",
        }
    }

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            Self::TopLeft | Self::TopRight | Self::BottomLeft | Self::BottomRight
        )
    }

    fn resize_axis(self) -> Option<ResizeAxis> {
        match self {
            Self::MiddleLeft | Self::MiddleRight => Some(ResizeAxis::Width),
            Self::TopCenter | Self::BottomCenter => Some(ResizeAxis::Height),
            _ => None,
        }
    }
}

/// Display size and crop window captured at resize-start; lives only
/// for the duration of one continuous drag gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeSnapshot {
    pub size: Size,
    pub crop: Rect,
}

/// The single crop-window field a resize event changes, if any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CropAdjustment {
    Unchanged,
    Width(f64),
    Height(f64),
}

/// Compute the crop-window adjustment for one resize event.
///
/// `cur` is the display size after the event's scale factors have been
/// folded in, `natural` the bitmap's source-pixel dimensions.
pub fn adjust_crop_window(
    snapshot: &ResizeSnapshot,
    cur: Size,
    anchor: Anchor,
    natural: Size,
) -> CropAdjustment {
    let Some(axis) = anchor.resize_axis() else {
        return CropAdjustment::Unchanged;
    };
    let last_size = snapshot.size;
    let last_crop = snapshot.crop;

    match axis {
        ResizeAxis::Width => {
            if cur.width < last_size.width {
                let ratio = cur.width / last_size.width;
                CropAdjustment::Width(last_crop.width * ratio)
            } else {
                let ratio = last_crop.height / last_size.height;
                let new_crop_width = cur.width * ratio;
                let room = natural.width - last_crop.x;
                if new_crop_width > room {
                    // Out of source pixels along the width; constrain the
                    // cross axis instead of crossing the bitmap boundary.
                    let ratio = room / cur.width;
                    CropAdjustment::Height(cur.height * ratio)
                } else {
                    CropAdjustment::Width(new_crop_width)
                }
            }
        }
        ResizeAxis::Height => {
            if cur.height < last_size.height {
                let ratio = cur.height / last_size.height;
                CropAdjustment::Height(last_crop.height * ratio)
            } else {
                let ratio = last_crop.width / last_size.width;
                let new_crop_height = cur.height * ratio;
                let room = natural.height - last_crop.y;
                if new_crop_height > room {
                    let ratio = room / cur.height;
                    CropAdjustment::Width(cur.width * ratio)
                } else {
                    CropAdjustment::Height(new_crop_height)
                }
            }
        }
    }
}

/// Gesture-scoped wrapper owning the resize snapshot.
#[derive(Debug, Clone, Default)]
pub struct ResizeCropAdjuster {
    snapshot: Option<ResizeSnapshot>,
}

impl ResizeCropAdjuster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the gesture-start snapshot (transform-start event).
    pub fn begin(&mut self, image: &PlacedImage) {
        self.snapshot = Some(ResizeSnapshot {
            size: image.display_size,
            crop: image.crop_window,
        });
    }

    /// Apply one incremental resize event to the image's crop window.
    ///
    /// Expects `image.apply_scale` to have already folded the event's
    /// scale factors into the display size. Without a snapshot (gesture
    /// never started, or already ended) this is a silent no-op.
    pub fn update(&self, image: &mut PlacedImage, anchor: Anchor) {
        let Some(snapshot) = &self.snapshot else {
            return;
        };
        let natural = image.bitmap.natural_size();
        match adjust_crop_window(snapshot, image.display_size, anchor, natural) {
            CropAdjustment::Unchanged => return,
            CropAdjustment::Width(width) => image.crop_window.width = width,
            CropAdjustment::Height(height) => image.crop_window.height = height,
        }
        // The cross-axis fallback is sized from the gesture axis's room
        // and can still overshoot its own axis when both scale factors
        // land in one event. Repair the extents only: the crop position
        // stays put, so the event still changes a single crop field.
        let crop = &mut image.crop_window;
        crop.width = crop.width.min(natural.width - crop.x);
        crop.height = crop.height.min(natural.height - crop.y);
    }

    /// Clear the snapshot (transform-end event), ready for the next gesture.
    pub fn end(&mut self) {
        self.snapshot = None;
    }

    pub fn is_active(&self) -> bool {
        self.snapshot.is_some()
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    use crate::geometry::Point;
    use crate::image::SourceBitmap;

    fn image_strategy() -> impl Strategy<Value = PlacedImage> {
        // Bitmap, a crop window inside it, and a display size for the crop
        (
            (200u32..=4000, 200u32..=4000),
            (0.0f64..=0.5, 0.0f64..=0.5),
            (0.25f64..=0.5, 0.25f64..=0.5),
            (50.0f64..=800.0, 50.0f64..=800.0),
        )
            .prop_map(|((nw, nh), (cx, cy), (cw, ch), (dw, dh))| {
                let natural = Size::new(f64::from(nw), f64::from(nh));
                PlacedImage {
                    bitmap: SourceBitmap::new(nw, nh),
                    position: Point::new(0.0, 0.0),
                    rotation: 0.0,
                    display_size: Size::new(dw, dh),
                    crop_window: Rect::new(
                        cx * natural.width,
                        cy * natural.height,
                        cw * natural.width,
                        ch * natural.height,
                    ),
                }
            })
    }

    fn snapshot_strategy() -> impl Strategy<Value = (ResizeSnapshot, Size)> {
        image_strategy().prop_map(|image| {
            (
                ResizeSnapshot {
                    size: image.display_size,
                    crop: image.crop_window,
                },
                image.bitmap.natural_size(),
            )
        })
    }

    proptest! {
        /// Property: a full resize event never leaves an invalid crop window.
        #[test]
        fn prop_resize_event_preserves_invariant(
            mut image in image_strategy(),
            scale in 0.2f64..=3.0,
            widthwise in proptest::bool::ANY,
        ) {
            let mut adjuster = ResizeCropAdjuster::new();
            adjuster.begin(&image);

            let (anchor, scale_x, scale_y) = if widthwise {
                (Anchor::MiddleRight, scale, 1.0)
            } else {
                (Anchor::BottomCenter, 1.0, scale)
            };
            image.apply_scale(scale_x, scale_y);
            adjuster.update(&mut image, anchor);

            prop_assert!(image.crop_window_valid());
        }

        /// Property: the gesture-axis adjustment never extends past the bitmap.
        #[test]
        fn prop_adjustment_stays_in_room(
            (snapshot, natural) in snapshot_strategy(),
            scale in 0.2f64..=3.0,
        ) {
            let cur = Size::new(snapshot.size.width * scale, snapshot.size.height);
            match adjust_crop_window(&snapshot, cur, Anchor::MiddleRight, natural) {
                CropAdjustment::Width(w) => {
                    prop_assert!(snapshot.crop.x + w <= natural.width + 1e-6);
                    prop_assert!(w > 0.0);
                }
                CropAdjustment::Height(h) => prop_assert!(h > 0.0),
                CropAdjustment::Unchanged => prop_assert!(false, "edge anchor must adjust"),
            }
        }

        /// Property: corner and rotate handles never produce an adjustment.
        #[test]
        fn prop_non_edge_anchors_unchanged(
            (snapshot, natural) in snapshot_strategy(),
            scale in 0.2f64..=3.0,
        ) {
            let cur = snapshot.size.scaled(scale, scale);
            for anchor in [
                Anchor::TopLeft,
                Anchor::TopRight,
                Anchor::BottomLeft,
                Anchor::BottomRight,
                Anchor::Rotater,
            ] {
                prop_assert_eq!(
                    adjust_crop_window(&snapshot, cur, anchor, natural),
                    CropAdjustment::Unchanged
                );
            }
        }

        /// Property: pure shrink scales the same axis and keeps proportions.
        #[test]
        fn prop_shrink_is_proportional(
            (snapshot, natural) in snapshot_strategy(),
            scale in 0.2f64..=0.99,
        ) {
            let cur = Size::new(snapshot.size.width * scale, snapshot.size.height);
            match adjust_crop_window(&snapshot, cur, Anchor::MiddleLeft, natural) {
                CropAdjustment::Width(w) => {
                    let expected = snapshot.crop.width * scale;
                    prop_assert!((w - expected).abs() < 1e-6);
                }
                other => prop_assert!(false, "expected width adjustment, got {:?}", other),
            }
        }
    }
}
