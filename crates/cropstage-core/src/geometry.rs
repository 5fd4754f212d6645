//! Geometry primitives shared by the crop engine.
//!
//! All placement math runs in two coordinate systems:
//!
//! - **Source-pixel space**: the decoded bitmap's native resolution.
//! - **Display space**: the canvas, after placement translation and rotation.
//!
//! During a crop session there is additionally the crop group's *local*
//! space, related to display space by a translation (the group's absolute
//! position) and a rotation. [`to_absolute`] and [`to_local`] convert
//! between the two; they are exact inverses of each other.
//!
//! Scale never appears in these conversions: the engine folds transformer
//! scale factors into widths and heights immediately, so every stored
//! geometry is at scale 1.

use serde::{Deserialize, Serialize};

/// A point in canvas or local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A width/height pair. Always at scale 1.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Component-wise scale, used when folding transformer scale factors
    /// back into a stored size.
    pub fn scaled(self, scale_x: f64, scale_y: f64) -> Self {
        Self::new(self.width * scale_x, self.height * scale_y)
    }
}

/// An axis-aligned rectangle in a single coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Clamp this rectangle into `[0, bounds.width] x [0, bounds.height]`.
    ///
    /// Size is shrunk first (a rectangle larger than the bounds can never
    /// fit), then the position is clamped so the far edge stays inside.
    /// The result is independent of how far out of range the request was,
    /// which makes the clamp idempotent: clamping a clamped rectangle is
    /// a no-op.
    ///
    /// Used for dragging the clip rectangle: a drag keeps the size, so
    /// an overhanging rectangle is pushed back inside.
    pub fn clamp_within(&self, bounds: Size) -> Rect {
        let width = self.width.min(bounds.width);
        let height = self.height.min(bounds.height);
        let x = self.x.clamp(0.0, (bounds.width - width).max(0.0));
        let y = self.y.clamp(0.0, (bounds.height - height).max(0.0));
        Rect::new(x, y, width, height)
    }

    /// Clamp for a resize request: the position holds and the size gives.
    ///
    /// A negative origin folds into the extent, and an extent past the
    /// far edge is cut to the room remaining at the held position. Used
    /// for resizing the clip rectangle, where pushing the rectangle back
    /// toward the origin would move the edges the user did not grab.
    /// Idempotent, like [`Rect::clamp_within`].
    pub fn trim_within(&self, bounds: Size) -> Rect {
        let mut x = self.x;
        let mut y = self.y;
        let mut width = self.width;
        let mut height = self.height;
        if x < 0.0 {
            width += x;
            x = 0.0;
        }
        if y < 0.0 {
            height += y;
            y = 0.0;
        }
        let x = x.min(bounds.width);
        let y = y.min(bounds.height);
        let width = width.clamp(0.0, bounds.width - x);
        let height = height.clamp(0.0, bounds.height - y);
        Rect::new(x, y, width, height)
    }

    /// Closed-boundary containment test used by the rescale handler:
    /// a rectangle touching any edge of `bounds` does *not* count as
    /// strictly inside.
    pub fn strictly_inside(&self, bounds: Size) -> bool {
        self.x > 0.0 && self.y > 0.0 && self.right() < bounds.width && self.bottom() < bounds.height
    }
}

/// Convert a point in a group's local space to absolute canvas space.
///
/// `origin` is the group's absolute position and `rotation_deg` its
/// rotation in degrees (positive = clockwise, matching canvas convention
/// where the y axis points down).
pub fn to_absolute(origin: Point, rotation_deg: f64, local: Point) -> Point {
    let (sin, cos) = rotation_deg.to_radians().sin_cos();
    Point::new(
        origin.x + local.x * cos - local.y * sin,
        origin.y + local.x * sin + local.y * cos,
    )
}

/// Convert an absolute canvas point into a group's local space.
///
/// Exact inverse of [`to_absolute`] for the same `origin` and rotation.
pub fn to_local(origin: Point, rotation_deg: f64, absolute: Point) -> Point {
    let (sin, cos) = rotation_deg.to_radians().sin_cos();
    let dx = absolute.x - origin.x;
    let dy = absolute.y - origin.y;
    Point::new(dx * cos + dy * sin, -dx * sin + dy * cos)
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn bounds_strategy() -> impl Strategy<Value = Size> {
        (10.0f64..=2000.0, 10.0f64..=2000.0).prop_map(|(w, h)| Size::new(w, h))
    }

    fn rect_strategy() -> impl Strategy<Value = Rect> {
        (
            -500.0f64..=2500.0,
            -500.0f64..=2500.0,
            1.0f64..=3000.0,
            1.0f64..=3000.0,
        )
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    proptest! {
        // The prop_assume! filters below reject most generated rects, so allow
        // more global rejections than the default budget of 1024.
        #![proptest_config(ProptestConfig {
            max_global_rejects: 65536,
            ..ProptestConfig::default()
        })]

        /// Property: the clamped rectangle always lies inside the bounds.
        #[test]
        fn prop_clamp_lands_inside_bounds(
            bounds in bounds_strategy(),
            rect in rect_strategy(),
        ) {
            let clamped = rect.clamp_within(bounds);

            prop_assert!(clamped.x >= 0.0);
            prop_assert!(clamped.y >= 0.0);
            prop_assert!(clamped.right() <= bounds.width + 1e-9);
            prop_assert!(clamped.bottom() <= bounds.height + 1e-9);
        }

        /// Property: clamping twice gives the same result as clamping once.
        #[test]
        fn prop_clamp_idempotent(
            bounds in bounds_strategy(),
            rect in rect_strategy(),
        ) {
            let once = rect.clamp_within(bounds);
            let twice = once.clamp_within(bounds);

            prop_assert_eq!(once, twice);
        }

        /// Property: clamping never grows the rectangle.
        #[test]
        fn prop_clamp_never_grows(
            bounds in bounds_strategy(),
            rect in rect_strategy(),
        ) {
            let clamped = rect.clamp_within(bounds);

            prop_assert!(clamped.width <= rect.width + 1e-9);
            prop_assert!(clamped.height <= rect.height + 1e-9);
        }

        /// Property: the trimmed rectangle always lies inside the bounds.
        #[test]
        fn prop_trim_lands_inside_bounds(
            bounds in bounds_strategy(),
            rect in rect_strategy(),
        ) {
            let trimmed = rect.trim_within(bounds);

            prop_assert!(trimmed.x >= 0.0);
            prop_assert!(trimmed.y >= 0.0);
            prop_assert!(trimmed.right() <= bounds.width + 1e-9);
            prop_assert!(trimmed.bottom() <= bounds.height + 1e-9);
        }

        /// Property: trimming never moves an in-range position.
        #[test]
        fn prop_trim_holds_in_range_position(
            bounds in bounds_strategy(),
            rect in rect_strategy(),
        ) {
            prop_assume!(rect.x >= 0.0 && rect.x <= bounds.width);
            prop_assume!(rect.y >= 0.0 && rect.y <= bounds.height);
            let trimmed = rect.trim_within(bounds);

            prop_assert_eq!(trimmed.x, rect.x);
            prop_assert_eq!(trimmed.y, rect.y);
        }

        /// Property: trimming twice gives the same result as trimming once.
        #[test]
        fn prop_trim_idempotent(
            bounds in bounds_strategy(),
            rect in rect_strategy(),
        ) {
            let once = rect.trim_within(bounds);
            let twice = once.trim_within(bounds);

            prop_assert_eq!(once, twice);
        }

        /// Property: local -> absolute -> local round-trips within tolerance.
        #[test]
        fn prop_transform_round_trip(
            ox in -1000.0f64..=1000.0,
            oy in -1000.0f64..=1000.0,
            rotation in -360.0f64..=360.0,
            lx in -1000.0f64..=1000.0,
            ly in -1000.0f64..=1000.0,
        ) {
            let origin = Point::new(ox, oy);
            let local = Point::new(lx, ly);

            let abs = to_absolute(origin, rotation, local);
            let back = to_local(origin, rotation, abs);

            prop_assert!((back.x - local.x).abs() < 1e-6);
            prop_assert!((back.y - local.y).abs() < 1e-6);
        }
    }
}
