//! Cropstage Core - Crop/transform geometry engine
//!
//! This crate provides the geometry engine behind Cropstage's canvas
//! editor: placing raster images, resizing them with crop-aware
//! proportional adjustment, and the interactive crop session with its
//! origin/preview proxies and clip rectangle.
//!
//! The engine is render-free: it consumes pointer and transform events,
//! keeps every coordinate space consistent, and emits scene snapshots
//! for whatever scene-graph library draws the canvas. Decoding bitmaps,
//! hit-testing, and drawing are collaborators, not concerns of this
//! crate.
//!
//! # Module Structure
//!
//! - `geometry` - points, sizes, rectangles, local/absolute conversion
//! - `image` - the placed image model and its crop-window invariant
//! - `selection` - which image (or crop session) owns the handles
//! - `resize` - proportional crop adjustment during single-axis resize
//! - `session` - the crop-session state machine
//! - `editor` - facade routing events and deriving scene snapshots

pub mod editor;
pub mod geometry;
pub mod image;
pub mod resize;
pub mod selection;
pub mod session;

pub use editor::{Editor, EditorError, ImageNode, Scene, SessionOverlay};
pub use geometry::{Point, Rect, Size};
pub use image::{ImageId, PlacedImage, SourceBitmap};
pub use resize::{Anchor, CropAdjustment, ResizeCropAdjuster, ResizeSnapshot};
pub use selection::{HandleOwner, HitTarget, Selection};
pub use session::{CropSession, RescaleOutcome, SessionError, SessionState};
