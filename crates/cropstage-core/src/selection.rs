//! Selection registry.
//!
//! Tracks which single placed image, or which transient crop session,
//! currently owns the active resize/rotate handles. At most one owner
//! exists at a time; clicking the empty canvas background clears it.

use serde::{Deserialize, Serialize};

use crate::image::ImageId;

/// What a pointer-down event landed on, as reported by the rendering
/// collaborator's hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// The empty stage background.
    Background,
    /// A placed image node.
    Image(ImageId),
    /// The darkening mask overlay shown while a crop session is open.
    Mask,
}

/// Current owner of the transform handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HandleOwner {
    /// Nothing selected; no handles shown.
    #[default]
    None,
    /// A placed image owns the handles.
    Image(ImageId),
    /// A crop session owns the handles for this image; the image's own
    /// handles are hidden until the session ends.
    CropSession(ImageId),
}

/// Single-owner selection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    owner: HandleOwner,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owner(&self) -> HandleOwner {
        self.owner
    }

    /// The image the handles relate to, whether selected directly or
    /// through an open crop session.
    pub fn selected_image(&self) -> Option<ImageId> {
        match self.owner {
            HandleOwner::None => None,
            HandleOwner::Image(id) | HandleOwner::CropSession(id) => Some(id),
        }
    }

    pub fn is_cropping(&self) -> bool {
        matches!(self.owner, HandleOwner::CropSession(_))
    }

    /// Select a single image. Replaces any previous owner.
    pub fn select(&mut self, id: ImageId) {
        self.owner = HandleOwner::Image(id);
    }

    /// Clear the selection (empty-background click, `set_selection([])`).
    pub fn clear(&mut self) {
        self.owner = HandleOwner::None;
    }

    /// Hand the handles to a crop session for the selected image.
    /// Returns the target image, or `None` when nothing is selected.
    pub fn enter_session(&mut self) -> Option<ImageId> {
        match self.owner {
            HandleOwner::Image(id) => {
                self.owner = HandleOwner::CropSession(id);
                Some(id)
            }
            _ => None,
        }
    }

    /// Return the handles to the underlying image after commit or cancel.
    pub fn leave_session(&mut self) {
        if let HandleOwner::CropSession(id) = self.owner {
            self.owner = HandleOwner::Image(id);
        }
    }
}
