// SPDX-License-Identifier: GPL-3.0-only

//! Rolling history of the last four snapshots

use crate::constants::geometry::HISTORY_SLOTS;
use image::RgbaImage;
use std::path::{Path, PathBuf};

/// One history entry
#[derive(Debug, Clone)]
pub struct Slot {
    /// Thumbnail shown on screen; fully transparent while the slot is unused
    pub thumbnail: RgbaImage,
    /// Saved photo this thumbnail was made from
    pub source_path: Option<PathBuf>,
}

impl Slot {
    fn empty(width: u32, height: u32) -> Self {
        Self {
            thumbnail: RgbaImage::new(width, height),
            source_path: None,
        }
    }

    /// Whether a photo has been captured into this slot
    pub fn is_filled(&self) -> bool {
        self.source_path.is_some()
    }
}

/// Fixed ring of snapshots, most recent first
///
/// Owned by the sequencer; the only mutation is [`SnapshotHistory::rotate_in`].
#[derive(Debug, Clone)]
pub struct SnapshotHistory {
    slots: [Slot; HISTORY_SLOTS],
}

impl SnapshotHistory {
    /// Empty history with blank thumbnails of the given size
    pub fn new(thumb_width: u32, thumb_height: u32) -> Self {
        Self {
            slots: std::array::from_fn(|_| Slot::empty(thumb_width, thumb_height)),
        }
    }

    /// Push a new snapshot into slot 0. Every other slot shifts down one and
    /// the oldest is discarded.
    pub fn rotate_in(&mut self, thumbnail: RgbaImage, path: PathBuf) {
        self.slots.rotate_right(1);
        self.slots[0] = Slot {
            thumbnail,
            source_path: Some(path),
        };
    }

    /// All slots, most recent first
    pub fn current(&self) -> &[Slot; HISTORY_SLOTS] {
        &self.slots
    }

    /// Path of the most recent snapshot, if any has been taken
    pub fn latest_path(&self) -> Option<&Path> {
        self.slots[0].source_path.as_deref()
    }
}
