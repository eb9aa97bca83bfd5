//! Sprite-sheet frame indexing.
//!
//! A sprite sheet divides a layer's buffer into an `hparts` x `vparts` grid
//! of equally sized frames, numbered row-major from the top-left. Selecting
//! a frame only moves the layer's view window; the buffer itself is never
//! touched.

use log::warn;

use crate::types::ViewBox;

/// Frame grid metadata for a sprite-sheet layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteSheet {
    hparts: u32,
    vparts: u32,
    frame_w: u32,
    frame_h: u32,
    index: u32,
}

impl SpriteSheet {
    /// Build a sheet over a buffer of the given dimensions.
    ///
    /// Frame size is the truncating division of the buffer extent by the
    /// part counts; a grid that does not divide evenly is accepted, the
    /// remainder pixels are just never shown. Returns `None` when a part
    /// count is zero or larger than the buffer extent.
    pub fn new(buf_w: u32, buf_h: u32, hparts: u32, vparts: u32) -> Option<Self> {
        if hparts == 0 || vparts == 0 || hparts > buf_w || vparts > buf_h {
            warn!(
                "sprite grid {}x{} invalid for {}x{} buffer",
                hparts, vparts, buf_w, buf_h
            );
            return None;
        }
        if buf_w % hparts != 0 || buf_h % vparts != 0 {
            warn!(
                "sprite grid {}x{} does not divide {}x{} buffer evenly",
                hparts, vparts, buf_w, buf_h
            );
        }
        Some(Self {
            hparts,
            vparts,
            frame_w: buf_w / hparts,
            frame_h: buf_h / vparts,
            index: 0,
        })
    }

    /// Total number of frames in the grid.
    pub const fn frame_count(&self) -> u32 {
        self.hparts * self.vparts
    }

    /// Currently selected frame, row-major from the top-left.
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Frame dimensions in pixels.
    pub const fn frame_size(&self) -> (u32, u32) {
        (self.frame_w, self.frame_h)
    }

    /// Select a frame. Out-of-range indices clamp to the last frame.
    pub fn set(&mut self, index: u32) {
        let last = self.frame_count() - 1;
        if index > last {
            warn!("sprite frame {} out of range, clamping to {}", index, last);
            self.index = last;
        } else {
            self.index = index;
        }
    }

    /// Advance to the next frame, wrapping to frame 0 past the end.
    pub fn next(&mut self) {
        self.index = (self.index + 1) % self.frame_count();
    }

    /// Step back to the previous frame, wrapping to the last frame.
    pub fn prev(&mut self) {
        self.index = (self.index + self.frame_count() - 1) % self.frame_count();
    }

    /// The view window covering the currently selected frame.
    pub const fn view(&self) -> ViewBox {
        ViewBox::new(
            (self.index % self.hparts) * self.frame_w,
            (self.index / self.hparts) * self.frame_h,
            self.frame_w,
            self.frame_h,
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
