//! Pixel buffer backing a layer.
//!
//! A [`PixelBuffer`] is a width x height grid of RGBA pixels stored as a
//! flat byte vector. Layers share buffers through `Rc<RefCell<PixelBuffer>>`
//! so that instances alias one buffer; the buffer is freed when the last
//! aliasing layer drops its reference.

use crate::error::StrataError;
use crate::types::Rgba;

/// Owned RGBA pixel storage for one layer (or several aliasing instances).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Allocate a zeroed (transparent black) buffer.
    ///
    /// Fails with [`StrataError::ZeroDimension`] for empty dimensions and
    /// [`StrataError::OutOfMemory`] when the allocation is refused.
    pub fn new(width: u32, height: u32) -> Result<Self, StrataError> {
        if width == 0 || height == 0 {
            return Err(StrataError::ZeroDimension);
        }
        let size = width as usize * height as usize * 4;
        let mut data = Vec::new();
        data.try_reserve_exact(size)
            .map_err(|_| StrataError::OutOfMemory)?;
        data.resize(size, 0);
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Buffer width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Buffer height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Read the pixel at `(x, y)`, or `None` outside the buffer.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.offset(x, y);
        Some(Rgba::new(
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ))
    }

    /// Write the pixel at `(x, y)`. Out-of-bounds writes are dropped.
    #[inline]
    pub fn put(&mut self, x: u32, y: u32, color: Rgba) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = self.offset(x, y);
        self.data[i] = color.r;
        self.data[i + 1] = color.g;
        self.data[i + 2] = color.b;
        self.data[i + 3] = color.a;
    }

    /// Fill the whole buffer with one color.
    pub fn fill(&mut self, color: Rgba) {
        for px in self.data.chunks_exact_mut(4) {
            px[0] = color.r;
            px[1] = color.g;
            px[2] = color.b;
            px[3] = color.a;
        }
    }

    /// Raw RGBA bytes, row-major.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }
}

// =============================================================================
// Tests
// =============================================================================
