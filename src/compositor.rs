//! Flattening the layer stack into a framebuffer.
//!
//! # API
//!
//! - `FrameBuffer` - the composite destination
//! - `render_frame` - paint a stack bottom-to-top into a framebuffer
//!
//! Compositing walks the stack bottom to top, copies each non-hidden
//! layer's view window to its screen position, scales per-pixel alpha by
//! the layer alpha and blends source-over (or copies straight under
//! `NOBLEND`). Anything outside the framebuffer is clipped silently.

use crate::error::StrataError;
use crate::stack::LayerStack;
use crate::types::{LayerFlags, Rgba};

/// The destination surface a stack is flattened into.
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
    background: Rgba,
}

impl FrameBuffer {
    /// Allocate a framebuffer with an opaque black background.
    pub fn new(width: u32, height: u32) -> Result<Self, StrataError> {
        if width == 0 || height == 0 {
            return Err(StrataError::ZeroDimension);
        }
        let size = width as usize * height as usize;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(size)
            .map_err(|_| StrataError::OutOfMemory)?;
        pixels.resize(size, Rgba::BLACK);
        Ok(Self {
            width,
            height,
            pixels,
            background: Rgba::BLACK,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The color every frame starts from.
    pub fn set_background(&mut self, color: Rgba) {
        self.background = color;
    }

    /// Read a composited pixel, `None` outside the framebuffer.
    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y as usize * self.width as usize + x as usize])
    }

    #[inline]
    fn put(&mut self, x: u32, y: u32, color: Rgba) {
        self.pixels[y as usize * self.width as usize + x as usize] = color;
    }

    fn clear(&mut self) {
        self.pixels.fill(self.background);
    }

    /// The composited pixels, row-major.
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }
}

/// Flatten the stack into `fb`, bottom layer first.
pub fn render_frame(stack: &LayerStack, fb: &mut FrameBuffer) {
    fb.clear();
    for layer in stack.iter_bottom_up() {
        if !layer.is_visible() {
            continue;
        }
        let view = layer.effective_view();
        let alpha = layer.alpha();
        let straight = layer.flags().contains(LayerFlags::NOBLEND);
        let buf = layer.buffer().borrow();

        for vy in 0..view.h {
            let dst_y = layer.y as i64 + vy as i64;
            if dst_y < 0 || dst_y >= fb.height as i64 {
                continue;
            }
            for vx in 0..view.w {
                let dst_x = layer.x as i64 + vx as i64;
                if dst_x < 0 || dst_x >= fb.width as i64 {
                    continue;
                }
                let Some(src) = buf.get(view.min_x + vx, view.min_y + vy) else {
                    continue;
                };
                let src = src.scale_alpha(alpha);
                let (dx, dy) = (dst_x as u32, dst_y as u32);
                if straight {
                    // straight copy carries transparent pixels too
                    fb.put(dx, dy, src);
                } else if !src.is_transparent() {
                    let dst = fb.pixels[dy as usize * fb.width as usize + dx as usize];
                    fb.put(dx, dy, src.over(dst));
                }
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ViewBox;

    #[test]
    fn test_framebuffer_rejects_zero() {
        assert!(FrameBuffer::new(0, 5).is_err());
        assert!(FrameBuffer::new(5, 0).is_err());
    }

    #[test]
    fn test_single_green_pixel() {
        // 10x10 layer at (2,3), green pixel at local (1,1)
        let mut stack = LayerStack::new();
        let id = stack.add_layer(2, 3, 10, 10).unwrap();
        stack.get_mut(id).unwrap().put_pixel(1, 1, Rgba::GREEN);

        let mut fb = FrameBuffer::new(20, 20).unwrap();
        render_frame(&stack, &mut fb);
        assert_eq!(fb.get(3, 4), Some(Rgba::GREEN));
        assert_eq!(fb.get(1, 1), Some(Rgba::BLACK));
    }

    #[test]
    fn test_hidden_layer_skipped() {
        let mut stack = LayerStack::new();
        let id = stack.add_layer(0, 0, 4, 4).unwrap();
        stack.get_mut(id).unwrap().fill(Rgba::RED);
        stack.hide(id);

        let mut fb = FrameBuffer::new(4, 4).unwrap();
        render_frame(&stack, &mut fb);
        assert_eq!(fb.get(0, 0), Some(Rgba::BLACK));
    }

    #[test]
    fn test_top_layer_paints_over() {
        let mut stack = LayerStack::new();
        let below = stack.add_layer(0, 0, 4, 4).unwrap();
        let above = stack.add_layer(0, 0, 4, 4).unwrap();
        stack.get_mut(below).unwrap().fill(Rgba::RED);
        stack.get_mut(above).unwrap().fill(Rgba::BLUE);

        let mut fb = FrameBuffer::new(4, 4).unwrap();
        render_frame(&stack, &mut fb);
        assert_eq!(fb.get(2, 2), Some(Rgba::BLUE));

        stack.to_top(below);
        render_frame(&stack, &mut fb);
        assert_eq!(fb.get(2, 2), Some(Rgba::RED));
    }

    #[test]
    fn test_layer_alpha_scales_pixels() {
        let mut stack = LayerStack::new();
        let id = stack.add_layer(0, 0, 2, 2).unwrap();
        {
            let layer = stack.get_mut(id).unwrap();
            layer.fill(Rgba::WHITE);
            layer.set_alpha(0.5);
        }
        let mut fb = FrameBuffer::new(2, 2).unwrap();
        render_frame(&stack, &mut fb);
        // white at alpha 128 over black: 255*128/255 = 128
        assert_eq!(fb.get(0, 0), Some(Rgba::rgb(128, 128, 128)));
    }

    #[test]
    fn test_noblend_copies_straight() {
        let mut stack = LayerStack::new();
        let id = stack.add_layer(0, 0, 2, 2).unwrap();
        {
            let layer = stack.get_mut(id).unwrap();
            layer.fill(Rgba::new(255, 0, 0, 100));
            layer.set_flags(LayerFlags::NOBLEND);
        }
        let mut fb = FrameBuffer::new(2, 2).unwrap();
        render_frame(&stack, &mut fb);
        // pixel lands with its own alpha, no blend with the background
        assert_eq!(fb.get(0, 0), Some(Rgba::new(255, 0, 0, 100)));
    }

    #[test]
    fn test_view_window_selects_region() {
        let mut stack = LayerStack::new();
        let id = stack.add_layer(0, 0, 4, 4).unwrap();
        {
            let layer = stack.get_mut(id).unwrap();
            layer.fill(Rgba::RED);
            layer.put_pixel(2, 2, Rgba::GREEN);
            layer.set_view(ViewBox::new(2, 2, 2, 2));
        }
        let mut fb = FrameBuffer::new(4, 4).unwrap();
        render_frame(&stack, &mut fb);
        // view origin maps to the layer position
        assert_eq!(fb.get(0, 0), Some(Rgba::GREEN));
        assert_eq!(fb.get(1, 0), Some(Rgba::RED));
        assert_eq!(fb.get(2, 2), Some(Rgba::BLACK));
    }

    #[test]
    fn test_offscreen_clipping() {
        let mut stack = LayerStack::new();
        let id = stack.add_layer(-2, -2, 4, 4).unwrap();
        stack.get_mut(id).unwrap().fill(Rgba::RED);

        let mut fb = FrameBuffer::new(3, 3).unwrap();
        render_frame(&stack, &mut fb);
        assert_eq!(fb.get(0, 0), Some(Rgba::RED)); // layer's (2,2)
        assert_eq!(fb.get(2, 2), Some(Rgba::BLACK));
    }

    #[test]
    fn test_background_color() {
        let stack = LayerStack::new();
        let mut fb = FrameBuffer::new(2, 2).unwrap();
        fb.set_background(Rgba::GRAY);
        render_frame(&stack, &mut fb);
        assert_eq!(fb.get(1, 1), Some(Rgba::GRAY));
    }
}
