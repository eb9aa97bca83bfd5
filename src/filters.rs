//! Whole-layer pixel transforms.
//!
//! # API
//!
//! - `brightness(layer, delta)` - shift every channel, saturating
//! - `flip_x(layer)` / `flip_y(layer)` - mirror the buffer
//! - `grayscale(layer)` - weighted luma conversion
//! - `invert(layer)` - invert color channels, alpha untouched
//! - `border(layer, color)` - 1-pixel frame around the buffer edge
//!
//! All filters rewrite the layer's buffer in place, so every instance
//! sharing that buffer sees the result.

use crate::layer::Layer;
use crate::types::Rgba;

fn map_pixels(layer: &mut Layer, f: impl Fn(Rgba) -> Rgba) {
    let (w, h) = layer.size();
    for y in 0..h {
        for x in 0..w {
            let px = layer.get_pixel(x, y);
            layer.put_pixel(x, y, f(px));
        }
    }
}

/// Shift every color channel by `delta`, saturating at 0 and 255.
pub fn brightness(layer: &mut Layer, delta: i32) {
    let shift = |c: u8| (c as i32 + delta).clamp(0, 255) as u8;
    map_pixels(layer, |px| Rgba::new(shift(px.r), shift(px.g), shift(px.b), px.a));
}

/// Mirror the buffer horizontally.
pub fn flip_x(layer: &mut Layer) {
    let (w, h) = layer.size();
    for y in 0..h {
        for x in 0..w / 2 {
            let left = layer.get_pixel(x, y);
            let right = layer.get_pixel(w - 1 - x, y);
            layer.put_pixel(x, y, right);
            layer.put_pixel(w - 1 - x, y, left);
        }
    }
}

/// Mirror the buffer vertically.
pub fn flip_y(layer: &mut Layer) {
    let (w, h) = layer.size();
    for y in 0..h / 2 {
        for x in 0..w {
            let top = layer.get_pixel(x, y);
            let bottom = layer.get_pixel(x, h - 1 - y);
            layer.put_pixel(x, y, bottom);
            layer.put_pixel(x, h - 1 - y, top);
        }
    }
}

/// Convert to grayscale with the usual luma weights.
pub fn grayscale(layer: &mut Layer) {
    map_pixels(layer, |px| {
        let luma =
            ((px.r as u32 * 299 + px.g as u32 * 587 + px.b as u32 * 114) / 1000) as u8;
        Rgba::new(luma, luma, luma, px.a)
    });
}

/// Invert the color channels. Alpha is left alone.
pub fn invert(layer: &mut Layer) {
    map_pixels(layer, |px| Rgba::new(255 - px.r, 255 - px.g, 255 - px.b, px.a));
}

/// Draw a one-pixel frame around the buffer edge.
pub fn border(layer: &mut Layer, color: Rgba) {
    let (w, h) = layer.size();
    for x in 0..w {
        layer.put_pixel(x, 0, color);
        layer.put_pixel(x, h - 1, color);
    }
    for y in 0..h {
        layer.put_pixel(0, y, color);
        layer.put_pixel(w - 1, y, color);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::LayerStack;

    fn layer_with(stack: &mut LayerStack, w: u32, h: u32) -> crate::types::LayerId {
        stack.add_layer(0, 0, w, h).unwrap()
    }

    #[test]
    fn test_brightness_saturates() {
        let mut stack = LayerStack::new();
        let id = layer_with(&mut stack, 2, 1);
        let layer = stack.get_mut(id).unwrap();
        layer.put_pixel(0, 0, Rgba::new(250, 10, 128, 200));

        brightness(layer, 20);
        assert_eq!(layer.get_pixel(0, 0), Rgba::new(255, 30, 148, 200));
        brightness(layer, -255);
        assert_eq!(layer.get_pixel(0, 0), Rgba::new(0, 0, 0, 200));
    }

    #[test]
    fn test_flip_x() {
        let mut stack = LayerStack::new();
        let id = layer_with(&mut stack, 3, 1);
        let layer = stack.get_mut(id).unwrap();
        layer.put_pixel(0, 0, Rgba::RED);
        layer.put_pixel(2, 0, Rgba::BLUE);

        flip_x(layer);
        assert_eq!(layer.get_pixel(0, 0), Rgba::BLUE);
        assert_eq!(layer.get_pixel(2, 0), Rgba::RED);
    }

    #[test]
    fn test_flip_y() {
        let mut stack = LayerStack::new();
        let id = layer_with(&mut stack, 1, 3);
        let layer = stack.get_mut(id).unwrap();
        layer.put_pixel(0, 0, Rgba::RED);

        flip_y(layer);
        assert_eq!(layer.get_pixel(0, 2), Rgba::RED);
        assert_eq!(layer.get_pixel(0, 0), Rgba::TRANSPARENT);
    }

    #[test]
    fn test_grayscale_preserves_alpha() {
        let mut stack = LayerStack::new();
        let id = layer_with(&mut stack, 1, 1);
        let layer = stack.get_mut(id).unwrap();
        layer.put_pixel(0, 0, Rgba::new(255, 0, 0, 77));

        grayscale(layer);
        let px = layer.get_pixel(0, 0);
        assert_eq!((px.r, px.g, px.b), (76, 76, 76)); // 255*299/1000
        assert_eq!(px.a, 77);
    }

    #[test]
    fn test_invert() {
        let mut stack = LayerStack::new();
        let id = layer_with(&mut stack, 1, 1);
        let layer = stack.get_mut(id).unwrap();
        layer.put_pixel(0, 0, Rgba::new(10, 20, 30, 40));

        invert(layer);
        assert_eq!(layer.get_pixel(0, 0), Rgba::new(245, 235, 225, 40));
    }

    #[test]
    fn test_border() {
        let mut stack = LayerStack::new();
        let id = layer_with(&mut stack, 4, 4);
        let layer = stack.get_mut(id).unwrap();

        border(layer, Rgba::WHITE);
        assert_eq!(layer.get_pixel(0, 0), Rgba::WHITE);
        assert_eq!(layer.get_pixel(3, 0), Rgba::WHITE);
        assert_eq!(layer.get_pixel(0, 3), Rgba::WHITE);
        assert_eq!(layer.get_pixel(1, 1), Rgba::TRANSPARENT);
    }

    #[test]
    fn test_filters_affect_shared_instances() {
        let mut stack = LayerStack::new();
        let a = stack.add_layer(0, 0, 2, 2).unwrap();
        let b = stack.add_instance(a, 5, 5).unwrap();
        stack.get_mut(a).unwrap().put_pixel(0, 0, Rgba::new(10, 20, 30, 255));

        invert(stack.get_mut(a).unwrap());
        assert_eq!(
            stack.get(b).unwrap().get_pixel(0, 0),
            Rgba::new(245, 235, 225, 255)
        );
    }
}
