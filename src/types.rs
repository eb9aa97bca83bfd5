//! Core types for strata.
//!
//! These types define the foundation the stack, compositor and dispatcher
//! build on: colors, view rectangles, layer handles and layer flags.

// =============================================================================
// Color
// =============================================================================

/// RGBA color with 8-bit channels (0-255).
///
/// Alpha 255 = fully opaque, 0 = fully transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    // Standard colors
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const GRAY: Self = Self::rgb(128, 128, 128);

    /// Check if the color is fully opaque.
    #[inline]
    pub const fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// Check if the color is fully transparent.
    #[inline]
    pub const fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Source-over composite of `self` onto `dst`.
    ///
    /// Per channel: `out = src*a + dst*(1-a)`, with the alpha channel
    /// combined as `out_a = a + dst_a*(1-a)`. Integer arithmetic only, so
    /// an opaque source is returned bit-exact and a transparent source
    /// leaves `dst` untouched.
    #[inline]
    pub fn over(self, dst: Self) -> Self {
        if self.is_opaque() {
            return self;
        }
        if self.is_transparent() {
            return dst;
        }

        let sa = self.a as u32;
        let inv = 255 - sa;

        Self {
            r: ((self.r as u32 * sa + dst.r as u32 * inv) / 255) as u8,
            g: ((self.g as u32 * sa + dst.g as u32 * inv) / 255) as u8,
            b: ((self.b as u32 * sa + dst.b as u32 * inv) / 255) as u8,
            a: (sa + dst.a as u32 * inv / 255) as u8,
        }
    }

    /// Scale the alpha channel by a factor in `[0.0, 1.0]`.
    ///
    /// Used by the compositor to apply a layer's uniform alpha on top of
    /// per-pixel alpha.
    #[inline]
    pub fn scale_alpha(self, factor: f32) -> Self {
        if factor >= 1.0 {
            return self;
        }
        let factor = factor.max(0.0);
        Self {
            a: (self.a as f32 * factor).round().clamp(0.0, 255.0) as u8,
            ..self
        }
    }
}

// =============================================================================
// ViewBox - the painted sub-rectangle of a layer buffer
// =============================================================================

/// The sub-rectangle of a layer's own buffer that is composited and
/// hit-tested. Coordinates are in the layer's buffer space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewBox {
    pub min_x: u32,
    pub min_y: u32,
    pub w: u32,
    pub h: u32,
}

impl ViewBox {
    /// Create a new view box.
    pub const fn new(min_x: u32, min_y: u32, w: u32, h: u32) -> Self {
        Self { min_x, min_y, w, h }
    }

    /// The full-buffer view for a buffer of the given dimensions.
    pub const fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Clamp this view into a buffer of the given dimensions.
    ///
    /// The origin is clamped inside the buffer first, then the extent is
    /// truncated so that `min + extent <= buffer extent`. Requests that
    /// exceed the buffer are truncated, never rejected.
    pub fn clamped_to(self, width: u32, height: u32) -> Self {
        let min_x = self.min_x.min(width);
        let min_y = self.min_y.min(height);
        Self {
            min_x,
            min_y,
            w: self.w.min(width - min_x),
            h: self.h.min(height - min_y),
        }
    }
}

// =============================================================================
// Layer handle
// =============================================================================

/// Opaque handle to a layer in a [`LayerStack`](crate::stack::LayerStack).
///
/// Handles are allocated monotonically and never reused, so a handle kept
/// past `destroy` can be detected instead of aliasing a newer layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(u64);

impl LayerId {
    pub(crate) const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw numeric value, useful for logging.
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

// =============================================================================
// Layer flags (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Per-layer marker flags checked by the compositor and dispatcher.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct LayerFlags: u8 {
        /// Layer is neither painted nor a hit-test candidate.
        const HIDDEN = 1 << 0;
        /// Compositor copies pixels straight instead of source-over.
        const NOBLEND = 1 << 1;
        /// Dispatcher applies drag movement even without a drag handler.
        const DRAGGABLE = 1 << 2;
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_over_opaque_replaces() {
        let src = Rgba::rgb(10, 20, 30);
        let dst = Rgba::rgb(200, 200, 200);
        assert_eq!(src.over(dst), src);
    }

    #[test]
    fn test_over_transparent_keeps_dst() {
        let src = Rgba::new(10, 20, 30, 0);
        let dst = Rgba::new(200, 100, 50, 128);
        assert_eq!(src.over(dst), dst);
    }

    #[test]
    fn test_over_half_alpha() {
        let src = Rgba::new(255, 0, 0, 128);
        let dst = Rgba::rgb(0, 0, 255);
        let out = src.over(dst);
        // 255*128/255 = 128, 255*127/255 = 127
        assert_eq!(out.r, 128);
        assert_eq!(out.g, 0);
        assert_eq!(out.b, 127);
        assert_eq!(out.a, 255); // over an opaque destination stays opaque
    }

    #[test]
    fn test_over_alpha_accumulates() {
        let src = Rgba::new(0, 0, 0, 128);
        let dst = Rgba::new(0, 0, 0, 128);
        let out = src.over(dst);
        // 128 + 128*127/255 = 128 + 63
        assert_eq!(out.a, 191);
    }

    #[test]
    fn test_scale_alpha() {
        let c = Rgba::new(10, 20, 30, 200);
        assert_eq!(c.scale_alpha(1.0), c);
        assert_eq!(c.scale_alpha(0.5).a, 100);
        assert_eq!(c.scale_alpha(0.0).a, 0);
        // Color channels untouched
        let half = c.scale_alpha(0.5);
        assert_eq!((half.r, half.g, half.b), (10, 20, 30));
    }

    #[test]
    fn test_viewbox_clamp_inside() {
        let v = ViewBox::new(10, 10, 20, 20).clamped_to(100, 100);
        assert_eq!(v, ViewBox::new(10, 10, 20, 20));
    }

    #[test]
    fn test_viewbox_clamp_truncates_extent() {
        let v = ViewBox::new(90, 95, 20, 20).clamped_to(100, 100);
        assert_eq!(v, ViewBox::new(90, 95, 10, 5));
    }

    #[test]
    fn test_viewbox_clamp_origin_out_of_range() {
        let v = ViewBox::new(200, 10, 20, 20).clamped_to(100, 100);
        assert_eq!(v.min_x, 100);
        assert_eq!(v.w, 0);
    }

    #[test]
    fn test_layer_flags() {
        let mut flags = LayerFlags::empty();
        flags |= LayerFlags::HIDDEN | LayerFlags::DRAGGABLE;
        assert!(flags.contains(LayerFlags::HIDDEN));
        assert!(!flags.contains(LayerFlags::NOBLEND));
        flags.remove(LayerFlags::HIDDEN);
        assert!(!flags.contains(LayerFlags::HIDDEN));
    }
}
