//! Layer: a positioned pixel buffer with a view window, flags and handlers.
//!
//! # API
//!
//! - Pixel access: `put_pixel`, `get_pixel`, `blend_pixel`, `fill`
//! - View window: `set_view`, `reset_view`, `resize`
//! - Sprite sheets: `init_sprite_sheet`, `set_sprite`, `next_sprite`, `prev_sprite`
//! - Visibility and flags: `show`, `hide`, `is_visible`, `set_flags`, `clear_flags`
//! - Event handlers: `on_hover`, `on_click`, `on_drag`, `on_key`
//!
//! A layer owns its buffer through `Rc<RefCell<PixelBuffer>>`; instances
//! created by the stack alias the same buffer. All pixel coordinates here
//! are buffer-local; screen placement is the stack's business.

pub mod sprite;

use std::cell::RefCell;
use std::rc::Rc;

use log::warn;

use crate::buffer::PixelBuffer;
use crate::error::StrataError;
use crate::event::{Event, Modifiers};
use crate::types::{LayerFlags, LayerId, Rgba, ViewBox};

use sprite::SpriteSheet;

/// Event handler attached to a layer (or globally to the dispatcher).
///
/// Receives the stack so it can mutate any layer, including destroying its
/// own. Returns `true` when the screen must be redrawn.
pub type Handler = Rc<dyn Fn(&mut crate::stack::LayerStack, &Event) -> bool>;

/// A per-layer key subscription: handler plus the keys it wants.
#[derive(Clone)]
pub struct KeyBinding {
    /// Key name to match, or `None` to catch every key.
    pub key: Option<String>,
    /// Modifiers that must be held exactly.
    pub modifiers: Modifiers,
    pub handler: Handler,
}

impl KeyBinding {
    /// Whether this binding wants the given key/modifier combination.
    pub fn matches(&self, key: &str, modifiers: &Modifiers) -> bool {
        self.modifiers == *modifiers
            && match &self.key {
                Some(want) => want == key,
                None => true,
            }
    }
}

/// A single layer in the stack.
pub struct Layer {
    id: LayerId,
    buffer: Rc<RefCell<PixelBuffer>>,
    /// Screen position of the view window's top-left corner.
    pub x: i32,
    pub y: i32,
    view: ViewBox,
    flags: LayerFlags,
    alpha: f32,
    sprite: Option<SpriteSheet>,
    pub(crate) hover: Option<Handler>,
    pub(crate) click: Option<Handler>,
    pub(crate) drag: Option<Handler>,
    pub(crate) key: Option<KeyBinding>,
}

impl Layer {
    pub(crate) fn new(id: LayerId, x: i32, y: i32, w: u32, h: u32) -> Result<Self, StrataError> {
        let buffer = PixelBuffer::new(w, h)?;
        Ok(Self {
            id,
            view: ViewBox::full(w, h),
            buffer: Rc::new(RefCell::new(buffer)),
            x,
            y,
            flags: LayerFlags::empty(),
            alpha: 1.0,
            sprite: None,
            hover: None,
            click: None,
            drag: None,
            key: None,
        })
    }

    /// Build an instance that shares `source`'s buffer. View, sprite state,
    /// alpha and flags are copied as starting values; handlers are not.
    pub(crate) fn instance_of(source: &Layer, id: LayerId, x: i32, y: i32) -> Self {
        Self {
            id,
            buffer: Rc::clone(&source.buffer),
            x,
            y,
            view: source.view,
            flags: source.flags,
            alpha: source.alpha,
            sprite: source.sprite,
            hover: None,
            click: None,
            drag: None,
            key: None,
        }
    }

    /// Like [`Layer::instance_of`] but with an independent deep copy of the
    /// pixel data.
    pub(crate) fn copy_of(source: &Layer, id: LayerId, x: i32, y: i32) -> Self {
        let mut layer = Self::instance_of(source, id, x, y);
        layer.buffer = Rc::new(RefCell::new(source.buffer.borrow().clone()));
        layer
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    /// Buffer dimensions.
    pub fn size(&self) -> (u32, u32) {
        let buf = self.buffer.borrow();
        (buf.width(), buf.height())
    }

    pub(crate) fn buffer(&self) -> &Rc<RefCell<PixelBuffer>> {
        &self.buffer
    }

    // =========================================================================
    // Pixel access
    // =========================================================================

    /// Write one pixel in buffer coordinates. Out-of-bounds is a no-op.
    pub fn put_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        self.buffer.borrow_mut().put(x, y, color);
    }

    /// Read one pixel; out-of-bounds reads yield transparent black.
    pub fn get_pixel(&self, x: u32, y: u32) -> Rgba {
        self.buffer.borrow().get(x, y).unwrap_or(Rgba::TRANSPARENT)
    }

    /// Source-over blend `color` onto the existing pixel.
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        let mut buf = self.buffer.borrow_mut();
        if let Some(dst) = buf.get(x, y) {
            buf.put(x, y, color.over(dst));
        }
    }

    /// Paint the entire buffer one color.
    pub fn fill(&mut self, color: Rgba) {
        self.buffer.borrow_mut().fill(color);
    }

    // =========================================================================
    // View window
    // =========================================================================

    /// The current view window.
    pub fn view(&self) -> ViewBox {
        self.view
    }

    /// Set the view window, clamped into the buffer.
    pub fn set_view(&mut self, view: ViewBox) {
        let (w, h) = self.size();
        let clamped = view.clamped_to(w, h);
        if clamped != view {
            warn!("layer {} view clamped to buffer bounds", self.id.raw());
        }
        self.view = clamped;
    }

    /// Restore the view to cover the full buffer.
    pub fn reset_view(&mut self) {
        let (w, h) = self.size();
        self.view = ViewBox::full(w, h);
    }

    /// The view window re-clamped to the buffer's current dimensions.
    ///
    /// A shared buffer can shrink underneath an instance via `resize`, so
    /// the compositor and hit test read through this instead of the raw view.
    pub fn effective_view(&self) -> ViewBox {
        let (w, h) = self.size();
        self.view.clamped_to(w, h)
    }

    /// Whether the screen point lands inside this layer's footprint
    /// (position plus view extent). Visibility is not checked here.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        let view = self.effective_view();
        x >= self.x
            && y >= self.y
            && x < self.x + view.w as i32
            && y < self.y + view.h as i32
    }

    /// Replace the buffer with a `w` x `h` one whose content is the old
    /// buffer shifted by `(min_x, min_y)`: `new[x, y] = old[x + min_x,
    /// y + min_y]` where that lands in the old buffer, transparent black
    /// elsewhere. Offsets may be negative. The view resets to the new full
    /// buffer and sprite metadata is discarded.
    pub fn resize(&mut self, min_x: i32, min_y: i32, w: u32, h: u32) -> Result<(), StrataError> {
        let mut next = PixelBuffer::new(w, h)?;
        {
            let old = self.buffer.borrow();
            for y in 0..h {
                for x in 0..w {
                    let src_x = x as i64 + min_x as i64;
                    let src_y = y as i64 + min_y as i64;
                    if src_x < 0 || src_y < 0 {
                        continue;
                    }
                    if let Some(px) = old.get(src_x as u32, src_y as u32) {
                        next.put(x, y, px);
                    }
                }
            }
        }
        *self.buffer.borrow_mut() = next;
        self.sprite = None;
        self.reset_view();
        Ok(())
    }

    // =========================================================================
    // Flags, visibility, alpha
    // =========================================================================

    pub fn flags(&self) -> LayerFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: LayerFlags) {
        self.flags |= flags;
    }

    pub fn clear_flags(&mut self, flags: LayerFlags) {
        self.flags -= flags;
    }

    pub fn show(&mut self) {
        self.flags -= LayerFlags::HIDDEN;
    }

    pub fn hide(&mut self) {
        self.flags |= LayerFlags::HIDDEN;
    }

    pub fn is_visible(&self) -> bool {
        !self.flags.contains(LayerFlags::HIDDEN)
    }

    /// Uniform layer alpha in `[0.0, 1.0]`, multiplied with per-pixel alpha
    /// at composite time. Out-of-range values clamp.
    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    // =========================================================================
    // Sprite sheets
    // =========================================================================

    /// Divide the buffer into an `hparts` x `vparts` frame grid and select
    /// frame 0. An invalid grid leaves the layer untouched.
    pub fn init_sprite_sheet(&mut self, hparts: u32, vparts: u32) {
        let (w, h) = self.size();
        if let Some(sheet) = SpriteSheet::new(w, h, hparts, vparts) {
            self.view = sheet.view();
            self.sprite = Some(sheet);
        }
    }

    /// Currently selected sprite frame, if the layer is a sprite sheet.
    pub fn sprite_index(&self) -> Option<u32> {
        self.sprite.as_ref().map(SpriteSheet::index)
    }

    /// Select a sprite frame; out-of-range clamps to the last frame.
    pub fn set_sprite(&mut self, index: u32) {
        if let Some(sheet) = self.sprite.as_mut() {
            sheet.set(index);
            self.view = sheet.view();
        }
    }

    /// Advance one frame, wrapping past the end.
    pub fn next_sprite(&mut self) {
        if let Some(sheet) = self.sprite.as_mut() {
            sheet.next();
            self.view = sheet.view();
        }
    }

    /// Step back one frame, wrapping past the start.
    pub fn prev_sprite(&mut self) {
        if let Some(sheet) = self.sprite.as_mut() {
            sheet.prev();
            self.view = sheet.view();
        }
    }

    // =========================================================================
    // Handlers
    // =========================================================================

    /// Install the hover handler (pointer enter/move/leave). Replaces any
    /// previous one; `None` removes it.
    pub fn on_hover(&mut self, handler: Option<Handler>) {
        self.hover = handler;
    }

    /// Install the click handler (pointer press/release).
    pub fn on_click(&mut self, handler: Option<Handler>) {
        self.click = handler;
    }

    /// Install the drag handler.
    pub fn on_drag(&mut self, handler: Option<Handler>) {
        self.drag = handler;
    }

    /// Subscribe to key events. `key = None` catches every key.
    pub fn on_key(&mut self, key: Option<String>, modifiers: Modifiers, handler: Handler) {
        self.key = Some(KeyBinding {
            key,
            modifiers,
            handler,
        });
    }

    /// Remove the key subscription.
    pub fn clear_key(&mut self) {
        self.key = None;
    }
}

// =============================================================================
// Tests
// =============================================================================
