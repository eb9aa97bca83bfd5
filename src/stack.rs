//! The layer stack: an ordered registry of layers.
//!
//! # API
//!
//! - Lifecycle: `add_layer`, `add_instance`, `add_copy`, `destroy`
//! - Ordering: `to_top`, `to_bottom`, `to_above`, `to_below`, `swap`,
//!   `top`, `bottom`, `iter_bottom_up`
//! - Geometry: `move_relative`, `place`, `show`, `hide`
//! - Queries: `get`, `get_mut`, `hit_test`, `find_key_target`, `len`
//! - Dirty tracking: `take_dirty`
//!
//! Stack order is bottom-to-top. Handles are monotonic and never reused;
//! operations on a stale handle log a warning and do nothing.

use std::collections::HashMap;

use log::warn;

use crate::error::StrataError;
use crate::layer::Layer;
use crate::types::{LayerId, ViewBox};

/// Ordered collection of layers, bottom to top.
#[derive(Default)]
pub struct LayerStack {
    layers: HashMap<LayerId, Layer>,
    /// Stack order, index 0 = bottom.
    order: Vec<LayerId>,
    next_id: u64,
    dirty: bool,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc_id(&mut self) -> LayerId {
        self.next_id += 1;
        LayerId::from_raw(self.next_id)
    }

    fn position(&self, id: LayerId) -> Option<usize> {
        self.order.iter().position(|&l| l == id)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Create a layer with a fresh transparent buffer, placed on top.
    pub fn add_layer(&mut self, x: i32, y: i32, w: u32, h: u32) -> Result<LayerId, StrataError> {
        let id = self.alloc_id();
        let layer = Layer::new(id, x, y, w, h)?;
        self.layers.insert(id, layer);
        self.order.push(id);
        self.dirty = true;
        Ok(id)
    }

    /// Create a layer sharing `source`'s pixel buffer, placed on top.
    ///
    /// View, sprite state, alpha and flags are copied as starting values;
    /// handlers are not. Painting through either layer is visible in both.
    pub fn add_instance(
        &mut self,
        source: LayerId,
        x: i32,
        y: i32,
    ) -> Result<LayerId, StrataError> {
        let id = self.alloc_id();
        let layer = {
            let src = self.layers.get(&source).ok_or(StrataError::UnknownLayer)?;
            Layer::instance_of(src, id, x, y)
        };
        self.layers.insert(id, layer);
        self.order.push(id);
        self.dirty = true;
        Ok(id)
    }

    /// Like [`LayerStack::add_instance`] but with an independent copy of the
    /// pixel data.
    pub fn add_copy(&mut self, source: LayerId, x: i32, y: i32) -> Result<LayerId, StrataError> {
        let id = self.alloc_id();
        let layer = {
            let src = self.layers.get(&source).ok_or(StrataError::UnknownLayer)?;
            Layer::copy_of(src, id, x, y)
        };
        self.layers.insert(id, layer);
        self.order.push(id);
        self.dirty = true;
        Ok(id)
    }

    /// Remove a layer. Its buffer is freed once no instance aliases it.
    pub fn destroy(&mut self, id: LayerId) {
        if self.layers.remove(&id).is_none() {
            warn!("destroy: unknown layer {}", id.raw());
            return;
        }
        self.order.retain(|&l| l != id);
        self.dirty = true;
    }

    // =========================================================================
    // Access
    // =========================================================================

    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(&id)
    }

    /// Mutable access. Marks the stack dirty, since the borrow can change
    /// anything the compositor reads.
    pub fn get_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.dirty = true;
        self.layers.get_mut(&id)
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.layers.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Layers in paint order, bottom first.
    pub fn iter_bottom_up(&self) -> impl Iterator<Item = &Layer> {
        self.order.iter().filter_map(|id| self.layers.get(id))
    }

    // =========================================================================
    // Ordering
    // =========================================================================

    /// The topmost layer, if any.
    pub fn top(&self) -> Option<LayerId> {
        self.order.last().copied()
    }

    /// The bottom layer, if any.
    pub fn bottom(&self) -> Option<LayerId> {
        self.order.first().copied()
    }

    /// Raise a layer to the top of the stack.
    pub fn to_top(&mut self, id: LayerId) {
        let Some(pos) = self.position(id) else {
            warn!("to_top: unknown layer {}", id.raw());
            return;
        };
        self.order.remove(pos);
        self.order.push(id);
        self.dirty = true;
    }

    /// Sink a layer to the bottom of the stack.
    pub fn to_bottom(&mut self, id: LayerId) {
        let Some(pos) = self.position(id) else {
            warn!("to_bottom: unknown layer {}", id.raw());
            return;
        };
        self.order.remove(pos);
        self.order.insert(0, id);
        self.dirty = true;
    }

    /// Place `id` directly above `target`. A self target is a no-op.
    pub fn to_above(&mut self, id: LayerId, target: LayerId) {
        if id == target {
            return;
        }
        let (Some(pos), Some(_)) = (self.position(id), self.position(target)) else {
            warn!("to_above: unknown layer");
            return;
        };
        self.order.remove(pos);
        // target's index may have shifted after the removal
        if let Some(tpos) = self.position(target) {
            self.order.insert(tpos + 1, id);
        }
        self.dirty = true;
    }

    /// Place `id` directly below `target`. A self target is a no-op.
    pub fn to_below(&mut self, id: LayerId, target: LayerId) {
        if id == target {
            return;
        }
        let (Some(pos), Some(_)) = (self.position(id), self.position(target)) else {
            warn!("to_below: unknown layer");
            return;
        };
        self.order.remove(pos);
        if let Some(tpos) = self.position(target) {
            self.order.insert(tpos, id);
        }
        self.dirty = true;
    }

    /// Exchange two layers' stack positions. A self swap is a no-op.
    pub fn swap(&mut self, a: LayerId, b: LayerId) {
        if a == b {
            return;
        }
        let (Some(pa), Some(pb)) = (self.position(a), self.position(b)) else {
            warn!("swap: unknown layer");
            return;
        };
        self.order.swap(pa, pb);
        self.dirty = true;
    }

    // =========================================================================
    // Geometry and visibility
    // =========================================================================

    /// Shift a layer by a screen-space delta.
    pub fn move_relative(&mut self, id: LayerId, dx: i32, dy: i32) {
        match self.layers.get_mut(&id) {
            Some(layer) => {
                layer.x += dx;
                layer.y += dy;
                self.dirty = true;
            }
            None => warn!("move_relative: unknown layer {}", id.raw()),
        }
    }

    /// Move a layer to an absolute screen position.
    pub fn place(&mut self, id: LayerId, x: i32, y: i32) {
        match self.layers.get_mut(&id) {
            Some(layer) => {
                layer.x = x;
                layer.y = y;
                self.dirty = true;
            }
            None => warn!("place: unknown layer {}", id.raw()),
        }
    }

    pub fn show(&mut self, id: LayerId) {
        match self.layers.get_mut(&id) {
            Some(layer) => {
                layer.show();
                self.dirty = true;
            }
            None => warn!("show: unknown layer {}", id.raw()),
        }
    }

    pub fn hide(&mut self, id: LayerId) {
        match self.layers.get_mut(&id) {
            Some(layer) => {
                layer.hide();
                self.dirty = true;
            }
            None => warn!("hide: unknown layer {}", id.raw()),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The topmost visible layer whose footprint contains the screen point.
    ///
    /// The first geometric hit wins: layers underneath it are shadowed even
    /// when the hit layer has no handlers installed.
    pub fn hit_test(&self, x: i32, y: i32) -> Option<LayerId> {
        self.order
            .iter()
            .rev()
            .filter_map(|id| self.layers.get(id))
            .find(|layer| layer.is_visible() && layer.contains(x, y))
            .map(Layer::id)
    }

    /// The topmost layer whose key binding matches. Hidden layers still
    /// receive keys; only pointer routing respects visibility.
    pub fn find_key_target(&self, key: &str, modifiers: &crate::event::Modifiers) -> Option<LayerId> {
        self.order
            .iter()
            .rev()
            .filter_map(|id| self.layers.get(id))
            .find(|layer| {
                layer
                    .key
                    .as_ref()
                    .is_some_and(|binding| binding.matches(key, modifiers))
            })
            .map(Layer::id)
    }

    // =========================================================================
    // Dirty tracking
    // =========================================================================

    /// Take the accumulated dirty flag, resetting it.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Convenience for tests and hosts: the effective view of a layer.
    pub fn view_of(&self, id: LayerId) -> Option<ViewBox> {
        self.layers.get(&id).map(Layer::effective_view)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Modifiers;
    use crate::types::Rgba;
    use std::rc::Rc;

    fn stack_of(n: usize) -> (LayerStack, Vec<LayerId>) {
        let mut stack = LayerStack::new();
        let ids = (0..n)
            .map(|_| stack.add_layer(0, 0, 10, 10).unwrap())
            .collect();
        (stack, ids)
    }

    fn order(stack: &LayerStack) -> Vec<LayerId> {
        stack.iter_bottom_up().map(Layer::id).collect()
    }

    #[test]
    fn test_add_orders_bottom_up() {
        let (stack, ids) = stack_of(3);
        assert_eq!(order(&stack), ids);
        assert_eq!(stack.bottom(), Some(ids[0]));
        assert_eq!(stack.top(), Some(ids[2]));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let mut stack = LayerStack::new();
        assert_eq!(
            stack.add_layer(0, 0, 0, 10),
            Err(StrataError::ZeroDimension)
        );
        assert!(stack.is_empty());
    }

    #[test]
    fn test_handles_never_reused() {
        let mut stack = LayerStack::new();
        let a = stack.add_layer(0, 0, 2, 2).unwrap();
        stack.destroy(a);
        let b = stack.add_layer(0, 0, 2, 2).unwrap();
        assert_ne!(a, b);
        assert!(!stack.contains(a));
    }

    #[test]
    fn test_to_top_and_bottom() {
        let (mut stack, ids) = stack_of(3);
        stack.to_top(ids[0]);
        assert_eq!(order(&stack), vec![ids[1], ids[2], ids[0]]);
        stack.to_bottom(ids[2]);
        assert_eq!(order(&stack), vec![ids[2], ids[1], ids[0]]);
    }

    #[test]
    fn test_to_above_below() {
        let (mut stack, ids) = stack_of(4);
        stack.to_above(ids[0], ids[2]);
        assert_eq!(order(&stack), vec![ids[1], ids[2], ids[0], ids[3]]);
        stack.to_below(ids[3], ids[1]);
        assert_eq!(order(&stack), vec![ids[3], ids[1], ids[2], ids[0]]);
    }

    #[test]
    fn test_swap_and_self_targets() {
        let (mut stack, ids) = stack_of(3);
        stack.swap(ids[0], ids[2]);
        assert_eq!(order(&stack), vec![ids[2], ids[1], ids[0]]);

        // self-referencing reorders are no-ops
        stack.swap(ids[1], ids[1]);
        stack.to_above(ids[1], ids[1]);
        stack.to_below(ids[1], ids[1]);
        assert_eq!(order(&stack), vec![ids[2], ids[1], ids[0]]);
    }

    #[test]
    fn test_instance_shares_pixels() {
        let mut stack = LayerStack::new();
        let a = stack.add_layer(0, 0, 4, 4).unwrap();
        let b = stack.add_instance(a, 20, 20).unwrap();

        stack.get_mut(a).unwrap().put_pixel(1, 1, Rgba::RED);
        assert_eq!(stack.get(b).unwrap().get_pixel(1, 1), Rgba::RED);

        // destroying the original keeps the instance's pixels alive
        stack.destroy(a);
        assert_eq!(stack.get(b).unwrap().get_pixel(1, 1), Rgba::RED);
    }

    #[test]
    fn test_copy_is_independent() {
        let mut stack = LayerStack::new();
        let a = stack.add_layer(0, 0, 4, 4).unwrap();
        stack.get_mut(a).unwrap().put_pixel(1, 1, Rgba::RED);
        let b = stack.add_copy(a, 20, 20).unwrap();

        stack.get_mut(a).unwrap().put_pixel(1, 1, Rgba::BLUE);
        assert_eq!(stack.get(b).unwrap().get_pixel(1, 1), Rgba::RED);
    }

    #[test]
    fn test_instance_of_unknown_source() {
        let mut stack = LayerStack::new();
        let a = stack.add_layer(0, 0, 4, 4).unwrap();
        stack.destroy(a);
        assert_eq!(stack.add_instance(a, 0, 0), Err(StrataError::UnknownLayer));
        assert_eq!(stack.add_copy(a, 0, 0), Err(StrataError::UnknownLayer));
    }

    #[test]
    fn test_hit_test_topmost_wins() {
        let mut stack = LayerStack::new();
        let below = stack.add_layer(0, 0, 10, 10).unwrap();
        let above = stack.add_layer(5, 5, 10, 10).unwrap();

        assert_eq!(stack.hit_test(7, 7), Some(above)); // overlap region
        assert_eq!(stack.hit_test(2, 2), Some(below));
        assert_eq!(stack.hit_test(30, 30), None);
    }

    #[test]
    fn test_hit_test_skips_hidden() {
        let mut stack = LayerStack::new();
        let below = stack.add_layer(0, 0, 10, 10).unwrap();
        let above = stack.add_layer(0, 0, 10, 10).unwrap();
        stack.hide(above);
        assert_eq!(stack.hit_test(3, 3), Some(below));
    }

    #[test]
    fn test_find_key_target_topmost_match() {
        let mut stack = LayerStack::new();
        let a = stack.add_layer(0, 0, 4, 4).unwrap();
        let b = stack.add_layer(0, 0, 4, 4).unwrap();
        stack
            .get_mut(a)
            .unwrap()
            .on_key(Some("Enter".into()), Modifiers::NONE, Rc::new(|_, _| false));
        stack
            .get_mut(b)
            .unwrap()
            .on_key(None, Modifiers::NONE, Rc::new(|_, _| false));

        // b is on top with a catch-all binding
        assert_eq!(stack.find_key_target("Enter", &Modifiers::NONE), Some(b));
        stack.to_top(a);
        assert_eq!(stack.find_key_target("Enter", &Modifiers::NONE), Some(a));
        assert_eq!(stack.find_key_target("x", &Modifiers::NONE), Some(b));

        // hidden layers still receive keys
        stack.hide(a);
        assert_eq!(stack.find_key_target("Enter", &Modifiers::NONE), Some(a));
    }

    #[test]
    fn test_dirty_tracking() {
        let mut stack = LayerStack::new();
        assert!(!stack.take_dirty());
        let a = stack.add_layer(0, 0, 2, 2).unwrap();
        assert!(stack.take_dirty());
        assert!(!stack.take_dirty());

        stack.move_relative(a, 1, 1);
        assert!(stack.take_dirty());
        let _ = stack.get_mut(a);
        assert!(stack.take_dirty());
        let _ = stack.get(a);
        assert!(!stack.take_dirty());
    }

    #[test]
    fn test_unknown_handle_ops_are_noops() {
        let (mut stack, ids) = stack_of(2);
        let ghost = LayerId::from_raw(999);
        stack.to_top(ghost);
        stack.move_relative(ghost, 5, 5);
        stack.destroy(ghost);
        assert_eq!(order(&stack), ids);
    }
}
