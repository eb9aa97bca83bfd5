//! Layer groups: apply one operation to many layers at once.
//!
//! # API
//!
//! - Membership: `add`, `remove`, `contains`, `len`
//! - Batch ops: `show`, `hide`, `move_relative`, `to_top`, `to_bottom`,
//!   `reset_view`, `set_sprite`, `next_sprite`, `prev_sprite`
//!
//! A group is just a named list of handles; it does not own layers and a
//! handle may sit in several groups. Batch operations skip members whose
//! layer has since been destroyed.

use crate::stack::LayerStack;
use crate::types::LayerId;

/// A named collection of layer handles for batch operations.
#[derive(Debug, Clone, Default)]
pub struct Group {
    name: String,
    members: Vec<LayerId>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a layer. Duplicates are allowed; each `remove` drops one.
    pub fn add(&mut self, id: LayerId) {
        self.members.push(id);
    }

    /// Remove the first occurrence of a layer.
    pub fn remove(&mut self, id: LayerId) {
        if let Some(pos) = self.members.iter().position(|&m| m == id) {
            self.members.remove(pos);
        }
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.members.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    // =========================================================================
    // Batch operations
    // =========================================================================

    pub fn show(&self, stack: &mut LayerStack) {
        for &id in &self.members {
            stack.show(id);
        }
    }

    pub fn hide(&self, stack: &mut LayerStack) {
        for &id in &self.members {
            stack.hide(id);
        }
    }

    pub fn move_relative(&self, stack: &mut LayerStack, dx: i32, dy: i32) {
        for &id in &self.members {
            stack.move_relative(id, dx, dy);
        }
    }

    /// Raise every member to the top, preserving their relative order.
    pub fn to_top(&self, stack: &mut LayerStack) {
        for &id in &self.members {
            stack.to_top(id);
        }
    }

    /// Sink every member to the bottom.
    pub fn to_bottom(&self, stack: &mut LayerStack) {
        for &id in &self.members {
            stack.to_bottom(id);
        }
    }

    pub fn reset_view(&self, stack: &mut LayerStack) {
        for &id in &self.members {
            if let Some(layer) = stack.get_mut(id) {
                layer.reset_view();
            }
        }
    }

    pub fn set_sprite(&self, stack: &mut LayerStack, index: u32) {
        for &id in &self.members {
            if let Some(layer) = stack.get_mut(id) {
                layer.set_sprite(index);
            }
        }
    }

    pub fn next_sprite(&self, stack: &mut LayerStack) {
        for &id in &self.members {
            if let Some(layer) = stack.get_mut(id) {
                layer.next_sprite();
            }
        }
    }

    pub fn prev_sprite(&self, stack: &mut LayerStack) {
        for &id in &self.members {
            if let Some(layer) = stack.get_mut(id) {
                layer.prev_sprite();
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
    use crate::layer::Layer;

    fn setup() -> (LayerStack, Group, Vec<LayerId>) {
        let mut stack = LayerStack::new();
        let ids: Vec<_> = (0..3)
            .map(|_| stack.add_layer(0, 0, 8, 8).unwrap())
            .collect();
        let mut group = Group::new("hud");
        group.add(ids[0]);
        group.add(ids[2]);
        (stack, group, ids)
    }

    #[test]
    fn test_membership() {
        let (_, mut group, ids) = setup();
        assert!(group.contains(ids[0]));
        assert!(!group.contains(ids[1]));
        assert_eq!(group.len(), 2);
        group.remove(ids[0]);
        assert!(!group.contains(ids[0]));
        // removing a non-member is harmless
        group.remove(ids[1]);
        assert_eq!(group.len(), 1);
    }

    #[test]
    fn test_duplicates_removed_one_at_a_time() {
        let (_, mut group, ids) = setup();
        group.add(ids[0]);
        group.remove(ids[0]);
        assert!(group.contains(ids[0]));
        group.remove(ids[0]);
        assert!(!group.contains(ids[0]));
    }

    #[test]
    fn test_batch_visibility() {
        let (mut stack, group, ids) = setup();
        group.hide(&mut stack);
        assert!(!stack.get(ids[0]).unwrap().is_visible());
        assert!(stack.get(ids[1]).unwrap().is_visible());
        assert!(!stack.get(ids[2]).unwrap().is_visible());
        group.show(&mut stack);
        assert!(stack.get(ids[0]).unwrap().is_visible());
    }

    #[test]
    fn test_batch_move() {
        let (mut stack, group, ids) = setup();
        group.move_relative(&mut stack, 3, -2);
        let moved = stack.get(ids[0]).unwrap();
        assert_eq!((moved.x, moved.y), (3, -2));
        let still = stack.get(ids[1]).unwrap();
        assert_eq!((still.x, still.y), (0, 0));
    }

    #[test]
    fn test_batch_to_top_keeps_member_order() {
        let (mut stack, group, ids) = setup();
        group.to_top(&mut stack);
        let order: Vec<_> = stack.iter_bottom_up().map(Layer::id).collect();
        assert_eq!(order, vec![ids[1], ids[0], ids[2]]);
    }

    #[test]
    fn test_batch_sprites() {
        let mut stack = LayerStack::new();
        let a = stack.add_layer(0, 0, 40, 10).unwrap();
        let b = stack.add_layer(0, 0, 40, 10).unwrap();
        stack.get_mut(a).unwrap().init_sprite_sheet(4, 1);
        stack.get_mut(b).unwrap().init_sprite_sheet(4, 1);

        let mut group = Group::new("anim");
        group.add(a);
        group.add(b);

        group.next_sprite(&mut stack);
        assert_eq!(stack.get(a).unwrap().sprite_index(), Some(1));
        assert_eq!(stack.get(b).unwrap().sprite_index(), Some(1));
        group.set_sprite(&mut stack, 3);
        assert_eq!(stack.get(a).unwrap().sprite_index(), Some(3));
    }

    #[test]
    fn test_destroyed_member_skipped() {
        let (mut stack, group, ids) = setup();
        stack.destroy(ids[0]);
        // batch ops on the remaining member still work
        group.hide(&mut stack);
        assert!(!stack.get(ids[2]).unwrap().is_visible());
    }
}
