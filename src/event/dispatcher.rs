//! Routing events to layer handlers.
//!
//! # API
//!
//! - `Dispatcher::dispatch` - route one event through the stack
//! - `Dispatcher::take_redraw` - collect accumulated redraw requests
//! - Global handlers: `set_key_handler`, `set_timer_handler` + clears
//!
//! Pointer events are routed by hit test: the topmost visible layer whose
//! footprint contains the point receives the event, and it shadows every
//! layer below it whether or not it has a handler installed. The dispatcher
//! remembers which layer the pointer occupies so motion turns into
//! enter/move/leave transitions, and which layer took the last press so
//! drags and releases stay addressed to it.
//!
//! Handlers run against `&mut LayerStack` through a cloned `Rc`, so a
//! handler may destroy its own layer; targets are resolved before the call.

use log::trace;

use crate::layer::Handler;
use crate::stack::LayerStack;
use crate::types::{LayerFlags, LayerId};

use super::{Event, KeyEvent, PointerButton, PointerEvent, PointerKind};

/// Stateful event router. One per run loop.
#[derive(Default)]
pub struct Dispatcher {
    /// Layer currently under the pointer.
    active: Option<LayerId>,
    /// Layer that received the last press, until its release.
    pressed: Option<LayerId>,
    button_down: Option<PointerButton>,
    last_pointer: Option<(i32, i32)>,
    key_handler: Option<Handler>,
    timer_handler: Option<Handler>,
    redraw: bool,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the fallback key handler, called when no layer binding
    /// matches. Replaces any previous one.
    pub fn set_key_handler(&mut self, handler: Handler) {
        self.key_handler = Some(handler);
    }

    pub fn clear_key_handler(&mut self) {
        self.key_handler = None;
    }

    /// Install the timer handler, called on every timer tick.
    pub fn set_timer_handler(&mut self, handler: Handler) {
        self.timer_handler = Some(handler);
    }

    pub fn clear_timer_handler(&mut self) {
        self.timer_handler = None;
    }

    /// Take the accumulated redraw request, resetting it.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw)
    }

    /// Route one event. Returns `true` when a handler asked for a redraw;
    /// the request also accumulates for [`Dispatcher::take_redraw`].
    pub fn dispatch(&mut self, stack: &mut LayerStack, event: &Event) -> bool {
        let redraw = match event {
            Event::Pointer(pe) => match pe.kind {
                PointerKind::Move => self.on_motion(stack, pe),
                PointerKind::Press => self.on_press(stack, pe),
                PointerKind::Release => self.on_release(stack, pe),
                PointerKind::Drag => self.on_drag(stack, pe),
                // enter/leave are synthesized here, never fed in raw
                PointerKind::Enter | PointerKind::Leave => false,
            },
            Event::Key(ke) => self.on_key(stack, ke),
            Event::Timer => self.run(stack, self.timer_handler.clone(), event),
        };
        self.redraw |= redraw;
        redraw
    }

    // =========================================================================
    // Pointer routing
    // =========================================================================

    fn on_motion(&mut self, stack: &mut LayerStack, pe: &PointerEvent) -> bool {
        self.last_pointer = Some((pe.x, pe.y));
        let hit = stack.hit_test(pe.x, pe.y);
        let mut redraw = false;

        if hit != self.active {
            if let Some(old) = self.active.take() {
                trace!("pointer leaves layer {}", old.raw());
                redraw |= self.run_hover(stack, old, pe, PointerKind::Leave);
            }
            if let Some(new) = hit {
                trace!("pointer enters layer {}", new.raw());
                redraw |= self.run_hover(stack, new, pe, PointerKind::Enter);
            }
            self.active = hit;
        } else if let Some(id) = hit {
            redraw |= self.run_hover(stack, id, pe, PointerKind::Move);
        }
        redraw
    }

    fn on_press(&mut self, stack: &mut LayerStack, pe: &PointerEvent) -> bool {
        self.last_pointer = Some((pe.x, pe.y));
        let hit = stack.hit_test(pe.x, pe.y);
        self.pressed = hit;
        self.button_down = pe.button;

        let Some(id) = hit else { return false };
        let handler = stack.get(id).and_then(|l| l.click.clone());
        let ev = Event::Pointer(PointerEvent {
            target: Some(id),
            ..pe.clone()
        });
        self.run(stack, handler, &ev)
    }

    fn on_release(&mut self, stack: &mut LayerStack, pe: &PointerEvent) -> bool {
        self.last_pointer = Some((pe.x, pe.y));
        let pressed = self.pressed.take();
        self.button_down = None;

        // a release only counts as a click on the layer that took the press
        let hit = stack.hit_test(pe.x, pe.y);
        let Some(id) = pressed.filter(|&p| hit == Some(p)) else {
            return false;
        };
        let handler = stack.get(id).and_then(|l| l.click.clone());
        let ev = Event::Pointer(PointerEvent {
            target: Some(id),
            ..pe.clone()
        });
        self.run(stack, handler, &ev)
    }

    fn on_drag(&mut self, stack: &mut LayerStack, pe: &PointerEvent) -> bool {
        let (dx, dy) = match self.last_pointer {
            Some((lx, ly)) => (pe.x - lx, pe.y - ly),
            None => (0, 0),
        };
        self.last_pointer = Some((pe.x, pe.y));

        let Some(id) = self.pressed.filter(|&p| stack.contains(p)) else {
            return false;
        };
        let Some(layer) = stack.get(id) else {
            return false;
        };
        let proposed = (layer.x + dx, layer.y + dy);
        let handler = layer.drag.clone();
        let draggable = layer.flags().contains(LayerFlags::DRAGGABLE);

        let ev = Event::Pointer(PointerEvent {
            target: Some(id),
            drag_to: Some(proposed),
            ..pe.clone()
        });
        match handler {
            Some(handler) => {
                let accepted = handler(stack, &ev);
                if accepted && stack.contains(id) {
                    stack.place(id, proposed.0, proposed.1);
                }
                accepted
            }
            None if draggable => {
                stack.place(id, proposed.0, proposed.1);
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // Key and timer routing
    // =========================================================================

    fn on_key(&mut self, stack: &mut LayerStack, ke: &KeyEvent) -> bool {
        let event = Event::Key(ke.clone());
        if let Some(id) = stack.find_key_target(&ke.key, &ke.modifiers) {
            let handler = stack
                .get(id)
                .and_then(|l| l.key.as_ref())
                .map(|b| b.handler.clone());
            return self.run(stack, handler, &event);
        }
        self.run(stack, self.key_handler.clone(), &event)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn run_hover(
        &mut self,
        stack: &mut LayerStack,
        id: LayerId,
        pe: &PointerEvent,
        kind: PointerKind,
    ) -> bool {
        let handler = stack.get(id).and_then(|l| l.hover.clone());
        let ev = Event::Pointer(PointerEvent {
            kind,
            target: Some(id),
            ..pe.clone()
        });
        self.run(stack, handler, &ev)
    }

    fn run(&mut self, stack: &mut LayerStack, handler: Option<Handler>, event: &Event) -> bool {
        match handler {
            Some(handler) => handler(stack, event),
            None => false,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
