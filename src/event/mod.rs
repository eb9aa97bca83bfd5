//! Event types.
//!
//! # API
//!
//! - `Event` - pointer, key or timer event delivered to handlers
//! - `PointerEvent` / `PointerKind` / `PointerButton`
//! - `KeyEvent` / `KeyState` / `Modifiers`
//!
//! Events arrive normalized: the input bridge (or the host) translates
//! platform events into these types before they reach the dispatcher.

pub mod dispatcher;

use crate::types::LayerId;

// =============================================================================
// Modifiers
// =============================================================================

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };
}

// =============================================================================
// Keyboard
// =============================================================================

/// Whether a key event is an initial press, an auto-repeat or a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Press,
    Repeat,
    Release,
}

/// A keyboard event with a normalized key name.
///
/// Printable keys carry their character ("a", "5", " "); special keys use
/// their names ("Enter", "Escape", "ArrowUp", "F1", ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: String,
    pub modifiers: Modifiers,
    pub state: KeyState,
}

impl KeyEvent {
    /// A plain key press with no modifiers.
    pub fn press(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::NONE,
            state: KeyState::Press,
        }
    }
}

// =============================================================================
// Pointer
// =============================================================================

/// Pointer buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
}

/// What the pointer did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    /// Pointer moved into a layer's footprint.
    Enter,
    /// Pointer moved within the layer it already occupies.
    Move,
    /// Pointer moved off the layer it occupied.
    Leave,
    Press,
    Release,
    /// Motion while a button is held on a layer.
    Drag,
}

/// A pointer event in screen coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    /// The button involved, for press/release/drag.
    pub button: Option<PointerButton>,
    pub x: i32,
    pub y: i32,
    pub modifiers: Modifiers,
    /// The layer this event is addressed to, once the dispatcher has
    /// resolved it. `None` on raw events coming off the input bridge.
    pub target: Option<LayerId>,
    /// For drag events: the proposed new layer position.
    pub drag_to: Option<(i32, i32)>,
}

impl PointerEvent {
    /// Raw pointer motion, as produced by the input bridge.
    pub fn motion(x: i32, y: i32, modifiers: Modifiers) -> Self {
        Self {
            kind: PointerKind::Move,
            button: None,
            x,
            y,
            modifiers,
            target: None,
            drag_to: None,
        }
    }

    /// Raw button press.
    pub fn press(button: PointerButton, x: i32, y: i32, modifiers: Modifiers) -> Self {
        Self {
            kind: PointerKind::Press,
            button: Some(button),
            x,
            y,
            modifiers,
            target: None,
            drag_to: None,
        }
    }

    /// Raw button release.
    pub fn release(button: PointerButton, x: i32, y: i32, modifiers: Modifiers) -> Self {
        Self {
            kind: PointerKind::Release,
            button: Some(button),
            x,
            y,
            modifiers,
            target: None,
            drag_to: None,
        }
    }

    /// Raw drag motion (button held).
    pub fn drag(button: PointerButton, x: i32, y: i32, modifiers: Modifiers) -> Self {
        Self {
            kind: PointerKind::Drag,
            button: Some(button),
            x,
            y,
            modifiers,
            target: None,
            drag_to: None,
        }
    }
}

// =============================================================================
// Event
// =============================================================================

/// An input or timer event delivered to handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Pointer(PointerEvent),
    Key(KeyEvent),
    /// Periodic tick from the run loop's timer interval.
    Timer,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_press_constructor() {
        let ev = KeyEvent::press("Enter");
        assert_eq!(ev.key, "Enter");
        assert_eq!(ev.state, KeyState::Press);
        assert_eq!(ev.modifiers, Modifiers::NONE);
    }

    #[test]
    fn test_pointer_constructors() {
        let m = PointerEvent::motion(3, 4, Modifiers::NONE);
        assert_eq!(m.kind, PointerKind::Move);
        assert_eq!(m.button, None);
        assert_eq!((m.x, m.y), (3, 4));

        let p = PointerEvent::press(PointerButton::Left, 1, 2, Modifiers::NONE);
        assert_eq!(p.kind, PointerKind::Press);
        assert_eq!(p.button, Some(PointerButton::Left));
        assert_eq!(p.target, None);
    }
}
