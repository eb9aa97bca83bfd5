//! Bridging crossterm input to normalized events.
//!
//! # API
//!
//! - `read_event` - block for the next input event
//! - `poll_event` - wait up to a timeout for an input event
//! - `enable_mouse` / `disable_mouse` - toggle mouse capture
//! - `convert_key_event` / `convert_mouse_event` - raw conversions
//!
//! Key names are normalized to strings: printable keys carry their
//! character, special keys their name ("Enter", "Escape", "ArrowUp",
//! "F1", ...). Scroll and terminal housekeeping events (resize, focus,
//! paste) carry no meaning here and convert to `None`.

use std::io::{self, Write};
use std::time::Duration;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEventKind, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;

use crate::event::{Event, KeyEvent, KeyState, Modifiers, PointerButton, PointerEvent};

/// Turn on terminal mouse reporting.
pub fn enable_mouse(out: &mut impl Write) -> io::Result<()> {
    execute!(out, EnableMouseCapture)
}

/// Turn off terminal mouse reporting.
pub fn disable_mouse(out: &mut impl Write) -> io::Result<()> {
    execute!(out, DisableMouseCapture)
}

/// Block until the next input event arrives. Events with no meaning here
/// (resize, focus, paste, scroll) come back as `None`.
pub fn read_event() -> io::Result<Option<Event>> {
    convert(event::read()?)
}

/// Wait up to `timeout` for an input event. `Ok(None)` means the timeout
/// elapsed or the event carried no meaning here.
pub fn poll_event(timeout: Duration) -> io::Result<Option<Event>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    convert(event::read()?)
}

fn convert(ev: event::Event) -> io::Result<Option<Event>> {
    Ok(match ev {
        event::Event::Key(key) => Some(Event::Key(convert_key_event(&key))),
        event::Event::Mouse(mouse) => convert_mouse_event(&mouse).map(Event::Pointer),
        _ => None,
    })
}

// =============================================================================
// Keyboard conversion
// =============================================================================

/// Convert a crossterm key event into a normalized [`KeyEvent`].
pub fn convert_key_event(key: &event::KeyEvent) -> KeyEvent {
    KeyEvent {
        key: key_name(key.code),
        modifiers: convert_modifiers(key.modifiers),
        state: match key.kind {
            KeyEventKind::Press => KeyState::Press,
            KeyEventKind::Repeat => KeyState::Repeat,
            KeyEventKind::Release => KeyState::Release,
        },
    }
}

fn key_name(code: KeyCode) -> String {
    match code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "Tab".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Insert => "Insert".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::Up => "ArrowUp".to_string(),
        KeyCode::Down => "ArrowDown".to_string(),
        KeyCode::Left => "ArrowLeft".to_string(),
        KeyCode::Right => "ArrowRight".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => "Unidentified".to_string(),
    }
}

fn convert_modifiers(mods: KeyModifiers) -> Modifiers {
    Modifiers {
        ctrl: mods.contains(KeyModifiers::CONTROL),
        alt: mods.contains(KeyModifiers::ALT),
        shift: mods.contains(KeyModifiers::SHIFT),
        meta: mods.contains(KeyModifiers::SUPER),
    }
}

// =============================================================================
// Mouse conversion
// =============================================================================

/// Convert a crossterm mouse event into a pointer event, or `None` for
/// scroll wheel motion.
pub fn convert_mouse_event(mouse: &MouseEvent) -> Option<PointerEvent> {
    let x = mouse.column as i32;
    let y = mouse.row as i32;
    let modifiers = convert_modifiers(mouse.modifiers);

    match mouse.kind {
        MouseEventKind::Moved => Some(PointerEvent::motion(x, y, modifiers)),
        MouseEventKind::Down(btn) => {
            Some(PointerEvent::press(convert_button(btn), x, y, modifiers))
        }
        MouseEventKind::Up(btn) => {
            Some(PointerEvent::release(convert_button(btn), x, y, modifiers))
        }
        MouseEventKind::Drag(btn) => {
            Some(PointerEvent::drag(convert_button(btn), x, y, modifiers))
        }
        MouseEventKind::ScrollUp
        | MouseEventKind::ScrollDown
        | MouseEventKind::ScrollLeft
        | MouseEventKind::ScrollRight => None,
    }
}

fn convert_button(btn: MouseButton) -> PointerButton {
    match btn {
        MouseButton::Left => PointerButton::Left,
        MouseButton::Right => PointerButton::Right,
        MouseButton::Middle => PointerButton::Middle,
    }
}

// =============================================================================
// Tests
// =============================================================================
