//! The blocking run loop.
//!
//! # API
//!
//! - `EventLoop` - pull events, dispatch, render when something changed
//! - `StopHandle` - cooperative quit flag, cloneable into handlers
//! - `Present` - presentation seam the composited frame goes out through
//! - `EventSource` - where events come from
//! - `TerminalSource` / `TerminalPresenter` - crossterm-backed defaults
//!
//! One iteration: wait for an event (bounded by the timer deadline when a
//! timer interval is set), dispatch it, then render and present once if any
//! handler requested a redraw or the stack went dirty. Handlers run to
//! completion; the stop flag is checked once per iteration.

use std::cell::Cell;
use std::io::{self, Write};
use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, SetBackgroundColor};
use crossterm::{execute, queue};
use log::debug;

use crate::compositor::{render_frame, FrameBuffer};
use crate::event::dispatcher::Dispatcher;
use crate::event::Event;
use crate::input;
use crate::stack::LayerStack;

// =============================================================================
// Seams
// =============================================================================

/// Destination for composited frames.
pub trait Present {
    fn present(&mut self, fb: &FrameBuffer) -> io::Result<()>;
}

/// Supplier of input events.
///
/// `timeout = None` means block until an event arrives; otherwise return
/// `Ok(None)` once the timeout elapses.
pub trait EventSource {
    fn next(&mut self, timeout: Option<Duration>) -> io::Result<Option<Event>>;
}

/// Events straight from the terminal via crossterm.
#[derive(Default)]
pub struct TerminalSource;

impl EventSource for TerminalSource {
    fn next(&mut self, timeout: Option<Duration>) -> io::Result<Option<Event>> {
        match timeout {
            Some(timeout) => input::poll_event(timeout),
            None => input::read_event(),
        }
    }
}

/// Paints each frame pixel as a background-colored terminal cell.
pub struct TerminalPresenter<W: Write> {
    out: W,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Present for TerminalPresenter<W> {
    fn present(&mut self, fb: &FrameBuffer) -> io::Result<()> {
        for y in 0..fb.height() {
            queue!(self.out, MoveTo(0, y as u16))?;
            for x in 0..fb.width() {
                if let Some(px) = fb.get(x, y) {
                    queue!(
                        self.out,
                        SetBackgroundColor(Color::Rgb {
                            r: px.r,
                            g: px.g,
                            b: px.b,
                        }),
                        Print(' ')
                    )?;
                }
            }
        }
        execute!(self.out, SetBackgroundColor(Color::Reset))
    }
}

// =============================================================================
// Stop handle
// =============================================================================

/// Cooperative quit flag. Clone it into a handler; the loop exits at the
/// top of the next iteration after `stop` is called.
#[derive(Clone, Default)]
pub struct StopHandle(Rc<Cell<bool>>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.get()
    }
}

// =============================================================================
// Event loop
// =============================================================================

/// The blocking event loop tying source, dispatcher, compositor and
/// presenter together.
#[derive(Default)]
pub struct EventLoop {
    dispatcher: Dispatcher,
    timer_interval: Option<Duration>,
    stop: StopHandle,
}

impl EventLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// The dispatcher, for installing global key/timer handlers.
    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher {
        &mut self.dispatcher
    }

    /// Emit a timer event every `interval`; `None` disables the timer.
    pub fn set_timer_interval(&mut self, interval: Option<Duration>) {
        self.timer_interval = interval;
    }

    /// A handle that makes `run` return.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Run until stopped. Renders once up front, then once per iteration
    /// when a handler requested a redraw or the stack changed.
    pub fn run(
        &mut self,
        stack: &mut LayerStack,
        fb: &mut FrameBuffer,
        source: &mut impl EventSource,
        presenter: &mut impl Present,
    ) -> io::Result<()> {
        render_frame(stack, fb);
        presenter.present(fb)?;
        stack.take_dirty();

        let mut next_tick = self.timer_interval.map(|iv| Instant::now() + iv);

        while !self.stop.is_stopped() {
            let timeout = match next_tick {
                Some(tick) => Some(tick.saturating_duration_since(Instant::now())),
                None => None,
            };
            let event = source.next(timeout)?;

            if let (Some(tick), Some(iv)) = (next_tick, self.timer_interval) {
                if Instant::now() >= tick {
                    self.dispatcher.dispatch(stack, &Event::Timer);
                    next_tick = Some(tick + iv);
                }
            }
            if let Some(event) = event {
                self.dispatcher.dispatch(stack, &event);
            }

            if self.dispatcher.take_redraw() || stack.take_dirty() {
                debug!("redraw");
                render_frame(stack, fb);
                presenter.present(fb)?;
            }
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
