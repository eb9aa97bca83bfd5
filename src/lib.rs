//! strata - a software layer compositor with stack-ordered event dispatch.
//!
//! Layers are positioned RGBA pixel buffers arranged bottom-to-top. A view
//! window selects the painted sub-rectangle of each buffer, which is also
//! how sprite sheets animate: selecting a frame just moves the view. The
//! compositor flattens the stack into a [`FrameBuffer`]; the dispatcher
//! routes pointer, key and timer events to per-layer handlers by stack
//! order; the run loop ties both to an event source and a presenter.
//!
//! ```no_run
//! use strata::{EventLoop, FrameBuffer, LayerStack, Rgba, TerminalPresenter, TerminalSource};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut stack = LayerStack::new();
//!     let id = stack.add_layer(10, 5, 20, 10)?;
//!     stack.get_mut(id).unwrap().fill(Rgba::GREEN);
//!
//!     let mut fb = FrameBuffer::new(80, 24)?;
//!     let mut el = EventLoop::new();
//!     let mut presenter = TerminalPresenter::new(std::io::stdout());
//!     el.run(&mut stack, &mut fb, &mut TerminalSource, &mut presenter)?;
//!     Ok(())
//! }
//! ```

pub mod buffer;
pub mod compositor;
pub mod error;
pub mod event;
pub mod filters;
pub mod group;
pub mod input;
pub mod layer;
pub mod runtime;
pub mod stack;
pub mod types;

pub use buffer::PixelBuffer;
pub use compositor::{render_frame, FrameBuffer};
pub use error::StrataError;
pub use event::dispatcher::Dispatcher;
pub use event::{Event, KeyEvent, KeyState, Modifiers, PointerButton, PointerEvent, PointerKind};
pub use group::Group;
pub use layer::sprite::SpriteSheet;
pub use layer::{Handler, KeyBinding, Layer};
pub use runtime::{EventLoop, EventSource, Present, StopHandle, TerminalPresenter, TerminalSource};
pub use stack::LayerStack;
pub use types::{LayerFlags, LayerId, Rgba, ViewBox};
