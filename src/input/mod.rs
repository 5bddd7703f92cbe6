//! Input handling: event types, navigation actions, the capability-based
//! listener interface, and the input processor that converts raw window
//! events into navigation input.

/// Platform-agnostic input events.
pub mod event;
/// Bindable navigation actions.
pub mod keyboard;
/// Latched navigation input and capability-based delivery.
pub mod listener;
/// Converts raw events into navigation input.
pub mod processor;

pub use event::{InputEvent, MouseButton};
pub use keyboard::NavAction;
pub use listener::{dispatch, InputKind, InputListener, NavInput};
pub use processor::InputProcessor;
