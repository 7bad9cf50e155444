//! Polled input.
//!
//! [`InputState`] is what is held right now; [`InputFrame`] is what changed
//! since the last frame. The runtime translates platform events into
//! [`InputEvent`]s, so nothing here exposes winit types.

mod frame;
pub mod platform;
mod state;
mod types;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{ButtonState, InputEvent, Key, Modifiers, MouseButton};
