//! Per-window frame timing; feeds `Text::update` and other animation.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
