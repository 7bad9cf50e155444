use std::collections::HashSet;

use super::types::{Key, MouseButton};

/// What changed during one frame. Cleared by the runtime after every
/// `App::on_frame`.
#[derive(Debug, Default)]
pub struct InputFrame {
    pub keys_pressed: HashSet<Key>,
    pub keys_released: HashSet<Key>,
    pub buttons_pressed: HashSet<MouseButton>,
    pub buttons_released: HashSet<MouseButton>,
    /// Last surface size reported this frame, if any.
    pub resized: Option<(u32, u32)>,
    pub close_requested: bool,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.resized = None;
        self.close_requested = false;
    }

    #[inline]
    pub fn key_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    #[inline]
    pub fn key_released(&self, key: Key) -> bool {
        self.keys_released.contains(&key)
    }

    #[inline]
    pub fn button_pressed(&self, button: MouseButton) -> bool {
        self.buttons_pressed.contains(&button)
    }

    #[inline]
    pub fn button_released(&self, button: MouseButton) -> bool {
        self.buttons_released.contains(&button)
    }

    #[inline]
    pub fn resized(&self) -> Option<(u32, u32)> {
        self.resized
    }

    #[inline]
    pub fn close_requested(&self) -> bool {
        self.close_requested
    }
}
