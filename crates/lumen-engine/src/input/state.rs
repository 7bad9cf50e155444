use std::collections::HashSet;

use crate::coords::Vector2f;

use super::frame::InputFrame;
use super::types::{ButtonState, InputEvent, Key, Modifiers, MouseButton};

/// Input held right now, for one window.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,
    pub focused: bool,
    /// Cursor in physical pixels; `None` outside the window.
    pub cursor: Option<Vector2f>,
    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Applies `event` and records the resulting transitions in `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, event: InputEvent) {
        match event {
            InputEvent::ModifiersChanged(m) => self.modifiers = m,

            InputEvent::Focused(focused) => {
                self.focused = focused;
                if !focused {
                    // releases never arrive for keys held while unfocused
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved { x, y } => self.cursor = Some(Vector2f::new(x, y)),
            InputEvent::PointerLeft => self.cursor = None,

            InputEvent::Key { key, state, .. } => match state {
                ButtonState::Pressed => {
                    if self.keys_down.insert(key) {
                        frame.keys_pressed.insert(key);
                    }
                }
                ButtonState::Released => {
                    if self.keys_down.remove(&key) {
                        frame.keys_released.insert(key);
                    }
                }
            },

            InputEvent::PointerButton { button, state } => match state {
                ButtonState::Pressed => {
                    if self.buttons_down.insert(button) {
                        frame.buttons_pressed.insert(button);
                    }
                }
                ButtonState::Released => {
                    if self.buttons_down.remove(&button) {
                        frame.buttons_released.insert(button);
                    }
                }
            },

            InputEvent::Resized { width, height } => frame.resized = Some((width, height)),
            InputEvent::CloseRequested => frame.close_requested = true,
        }
    }

    #[inline]
    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    #[inline]
    pub fn button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    #[inline]
    pub fn cursor_position(&self) -> Option<Vector2f> {
        self.cursor
    }

    #[inline]
    pub fn focused(&self) -> bool {
        self.focused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: ButtonState) -> InputEvent {
        InputEvent::Key { key, state, repeat: false }
    }

    // ── keys ──────────────────────────────────────────────────────────────

    #[test]
    fn press_and_release_are_edges() {
        let (mut state, mut frame) = (InputState::default(), InputFrame::default());
        state.apply_event(&mut frame, key(Key::A, ButtonState::Pressed));
        state.apply_event(&mut frame, key(Key::A, ButtonState::Pressed));
        assert!(state.key_down(Key::A));
        assert!(frame.key_pressed(Key::A));

        frame.clear();
        assert!(!frame.key_pressed(Key::A));
        assert!(state.key_down(Key::A));

        state.apply_event(&mut frame, key(Key::A, ButtonState::Released));
        assert!(!state.key_down(Key::A));
        assert!(frame.key_released(Key::A));
    }

    #[test]
    fn release_without_press_is_ignored() {
        let (mut state, mut frame) = (InputState::default(), InputFrame::default());
        state.apply_event(&mut frame, key(Key::Escape, ButtonState::Released));
        assert!(!frame.key_released(Key::Escape));
    }

    #[test]
    fn focus_loss_clears_held_input() {
        let (mut state, mut frame) = (InputState::default(), InputFrame::default());
        state.apply_event(&mut frame, InputEvent::Focused(true));
        state.apply_event(&mut frame, key(Key::Space, ButtonState::Pressed));
        state.apply_event(
            &mut frame,
            InputEvent::PointerButton { button: MouseButton::Left, state: ButtonState::Pressed },
        );
        state.apply_event(&mut frame, InputEvent::Focused(false));
        assert!(!state.focused());
        assert!(!state.key_down(Key::Space));
        assert!(!state.button_down(MouseButton::Left));
        assert!(frame.button_pressed(MouseButton::Left));
    }

    // ── pointer and window ────────────────────────────────────────────────

    #[test]
    fn cursor_tracks_moves_and_leaves() {
        let (mut state, mut frame) = (InputState::default(), InputFrame::default());
        state.apply_event(&mut frame, InputEvent::PointerMoved { x: 3.0, y: 4.0 });
        assert_eq!(state.cursor_position(), Some(Vector2f::new(3.0, 4.0)));
        state.apply_event(&mut frame, InputEvent::PointerLeft);
        assert_eq!(state.cursor_position(), None);
    }

    #[test]
    fn window_flags_last_one_frame() {
        let (mut state, mut frame) = (InputState::default(), InputFrame::default());
        state.apply_event(&mut frame, InputEvent::Resized { width: 640, height: 480 });
        state.apply_event(&mut frame, InputEvent::Resized { width: 800, height: 600 });
        state.apply_event(&mut frame, InputEvent::CloseRequested);
        assert_eq!(frame.resized(), Some((800, 600)));
        assert!(frame.close_requested());
        frame.clear();
        assert_eq!(frame.resized(), None);
        assert!(!frame.close_requested());
    }
}
