//! Input management system
//!
//! Tracks which keys are held. Platform glue feeds key events in with
//! [`InputManager::handle_key_input`]; the frame loop reads the state and
//! calls [`InputManager::end_frame`] once the tick is done.

mod controls;

pub use controls::{InputControl, KeyBinding, Trigger};

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Keyboard state
#[derive(Debug, Default)]
pub struct InputManager {
    pressed: HashSet<KeyCode>,
    just_pressed: HashSet<KeyCode>,
}

impl InputManager {
    /// Create a new input manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle key input
    ///
    /// Auto-repeat presses of a key that is already down do not count as a
    /// fresh press.
    pub fn handle_key_input(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            if self.pressed.insert(key) {
                self.just_pressed.insert(key);
                log::trace!("Key down {key:?}");
            }
        } else if self.pressed.remove(&key) {
            log::trace!("Key up {key:?}");
        }
    }

    /// Whether a key is currently held
    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    /// Whether a key went down since the last [`Self::end_frame`]
    pub fn was_just_pressed(&self, key: KeyCode) -> bool {
        self.just_pressed.contains(&key)
    }

    /// All held keys
    pub fn pressed_keys(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.pressed.iter().copied()
    }

    /// Forget edge-triggered presses; call once per tick
    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
    }

    /// Release every key, e.g. on focus loss
    pub fn release_all(&mut self) {
        self.pressed.clear();
        self.just_pressed.clear();
    }
}

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    /// A key
    A,
    /// D key
    D,
    /// E key
    E,
    /// Q key
    Q,
    /// S key
    S,
    /// W key
    W,
    /// Space key
    Space,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release() {
        let mut input = InputManager::new();
        input.handle_key_input(KeyCode::Up, true);
        input.handle_key_input(KeyCode::Left, true);

        assert!(input.is_pressed(KeyCode::Up));
        assert!(input.is_pressed(KeyCode::Left));
        assert_eq!(input.pressed_keys().count(), 2);

        input.handle_key_input(KeyCode::Up, false);
        assert!(!input.is_pressed(KeyCode::Up));
        assert!(input.is_pressed(KeyCode::Left));
    }

    #[test]
    fn test_just_pressed_is_cleared_by_end_frame() {
        let mut input = InputManager::new();
        input.handle_key_input(KeyCode::Space, true);
        assert!(input.was_just_pressed(KeyCode::Space));

        input.end_frame();
        assert!(!input.was_just_pressed(KeyCode::Space));
        assert!(input.is_pressed(KeyCode::Space));
    }

    #[test]
    fn test_auto_repeat_is_not_a_new_press() {
        let mut input = InputManager::new();
        input.handle_key_input(KeyCode::Space, true);
        input.end_frame();
        input.handle_key_input(KeyCode::Space, true);

        assert!(!input.was_just_pressed(KeyCode::Space));
    }
}
