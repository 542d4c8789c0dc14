//! Key-to-translation mapping for one controlled body

use serde::{Deserialize, Serialize};

use super::{InputManager, KeyCode};
use crate::foundation::math::{Axis, Vec3};

/// When a binding fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trigger {
    /// Every tick while the key is held
    Held,
    /// Once, on the tick the key goes down
    Pressed,
}

/// One key moving the body along one axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyBinding {
    /// Key
    pub key: KeyCode,
    /// Axis to move along
    pub axis: Axis,
    /// Signed distance per firing
    pub delta: f32,
    /// Held or edge-triggered
    #[serde(default = "held")]
    pub trigger: Trigger,
}

const fn held() -> Trigger {
    Trigger::Held
}

impl KeyBinding {
    /// Binding that fires every tick while held
    pub const fn held(key: KeyCode, axis: Axis, delta: f32) -> Self {
        Self {
            key,
            axis,
            delta,
            trigger: Trigger::Held,
        }
    }

    /// Binding that fires once per key press
    pub const fn pressed(key: KeyCode, axis: Axis, delta: f32) -> Self {
        Self {
            key,
            axis,
            delta,
            trigger: Trigger::Pressed,
        }
    }

    fn fires(&self, input: &InputManager) -> bool {
        match self.trigger {
            Trigger::Held => input.is_pressed(self.key),
            Trigger::Pressed => input.was_just_pressed(self.key),
        }
    }
}

/// Keyboard translation of a named body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputControl {
    /// Name of the body that moves
    pub body: String,
    /// Key bindings; several may fire in one tick
    pub bindings: Vec<KeyBinding>,
}

impl InputControl {
    /// Default arrow-key map for `body`
    ///
    /// Arrows move one unit on X and Z while held; space lifts ten units on Y
    /// per press.
    pub fn arrows(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            bindings: vec![
                KeyBinding::held(KeyCode::Left, Axis::X, -1.0),
                KeyBinding::held(KeyCode::Right, Axis::X, 1.0),
                KeyBinding::held(KeyCode::Up, Axis::Z, -1.0),
                KeyBinding::held(KeyCode::Down, Axis::Z, 1.0),
                KeyBinding::pressed(KeyCode::Space, Axis::Y, 10.0),
            ],
        }
    }

    /// Sum of the translations of every binding that fires this tick
    pub fn net_translation(&self, input: &InputManager) -> Vec3 {
        self.bindings
            .iter()
            .filter(|binding| binding.fires(input))
            .fold(Vec3::zeros(), |total, binding| total + binding.axis.scaled(binding.delta))
    }
}
