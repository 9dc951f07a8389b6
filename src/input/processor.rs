//! Converts raw platform events into showcase commands.
//!
//! The `InputProcessor` owns all transient input state (pointer tracking,
//! click-versus-drag detection, the shift modifier) and the key-binding
//! map. It is the only thing between raw window events and the scene
//! manager.

use glam::Vec2;

use super::event::InputEvent;
use super::keyboard::{scene_for_digit, KeyAction};
use crate::camera::{DragGesture, PointerState};
use crate::options::KeybindingOptions;

/// What the viewer should do in response to an input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputCommand {
    /// Orbit or pan the active camera.
    Drag(DragGesture),
    /// Wheel zoom; positive moves closer.
    Dolly(f32),
    /// Primary click at a viewport pixel.
    Click(Vec2),
    /// A bound key action.
    Action(KeyAction),
    /// Jump straight to a scene.
    GoTo(usize),
}

/// Turns [`InputEvent`]s and key presses into [`InputCommand`]s.
#[derive(Debug, Clone, Default)]
pub struct InputProcessor {
    pointer: PointerState,
    key_bindings: KeybindingOptions,
}

impl InputProcessor {
    /// Create a processor with the given key bindings.
    #[must_use]
    pub fn new(key_bindings: KeybindingOptions) -> Self {
        Self {
            pointer: PointerState::new(),
            key_bindings,
        }
    }

    /// Current cursor position in physical pixels.
    #[must_use]
    pub fn pointer_position(&self) -> Vec2 {
        self.pointer.position()
    }

    /// Read-only access to the key bindings.
    #[must_use]
    pub fn key_bindings(&self) -> &KeybindingOptions {
        &self.key_bindings
    }

    /// Look up a key press. Digit keys jump to scenes; everything else goes
    /// through the binding map.
    #[must_use]
    pub fn handle_key_press(&self, key: &str) -> Option<InputCommand> {
        if let Some(index) = scene_for_digit(key) {
            return Some(InputCommand::GoTo(index));
        }
        self.key_bindings.lookup(key).map(InputCommand::Action)
    }

    /// Process a raw input event and return zero or one commands.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<InputCommand> {
        match event {
            InputEvent::CursorMoved { x, y } => self
                .pointer
                .moved(Vec2::new(x, y))
                .map(InputCommand::Drag),
            InputEvent::MouseButton { button, pressed } => {
                if pressed {
                    self.pointer.press(button.into());
                    None
                } else {
                    self.pointer.release(button.into()).map(InputCommand::Click)
                }
            }
            InputEvent::Scroll { delta } => {
                (delta != 0.0).then_some(InputCommand::Dolly(delta))
            }
            InputEvent::ModifiersChanged { shift } => {
                self.pointer.set_shift(shift);
                None
            }
        }
    }
}
