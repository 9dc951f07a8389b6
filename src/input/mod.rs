//! Platform-agnostic input handling.
//!
//! Raw window events become [`InputEvent`]s, and the [`InputProcessor`]
//! turns those (plus key presses) into [`InputCommand`]s for the viewer.

pub mod event;
mod keyboard;
pub mod processor;

pub use event::{InputEvent, MouseButton};
pub use keyboard::{scene_for_digit, KeyAction};
pub use processor::{InputCommand, InputProcessor};

pub use crate::camera::PointerState;
