use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::input::KeyAction;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
/// Configurable keyboard bindings mapping key codes to actions.
///
/// Key strings use the `winit::keyboard::KeyCode` debug format:
/// `"ArrowRight"`, `"KeyT"`, `"Escape"`, etc. Digit keys jump to scenes
/// and are not configurable.
pub struct KeybindingOptions {
    /// Maps key string → action (e.g. `"KeyT"` → `ToggleTheme`).
    pub bindings: HashMap<String, KeyAction>,
}

impl Default for KeybindingOptions {
    fn default() -> Self {
        let bindings = HashMap::from([
            ("ArrowRight".into(), KeyAction::NextScene),
            ("ArrowDown".into(), KeyAction::NextScene),
            ("ArrowLeft".into(), KeyAction::PreviousScene),
            ("ArrowUp".into(), KeyAction::PreviousScene),
            ("KeyT".into(), KeyAction::ToggleTheme),
            ("KeyR".into(), KeyAction::ResetCamera),
            ("Escape".into(), KeyAction::ClosePanel),
        ]);
        Self { bindings }
    }
}

impl KeybindingOptions {
    /// Look up the action for a key string.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<KeyAction> {
        self.bindings.get(key).copied()
    }
}
