use serde::{Deserialize, Serialize};

/// Showcase actions that can be bound to keys.
///
/// Serde serializes as `snake_case` strings so TOML presets stay readable:
/// ```toml
/// [keybindings.bindings]
/// ArrowRight = "next_scene"
/// KeyT = "toggle_theme"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    /// Step to the following scene; stops at the last one.
    NextScene,
    /// Step to the preceding scene; stops at the first one.
    PreviousScene,
    /// Switch between the light and dark skybox.
    ToggleTheme,
    /// Return the active camera to its framed pose.
    ResetCamera,
    /// Close every open info panel.
    ClosePanel,
}

/// Scene index addressed by a digit key (`"Digit1"` or `"Numpad1"` is
/// scene 0). Digit 0 and anything else yields `None`.
#[must_use]
pub fn scene_for_digit(key: &str) -> Option<usize> {
    let digit = key
        .strip_prefix("Digit")
        .or_else(|| key.strip_prefix("Numpad"))?;
    match digit.parse::<usize>() {
        Ok(n @ 1..=9) if digit.len() == 1 => Some(n - 1),
        _ => None,
    }
}
