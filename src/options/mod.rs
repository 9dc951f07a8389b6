//! Centralized rendering and interaction constants with TOML support.
//!
//! Every tweakable setting (camera, controls, lighting, skybox, framing,
//! interaction, navigation, theme, keybindings) is consolidated here.
//! Options serialize to/from TOML; sections missing from a file fall back
//! to their defaults field by field.

mod camera;
mod controls;
mod framing;
mod interaction;
mod keybindings;
mod lighting;
mod skybox;
mod theme;

use std::path::Path;

pub use camera::CameraOptions;
pub use controls::ControlOptions;
pub use framing::FramingOptions;
pub use interaction::{InteractionOptions, NavigationOptions};
pub use keybindings::KeybindingOptions;
pub use lighting::LightingOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use skybox::{CameraBoundsOptions, SkyboxOptions};
pub use theme::ThemeOptions;

use crate::error::ShowcaseError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[skybox]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Camera projection parameters.
    pub camera: CameraOptions,
    /// Orbit control parameters.
    pub controls: ControlOptions,
    /// Lighting parameters.
    pub lighting: LightingOptions,
    /// Skybox sphere geometry and camera reach.
    pub skybox: SkyboxOptions,
    /// Ground constraint for the camera.
    pub camera_bounds: CameraBoundsOptions,
    /// Camera auto-framing constants.
    pub framing: FramingOptions,
    /// Interactive point appearance and text timing.
    pub interaction: InteractionOptions,
    /// Navigation timing.
    pub navigation: NavigationOptions,
    /// Skybox textures and fallback colors.
    #[schemars(skip)]
    pub theme: ThemeOptions,
    /// Keyboard binding options.
    #[schemars(skip)]
    pub keybindings: KeybindingOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, ShowcaseError> {
        let content =
            std::fs::read_to_string(path).map_err(ShowcaseError::Io)?;
        toml::from_str(&content)
            .map_err(|e| ShowcaseError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), ShowcaseError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ShowcaseError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ShowcaseError::Io)?;
        }
        std::fs::write(path, content).map_err(ShowcaseError::Io)
    }
}

/// Convert a `0xRRGGBB` color to linear-ish `[r, g, b]` in `0.0..=1.0`.
#[must_use]
pub fn hex_color(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyAction;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[skybox]
radius = 500.0
";
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.skybox.radius, 500.0);
        // Everything else should be default
        assert_eq!(opts.skybox.max_distance_multiplier, 0.95);
        assert_eq!(opts.camera.fov, 75.0);
        assert_eq!(opts.navigation.loading_hide_delay_ms, 1500);
    }

    #[test]
    fn keybinding_lookup() {
        let opts = Options::default();
        assert_eq!(
            opts.keybindings.lookup("ArrowRight"),
            Some(KeyAction::NextScene)
        );
        assert_eq!(
            opts.keybindings.lookup("ArrowUp"),
            Some(KeyAction::PreviousScene)
        );
        assert_eq!(opts.keybindings.lookup("KeyT"), Some(KeyAction::ToggleTheme));
        assert_eq!(opts.keybindings.lookup("KeyZ"), None);
    }

    #[test]
    fn skybox_ceiling_is_fraction_of_radius() {
        let skybox = SkyboxOptions::default();
        assert!((skybox.distance_ceiling() - 2850.0).abs() < 1e-3);
    }

    #[test]
    fn hex_color_splits_channels() {
        assert_eq!(hex_color(0x00ff_0000), [1.0, 0.0, 0.0]);
        assert_eq!(hex_color(0x0000_00ff), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("camera"));
        assert!(props.contains_key("controls"));
        assert!(props.contains_key("skybox"));

        // Skipped sections should be absent
        assert!(!props.contains_key("theme"));
        assert!(!props.contains_key("keybindings"));

        let camera = &props["camera"]["properties"];
        assert!(camera.get("fov").is_some());
        assert!(camera.get("near").is_none());
    }
}
