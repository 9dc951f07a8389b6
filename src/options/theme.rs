use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::hex_color;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Theme", inline)]
#[serde(default)]
/// Skybox texture locations and flat fallback colors per theme.
pub struct ThemeOptions {
    /// Equirectangular skybox image for the dark theme.
    #[schemars(skip)]
    pub dark_skybox: String,
    /// Equirectangular skybox image for the light theme.
    #[schemars(skip)]
    pub light_skybox: String,
    /// Flat background used when the dark skybox cannot be loaded.
    #[schemars(skip)]
    pub dark_fallback: [f32; 3],
    /// Flat background used when the light skybox cannot be loaded.
    #[schemars(skip)]
    pub light_fallback: [f32; 3],
}

impl Default for ThemeOptions {
    fn default() -> Self {
        Self {
            dark_skybox: "/images/skybox/dark-skybox.png".into(),
            light_skybox: "/images/skybox/light-skybox.png".into(),
            dark_fallback: hex_color(0x0022_333b),
            light_fallback: hex_color(0x00c6_ac8f),
        }
    }
}
