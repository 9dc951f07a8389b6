use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::hex_color;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Lighting", inline)]
#[serde(default)]
/// Ambient, key and fill light parameters shared by every scene.
pub struct LightingOptions {
    /// Ambient light color (linear RGB).
    #[schemars(skip)]
    pub ambient_color: [f32; 3],
    /// Ambient light intensity.
    #[schemars(title = "Ambient", range(min = 0.0, max = 2.0), extend("step" = 0.05))]
    pub ambient_intensity: f32,
    /// Key directional light color (linear RGB).
    #[schemars(skip)]
    pub key_color: [f32; 3],
    /// Key directional light intensity.
    #[schemars(title = "Key Light", range(min = 0.0, max = 4.0), extend("step" = 0.05))]
    pub key_intensity: f32,
    /// Key light position; the light shines from here toward the origin.
    #[schemars(skip)]
    pub key_position: [f32; 3],
    /// Fill light intensity (white).
    #[schemars(title = "Fill Light", range(min = 0.0, max = 2.0), extend("step" = 0.05))]
    pub fill_intensity: f32,
    /// Fill light position.
    #[schemars(skip)]
    pub fill_position: [f32; 3],
}

impl Default for LightingOptions {
    fn default() -> Self {
        Self {
            ambient_color: hex_color(0x0040_4040),
            ambient_intensity: 1.0,
            key_color: hex_color(0x00ff_ffff),
            key_intensity: 2.0,
            key_position: [50.0, 50.0, 25.0],
            fill_intensity: 0.4,
            fill_position: [-20.0, 10.0, -10.0],
        }
    }
}
