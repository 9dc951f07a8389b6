use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Skybox", inline)]
#[serde(default)]
/// Geometry of the inward-facing skybox sphere.
pub struct SkyboxOptions {
    /// Sphere radius in world units.
    #[schemars(skip)]
    pub radius: f32,
    /// Longitude/latitude segment count.
    #[schemars(skip)]
    pub segments: u32,
    /// Fraction of the radius the camera may travel from the origin.
    #[schemars(title = "Camera Reach", range(min = 0.1, max = 0.99), extend("step" = 0.01))]
    pub max_distance_multiplier: f32,
}

impl SkyboxOptions {
    /// Farthest distance from the origin the camera may reach without
    /// crossing the skybox shell.
    #[must_use]
    pub fn distance_ceiling(&self) -> f32 {
        self.radius * self.max_distance_multiplier
    }
}

impl Default for SkyboxOptions {
    fn default() -> Self {
        Self {
            radius: 3000.0,
            segments: 16,
            max_distance_multiplier: 0.95,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera Bounds", inline)]
#[serde(default)]
/// Ground constraint applied to the camera every active frame.
pub struct CameraBoundsOptions {
    /// Lowest camera height; lower positions are clamped up to it.
    #[schemars(title = "Floor Height", range(min = -100.0, max = 100.0), extend("step" = 0.5))]
    pub min_height: f32,
}

impl Default for CameraBoundsOptions {
    fn default() -> Self {
        Self { min_height: 0.5 }
    }
}
