use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Perspective projection parameters and the camera's starting position.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    #[schemars(title = "Field of View", range(min = 20.0, max = 120.0), extend("step" = 1.0))]
    pub fov: f32,
    /// Near clipping plane distance.
    #[schemars(skip)]
    pub near: f32,
    /// Far clipping plane distance.
    #[schemars(skip)]
    pub far: f32,
    /// Camera position before any model has been framed. Only its direction
    /// survives framing; the distance is derived from the model size.
    #[schemars(skip)]
    pub initial_position: [f32; 3],
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fov: 75.0,
            near: 0.1,
            far: 5000.0,
            initial_position: [5.0, 5.0, 5.0],
        }
    }
}
