use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Controls", inline)]
#[serde(default)]
/// Damped orbit control parameters.
pub struct ControlOptions {
    /// Fraction of the pending orbit/pan motion applied per frame.
    #[schemars(title = "Damping", range(min = 0.01, max = 1.0), extend("step" = 0.01))]
    pub damping: f32,
    /// Closest allowed camera distance before a model is framed.
    #[schemars(skip)]
    pub min_distance: f32,
    /// Farthest allowed camera distance before a model is framed.
    #[schemars(skip)]
    pub max_distance: f32,
    /// Dolly sensitivity multiplier.
    #[schemars(title = "Zoom Speed", range(min = 0.1, max = 3.0), extend("step" = 0.05))]
    pub zoom_speed: f32,
    /// Orbit sensitivity multiplier.
    #[schemars(title = "Rotate Speed", range(min = 0.1, max = 3.0), extend("step" = 0.05))]
    pub rotate_speed: f32,
    /// Pan sensitivity multiplier.
    #[schemars(title = "Pan Speed", range(min = 0.1, max = 3.0), extend("step" = 0.05))]
    pub pan_speed: f32,
    /// Largest polar angle (radians from straight up) the orbit may reach.
    #[schemars(skip)]
    pub max_polar_angle: f32,
}

impl Default for ControlOptions {
    fn default() -> Self {
        Self {
            damping: 0.05,
            min_distance: 1.0,
            max_distance: 3000.0,
            zoom_speed: 1.0,
            rotate_speed: 1.0,
            pan_speed: 1.0,
            max_polar_angle: std::f32::consts::PI,
        }
    }
}
