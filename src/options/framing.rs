use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Framing", inline)]
#[serde(default)]
/// Constants of the camera auto-framing heuristic
/// `distance = max((max_dim - distance_offset) * 0.5, distance_floor)`.
pub struct FramingOptions {
    /// Subtracted from the largest model dimension before halving.
    #[schemars(skip)]
    pub distance_offset: f32,
    /// Smallest framing distance.
    #[schemars(skip)]
    pub distance_floor: f32,
}

impl Default for FramingOptions {
    fn default() -> Self {
        Self {
            distance_offset: 300.0,
            distance_floor: 10.0,
        }
    }
}
