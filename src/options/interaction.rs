use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::hex_color;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Interaction", inline)]
#[serde(default)]
/// Interactive point appearance and panel text animation timing.
pub struct InteractionOptions {
    /// Marker sphere radius in model units (scaled with the model).
    #[schemars(title = "Point Size", range(min = 0.1, max = 50.0), extend("step" = 0.1))]
    pub point_size: f32,
    /// Marker color at rest.
    #[schemars(skip)]
    pub point_color: [f32; 3],
    /// Marker color while highlighted after a click.
    #[schemars(skip)]
    pub highlight_color: [f32; 3],
    /// How long a clicked marker stays highlighted.
    #[schemars(skip)]
    pub highlight_duration_ms: u64,
    /// Delay between typed characters of a panel title.
    #[schemars(skip)]
    pub title_char_interval_ms: u64,
    /// Delay between typed characters of a panel body.
    #[schemars(skip)]
    pub body_char_interval_ms: u64,
    /// Delay between typed characters of the loading-screen fact.
    #[schemars(skip)]
    pub loading_char_interval_ms: u64,
}

impl Default for InteractionOptions {
    fn default() -> Self {
        Self {
            point_size: 6.0,
            point_color: hex_color(0x0000_ff00),
            highlight_color: hex_color(0x00ff_d23f),
            highlight_duration_ms: 1000,
            title_char_interval_ms: 40,
            body_char_interval_ms: 20,
            loading_char_interval_ms: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Navigation", inline)]
#[serde(default)]
/// Scene navigation timing.
pub struct NavigationOptions {
    /// The loading indicator stays up at least this long after a
    /// navigation, even when the model was already loaded.
    #[schemars(skip)]
    pub loading_hide_delay_ms: u64,
}

impl Default for NavigationOptions {
    fn default() -> Self {
        Self {
            loading_hide_delay_ms: 1500,
        }
    }
}
