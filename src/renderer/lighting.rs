//! GPU lighting uniform: ambient plus a key and a fill directional light.

use glam::Vec3;

use crate::options::LightingOptions;

/// Scene lighting uniform.
/// NOTE: Must match the WGSL `Lighting` struct layout exactly (64 bytes)
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingUniform {
    /// Ambient light color.
    pub ambient: [f32; 3],
    /// Ambient light intensity.
    pub ambient_intensity: f32,
    /// Key light color.
    pub key_color: [f32; 3],
    /// Key light intensity.
    pub key_intensity: f32,
    /// Unit vector pointing from the origin toward the key light.
    pub key_dir: [f32; 3],
    /// Fill light intensity.
    pub fill_intensity: f32,
    /// Unit vector pointing from the origin toward the fill light.
    pub fill_dir: [f32; 3],
    _pad: f32,
}

impl LightingUniform {
    /// Lights aimed at the origin from their configured positions.
    #[must_use]
    pub fn from_options(options: &LightingOptions) -> Self {
        Self {
            ambient: options.ambient_color,
            ambient_intensity: options.ambient_intensity,
            key_color: options.key_color,
            key_intensity: options.key_intensity,
            key_dir: toward(options.key_position),
            fill_intensity: options.fill_intensity,
            fill_dir: toward(options.fill_position),
            _pad: 0.0,
        }
    }
}

fn toward(position: [f32; 3]) -> [f32; 3] {
    Vec3::from_array(position)
        .try_normalize()
        .unwrap_or(Vec3::Y)
        .to_array()
}
