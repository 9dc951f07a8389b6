//! Static scene manifest: which models to show and what to say about them.
//!
//! The manifest is read-only input. Every optional field has a default so a
//! minimal entry only needs an `id` and a `model_path`:
//!
//! ```toml
//! [[scenes]]
//! id = "model1"
//! container = "container1"
//! model_path = "/models/model1.glb"
//!
//! [[scenes.points]]
//! position = [3.0, 40.0, 3.0]
//! label = "Burial rites"
//! info = "Cremated remains were found in the surrounding pits."
//! ```

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::{error::ShowcaseError, options::hex_color};

/// Placeholder cube colors, one per scene position.
const FALLBACK_COLORS: [u32; 5] =
    [0x008b_4513, 0x00cd_853f, 0x00d2_691e, 0x00a0_522d, 0x00de_b887];

/// One clickable annotation anchored in model space.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PointDescriptor {
    /// Position in the model's original (unscaled) coordinate system.
    pub position: [f32; 3],
    /// Short title shown in the info panel header.
    pub label: String,
    /// Body text shown in the info panel.
    pub info: String,
}

impl PointDescriptor {
    /// Position as a vector.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

/// Static description of one showcase scene.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct SceneDescriptor {
    /// Stable identifier, also used by navigation buttons.
    pub id: String,
    /// Viewport the scene renders into. Scenes without one are skipped.
    pub container: Option<String>,
    /// Info panel bound to the scene. Without one, clicks are ignored.
    pub info_panel: Option<String>,
    /// Model file location as requested by the manifest.
    pub model_path: String,
    /// Display name of the building.
    pub title: String,
    /// Architectural style shown in the info panel.
    pub style: String,
    /// Construction period shown in the info panel.
    pub period: String,
    /// Annotations, in display order.
    pub points: Vec<PointDescriptor>,
}

/// Ordered scene list plus the facts shown while a scene loads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Manifest {
    /// Scenes in navigation order.
    pub scenes: Vec<SceneDescriptor>,
    /// Historical facts, one picked at random per loading screen.
    pub facts: Vec<String>,
}

impl Manifest {
    /// Load a manifest from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ShowcaseError> {
        let content =
            std::fs::read_to_string(path).map_err(ShowcaseError::Io)?;
        Self::from_toml(&content)
    }

    /// Parse a manifest from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ShowcaseError> {
        toml::from_str(content)
            .map_err(|e| ShowcaseError::ManifestParse(e.to_string()))
    }

    /// Points configured for the scene at `index`, empty when the scene
    /// does not exist or has none.
    #[must_use]
    pub fn points_for(&self, index: usize) -> &[PointDescriptor] {
        self.scenes.get(index).map_or(&[], |s| s.points.as_slice())
    }

    /// Index of the scene with the given id.
    #[must_use]
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.scenes.iter().position(|s| s.id == id)
    }

    /// Placeholder color for the scene at `index`.
    #[must_use]
    pub fn fallback_color(index: usize) -> [f32; 3] {
        hex_color(
            FALLBACK_COLORS
                .get(index)
                .copied()
                .unwrap_or(FALLBACK_COLORS[0]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
facts = ["Gothic architecture originated in twelfth-century France."]

[[scenes]]
id = "model1"
container = "container1"
info_panel = "info-panel1"
model_path = "/models/model1.glb"
style = "Neolithic"
period = "3000 BC"

[[scenes.points]]
position = [333.0, 280.0, 70.0]
label = "Age"
info = "Earthworks first appeared around 3000 BC."

[[scenes]]
id = "model2"
model_path = "/models/model2.glb"
"#;

    #[test]
    fn optional_fields_default() {
        let manifest = Manifest::from_toml(SAMPLE).unwrap();
        assert_eq!(manifest.scenes.len(), 2);
        let second = &manifest.scenes[1];
        assert!(second.container.is_none());
        assert!(second.info_panel.is_none());
        assert!(second.points.is_empty());
        assert_eq!(manifest.facts.len(), 1);
    }

    #[test]
    fn points_for_out_of_range_is_empty() {
        let manifest = Manifest::from_toml(SAMPLE).unwrap();
        assert_eq!(manifest.points_for(0).len(), 1);
        assert!(manifest.points_for(1).is_empty());
        assert!(manifest.points_for(7).is_empty());
        assert_eq!(
            manifest.points_for(0)[0].position(),
            Vec3::new(333.0, 280.0, 70.0)
        );
    }

    #[test]
    fn position_of_finds_scene_by_id() {
        let manifest = Manifest::from_toml(SAMPLE).unwrap();
        assert_eq!(manifest.position_of("model2"), Some(1));
        assert_eq!(manifest.position_of("nope"), None);
    }

    #[test]
    fn fallback_color_wraps_to_first() {
        assert_eq!(Manifest::fallback_color(9), Manifest::fallback_color(0));
        assert_ne!(Manifest::fallback_color(1), Manifest::fallback_color(0));
    }

    #[test]
    fn malformed_manifest_is_reported() {
        let err = Manifest::from_toml("scenes = 3").unwrap_err();
        assert!(matches!(err, ShowcaseError::ManifestParse(_)));
    }
}
