//! Model normalization: centering, step-table scaling and the camera
//! distances derived from the framed size.
//!
//! Source files arrive in whatever unit their author used (millimeters,
//! meters, inches), so a single viewing setup cannot fit them all. Framing
//! moves the bounding-box center to the origin and applies a uniform scale
//! chosen from a fixed table of size thresholds.

use std::fmt;

use glam::Vec3;

use crate::{
    model::{Aabb, Model},
    options::{FramingOptions, SkyboxOptions},
};

/// Smallest scale factor framing ever applies.
pub const MIN_SCALE: f32 = 0.5;
/// Largest scale factor framing ever applies.
pub const MAX_SCALE: f32 = 20.0;

/// `(exclusive lower bound on max dimension, scale factor)`, checked in
/// order. Anything at or below the last threshold gets [`SMALLEST_SCALE`].
const SCALE_STEPS: [(f32, f32); 7] = [
    (1000.0, 1.0),
    (500.0, 1.0),
    (100.0, 2.0),
    (50.0, 3.0),
    (10.0, 5.0),
    (5.0, 8.0),
    (1.0, 12.0),
];
const SMALLEST_SCALE: f32 = 15.0;

/// Scale factor for a model whose largest bounding-box dimension is
/// `max_dim`, clamped to [`MIN_SCALE`]`..=`[`MAX_SCALE`].
#[must_use]
pub fn scale_factor_for(max_dim: f32) -> f32 {
    SCALE_STEPS
        .iter()
        .find(|(threshold, _)| max_dim > *threshold)
        .map_or(SMALLEST_SCALE, |&(_, scale)| scale)
        .clamp(MIN_SCALE, MAX_SCALE)
}

/// Sizes recorded by one framing pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelInfo {
    /// Bounding-box size before scaling.
    pub original_size: Vec3,
    /// Bounding-box size after scaling.
    pub scaled_size: Vec3,
    /// Uniform scale that was applied.
    pub scale_factor: f32,
}

impl ModelInfo {
    /// Used when framing fails: a nominal 10-unit model at unit scale.
    pub const FALLBACK: Self = Self {
        original_size: Vec3::splat(10.0),
        scaled_size: Vec3::splat(10.0),
        scale_factor: 1.0,
    };

    /// Fixed info reported for the placeholder cube.
    pub const PLACEHOLDER: Self = Self {
        original_size: Vec3::splat(8.0),
        scaled_size: Vec3::splat(8.0),
        scale_factor: 1.0,
    };
}

/// Why a model could not be framed.
#[derive(Debug, Clone, PartialEq)]
pub enum FramingError {
    /// The model has no vertices.
    EmptyGeometry,
    /// The bounding box contains NaN or infinite coordinates.
    NonFinite(Aabb),
}

impl fmt::Display for FramingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGeometry => write!(f, "model has no geometry"),
            Self::NonFinite(bounds) => {
                write!(f, "model bounds are not finite: {bounds:?}")
            }
        }
    }
}

impl std::error::Error for FramingError {}

/// Centers and scales models, and derives camera limits from their size.
#[derive(Debug, Clone)]
pub struct ModelFramer {
    framing: FramingOptions,
    ceiling: f32,
}

impl ModelFramer {
    /// Framer using the given heuristic constants. Camera distances never
    /// exceed the skybox's distance ceiling.
    #[must_use]
    pub fn new(framing: &FramingOptions, skybox: &SkyboxOptions) -> Self {
        Self {
            framing: framing.clone(),
            ceiling: skybox.distance_ceiling(),
        }
    }

    /// Farthest distance from the origin any derived limit may reach.
    #[must_use]
    pub fn ceiling(&self) -> f32 {
        self.ceiling
    }

    /// Center `model` at the origin and apply the step-table scale.
    ///
    /// The root transform is rewritten so the world-space bounding box is
    /// centered on the origin after scaling. Existing rotation is kept.
    pub fn frame(&self, model: &mut Model) -> Result<ModelInfo, FramingError> {
        let bounds = model.world_bounds().ok_or(FramingError::EmptyGeometry)?;
        if !bounds.is_finite() {
            return Err(FramingError::NonFinite(bounds));
        }

        let center = bounds.center();
        let size = bounds.size();
        let scale = scale_factor_for(bounds.max_dimension());

        let transform = &mut model.transform;
        transform.translation = (transform.translation - center) * scale;
        transform.scale *= scale;

        let info = ModelInfo {
            original_size: size,
            scaled_size: size * scale,
            scale_factor: scale,
        };
        log::info!(
            "framed {}: max dimension {:.2}, scale {scale}, new size {:.2}",
            model.name,
            bounds.max_dimension(),
            info.scaled_size.max_element()
        );
        Ok(info)
    }

    /// [`frame`](Self::frame), substituting [`ModelInfo::FALLBACK`] on
    /// failure.
    pub fn frame_or_fallback(&self, model: &mut Model) -> ModelInfo {
        self.frame(model).unwrap_or_else(|e| {
            log::error!("framing {} failed, using fallback size: {e}", model.name);
            ModelInfo::FALLBACK
        })
    }

    /// Camera distance from the origin for a framed model whose largest
    /// dimension is `max_dim`.
    #[must_use]
    pub fn camera_distance(&self, max_dim: f32) -> f32 {
        ((max_dim - self.framing.distance_offset) * 0.5)
            .max(self.framing.distance_floor)
            .min(self.ceiling)
    }

    /// Orbit distance limits set right after framing.
    #[must_use]
    pub fn framing_limits(&self, max_dim: f32) -> (f32, f32) {
        self.limits((max_dim * 0.2).max(1.0), (max_dim * 8.0).max(100.0))
    }

    /// Orbit distance limits set on every activation.
    #[must_use]
    pub fn zoom_limits(&self, max_dim: f32) -> (f32, f32) {
        self.limits((max_dim * 0.1).max(0.5), (max_dim * 10.0).max(50.0))
    }

    fn limits(&self, min: f32, max: f32) -> (f32, f32) {
        let max = max.min(self.ceiling);
        (min.min(max), max)
    }
}

#[cfg(test)]
mod tests {
    use glam::{Mat4, Quat};

    use super::*;
    use crate::model::{Mesh, MeshNode};

    fn framer() -> ModelFramer {
        ModelFramer::new(&FramingOptions::default(), &SkyboxOptions::default())
    }

    fn boxed(size: Vec3, offset: Vec3) -> Model {
        Model::new(
            "box",
            vec![MeshNode {
                mesh: Mesh::cuboid(size),
                local: Mat4::from_translation(offset),
                color: [1.0; 3],
                opacity: 1.0,
            }],
        )
    }

    #[test]
    fn step_table() {
        assert_eq!(scale_factor_for(5000.0), 1.0);
        assert_eq!(scale_factor_for(700.0), 1.0);
        assert_eq!(scale_factor_for(500.0), 2.0);
        assert_eq!(scale_factor_for(101.0), 2.0);
        assert_eq!(scale_factor_for(60.0), 3.0);
        assert_eq!(scale_factor_for(30.0), 5.0);
        assert_eq!(scale_factor_for(7.0), 8.0);
        assert_eq!(scale_factor_for(3.0), 12.0);
        assert_eq!(scale_factor_for(1.0), 15.0);
        assert_eq!(scale_factor_for(0.5), 15.0);
    }

    #[test]
    fn scale_is_always_within_bounds() {
        let mut dim = 1e-6_f32;
        while dim < 1e6 {
            let s = scale_factor_for(dim);
            assert!((MIN_SCALE..=MAX_SCALE).contains(&s), "{dim} -> {s}");
            dim *= 1.7;
        }
        assert!((MIN_SCALE..=MAX_SCALE).contains(&scale_factor_for(0.0)));
    }

    #[test]
    fn framed_model_is_centered() {
        let mut model = boxed(Vec3::new(40.0, 20.0, 10.0), Vec3::new(100.0, -7.0, 3.0));
        model.transform.rotation = Quat::from_rotation_y(0.6);
        model.transform.translation = Vec3::new(-12.0, 5.0, 1.0);

        let info = framer().frame(&mut model).unwrap();
        let bounds = model.world_bounds().unwrap();
        assert!(bounds.center().length() < 1e-3, "{:?}", bounds.center());
        assert_eq!(info.scale_factor, 5.0);
        assert!((info.scaled_size - info.original_size * 5.0).length() < 1e-3);
        assert!((bounds.size() - info.scaled_size).length() < 1e-2);
    }

    #[test]
    fn empty_model_falls_back() {
        let mut model = Model::new("empty", Vec::new());
        assert_eq!(
            framer().frame(&mut model),
            Err(FramingError::EmptyGeometry)
        );
        assert_eq!(framer().frame_or_fallback(&mut model), ModelInfo::FALLBACK);
    }

    #[test]
    fn non_finite_geometry_is_rejected() {
        let mut model = boxed(Vec3::ONE, Vec3::ZERO);
        model.nodes[0].mesh.positions[0] = Vec3::new(f32::INFINITY, 0.0, 0.0);
        assert!(matches!(
            framer().frame(&mut model),
            Err(FramingError::NonFinite(_))
        ));
    }

    #[test]
    fn camera_distance_floor_and_ceiling() {
        let framer = framer();
        assert_eq!(framer.camera_distance(40.0), 10.0);
        assert_eq!(framer.camera_distance(700.0), 200.0);
        assert_eq!(framer.camera_distance(1e6), framer.ceiling());
    }

    #[test]
    fn limits_never_exceed_ceiling() {
        let framer = framer();
        assert_eq!(framer.framing_limits(10.0), (2.0, 100.0));
        assert_eq!(framer.zoom_limits(2.0), (0.5, 50.0));
        let (min, max) = framer.zoom_limits(1e5);
        assert_eq!(max, framer.ceiling());
        assert!(min <= max);
    }
}
