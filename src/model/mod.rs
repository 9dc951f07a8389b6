//! In-memory 3D model: a flat list of mesh nodes under one root transform.
//!
//! Loaded files are flattened at decode time (node hierarchies are baked
//! into each node's local matrix), so framing and rendering only ever deal
//! with `root transform × node local × vertex`.

mod aabb;
/// glTF / GLB decoding.
pub mod gltf;
mod mesh;

pub use aabb::Aabb;
use glam::{Mat4, Quat, Vec3};
pub use mesh::Mesh;

/// Translation, rotation and scale of a model or point group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// World-space translation.
    pub translation: Vec3,
    /// Orientation.
    pub rotation: Quat,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// No translation, rotation or scale.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Compose into a 4×4 matrix (scale, then rotate, then translate).
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale,
            self.rotation,
            self.translation,
        )
    }
}

/// One drawable mesh with its baked local transform and material color.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshNode {
    /// Geometry in node space.
    pub mesh: Mesh,
    /// Node space → model space.
    pub local: Mat4,
    /// Base color (linear RGB).
    pub color: [f32; 3],
    /// Opacity in `0.0..=1.0`.
    pub opacity: f32,
}

/// A renderable model.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    /// Human-readable origin (file path or "placeholder").
    pub name: String,
    /// Mesh nodes.
    pub nodes: Vec<MeshNode>,
    /// Root transform applied on top of every node.
    pub transform: Transform,
}

impl Model {
    /// Model with the given nodes and an identity root transform.
    #[must_use]
    pub fn new(name: impl Into<String>, nodes: Vec<MeshNode>) -> Self {
        Self {
            name: name.into(),
            nodes,
            transform: Transform::IDENTITY,
        }
    }

    /// Deterministic stand-in shown when a model cannot be loaded: a cube
    /// of edge `size` in the given color.
    #[must_use]
    pub fn placeholder(size: f32, color: [f32; 3]) -> Self {
        Self::new(
            "placeholder",
            vec![MeshNode {
                mesh: Mesh::cuboid(Vec3::splat(size)),
                local: Mat4::IDENTITY,
                color,
                opacity: 0.8,
            }],
        )
    }

    /// World-space bounds of every vertex in the model, or `None` when the
    /// model carries no geometry.
    #[must_use]
    pub fn world_bounds(&self) -> Option<Aabb> {
        let root = self.transform.matrix();
        let mut bounds = Aabb::EMPTY;
        for node in &self.nodes {
            let m = root * node.local;
            for p in &node.mesh.positions {
                bounds.expand(m.transform_point3(*p));
            }
        }
        (!bounds.is_empty()).then_some(bounds)
    }

    /// Total triangle count over all nodes.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.nodes.iter().map(|n| n.mesh.triangle_count()).sum()
    }
}
