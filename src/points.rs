//! Clickable annotation markers anchored to a scene's model.
//!
//! Marker positions are stored in the model's original coordinate system.
//! The set carries its own copy of the model transform, refreshed every
//! active frame, so markers follow the model through framing and any later
//! transform change.

use glam::Vec3;

use crate::{
    camera::Ray,
    manifest::PointDescriptor,
    model::Transform,
    options::InteractionOptions,
};

/// One clickable marker.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractivePoint {
    /// Position in model space.
    pub position: Vec3,
    /// Info panel title.
    pub label: String,
    /// Info panel body.
    pub info: String,
    /// Index within the scene's point list.
    pub point_index: usize,
    /// Index of the owning scene.
    pub scene_index: usize,
    /// Color restored when a highlight ends.
    pub original_color: [f32; 3],
    /// Color currently drawn.
    pub color: [f32; 3],
}

/// Marker hit by a picking ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointHit {
    /// Index of the hit point.
    pub point_index: usize,
    /// Distance along the ray to the marker surface.
    pub distance: f32,
}

/// Per-scene set of interactive markers.
#[derive(Debug, Clone)]
pub struct InteractivePointSet {
    points: Vec<InteractivePoint>,
    transform: Transform,
    radius: f32,
    point_color: [f32; 3],
    highlight_color: [f32; 3],
}

impl InteractivePointSet {
    /// Empty set using the configured marker size and colors.
    #[must_use]
    pub fn new(options: &InteractionOptions) -> Self {
        Self {
            points: Vec::new(),
            transform: Transform::IDENTITY,
            radius: options.point_size,
            point_color: options.point_color,
            highlight_color: options.highlight_color,
        }
    }

    /// Replace every marker with one per descriptor.
    pub fn rebuild(&mut self, descriptors: &[PointDescriptor], scene_index: usize) {
        self.points = descriptors
            .iter()
            .enumerate()
            .map(|(point_index, d)| InteractivePoint {
                position: d.position(),
                label: d.label.clone(),
                info: d.info.clone(),
                point_index,
                scene_index,
                original_color: self.point_color,
                color: self.point_color,
            })
            .collect();
    }

    /// Remove every marker.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Markers in index order.
    #[must_use]
    pub fn points(&self) -> &[InteractivePoint] {
        &self.points
    }

    /// Number of markers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the set has no markers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Marker radius in model space.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Transform currently applied to the markers.
    #[must_use]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Copy the model's transform onto the marker group.
    pub fn sync_to(&mut self, model: &Transform) {
        self.transform = *model;
    }

    /// Switch a marker between its highlight and original color. Returns
    /// `false` for an out-of-range index.
    pub fn highlight(&mut self, index: usize, on: bool) -> bool {
        let highlight = self.highlight_color;
        self.points.get_mut(index).is_some_and(|point| {
            point.color = if on { highlight } else { point.original_color };
            true
        })
    }

    /// World-space center of the marker at `index`.
    #[must_use]
    pub fn world_position(&self, index: usize) -> Option<Vec3> {
        let matrix = self.transform.matrix();
        self.points
            .get(index)
            .map(|p| matrix.transform_point3(p.position))
    }

    /// Marker radius after the group transform's largest scale.
    #[must_use]
    pub fn world_radius(&self) -> f32 {
        self.radius * self.transform.scale.abs().max_element()
    }

    /// Nearest marker intersected by `ray`.
    #[must_use]
    pub fn pick(&self, ray: &Ray) -> Option<PointHit> {
        let matrix = self.transform.matrix();
        let radius = self.world_radius();
        self.points
            .iter()
            .filter_map(|p| {
                let center = matrix.transform_point3(p.position);
                ray_sphere(ray, center, radius).map(|distance| PointHit {
                    point_index: p.point_index,
                    distance,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

/// Distance along `ray` to the first intersection with a sphere, if any
/// intersection lies in front of the origin.
fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.direction);
    let c = oc.length_squared() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let sqrt = discriminant.sqrt();
    let near = -b - sqrt;
    let far = -b + sqrt;
    if near >= 0.0 {
        Some(near)
    } else if far >= 0.0 {
        Some(0.0)
    } else {
        None
    }
}
