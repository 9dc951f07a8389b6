use crate::{
    gpu::dynamic_buffer::TypedBuffer, model::Mesh,
    points::InteractivePointSet,
};

/// Longitude segments of the marker sphere.
const MARKER_SEGMENTS: u32 = 16;
/// Latitude rings of the marker sphere.
const MARKER_RINGS: u32 = 16;

/// One marker instance.
/// NOTE: Must match the WGSL `Marker` struct (32 bytes)
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MarkerInstance {
    /// World-space center.
    pub center: [f32; 3],
    /// World-space radius.
    pub radius: f32,
    /// Current color, opaque.
    pub color: [f32; 4],
}

/// World-space instances for every marker in the set, with its current
/// transform and colors.
#[must_use]
pub fn marker_instances(points: &InteractivePointSet) -> Vec<MarkerInstance> {
    let radius = points.world_radius();
    points
        .points()
        .iter()
        .enumerate()
        .filter_map(|(i, point)| {
            let center = points.world_position(i)?;
            let [r, g, b] = point.color;
            Some(MarkerInstance {
                center: center.to_array(),
                radius,
                color: [r, g, b, 1.0],
            })
        })
        .collect()
}

/// Instance storage plus a unit sphere to draw per instance.
pub(crate) struct MarkerBuffers {
    sphere_vertices: wgpu::Buffer,
    sphere_indices: wgpu::Buffer,
    sphere_index_count: u32,
    instances: TypedBuffer<MarkerInstance>,
    bind_group: wgpu::BindGroup,
}

impl MarkerBuffers {
    pub(crate) fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        points: &InteractivePointSet,
    ) -> Self {
        use wgpu::util::DeviceExt;

        let sphere = Mesh::uv_sphere(1.0, MARKER_SEGMENTS, MARKER_RINGS);
        let positions: Vec<[f32; 3]> =
            sphere.positions.iter().map(glam::Vec3::to_array).collect();
        let sphere_vertices =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Marker Sphere Vertices"),
                contents: bytemuck::cast_slice(&positions),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let sphere_indices =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Marker Sphere Indices"),
                contents: bytemuck::cast_slice(&sphere.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        let instances = TypedBuffer::new_with_data(
            device,
            "Marker Instances",
            &marker_instances(points),
            wgpu::BufferUsages::STORAGE,
        );
        let bind_group = Self::create_bind_group(device, layout, &instances);

        Self {
            sphere_vertices,
            sphere_indices,
            sphere_index_count: sphere.indices.len() as u32,
            instances,
            bind_group,
        }
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        instances: &TypedBuffer<MarkerInstance>,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Marker Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: instances.buffer().as_entire_binding(),
            }],
        })
    }

    /// Re-upload instances. Recreates the bind group if the buffer was
    /// reallocated.
    pub(crate) fn write(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        points: &InteractivePointSet,
    ) {
        if self.instances.write(device, queue, &marker_instances(points)) {
            self.bind_group =
                Self::create_bind_group(device, layout, &self.instances);
        }
    }

    /// Caller sets the pipeline and camera group first.
    pub(crate) fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        let count = self.instances.count() as u32;
        if count == 0 {
            return;
        }
        pass.set_bind_group(1, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.sphere_vertices.slice(..));
        pass.set_index_buffer(
            self.sphere_indices.slice(..),
            wgpu::IndexFormat::Uint32,
        );
        pass.draw_indexed(0..self.sphere_index_count, 0, 0..count);
    }
}

/// Vertex layout of a bare position stream, shared by markers and skybox.
pub(crate) fn position_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBUTES: [wgpu::VertexAttribute; 1] =
        wgpu::vertex_attr_array![0 => Float32x3];
    wgpu::VertexBufferLayout {
        array_stride: size_of::<[f32; 3]>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRIBUTES,
    }
}

#[cfg(test)]
mod tests {
    use glam::{Quat, Vec3};

    use super::*;
    use crate::{
        manifest::PointDescriptor, model::Transform,
        options::InteractionOptions,
    };

    fn two_points() -> InteractivePointSet {
        let mut set = InteractivePointSet::new(&InteractionOptions::default());
        let descriptors: Vec<PointDescriptor> = [[1.0, 0.0, 0.0], [0.0, 2.0, 0.0]]
            .into_iter()
            .map(|position| PointDescriptor {
                position,
                label: "label".into(),
                info: "info".into(),
            })
            .collect();
        set.rebuild(&descriptors, 0);
        set
    }

    #[test]
    fn instances_follow_the_model_transform() {
        let mut set = two_points();
        set.sync_to(&Transform {
            translation: Vec3::new(0.0, 0.0, -5.0),
            rotation: Quat::IDENTITY,
            scale: Vec3::splat(2.0),
        });
        let instances = marker_instances(&set);
        assert_eq!(instances.len(), 2);
        assert_eq!(instances[0].center, [2.0, 0.0, -5.0]);
        assert_eq!(instances[1].center, [0.0, 4.0, -5.0]);
        assert_eq!(instances[0].radius, set.world_radius());
    }

    #[test]
    fn highlighted_marker_uses_highlight_color() {
        let mut set = two_points();
        assert!(set.highlight(1, true));
        let instances = marker_instances(&set);
        let [r, g, b] = set.points()[1].color;
        assert_eq!(instances[1].color, [r, g, b, 1.0]);
        assert_ne!(instances[0].color, instances[1].color);
    }

    #[test]
    fn empty_set_has_no_instances() {
        let set = InteractivePointSet::new(&InteractionOptions::default());
        assert!(marker_instances(&set).is_empty());
        assert_eq!(size_of::<MarkerInstance>(), 32);
    }
}
