//! Model geometry upload.
//!
//! Every node is baked into model space on install so a whole model draws
//! with one vertex buffer, one index buffer and one transform uniform. The
//! root transform stays a uniform because points follow it every frame.

use glam::{Mat3, Mat4};
use wgpu::util::DeviceExt;

use crate::{gpu::dynamic_buffer::DynamicBuffer, model::Model};

/// Interleaved model vertex.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Model-space position.
    pub position: [f32; 3],
    /// Model-space normal.
    pub normal: [f32; 3],
    /// Base color and opacity.
    pub color: [f32; 4],
}

impl MeshVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x4,
    ];

    /// Vertex buffer layout matching `mesh.wgsl`.
    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Flatten every node of `model` into one model-space vertex/index list.
#[must_use]
pub fn bake_model(model: &Model) -> (Vec<MeshVertex>, Vec<u32>) {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    for node in &model.nodes {
        let base = vertices.len() as u32;
        let normal_matrix = Mat3::from_mat4(node.local).inverse().transpose();
        let [r, g, b] = node.color;
        let color = [r, g, b, node.opacity];
        vertices.extend(node.mesh.positions.iter().zip(&node.mesh.normals).map(
            |(position, normal)| MeshVertex {
                position: node.local.transform_point3(*position).to_array(),
                normal: (normal_matrix * *normal).normalize_or_zero().to_array(),
                color,
            },
        ));
        indices.extend(node.mesh.indices.iter().map(|i| base + i));
    }
    (vertices, indices)
}

/// Root transform uniform.
/// NOTE: Must match the WGSL `ModelTransform` struct (128 bytes)
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniform {
    /// Model space → world space.
    pub model: [[f32; 4]; 4],
    /// Inverse transpose of `model`, for normals.
    pub normal: [[f32; 4]; 4],
}

impl ModelUniform {
    /// Uniform for a root transform matrix.
    #[must_use]
    pub fn from_matrix(model: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            normal: model.inverse().transpose().to_cols_array_2d(),
        }
    }
}

/// GPU buffers of one installed model.
pub(crate) struct ModelBuffers {
    vertices: DynamicBuffer,
    indices: DynamicBuffer,
    index_count: u32,
    uniform: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl ModelBuffers {
    pub(crate) fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        model: &Model,
    ) -> Self {
        let (vertices, indices) = bake_model(model);
        let uniform = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Model Transform"),
            contents: bytemuck::bytes_of(&ModelUniform::from_matrix(
                model.transform.matrix(),
            )),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Model Transform Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform.as_entire_binding(),
            }],
        });
        log::debug!(
            "uploaded {} ({} vertices, {} triangles)",
            model.name,
            vertices.len(),
            indices.len() / 3
        );
        Self {
            vertices: DynamicBuffer::new_with_data(
                device,
                "Model Vertices",
                &vertices,
                wgpu::BufferUsages::VERTEX,
            ),
            indices: DynamicBuffer::new_with_data(
                device,
                "Model Indices",
                &indices,
                wgpu::BufferUsages::INDEX,
            ),
            index_count: indices.len() as u32,
            uniform,
            bind_group,
        }
    }

    /// Refresh the root transform.
    pub(crate) fn write_transform(&self, queue: &wgpu::Queue, model: Mat4) {
        queue.write_buffer(
            &self.uniform,
            0,
            bytemuck::bytes_of(&ModelUniform::from_matrix(model)),
        );
    }

    /// Caller sets the pipeline and the camera/lighting groups first.
    pub(crate) fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        if self.index_count == 0 {
            return;
        }
        pass.set_bind_group(1, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertices.buffer().slice(..));
        pass.set_index_buffer(
            self.indices.buffer().slice(..),
            wgpu::IndexFormat::Uint32,
        );
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::model::{MeshNode, Model};

    #[test]
    fn bake_offsets_indices_per_node() {
        let cube = Model::placeholder(2.0, [1.0, 0.0, 0.0]);
        let mut nodes = cube.nodes.clone();
        nodes.push(MeshNode {
            local: Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)),
            ..cube.nodes[0].clone()
        });
        let model = Model::new("pair", nodes);
        let per_node = cube.nodes[0].mesh.positions.len() as u32;

        let (vertices, indices) = bake_model(&model);

        assert_eq!(vertices.len() as u32, per_node * 2);
        assert_eq!(indices.len(), cube.nodes[0].mesh.indices.len() * 2);
        assert!(indices[indices.len() / 2..].iter().all(|&i| i >= per_node));
        assert!(vertices[per_node as usize..].iter().all(|v| v.position[0] >= 9.0));
    }

    #[test]
    fn bake_carries_opacity_in_alpha() {
        let model = Model::placeholder(8.0, [0.5, 0.25, 0.0]);
        let (vertices, _) = bake_model(&model);
        assert!(vertices.iter().all(|v| v.color == [0.5, 0.25, 0.0, 0.8]));
    }

    #[test]
    fn bake_normals_stay_unit_under_scale() {
        let mut model = Model::placeholder(1.0, [1.0; 3]);
        model.nodes[0].local = Mat4::from_scale(Vec3::new(5.0, 1.0, 1.0));
        let (vertices, _) = bake_model(&model);
        for v in vertices {
            assert!((Vec3::from_array(v.normal).length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn uniform_layout_matches_shader() {
        assert_eq!(size_of::<ModelUniform>(), 128);
        assert_eq!(size_of::<MeshVertex>(), 40);
    }
}
