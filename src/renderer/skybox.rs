use std::sync::Arc;

use wgpu::util::DeviceExt;

use crate::{
    gpu::{pipeline_helpers, texture::GpuTexture},
    model::Mesh,
    options::SkyboxOptions,
    theme::SkyboxImage,
};

/// Inward-facing skybox sphere and the texture currently mapped onto it.
pub(crate) struct SkyboxShell {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
    texture: Option<SkyboxTexture>,
}

struct SkyboxTexture {
    image: Arc<SkyboxImage>,
    _texture: GpuTexture,
    bind_group: wgpu::BindGroup,
}

impl SkyboxShell {
    pub(crate) fn new(device: &wgpu::Device, options: &SkyboxOptions) -> Self {
        let segments = options.segments.max(3);
        let sphere = Mesh::uv_sphere(options.radius, segments, segments);
        let positions: Vec<[f32; 3]> =
            sphere.positions.iter().map(glam::Vec3::to_array).collect();
        let vertices =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Skybox Vertices"),
                contents: bytemuck::cast_slice(&positions),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let indices =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Skybox Indices"),
                contents: bytemuck::cast_slice(&sphere.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        Self {
            vertices,
            indices,
            index_count: sphere.indices.len() as u32,
            texture: None,
        }
    }

    /// Map `image` onto the shell. Re-uploads only when the image changed.
    pub(crate) fn set_image(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        image: &Arc<SkyboxImage>,
    ) {
        if self
            .texture
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(&current.image, image))
        {
            return;
        }
        let texture = GpuTexture::from_rgba(
            device,
            queue,
            "Skybox Texture",
            (image.width, image.height),
            &image.pixels,
        );
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Skybox Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });
        self.texture = Some(SkyboxTexture {
            image: Arc::clone(image),
            _texture: texture,
            bind_group,
        });
    }

    /// Drop the texture; the scene falls back to its clear color.
    pub(crate) fn clear_image(&mut self) {
        self.texture = None;
    }

    /// Whether a texture is mapped.
    pub(crate) fn is_textured(&self) -> bool {
        self.texture.is_some()
    }

    /// Caller sets the pipeline and camera group first. Draws nothing
    /// without a texture.
    pub(crate) fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        let Some(texture) = &self.texture else {
            return;
        };
        pass.set_bind_group(1, &texture.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertices.slice(..));
        pass.set_index_buffer(self.indices.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// Bind group layout for the skybox texture and sampler.
pub(crate) fn bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Skybox Bind Group Layout"),
        entries: &[
            pipeline_helpers::texture_2d(0),
            pipeline_helpers::filtering_sampler(1),
        ],
    })
}
