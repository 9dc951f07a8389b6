//! wgpu rendering backend for scene viewports.
//!
//! [`ScenePipelines`] holds the device-level pipelines and layouts, built
//! once and shared. Each scene gets its own [`GpuSceneTarget`] owning every
//! buffer and texture it draws with.
//!
//! Draw order per frame: skybox shell (no depth), lit model, then markers
//! with the depth test off so annotations are never hidden by geometry.

pub mod lighting;
mod markers;
pub mod mesh;
pub(crate) mod pipeline_util;
mod skybox;

use std::sync::Arc;

use wgpu::util::DeviceExt;

pub use lighting::LightingUniform;
pub use markers::{marker_instances, MarkerInstance};
pub use mesh::{bake_model, MeshVertex, ModelUniform};

use self::{
    markers::MarkerBuffers,
    mesh::ModelBuffers,
    pipeline_util::PipelineDesc,
    skybox::SkyboxShell,
};
use crate::{
    camera::CameraUniform,
    error::ShowcaseError,
    gpu::{
        pipeline_helpers, render_context::RenderContext, texture::GpuTexture,
    },
    model::Model,
    options::{LightingOptions, SkyboxOptions},
    points::InteractivePointSet,
    scene::{Background, FrameView, RenderTarget},
};

/// Device-level pipelines and bind group layouts shared by every scene.
pub struct ScenePipelines {
    camera_layout: wgpu::BindGroupLayout,
    uniform_layout: wgpu::BindGroupLayout,
    marker_layout: wgpu::BindGroupLayout,
    skybox_layout: wgpu::BindGroupLayout,
    skybox_sampler: wgpu::Sampler,
    mesh: wgpu::RenderPipeline,
    markers: wgpu::RenderPipeline,
    skybox: wgpu::RenderPipeline,
}

impl ScenePipelines {
    /// Compile shaders and build pipelines for the context's surface format.
    #[must_use]
    pub fn new(context: &RenderContext) -> Self {
        let device = &context.device;
        let format = context.format();

        let camera_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[pipeline_helpers::uniform_buffer(
                    0,
                    wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                )],
            });
        // Model transform (vertex) and lighting (fragment) share one shape.
        let uniform_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Scene Uniform Bind Group Layout"),
                entries: &[pipeline_helpers::uniform_buffer(
                    0,
                    wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                )],
            });
        let marker_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Marker Bind Group Layout"),
                entries: &[pipeline_helpers::vertex_storage_buffer(0)],
            });
        let skybox_layout = skybox::bind_group_layout(device);

        let mesh_shader = pipeline_helpers::wgsl_module(
            device,
            "Mesh Shader",
            include_str!("../../assets/shaders/mesh.wgsl"),
        );
        let marker_shader = pipeline_helpers::wgsl_module(
            device,
            "Marker Shader",
            include_str!("../../assets/shaders/marker.wgsl"),
        );
        let skybox_shader = pipeline_helpers::wgsl_module(
            device,
            "Skybox Shader",
            include_str!("../../assets/shaders/skybox.wgsl"),
        );

        let mesh = pipeline_util::create_pipeline(
            device,
            format,
            PipelineDesc {
                label: "Mesh Pipeline",
                shader: &mesh_shader,
                bind_group_layouts: &[
                    &camera_layout,
                    &uniform_layout,
                    &uniform_layout,
                ],
                vertex_layout: MeshVertex::layout(),
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                depth: pipeline_util::depth_stencil_state(),
            },
        );
        let markers = pipeline_util::create_pipeline(
            device,
            format,
            PipelineDesc {
                label: "Marker Pipeline",
                shader: &marker_shader,
                bind_group_layouts: &[&camera_layout, &marker_layout],
                vertex_layout: markers::position_layout(),
                blend: None,
                depth: pipeline_util::depth_ignored_state(),
            },
        );
        let skybox = pipeline_util::create_pipeline(
            device,
            format,
            PipelineDesc {
                label: "Skybox Pipeline",
                shader: &skybox_shader,
                bind_group_layouts: &[&camera_layout, &skybox_layout],
                vertex_layout: markers::position_layout(),
                blend: None,
                depth: pipeline_util::depth_ignored_state(),
            },
        );

        Self {
            camera_layout,
            uniform_layout,
            marker_layout,
            skybox_layout,
            skybox_sampler: pipeline_helpers::equirect_sampler(
                device,
                "Skybox Sampler",
            ),
            mesh,
            markers,
            skybox,
        }
    }
}

/// One scene's GPU resources, presenting to the shared window surface.
pub struct GpuSceneTarget {
    context: Arc<RenderContext>,
    pipelines: Arc<ScenePipelines>,
    size: (u32, u32),
    depth: GpuTexture,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    lighting_bind_group: wgpu::BindGroup,
    clear_color: [f32; 3],
    skybox: SkyboxShell,
    model: Option<ModelBuffers>,
    markers: Option<MarkerBuffers>,
    released: bool,
}

impl GpuSceneTarget {
    /// Allocate a scene's camera, lighting, depth and skybox resources.
    #[must_use]
    pub fn new(
        context: Arc<RenderContext>,
        pipelines: Arc<ScenePipelines>,
        lighting: &LightingOptions,
        skybox: &SkyboxOptions,
    ) -> Self {
        let device = &context.device;
        let size = context.size();

        let camera_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Buffer"),
                contents: bytemuck::bytes_of(&CameraUniform::new()),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group =
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Camera Bind Group"),
                layout: &pipelines.camera_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                }],
            });

        let lighting_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Lighting Buffer"),
                contents: bytemuck::bytes_of(&LightingUniform::from_options(
                    lighting,
                )),
                usage: wgpu::BufferUsages::UNIFORM,
            });
        let lighting_bind_group =
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Lighting Bind Group"),
                layout: &pipelines.uniform_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: lighting_buffer.as_entire_binding(),
                }],
            });

        Self {
            depth: GpuTexture::depth(device, size.0, size.1),
            skybox: SkyboxShell::new(device, skybox),
            size,
            camera_buffer,
            camera_bind_group,
            lighting_bind_group,
            clear_color: [0.0; 3],
            model: None,
            markers: None,
            released: false,
            context,
            pipelines,
        }
    }

    /// Whether a skybox texture is mapped.
    #[must_use]
    pub fn has_skybox(&self) -> bool {
        self.skybox.is_textured()
    }

    fn encode(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
    ) {
        let [r, g, b] = self.clear_color;
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                depth_slice: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: f64::from(r),
                        g: f64::from(g),
                        b: f64::from(b),
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(
                wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                },
            ),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_bind_group(0, &self.camera_bind_group, &[]);

        if self.skybox.is_textured() {
            pass.set_pipeline(&self.pipelines.skybox);
            self.skybox.draw(&mut pass);
        }
        if let Some(model) = &self.model {
            pass.set_pipeline(&self.pipelines.mesh);
            pass.set_bind_group(2, &self.lighting_bind_group, &[]);
            model.draw(&mut pass);
        }
        if let Some(markers) = &self.markers {
            pass.set_pipeline(&self.pipelines.markers);
            markers.draw(&mut pass);
        }
    }
}

impl RenderTarget for GpuSceneTarget {
    fn install_model(&mut self, model: &Model) {
        self.model = Some(ModelBuffers::new(
            &self.context.device,
            &self.pipelines.uniform_layout,
            model,
        ));
    }

    fn release_model(&mut self) {
        self.model = None;
    }

    fn install_points(&mut self, points: &InteractivePointSet) {
        self.markers = Some(MarkerBuffers::new(
            &self.context.device,
            &self.pipelines.marker_layout,
            points,
        ));
    }

    fn release_points(&mut self) {
        self.markers = None;
    }

    fn set_background(&mut self, background: &Background) {
        match background {
            Background::Color(color) => {
                self.clear_color = *color;
                self.skybox.clear_image();
            }
            Background::Skybox(image) => {
                self.clear_color = [0.0; 3];
                self.skybox.set_image(
                    &self.context.device,
                    &self.context.queue,
                    &self.pipelines.skybox_layout,
                    &self.pipelines.skybox_sampler,
                    image,
                );
            }
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 || (width, height) == self.size {
            return;
        }
        self.size = (width, height);
        self.depth = GpuTexture::depth(&self.context.device, width, height);
    }

    fn render(&mut self, frame: &FrameView<'_>) -> Result<(), ShowcaseError> {
        if self.released {
            return Err(ShowcaseError::Render("target was released".into()));
        }
        let context = Arc::clone(&self.context);
        context.ensure_size(self.size.0, self.size.1);

        let output = match context.get_next_frame() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                log::debug!("surface outdated, reconfiguring");
                context.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => return Ok(()),
            Err(e) => return Err(ShowcaseError::Render(e.to_string())),
        };

        context.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&CameraUniform::from_view(
                frame.view_proj,
                frame.eye,
            )),
        );
        if let (Some(buffers), Some(model)) = (&self.model, frame.model) {
            buffers.write_transform(&context.queue, model.transform.matrix());
        }
        if let Some(markers) = &mut self.markers {
            markers.write(
                &context.device,
                &context.queue,
                &self.pipelines.marker_layout,
                frame.points,
            );
        }

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = context.create_encoder();
        self.encode(&mut encoder, &view);
        context.submit(encoder);
        output.present();
        Ok(())
    }

    fn release(&mut self) {
        self.model = None;
        self.markers = None;
        self.skybox.clear_image();
        self.released = true;
    }
}
