use crate::gpu::texture::DEPTH_FORMAT;

/// Single color target writing straight to the surface format.
pub(crate) fn color_target(
    format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
) -> [Option<wgpu::ColorTargetState>; 1] {
    [Some(wgpu::ColorTargetState {
        format,
        blend,
        write_mask: wgpu::ColorWrites::ALL,
    })]
}

/// Standard depth-tested, depth-writing state used for model geometry.
pub(crate) fn depth_stencil_state() -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

/// Depth state that neither tests nor writes, for layers drawn in a fixed
/// order (skybox behind, markers on top).
pub(crate) fn depth_ignored_state() -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        depth_write_enabled: false,
        depth_compare: wgpu::CompareFunction::Always,
        ..depth_stencil_state()
    }
}

/// Everything that differs between the scene pipelines.
pub(crate) struct PipelineDesc<'a> {
    pub(crate) label: &'a str,
    pub(crate) shader: &'a wgpu::ShaderModule,
    pub(crate) bind_group_layouts: &'a [&'a wgpu::BindGroupLayout],
    pub(crate) vertex_layout: wgpu::VertexBufferLayout<'a>,
    pub(crate) blend: Option<wgpu::BlendState>,
    pub(crate) depth: wgpu::DepthStencilState,
}

/// Create an indexed triangle-list pipeline with `vs_main` / `fs_main`
/// entry points and no face culling.
pub(crate) fn create_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    desc: PipelineDesc<'_>,
) -> wgpu::RenderPipeline {
    let label = desc.label;
    let pipeline_layout =
        device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{label} Layout")),
            bind_group_layouts: desc.bind_group_layouts,
            push_constant_ranges: &[],
        });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: desc.shader,
            entry_point: Some("vs_main"),
            buffers: &[desc.vertex_layout],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: desc.shader,
            entry_point: Some("fs_main"),
            targets: &color_target(format, desc.blend),
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(desc.depth),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
