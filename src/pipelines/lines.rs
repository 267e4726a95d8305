use crate::{
    data_structures::{
        instance::InstanceRaw,
        model::{ModelVertex, Vertex},
        texture::Texture,
    },
    pipelines::basic::{PipelineOptions, mesh_shader, mk_render_pipeline},
};

/// Unlit line-list pipeline for the floor grid.
pub fn mk_line_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    layout: &wgpu::PipelineLayout,
) -> wgpu::RenderPipeline {
    mk_render_pipeline(
        device,
        layout,
        config.format,
        Some(wgpu::BlendState::ALPHA_BLENDING),
        Some(Texture::DEPTH_FORMAT),
        &[ModelVertex::desc(), InstanceRaw::desc()],
        mesh_shader(),
        PipelineOptions {
            label: "Line Pipeline",
            topology: wgpu::PrimitiveTopology::LineList,
            depth_write: false,
            fragment_entry: "fs_unlit",
        },
    )
}
