use crate::{
    data_structures::{
        instance::InstanceRaw,
        model::{ModelVertex, Vertex},
        texture::Texture,
    },
    pipelines::basic::{PipelineOptions, mesh_shader, mk_render_pipeline},
};

/**
 * Pipeline for translucent materials (the undercut).
 *
 * Same shader as the opaque pass, alpha blended. Depth is tested but not written so
 * translucent surfaces never hide what is drawn after them.
 */
pub fn mk_transparent_pipeline(
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
            label: "Transparent Pipeline",
            depth_write: false,
            ..Default::default()
        },
    )
}
