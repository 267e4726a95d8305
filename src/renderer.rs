//! The wgpu [`Renderer`].
//!
//! Each frame: write instance buffers, camera and lights, then draw the batches in
//! the order opaque, lines, transparent.

use std::iter;

use crate::{
    camera::Camera,
    context::Context,
    data_structures::model::DrawModel,
    pipelines::light::LightUniform,
    render::{Batches, Instanced, Render, RenderError, Renderer},
    resources::{self, GpuPart},
    scene::Scene,
};

pub struct GpuRenderer {
    ctx: Option<Context>,
    parts: Vec<GpuPart>,
    exposure: f32,
}

impl GpuRenderer {
    /// Uploads `scene` once; later frames only refresh transforms and uniforms.
    pub fn new(ctx: Context, scene: &Scene, exposure: f32) -> Self {
        let parts = resources::upload_scene(&ctx.device, &ctx.material_layout, scene);
        Self {
            ctx: Some(ctx),
            parts,
            exposure,
        }
    }
}

fn draw_batch(
    render_pass: &mut wgpu::RenderPass<'_>,
    pipeline: &wgpu::RenderPipeline,
    batch: Vec<Instanced<'_>>,
    ctx: &Context,
) {
    if batch.is_empty() {
        return;
    }
    render_pass.set_pipeline(pipeline);
    for instanced in batch {
        render_pass.set_vertex_buffer(1, instanced.instance.slice(..));
        render_pass.draw_mesh_instanced(
            instanced.mesh,
            instanced.material,
            0..instanced.amount,
            &ctx.camera.bind_group,
            &ctx.light.bind_group,
        );
    }
}

impl Renderer for GpuRenderer {
    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<(), RenderError> {
        let ctx = self
            .ctx
            .as_mut()
            .ok_or_else(|| RenderError::Other("renderer has been disposed".to_string()))?;

        if self.parts.len() != scene.mesh_count() {
            log::warn!("Scene changed shape, uploading it again");
            self.parts = resources::upload_scene(&ctx.device, &ctx.material_layout, scene);
        }
        resources::write_instances(&ctx.queue, &self.parts, scene);
        ctx.camera.update(&ctx.queue, camera, &ctx.projection);
        ctx.light.update(
            &ctx.queue,
            LightUniform::new(&scene.lighting, &scene.fog, self.exposure),
        );

        let output = ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let [r, g, b] = scene.background;
        let ctx: &Context = ctx;

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            let mut batches = Batches::default();
            Render::from(self.parts.as_slice()).set_pipelines(&mut batches);
            draw_batch(&mut render_pass, &ctx.pipelines.opaque, batches.opaque, ctx);
            draw_batch(&mut render_pass, &ctx.pipelines.lines, batches.lines, ctx);
            draw_batch(
                &mut render_pass,
                &ctx.pipelines.transparent,
                batches.transparent,
                ctx,
            );
        }

        ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if let Some(ctx) = self.ctx.as_mut() {
            ctx.resize(width, height);
        }
    }

    fn dispose(&mut self) {
        if let Some(ctx) = self.ctx.take() {
            self.parts.clear();
            ctx.device.destroy();
            log::info!("GPU resources released");
        }
    }
}
