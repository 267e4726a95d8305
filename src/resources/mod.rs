/**
 * This module turns the CPU-side scene into GPU resources.
 *
 * Geometry is uploaded once per part. Materials are uploaded once per `Rc<Material>`
 * so mirrored and repeated parts share one bind group. Only the per-part instance
 * buffers change from frame to frame.
 */
use std::{collections::HashMap, rc::Rc};

use wgpu::util::DeviceExt;

use crate::{
    data_structures::{
        material::Material,
        model::{GpuMaterial, Mesh},
    },
    scene::Scene,
};

pub struct GpuPart {
    pub mesh: Mesh,
    pub material: Rc<GpuMaterial>,
    pub instance_buffer: wgpu::Buffer,
}

/// Uploads every part of `scene`, in [`Scene::parts`] order.
pub fn upload_scene(
    device: &wgpu::Device,
    material_layout: &wgpu::BindGroupLayout,
    scene: &Scene,
) -> Vec<GpuPart> {
    let mut materials: HashMap<*const Material, Rc<GpuMaterial>> = HashMap::new();
    let parts: Vec<GpuPart> = scene
        .parts()
        .into_iter()
        .map(|part| {
            let material = materials
                .entry(Rc::as_ptr(part.material))
                .or_insert_with(|| Rc::new(GpuMaterial::new(device, material_layout, part.material)))
                .clone();
            let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Instance Buffer", part.name)),
                contents: bytemuck::cast_slice(&[part.world.to_raw()]),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });
            GpuPart {
                mesh: Mesh::new(device, part.name, part.mesh),
                material,
                instance_buffer,
            }
        })
        .collect();
    log::info!(
        "Uploaded {} parts sharing {} materials",
        parts.len(),
        materials.len()
    );
    parts
}

/// Writes the current world transform of every part into its instance buffer.
pub fn write_instances(queue: &wgpu::Queue, gpu_parts: &[GpuPart], scene: &Scene) {
    for (gpu, part) in gpu_parts.iter().zip(scene.parts()) {
        queue.write_buffer(
            &gpu.instance_buffer,
            0,
            bytemuck::cast_slice(&[part.world.to_raw()]),
        );
    }
}
