use cgmath::{InnerSpace, Vector3};
use wgpu::util::DeviceExt;

use crate::scene::{Fog, Light, LightKind, Lighting};

const DIRECTIONAL: f32 = 0.0;
const SPOT: f32 = 1.0;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightRaw {
    /// xyz = position, w = kind (0 directional, 1 spot)
    position: [f32; 4],
    /// xyz = unit vector from the light towards its target, w = cosine of the outer cone
    direction: [f32; 4],
    /// rgb = colour × intensity, w = cosine of the inner cone
    color: [f32; 4],
}

impl From<&Light> for LightRaw {
    fn from(light: &Light) -> Self {
        let position = Vector3::from(light.position);
        let towards = Vector3::from(light.target) - position;
        let direction = if towards.magnitude2() > 0.0 {
            towards.normalize()
        } else {
            -Vector3::unit_y()
        };
        let (kind, cos_outer, cos_inner) = match light.kind {
            LightKind::Directional => (DIRECTIONAL, -1.0, -1.0),
            LightKind::Spot { angle, penumbra } => {
                (SPOT, angle.cos(), (angle * (1.0 - penumbra)).cos())
            }
        };
        let [r, g, b] = light.color;
        let i = light.intensity;
        Self {
            position: [position.x, position.y, position.z, kind],
            direction: [direction.x, direction.y, direction.z, cos_outer],
            color: [r * i, g * i, b * i, cos_inner],
        }
    }
}

/// Everything the fragment shader needs besides the material: lights, fog, tone mapping.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    /// rgb = ambient colour × intensity
    ambient: [f32; 4],
    lights: [LightRaw; 4],
    /// rgb = fog colour, w = exposure
    fog_color: [f32; 4],
    /// x = near, y = far
    fog_range: [f32; 4],
}

impl LightUniform {
    pub fn new(lighting: &Lighting, fog: &Fog, exposure: f32) -> Self {
        let [r, g, b] = lighting.ambient_color;
        let a = lighting.ambient_intensity;
        let [fr, fg, fb] = fog.color;
        Self {
            ambient: [r * a, g * a, b * a, 0.0],
            lights: lighting.lights.each_ref().map(LightRaw::from),
            fog_color: [fr, fg, fb, exposure],
            fog_range: [fog.near, fog.far, 0.0, 0.0],
        }
    }
}

pub struct LightResources {
    pub uniform: LightUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl LightResources {
    pub fn new(device: &wgpu::Device, uniform: LightUniform) -> Self {
        let buffer = mk_buffer(device, uniform);
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = mk_bind_group(device, &bind_group_layout, &buffer);
        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    /// Uploads `uniform` if it differs from what the GPU already has.
    pub fn update(&mut self, queue: &wgpu::Queue, uniform: LightUniform) {
        if uniform != self.uniform {
            self.uniform = uniform;
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
        }
    }
}

pub fn mk_buffer(device: &wgpu::Device, light_uniform: LightUniform) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Light Buffer"),
        contents: bytemuck::cast_slice(&[light_uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("light_bind_group_layout"),
    })
}

pub fn mk_bind_group(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    light_buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: light_buffer.as_entire_binding(),
        }],
        label: Some("light_bind_group"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_is_a_whole_number_of_vec4s() {
        assert_eq!(std::mem::size_of::<LightRaw>() % 16, 0);
        assert_eq!(std::mem::size_of::<LightUniform>(), 16 * (1 + 4 * 3 + 2));
    }

    #[test]
    fn spot_cone_is_encoded_as_cosines() {
        let uniform = LightUniform::new(&Lighting::default(), &Fog::default(), 1.2);
        let spot = uniform.lights[3];
        assert_eq!(spot.position[3], SPOT);
        assert_eq!(spot.direction[..3], [0.0, -1.0, 0.0]);
        assert!(spot.color[3] > spot.direction[3]);
        assert_eq!(uniform.fog_range[..2], [20.0, 50.0]);
        assert_eq!(uniform.fog_color[3], 1.2);
    }
}
