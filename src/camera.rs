//! Look-at camera, perspective projection and the camera uniform.
//!
//! The camera itself never rotates: orbiting rotates the scene root instead (see
//! [`crate::interaction`]). The camera only moves on zoom and preset selection.

use std::fmt;

use cgmath::{InnerSpace, Matrix4, MetricSpace, Point3, Rad, SquareMatrix, Vector3, perspective};
use wgpu::util::DeviceExt;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Fixed viewpoints selectable from the keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewPreset {
    Iso,
    Front,
    Side,
    Top,
    Rear,
}

impl ViewPreset {
    pub const ALL: [ViewPreset; 5] = [
        ViewPreset::Iso,
        ViewPreset::Front,
        ViewPreset::Side,
        ViewPreset::Top,
        ViewPreset::Rear,
    ];

    /// Camera position and look-at target for this preset.
    pub fn eye_and_target(self) -> ([f32; 3], [f32; 3]) {
        match self {
            ViewPreset::Iso => ([10.0, 5.0, 10.0], [3.0, 1.0, 0.0]),
            ViewPreset::Front => ([0.0, 2.0, 15.0], [3.0, 1.0, 0.0]),
            ViewPreset::Side => ([20.0, 3.0, 0.0], [3.0, 1.0, 0.0]),
            ViewPreset::Top => ([3.0, 20.0, 0.0], [3.0, 0.0, 0.0]),
            ViewPreset::Rear => ([6.0, 2.0, -15.0], [3.0, 1.0, 0.0]),
        }
    }

    pub fn camera(self) -> Camera {
        let (eye, target) = self.eye_and_target();
        Camera::new(eye, target)
    }
}

impl fmt::Display for ViewPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ViewPreset::Iso => "ISO",
            ViewPreset::Front => "FRONT",
            ViewPreset::Side => "SIDE",
            ViewPreset::Top => "TOP",
            ViewPreset::Rear => "REAR",
        };
        f.write_str(label)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
}

impl Camera {
    pub fn new<P: Into<Point3<f32>>>(position: P, target: P) -> Self {
        Self {
            position: position.into(),
            target: target.into(),
        }
    }

    pub fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }

    /// Moves the camera along the line to its target so the distance becomes `distance`.
    pub fn set_distance(&mut self, distance: f32) {
        let offset = self.position - self.target;
        if offset.magnitude2() > 0.0 {
            self.position = self.target + offset.normalize() * distance;
        }
    }

    /// World up, unless the view direction is (nearly) vertical; then screen up is −Z.
    pub fn up(&self) -> Vector3<f32> {
        let forward = self.target - self.position;
        if forward.magnitude2() > 0.0 && forward.normalize().y.abs() > 0.999 {
            -Vector3::unit_z()
        } else {
            Vector3::unit_y()
        }
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, self.up())
    }
}

impl Default for Camera {
    fn default() -> Self {
        ViewPreset::Iso.camera()
    }
}

pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = camera.position.to_homogeneous().into();
        self.view_proj = (projection.calc_matrix() * camera.calc_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// GPU side of the camera: uniform buffer and its bind group (group 1 in the shaders).
pub struct CameraResources {
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl CameraResources {
    pub fn new(device: &wgpu::Device, camera: &Camera, projection: &Projection) -> Self {
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(camera, projection);

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
            label: Some("camera_bind_group_layout"),
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn update(&mut self, queue: &wgpu::Queue, camera: &Camera, projection: &Projection) {
        self.uniform.update_view_proj(camera, projection);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, Transform};

    #[test]
    fn top_preset_has_a_usable_up_vector() {
        let camera = ViewPreset::Top.camera();
        assert_eq!(camera.up(), -Vector3::unit_z());
        let view = camera.calc_matrix();
        assert!(view.x.x.is_finite() && view.determinant().abs() > 0.5);
    }

    #[test]
    fn target_projects_to_the_screen_centre() {
        let camera = ViewPreset::Iso.camera();
        let projection = Projection::new(1600, 900, Deg(45.0), 0.1, 100.0);
        let clip = projection.calc_matrix() * camera.calc_matrix();
        let p = clip.transform_point(camera.target);
        assert!(p.x.abs() < 1e-5 && p.y.abs() < 1e-5);
        assert!(p.z > 0.0 && p.z < 1.0);
    }

    #[test]
    fn set_distance_keeps_direction() {
        let mut camera = ViewPreset::Front.camera();
        let before = (camera.position - camera.target).normalize();
        camera.set_distance(4.0);
        assert!((camera.distance() - 4.0).abs() < 1e-5);
        let after = (camera.position - camera.target).normalize();
        assert!((before - after).magnitude() < 1e-5);
    }
}
