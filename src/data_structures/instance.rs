//! Node transformation data for GPU rendering.
//!
//! Every scene node carries a local and a world [`Instance`]. The world instance is
//! packed into an [`InstanceRaw`] and bound as a per-instance vertex buffer.

use std::ops::Mul;

use cgmath::{Array, InnerSpace, Matrix, One, Quaternion, SquareMatrix, Vector3, Zero};

use crate::{data_structures::model, geometry::Axis};

/// Translation, rotation and non-uniform scale, applied scale first.
#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Instance {
    pub fn new() -> Self {
        Self {
            position: Vector3::zero(),
            rotation: Quaternion::one(),
            scale: Vector3::from_value(1.0),
        }
    }

    pub fn from_rotation(rotation: Quaternion<f32>) -> Self {
        Self {
            rotation,
            ..Default::default()
        }
    }

    pub fn with_rotation(mut self, rotation: Quaternion<f32>) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn to_matrix(&self) -> cgmath::Matrix4<f32> {
        cgmath::Matrix4::from_translation(self.position)
            * cgmath::Matrix4::from(self.rotation)
            * cgmath::Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Applies this transform to a point.
    pub fn transform_point(&self, p: Vector3<f32>) -> Vector3<f32> {
        self.position
            + self.rotation
                * Vector3::new(
                    self.scale.x * p.x,
                    self.scale.y * p.y,
                    self.scale.z * p.z,
                )
    }

    /// The transform conjugated by a reflection across the plane orthogonal to `axis`.
    ///
    /// If a mesh is mirrored with [`crate::geometry::MeshData::mirrored`], placing it with
    /// the mirrored instance yields the exact reflection of the original placement. The
    /// rotation stays a proper rotation: reflecting a quaternion negates the two vector
    /// components that are not `axis`.
    pub fn mirrored(&self, axis: Axis) -> Self {
        let i = axis.index();
        let mut position = self.position;
        position[i] = -position[i];
        let mut v = self.rotation.v;
        for k in 0..3 {
            if k != i {
                v[k] = -v[k];
            }
        }
        Self {
            position,
            rotation: Quaternion::from_sv(self.rotation.s, v),
            scale: self.scale,
        }
    }

    pub fn to_raw(&self) -> InstanceRaw {
        let model = self.to_matrix();
        let upper = cgmath::Matrix3::from_cols(
            model.x.truncate(),
            model.y.truncate(),
            model.z.truncate(),
        );
        // Inverse transpose keeps normals perpendicular under non-uniform scale.
        let normal = upper
            .invert()
            .map(|m| m.transpose())
            .unwrap_or_else(|| cgmath::Matrix3::from(self.rotation.normalize()));
        InstanceRaw {
            model: model.into(),
            normal: normal.into(),
        }
    }
}

impl Mul<Instance> for Instance {
    type Output = Self;

    fn mul(self, rhs: Instance) -> Self::Output {
        &self * &rhs
    }
}

impl<'a, 'b> Mul<&'b Instance> for &'a Instance {
    type Output = Instance;

    fn mul(self, rhs: &'b Instance) -> Self::Output {
        let new_rotation = self.rotation * rhs.rotation;

        let new_scale = Vector3::new(
            self.scale.x * rhs.scale.x,
            self.scale.y * rhs.scale.y,
            self.scale.z * rhs.scale.z,
        );
        let new_position = self.transform_point(rhs.position);

        Instance {
            position: new_position,
            rotation: new_rotation,
            scale: new_scale,
        }
    }
}

impl From<Vector3<f32>> for Instance {
    fn from(position: Vector3<f32>) -> Self {
        Instance {
            position,
            ..Default::default()
        }
    }
}

impl From<crate::params::Placement> for Instance {
    fn from(placement: crate::params::Placement) -> Self {
        Instance {
            position: placement.position.into(),
            rotation: placement.quaternion(),
            ..Default::default()
        }
    }
}

impl Default for Instance {
    fn default() -> Self {
        Self::new()
    }
}

/// World transform as uploaded to the instance buffer: the model matrix and the
/// matrix used to transform normals.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    model: [[f32; 4]; 4],
    normal: [[f32; 3]; 3],
}

impl InstanceRaw {
    // Locations 0 and 1 belong to the vertex buffer.
    const ATTRS: [wgpu::VertexAttribute; 7] = wgpu::vertex_attr_array![
        5 => Float32x4,
        6 => Float32x4,
        7 => Float32x4,
        8 => Float32x4,
        9 => Float32x3,
        10 => Float32x3,
        11 => Float32x3,
    ];
}

impl model::Vertex for InstanceRaw {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{MetricSpace, Rad, Rotation3};

    #[test]
    fn composition_applies_parent_after_child() {
        let parent = Instance::from(Vector3::new(1.0, 0.0, 0.0))
            .with_rotation(Quaternion::from_angle_y(Rad(std::f32::consts::FRAC_PI_2)));
        let child = Instance::from(Vector3::new(0.0, 0.0, 1.0));
        let world = &parent * &child;
        assert!(world.position.distance(Vector3::new(2.0, 0.0, 0.0)) < 1e-6);
    }

    #[test]
    fn mirrored_instance_reflects_transformed_points() {
        let instance = Instance::from(Vector3::new(0.3, 0.5, 1.6)).with_rotation(
            Quaternion::from_angle_x(Rad(-0.4))
                * Quaternion::from_angle_y(Rad(0.7))
                * Quaternion::from_angle_z(Rad(1.1)),
        );
        let mirrored = instance.mirrored(Axis::Z);
        let p = Vector3::new(0.2, -0.7, 0.9);
        let q = Vector3::new(p.x, p.y, -p.z);
        let expected = instance.transform_point(p);
        let got = mirrored.transform_point(q);
        assert!(got.distance(Vector3::new(expected.x, expected.y, -expected.z)) < 1e-5);
    }
}
