//! Circular sections swept along a Catmull-Rom path.

use std::f32::consts::TAU;

use cgmath::{InnerSpace, Matrix3, Rad, Vector3};

use crate::geometry::{self, GeometryError, MeshData, Topology, curve::CatmullRom};

#[derive(Clone, Debug, PartialEq)]
pub struct TubeParams {
    pub path: Vec<[f32; 3]>,
    pub tubular_segments: u32,
    pub radius: f32,
    pub radial_segments: u32,
}

impl TubeParams {
    pub fn new(path: &[[f32; 3]], tubular_segments: u32, radius: f32, radial_segments: u32) -> Self {
        Self {
            path: path.to_vec(),
            tubular_segments,
            radius,
            radial_segments,
        }
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        geometry::positive("tube radius", self.radius)?;
        geometry::segments("tube", self.tubular_segments, 1)?;
        geometry::segments("tube radial", self.radial_segments, 3)?;
        Ok(())
    }
}

/// Orthonormal frame at one station along the path.
#[derive(Clone, Copy, Debug)]
pub struct Frame {
    pub tangent: Vector3<f32>,
    pub normal: Vector3<f32>,
    pub binormal: Vector3<f32>,
}

/// Parallel-transported frames at `segments + 1` evenly spaced arc-length stations.
///
/// The first normal is seeded from the world axis least aligned with the tangent;
/// every following normal is the previous one rotated by the turn between
/// consecutive tangents, so the section never twists around the path.
pub fn frames(curve: &CatmullRom, segments: u32) -> Vec<Frame> {
    let tangents: Vec<Vector3<f32>> = (0..=segments)
        .map(|i| curve.tangent_at(i as f32 / segments as f32))
        .collect();

    let first = tangents[0];
    let seed = if first.x.abs() <= first.y.abs() && first.x.abs() <= first.z.abs() {
        Vector3::unit_x()
    } else if first.y.abs() <= first.z.abs() {
        Vector3::unit_y()
    } else {
        Vector3::unit_z()
    };
    let side = first.cross(seed).normalize();
    let mut normal = first.cross(side);

    let mut out = Vec::with_capacity(tangents.len());
    out.push(Frame {
        tangent: first,
        normal,
        binormal: first.cross(normal),
    });
    for pair in tangents.windows(2) {
        let (prev, tangent) = (pair[0], pair[1]);
        let axis = prev.cross(tangent);
        if axis.magnitude() > f32::EPSILON {
            let theta = prev.dot(tangent).clamp(-1.0, 1.0).acos();
            normal = Matrix3::from_axis_angle(axis.normalize(), Rad(theta)) * normal;
        }
        out.push(Frame {
            tangent,
            normal,
            binormal: tangent.cross(normal),
        });
    }
    out
}

/// Sweeps the tube. Vertices are laid out ring by ring, `radial_segments + 1` per ring
/// with the seam duplicated; normals point radially outwards.
pub fn sweep(params: &TubeParams) -> Result<MeshData, GeometryError> {
    params.validate()?;
    let curve = CatmullRom::new(&params.path)?;
    let tubular = params.tubular_segments;
    let radial = params.radial_segments;
    let stations = frames(&curve, tubular);

    let ring = (radial + 1) as usize;
    let mut positions = Vec::with_capacity(stations.len() * ring);
    let mut normals = Vec::with_capacity(stations.len() * ring);
    for (i, frame) in stations.iter().enumerate() {
        let center = curve.point_at(i as f32 / tubular as f32);
        for j in 0..=radial {
            let v = j as f32 / radial as f32 * TAU;
            let n = (frame.normal * -v.cos() + frame.binormal * v.sin()).normalize();
            positions.push((center + n * params.radius).into());
            normals.push(n.into());
        }
    }

    let stride = radial + 1;
    let mut indices = Vec::with_capacity((tubular * radial * 6) as usize);
    for j in 1..=tubular {
        for i in 1..=radial {
            let a = stride * (j - 1) + (i - 1);
            let b = stride * j + (i - 1);
            let c = stride * j + i;
            let d = stride * (j - 1) + i;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    let mesh = MeshData {
        positions,
        normals,
        indices,
        topology: Topology::Triangles,
    };
    mesh.validate()?;
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::MetricSpace;

    fn sidepod() -> TubeParams {
        TubeParams::new(
            &[[1.5, 0.9, 1.3], [3.0, 0.7, 1.2], [4.5, 0.5, 0.9], [5.5, 0.4, 0.6]],
            40,
            0.35,
            12,
        )
    }

    #[test]
    fn vertex_layout() {
        let params = sidepod();
        let mesh = sweep(&params).unwrap();
        assert_eq!(mesh.vertex_count(), 41 * 13);
        assert_eq!(mesh.triangle_count(), 40 * 12 * 2);
    }

    #[test]
    fn every_vertex_sits_on_the_radius() {
        let params = sidepod();
        let curve = CatmullRom::new(&params.path).unwrap();
        let mesh = sweep(&params).unwrap();
        for (i, ring) in mesh.positions.chunks_exact(13).enumerate() {
            let center = curve.point_at(i as f32 / 40.0);
            for p in ring {
                let p: Vector3<f32> = (*p).into();
                assert!((p.distance(center) - params.radius).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn frames_stay_orthonormal() {
        let curve = CatmullRom::new(&sidepod().path).unwrap();
        for f in frames(&curve, 40) {
            assert!(f.tangent.dot(f.normal).abs() < 1e-3);
            assert!(f.tangent.dot(f.binormal).abs() < 1e-3);
            assert!((f.normal.magnitude() - 1.0).abs() < 1e-3);
        }
    }

    #[test]
    fn zero_radius_is_rejected() {
        let mut params = sidepod();
        params.radius = 0.0;
        assert!(matches!(sweep(&params), Err(GeometryError::NonPositive { .. })));
    }
}
