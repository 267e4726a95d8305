//! Simple closed-form shapes. Orientation conventions: cylinders run along Y, tori lie
//! in the XY plane, planes face +Z and grids lie flat in XZ.

use std::f32::consts::TAU;

use cgmath::{ElementWise, InnerSpace, Vector3};

use crate::geometry::{self, GeometryError, MeshData, Topology};

fn triangles(positions: Vec<[f32; 3]>, normals: Vec<[f32; 3]>, indices: Vec<u32>) -> MeshData {
    MeshData {
        positions,
        normals,
        indices,
        topology: Topology::Triangles,
    }
}

/// Axis-aligned box centred on the origin with flat-shaded faces.
pub fn cuboid(width: f32, height: f32, depth: f32) -> Result<MeshData, GeometryError> {
    let half = Vector3::new(
        geometry::positive("box width", width)? / 2.0,
        geometry::positive("box height", height)? / 2.0,
        geometry::positive("box depth", depth)? / 2.0,
    );
    let (x, y, z) = (Vector3::unit_x(), Vector3::unit_y(), Vector3::unit_z());
    // (normal, u, v) with u × v = normal so the corner walk below is counter-clockwise.
    let faces = [(x, y, z), (-x, z, y), (y, z, x), (-y, x, z), (z, x, y), (-z, y, x)];

    let mut positions = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (n, u, v) in faces {
        let base = positions.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let corner: Vector3<f32> = n + u * su + v * sv;
            positions.push(corner.mul_element_wise(half).into());
            normals.push(n.into());
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    Ok(triangles(positions, normals, indices))
}

/// Capped cylinder along Y, `top_radius` at `+height / 2`. Unequal radii give a frustum.
pub fn cylinder(
    top_radius: f32,
    bottom_radius: f32,
    height: f32,
    radial_segments: u32,
) -> Result<MeshData, GeometryError> {
    geometry::positive("cylinder top radius", top_radius)?;
    geometry::positive("cylinder bottom radius", bottom_radius)?;
    geometry::positive("cylinder height", height)?;
    let radial = geometry::segments("cylinder radial", radial_segments, 3)?;

    let half = height / 2.0;
    let slope = (bottom_radius - top_radius) / height;
    let ring = radial + 1;
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();

    for (radius, y) in [(top_radius, half), (bottom_radius, -half)] {
        for j in 0..ring {
            let theta = j as f32 / radial as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            positions.push([radius * sin, y, radius * cos]);
            normals.push(Vector3::new(sin, slope, cos).normalize().into());
        }
    }
    for j in 0..radial {
        let (a, b, c, d) = (j, ring + j, ring + j + 1, j + 1);
        indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    for (radius, y, up) in [(top_radius, half, 1.0), (bottom_radius, -half, -1.0)] {
        let center = positions.len() as u32;
        positions.push([0.0, y, 0.0]);
        normals.push([0.0, up, 0.0]);
        for j in 0..ring {
            let theta = j as f32 / radial as f32 * TAU;
            positions.push([radius * theta.sin(), y, radius * theta.cos()]);
            normals.push([0.0, up, 0.0]);
        }
        for j in 0..radial {
            let (p, q) = (center + 1 + j, center + 2 + j);
            if up > 0.0 {
                indices.extend_from_slice(&[center, p, q]);
            } else {
                indices.extend_from_slice(&[center, q, p]);
            }
        }
    }
    Ok(triangles(positions, normals, indices))
}

/// Ring torus around the Z axis: `radius` to the tube centre, `tube` is the tube radius.
pub fn torus(
    radius: f32,
    tube: f32,
    radial_segments: u32,
    tubular_segments: u32,
) -> Result<MeshData, GeometryError> {
    geometry::positive("torus radius", radius)?;
    geometry::positive("torus tube", tube)?;
    let radial = geometry::segments("torus radial", radial_segments, 3)?;
    let tubular = geometry::segments("torus tubular", tubular_segments, 3)?;

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    for j in 0..=radial {
        let v = j as f32 / radial as f32 * TAU;
        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * TAU;
            let p = Vector3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            let center = Vector3::new(radius * u.cos(), radius * u.sin(), 0.0);
            positions.push(p.into());
            normals.push((p - center).normalize().into());
        }
    }

    let stride = tubular + 1;
    let mut indices = Vec::with_capacity((radial * tubular * 6) as usize);
    for j in 1..=radial {
        for i in 1..=tubular {
            let a = stride * j + i - 1;
            let b = stride * (j - 1) + i - 1;
            let c = stride * (j - 1) + i;
            let d = stride * j + i;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
    Ok(triangles(positions, normals, indices))
}

/// A single quad in the XY plane facing +Z.
pub fn plane(width: f32, height: f32) -> Result<MeshData, GeometryError> {
    let w = geometry::positive("plane width", width)? / 2.0;
    let h = geometry::positive("plane height", height)? / 2.0;
    Ok(triangles(
        vec![[-w, h, 0.0], [w, h, 0.0], [-w, -h, 0.0], [w, -h, 0.0]],
        vec![[0.0, 0.0, 1.0]; 4],
        vec![0, 2, 1, 2, 3, 1],
    ))
}

/// Square reference grid of `divisions` cells per side, drawn as line segments in XZ.
pub fn grid(size: f32, divisions: u32) -> Result<MeshData, GeometryError> {
    let half = geometry::positive("grid size", size)? / 2.0;
    let divisions = geometry::segments("grid", divisions, 1)?;
    let step = size / divisions as f32;

    let mut positions = Vec::with_capacity(4 * (divisions as usize + 1));
    for i in 0..=divisions {
        let k = -half + i as f32 * step;
        positions.push([-half, 0.0, k]);
        positions.push([half, 0.0, k]);
        positions.push([k, 0.0, -half]);
        positions.push([k, 0.0, half]);
    }
    let indices = (0..positions.len() as u32).collect();
    Ok(MeshData::from_lines(positions, indices))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_outward(mesh: &MeshData) {
        // For convex shapes centred on the origin every face normal points away from it.
        for tri in mesh.indices.chunks_exact(3) {
            let p: Vec<Vector3<f32>> = tri.iter().map(|&i| mesh.positions[i as usize].into()).collect();
            let face = (p[1] - p[0]).cross(p[2] - p[0]);
            if face.magnitude2() < 1e-12 {
                continue;
            }
            let centroid = (p[0] + p[1] + p[2]) / 3.0;
            assert!(face.dot(centroid) > 0.0, "inward face {:?}", tri);
        }
    }

    #[test]
    fn box_faces_point_outwards() {
        let mesh = cuboid(1.8, 0.5, 1.2).unwrap();
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        assert_outward(&mesh);
        let (lo, hi) = mesh.bounds().unwrap();
        assert_eq!(lo, [-0.9, -0.25, -0.6]);
        assert_eq!(hi, [0.9, 0.25, 0.6]);
    }

    #[test]
    fn cylinder_faces_point_outwards() {
        let mesh = cylinder(0.6, 0.5, 1.0, 16).unwrap();
        assert_outward(&mesh);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn torus_vertices_lie_on_the_tube() {
        let mesh = torus(0.36, 0.108, 16, 32).unwrap();
        assert_eq!(mesh.vertex_count(), 17 * 33);
        for p in &mesh.positions {
            let ring = (p[0] * p[0] + p[1] * p[1]).sqrt() - 0.36;
            assert!(((ring * ring + p[2] * p[2]).sqrt() - 0.108).abs() < 1e-5);
        }
    }

    #[test]
    fn grid_is_a_line_list() {
        let mesh = grid(20.0, 40).unwrap();
        assert_eq!(mesh.topology, Topology::Lines);
        assert_eq!(mesh.indices.len(), 41 * 4);
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn degenerate_primitives_are_rejected() {
        assert!(cuboid(0.0, 1.0, 1.0).is_err());
        assert!(cylinder(0.1, 0.1, 1.0, 2).is_err());
        assert!(torus(1.0, f32::NAN, 8, 8).is_err());
        assert!(grid(20.0, 0).is_err());
    }
}
