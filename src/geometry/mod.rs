//! Procedural mesh generation.
//!
//! Every generator in this module is a pure function from a parameter struct to a
//! [`MeshData`]: positions, smooth normals and an index list. Nothing here touches
//! the GPU, so the whole pipeline can be exercised in plain unit tests. Uploading
//! happens later in [`crate::resources`].
//!
//! - `curve` centripetal Catmull-Rom curves with arc-length sampling
//! - `floor` the Venturi floor slab and its displacement passes
//! - `chassis` the lofted monocoque skin
//! - `airfoil` NACA-like sections extruded along the span
//! - `tube` circular sections swept along a curve
//! - `primitives` boxes, cylinders, tori, planes and the reference grid

use cgmath::{InnerSpace, Vector3, Zero};
use thiserror::Error;

pub mod airfoil;
pub mod chassis;
pub mod curve;
pub mod floor;
pub mod primitives;
pub mod tube;

/// Raised when a generator is asked to build something it cannot represent.
///
/// All parameters are build-time constants, so any of these is a programming
/// error and aborts scene construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("{name} must be greater than zero, got {value}")]
    NonPositive { name: &'static str, value: f32 },
    #[error("{name} must be a finite number, got {value}")]
    NonFinite { name: &'static str, value: f32 },
    #[error("{name} needs at least {min} segments, got {got}")]
    TooFewSegments {
        name: &'static str,
        min: u32,
        got: u32,
    },
    #[error("a curve needs at least 2 control points, got {0}")]
    TooFewControlPoints(usize),
    #[error("index {index} is out of bounds for a mesh with {vertices} vertices")]
    IndexOutOfBounds { index: u32, vertices: usize },
    #[error("vertex {0} has a non-finite position")]
    NonFinitePosition(usize),
}

/// Ensures `value` is finite and strictly positive.
pub(crate) fn positive(name: &'static str, value: f32) -> Result<f32, GeometryError> {
    if !value.is_finite() {
        return Err(GeometryError::NonFinite { name, value });
    }
    if value <= 0.0 {
        return Err(GeometryError::NonPositive { name, value });
    }
    Ok(value)
}

pub(crate) fn finite(name: &'static str, value: f32) -> Result<f32, GeometryError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(GeometryError::NonFinite { name, value })
    }
}

pub(crate) fn segments(name: &'static str, got: u32, min: u32) -> Result<u32, GeometryError> {
    if got < min {
        return Err(GeometryError::TooFewSegments { name, min, got });
    }
    Ok(got)
}

/// How the index buffer of a mesh is to be interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Topology {
    Triangles,
    Lines,
}

/// A coordinate axis, used for mirroring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// CPU-side geometry: vertex positions, per-vertex normals and indices.
///
/// Invariant: every index is `< positions.len()` and `normals.len() == positions.len()`.
/// Use [`MeshData::validate`] after building a mesh by hand.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
    pub topology: Topology,
}

impl MeshData {
    /// Creates a triangle mesh and computes smooth normals for it.
    pub fn from_triangles(positions: Vec<[f32; 3]>, indices: Vec<u32>) -> Self {
        let mut mesh = Self {
            normals: vec![[0.0; 3]; positions.len()],
            positions,
            indices,
            topology: Topology::Triangles,
        };
        mesh.compute_normals();
        mesh
    }

    /// Creates a line-list mesh. Normals point up so lit shaders stay well-defined.
    pub fn from_lines(positions: Vec<[f32; 3]>, indices: Vec<u32>) -> Self {
        Self {
            normals: vec![[0.0, 1.0, 0.0]; positions.len()],
            positions,
            indices,
            topology: Topology::Lines,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        match self.topology {
            Topology::Triangles => self.indices.len() / 3,
            Topology::Lines => 0,
        }
    }

    /// Recomputes area-weighted smooth normals from the current positions.
    ///
    /// Must be called after any displacement of `positions`.
    pub fn compute_normals(&mut self) {
        if self.topology == Topology::Lines {
            return;
        }
        let mut accumulated = vec![Vector3::<f32>::zero(); self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let pa: Vector3<f32> = self.positions[a].into();
            let pb: Vector3<f32> = self.positions[b].into();
            let pc: Vector3<f32> = self.positions[c].into();
            // The cross product's length is twice the triangle area, which gives the weighting.
            let face = (pb - pa).cross(pc - pa);
            accumulated[a] += face;
            accumulated[b] += face;
            accumulated[c] += face;
        }
        self.normals = accumulated
            .into_iter()
            .map(|n| {
                if n.magnitude2() > f32::EPSILON {
                    n.normalize().into()
                } else {
                    [0.0, 1.0, 0.0]
                }
            })
            .collect();
    }

    /// Checks the index invariant and that no position is NaN or infinite.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let vertices = self.positions.len();
        if let Some(&index) = self.indices.iter().find(|&&i| i as usize >= vertices) {
            return Err(GeometryError::IndexOutOfBounds { index, vertices });
        }
        if let Some(bad) = self
            .positions
            .iter()
            .position(|p| p.iter().any(|c| !c.is_finite()))
        {
            return Err(GeometryError::NonFinitePosition(bad));
        }
        Ok(())
    }

    /// Returns an owned reflection of this mesh across the plane orthogonal to `axis`.
    ///
    /// Positions and normals have their `axis` component negated and triangle winding
    /// is reversed so faces keep pointing outwards. The source is left untouched.
    pub fn mirrored(&self, axis: Axis) -> Self {
        let i = axis.index();
        let flip = |v: &[f32; 3]| {
            let mut v = *v;
            v[i] = -v[i];
            v
        };
        let indices = match self.topology {
            Topology::Triangles => self
                .indices
                .chunks_exact(3)
                .flat_map(|tri| [tri[0], tri[2], tri[1]])
                .collect(),
            Topology::Lines => self.indices.clone(),
        };
        Self {
            positions: self.positions.iter().map(flip).collect(),
            normals: self.normals.iter().map(flip).collect(),
            indices,
            topology: self.topology,
        }
    }

    /// Appends `other`, rebasing its indices. Both meshes must share a topology.
    pub fn merge(&mut self, other: &MeshData) {
        debug_assert_eq!(self.topology, other.topology);
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Axis-aligned bounds as `(min, max)`.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = *self.positions.first()?;
        Some(self.positions.iter().fold((first, first), |(mut lo, mut hi), p| {
            for k in 0..3 {
                lo[k] = lo[k].min(p[k]);
                hi[k] = hi[k].max(p[k]);
            }
            (lo, hi)
        }))
    }
}

/// Indices connecting a grid of `rows × cols` vertex rings laid out row-major into quads.
///
/// Ring `i` vertex `j` is joined with ring `i + 1` vertices `j` and `j + 1`. Two triangles
/// per quad; rows and cols count vertices, so a ring of `n + 1` vertices spans `n` quads.
pub(crate) fn grid_indices(rows: u32, cols: u32) -> Vec<u32> {
    let mut indices = Vec::with_capacity(((rows - 1) * (cols - 1) * 6) as usize);
    for i in 0..rows - 1 {
        for j in 0..cols - 1 {
            let a = i * cols + j;
            let b = a + cols;
            let c = a + 1;
            let d = b + 1;
            indices.extend_from_slice(&[a, b, c, b, d, c]);
        }
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> MeshData {
        MeshData::from_triangles(
            vec![[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0]],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    #[test]
    fn normals_follow_winding() {
        let mesh = quad();
        for n in &mesh.normals {
            assert!((n[2] - 1.0).abs() < 1e-6, "{:?}", n);
        }
    }

    #[test]
    fn mirror_negates_one_axis_and_keeps_normals_outward() {
        let mesh = quad();
        let mirrored = mesh.mirrored(Axis::Z);
        for (p, q) in mesh.positions.iter().zip(&mirrored.positions) {
            assert_eq!([p[0], p[1], -p[2]], *q);
        }
        let mut recomputed = mirrored.clone();
        recomputed.compute_normals();
        for (n, m) in mirrored.normals.iter().zip(&recomputed.normals) {
            assert!((n[2] - m[2]).abs() < 1e-6);
        }
    }

    #[test]
    fn validate_rejects_dangling_indices() {
        let mut mesh = quad();
        mesh.indices.push(4);
        assert_eq!(
            mesh.validate(),
            Err(GeometryError::IndexOutOfBounds {
                index: 4,
                vertices: 4
            })
        );
    }

    #[test]
    fn merge_rebases_indices() {
        let mut mesh = quad();
        mesh.merge(&quad());
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(&mesh.indices[6..], &[4, 5, 6, 4, 6, 7]);
        assert!(mesh.validate().is_ok());
    }
}
