//! Wing sections: a NACA 4-digit style thickness distribution over a parabolic camber
//! line, extruded straight along the span.

use crate::geometry::{self, GeometryError, MeshData};

#[derive(Clone, Debug, PartialEq)]
pub struct AirfoilParams {
    pub chord: f32,
    /// Thickness coefficient τ of the half-thickness polynomial.
    pub thickness: f32,
    /// Camber coefficient; zero gives a symmetric section.
    pub camber: f32,
    /// Chordwise samples per surface are `points + 1`.
    pub points: u32,
    pub span: f32,
}

impl Default for AirfoilParams {
    fn default() -> Self {
        Self {
            chord: 0.65,
            thickness: 0.12,
            camber: 0.0,
            points: 30,
            span: 3.6,
        }
    }
}

impl AirfoilParams {
    pub fn validate(&self) -> Result<(), GeometryError> {
        geometry::positive("airfoil chord", self.chord)?;
        geometry::positive("airfoil thickness", self.thickness)?;
        geometry::positive("airfoil span", self.span)?;
        geometry::finite("airfoil camber", self.camber)?;
        geometry::segments("airfoil", self.points, 2)?;
        Ok(())
    }

    /// Half thickness at chordwise fraction `t`.
    pub fn half_thickness(&self, t: f32) -> f32 {
        self.thickness
            * (0.2969 * t.sqrt() - 0.1260 * t - 0.3516 * t * t + 0.2843 * t * t * t
                - 0.1036 * t * t * t * t)
    }

    pub fn camber_line(&self, t: f32) -> f32 {
        self.camber * (2.0 * t - t * t)
    }
}

/// The closed 2D section: upper surface leading to trailing edge, then the lower
/// surface back to the leading edge. Always `2 * (points + 1)` vertices.
pub fn outline(params: &AirfoilParams) -> Result<Vec<[f32; 2]>, GeometryError> {
    params.validate()?;
    let n = params.points;
    let sample = |j: u32, sign: f32| {
        let t = j as f32 / n as f32;
        [
            t * params.chord,
            params.camber_line(t) + sign * params.half_thickness(t),
        ]
    };
    let upper = (0..=n).map(|j| sample(j, 1.0));
    let lower = (0..=n).rev().map(|j| sample(j, -1.0));
    Ok(upper.chain(lower).collect())
}

/// Extrudes the section from `z = 0` to `z = span`, with flat caps on both ends.
pub fn extrude(params: &AirfoilParams) -> Result<MeshData, GeometryError> {
    let section = outline(params)?;
    let count = section.len() as u32;
    let mut positions = Vec::with_capacity(section.len() * 4);
    let mut indices = Vec::new();

    // Side walls: layer 0 at the root, layer 1 at the tip.
    for z in [0.0, params.span] {
        positions.extend(section.iter().map(|&[x, y]| [x, y, z]));
    }
    for k in 0..count {
        let next = (k + 1) % count;
        let (p0, q0, p1, q1) = (k, next, k + count, next + count);
        indices.extend_from_slice(&[p0, q1, q0, p0, p1, q1]);
    }

    // Caps get their own vertices so their normals stay flat.
    let n = params.points;
    let lower = |k: u32| count - 1 - k;
    for (layer, z) in [(2, 0.0), (3, params.span)] {
        let base = layer * count;
        positions.extend(section.iter().map(|&[x, y]| [x, y, z]));
        for k in 0..n {
            let (u0, u1) = (base + k, base + k + 1);
            let (l0, l1) = (base + lower(k), base + lower(k + 1));
            if z > 0.0 {
                indices.extend_from_slice(&[l0, l1, u1, l0, u1, u0]);
            } else {
                indices.extend_from_slice(&[l0, u1, l1, l0, u0, u1]);
            }
        }
    }

    let mesh = MeshData::from_triangles(positions, indices);
    mesh.validate()?;
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outline_has_two_surfaces_of_samples() {
        let params = AirfoilParams {
            points: 30,
            ..Default::default()
        };
        assert_eq!(outline(&params).unwrap().len(), 62);
        let params = AirfoilParams {
            points: 40,
            camber: 0.06,
            ..Default::default()
        };
        assert_eq!(outline(&params).unwrap().len(), 82);
    }

    #[test]
    fn symmetric_outline_is_closed() {
        let section = outline(&AirfoilParams::default()).unwrap();
        let (first, last) = (section[0], section[section.len() - 1]);
        assert!((first[0] - last[0]).abs() < 1e-6);
        assert!((first[1] - last[1]).abs() < 1e-6);
    }

    #[test]
    fn camber_shifts_both_surfaces_up() {
        let flat = AirfoilParams::default();
        let cambered = AirfoilParams {
            camber: 0.12,
            ..Default::default()
        };
        let a = outline(&flat).unwrap();
        let b = outline(&cambered).unwrap();
        let mid = flat.points as usize / 2;
        assert!(b[mid][1] > a[mid][1]);
        let lower_mid = a.len() - 1 - mid;
        assert!(b[lower_mid][1] > a[lower_mid][1]);
    }

    #[test]
    fn extrusion_spans_the_requested_depth() {
        let params = AirfoilParams::default();
        let mesh = extrude(&params).unwrap();
        let (lo, hi) = mesh.bounds().unwrap();
        assert_eq!(lo[2], 0.0);
        assert_eq!(hi[2], params.span);
        assert!((hi[0] - params.chord).abs() < 1e-6);
        assert_eq!(mesh.vertex_count(), 4 * 2 * (params.points as usize + 1));
    }

    #[test]
    fn zero_span_is_rejected() {
        let params = AirfoilParams {
            span: 0.0,
            ..Default::default()
        };
        assert_eq!(
            extrude(&params).unwrap_err(),
            GeometryError::NonPositive {
                name: "airfoil span",
                value: 0.0
            }
        );
    }
}
