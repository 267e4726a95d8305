//! The monocoque skin, lofted as a sequence of elliptical rings along a spine curve.

use std::f32::consts::{PI, TAU};

use crate::geometry::{self, GeometryError, MeshData, curve::CatmullRom, grid_indices};

#[derive(Clone, Debug, PartialEq)]
pub struct ChassisParams {
    /// Spine of the chassis, nose first.
    pub control_points: Vec<[f32; 3]>,
    /// Number of steps along the spine; the loft has `segments + 1` rings.
    pub segments: u32,
    /// Quads per ring; each ring has `sections + 1` vertices (the seam is duplicated).
    pub sections: u32,
    /// Progress at which the nose stops widening and the cockpit section begins.
    pub nose_end: f32,
    /// Progress at which the coke-bottle taper begins.
    pub cockpit_end: f32,
    pub nose_width: f32,
    pub nose_widening: f32,
    pub cockpit_width: f32,
    pub taper: f32,
    /// Ring height as a fraction of the spine's height above ground.
    pub height_scale: f32,
    pub upper_scale: f32,
    pub lower_scale: f32,
}

impl Default for ChassisParams {
    fn default() -> Self {
        Self {
            control_points: vec![
                [-1.2, 0.5, 0.0],
                [0.5, 1.8, 0.0],
                [2.5, 1.4, 0.0],
                [4.5, 1.0, 0.0],
                [6.0, 0.8, 0.0],
            ],
            segments: 60,
            sections: 16,
            nose_end: 0.3,
            cockpit_end: 0.5,
            nose_width: 0.25,
            nose_widening: 2.5,
            cockpit_width: 1.0,
            taper: 1.2,
            height_scale: 0.6,
            upper_scale: 0.8,
            lower_scale: 0.5,
        }
    }
}

impl ChassisParams {
    /// Full ring width at spine progress `t ∈ [0, 1]`.
    pub fn width_at(&self, t: f32) -> f32 {
        if t < self.nose_end {
            self.nose_width + t * self.nose_widening
        } else if t < self.cockpit_end {
            self.cockpit_width
        } else {
            self.cockpit_width - (t - self.cockpit_end) * self.taper
        }
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        geometry::segments("chassis", self.segments, 1)?;
        geometry::segments("chassis cross-section", self.sections, 3)?;
        geometry::positive("chassis height scale", self.height_scale)?;
        geometry::positive("chassis upper scale", self.upper_scale)?;
        geometry::positive("chassis lower scale", self.lower_scale)?;
        for t in [0.0, self.nose_end, self.cockpit_end, 1.0] {
            geometry::positive("chassis width", self.width_at(t))?;
        }
        Ok(())
    }
}

/// Lofts the chassis skin. Ring `i` lies in the plane orthogonal to the car's
/// longitudinal axis at spine sample `i / segments`.
pub fn loft(params: &ChassisParams) -> Result<MeshData, GeometryError> {
    params.validate()?;
    let spine = CatmullRom::new(&params.control_points)?;
    let rings = params.segments + 1;
    let ring_size = params.sections + 1;

    let mut positions = Vec::with_capacity((rings * ring_size) as usize);
    for i in 0..rings {
        let t = i as f32 / params.segments as f32;
        let center = spine.point(t);
        let width = params.width_at(t);
        let height = center.y * params.height_scale;
        for j in 0..ring_size {
            let angle = j as f32 / params.sections as f32 * TAU;
            let vertical = if angle < PI {
                params.upper_scale
            } else {
                params.lower_scale
            };
            positions.push([
                center.x,
                center.y + angle.sin() * height * vertical,
                center.z + angle.cos() * width * 0.5,
            ]);
        }
    }

    let mesh = MeshData::from_triangles(positions, grid_indices(rings, ring_size));
    mesh.validate()?;
    Ok(mesh)
}
