//! The underbody: a thin slab following the floor outline, pushed down into two
//! Venturi tunnels, kicked up into the diffuser and curled down along its edges.
//!
//! Coordinates are local to the floor: `x` runs from nose to tail, `y` is lateral and
//! `z` is the slab thickness axis. The assembler rotates the node by −π/2 about X so
//! local `z` ends up as world height.

use std::f32::consts::FRAC_PI_2;

use crate::geometry::{self, GeometryError, MeshData, grid_indices};

#[derive(Clone, Debug, PartialEq)]
pub struct FloorParams {
    pub length: f32,
    pub width: f32,
    pub thickness: f32,
    /// Fractions of `length` delimiting the tunnel throat.
    pub throat_start: f32,
    pub throat_peak: f32,
    pub throat_end: f32,
    /// Maximum depth of the throat at the tunnel centre line.
    pub throat_depth: f32,
    /// Lateral band (absolute distance from the centre line) the tunnels occupy.
    pub tunnel_inner: f32,
    pub tunnel_outer: f32,
    pub tunnel_center: f32,
    /// Lateral distance over which tunnel depth fades from full to zero.
    pub tunnel_falloff: f32,
    /// Height gained by the diffuser at the trailing edge.
    pub diffuser_rise: f32,
    /// Fractions of `width` where the edge curl starts and over which it reaches full depth.
    pub edge_curl_start: f32,
    pub edge_curl_band: f32,
    pub edge_curl_depth: f32,
    pub longitudinal_segments: u32,
    pub lateral_segments: u32,
    /// Samples per rounded corner of the outline.
    pub curve_segments: u32,
}

impl Default for FloorParams {
    fn default() -> Self {
        Self {
            length: 7.0,
            width: 3.2,
            thickness: 0.03,
            throat_start: 0.15,
            throat_peak: 0.4,
            throat_end: 0.7,
            throat_depth: 0.35,
            tunnel_inner: 0.3,
            tunnel_outer: 1.3,
            tunnel_center: 0.6,
            tunnel_falloff: 0.7,
            diffuser_rise: 0.6,
            edge_curl_start: 0.42,
            edge_curl_band: 0.08,
            edge_curl_depth: 0.08,
            longitudinal_segments: 96,
            lateral_segments: 32,
            curve_segments: 12,
        }
    }
}

impl FloorParams {
    pub fn validate(&self) -> Result<(), GeometryError> {
        geometry::positive("floor length", self.length)?;
        geometry::positive("floor width", self.width)?;
        geometry::positive("floor thickness", self.thickness)?;
        geometry::positive("tunnel falloff", self.tunnel_falloff)?;
        geometry::positive("edge curl band", self.edge_curl_band)?;
        geometry::finite("throat depth", self.throat_depth)?;
        geometry::finite("diffuser rise", self.diffuser_rise)?;
        geometry::finite("edge curl depth", self.edge_curl_depth)?;
        // Each section of the throat must have a non-zero length, and the diffuser too.
        geometry::positive("throat entry length", self.throat_peak - self.throat_start)?;
        geometry::positive("throat exit length", self.throat_end - self.throat_peak)?;
        geometry::positive("diffuser length", 1.0 - self.throat_end)?;
        geometry::segments("floor longitudinal", self.longitudinal_segments, 1)?;
        geometry::segments("floor lateral", self.lateral_segments, 1)?;
        geometry::segments("floor corner", self.curve_segments, 1)?;
        Ok(())
    }

    /// Throat depth (≤ 0) at longitudinal position `x` and lateral distance `lateral`.
    ///
    /// Zero outside the open interval `(throat_start, throat_end)`, so the profile is
    /// continuous at both ends.
    pub fn throat_depth(&self, x: f32, lateral: f32) -> f32 {
        let start = self.length * self.throat_start;
        let peak = self.length * self.throat_peak;
        let end = self.length * self.throat_end;
        if x <= start || x >= end {
            return 0.0;
        }
        let lateral = lateral.abs();
        if lateral <= self.tunnel_inner || lateral >= self.tunnel_outer {
            return 0.0;
        }
        let depth = if x < peak {
            let progress = (x - start) / (peak - start);
            -self.throat_depth * (progress * FRAC_PI_2).sin()
        } else {
            let progress = (x - peak) / (end - peak);
            -self.throat_depth * (progress * FRAC_PI_2).cos()
        };
        let falloff = 1.0 - (lateral - self.tunnel_center).abs() / self.tunnel_falloff;
        depth * falloff.clamp(0.0, 1.0)
    }

    /// Quadratic diffuser expansion behind the throat; zero at and before `throat_end`.
    pub fn diffuser_offset(&self, x: f32) -> f32 {
        let end = self.length * self.throat_end;
        if x <= end {
            return 0.0;
        }
        let progress = (x - end) / (self.length - end);
        self.diffuser_rise * progress * progress
    }

    /// Downward curl along the lateral edges, clamped once the band is crossed.
    pub fn edge_curl(&self, lateral: f32) -> f32 {
        let start = self.width * self.edge_curl_start;
        let lateral = lateral.abs();
        if lateral <= start {
            return 0.0;
        }
        let factor = (lateral - start) / (self.width * self.edge_curl_band);
        -self.edge_curl_depth * factor.min(1.0)
    }

    /// Total offset along the thickness axis for an undisplaced vertex at `(x, y)`.
    pub fn displacement(&self, x: f32, y: f32) -> f32 {
        self.throat_depth(x, y) + self.diffuser_offset(x) + self.edge_curl(y)
    }
}

/// Half of the floor outline (`y ≥ 0`), sampled as a polyline sorted by `x`.
#[derive(Clone, Debug)]
pub struct FloorOutline {
    samples: Vec<[f32; 2]>,
}

fn cubic_bezier(p0: [f32; 2], p1: [f32; 2], p2: [f32; 2], p3: [f32; 2], t: f32) -> [f32; 2] {
    let s = 1.0 - t;
    let b0 = s * s * s;
    let b1 = 3.0 * s * s * t;
    let b2 = 3.0 * s * t * t;
    let b3 = t * t * t;
    [
        b0 * p0[0] + b1 * p1[0] + b2 * p2[0] + b3 * p3[0],
        b0 * p0[1] + b1 * p1[1] + b2 * p2[1] + b3 * p3[1],
    ]
}

impl FloorOutline {
    pub fn new(params: &FloorParams) -> Self {
        let l = params.length;
        let w = params.width;
        let n = params.curve_segments.max(1);
        let mut samples = Vec::with_capacity(2 * n as usize + 2);

        // Rounded nose corner, from the flat leading edge out to full width.
        let nose = [
            [-0.2 * l, 0.42 * w],
            [-0.2 * l, 0.45 * w],
            [-0.18 * l, 0.48 * w],
            [-0.15 * l, 0.5 * w],
        ];
        // Rounded tail corner, narrowing towards the trailing edge.
        let tail = [
            [0.85 * l, 0.5 * w],
            [0.9 * l, 0.5 * w],
            [0.95 * l, 0.45 * w],
            [l, 0.4 * w],
        ];
        for corner in [nose, tail] {
            for i in 0..=n {
                let t = i as f32 / n as f32;
                samples.push(cubic_bezier(corner[0], corner[1], corner[2], corner[3], t));
            }
        }
        Self { samples }
    }

    pub fn min_x(&self) -> f32 {
        self.samples[0][0]
    }

    pub fn max_x(&self) -> f32 {
        self.samples[self.samples.len() - 1][0]
    }

    /// Lateral half-width of the floor at longitudinal position `x`.
    pub fn half_width(&self, x: f32) -> f32 {
        let x = x.clamp(self.min_x(), self.max_x());
        let idx = self
            .samples
            .partition_point(|s| s[0] < x)
            .clamp(1, self.samples.len() - 1);
        let [x0, y0] = self.samples[idx - 1];
        let [x1, y1] = self.samples[idx];
        if x1 - x0 <= f32::EPSILON {
            return y1;
        }
        y0 + (y1 - y0) * (x - x0) / (x1 - x0)
    }
}

/// The undeformed floor slab: top and bottom skins plus the perimeter wall.
pub fn flat_floor(params: &FloorParams) -> Result<MeshData, GeometryError> {
    params.validate()?;
    let outline = FloorOutline::new(params);
    let nx = params.longitudinal_segments;
    let ny = params.lateral_segments;
    let rows = nx + 1;
    let cols = ny + 1;
    let (x_min, x_max) = (outline.min_x(), outline.max_x());

    let mut positions = Vec::with_capacity((rows * cols * 2) as usize);
    for z in [params.thickness, 0.0] {
        for i in 0..rows {
            let x = x_min + (x_max - x_min) * i as f32 / nx as f32;
            let half = outline.half_width(x);
            for j in 0..cols {
                let v = -1.0 + 2.0 * j as f32 / ny as f32;
                positions.push([x, v * half, z]);
            }
        }
    }

    let skin = rows * cols;
    let mut indices = grid_indices(rows, cols);
    let bottom = grid_indices(rows, cols);
    indices.extend(
        bottom
            .chunks_exact(3)
            .flat_map(|t| [t[0] + skin, t[2] + skin, t[1] + skin]),
    );

    // Walk the boundary counter-clockwise (seen from +z) and stitch top to bottom.
    let mut ring = Vec::with_capacity((2 * (nx + ny)) as usize);
    ring.extend((0..nx).map(|i| i * cols));
    ring.extend((0..ny).map(|j| nx * cols + j));
    ring.extend((1..=nx).rev().map(|i| i * cols + ny));
    ring.extend((1..=ny).rev().map(|j| j));
    for (k, &p) in ring.iter().enumerate() {
        let q = ring[(k + 1) % ring.len()];
        let (tp, tq, bp, bq) = (p, q, p + skin, q + skin);
        indices.extend_from_slice(&[bp, bq, tq, bp, tq, tp]);
    }

    let mesh = MeshData::from_triangles(positions, indices);
    mesh.validate()?;
    Ok(mesh)
}

/// The floor with throat, diffuser and edge curl applied.
///
/// Every offset is computed from the vertex's undisplaced `(x, y)` and the three are
/// summed, so a vertex in both the diffuser and the edge band receives both.
pub fn venturi_floor(params: &FloorParams) -> Result<MeshData, GeometryError> {
    let mut mesh = flat_floor(params)?;
    for p in mesh.positions.iter_mut() {
        p[2] += params.displacement(p[0], p[1]);
    }
    mesh.compute_normals();
    mesh.validate()?;
    Ok(mesh)
}
