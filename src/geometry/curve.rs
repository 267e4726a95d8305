//! Smooth interpolating curves through control points.
//!
//! [`CatmullRom`] is an open, centripetal Catmull-Rom spline. `point(t)` is
//! parameterized by control-point span (every span covers the same `t` range) while
//! `point_at(u)` is parameterized by arc length, which is what sweeps need to avoid
//! bunching rings where control points are close together.

use cgmath::{InnerSpace, MetricSpace, Vector3};

use crate::geometry::GeometryError;

/// Number of chords used to approximate arc length.
const ARC_LENGTH_DIVISIONS: usize = 200;
const TANGENT_DELTA: f32 = 1e-4;

/// Cubic `c0 + c1 t + c2 t² + c3 t³` on one span for one coordinate.
#[derive(Clone, Copy, Debug)]
struct CubicPoly {
    c0: f32,
    c1: f32,
    c2: f32,
    c3: f32,
}

impl CubicPoly {
    fn hermite(x0: f32, x1: f32, t0: f32, t1: f32) -> Self {
        Self {
            c0: x0,
            c1: t0,
            c2: -3.0 * x0 + 3.0 * x1 - 2.0 * t0 - t1,
            c3: 2.0 * x0 - 2.0 * x1 + t0 + t1,
        }
    }

    /// Tangents for a non-uniform Catmull-Rom span from knot intervals `dt0..dt2`.
    fn nonuniform(x0: f32, x1: f32, x2: f32, x3: f32, dt0: f32, dt1: f32, dt2: f32) -> Self {
        let t1 = ((x1 - x0) / dt0 - (x2 - x0) / (dt0 + dt1) + (x2 - x1) / dt1) * dt1;
        let t2 = ((x2 - x1) / dt1 - (x3 - x1) / (dt1 + dt2) + (x3 - x2) / dt2) * dt1;
        Self::hermite(x1, x2, t1, t2)
    }

    fn eval(&self, t: f32) -> f32 {
        let t2 = t * t;
        self.c0 + self.c1 * t + self.c2 * t2 + self.c3 * t2 * t
    }
}

#[derive(Clone, Debug)]
pub struct CatmullRom {
    points: Vec<Vector3<f32>>,
    /// Cumulative chord lengths at `ARC_LENGTH_DIVISIONS + 1` evenly spaced `t`.
    arc_lengths: Vec<f32>,
}

impl CatmullRom {
    pub fn new(points: &[[f32; 3]]) -> Result<Self, GeometryError> {
        if points.len() < 2 {
            return Err(GeometryError::TooFewControlPoints(points.len()));
        }
        for p in points {
            for &c in p {
                super::finite("curve control point", c)?;
            }
        }
        let mut curve = Self {
            points: points.iter().map(|&p| p.into()).collect(),
            arc_lengths: Vec::new(),
        };
        curve.arc_lengths = curve.compute_arc_lengths();
        Ok(curve)
    }

    /// Point at span parameter `t ∈ [0, 1]`.
    pub fn point(&self, t: f32) -> Vector3<f32> {
        let l = self.points.len();
        let p = (l - 1) as f32 * t.clamp(0.0, 1.0);
        let mut int_point = p.floor() as usize;
        let mut weight = p - int_point as f32;
        if int_point >= l - 1 {
            int_point = l - 2;
            weight = 1.0;
        }

        let p1 = self.points[int_point];
        let p2 = self.points[int_point + 1];
        // Open ends are extended by reflecting the neighbouring control point.
        let p0 = if int_point > 0 {
            self.points[int_point - 1]
        } else {
            p1 * 2.0 - p2
        };
        let p3 = if int_point + 2 < l {
            self.points[int_point + 2]
        } else {
            p2 * 2.0 - p1
        };

        // Centripetal parameterization: knot spacing is the square root of chord length.
        let mut dt0 = p0.distance2(p1).powf(0.25);
        let mut dt1 = p1.distance2(p2).powf(0.25);
        let mut dt2 = p2.distance2(p3).powf(0.25);
        if dt1 < 1e-4 {
            dt1 = 1.0;
        }
        if dt0 < 1e-4 {
            dt0 = dt1;
        }
        if dt2 < 1e-4 {
            dt2 = dt1;
        }

        let axis = |k: usize| {
            CubicPoly::nonuniform(p0[k], p1[k], p2[k], p3[k], dt0, dt1, dt2).eval(weight)
        };
        Vector3::new(axis(0), axis(1), axis(2))
    }

    fn compute_arc_lengths(&self) -> Vec<f32> {
        let mut lengths = Vec::with_capacity(ARC_LENGTH_DIVISIONS + 1);
        let mut last = self.point(0.0);
        let mut sum = 0.0;
        lengths.push(0.0);
        for p in 1..=ARC_LENGTH_DIVISIONS {
            let current = self.point(p as f32 / ARC_LENGTH_DIVISIONS as f32);
            sum += current.distance(last);
            lengths.push(sum);
            last = current;
        }
        lengths
    }

    pub fn length(&self) -> f32 {
        self.arc_lengths.last().copied().unwrap_or(0.0)
    }

    /// Maps an arc-length fraction `u` to the span parameter `t`.
    pub fn u_to_t(&self, u: f32) -> f32 {
        let lengths = &self.arc_lengths;
        let total = self.length();
        if total <= 0.0 {
            return u.clamp(0.0, 1.0);
        }
        let target = u.clamp(0.0, 1.0) * total;
        // Last index whose cumulative length does not exceed the target.
        let i = lengths
            .partition_point(|&len| len <= target)
            .saturating_sub(1)
            .min(lengths.len() - 2);
        let before = lengths[i];
        let segment = lengths[i + 1] - before;
        let fraction = if segment > 0.0 {
            (target - before) / segment
        } else {
            0.0
        };
        ((i as f32 + fraction) / (lengths.len() - 1) as f32).clamp(0.0, 1.0)
    }

    /// Point at arc-length fraction `u ∈ [0, 1]`.
    pub fn point_at(&self, u: f32) -> Vector3<f32> {
        self.point(self.u_to_t(u))
    }

    /// Unit tangent at arc-length fraction `u`.
    pub fn tangent_at(&self, u: f32) -> Vector3<f32> {
        let t = self.u_to_t(u);
        let t1 = (t - TANGENT_DELTA).max(0.0);
        let t2 = (t + TANGENT_DELTA).min(1.0);
        let d = self.point(t2) - self.point(t1);
        if d.magnitude2() > 0.0 {
            d.normalize()
        } else {
            Vector3::unit_x()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vector3<f32>, b: [f32; 3]) {
        let b: Vector3<f32> = b.into();
        assert!(a.distance(b) < 1e-4, "{:?} != {:?}", a, b);
    }

    #[test]
    fn passes_through_control_points() {
        let pts = [[-1.2, 0.5, 0.0], [0.5, 1.8, 0.0], [2.5, 1.4, 0.0], [6.0, 0.8, 0.0]];
        let curve = CatmullRom::new(&pts).unwrap();
        assert_close(curve.point(0.0), pts[0]);
        assert_close(curve.point(1.0 / 3.0), pts[1]);
        assert_close(curve.point(2.0 / 3.0), pts[2]);
        assert_close(curve.point(1.0), pts[3]);
    }

    #[test]
    fn two_points_make_a_straight_line() {
        let curve = CatmullRom::new(&[[0.0, 0.0, 0.0], [4.0, 0.0, 0.0]]).unwrap();
        assert!((curve.length() - 4.0).abs() < 1e-3);
        assert_close(curve.point_at(0.25), [1.0, 0.0, 0.0]);
        assert_close(curve.tangent_at(0.5), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn rejects_a_single_point() {
        assert_eq!(
            CatmullRom::new(&[[0.0; 3]]).unwrap_err(),
            GeometryError::TooFewControlPoints(1)
        );
    }

    #[test]
    fn arc_length_mapping_is_monotonic() {
        let curve =
            CatmullRom::new(&[[1.5, 0.9, 1.3], [3.0, 0.7, 1.2], [4.5, 0.5, 0.9], [5.5, 0.4, 0.6]])
                .unwrap();
        let mut last = -1.0;
        for i in 0..=50 {
            let t = curve.u_to_t(i as f32 / 50.0);
            assert!(t >= last);
            last = t;
        }
        assert!((curve.u_to_t(1.0) - 1.0).abs() < 1e-5);
    }
}
