// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Best-fit plane estimation and planar projection
//!
//! Stage pieces arrive as 3D point lists whose coordinates carry
//! rounding noise, so the supporting plane is recovered with Newell's
//! accumulation rather than a single cross product.

use nalgebra::{Point2, Point3, Vector3};

/// Accumulator magnitudes below this are treated as plane-less input.
const DEGENERATE_NORMAL: f64 = 1e-12;

/// Best-fit unit normal of a point list via Newell accumulation over
/// consecutive vertex pairs, wraparound edge included. Input that does
/// not span a plane (collinear or duplicate points) yields the `+Y`
/// fallback so downstream projection always has a frame to work with.
pub fn newell_normal(points: &[Point3<f64>]) -> Vector3<f64> {
    let n = points.len();
    if n < 3 {
        return Vector3::y();
    }

    let mut normal = Vector3::<f64>::zeros();

    for i in 0..n {
        let current = &points[i];
        let next = &points[(i + 1) % n];

        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }

    let len = normal.norm();
    if len > DEGENERATE_NORMAL {
        normal / len
    } else {
        Vector3::y()
    }
}

/// Orthonormal frame of the supporting plane.
///
/// Constructed so that `u × v = normal`: a contour that winds
/// counter-clockwise in (u, v) faces along the normal by the right-hand
/// rule.
#[derive(Debug, Clone)]
pub struct PlaneBasis {
    pub normal: Vector3<f64>,
    pub u: Vector3<f64>,
    pub v: Vector3<f64>,
    pub origin: Point3<f64>,
}

impl PlaneBasis {
    /// Build the frame from a unit normal and a reference origin.
    pub fn from_normal(normal: Vector3<f64>, origin: Point3<f64>) -> Self {
        // Pick the axis least parallel to the normal for a stable cross product
        let abs_x = normal.x.abs();
        let abs_y = normal.y.abs();
        let abs_z = normal.z.abs();

        let reference = if abs_x <= abs_y && abs_x <= abs_z {
            Vector3::new(1.0, 0.0, 0.0)
        } else if abs_y <= abs_z {
            Vector3::new(0.0, 1.0, 0.0)
        } else {
            Vector3::new(0.0, 0.0, 1.0)
        };

        let u = normal.cross(&reference).normalize();
        let v = normal.cross(&u).normalize();

        Self { normal, u, v, origin }
    }

    /// Project a 3D point into the plane frame.
    #[inline]
    pub fn project(&self, point: &Point3<f64>) -> Point2<f64> {
        let d = point - self.origin;
        Point2::new(d.dot(&self.u), d.dot(&self.v))
    }

    /// Project a point list in one pass.
    pub fn project_all(&self, points: &[Point3<f64>]) -> Vec<Point2<f64>> {
        points.iter().map(|p| self.project(p)).collect()
    }
}
