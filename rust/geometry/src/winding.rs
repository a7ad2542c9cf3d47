// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared 2D orientation predicates
//!
//! All tests run in the projected plane basis; counter-clockwise is
//! positive throughout.

use nalgebra::Point2;

/// Twice the signed area of triangle (a, b, c).
/// Positive when the triangle winds counter-clockwise.
#[inline]
pub fn orient(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Compute the signed area of a closed 2D contour
/// Positive = counter-clockwise, Negative = clockwise
pub fn signed_area(contour: &[Point2<f64>]) -> f64 {
    if contour.len() < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    let n = contour.len();

    for i in 0..n {
        let j = (i + 1) % n;
        area += contour[i].x * contour[j].y;
        area -= contour[j].x * contour[i].y;
    }

    area * 0.5
}

/// Signed area of an index walk over a shared point slice
pub fn signed_area_indexed(walk: &[u32], points: &[Point2<f64>]) -> f64 {
    if walk.len() < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    let n = walk.len();

    for i in 0..n {
        let p = &points[walk[i] as usize];
        let q = &points[walk[(i + 1) % n] as usize];
        area += p.x * q.y;
        area -= q.x * p.y;
    }

    area * 0.5
}

/// Inclusive containment test for a counter-clockwise triangle.
/// Points on the boundary count as contained.
#[inline]
pub fn point_in_triangle(
    a: &Point2<f64>,
    b: &Point2<f64>,
    c: &Point2<f64>,
    p: &Point2<f64>,
    epsilon: f64,
) -> bool {
    orient(a, b, p) >= -epsilon && orient(b, c, p) >= -epsilon && orient(c, a, p) >= -epsilon
}

/// Check if a point is inside a contour using ray casting
pub fn point_in_contour(point: &Point2<f64>, contour: &[Point2<f64>]) -> bool {
    if contour.len() < 3 {
        return false;
    }

    let mut inside = false;
    let n = contour.len();

    let mut j = n - 1;
    for i in 0..n {
        let pi = &contour[i];
        let pj = &contour[j];

        if ((pi.y > point.y) != (pj.y > point.y))
            && (point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x)
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Cosine of the interior angle at `b` in the corner (a, b, c).
/// Larger cosine means a sharper corner.
#[inline]
pub fn interior_cos(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> f64 {
    let u = a - b;
    let v = c - b;
    let len = u.norm() * v.norm();
    if len <= f64::EPSILON {
        return -1.0;
    }
    u.dot(&v) / len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_area_ccw() {
        // Counter-clockwise square
        let contour = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        let area = signed_area(&contour);
        assert!((area - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_signed_area_cw() {
        // Clockwise square
        let contour = vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 0.0),
        ];
        let area = signed_area(&contour);
        assert!((area + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_signed_area_indexed_matches_direct() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 3.0),
            Point2::new(0.0, 3.0),
        ];
        let walk = vec![0u32, 1, 2, 3];
        assert!((signed_area_indexed(&walk, &points) - signed_area(&points)).abs() < 1e-12);
    }

    #[test]
    fn test_orient_sign() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        let c = Point2::new(0.0, 1.0);
        assert!(orient(&a, &b, &c) > 0.0);
        assert!(orient(&a, &c, &b) < 0.0);
    }

    #[test]
    fn test_point_in_triangle_interior_and_boundary() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(4.0, 0.0);
        let c = Point2::new(0.0, 4.0);

        assert!(point_in_triangle(&a, &b, &c, &Point2::new(1.0, 1.0), 1e-9));
        // On an edge counts as contained
        assert!(point_in_triangle(&a, &b, &c, &Point2::new(2.0, 0.0), 1e-9));
        assert!(!point_in_triangle(&a, &b, &c, &Point2::new(3.0, 3.0), 1e-9));
    }

    #[test]
    fn test_point_in_contour() {
        let contour = vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ];

        assert!(point_in_contour(&Point2::new(5.0, 5.0), &contour));
        assert!(!point_in_contour(&Point2::new(15.0, 5.0), &contour));
        assert!(!point_in_contour(&Point2::new(-1.0, 5.0), &contour));
    }

    #[test]
    fn test_interior_cos_right_angle() {
        let a = Point2::new(1.0, 0.0);
        let b = Point2::new(0.0, 0.0);
        let c = Point2::new(0.0, 1.0);
        assert!(interior_cos(&a, &b, &c).abs() < 1e-12);
    }

    #[test]
    fn test_interior_cos_sharp_corner_is_larger() {
        let b = Point2::new(0.0, 0.0);
        let wide = interior_cos(&Point2::new(1.0, 0.0), &b, &Point2::new(-1.0, 0.1));
        let sharp = interior_cos(&Point2::new(1.0, 0.0), &b, &Point2::new(1.0, 0.1));
        assert!(sharp > wide);
    }
}
