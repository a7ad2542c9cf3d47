// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Stage-piece triangulation pipeline
//!
//! One call turns a flat point list into a triangle index buffer: fit
//! the supporting plane, project, partition the boundary graph into
//! regions, clip each region, concatenate. The whole transformation is
//! pure — same input, same output — and regions are independent, so
//! multi-region pieces clip in parallel and join by region index.

use nalgebra::{Point2, Point3, Vector3};
use tracing::debug;

use crate::earclip;
use crate::plane::{self, PlaneBasis};
use crate::region::{self, Region};

/// Default quantization width for vertex value equality.
pub const DEFAULT_MERGE_EPSILON: f64 = 1e-6;

/// Default threshold under which a projected area counts as zero.
pub const DEFAULT_AREA_EPSILON: f64 = 1e-9;

/// Result of triangulating one stage piece.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangulation {
    /// Flat triangle index buffer, three entries per triangle, every
    /// entry an index into the caller's point list.
    pub indices: Vec<u32>,
    /// Unit normal of the supporting plane; `(0, 1, 0)` when the input
    /// does not span one. Triangles wind counter-clockwise around it.
    pub normal: Vector3<f64>,
    /// Number of connected boundary components found in the input.
    pub region_count: usize,
}

impl Triangulation {
    /// Get triangle count
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if the triangulation produced no triangles
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate over index triples
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }
}

/// Configurable triangulator.
///
/// The free function [`triangulate`] runs with the defaults; build one
/// of these to tune tolerances for stage data with coarser coordinates.
#[derive(Debug, Clone)]
pub struct Triangulator {
    merge_epsilon: f64,
    area_epsilon: f64,
}

impl Default for Triangulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Triangulator {
    /// Create a triangulator with default tolerances
    pub fn new() -> Self {
        Self {
            merge_epsilon: DEFAULT_MERGE_EPSILON,
            area_epsilon: DEFAULT_AREA_EPSILON,
        }
    }

    /// Set the quantization width used for vertex value equality
    pub fn with_merge_epsilon(mut self, epsilon: f64) -> Self {
        self.merge_epsilon = epsilon;
        self
    }

    /// Set the threshold under which a projected area counts as zero
    pub fn with_area_epsilon(mut self, epsilon: f64) -> Self {
        self.area_epsilon = epsilon;
        self
    }

    /// Triangulate one stage piece.
    ///
    /// Fewer than three points yields an empty, valid result rather
    /// than an error; malformed boundaries degrade to a partial cover.
    pub fn triangulate(&self, points: &[Point3<f64>]) -> Triangulation {
        if points.len() < 3 {
            return Triangulation {
                indices: Vec::new(),
                normal: Vector3::y(),
                region_count: 0,
            };
        }

        let normal = plane::newell_normal(points);
        let basis = PlaneBasis::from_normal(normal, points[0]);
        let projected = basis.project_all(points);

        let canon = region::canonical_ids(points, self.merge_epsilon);
        let regions = region::group_regions(region::split_loops(&canon), &canon);

        let per_region = self.clip_regions(&regions, &projected, &canon);

        let mut indices = Vec::with_capacity(per_region.iter().map(|t| t.len() * 3).sum());
        for tris in &per_region {
            for t in tris {
                indices.extend_from_slice(t);
            }
        }

        debug!(
            points = points.len(),
            regions = regions.len(),
            triangles = indices.len() / 3,
            "triangulated stage piece"
        );

        Triangulation {
            indices,
            normal,
            region_count: regions.len(),
        }
    }

    // On native: clip regions on worker threads, joined by region index
    // so output order never depends on completion order.
    #[cfg(not(target_arch = "wasm32"))]
    fn clip_regions(
        &self,
        regions: &[Region],
        projected: &[Point2<f64>],
        canon: &[u32],
    ) -> Vec<Vec<[u32; 3]>> {
        use rayon::prelude::*;

        if regions.len() > 1 {
            regions
                .par_iter()
                .map(|r| earclip::triangulate_region(r, projected, canon, self.area_epsilon))
                .collect()
        } else {
            regions
                .iter()
                .map(|r| earclip::triangulate_region(r, projected, canon, self.area_epsilon))
                .collect()
        }
    }

    // On WASM: sequential (no threads available)
    #[cfg(target_arch = "wasm32")]
    fn clip_regions(
        &self,
        regions: &[Region],
        projected: &[Point2<f64>],
        canon: &[u32],
    ) -> Vec<Vec<[u32; 3]>> {
        regions
            .iter()
            .map(|r| earclip::triangulate_region(r, projected, canon, self.area_epsilon))
            .collect()
    }
}

/// Triangulate one stage piece with default tolerances.
pub fn triangulate(points: &[Point3<f64>]) -> Triangulation {
    Triangulator::new().triangulate(points)
}

/// Triangulate many stage pieces at once; results come back in piece
/// order regardless of which finished first.
pub fn triangulate_batch(pieces: &[Vec<Point3<f64>>]) -> Vec<Triangulation> {
    let triangulator = Triangulator::new();

    #[cfg(not(target_arch = "wasm32"))]
    let results: Vec<Triangulation> = {
        use rayon::prelude::*;
        pieces
            .par_iter()
            .map(|piece| triangulator.triangulate(piece))
            .collect()
    };

    #[cfg(target_arch = "wasm32")]
    let results: Vec<Triangulation> = pieces
        .iter()
        .map(|piece| triangulator.triangulate(piece))
        .collect();

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_few_points_is_empty_not_error() {
        let result = triangulate(&[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
        ]);
        assert!(result.is_empty());
        assert_eq!(result.region_count, 0);
        assert_eq!(result.normal, Vector3::y());
    }

    #[test]
    fn test_all_duplicate_points_is_one_empty_region() {
        let result = triangulate(&[Point3::new(2.0, 2.0, 2.0); 5]);
        assert!(result.is_empty());
        assert_eq!(result.region_count, 1);
        assert_eq!(result.normal, Vector3::y());
    }

    #[test]
    fn test_single_triangle() {
        let result = triangulate(&[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]);
        assert_eq!(result.triangle_count(), 1);
        assert_eq!(result.region_count, 1);
        assert_eq!(result.triangles().next(), Some([0, 1, 2]));
    }

    #[test]
    fn test_builder_tolerances_apply() {
        // With a coarse merge width the two nearby loops share a vertex
        // cell and fuse into one region
        let piece = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.001, 0.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
        ];

        let fine = Triangulator::new().triangulate(&piece);
        assert_eq!(fine.region_count, 2);

        let coarse = Triangulator::new()
            .with_merge_epsilon(0.01)
            .triangulate(&piece);
        assert_eq!(coarse.region_count, 1);
    }
}
