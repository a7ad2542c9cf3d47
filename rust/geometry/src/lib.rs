//! Trackmesh Geometry
//!
//! Turns flat stage-piece outlines into render-ready triangle data: a
//! best-fit plane normal, the piece's connected boundary regions, and a
//! triangle index buffer that tiles exactly the authored area. Holes
//! and disjoint parts arrive encoded in a single vertex stream, where
//! repeated vertex values act as zero-width bridges between boundary
//! loops.

pub mod error;
pub mod mesh;
pub mod plane;
pub mod triangulate;
pub mod winding;

mod earclip;
mod region;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

pub use error::{Error, Result};
pub use mesh::Mesh;
pub use triangulate::{triangulate, triangulate_batch, Triangulation, Triangulator};
