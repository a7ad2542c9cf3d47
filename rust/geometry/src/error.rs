use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while assembling render buffers
#[derive(Error, Debug)]
pub enum Error {
    #[error("triangulation is empty, nothing to assemble")]
    EmptyTriangulation,

    #[error("triangle index {index} out of bounds for {len} points")]
    IndexOutOfBounds { index: u32, len: usize },
}
