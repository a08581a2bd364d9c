//! The one fallible precondition a draw call can violate (§7).

use thiserror::Error;

/// Errors a [`crate::Pipeline`] draw call can return.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum DrawError {
    /// The vertex (or index) buffer's length was not a multiple of three, so it cannot be
    /// partitioned into whole triangles.
    #[error("vertex count {0} is not a multiple of 3")]
    VertexCountNotMultipleOfThree(usize),
}
