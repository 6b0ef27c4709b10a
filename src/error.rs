use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuadTreeError {
    /// Storage for a record or a split could not be reserved.
    #[error("Failed to allocate storage in the quadtree")]
    AllocationFailed,

    /// No bucket or record matched the request.
    #[error("No matching point found")]
    NotFound,

    /// The tree has been destroyed and holds no root node.
    #[error("Quadtree has no root node")]
    EmptyTree,

    #[error("Invalid extent: {0}")]
    InvalidExtent(String),

    #[error("Invalid limits: {0}")]
    InvalidLimits(String),
}

pub type Result<T> = std::result::Result<T, QuadTreeError>;
