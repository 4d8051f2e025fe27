//! Construction-time error types.

use thiserror::Error;

/// Errors surfaced while building a subgoal graph.
///
/// These are configuration errors: they are fatal, reported immediately,
/// and never retried. Contract violations at runtime (connecting to a
/// non-subgoal vertex, restoring without a matching insertion) are
/// programming errors and panic instead.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphError {
    #[error("level count must be at least 1, got {0}")]
    LevelCount(u32),

    #[error("grid dimensions must be positive, got {0}x{1}")]
    Dimensions(i32, i32),
}

pub type Result<T> = std::result::Result<T, GraphError>;
