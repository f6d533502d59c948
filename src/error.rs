//! Error types for quadtree accessors and construction.

use thiserror::Error;

/// Errors raised by [`Quadtree`](crate::Quadtree) accessors and `build`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum QuadtreeError {
    /// Item index past the end of the item list
    #[error("item index {index} out of range for {len} items")]
    ItemIndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of items stored
        len: usize,
    },

    /// Node index past the end of the node arena
    #[error("node index {index} out of range for {len} nodes")]
    NodeIndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of nodes stored
        len: usize,
    },

    /// Quadrant outside 0..4
    #[error("quadrant {0} out of range 0..4")]
    QuadrantOutOfRange(usize),

    /// Child lookup on a leaf node
    #[error("node {0} is a leaf and has no children")]
    LeafHasNoChildren(usize),

    /// `build` called with a zero maximum depth
    #[error("maximum depth must be at least 1, got {0}")]
    InvalidMaxDepth(usize),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, QuadtreeError>;
