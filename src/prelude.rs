//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types from the crate.
//! Users can import everything they need with:
//!
//! ```
//! use quadtree2d::prelude::*;
//! ```

pub use crate::{Aabb, Closest, Point, Quadtree, QuadtreeError, Ray};
