//! # quadtree2d - Static generic quadtree
//!
//! A build-once, query-many quadtree over items of any type `T`. The tree
//! never inspects items itself: every geometric question is answered by a
//! closure supplied with the build or the query.
//!
//! ## Features
//!
//! - **Generic items**: points, boxes, segments, triangles, anything
//! - **Box queries**: overlap test, visitor enumeration, deduplicated index lists
//! - **Ray queries**: hit test, visitor enumeration, closest intersection
//! - **Nearest item**: exact branch-and-bound search, single or k-nearest
//! - **Flat arena**: nodes and items live in contiguous vectors addressed by index
//!
//! ## Quick Start
//!
//! ```rust
//! use quadtree2d::prelude::*;
//!
//! // Axis-aligned boxes as items
//! let boxes = vec![
//!     Aabb::new(0.0, 0.0, 2.0, 2.0),    // Box 0
//!     Aabb::new(1.0, 1.0, 3.0, 3.0),    // Box 1: overlaps box 0
//!     Aabb::new(5.0, 5.0, 6.0, 6.0),    // Box 2: distant
//!     Aabb::new(1.5, 1.5, 2.5, 2.5),    // Box 3: inside the others
//! ];
//! let overlaps = |item: &Aabb, region: &Aabb| item.overlaps(region);
//!
//! let mut tree = Quadtree::new();
//! tree.build(boxes, Aabb::new(0.0, 0.0, 6.0, 6.0), overlaps, 4).unwrap();
//!
//! // Indices of boxes touching a region
//! let mut results = Vec::new();
//! tree.query_intersecting(&Aabb::new(1.2, 1.2, 2.8, 2.8), overlaps, &mut results);
//! assert_eq!(results, vec![0, 1, 3]);
//!
//! // Closest box to a point
//! let nearest = tree.nearest(Point::new(4.5, 4.5), |b, p| b.distance_squared_to(p).sqrt());
//! assert_eq!(nearest.index, Some(2));
//! ```
//!
//! ## How It Works
//!
//! `build` squares off the bounding region, puts every item in the root and
//! splits non-empty nodes into four quadrants until the depth limit. An item
//! goes to every quadrant the build predicate approves, so items straddling a
//! boundary are listed in several leaves. Queries descend only into regions
//! the query shape can reach; nearest-item search orders children by their
//! distance to the query point and prunes those that cannot beat the best
//! candidate so far.
//!
//! Whether an item lying exactly on a quadrant boundary lands in one or
//! several quadrants is decided by the build predicate, not by the tree.
//!
//! A built tree is never mutated by queries, so it can be shared between
//! threads for reading.

pub mod error;
pub mod geometry;
pub mod prelude;
pub mod quadtree;
pub mod queries;

pub use error::{QuadtreeError, Result};
pub use geometry::{Aabb, Point, Ray};
pub use quadtree::{DEFAULT_MAX_DEPTH, Quadtree};
pub use queries::Closest;

#[cfg(test)]
mod comparison_tests;
