//! Quadtree storage, construction and accessors.
//!
//! Nodes live in a flat arena and refer to each other by index. An internal
//! node owns four consecutive children starting at `first_child`, one per
//! quadrant of its region in x-major order. Items are stored once in `items`;
//! leaves hold indices into that list. An item the build predicate approves
//! for several quadrants is listed in every one of them.
//!
//! The region of a node is never stored. It is recomputed from the root
//! bound while descending, which keeps the arena at one `Vec` per node.

use crate::error::{QuadtreeError, Result};
use crate::geometry::Aabb;

/// Marks a node without children
pub(crate) const NO_CHILD: usize = usize::MAX;

/// Index of the root node in the arena
pub(crate) const ROOT: usize = 0;

/// Depth suggested when the caller has no better estimate
pub const DEFAULT_MAX_DEPTH: usize = 8;

#[derive(Clone, Debug)]
pub(crate) struct Node {
    /// First of four consecutive children, or [`NO_CHILD`] for a leaf
    pub(crate) first_child: usize,
    /// Item indices held by a leaf; always empty for internal nodes
    pub(crate) items: Vec<usize>,
}

impl Node {
    fn leaf(items: Vec<usize>) -> Self {
        Self {
            first_child: NO_CHILD,
            items,
        }
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.first_child == NO_CHILD
    }
}

/// Static quadtree over items of type `T`.
///
/// The tree never looks inside `T`. Geometry enters through the closures given
/// to [`build`](Self::build) and to each query. Building replaces all content;
/// there is no incremental insertion.
///
/// # Examples
/// ```
/// use quadtree2d::{Aabb, Point, Quadtree};
///
/// let points = vec![
///     Point::new(0.0, 0.0),
///     Point::new(1.0, 0.0),
///     Point::new(0.0, 1.0),
///     Point::new(1.0, 1.0),
/// ];
///
/// let mut tree = Quadtree::new();
/// tree.build(points, Aabb::new(0.0, 0.0, 1.0, 1.0), |p: &Point, b: &Aabb| b.contains_point(*p), 2)
///     .unwrap();
///
/// assert_eq!(tree.number_of_nodes(), 5);
///
/// let hit = tree.nearest(Point::new(0.9, 0.8), |p, q| p.distance(q));
/// assert_eq!(hit.index, Some(3));
/// ```
#[derive(Clone, Debug)]
pub struct Quadtree<T> {
    /// Items in build order; indices are stable until the next build
    pub(crate) items: Vec<T>,
    /// Node arena, root at index 0
    pub(crate) nodes: Vec<Node>,
    /// Square bound of the root node
    pub(crate) bound: Aabb,
    /// Depth limit of the last build
    max_depth: usize,
    /// Deepest level actually reached by the last build
    depth: usize,
}

impl<T> Quadtree<T> {
    /// Creates an empty tree
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty tree with room for `capacity` items
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            nodes: Vec::new(),
            bound: Aabb::default(),
            max_depth: 1,
            depth: 0,
        }
    }

    /// Builds the tree from scratch, discarding any previous content.
    ///
    /// `bound` should cover every item; it is squared off from its lower
    /// corner before use. `overlaps(item, region)` decides which quadrants an
    /// item belongs to. Boundary tie-breaking is entirely up to that closure:
    /// an item approved for several quadrants is stored in each of them.
    ///
    /// A node is split only while it holds items and its depth (root = 1) is
    /// below `max_depth`, so `max_depth == 1` yields a single leaf.
    ///
    /// # Errors
    /// Returns [`QuadtreeError::InvalidMaxDepth`] if `max_depth` is zero. The
    /// tree is left untouched in that case.
    pub fn build<I, F>(&mut self, items: I, bound: Aabb, mut overlaps: F, max_depth: usize) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        F: FnMut(&T, &Aabb) -> bool,
    {
        if max_depth == 0 {
            return Err(QuadtreeError::InvalidMaxDepth(max_depth));
        }

        self.items.clear();
        self.items.extend(items);
        self.nodes.clear();
        self.bound = bound.square_from_min();
        self.max_depth = max_depth;
        self.depth = 1;

        self.nodes.push(Node::leaf((0..self.items.len()).collect()));
        self.refine(ROOT, self.bound, 1, &mut overlaps);

        log::debug!(
            "quadtree built: {} items, {} nodes, depth {}/{}",
            self.items.len(),
            self.nodes.len(),
            self.depth,
            self.max_depth
        );
        Ok(())
    }

    /// Splits `node` and pushes its items down, then recurses into the children
    fn refine<F>(&mut self, node: usize, region: Aabb, depth: usize, overlaps: &mut F)
    where
        F: FnMut(&T, &Aabb) -> bool,
    {
        if depth >= self.max_depth || self.nodes[node].items.is_empty() {
            return;
        }

        let first_child = self.nodes.len();
        let held = std::mem::take(&mut self.nodes[node].items);
        self.nodes[node].first_child = first_child;
        self.depth = self.depth.max(depth + 1);

        let quadrants: [Aabb; 4] = std::array::from_fn(|q| region.quadrant(q));
        for quadrant in &quadrants {
            let items = self.items.as_slice();
            let approved: Vec<usize> = held
                .iter()
                .copied()
                .filter(|&i| overlaps(&items[i], quadrant))
                .collect();
            self.nodes.push(Node::leaf(approved));
        }

        for (q, quadrant) in quadrants.into_iter().enumerate() {
            self.refine(first_child + q, quadrant, depth + 1, overlaps);
        }
    }

    /// Resets to the state of a freshly created tree
    pub fn clear(&mut self) {
        log::trace!("quadtree cleared ({} items dropped)", self.items.len());
        self.items.clear();
        self.nodes.clear();
        self.bound = Aabb::default();
        self.max_depth = 1;
        self.depth = 0;
    }

    /// Number of items stored by the last build
    #[inline]
    pub fn number_of_items(&self) -> usize {
        self.items.len()
    }

    /// Alias of [`number_of_items`](Self::number_of_items)
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns whether the tree holds no items
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item at `index`
    ///
    /// # Errors
    /// [`QuadtreeError::ItemIndexOutOfRange`] if `index >= number_of_items()`.
    pub fn item(&self, index: usize) -> Result<&T> {
        self.items.get(index).ok_or(QuadtreeError::ItemIndexOutOfRange {
            index,
            len: self.items.len(),
        })
    }

    /// All items, in build order
    #[inline]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of nodes in the arena; always `0` or `1 + 4k`
    #[inline]
    pub fn number_of_nodes(&self) -> usize {
        self.nodes.len()
    }

    fn node(&self, index: usize) -> Result<&Node> {
        self.nodes.get(index).ok_or(QuadtreeError::NodeIndexOutOfRange {
            index,
            len: self.nodes.len(),
        })
    }

    /// Item indices held by `node`; empty for internal nodes
    ///
    /// # Errors
    /// [`QuadtreeError::NodeIndexOutOfRange`] for an unknown node.
    pub fn node_items(&self, node: usize) -> Result<&[usize]> {
        Ok(&self.node(node)?.items)
    }

    /// Whether `node` is a leaf
    ///
    /// # Errors
    /// [`QuadtreeError::NodeIndexOutOfRange`] for an unknown node.
    pub fn is_leaf(&self, node: usize) -> Result<bool> {
        Ok(self.node(node)?.is_leaf())
    }

    /// Arena index of the child covering `quadrant` of `node`.
    ///
    /// # Errors
    /// - [`QuadtreeError::NodeIndexOutOfRange`] for an unknown node
    /// - [`QuadtreeError::QuadrantOutOfRange`] if `quadrant >= 4`
    /// - [`QuadtreeError::LeafHasNoChildren`] if `node` is a leaf
    pub fn child_index(&self, node: usize, quadrant: usize) -> Result<usize> {
        let n = self.node(node)?;
        if quadrant >= 4 {
            return Err(QuadtreeError::QuadrantOutOfRange(quadrant));
        }
        if n.is_leaf() {
            return Err(QuadtreeError::LeafHasNoChildren(node));
        }
        Ok(n.first_child + quadrant)
    }

    /// Square bound of the root node
    #[inline]
    pub fn bounding_box(&self) -> Aabb {
        self.bound
    }

    /// Depth limit given to the last build (1 for an empty tree)
    #[inline]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Deepest level reached by the last build; the root is level 1 and an
    /// unbuilt tree reports 0
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl<T> Default for Quadtree<T> {
    fn default() -> Self {
        Self::new()
    }
}
