//! Query implementations for [`Quadtree`].
//!
//! Overlap and ray queries walk the tree depth-first and skip every subtree
//! whose region fails the box or ray test. Nearest queries run a stack-driven
//! best-first search with branch-and-bound pruning and give exactly the
//! answer a linear scan with the same distance function would give.
//!
//! Items can be listed in several leaves, so visitor callbacks may fire more
//! than once for the same item. `query_intersecting` and `query_ray`
//! return each index once.

use std::cmp::Ordering;
use std::ops::ControlFlow;

use crate::geometry::{Aabb, Point, Ray};
use crate::quadtree::{Quadtree, ROOT};

/// Result of a closest-item query.
///
/// `distance` is `f64::INFINITY` and both `index` and `item` are `None` when
/// nothing was found.
#[derive(Debug)]
pub struct Closest<'a, T> {
    /// Distance reported by the caller's function for the winning item
    pub distance: f64,
    /// Index of the winning item
    pub index: Option<usize>,
    /// The winning item
    pub item: Option<&'a T>,
}

impl<'a, T> Closest<'a, T> {
    /// The "nothing found" result
    pub const fn none() -> Self {
        Self {
            distance: f64::INFINITY,
            index: None,
            item: None,
        }
    }

    fn found(distance: f64, index: usize, item: &'a T) -> Self {
        Self {
            distance,
            index: Some(index),
            item: Some(item),
        }
    }

    /// Returns whether an item was found
    #[inline]
    pub fn is_found(&self) -> bool {
        self.item.is_some()
    }
}

impl<T> Clone for Closest<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Closest<'_, T> {}

impl<T> Quadtree<T> {
    /// Depth-first walk over every node whose region passes `enter`.
    ///
    /// `visit` receives the item indices of each entered node and may stop
    /// the walk by returning `Break`.
    fn walk<E, V>(&self, mut enter: E, mut visit: V) -> ControlFlow<()>
    where
        E: FnMut(&Aabb) -> bool,
        V: FnMut(&[usize]) -> ControlFlow<()>,
    {
        if self.nodes.is_empty() {
            return ControlFlow::Continue(());
        }

        let mut stack = vec![(ROOT, self.bound)];
        while let Some((index, region)) = stack.pop() {
            if !enter(&region) {
                continue;
            }
            let node = &self.nodes[index];
            visit(node.items.as_slice())?;
            if !node.is_leaf() {
                // reversed so quadrant 0 is visited first
                for q in (0..4).rev() {
                    stack.push((node.first_child + q, region.quadrant(q)));
                }
            }
        }
        ControlFlow::Continue(())
    }

    /// Returns whether any item passes `test` against `bound`.
    ///
    /// Stops at the first approved item.
    ///
    /// # Examples
    /// ```
    /// use quadtree2d::{Aabb, Point, Quadtree};
    ///
    /// let inside = |p: &Point, b: &Aabb| b.contains_point(*p);
    /// let mut tree = Quadtree::new();
    /// tree.build(vec![Point::new(2.0, 2.0)], Aabb::new(0.0, 0.0, 4.0, 4.0), inside, 3).unwrap();
    ///
    /// assert!(tree.intersects(&Aabb::new(1.0, 1.0, 3.0, 3.0), inside));
    /// assert!(!tree.intersects(&Aabb::new(3.0, 3.0, 4.0, 4.0), inside));
    /// ```
    pub fn intersects<F>(&self, bound: &Aabb, mut test: F) -> bool
    where
        F: FnMut(&T, &Aabb) -> bool,
    {
        self.walk(
            |region| region.overlaps(bound),
            |held| {
                if held.iter().any(|&i| test(&self.items[i], bound)) {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            },
        )
        .is_break()
    }

    /// Calls `visitor` for every item that passes `test` against `bound`.
    ///
    /// An item stored in several leaves is visited once per leaf.
    pub fn for_each_intersecting_item<F, V>(&self, bound: &Aabb, mut test: F, mut visitor: V)
    where
        F: FnMut(&T, &Aabb) -> bool,
        V: FnMut(&T),
    {
        let _flow = self.walk(
            |region| region.overlaps(bound),
            |held| {
                for &i in held {
                    let item = &self.items[i];
                    if test(item, bound) {
                        visitor(item);
                    }
                }
                ControlFlow::Continue(())
            },
        );
    }

    /// Appends the indices of items passing `test` against `bound`.
    ///
    /// Each index appears once; the appended run is sorted ascending.
    /// Existing contents of `results` are kept.
    pub fn query_intersecting<F>(&self, bound: &Aabb, mut test: F, results: &mut Vec<usize>)
    where
        F: FnMut(&T, &Aabb) -> bool,
    {
        let start = results.len();
        let _flow = self.walk(
            |region| region.overlaps(bound),
            |held| {
                results.extend(held.iter().copied().filter(|&i| test(&self.items[i], bound)));
                ControlFlow::Continue(())
            },
        );
        sort_and_dedup_tail(results, start);
    }

    /// Returns whether any item passes `test` against `ray`.
    pub fn intersects_ray<F>(&self, ray: &Ray, mut test: F) -> bool
    where
        F: FnMut(&T, &Ray) -> bool,
    {
        self.walk(
            |region| region.intersects_ray(ray),
            |held| {
                if held.iter().any(|&i| test(&self.items[i], ray)) {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            },
        )
        .is_break()
    }

    /// Calls `visitor` for every item that passes `test` against `ray`.
    ///
    /// An item stored in several leaves is visited once per leaf.
    pub fn for_each_intersecting_item_along_ray<F, V>(&self, ray: &Ray, mut test: F, mut visitor: V)
    where
        F: FnMut(&T, &Ray) -> bool,
        V: FnMut(&T),
    {
        let _flow = self.walk(
            |region| region.intersects_ray(ray),
            |held| {
                for &i in held {
                    let item = &self.items[i];
                    if test(item, ray) {
                        visitor(item);
                    }
                }
                ControlFlow::Continue(())
            },
        );
    }

    /// Appends the indices of items passing `test` against `ray`, once each,
    /// sorted ascending.
    pub fn query_ray<F>(&self, ray: &Ray, mut test: F, results: &mut Vec<usize>)
    where
        F: FnMut(&T, &Ray) -> bool,
    {
        let start = results.len();
        let _flow = self.walk(
            |region| region.intersects_ray(ray),
            |held| {
                results.extend(held.iter().copied().filter(|&i| test(&self.items[i], ray)));
                ControlFlow::Continue(())
            },
        );
        sort_and_dedup_tail(results, start);
    }

    /// Finds the item with the smallest hit distance along `ray`.
    ///
    /// `hit(item, ray)` returns the hit distance, or any value at least as
    /// large as `f64::INFINITY` (or NaN) for a miss. Every node the ray
    /// crosses is visited; regions are not pruned by the current best
    /// distance, since an item may report a hit that lies outside the
    /// leaves it was filed under.
    ///
    /// # Examples
    /// ```
    /// use quadtree2d::{Aabb, Point, Quadtree, Ray};
    ///
    /// let boxes = vec![Aabb::new(6.0, 0.0, 7.0, 8.0), Aabb::new(2.0, 0.0, 3.0, 8.0)];
    /// let mut tree = Quadtree::new();
    /// tree.build(boxes, Aabb::new(0.0, 0.0, 8.0, 8.0), |a: &Aabb, b: &Aabb| a.overlaps(b), 4).unwrap();
    ///
    /// let ray = Ray::new(Point::new(0.0, 4.0), Point::new(1.0, 0.0));
    /// let hit = tree.closest_intersection(&ray, |a, r| a.ray_entry(r).unwrap_or(f64::INFINITY));
    /// assert_eq!(hit.index, Some(1));
    /// assert_eq!(hit.distance, 2.0);
    /// ```
    pub fn closest_intersection<F>(&self, ray: &Ray, mut hit: F) -> Closest<'_, T>
    where
        F: FnMut(&T, &Ray) -> f64,
    {
        let mut best = Closest::none();
        let _flow = self.walk(
            |region| region.intersects_ray(ray),
            |held| {
                for &i in held {
                    let item = &self.items[i];
                    let distance = hit(item, ray);
                    if distance < best.distance {
                        best = Closest::found(distance, i, item);
                    }
                }
                ControlFlow::Continue(())
            },
        );
        best
    }

    /// Finds the item closest to `point` according to `distance`.
    ///
    /// Exact: the result's distance equals the minimum over all items. With
    /// ties the winning item depends on traversal order. The pruning assumes
    /// an item is never closer to `point` than the nearest leaf region it is
    /// filed under, which holds whenever the build predicate approves every
    /// region the item's geometry touches.
    pub fn nearest<F>(&self, point: Point, mut distance: F) -> Closest<'_, T>
    where
        F: FnMut(&T, Point) -> f64,
    {
        let mut best = Closest::none();
        if self.nodes.is_empty() {
            return best;
        }

        let mut stack = vec![(ROOT, 0.0_f64, self.bound)];
        while let Some((index, min_dist_sq, region)) = stack.pop() {
            // best may have tightened since this node was pushed
            if min_dist_sq >= best.distance * best.distance {
                continue;
            }

            let node = &self.nodes[index];
            if node.is_leaf() {
                for &i in &node.items {
                    let item = &self.items[i];
                    let d = distance(item, point);
                    if d < best.distance {
                        best = Closest::found(d, i, item);
                    }
                }
                continue;
            }

            let bound_sq = best.distance * best.distance;
            for (child, dist_sq, quadrant) in children_furthest_first(node.first_child, &region, point) {
                if dist_sq < bound_sq {
                    stack.push((child, dist_sq, quadrant));
                }
            }
        }
        best
    }

    /// Finds the `k` distinct items closest to `point`, ascending by distance.
    ///
    /// Returns `(distance, index)` pairs. Fewer than `k` pairs come back when
    /// the tree holds fewer items, or when some distances are not finite.
    pub fn nearest_k<F>(&self, point: Point, k: usize, mut distance: F) -> Vec<(f64, usize)>
    where
        F: FnMut(&T, Point) -> f64,
    {
        let mut found: Vec<(f64, usize)> = Vec::with_capacity(k.min(self.items.len()));
        if k == 0 || self.nodes.is_empty() {
            return found;
        }

        let radius = |found: &[(f64, usize)]| {
            if found.len() < k {
                f64::INFINITY
            } else {
                found[k - 1].0
            }
        };

        let mut stack = vec![(ROOT, 0.0_f64, self.bound)];
        while let Some((index, min_dist_sq, region)) = stack.pop() {
            let r = radius(&found);
            if min_dist_sq >= r * r {
                continue;
            }

            let node = &self.nodes[index];
            if node.is_leaf() {
                for &i in &node.items {
                    if found.iter().any(|&(_, seen)| seen == i) {
                        continue;
                    }
                    let d = distance(&self.items[i], point);
                    if d < radius(&found) {
                        let at = found.partition_point(|&(other, _)| other <= d);
                        found.insert(at, (d, i));
                        found.truncate(k);
                    }
                }
                continue;
            }

            let r_sq = r * r;
            for (child, dist_sq, quadrant) in children_furthest_first(node.first_child, &region, point) {
                if dist_sq < r_sq {
                    stack.push((child, dist_sq, quadrant));
                }
            }
        }
        found
    }
}

/// The four children of a node with their regions and minimum squared
/// distance to `point`, sorted so the nearest child comes last.
fn children_furthest_first(first_child: usize, region: &Aabb, point: Point) -> [(usize, f64, Aabb); 4] {
    let mut children: [(usize, f64, Aabb); 4] = std::array::from_fn(|q| {
        let quadrant = region.quadrant(q);
        (first_child + q, quadrant.distance_squared_to(point), quadrant)
    });
    children.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    children
}

fn sort_and_dedup_tail(results: &mut Vec<usize>, start: usize) {
    let mut tail = results.split_off(start);
    tail.sort_unstable();
    tail.dedup();
    results.append(&mut tail);
}
