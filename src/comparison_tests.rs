//! Comparison tests between Quadtree queries and a linear scan over the same
//! items with the same predicates

#[cfg(test)]
mod tests {
    use crate::{Aabb, Point, Quadtree, Ray};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const WORLD: Aabb = Aabb::new(0.0, 0.0, 100.0, 100.0);

    fn overlaps(item: &Aabb, region: &Aabb) -> bool {
        item.overlaps(region)
    }

    fn box_distance(item: &Aabb, p: Point) -> f64 {
        item.distance_squared_to(p).sqrt()
    }

    fn ray_hit(item: &Aabb, ray: &Ray) -> f64 {
        item.ray_entry(ray).unwrap_or(f64::INFINITY)
    }

    fn random_point(rng: &mut StdRng, lo: f64, hi: f64) -> Point {
        Point::new(rng.random_range(lo..hi), rng.random_range(lo..hi))
    }

    fn random_boxes(rng: &mut StdRng, count: usize, max_size: f64) -> Vec<Aabb> {
        (0..count)
            .map(|_| {
                let min_x = rng.random_range(0.0..(100.0 - max_size));
                let min_y = rng.random_range(0.0..(100.0 - max_size));
                let w = rng.random_range(0.0..max_size);
                let h = rng.random_range(0.0..max_size);
                Aabb::new(min_x, min_y, min_x + w, min_y + h)
            })
            .collect()
    }

    fn random_ray(rng: &mut StdRng) -> Ray {
        let angle = rng.random_range(0.0..std::f64::consts::TAU);
        Ray::new(random_point(rng, -20.0, 120.0), Point::new(angle.cos(), angle.sin()))
    }

    fn box_tree(boxes: &[Aabb], max_depth: usize) -> Quadtree<Aabb> {
        let mut tree = Quadtree::with_capacity(boxes.len());
        tree.build(boxes.iter().copied(), WORLD, overlaps, max_depth).unwrap();
        tree
    }

    fn brute_min<T>(items: &[T], mut distance: impl FnMut(&T) -> f64) -> f64 {
        items.iter().map(&mut distance).fold(f64::INFINITY, f64::min)
    }

    #[test]
    fn test_nearest_matches_brute_force_on_points() {
        let mut rng = StdRng::seed_from_u64(42);
        let points: Vec<Point> = (0..1000).map(|_| random_point(&mut rng, 0.0, 1.0)).collect();

        let mut tree = Quadtree::new();
        tree.build(
            points.iter().copied(),
            Aabb::new(0.0, 0.0, 1.0, 1.0),
            |p: &Point, b: &Aabb| b.contains_point(*p),
            6,
        )
        .unwrap();

        for _ in 0..1000 {
            let query = random_point(&mut rng, 0.0, 1.0);
            let found = tree.nearest(query, |p, q| p.distance(q));
            let expected = brute_min(&points, |p| p.distance(query));

            assert_eq!(found.distance, expected, "Nearest distance differs for {query:?}");
            let index = found.index.unwrap();
            assert_eq!(points[index].distance(query), expected, "Reported item is a true nearest");
        }
    }

    #[test]
    fn test_nearest_matches_brute_force_on_boxes() {
        let mut rng = StdRng::seed_from_u64(7);
        let boxes = random_boxes(&mut rng, 500, 8.0);
        let tree = box_tree(&boxes, 5);

        for _ in 0..500 {
            // queries also land outside the bound
            let query = random_point(&mut rng, -30.0, 130.0);
            let found = tree.nearest(query, box_distance);
            let expected = brute_min(&boxes, |b| box_distance(b, query));
            assert_eq!(found.distance, expected, "Nearest box distance differs for {query:?}");
        }
    }

    #[test]
    fn test_nearest_k_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(1234);
        let boxes = random_boxes(&mut rng, 400, 5.0);
        let tree = box_tree(&boxes, 6);

        for k in [1, 5, 20] {
            for _ in 0..100 {
                let query = random_point(&mut rng, 0.0, 100.0);
                let found: Vec<f64> = tree.nearest_k(query, k, box_distance).iter().map(|&(d, _)| d).collect();

                let mut expected: Vec<f64> = boxes.iter().map(|b| box_distance(b, query)).collect();
                expected.sort_by(f64::total_cmp);
                expected.truncate(k);

                assert_eq!(found, expected, "k = {k} nearest distances differ for {query:?}");
            }
        }
    }

    #[test]
    fn test_box_queries_match_brute_force() {
        let mut rng = StdRng::seed_from_u64(95756739);
        let boxes = random_boxes(&mut rng, 1000, 5.0);
        let tree = box_tree(&boxes, 6);

        for _ in 0..300 {
            let query = random_boxes(&mut rng, 1, 20.0)[0];
            let expected: Vec<usize> = (0..boxes.len()).filter(|&i| boxes[i].overlaps(&query)).collect();

            let mut results = Vec::new();
            tree.query_intersecting(&query, overlaps, &mut results);
            assert_eq!(results, expected, "query_intersecting differs for {query:?}");

            assert_eq!(
                tree.intersects(&query, overlaps),
                !expected.is_empty(),
                "intersects differs for {query:?}"
            );

            let mut visited = Vec::new();
            tree.for_each_intersecting_item(&query, overlaps, |b| visited.push(*b));
            for &i in &expected {
                assert!(visited.contains(&boxes[i]), "Visitor missed box {i} for {query:?}");
            }
            assert!(
                visited.iter().all(|b| b.overlaps(&query)),
                "Visitor reported a box the predicate rejects"
            );
        }
    }

    #[test]
    fn test_ray_queries_match_brute_force() {
        let mut rng = StdRng::seed_from_u64(2024);
        let boxes = random_boxes(&mut rng, 600, 6.0);
        let tree = box_tree(&boxes, 6);
        let hits = |b: &Aabb, r: &Ray| b.intersects_ray(r);

        for _ in 0..300 {
            let ray = random_ray(&mut rng);
            let expected: Vec<usize> = (0..boxes.len()).filter(|&i| boxes[i].intersects_ray(&ray)).collect();

            let mut results = Vec::new();
            tree.query_ray(&ray, hits, &mut results);
            assert_eq!(results, expected, "query_ray differs for {ray:?}");

            assert_eq!(
                tree.intersects_ray(&ray, hits),
                !expected.is_empty(),
                "intersects_ray differs for {ray:?}"
            );

            let mut visits = 0;
            tree.for_each_intersecting_item_along_ray(&ray, hits, |_| visits += 1);
            assert!(visits >= expected.len(), "Visitor missed hits for {ray:?}");
        }
    }

    #[test]
    fn test_closest_intersection_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(99);
        let boxes = random_boxes(&mut rng, 600, 6.0);
        let tree = box_tree(&boxes, 6);

        for _ in 0..500 {
            let ray = random_ray(&mut rng);
            let found = tree.closest_intersection(&ray, ray_hit);
            let expected = brute_min(&boxes, |b| ray_hit(b, &ray));

            assert_eq!(found.distance, expected, "Closest hit differs for {ray:?}");
            assert_eq!(found.is_found(), expected.is_finite(), "Found flag for {ray:?}");
        }
    }

    #[test]
    fn test_rebuild_with_new_data_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(5);
        let first = random_boxes(&mut rng, 300, 4.0);
        let second = random_boxes(&mut rng, 50, 4.0);

        let mut tree = box_tree(&first, 5);
        tree.build(second.iter().copied(), WORLD, overlaps, 4).unwrap();
        assert_eq!(tree.number_of_items(), second.len(), "Only the second build's items remain");

        for _ in 0..200 {
            let query = random_point(&mut rng, 0.0, 100.0);
            let found = tree.nearest(query, box_distance);
            let expected = brute_min(&second, |b| box_distance(b, query));
            assert_eq!(found.distance, expected, "Stale items leaked into nearest for {query:?}");
        }
    }
}
