//! Benchmark for nearest-item queries against a linear scan

use quadtree2d::{Aabb, Point, Quadtree};
use rand::Rng;
use rand::SeedableRng;
use std::time::Instant;

fn random_point<R: Rng>(rng: &mut R) -> Point {
    Point::new(rng.random_range(0.0..1.0), rng.random_range(0.0..1.0))
}

fn main() {
    println!("quadtree2d Nearest Benchmark");
    println!("============================\n");

    let mut rng = rand::rngs::StdRng::seed_from_u64(42);

    for &(num_items, max_depth) in &[(1_000_usize, 6_usize), (100_000, 9), (1_000_000, 11)] {
        let points: Vec<Point> = (0..num_items).map(|_| random_point(&mut rng)).collect();
        let queries: Vec<Point> = (0..10_000).map(|_| random_point(&mut rng)).collect();

        let start = Instant::now();
        let mut tree = Quadtree::with_capacity(num_items);
        if let Err(e) = tree.build(
            points.iter().copied(),
            Aabb::new(0.0, 0.0, 1.0, 1.0),
            |p: &Point, b: &Aabb| b.contains_point(*p),
            max_depth,
        ) {
            eprintln!("build failed: {e}");
            return;
        }
        println!(
            "{} points, depth {}: built in {:.2}ms ({} nodes)",
            num_items,
            max_depth,
            start.elapsed().as_secs_f64() * 1000.0,
            tree.number_of_nodes()
        );

        let start = Instant::now();
        let mut checksum = 0.0;
        for &q in &queries {
            checksum += tree.nearest(q, |p, x| p.distance(x)).distance;
        }
        println!(
            "  {} nearest queries: {:.2}ms (sum {:.6})",
            queries.len(),
            start.elapsed().as_secs_f64() * 1000.0,
            checksum
        );

        let start = Instant::now();
        for &q in &queries {
            let _found = tree.nearest_k(q, 10, |p, x| p.distance(x));
        }
        println!(
            "  {} nearest-10 queries: {:.2}ms",
            queries.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );

        if num_items <= 100_000 {
            let start = Instant::now();
            let mut brute = 0.0;
            for &q in &queries {
                brute += points.iter().map(|p| p.distance(q)).fold(f64::INFINITY, f64::min);
            }
            println!(
                "  {} linear scans: {:.2}ms (sum {:.6})",
                queries.len(),
                start.elapsed().as_secs_f64() * 1000.0,
                brute
            );
        }
        println!();
    }
}
