//! Builds a small tree, prints its structure, and lists the points near a location.
//!
//! Run with `RUST_LOG=quadtree_index=debug` to see splits and relocations.

use quadtree_index::quadtree::PointRecord;
use quadtree_index::{Extent, QuadTree};
use tracing_subscriber::EnvFilter;

fn print_location(record: &PointRecord<f64, &str>) {
    println!("found -- ({:.6},{:.6})", record.x(), record.y());
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut tree = QuadTree::new(Extent::new(0., 0., 100., 100.), 2, 4).unwrap();

    let points = [
        (10., 10., "A"),
        (20., 20., "B"),
        (12., 18., "C"),
        (60., 60., "D"),
        (75., 20., "E"),
        (30., 80., "F"),
    ];
    for (x, y, name) in points {
        tree.insert(x, y, name).unwrap();
    }

    println!("=== Tree structure ===");
    print!("{}", tree.dump());

    println!("\n=== Points within 10 of (15, 15) ===");
    tree.query_radius(15., 15., 10., print_location);

    println!("\n=== Moving B to (65, 65) ===");
    tree.move_point(20., 20., 65., 65., &"B").unwrap();
    tree.query_radius(62., 62., 5., print_location);

    println!("\n=== Tearing down ===");
    tree.destroy_with(|record| println!("released {}", record.payload()));
}
