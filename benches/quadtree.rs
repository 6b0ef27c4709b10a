use criterion::{criterion_group, criterion_main, Criterion};
use quadtree_index::{Extent, QuadTree};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstar::RTree;

fn load_data(n: usize) -> Vec<[f64; 2]> {
    let mut rng = StdRng::seed_from_u64(0);
    (0..n)
        .map(|_| [rng.gen_range(0.0..1000.0), rng.gen_range(0.0..1000.0)])
        .collect()
}

fn construct_quadtree(points: &[[f64; 2]], max_bucket_size: usize) -> QuadTree<f64, usize> {
    let mut tree = QuadTree::new(Extent::new(0., 0., 1000., 1000.), max_bucket_size, 16).unwrap();
    for (id, [x, y]) in points.iter().enumerate() {
        tree.insert(*x, *y, id).unwrap();
    }
    tree
}

fn construct_rstar(points: &[[f64; 2]]) -> RTree<[f64; 2]> {
    let mut tree = RTree::new();
    for point in points {
        tree.insert(*point);
    }
    tree
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let points = load_data(100_000);

    c.bench_function("construction (quadtree, bucket 8)", |b| {
        b.iter(|| construct_quadtree(&points, 8))
    });

    c.bench_function("construction (quadtree, bucket 32)", |b| {
        b.iter(|| construct_quadtree(&points, 32))
    });

    c.bench_function("construction (rstar insert)", |b| {
        b.iter(|| construct_rstar(&points))
    });

    let quadtree = construct_quadtree(&points, 8);
    let rstar_tree = construct_rstar(&points);
    let (qx, qy, r) = (412.5, 377.0, 25.0);

    c.bench_function("radius search (quadtree)", |b| {
        b.iter(|| quadtree.within(qx, qy, r).len())
    });

    c.bench_function("radius search (rstar)", |b| {
        b.iter(|| rstar_tree.locate_within_distance([qx, qy], r * r).count())
    });

    let mut moving = construct_quadtree(&points, 8);
    let mut step = 0usize;
    c.bench_function("move (quadtree)", |b| {
        b.iter(|| {
            let id = step % points.len();
            let [x, y] = points[id];
            let (nx, ny) = ((x + 500.0) % 1000.0, y);
            // move out and back so the tree stays consistent between iterations
            moving.move_point(x, y, nx, ny, &id).unwrap();
            moving.move_point(nx, ny, x, y, &id).unwrap();
            step += 1;
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
