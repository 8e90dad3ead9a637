use orsearch::{BruteForce, Error, Point, RangeSearch, RangeTree};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn sorted(mut v: Vec<usize>) -> Vec<usize> {
    v.sort_unstable();
    v
}

fn q(tree: &RangeTree, bl: (f64, f64), tr: (f64, f64)) -> Vec<usize> {
    sorted(tree.query(bl.into(), tr.into()).unwrap())
}

fn four_diagonal() -> RangeTree {
    RangeTree::from_points(&[
        Point::new(0.0, 0.0),
        Point::new(5.0, 5.0),
        Point::new(10.0, 10.0),
        Point::new(15.0, 15.0),
    ])
}

fn ten_collinear() -> RangeTree {
    let points: Vec<Point> = (0..10).map(|i| Point::new(i as f64, i as f64)).collect();
    RangeTree::from_points(&points)
}

#[test]
fn test_four_diagonal_points() {
    init_logger();
    let tree = four_diagonal();
    assert!(q(&tree, (8.0, 8.0), (9.0, 9.0)).is_empty());
    assert_eq!(q(&tree, (9.0, 9.0), (11.0, 11.0)), vec![2]);
    assert_eq!(q(&tree, (14.0, 14.0), (16.0, 16.0)), vec![3]);
    assert_eq!(q(&tree, (0.0, 0.0), (15.0, 15.0)), vec![0, 1, 2, 3]);
    assert_eq!(q(&tree, (4.0, 4.0), (8.0, 8.0)), vec![1]);
}

#[test]
fn test_ten_collinear_points() {
    init_logger();
    let tree = ten_collinear();
    assert_eq!(q(&tree, (8.5, 8.5), (9.5, 9.5)), vec![9]);
    assert_eq!(q(&tree, (4.5, 4.5), (5.5, 5.5)), vec![5]);
    assert_eq!(q(&tree, (-100.0, -100.0), (100.0, 100.0)), (0..10).collect::<Vec<_>>());
    assert!(q(&tree, (9.5, 0.0), (20.0, 20.0)).is_empty());
    assert!(q(&tree, (-5.0, -5.0), (-0.5, 20.0)).is_empty());
}

#[test]
fn test_all_four_edges_are_inclusive() {
    // A 3x3 grid; the rectangle's edges pass through the outer ring.
    let points: Vec<Point> = (0..9)
        .map(|i| Point::new((i % 3) as f64, (i / 3) as f64))
        .collect();
    let tree = RangeTree::from_points(&points);
    assert_eq!(q(&tree, (0.0, 0.0), (2.0, 2.0)), (0..9).collect::<Vec<_>>());
    assert_eq!(q(&tree, (1.0, 1.0), (1.0, 1.0)), vec![4]);
    assert_eq!(q(&tree, (0.0, 2.0), (2.0, 2.0)), vec![6, 7, 8]);
    assert_eq!(q(&tree, (2.0, 0.0), (2.0, 2.0)), vec![2, 5, 8]);
}

#[test]
fn test_empty_point_set() {
    let mut tree = RangeTree::new(Vec::new());
    tree.build();
    assert!(tree.is_empty());
    assert_eq!(tree.tree_len(), Some(0));
    assert!(q(&tree, (-1.0, -1.0), (1.0, 1.0)).is_empty());
    assert_eq!(tree.count(Point::new(-1.0, -1.0), Point::new(1.0, 1.0)).unwrap(), 0);
}

#[test]
fn test_query_before_build_fails() {
    let tree = RangeTree::new(vec![Point::new(0.0, 0.0)]);
    let err = tree.query(Point::new(0.0, 0.0), Point::new(1.0, 1.0)).unwrap_err();
    assert!(matches!(err, Error::NotBuilt));
}

#[test]
fn test_invalid_rectangle_is_rejected() {
    let tree = four_diagonal();
    let err = tree
        .query(Point::new(10.0, 0.0), Point::new(5.0, 15.0))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidRectangle { .. }));
    assert!(tree
        .query(Point::new(0.0, f64::NAN), Point::new(5.0, 5.0))
        .is_err());
    assert!(tree.count(Point::new(0.0, 1.0), Point::new(5.0, 0.0)).is_err());
}

#[test]
fn test_nan_points_are_never_reported() {
    let tree = RangeTree::from_points(&[
        Point::new(f64::NAN, 1.0),
        Point::new(1.0, 1.0),
        Point::new(2.0, f64::NAN),
    ]);
    assert_eq!(
        q(&tree, (f64::MIN, f64::MIN), (f64::MAX, f64::MAX)),
        vec![1]
    );
    assert_eq!(
        q(&tree, (f64::NEG_INFINITY, f64::NEG_INFINITY), (f64::INFINITY, f64::INFINITY)),
        vec![1]
    );
}

#[test]
fn test_structure_sizes() {
    let tree = RangeTree::from_points(&(0..6).map(|i| Point::new(i as f64, 0.0)).collect::<Vec<_>>());
    assert_eq!(tree.tree_len(), Some(15));
    assert_eq!(tree.height(), Some(4));

    let tree = RangeTree::from_points(&(0..1000).map(|i| Point::new(i as f64, 0.0)).collect::<Vec<_>>());
    assert_eq!(tree.tree_len(), Some(2047));
    assert_eq!(tree.height(), Some(11));
    assert!(tree.heap_bytes() > 0);
}

#[test]
fn test_random_against_brute_force() {
    init_logger();
    let mut rng = StdRng::seed_from_u64(42);
    let points: Vec<Point> = (0..1234)
        .map(|_| Point::new(rng.gen::<f32>() as f64, rng.gen::<f32>() as f64))
        .collect();

    let mut tree = RangeTree::new(points.clone());
    let mut oracle = BruteForce::new(points);
    tree.build();
    oracle.build();

    for _ in 0..1000 {
        let (x1, x2, y1, y2): (f64, f64, f64, f64) = rng.gen();
        let bl = Point::new(x1.min(x2), y1.min(y2));
        let tr = Point::new(x1.max(x2), y1.max(y2));
        let expected = oracle.query(bl, tr).unwrap();
        assert_eq!(sorted(tree.query(bl, tr).unwrap()), expected);
        assert_eq!(tree.count(bl, tr).unwrap(), expected.len());
    }
}

#[test]
fn test_concurrent_queries() {
    let mut rng = StdRng::seed_from_u64(7);
    let points: Vec<Point> = (0..500)
        .map(|_| Point::new(rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0)))
        .collect();
    let tree = RangeTree::from_points(&points);
    let mut oracle = BruteForce::new(points);
    oracle.build();

    std::thread::scope(|s| {
        for t in 0..4 {
            let (tree, oracle) = (&tree, &oracle);
            s.spawn(move || {
                let mut rng = StdRng::seed_from_u64(t);
                for _ in 0..200 {
                    let (a, b): (f64, f64) = (rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0));
                    let bl = Point::new(a.min(b), a.min(b));
                    let tr = Point::new(a.max(b), a.max(b));
                    assert_eq!(sorted(tree.query(bl, tr).unwrap()), oracle.query(bl, tr).unwrap());
                }
            });
        }
    });
}
