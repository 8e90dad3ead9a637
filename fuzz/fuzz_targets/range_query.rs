#![no_main]
use libfuzzer_sys::fuzz_target;
use orsearch::{BruteForce, Point, RangeSearch, RangeTree};

fuzz_target!(|data: (Vec<(i16, i16)>, Vec<(i16, i16, i16, i16)>)| {
    let (raw_points, raw_rects) = data;
    let points: Vec<Point> = raw_points
        .iter()
        .map(|&(x, y)| Point::new(x as f64, y as f64))
        .collect();

    let tree = RangeTree::from_points(&points);
    let mut oracle = BruteForce::new(points);
    oracle.build();

    for &(x1, y1, x2, y2) in &raw_rects {
        let bl = Point::new(x1.min(x2) as f64, y1.min(y2) as f64);
        let tr = Point::new(x1.max(x2) as f64, y1.max(y2) as f64);

        let mut got = tree.query(bl, tr).unwrap();
        got.sort_unstable();
        let expected = oracle.query(bl, tr).unwrap();
        assert_eq!(got, expected, "query {:?}..{:?}", bl, tr);
        assert_eq!(tree.count(bl, tr).unwrap(), expected.len());
    }
});
