use std::io::{Read, Write};

use fortune_voronoi::{BoundingBox, Point, SweeperBuilder};
use rand::Rng;

fn main() {
    test_forever_rand();
}

fn test_forever_rand() {
    let mut idx = 0;
    loop {
        idx += 1;
        println!("run {idx}");
        test_rand();
    }
}

/// Sites of a failing run stay on disk, the next run replays them
fn test_rand() {
    let file_path = "test_data/latest_test_data";
    let points = if let Some(points) = try_load_from_file(file_path) {
        points
    } else {
        let mut points = Vec::<Point>::new();
        for _ in 0..100 {
            let x: f64 = rand::thread_rng().gen_range(0.0..800.);
            let y: f64 = rand::thread_rng().gen_range(0.0..800.);
            points.push(Point::new(x, y));
        }
        save_to_file(&points, file_path);
        points
    };
    let count = points.len();

    let diagram = SweeperBuilder::new(points)
        .bounding_box(BoundingBox::new(-10., 810., -10., 810.))
        .build()
        .unwrap()
        .compute();

    assert_eq!(diagram.cells().len(), count);
    let mut area = 0.;
    for (site, _) in diagram.sites() {
        let polygon = diagram.cell_polygon(site);
        assert!(polygon.len() >= 3, "open cell {site:?}");
        for i in 0..polygon.len() {
            let (a, b) = (polygon[i], polygon[(i + 1) % polygon.len()]);
            area += (a.x * b.y - b.x * a.y) / 2.;
        }
    }
    assert!((area - 820. * 820.).abs() < 1e-3, "cells cover {area}");

    delete_file(file_path);
}

fn try_load_from_file(path: &str) -> Option<Vec<Point>> {
    let mut f = std::fs::File::options().read(true).open(path).ok()?;
    let mut value = "".to_string();
    f.read_to_string(&mut value).unwrap();
    let mut points = vec![];
    for line in value.lines() {
        let mut iter = line.split_whitespace();
        let x = iter.next().unwrap();
        let y = iter.next().unwrap();
        let x = x.parse::<f64>().unwrap();
        let y = y.parse::<f64>().unwrap();
        points.push(Point::new(x, y));
    }
    Some(points)
}

fn save_to_file(points: &[Point], path: &str) {
    use std::fmt::Write;
    if let Some(dir) = std::path::Path::new(path).parent() {
        std::fs::create_dir_all(dir).unwrap();
    }
    let mut f = std::fs::File::options()
        .write(true)
        .create_new(true)
        .open(path)
        .unwrap();
    let mut value = "".to_string();
    for p in points {
        writeln!(value, "{} {}", p.x, p.y).unwrap();
    }
    f.write_all(value.as_bytes()).unwrap();
}

fn delete_file(path: &str) {
    std::fs::remove_file(path).unwrap();
}
