use fortune_voronoi::{Point, SweeperBuilder};
use rand::Rng;
mod utils;

fn main() {
    let mut points = Vec::<Point>::new();
    for _ in 0..100 {
        let x: f64 = rand::thread_rng().gen_range(0.0..800.);
        let y: f64 = rand::thread_rng().gen_range(0.0..800.);
        points.push(Point::new(x, y));
    }

    let sweeper = SweeperBuilder::new(points).build().unwrap();
    let diagram = sweeper.compute();
    utils::draw_svg(&diagram, "random.svg".into());
}
