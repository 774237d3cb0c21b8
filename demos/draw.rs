/// This example is like a visual debugger, it can draw each step
use clap::Parser;
use fortune_voronoi::{
    loader::{Loader, PlainFileLoader},
    CircleEventId, Context, Observer, SiteId,
};
use svg::node::element::Line;
use svg::Node;
use utils::{circle, draw_svg, Map};
mod utils;

/// Draw a Voronoi diagram, or every step of the sweep building it
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Site file, one `x y` per line, optional `BBOX xl xr yb yt`
    #[arg(short, long)]
    path: std::path::PathBuf,

    /// Draw the result only, into this svg
    #[arg(short, long)]
    output: Option<std::path::PathBuf>,

    /// Directory the step frames are written to
    #[arg(long, default_value = "frames")]
    frame_dir: std::path::PathBuf,

    /// Draw a frame per site event
    #[arg(long)]
    site: bool,

    /// Draw a frame per circle event
    #[arg(long)]
    circle: bool,

    #[arg(long, default_value = "1")]
    bench_count: usize,

    #[arg(long, default_value = "1000")]
    frame_count: usize,
}

fn main() {
    let args = Args::parse();

    let sweeper_builder = {
        let mut file_loader = PlainFileLoader::default();
        match args.path.to_str().map(|path| file_loader.load(path)) {
            Some(Ok(builder)) => builder,
            Some(Err(e)) => {
                eprintln!("can not load {:?}: {e}", args.path);
                std::process::exit(1);
            }
            None => {
                eprintln!("path {:?} is not utf8", args.path);
                std::process::exit(1);
            }
        }
    };
    let sweeper = match sweeper_builder.build() {
        Ok(sweeper) => sweeper,
        Err(e) => {
            eprintln!("invalid input: {e}");
            std::process::exit(1);
        }
    };

    if let Some(output_path) = args.output {
        // draw result instead of debug
        draw_svg(&sweeper.compute(), output_path);
        return;
    }

    if args.bench_count == 1 {
        let mut observer = DrawObserver::new(&args, Map::new(sweeper.bounding_box(), 800.));
        let _result = sweeper.clone().compute_with_observer(&mut observer);
        observer.save(&args.frame_dir);
        println!(
            "sites: {} circle events: {} stale: {}",
            observer.site_count, observer.circle_count, observer.stale_count
        );

        // measure time with dummy observer
        let start = std::time::Instant::now();
        let count = 1000;
        for _ in 0..count {
            let _ = sweeper.clone().compute();
        }
        let duration = start.elapsed() / count;
        println!("{:?} per compute", duration);
    } else {
        for _ in 0..args.bench_count {
            let _ = sweeper.clone().compute();
        }
    }
}

struct DrawObserver {
    map: Map,
    site: bool,
    circle: bool,
    frame_count: usize,

    site_count: u64,
    circle_count: u64,
    stale_count: u64,

    /// svgs
    frames: Vec<String>,
}

impl DrawObserver {
    fn new(args: &Args, map: Map) -> Self {
        Self {
            map,
            site: args.site,
            circle: args.circle,
            frame_count: args.frame_count,
            site_count: 0,
            circle_count: 0,
            stale_count: 0,
            frames: vec![],
        }
    }

    fn save(&self, dir: &std::path::Path) {
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!("can not create {dir:?}: {e}");
            return;
        }
        for (idx, frame) in self.frames.iter().enumerate() {
            let path = dir.join(format!("frame_{idx:04}.svg"));
            if let Err(e) = std::fs::write(&path, frame) {
                eprintln!("can not write {path:?}: {e}");
            }
        }
        println!("{} frames saved to {dir:?}", self.frames.len());
    }

    fn draw(&mut self, context: &Context) {
        if self.frames.len() >= self.frame_count {
            return;
        }

        let map = self.map;
        let mut doc = map.document();

        // sweep line
        if context.directrix.is_finite() {
            let (_, y) = map.map_point(0., context.directrix);
            doc.append(
                Line::new()
                    .set("x1", 0.)
                    .set("y1", y)
                    .set("x2", 800.)
                    .set("y2", y)
                    .set("stroke", "orange"),
            );
        }

        for (_, edge) in context.dcel.iter_edges() {
            let (Some(va), Some(vb)) = (edge.va, edge.vb) else {
                continue;
            };
            if edge.is_discarded() {
                continue;
            }
            let a = map.map_point(va.x, va.y);
            let b = map.map_point(vb.x, vb.y);
            doc.append(
                Line::new()
                    .set("x1", a.0)
                    .set("y1", a.1)
                    .set("x2", b.0)
                    .set("y2", b.1)
                    .set("stroke", if edge.is_border() { "gray" } else { "black" }),
            );
        }

        // vertices waiting for an open edge's other end
        for (_, edge) in context.dcel.iter_edges() {
            if let (Some(va), None) = (edge.va, edge.vb) {
                doc.append(circle(map.map_point(va.x, va.y), 2., "red"));
            }
        }

        for (_, arc) in context.beach_line.iter() {
            if let Some(p) = context.points.get_point(arc.site) {
                doc.append(circle(map.map_point(p.x, p.y), 3., "blue"));
            }
        }

        self.frames.push(doc.to_string());
    }
}

impl Observer for DrawObserver {
    fn site_event(&mut self, _site: SiteId, context: &Context) {
        self.site_count += 1;
        if self.site {
            self.draw(context);
        }
    }

    fn circle_event(&mut self, _event: CircleEventId, context: &Context) {
        self.circle_count += 1;
        if self.circle {
            self.draw(context);
        }
    }

    fn stale_circle_event(&mut self, _event: CircleEventId, _context: &Context) {
        self.stale_count += 1;
    }

    fn sweep_done(&mut self, context: &Context) {
        self.draw(context);
    }

    fn finalized(&mut self, context: &Context) {
        self.draw(context);
    }
}
