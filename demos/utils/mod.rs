use fortune_voronoi::{BoundingBox, Diagram};
use svg::node::element::{path::Data, Circle, Path, Rectangle};
use svg::{Document, Node};

/// Map from diagram space to svg space, y flipped, svg's origin is at left-top
#[derive(Debug, Clone, Copy)]
pub struct Map {
    from: BoundingBox,
    size: f64,
}

impl Map {
    pub fn new(from: BoundingBox, size: f64) -> Self {
        Self { from, size }
    }

    pub fn scale(&self) -> f64 {
        self.size / self.from.width().max(self.from.height())
    }

    pub fn map_point(&self, x: f64, y: f64) -> (f64, f64) {
        let scale = self.scale();
        ((x - self.from.xl) * scale, (self.from.yt - y) * scale)
    }

    pub fn document(&self) -> Document {
        let scale = self.scale();
        Document::new()
            .set(
                "viewBox",
                (0., 0., self.from.width() * scale, self.from.height() * scale),
            )
            .set("style", "background-color: #F5F5F5")
    }
}

pub fn polygon(map: &Map, points: &[fortune_voronoi::Point], stroke: &str, fill: &str) -> Path {
    let mut data = Data::new();
    for (i, p) in points.iter().enumerate() {
        let p = map.map_point(p.x, p.y);
        data = if i == 0 {
            data.move_to(p)
        } else {
            data.line_to(p)
        };
    }
    Path::new()
        .set("d", data.close())
        .set("stroke", stroke)
        .set("fill", fill)
}

pub fn circle(center: (f64, f64), r: f64, fill: &str) -> Circle {
    Circle::new()
        .set("cx", center.0)
        .set("cy", center.1)
        .set("r", r)
        .set("fill", fill)
}

pub fn draw_svg(diagram: &Diagram, path: std::path::PathBuf) {
    let bbox = diagram.bounding_box();
    let map = Map::new(bbox, 800.);
    let mut doc = map.document();

    doc.append(
        Rectangle::new()
            .set("width", bbox.width() * map.scale())
            .set("height", bbox.height() * map.scale())
            .set("fill", "#29B6F6"),
    );

    for (site, point) in diagram.sites() {
        doc.append(polygon(&map, &diagram.cell_polygon(site), "white", "none"));
        doc.append(circle(map.map_point(point.x, point.y), 2., "black"));
    }

    svg::save(path, &doc).unwrap();
}
