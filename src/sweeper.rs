use tracing::{debug, trace, warn};

use crate::beach_line::{ArcId, BeachLine, Location};
use crate::completer;
use crate::dcel::Dcel;
use crate::diagram::Diagram;
use crate::events::{CircleEvent, CircleEventId, Event, EventQueue};
use crate::points::{Points, PointsBuilder, SiteId};
use crate::shape::{BoundingBox, Point};
use crate::utils::{circumcenter, eq_eps};
use crate::{Context, Error};

/// Observer for sweeper, used to monitor how sweeper works, quite useful
/// for visual debugging when things goes wrong. Check example's draw.
#[allow(unused_variables)]
pub trait Observer {
    /// A site event processed, its arc is on the beach line
    fn site_event(&mut self, site: SiteId, context: &Context) {}

    /// A circle event processed, the vertex is in the dcel
    fn circle_event(&mut self, event: CircleEventId, context: &Context) {}

    /// A circle event popped after its arc lost it, nothing changed
    fn stale_circle_event(&mut self, event: CircleEventId, context: &Context) {}

    /// Sweep process done, edges reaching the infinity are still open
    fn sweep_done(&mut self, context: &Context) {}

    /// The diagram is clipped and every cell closed
    fn finalized(&mut self, context: &Context) {}
}

/// Default dummy observer, blank impl, so all calls should be optimized out by compiler.
impl Observer for () {}

/// Margin added around the sites when no bounding box is given, as a ratio of
/// their extent
pub const DEFAULT_MARGIN_RATIO: f64 = 0.3;

/// Sweeper Builder
///
/// # Example
/// ```rust
///    use fortune_voronoi::{BoundingBox, Point, SweeperBuilder};
///
///    let sweeper = SweeperBuilder::new(vec![
///        Point::new(10., 30.),
///        Point::new(25., 55.),
///        Point::new(45., 50.),
///    ])
///    .add_site(Point::new(30., 60.))
///    .bounding_box(BoundingBox::new(0., 100., 0., 100.))
///    .build()
///    .unwrap();
///    let diagram = sweeper.compute();
///    assert_eq!(diagram.cells().len(), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SweeperBuilder {
    sites: Vec<Point>,
    bounding_box: Option<BoundingBox>,
}

impl SweeperBuilder {
    /// Create a new Builder with sites
    pub fn new(sites: Vec<Point>) -> Self {
        Self {
            sites,
            bounding_box: None,
        }
    }

    /// Add a single site
    pub fn add_site(mut self, site: Point) -> Self {
        self.sites.push(site);
        self
    }

    /// Add multiple sites, batch version for `Self::add_site`
    pub fn add_sites(mut self, sites: impl IntoIterator<Item = Point>) -> Self {
        self.sites.extend(sites);
        self
    }

    /// Box the diagram is clipped to. Without one, the box is derived from the
    /// sites with [`DEFAULT_MARGIN_RATIO`].
    pub fn bounding_box(mut self, bounding_box: BoundingBox) -> Self {
        self.bounding_box = Some(bounding_box);
        self
    }

    /// Validate the input and build the sweeper. Duplicated sites are merged.
    pub fn build(self) -> Result<Sweeper, Error> {
        if let Some(index) = self.sites.iter().position(|p| !p.is_finite()) {
            return Err(Error::NonFiniteSite { index });
        }

        let bounding_box = match self.bounding_box {
            Some(bounding_box) => bounding_box,
            None => BoundingBox::around(self.sites.iter().copied(), DEFAULT_MARGIN_RATIO)
                .ok_or(Error::TooFewSites { count: 0 })?,
        };
        if !bounding_box.is_valid() {
            let BoundingBox { xl, xr, yb, yt } = bounding_box;
            return Err(Error::InvalidBoundingBox { xl, xr, yb, yt });
        }
        if let Some(index) = self.sites.iter().position(|p| !bounding_box.contains(*p)) {
            return Err(Error::SiteOutsideBoundingBox { index });
        }

        let mut points_builder = PointsBuilder::with_capacity(self.sites.len());
        let ids = points_builder.add_points(self.sites);
        if ids.len() > points_builder.len() {
            debug!(merged = ids.len() - points_builder.len(), "duplicated sites merged");
        }
        if points_builder.len() < 2 {
            return Err(Error::TooFewSites {
                count: points_builder.len(),
            });
        }

        Ok(Sweeper {
            points: points_builder.build(),
            bounding_box,
        })
    }
}

/// Main interface, user should grab a new Sweeper by [`SweeperBuilder::build`]
#[derive(Debug, Clone)]
pub struct Sweeper {
    points: Points,
    bounding_box: BoundingBox,
}

impl Sweeper {
    /// number of distinct sites
    pub fn site_count(&self) -> usize {
        self.points.len()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }

    /// Run the sweep with dummy observer
    pub fn compute(self) -> Diagram {
        self.compute_with_observer(&mut ())
    }

    /// Run the sweep with observer
    pub fn compute_with_observer(self, observer: &mut impl Observer) -> Diagram {
        let mut beach_line = BeachLine::with_capacity(self.points.len() * 2);
        let mut dcel = Dcel::new(&self.points);
        let mut events = EventQueue::new(&self.points);

        let mut context = Context::new(&self.points, &mut beach_line, &mut dcel, &mut events);

        debug!(sites = self.points.len(), "sweep started");
        Self::sweep_events(&mut context, observer);
        debug!(
            edges = context.dcel.edge_count(),
            circle_events = context.events.circle_count(),
            beach_line_depth = context.beach_line.depth(),
            "sweep done"
        );
        observer.sweep_done(&context);

        completer::complete(context.dcel, context.points, &self.bounding_box);
        observer.finalized(&context);
        debug!(edges = context.dcel.edge_count(), "diagram finalized");

        Diagram::new(self.points, dcel, self.bounding_box)
    }
}

impl Sweeper {
    fn sweep_events(context: &mut Context, observer: &mut impl Observer) {
        while let Some(event) = context.events.pop() {
            match event {
                Event::Site(site) => {
                    let point = site.get(context.points);
                    context.directrix = point.y;
                    Self::site_event(site, point, context);
                    observer.site_event(site, context);
                }
                Event::Circle(id) => {
                    let circle = *context.events.circle(id);
                    if !context.beach_line.owns_circle_event(circle.arc, id) {
                        trace!(event = id.as_usize(), "stale circle event dropped");
                        observer.stale_circle_event(id, context);
                        continue;
                    }
                    context.directrix = circle.y;
                    Self::circle_event(circle, context);
                    observer.circle_event(id, context);
                }
            }
        }
    }

    /// Add the arc of `site` to the beach line
    fn site_event(site: SiteId, point: Point, context: &mut Context) {
        match context
            .beach_line
            .locate(point.x, context.directrix, context.points)
        {
            Location::Empty => {
                context.beach_line.insert_successor(None, site);
            }
            Location::Before(first) => {
                // sites on the topmost line, arriving from the right
                context.beach_line.insert_successor(None, site);
                let first_site = context.beach_line.arc(first).site;
                let edge = context
                    .dcel
                    .create_edge(context.points, site, first_site, None, None);
                context.beach_line.arc_mut(first).edge = Some(edge);
                context
                    .beach_line
                    .attach_circle_event(first, context.points, context.events);
            }
            Location::After(last) => {
                let arc = context.beach_line.insert_successor(Some(last), site);
                let last_site = context.beach_line.arc(last).site;
                let edge = context
                    .dcel
                    .create_edge(context.points, last_site, site, None, None);
                context.beach_line.arc_mut(arc).edge = Some(edge);
                context
                    .beach_line
                    .attach_circle_event(last, context.points, context.events);
            }
            Location::Inside(arc) => Self::split_arc(arc, site, context),
            Location::Between(left, right) => {
                let left_site = context.beach_line.arc(left).site;
                let right_site = context.beach_line.arc(right).site;

                let Some(vertex) = circumcenter(
                    left_site.get(context.points),
                    point,
                    right_site.get(context.points),
                ) else {
                    debug!(
                        site = site.as_usize(),
                        "breakpoint hit by a collinear site, splitting the left arc"
                    );
                    Self::split_arc(left, site, context);
                    return;
                };
                trace!(site = site.as_usize(), x = vertex.x, y = vertex.y, "site on a breakpoint");

                context.beach_line.detach_circle_event(left);
                context.beach_line.detach_circle_event(right);

                let arc = context.beach_line.insert_successor(Some(left), site);

                // the breakpoint between left and right stops here
                if let Some(edge) = context.beach_line.arc(right).edge {
                    context
                        .dcel
                        .set_edge_start_point(edge, left_site, right_site, vertex);
                }

                let left_edge =
                    context
                        .dcel
                        .create_edge(context.points, left_site, site, None, Some(vertex));
                context.beach_line.arc_mut(arc).edge = Some(left_edge);
                let right_edge =
                    context
                        .dcel
                        .create_edge(context.points, site, right_site, None, Some(vertex));
                context.beach_line.arc_mut(right).edge = Some(right_edge);

                context
                    .beach_line
                    .attach_circle_event(left, context.points, context.events);
                context
                    .beach_line
                    .attach_circle_event(right, context.points, context.events);
            }
        }
    }

    /// Split `arc` in two around the new arc of `site`
    fn split_arc(arc: ArcId, site: SiteId, context: &mut Context) {
        let arc_site = context.beach_line.arc(arc).site;
        context.beach_line.detach_circle_event(arc);

        let middle = context.beach_line.insert_successor(Some(arc), site);
        let right = context.beach_line.insert_successor(Some(middle), arc_site);

        // both new breakpoints trace the same edge, in opposite directions
        let edge = context
            .dcel
            .create_edge(context.points, arc_site, site, None, None);
        context.beach_line.arc_mut(middle).edge = Some(edge);
        context.beach_line.arc_mut(right).edge = Some(edge);

        context
            .beach_line
            .attach_circle_event(arc, context.points, context.events);
        context
            .beach_line
            .attach_circle_event(right, context.points, context.events);
    }

    /// Remove the collapsing arc, and every neighbour collapsing at the same vertex
    fn circle_event(circle: CircleEvent, context: &mut Context) {
        let vertex = circle.center();
        let arc = circle.arc;

        let (Some(mut left), Some(mut right)) = (
            context.beach_line.arc(arc).prev(),
            context.beach_line.arc(arc).next(),
        ) else {
            warn!(arc = arc.as_usize(), "circle event on an outermost arc");
            return;
        };

        let collapsing = &mut context.collapsing_arcs;
        collapsing.clear();
        context.beach_line.remove(arc);
        collapsing.push(arc);

        while Self::collapses_at(left, vertex, context.beach_line, context.events) {
            let Some(prev) = context.beach_line.arc(left).prev() else {
                break;
            };
            context.beach_line.remove(left);
            collapsing.push(left);
            left = prev;
        }
        collapsing.push(left);
        collapsing.reverse();

        while Self::collapses_at(right, vertex, context.beach_line, context.events) {
            let Some(next) = context.beach_line.arc(right).next() else {
                break;
            };
            context.beach_line.remove(right);
            collapsing.push(right);
            right = next;
        }
        collapsing.push(right);

        context.beach_line.detach_circle_event(left);
        context.beach_line.detach_circle_event(right);

        trace!(
            x = vertex.x,
            y = vertex.y,
            arcs = collapsing.len() - 2,
            "vertex created"
        );

        // every breakpoint between the collapsing arcs ends at the vertex
        for pair in collapsing.windows(2) {
            let left_arc = context.beach_line.arc(pair[0]);
            let right_arc = context.beach_line.arc(pair[1]);
            if let Some(edge) = right_arc.edge {
                context
                    .dcel
                    .set_edge_start_point(edge, left_arc.site, right_arc.site, vertex);
            }
        }

        // and a new one starts there between the survivors
        let left_site = context.beach_line.arc(left).site;
        let right_site = context.beach_line.arc(right).site;
        let edge = context
            .dcel
            .create_edge(context.points, left_site, right_site, None, Some(vertex));
        context.beach_line.arc_mut(right).edge = Some(edge);

        context
            .beach_line
            .attach_circle_event(left, context.points, context.events);
        context
            .beach_line
            .attach_circle_event(right, context.points, context.events);
    }

    fn collapses_at(
        arc: ArcId,
        vertex: Point,
        beach_line: &BeachLine,
        events: &EventQueue,
    ) -> bool {
        beach_line.arc(arc).circle_event.is_some_and(|id| {
            let event = events.circle(id);
            eq_eps(event.x, vertex.x) && eq_eps(event.y_center, vertex.y)
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;
    use crate::utils::distance;

    fn signed_area(polygon: &[Point]) -> f64 {
        let n = polygon.len();
        // relative to the first vertex, far away coordinates cancel otherwise
        let o = polygon[0];
        (0..n)
            .map(|i| {
                let (a, b) = (polygon[i], polygon[(i + 1) % n]);
                (a.x - o.x) * (b.y - o.y) - (b.x - o.x) * (a.y - o.y)
            })
            .sum::<f64>()
            / 2.
    }

    /// convex, counter-clockwise polygon contains `p`
    fn encloses(polygon: &[Point], p: Point) -> bool {
        let n = polygon.len();
        (0..n).all(|i| {
            let (a, b) = (polygon[i], polygon[(i + 1) % n]);
            (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x) > -1e-6
        })
    }

    fn assert_valid(diagram: &Diagram, site_count: usize) {
        let bbox = diagram.bounding_box();
        assert_eq!(diagram.cells().len(), site_count);

        let mut total_area = 0.;
        for (site, point) in diagram.sites() {
            let polygon = diagram.cell_polygon(site);
            assert!(polygon.len() >= 3, "open cell {site:?}");

            let area = signed_area(&polygon);
            assert!(area > 0., "cell {site:?} is not counter-clockwise");
            assert!(encloses(&polygon, point), "cell {site:?} misses its site");
            total_area += area;

            let dcel = diagram.dcel();
            let ring = &diagram.cells()[site.as_usize()].half_edges;
            for (i, he) in ring.iter().enumerate() {
                let next = ring[(i + 1) % ring.len()];
                let end = dcel.end_point(*he).unwrap();
                let start = dcel.start_point(next).unwrap();
                assert!(end.eq_eps(&start), "cell {site:?} has a gap");
                assert_eq!(dcel.half_edge(*he).next, Some(next));
            }
        }

        let box_area = bbox.width() * bbox.height();
        assert!(
            (total_area - box_area).abs() < box_area * 1e-9,
            "cells cover {total_area} of {box_area}"
        );

        for (_, edge) in diagram.site_edges() {
            let l = diagram.site(edge.left_site).unwrap();
            let r = diagram.site(edge.right_site.unwrap()).unwrap();
            for v in [edge.va.unwrap(), edge.vb.unwrap()] {
                assert!(bbox.contains_eps(v));
                let (dl, dr) = (distance(v, l), distance(v, r));
                assert!((dl - dr).abs() < 1e-6 * dl.max(1.), "{dl} != {dr}");
            }
        }
    }

    fn snapshot(diagram: &Diagram) -> (Vec<(Option<Point>, Option<Point>)>, Vec<Vec<Point>>) {
        let edges = diagram
            .dcel()
            .iter_edges()
            .map(|(_, e)| (e.va, e.vb))
            .collect();
        let polygons = diagram
            .sites()
            .map(|(site, _)| diagram.cell_polygon(site))
            .collect();
        (edges, polygons)
    }

    #[derive(Default)]
    struct CountingOb {
        sites: usize,
        circles: usize,
        stale: usize,
        sweep_done: usize,
        finalized: usize,
    }

    impl Observer for CountingOb {
        fn site_event(&mut self, _site: SiteId, _context: &Context) {
            self.sites += 1;
        }

        fn circle_event(&mut self, _event: CircleEventId, _context: &Context) {
            self.circles += 1;
        }

        fn stale_circle_event(&mut self, _event: CircleEventId, _context: &Context) {
            self.stale += 1;
        }

        fn sweep_done(&mut self, context: &Context) {
            self.sweep_done += 1;
            assert!(context.events.is_empty());
        }

        fn finalized(&mut self, context: &Context) {
            self.finalized += 1;
            assert!(context.dcel.cells().iter().all(|c| !c.half_edges.is_empty()));
        }
    }

    #[test]
    fn test_four_sites() {
        let sites = vec![
            Point::new(10., 30.),
            Point::new(25., 55.),
            Point::new(45., 50.),
            Point::new(30., 60.),
        ];
        let mut ob = CountingOb::default();
        let diagram = SweeperBuilder::new(sites)
            .bounding_box(BoundingBox::new(0., 100., 0., 100.))
            .build()
            .unwrap()
            .compute_with_observer(&mut ob);

        assert_valid(&diagram, 4);
        assert_eq!(ob.sites, 4);
        assert!(ob.circles >= 1);
        assert_eq!(ob.sweep_done, 1);
        assert_eq!(ob.finalized, 1);
    }

    #[test]
    fn test_two_sites_side_by_side() {
        let diagram = SweeperBuilder::new(vec![Point::new(25., 50.), Point::new(75., 50.)])
            .bounding_box(BoundingBox::new(0., 100., 0., 100.))
            .build()
            .unwrap()
            .compute();

        assert_valid(&diagram, 2);
        let edges = diagram.site_edges().collect::<Vec<_>>();
        assert_eq!(edges.len(), 1);
        let (_, edge) = edges[0];
        assert_eq!(edge.va, Some(Point::new(50., 0.)));
        assert_eq!(edge.vb, Some(Point::new(50., 100.)));

        for (site, _) in diagram.sites() {
            assert_eq!(signed_area(&diagram.cell_polygon(site)), 5000.);
        }
    }

    #[test]
    fn test_two_sites_stacked() {
        let diagram = SweeperBuilder::new(vec![Point::new(50., 75.), Point::new(50., 25.)])
            .bounding_box(BoundingBox::new(0., 100., 0., 100.))
            .build()
            .unwrap()
            .compute();

        assert_valid(&diagram, 2);
        let upper = diagram.sites().next().unwrap().0;
        assert_eq!(
            diagram.cell_polygon(upper),
            vec![
                Point::new(0., 50.),
                Point::new(100., 50.),
                Point::new(100., 100.),
                Point::new(0., 100.),
            ]
        );
    }

    #[test]
    fn test_site_on_a_breakpoint() {
        // the third site lands exactly where the first two arcs meet
        let diagram = SweeperBuilder::new(vec![
            Point::new(0., 10.),
            Point::new(20., 10.),
            Point::new(10., 0.),
        ])
        .bounding_box(BoundingBox::new(-10., 30., -10., 30.))
        .build()
        .unwrap()
        .compute();

        assert_valid(&diagram, 3);
        let vertex = Point::new(10., 10.);
        for (site, _) in diagram.sites() {
            assert!(diagram
                .cell_polygon(site)
                .iter()
                .any(|p| p.eq_eps(&vertex)));
        }
        assert_eq!(diagram.site_edges().count(), 3);
    }

    #[test]
    fn test_grid() {
        // cocircular sites, several arcs collapse at every vertex
        let mut sites = vec![];
        for x in [25., 50., 75.] {
            for y in [25., 50., 75.] {
                sites.push(Point::new(x, y));
            }
        }
        let diagram = SweeperBuilder::new(sites)
            .bounding_box(BoundingBox::new(0., 100., 0., 100.))
            .build()
            .unwrap()
            .compute();

        assert_valid(&diagram, 9);
        let center = diagram
            .sites()
            .find(|(_, p)| *p == Point::new(50., 50.))
            .unwrap()
            .0;
        let polygon = diagram.cell_polygon(center);
        assert_eq!(polygon.len(), 4);
        assert!((signed_area(&polygon) - 625.).abs() < 1e-9);
        assert_eq!(diagram.neighbors(center).len(), 4);
    }

    /// seeded random diagrams with sites in `[origin, origin + extent]²`
    fn check_random(seed: u64, rounds: usize, max_count: usize, origin: f64, extent: f64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let margin = extent / 80.;
        for round in 0..rounds {
            let count = rng.gen_range(2..max_count);
            let sites = (0..count)
                .map(|_| {
                    Point::new(
                        origin + rng.gen_range(0.0..extent),
                        origin + rng.gen_range(0.0..extent),
                    )
                })
                .collect::<Vec<_>>();

            let builder = SweeperBuilder::new(sites);
            let builder = if round % 2 == 0 {
                builder.bounding_box(BoundingBox::new(
                    origin - margin,
                    origin + extent + margin,
                    origin - margin,
                    origin + extent + margin,
                ))
            } else {
                builder
            };
            let mut diagram = builder.build().unwrap().compute();
            assert_valid(&diagram, count);

            let before = snapshot(&diagram);
            diagram.complete();
            assert_eq!(snapshot(&diagram), before);
        }
    }

    #[test]
    fn test_rand() {
        check_random(0x5eed, 20, 300, 0., 800.);
    }

    #[test]
    fn test_rand_small_scale() {
        check_random(0x5ca1e, 20, 300, 0., 1e-3);
    }

    #[test]
    fn test_rand_large_offset() {
        check_random(0x0ff5e7, 20, 300, 1e6, 800.);
    }

    #[test]
    fn test_many_sites_in_a_tiny_box() {
        let mut rng = StdRng::seed_from_u64(0x7177);
        for _ in 0..5 {
            let sites = (0..1000)
                .map(|_| Point::new(rng.gen_range(0.0..0.01), rng.gen_range(0.0..0.01)))
                .collect::<Vec<_>>();
            let diagram = SweeperBuilder::new(sites)
                .bounding_box(BoundingBox::new(0., 0.01, 0., 0.01))
                .build()
                .unwrap()
                .compute();
            assert_valid(&diagram, 1000);
        }
    }

    #[test]
    fn test_duplicated_sites_are_merged() {
        let sweeper = SweeperBuilder::new(vec![
            Point::new(1., 1.),
            Point::new(3., 2.),
            Point::new(1., 1.),
        ])
        .build()
        .unwrap();
        assert_eq!(sweeper.site_count(), 2);
        assert_eq!(
            sweeper.bounding_box(),
            BoundingBox::around([Point::new(1., 1.), Point::new(3., 2.)], DEFAULT_MARGIN_RATIO)
                .unwrap()
        );
        assert_valid(&sweeper.compute(), 2);
    }

    #[test]
    fn test_invalid_input() {
        assert_eq!(
            SweeperBuilder::default().build().unwrap_err(),
            Error::TooFewSites { count: 0 }
        );
        assert_eq!(
            SweeperBuilder::new(vec![Point::new(1., 1.), Point::new(1., 1.)])
                .build()
                .unwrap_err(),
            Error::TooFewSites { count: 1 }
        );
        assert_eq!(
            SweeperBuilder::new(vec![Point::new(1., 1.), Point::new(f64::NAN, 1.)])
                .build()
                .unwrap_err(),
            Error::NonFiniteSite { index: 1 }
        );
        assert_eq!(
            SweeperBuilder::new(vec![Point::new(1., 1.), Point::new(2., 2.)])
                .bounding_box(BoundingBox::new(10., 0., 0., 10.))
                .build()
                .unwrap_err(),
            Error::InvalidBoundingBox {
                xl: 10.,
                xr: 0.,
                yb: 0.,
                yt: 10.
            }
        );
        assert_eq!(
            SweeperBuilder::new(vec![Point::new(1., 1.)])
                .add_sites([Point::new(2., 2.), Point::new(20., 2.)])
                .bounding_box(BoundingBox::new(0., 10., 0., 10.))
                .build()
                .unwrap_err(),
            Error::SiteOutsideBoundingBox { index: 2 }
        );
    }
}
