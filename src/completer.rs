//! Turns the unbounded sweep result into closed cells inside the bounding box.
//!
//! Passes run in order: every open edge is connected to the box, every edge is
//! clipped to the box, then every touched cell is closed along the box border.
//! Running the passes again on a completed diagram changes nothing.

use tracing::{trace, warn};

use crate::dcel::{Dcel, Edge, EdgeId, HalfEdgeId};
use crate::points::{Points, SiteId};
use crate::shape::{BoundingBox, Point};
use crate::utils::{eq_eps, gt_eps, lt_eps};

/// Run all completion passes
pub fn complete(dcel: &mut Dcel, points: &Points, bbox: &BoundingBox) {
    clip_edges(dcel, points, bbox);
    close_cells(dcel, bbox);
}

/// Give the open end of `edge` a vertex on the bounding box.
///
/// Returns false when the edge's ray never meets the box.
pub fn connect_edge(edge: &mut Edge, points: &Points, bbox: &BoundingBox) -> bool {
    if edge.vb.is_some() {
        return true;
    }
    let Some(right_site) = edge.right_site else {
        return false;
    };

    let BoundingBox { xl, xr, yb, yt } = *bbox;
    let l = edge.left_site.get(points);
    let r = right_site.get(points);
    let fx = (l.x + r.x) / 2.;
    let fy = (l.y + r.y) / 2.;

    // walking va -> vb keeps the left site on the left, the direction is (ly - ry, rx - lx)
    let mut va = edge.va;
    let vb;

    if r.y == l.y {
        // vertical bisector
        if fx < xl || fx >= xr {
            return false;
        }
        if l.x > r.x {
            // downward
            match va {
                Some(v) if v.y <= yb => return false,
                Some(v) if v.y <= yt => {}
                _ => va = Some(Point::new(fx, yt)),
            }
            vb = Point::new(fx, yb);
        } else {
            // upward
            match va {
                Some(v) if v.y >= yt => return false,
                Some(v) if v.y >= yb => {}
                _ => va = Some(Point::new(fx, yb)),
            }
            vb = Point::new(fx, yt);
        }
    } else {
        let fm = (l.x - r.x) / (r.y - l.y);
        let fb = fy - fm * fx;

        if !(-1. ..=1.).contains(&fm) {
            // closer to vertical
            if l.x > r.x {
                // downward
                match va {
                    Some(v) if v.y <= yb => return false,
                    Some(v) if v.y <= yt => {}
                    _ => va = Some(Point::new((yt - fb) / fm, yt)),
                }
                vb = Point::new((yb - fb) / fm, yb);
            } else {
                // upward
                match va {
                    Some(v) if v.y >= yt => return false,
                    Some(v) if v.y >= yb => {}
                    _ => va = Some(Point::new((yb - fb) / fm, yb)),
                }
                vb = Point::new((yt - fb) / fm, yt);
            }
        } else if l.y > r.y {
            // closer to horizontal, rightward
            match va {
                Some(v) if v.x >= xr => return false,
                Some(v) if v.x >= xl => {}
                _ => va = Some(Point::new(xl, fm * xl + fb)),
            }
            vb = Point::new(xr, fm * xr + fb);
        } else {
            // closer to horizontal, leftward
            match va {
                Some(v) if v.x < xl => return false,
                Some(v) if v.x <= xr => {}
                _ => va = Some(Point::new(xr, fm * xr + fb)),
            }
            vb = Point::new(xl, fm * xl + fb);
        }
    }

    edge.va = va;
    edge.vb = Some(vb);
    true
}

/// Liang-Barsky clip of a finished edge against the bounding box.
///
/// Returns false when nothing of the edge is inside the box.
pub fn clip_edge(edge: &mut Edge, bbox: &BoundingBox) -> bool {
    let (Some(va), Some(vb)) = (edge.va, edge.vb) else {
        return false;
    };

    let dx = vb.x - va.x;
    let dy = vb.y - va.y;
    let mut t0 = 0.;
    let mut t1 = 1.;

    // left, right, bottom, top
    let p = [-dx, dx, -dy, dy];
    let q = [
        va.x - bbox.xl,
        bbox.xr - va.x,
        va.y - bbox.yb,
        bbox.yt - va.y,
    ];

    for (p, q) in p.into_iter().zip(q) {
        if p == 0. {
            if q < 0. {
                return false;
            }
            continue;
        }

        let r = q / p;
        if p < 0. {
            if r > t1 {
                return false;
            }
            if r > t0 {
                t0 = r;
            }
        } else {
            if r < t0 {
                return false;
            }
            if r < t1 {
                t1 = r;
            }
        }
    }

    if t0 > 0. {
        edge.va = Some(Point::new(va.x + t0 * dx, va.y + t0 * dy));
    }
    if t1 < 1. {
        edge.vb = Some(Point::new(va.x + t1 * dx, va.y + t1 * dy));
    }
    true
}

/// Connect and clip every site edge, discarding the ones outside the box
pub fn clip_edges(dcel: &mut Dcel, points: &Points, bbox: &BoundingBox) {
    for index in 0..dcel.edge_count() {
        let id = EdgeId::from_index(index);
        let before = *dcel.edge(id);
        let Some(right_site) = before.right_site else {
            continue;
        };
        if before.discarded {
            continue;
        }

        let mut edge = before;
        let keep = connect_edge(&mut edge, points, bbox)
            && clip_edge(&mut edge, bbox)
            && !matches!((edge.va, edge.vb), (Some(va), Some(vb)) if va.eq_eps(&vb));

        if keep {
            // moves within EPSILON are rounding noise, a completed edge stays as it is
            if moved(before.va, edge.va) || moved(before.vb, edge.vb) {
                *dcel.edge_mut(id) = edge;
                mark_close(dcel, before.left_site, right_site);
            }
            continue;
        }

        trace!(edge = index, "edge outside the bounding box discarded");
        let discarded = dcel.edge_mut(id);
        discarded.va = None;
        discarded.vb = None;
        discarded.discarded = true;
        dcel.remove_half_edge(before.left_site, right_site);
        dcel.remove_half_edge(right_site, before.left_site);
        mark_close(dcel, before.left_site, right_site);
    }
}

fn moved(from: Option<Point>, to: Option<Point>) -> bool {
    match (from, to) {
        (Some(from), Some(to)) => !from.eq_eps(&to),
        (from, to) => from.is_some() != to.is_some(),
    }
}

fn mark_close(dcel: &mut Dcel, a: SiteId, b: SiteId) {
    dcel.cell_mut(a).close_me = true;
    dcel.cell_mut(b).close_me = true;
}

/// The box side a border walk continues along from a vertex, in walking order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Bottom,
    Right,
    Top,
}

impl Side {
    /// Side to walk from `v`, corners belong to the side the walk leaves them on
    fn of(v: Point, bbox: &BoundingBox) -> Option<Self> {
        if eq_eps(v.x, bbox.xl) && gt_eps(v.y, bbox.yb) {
            Some(Side::Left)
        } else if eq_eps(v.y, bbox.yb) && lt_eps(v.x, bbox.xr) {
            Some(Side::Bottom)
        } else if eq_eps(v.x, bbox.xr) && lt_eps(v.y, bbox.yt) {
            Some(Side::Right)
        } else if eq_eps(v.y, bbox.yt) && gt_eps(v.x, bbox.xl) {
            Some(Side::Top)
        } else {
            None
        }
    }

    fn next(self) -> Self {
        match self {
            Side::Left => Side::Bottom,
            Side::Bottom => Side::Right,
            Side::Right => Side::Top,
            Side::Top => Side::Left,
        }
    }

    /// End of the walk along this side towards `target`, and whether `target` is reached
    fn walk_to(self, target: Point, bbox: &BoundingBox) -> (Point, bool) {
        match self {
            Side::Left => {
                let last = eq_eps(target.x, bbox.xl);
                (Point::new(bbox.xl, if last { target.y } else { bbox.yb }), last)
            }
            Side::Bottom => {
                let last = eq_eps(target.y, bbox.yb);
                (Point::new(if last { target.x } else { bbox.xr }, bbox.yb), last)
            }
            Side::Right => {
                let last = eq_eps(target.x, bbox.xr);
                (Point::new(bbox.xr, if last { target.y } else { bbox.yt }), last)
            }
            Side::Top => {
                let last = eq_eps(target.y, bbox.yt);
                (Point::new(if last { target.x } else { bbox.xl }, bbox.yt), last)
            }
        }
    }
}

/// Close every touched cell with border edges and order it counter-clockwise
pub fn close_cells(dcel: &mut Dcel, bbox: &BoundingBox) {
    for index in 0..dcel.cells().len() {
        let cell = &dcel.cells()[index];
        if cell.closed && !cell.close_me {
            continue;
        }
        let site = cell.site;

        let mut ring: Vec<HalfEdgeId> = cell
            .half_edges
            .iter()
            .copied()
            .filter(|he| dcel.edge(dcel.half_edge(*he).edge).is_finished())
            .collect();
        ring.sort_by(|a, b| {
            dcel.half_edge(*a)
                .angle
                .total_cmp(&dcel.half_edge(*b).angle)
        });

        close_ring(dcel, site, &mut ring, bbox);

        let cell = dcel.cell_mut(site);
        cell.half_edges = ring;
        cell.close_me = false;
        cell.closed = true;
        dcel.link_cell(site);
    }
}

fn close_ring(dcel: &mut Dcel, site: SiteId, ring: &mut Vec<HalfEdgeId>, bbox: &BoundingBox) {
    let mut i = 0;
    while i < ring.len() {
        let (Some(mut va), Some(vz)) = (
            dcel.end_point(ring[i]),
            dcel.start_point(ring[(i + 1) % ring.len()]),
        ) else {
            i += 1;
            continue;
        };

        if !va.eq_eps(&vz) {
            let Some(mut side) = Side::of(va, bbox) else {
                warn!(
                    site = site.as_usize(),
                    x = va.x,
                    y = va.y,
                    "open cell vertex is not on the bounding box"
                );
                i += 1;
                continue;
            };

            trace!(site = site.as_usize(), ?side, "closing cell along the border");
            // at most one full turn around the box
            for _ in 0..5 {
                let (vb, last) = side.walk_to(vz, bbox);
                let he = dcel.create_border_edge(site, va, vb);
                i += 1;
                ring.insert(i, he);
                if last {
                    break;
                }
                va = vb;
                side = side.next();
            }
        }
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::points::PointsBuilder;

    fn bbox() -> BoundingBox {
        BoundingBox::new(0., 100., 0., 100.)
    }

    fn open_edge(points: &mut PointsBuilder, l: Point, r: Point) -> Edge {
        Edge {
            left_site: points.add_point(l),
            right_site: Some(points.add_point(r)),
            va: None,
            vb: None,
            discarded: false,
        }
    }

    #[test]
    fn test_connect_vertical_bisector() {
        let mut builder = PointsBuilder::default();
        // left site west of right site, bisector runs upward
        let mut edge = open_edge(&mut builder, Point::new(40., 50.), Point::new(60., 50.));
        let points = builder.build();
        assert!(connect_edge(&mut edge, &points, &bbox()));
        assert_eq!(edge.va, Some(Point::new(50., 0.)));
        assert_eq!(edge.vb, Some(Point::new(50., 100.)));
    }

    #[test]
    fn test_connect_keeps_existing_vertex() {
        let mut builder = PointsBuilder::default();
        // left site east of right site, bisector runs downward from va
        let mut edge = open_edge(&mut builder, Point::new(60., 50.), Point::new(40., 50.));
        edge.va = Some(Point::new(50., 30.));
        let points = builder.build();
        assert!(connect_edge(&mut edge, &points, &bbox()));
        assert_eq!(edge.va, Some(Point::new(50., 30.)));
        assert_eq!(edge.vb, Some(Point::new(50., 0.)));
    }

    #[test]
    fn test_connect_ray_leaving_the_box() {
        let mut builder = PointsBuilder::default();
        let mut edge = open_edge(&mut builder, Point::new(60., 50.), Point::new(40., 50.));
        // downward ray starting below the box
        edge.va = Some(Point::new(50., -10.));
        let points = builder.build();
        assert!(!connect_edge(&mut edge, &points, &bbox()));

        let mut builder = PointsBuilder::default();
        // bisector x = 150 never crosses the box
        let mut edge = open_edge(&mut builder, Point::new(140., 50.), Point::new(160., 50.));
        let points = builder.build();
        assert!(!connect_edge(&mut edge, &points, &bbox()));
    }

    #[test]
    fn test_connect_shallow_and_steep() {
        let mut builder = PointsBuilder::default();
        // left site above right site: horizontal bisector y = 50 walking rightward
        let mut edge = open_edge(&mut builder, Point::new(50., 60.), Point::new(50., 40.));
        let points = builder.build();
        assert!(connect_edge(&mut edge, &points, &bbox()));
        assert_eq!(edge.va, Some(Point::new(0., 50.)));
        assert_eq!(edge.vb, Some(Point::new(100., 50.)));

        let mut builder = PointsBuilder::default();
        // slope -2 bisector through (50, 50), walking downward
        let mut edge = open_edge(&mut builder, Point::new(60., 55.), Point::new(40., 45.));
        let points = builder.build();
        assert!(connect_edge(&mut edge, &points, &bbox()));
        assert_eq!(edge.va, Some(Point::new(25., 100.)));
        assert_eq!(edge.vb, Some(Point::new(75., 0.)));
    }

    #[test]
    fn test_clip_edge() {
        let mut builder = PointsBuilder::default();
        let mut edge = open_edge(&mut builder, Point::new(0., 0.), Point::new(1., 1.));

        edge.va = Some(Point::new(-50., 50.));
        edge.vb = Some(Point::new(150., 50.));
        assert!(clip_edge(&mut edge, &bbox()));
        assert_eq!(edge.va, Some(Point::new(0., 50.)));
        assert_eq!(edge.vb, Some(Point::new(100., 50.)));

        // inside, untouched
        edge.va = Some(Point::new(10., 10.));
        edge.vb = Some(Point::new(20., 30.));
        assert!(clip_edge(&mut edge, &bbox()));
        assert_eq!(edge.va, Some(Point::new(10., 10.)));
        assert_eq!(edge.vb, Some(Point::new(20., 30.)));

        // entirely outside
        edge.va = Some(Point::new(-10., 110.));
        edge.vb = Some(Point::new(10., 130.));
        assert!(!clip_edge(&mut edge, &bbox()));

        // parallel to a side, outside of it
        edge.va = Some(Point::new(-10., 10.));
        edge.vb = Some(Point::new(-10., 90.));
        assert!(!clip_edge(&mut edge, &bbox()));
    }

    #[test]
    fn test_side_walk() {
        let b = bbox();
        assert_eq!(Side::of(Point::new(0., 40.), &b), Some(Side::Left));
        // corners belong to the side the walk leaves them on
        assert_eq!(Side::of(Point::new(0., 0.), &b), Some(Side::Bottom));
        assert_eq!(Side::of(Point::new(100., 0.), &b), Some(Side::Right));
        assert_eq!(Side::of(Point::new(100., 100.), &b), Some(Side::Top));
        assert_eq!(Side::of(Point::new(0., 100.), &b), Some(Side::Left));
        assert_eq!(Side::of(Point::new(50., 50.), &b), None);

        assert_eq!(
            Side::Left.walk_to(Point::new(0., 10.), &b),
            (Point::new(0., 10.), true)
        );
        assert_eq!(
            Side::Left.walk_to(Point::new(60., 0.), &b),
            (Point::new(0., 0.), false)
        );
        assert_eq!(Side::Top.next(), Side::Left);
    }

    #[test]
    fn test_close_two_cells() {
        let mut builder = PointsBuilder::default();
        let west = builder.add_point(Point::new(25., 50.));
        let east = builder.add_point(Point::new(75., 50.));
        let points = builder.build();

        let mut dcel = Dcel::new(&points);
        dcel.create_edge(&points, west, east, None, None);
        complete(&mut dcel, &points, &bbox());

        let polygon = |site: SiteId| -> Vec<Point> {
            dcel.cell(site)
                .half_edges
                .iter()
                .map(|he| dcel.start_point(*he).unwrap())
                .collect()
        };

        // west cell: bisector running upward, then the border from the top back down
        assert_eq!(
            polygon(west),
            vec![
                Point::new(50., 0.),
                Point::new(50., 100.),
                Point::new(0., 100.),
                Point::new(0., 0.),
            ]
        );
        assert_eq!(
            polygon(east),
            vec![
                Point::new(50., 100.),
                Point::new(50., 0.),
                Point::new(100., 0.),
                Point::new(100., 100.),
            ]
        );

        for site in [west, east] {
            let ring = &dcel.cell(site).half_edges;
            for (i, he) in ring.iter().enumerate() {
                let next = ring[(i + 1) % ring.len()];
                assert_eq!(dcel.half_edge(*he).next, Some(next));
                assert!(dcel
                    .end_point(*he)
                    .unwrap()
                    .eq_eps(&dcel.start_point(next).unwrap()));
            }
        }
    }
}
