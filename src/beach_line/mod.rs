use crate::dcel::EdgeId;
use crate::events::{CircleEventId, EventQueue};
use crate::points::{Points, SiteId};
use crate::utils::{circumcenter, distance, orient_2d, EPSILON};

mod tree;

#[derive(Debug, Hash, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ArcId(usize);

impl ArcId {
    pub fn as_usize(&self) -> usize {
        self.0
    }

    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }
}

/// A parabolic arc of the beach line, owned by `site`.
#[derive(Debug, Clone)]
pub struct Arc {
    pub site: SiteId,
    /// edge traced by the breakpoint between the previous arc and this one
    pub edge: Option<EdgeId>,
    /// pending collapse of this arc
    pub circle_event: Option<CircleEventId>,

    parent: Option<ArcId>,
    left: Option<ArcId>,
    right: Option<ArcId>,
    prev: Option<ArcId>,
    next: Option<ArcId>,
    alive: bool,
}

impl Arc {
    fn new(site: SiteId) -> Self {
        Self {
            site,
            edge: None,
            circle_event: None,
            parent: None,
            left: None,
            right: None,
            prev: None,
            next: None,
            alive: true,
        }
    }

    /// left neighbour on the beach line
    pub fn prev(&self) -> Option<ArcId> {
        self.prev
    }

    /// right neighbour on the beach line
    pub fn next(&self) -> Option<ArcId> {
        self.next
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }
}

/// Where a new site lands on the beach line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// no arc yet
    Empty,
    /// strictly inside an arc
    Inside(ArcId),
    /// exactly on the breakpoint between two arcs
    Between(ArcId, ArcId),
    /// right of the last arc, only happens while sites lie on the sweep line
    After(ArcId),
    /// left of the first arc, sites sharing the topmost line arrive right to left
    Before(ArcId),
}

/// Beach line, a binary search tree of arcs ordered left to right.
///
/// Arcs live in an arena and are never reused, a removed arc is only marked dead.
/// Besides the tree links every arc is threaded to its in-order neighbours.
pub struct BeachLine {
    arcs: Vec<Arc>,
    root: Option<ArcId>,
    len: usize,
}

impl BeachLine {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arcs: Vec::with_capacity(capacity),
            root: None,
            len: 0,
        }
    }

    pub fn arc(&self, id: ArcId) -> &Arc {
        &self.arcs[id.0]
    }

    pub fn arc_mut(&mut self, id: ArcId) -> &mut Arc {
        &mut self.arcs[id.0]
    }

    /// number of arcs currently on the beach line
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// iterate arcs left to right
    pub fn iter(&self) -> impl Iterator<Item = (ArcId, &Arc)> + '_ {
        let mut cursor = self.root.map(|root| self.leftmost(root));
        std::iter::from_fn(move || {
            let id = cursor?;
            let arc = &self.arcs[id.0];
            cursor = arc.next;
            Some((id, arc))
        })
    }

    /// x of the breakpoint on the left of `arc` with the sweep line at `directrix`
    pub fn left_break_point(&self, arc_id: ArcId, directrix: f64, points: &Points) -> f64 {
        let arc = &self.arcs[arc_id.0];
        let site = arc.site.get(points);
        let pr = site.y - directrix;
        // the arc is still a vertical ray at its site
        if pr == 0. {
            return site.x;
        }

        let Some(prev) = arc.prev else {
            return f64::NEG_INFINITY;
        };
        let left_site = self.arcs[prev.0].site.get(points);
        let pl = left_site.y - directrix;
        if pl == 0. {
            return left_site.x;
        }

        // parabolas of both sites meet where
        //   (x - lx)^2 / pl - (x - rx)^2 / pr + (ly - ry) = 0
        // solved for u = x - rx, taking the root where the left arc gives way to the right one
        let hl = left_site.x - site.x;
        let a = 1. / pl - 1. / pr;
        let b = -2. * hl / pl;
        let c = hl * hl / pl + (left_site.y - site.y);

        let u = if a == 0. {
            -c / b
        } else {
            let s = (b * b - 4. * a * c).max(0.).sqrt();
            if b > 0. {
                2. * c / (-b - s)
            } else {
                (-b + s) / (2. * a)
            }
        };

        u + site.x
    }

    /// x of the breakpoint on the right of `arc` with the sweep line at `directrix`
    pub fn right_break_point(&self, arc_id: ArcId, directrix: f64, points: &Points) -> f64 {
        let arc = &self.arcs[arc_id.0];
        if let Some(next) = arc.next {
            return self.left_break_point(next, directrix, points);
        }
        let site = arc.site.get(points);
        if site.y == directrix {
            site.x
        } else {
            f64::INFINITY
        }
    }

    /// Find the arc above `x` with the sweep line at `directrix`
    pub fn locate(&self, x: f64, directrix: f64, points: &Points) -> Location {
        let Some(mut node) = self.root else {
            return Location::Empty;
        };

        loop {
            let arc = &self.arcs[node.0];
            let dxl = self.left_break_point(node, directrix, points) - x;
            if dxl > EPSILON {
                match arc.left {
                    Some(left) => {
                        node = left;
                        continue;
                    }
                    None if arc.prev.is_none() => return Location::Before(node),
                    None => return Location::Inside(node),
                }
            }

            let dxr = x - self.right_break_point(node, directrix, points);
            if dxr > EPSILON {
                match arc.right {
                    Some(right) => {
                        node = right;
                        continue;
                    }
                    None => return Location::After(node),
                }
            }

            return if dxl > -EPSILON {
                match arc.prev {
                    Some(prev) => Location::Between(prev, node),
                    None => Location::Inside(node),
                }
            } else if dxr > -EPSILON {
                match arc.next {
                    Some(next) => Location::Between(node, next),
                    None => Location::After(node),
                }
            } else {
                Location::Inside(node)
            };
        }
    }

    pub fn has_circle_event(&self, arc: ArcId) -> bool {
        self.arcs[arc.0].circle_event.is_some()
    }

    /// Drop the pending circle event of `arc`, its queue entry turns stale
    pub fn detach_circle_event(&mut self, arc: ArcId) {
        self.arcs[arc.0].circle_event = None;
    }

    /// Predict when `arc` collapses between its two neighbours, register and queue it.
    ///
    /// Nothing happens when a neighbour is missing, both neighbours belong to the same
    /// site, the three sites are collinear or the breakpoints diverge.
    pub fn attach_circle_event(
        &mut self,
        arc_id: ArcId,
        points: &Points,
        queue: &mut EventQueue,
    ) -> Option<CircleEventId> {
        let arc = &self.arcs[arc_id.0];
        let (prev, next) = (arc.prev?, arc.next?);
        let left_site = self.arcs[prev.0].site;
        let right_site = self.arcs[next.0].site;
        if left_site == right_site {
            return None;
        }

        let l = left_site.get(points);
        let c = arc.site.get(points);
        let r = right_site.get(points);

        // breakpoints only converge when left, middle, right turn clockwise
        if !orient_2d(l, c, r).is_cw() {
            return None;
        }

        let center = circumcenter(l, c, r)?;
        let radius = distance(center, c);
        if radius <= 0. {
            return None;
        }

        let id = queue.push_circle(arc_id, center, center.y - radius);
        self.arcs[arc_id.0].circle_event = Some(id);
        Some(id)
    }

    /// Whether `event` is still the pending event of its arc
    pub fn owns_circle_event(&self, arc: ArcId, event: CircleEventId) -> bool {
        let arc = &self.arcs[arc.0];
        arc.alive && arc.circle_event == Some(event)
    }
}
