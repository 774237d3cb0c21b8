use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::beach_line::ArcId;
use crate::points::{Points, SiteId};
use crate::shape::Point;

#[derive(Debug, Hash, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CircleEventId(usize);

impl CircleEventId {
    pub fn as_usize(&self) -> usize {
        self.0
    }
}

/// A predicted collapse of `arc`.
#[derive(Debug, Clone, Copy)]
pub struct CircleEvent {
    /// the arc vanishing at this event
    pub arc: ArcId,
    pub x: f64,
    /// lowest point of the circumcircle, where the sweep line touches it
    pub y: f64,
    pub y_center: f64,
}

impl CircleEvent {
    /// position of the event
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// center of the circumcircle, the Voronoi vertex created by this event
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y_center)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Site(SiteId),
    Circle(CircleEventId),
}

struct Entry {
    x: f64,
    y: f64,
    seq: u64,
    event: Event,
}

impl Entry {
    fn is_circle(&self) -> bool {
        matches!(self.event, Event::Circle(_))
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    /// Greater pops first: higher y, then higher x, then circle before site,
    /// then earlier insertion.
    fn cmp(&self, other: &Self) -> Ordering {
        self.y
            .total_cmp(&other.y)
            .then_with(|| self.x.total_cmp(&other.x))
            .then_with(|| self.is_circle().cmp(&other.is_circle()))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Priority queue over site and circle events.
///
/// Circle events are never removed eagerly, a detached event stays queued and is
/// recognized as stale when popped.
pub struct EventQueue {
    heap: BinaryHeap<Entry>,
    circles: Vec<CircleEvent>,
    /// queued circle events by owner and position
    queued: HashMap<(ArcId, u64, u64), CircleEventId>,
    seq: u64,
}

impl EventQueue {
    /// Seed the queue with every site
    pub fn new(points: &Points) -> Self {
        let mut queue = Self {
            heap: BinaryHeap::with_capacity(points.len() * 2),
            circles: Vec::with_capacity(points.len()),
            queued: HashMap::new(),
            seq: 0,
        };
        for (site_id, point) in points.iter() {
            queue.push(point.x, point.y, Event::Site(site_id));
        }
        queue
    }

    fn push(&mut self, x: f64, y: f64, event: Event) {
        let seq = self.seq;
        self.seq += 1;
        self.heap.push(Entry { x, y, seq, event });
    }

    /// Queue a circle event for `arc`.
    /// When the same arc already has an entry at identical coordinates, that entry's
    /// id is returned and nothing is pushed.
    pub fn push_circle(&mut self, arc: ArcId, center: Point, y: f64) -> CircleEventId {
        let key = (arc, center.x.to_bits(), y.to_bits());
        if let Some(id) = self.queued.get(&key) {
            return *id;
        }

        let id = CircleEventId(self.circles.len());
        self.circles.push(CircleEvent {
            arc,
            x: center.x,
            y,
            y_center: center.y,
        });
        self.queued.insert(key, id);
        self.push(center.x, y, Event::Circle(id));
        id
    }

    /// Remove and return the highest priority event
    pub fn pop(&mut self) -> Option<Event> {
        let entry = self.heap.pop()?;
        if let Event::Circle(id) = entry.event {
            let circle = self.circles[id.as_usize()];
            self.queued
                .remove(&(circle.arc, circle.x.to_bits(), circle.y.to_bits()));
        }
        Some(entry.event)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// number of queued entries, stale circle events included
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn circle(&self, id: CircleEventId) -> &CircleEvent {
        &self.circles[id.as_usize()]
    }

    /// Total circle events created so far
    pub fn circle_count(&self) -> usize {
        self.circles.len()
    }
}
