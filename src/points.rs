use std::collections::HashMap;

use crate::shape::Point;

/// Type alias to the underlying type for PointId.
/// PointId compare is in hot path, e.g, circle event staleness and edge side checks
type NumType = u32;

/// new type for site id, it is the index in `Points`
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct PointId(pub(crate) NumType);

/// Sites are the only points with identity
pub type SiteId = PointId;

impl PointId {
    /// Get the inner value as usize
    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }

    /// Get the inner value as u32
    pub fn as_u32(&self) -> u32 {
        self.0
    }

    /// helper method used in the crate when the `PointId` is known to be issued by `points`
    pub(crate) fn get(&self, points: &Points) -> Point {
        points.points[self.as_usize()]
    }
}

/// Issues site ids. Ids follow insertion order, a point equal to an earlier one
/// gets the earlier id back.
#[derive(Clone, Default)]
pub struct PointsBuilder {
    points: Vec<Point>,
    issued: HashMap<(u64, u64), PointId>,
}

impl PointsBuilder {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            points: Vec::with_capacity(cap),
            issued: HashMap::with_capacity(cap),
        }
    }

    /// Add a site, returns its id
    pub fn add_point(&mut self, point: Point) -> PointId {
        // +0.0 and -0.0 are the same site
        let key = ((point.x + 0.).to_bits(), (point.y + 0.).to_bits());
        if let Some(id) = self.issued.get(&key) {
            return *id;
        }

        let point_id = PointId(self.points.len() as NumType);
        self.points.push(point);
        self.issued.insert(key, point_id);
        point_id
    }

    /// Add multiple points, batch version of `Self::add_point`
    pub fn add_points(&mut self, points: impl IntoIterator<Item = Point>) -> Vec<PointId> {
        points.into_iter().map(|p| self.add_point(p)).collect()
    }

    /// Number of distinct points added so far
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn build(self) -> Points {
        Points {
            points: self.points,
        }
    }
}

/// Site store
#[derive(Clone, Debug)]
pub struct Points {
    points: Vec<Point>,
}

impl Points {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// get point for id
    pub fn get_point(&self, point_id: PointId) -> Option<Point> {
        self.points.get(point_id.as_usize()).cloned()
    }

    /// iter all points
    pub fn iter(&self) -> impl Iterator<Item = (PointId, &Point)> {
        self.points
            .iter()
            .enumerate()
            .map(|(idx, p)| (PointId(idx as NumType), p))
    }
}
