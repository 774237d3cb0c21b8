use crate::completer;
use crate::dcel::{Cell, Dcel, Edge, EdgeId};
use crate::points::{Points, SiteId};
use crate::shape::{BoundingBox, Point};

/// The result of [`crate::Sweeper::compute`]: closed cells and finished edges
/// inside the bounding box.
#[derive(Debug, Clone)]
pub struct Diagram {
    points: Points,
    dcel: Dcel,
    bounding_box: BoundingBox,
}

impl Diagram {
    pub(crate) fn new(points: Points, dcel: Dcel, bounding_box: BoundingBox) -> Self {
        Self {
            points,
            dcel,
            bounding_box,
        }
    }

    /// distinct sites, in id order
    pub fn sites(&self) -> impl Iterator<Item = (SiteId, Point)> + '_ {
        self.points.iter().map(|(id, p)| (id, *p))
    }

    pub fn site(&self, site: SiteId) -> Option<Point> {
        self.points.get_point(site)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }

    pub fn dcel(&self) -> &Dcel {
        &self.dcel
    }

    /// one cell per site, indexed by site id
    pub fn cells(&self) -> &[Cell] {
        self.dcel.cells()
    }

    /// Finished edges, the ones discarded by clipping are skipped
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.dcel
            .iter_edges()
            .filter(|(_, e)| e.is_finished() && !e.is_discarded())
    }

    /// Edges between two sites, border edges along the box are skipped
    pub fn site_edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges().filter(|(_, e)| !e.is_border())
    }

    /// Counter-clockwise vertices of the cell of `site`
    pub fn cell_polygon(&self, site: SiteId) -> Vec<Point> {
        self.dcel
            .cell(site)
            .half_edges
            .iter()
            .filter_map(|he| self.dcel.start_point(*he))
            .collect()
    }

    /// Sites across the edges of `site`'s cell, in counter-clockwise order
    pub fn neighbors(&self, site: SiteId) -> Vec<SiteId> {
        self.dcel
            .cell(site)
            .half_edges
            .iter()
            .filter_map(|he| {
                let half_edge = self.dcel.half_edge(*he);
                self.dcel.edge(half_edge.edge).other_site(site)
            })
            .collect()
    }

    /// Run completion again, a completed diagram stays unchanged
    pub fn complete(&mut self) {
        completer::complete(&mut self.dcel, &self.points, &self.bounding_box);
    }
}
