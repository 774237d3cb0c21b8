use crate::points::{Points, SiteId};
use crate::shape::Point;

#[derive(Debug, Hash, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct EdgeId(usize);

impl EdgeId {
    pub fn as_usize(&self) -> usize {
        self.0
    }

    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }
}

#[derive(Debug, Hash, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct HalfEdgeId(usize);

impl HalfEdgeId {
    pub fn as_usize(&self) -> usize {
        self.0
    }
}

/// A Voronoi edge between two sites, or between a site and the bounding box.
///
/// Walking from `va` to `vb`, `left_site` is on the left. The edge is open while
/// either vertex is unset.
#[derive(Debug, Clone, Copy)]
pub struct Edge {
    pub left_site: SiteId,
    /// `None` for border edges
    pub right_site: Option<SiteId>,
    pub va: Option<Point>,
    pub vb: Option<Point>,
    /// dropped during clipping, never part of the output
    pub(crate) discarded: bool,
}

impl Edge {
    /// both vertices set
    pub fn is_finished(&self) -> bool {
        self.va.is_some() && self.vb.is_some()
    }

    pub fn is_discarded(&self) -> bool {
        self.discarded
    }

    pub fn is_border(&self) -> bool {
        self.right_site.is_none()
    }

    /// the site across the edge from `site`
    pub fn other_site(&self, site: SiteId) -> Option<SiteId> {
        if self.left_site == site {
            self.right_site
        } else {
            Some(self.left_site)
        }
    }
}

/// One side of an edge, as seen from `site`.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge {
    pub site: SiteId,
    pub edge: EdgeId,
    /// same edge seen from the other site, border half-edges have none
    pub twin: Option<HalfEdgeId>,
    /// neighbours along the closed cell boundary
    pub prev: Option<HalfEdgeId>,
    pub next: Option<HalfEdgeId>,
    /// direction from the site towards the neighbour site, or the outward normal
    /// for border half-edges
    pub angle: f64,
}

#[derive(Debug, Clone)]
pub struct Cell {
    pub site: SiteId,
    /// counter-clockwise once the cell is closed
    pub half_edges: Vec<HalfEdgeId>,
    /// an edge of the cell changed since it was last closed
    pub(crate) close_me: bool,
    pub(crate) closed: bool,
}

/// Edge, half-edge and cell arenas.
#[derive(Debug, Clone)]
pub struct Dcel {
    edges: Vec<Edge>,
    half_edges: Vec<HalfEdge>,
    cells: Vec<Cell>,
}

impl Dcel {
    /// An empty cell for every site
    pub fn new(points: &Points) -> Self {
        Self {
            edges: Vec::with_capacity(points.len() * 3),
            half_edges: Vec::with_capacity(points.len() * 6),
            cells: points
                .iter()
                .map(|(site, _)| Cell {
                    site,
                    half_edges: vec![],
                    close_me: false,
                    closed: false,
                })
                .collect(),
        }
    }

    /// Create the edge between `left` and `right` with a half-edge on each side.
    pub fn create_edge(
        &mut self,
        points: &Points,
        left: SiteId,
        right: SiteId,
        va: Option<Point>,
        vb: Option<Point>,
    ) -> EdgeId {
        let edge_id = EdgeId(self.edges.len());
        self.edges.push(Edge {
            left_site: left,
            right_site: Some(right),
            va: None,
            vb: None,
            discarded: false,
        });

        if let Some(va) = va {
            self.set_edge_start_point(edge_id, left, right, va);
        }
        if let Some(vb) = vb {
            self.set_edge_end_point(edge_id, left, right, vb);
        }

        let lp = left.get(points);
        let rp = right.get(points);
        let left_he = self.push_half_edge(left, edge_id, (rp.y - lp.y).atan2(rp.x - lp.x));
        let right_he = self.push_half_edge(right, edge_id, (lp.y - rp.y).atan2(lp.x - rp.x));
        self.half_edges[left_he.0].twin = Some(right_he);
        self.half_edges[right_he.0].twin = Some(left_he);

        self.cells[left.as_usize()].half_edges.push(left_he);
        self.cells[right.as_usize()].half_edges.push(right_he);

        edge_id
    }

    /// Create a border edge along the bounding box and its half-edge, the half-edge
    /// is not attached to the cell.
    pub fn create_border_edge(&mut self, site: SiteId, va: Point, vb: Point) -> HalfEdgeId {
        let edge_id = EdgeId(self.edges.len());
        self.edges.push(Edge {
            left_site: site,
            right_site: None,
            va: Some(va),
            vb: Some(vb),
            discarded: false,
        });

        // outward normal: travel direction turned clockwise
        let angle = (va.x - vb.x).atan2(vb.y - va.y);
        self.push_half_edge(site, edge_id, angle)
    }

    fn push_half_edge(&mut self, site: SiteId, edge: EdgeId, angle: f64) -> HalfEdgeId {
        let id = HalfEdgeId(self.half_edges.len());
        self.half_edges.push(HalfEdge {
            site,
            edge,
            twin: None,
            prev: None,
            next: None,
            angle,
        });
        id
    }

    /// Set the vertex where the breakpoint between `left` and `right` ends.
    ///
    /// The first vertex set on a bare edge becomes `va`, and the edge's sites are
    /// reordered so the breakpoint's left site stays on the left of `va -> vb`.
    pub fn set_edge_start_point(
        &mut self,
        edge_id: EdgeId,
        left: SiteId,
        right: SiteId,
        vertex: Point,
    ) {
        let edge = &mut self.edges[edge_id.0];
        if edge.va.is_none() && edge.vb.is_none() {
            edge.va = Some(vertex);
            edge.left_site = left;
            edge.right_site = Some(right);
        } else if edge.left_site == right {
            edge.vb = Some(vertex);
        } else {
            edge.va = Some(vertex);
        }
    }

    /// Set the vertex where the breakpoint between `left` and `right` starts.
    pub fn set_edge_end_point(&mut self, edge_id: EdgeId, left: SiteId, right: SiteId, vertex: Point) {
        self.set_edge_start_point(edge_id, right, left, vertex);
    }

    /// Retire the half-edge of `site_a`'s cell facing `site_b`. A half-edge whose
    /// edge is unfinished is preferred when the pair has several.
    ///
    /// Returns false when there is no such half-edge.
    pub fn remove_half_edge(&mut self, site_a: SiteId, site_b: SiteId) -> bool {
        let cell = &self.cells[site_a.as_usize()];
        let facing = |he: &HalfEdgeId| {
            let edge = &self.edges[self.half_edges[he.0].edge.0];
            edge.other_site(site_a) == Some(site_b)
        };

        let position = cell
            .half_edges
            .iter()
            .position(|he| facing(he) && !self.edges[self.half_edges[he.0].edge.0].is_finished())
            .or_else(|| cell.half_edges.iter().position(facing));

        let Some(position) = position else {
            return false;
        };

        let he_id = self.cells[site_a.as_usize()].half_edges.remove(position);
        let HalfEdge { prev, next, .. } = self.half_edges[he_id.0];
        if let Some(prev) = prev {
            self.half_edges[prev.0].next = next;
        }
        if let Some(next) = next {
            self.half_edges[next.0].prev = prev;
        }

        let he = &mut self.half_edges[he_id.0];
        he.prev = None;
        he.next = None;
        true
    }

    /// Link `prev`/`next` around the cell in its current half-edge order
    pub fn link_cell(&mut self, site: SiteId) {
        let Self {
            cells, half_edges, ..
        } = self;
        let ring = &cells[site.as_usize()].half_edges;
        let n = ring.len();
        for (i, he) in ring.iter().enumerate() {
            let half_edge = &mut half_edges[he.0];
            half_edge.prev = Some(ring[(i + n - 1) % n]);
            half_edge.next = Some(ring[(i + 1) % n]);
        }
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }

    pub(crate) fn edge_mut(&mut self, id: EdgeId) -> &mut Edge {
        &mut self.edges[id.0]
    }

    pub fn half_edge(&self, id: HalfEdgeId) -> &HalfEdge {
        &self.half_edges[id.0]
    }

    pub fn cell(&self, site: SiteId) -> &Cell {
        &self.cells[site.as_usize()]
    }

    pub(crate) fn cell_mut(&mut self, site: SiteId) -> &mut Cell {
        &mut self.cells[site.as_usize()]
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// all edges, open ones included
    pub fn iter_edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges
            .iter()
            .enumerate()
            .map(|(idx, e)| (EdgeId(idx), e))
    }

    /// Vertex the half-edge starts from, walking its cell counter-clockwise
    pub fn start_point(&self, id: HalfEdgeId) -> Option<Point> {
        let he = &self.half_edges[id.0];
        let edge = &self.edges[he.edge.0];
        if edge.left_site == he.site {
            edge.va
        } else {
            edge.vb
        }
    }

    /// Vertex the half-edge ends at, walking its cell counter-clockwise
    pub fn end_point(&self, id: HalfEdgeId) -> Option<Point> {
        let he = &self.half_edges[id.0];
        let edge = &self.edges[he.edge.0];
        if edge.left_site == he.site {
            edge.vb
        } else {
            edge.va
        }
    }
}
