use crate::{beach_line::BeachLine, dcel::Dcel, events::EventQueue, points::Points};

/// Working state of one sweep, handed to [`crate::Observer`] callbacks.
pub struct Context<'a> {
    pub points: &'a Points,
    pub beach_line: &'a mut BeachLine,
    pub dcel: &'a mut Dcel,
    pub events: &'a mut EventQueue,

    /// y of the sweep line
    pub directrix: f64,

    // reusable buffer of arcs collapsing at one vertex, to reduce alloc overhead
    pub(crate) collapsing_arcs: Vec<crate::beach_line::ArcId>,
}

impl<'a> Context<'a> {
    pub fn new(
        points: &'a Points,
        beach_line: &'a mut BeachLine,
        dcel: &'a mut Dcel,
        events: &'a mut EventQueue,
    ) -> Self {
        Self {
            points,
            beach_line,
            dcel,
            events,
            directrix: f64::INFINITY,
            collapsing_arcs: Vec::with_capacity(8),
        }
    }
}
