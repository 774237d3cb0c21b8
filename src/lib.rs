mod beach_line;
mod completer;
mod context;
mod dcel;
mod diagram;
mod error;
mod events;
pub mod loader;
mod points;
mod shape;
mod sweeper;
mod utils;
pub use sweeper::{Observer, Sweeper, SweeperBuilder, DEFAULT_MARGIN_RATIO};

/// exported to enable observer
pub use beach_line::{Arc, ArcId, BeachLine, Location};
pub use context::Context;
pub use dcel::{Cell, Dcel, Edge, EdgeId, HalfEdge, HalfEdgeId};
pub use diagram::Diagram;
pub use error::Error;
pub use events::{CircleEvent, CircleEventId, EventQueue};
pub use points::{PointId, Points, SiteId};
pub use shape::{BoundingBox, Point};
pub use utils::EPSILON;
