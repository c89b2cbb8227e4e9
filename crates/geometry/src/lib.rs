//! Plain value types shared by the triangulation front end and its callers.
//!
//! Nothing in here talks to the engine. These types only carry data and
//! answer simple measurement questions (counts, areas, containment).

mod geometry;
mod polygon;
mod result;

pub use geometry::*;
pub use polygon::*;
pub use result::*;
