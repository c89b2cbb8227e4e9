//! Constrained Delaunay triangulation of polygonal regions.
//!
//! The meshing itself happens behind a small C ABI exported by
//! `tessera-engine`. This crate owns everything on the near side of it:
//! flattening loops into boundary records, holding the engine's result handle,
//! and copying the result back into owned Rust values.
//!
//! ```no_run
//! use tessera::{triangulate, Point, Quality};
//!
//! let outer = vec![
//!     Point::planar(0.0, 0.0),
//!     Point::planar(4.0, 0.0),
//!     Point::planar(4.0, 4.0),
//!     Point::planar(0.0, 4.0),
//!     Point::planar(0.0, 0.0),
//! ];
//! let mesh = triangulate(&outer, &[], &[], 1.0, Quality::Moderate, true)?;
//! println!("{} triangles", mesh.num_triangles());
//! # Ok::<(), tessera::Error>(())
//! ```

// Provides the `cdt_*` symbols declared in `ffi`. Nothing is called through
// Rust paths.
extern crate tessera_engine;

mod error;
mod ffi;
mod handle;
mod marshal;
mod triangulate;

pub use error::{Error, FailureReason};
pub use tessera_geometry::{Edge, Point, PolygonLoop, Quality, Triangle, TriangulationResult};
pub use triangulate::{
    triangulate, triangulate_with_options, TriangulationOptions, TriangulationRequest,
};
