//! Constrained Delaunay triangulation behind a C ABI.
//!
//! The engine wraps [spade]'s constrained Delaunay triangulation and its
//! Delaunay refinement. Consumers never see spade types: they pass flat point
//! arrays in, get an opaque `CdtResult*` back, read it out with the
//! `cdt_result_*` functions and release it with [`cdt_result_free`]. See
//! `include/tessera_engine.h` for the C declarations.
//!
//! On failure [`cdt_triangulate`] returns null and [`cdt_last_status`]
//! reports why.

mod ffi;
mod mesher;
mod pslg;
mod records;
mod status;

pub use ffi::*;
pub use records::*;
pub use status::CdtStatus;
