//! Records that cross the C boundary.
//!
//! Field order and widths here are the ABI. Any change must be mirrored in
//! `include/tessera_engine.h` and in every consumer's declarations.

// We rely on these records having the C layout of the header. Catch accidental
// reordering or padding at compile time.
static_assertions::assert_eq_size!(CdtPoint, [f64; 3]);
static_assertions::assert_eq_align!(CdtPoint, f64);
static_assertions::assert_eq_size!(CdtTriangle, [usize; 3]);
static_assertions::assert_eq_size!(CdtEdge, [usize; 2]);

#[derive(Debug, PartialEq, Copy, Clone, Default)]
#[repr(C)]
pub struct CdtPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
#[repr(C)]
pub struct CdtTriangle {
    pub v0: usize,
    pub v1: usize,
    pub v2: usize,
}

#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
#[repr(C)]
pub struct CdtEdge {
    pub v0: usize,
    pub v1: usize,
}

/// Engine-side state behind the opaque `CdtResult*` handle.
///
/// C callers only ever see a pointer to this; the layout is not part of the ABI.
#[derive(Debug, Default, PartialEq)]
pub struct CdtResult {
    pub points: Vec<CdtPoint>,
    pub triangles: Vec<CdtTriangle>,
    pub edges: Vec<CdtEdge>,
}
