//! The engine's C ABI, as seen from this side of the boundary.
//!
//! These declarations mirror `tessera_engine.h`. Nothing here knows how the
//! engine is implemented; results are only reachable through the opaque
//! [`CdtResult`] pointer and the functions below.

use std::marker::{PhantomData, PhantomPinned};
use std::os::raw::c_int;

use tessera_geometry::{Edge, Point, Quality, Triangle};

// We rely on these records matching the C layout of the header: three doubles
// for a point, three and two size_t for triangles and edges.
static_assertions::assert_eq_size!(CdtPoint, [f64; 3]);
static_assertions::assert_eq_align!(CdtPoint, f64);
static_assertions::assert_eq_size!(CdtTriangle, [usize; 3]);
static_assertions::assert_eq_size!(CdtEdge, [usize; 2]);

#[derive(Debug, PartialEq, Copy, Clone, Default)]
#[repr(C)]
pub(crate) struct CdtPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
#[repr(C)]
pub(crate) struct CdtTriangle {
    pub v0: usize,
    pub v1: usize,
    pub v2: usize,
}

#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
#[repr(C)]
pub(crate) struct CdtEdge {
    pub v0: usize,
    pub v1: usize,
}

/// Engine-owned triangulation state. Never constructed or dereferenced here.
#[repr(C)]
pub(crate) struct CdtResult {
    _data: [u8; 0],
    _marker: PhantomData<(*mut u8, PhantomPinned)>,
}

pub(crate) const QUALITY_DEFAULT: c_int = 0;
pub(crate) const QUALITY_MODERATE: c_int = 1;

/// Any negative `min_angle` leaves the minimum angle to the quality level.
pub(crate) const MIN_ANGLE_FROM_QUALITY: f64 = -1.0;

pub(crate) const STATUS_INVALID_INPUT: c_int = 1;
pub(crate) const STATUS_INVALID_QUALITY: c_int = 2;
pub(crate) const STATUS_INVALID_COORDINATE: c_int = 3;
pub(crate) const STATUS_INTERSECTING_CONSTRAINTS: c_int = 4;
pub(crate) const STATUS_INTERNAL: c_int = 5;

/// Maps a public quality level to its boundary code.
///
/// There is deliberately no wildcard arm: a new `Quality` variant does not
/// compile until it is given a code here and in the engine.
pub(crate) fn quality_code(quality: Quality) -> c_int {
    match quality {
        Quality::Default => QUALITY_DEFAULT,
        Quality::Moderate => QUALITY_MODERATE,
    }
}

impl From<&Point> for CdtPoint {
    fn from(p: &Point) -> Self {
        CdtPoint {
            x: p.x,
            y: p.y,
            z: p.z,
        }
    }
}

impl From<CdtPoint> for Point {
    fn from(p: CdtPoint) -> Self {
        Point {
            x: p.x,
            y: p.y,
            z: p.z,
        }
    }
}

impl From<CdtTriangle> for Triangle {
    fn from(t: CdtTriangle) -> Self {
        Triangle {
            v0: t.v0,
            v1: t.v1,
            v2: t.v2,
        }
    }
}

impl From<CdtEdge> for Edge {
    fn from(e: CdtEdge) -> Self {
        Edge { v0: e.v0, v1: e.v1 }
    }
}

extern "C" {
    pub(crate) fn cdt_triangulate(
        outer_points: *const CdtPoint,
        outer_count: usize,
        inner_loops: *const *const CdtPoint,
        inner_loop_counts: *const usize,
        num_inner_loops: usize,
        num_hole_loops: usize,
        maxh: f64,
        quality: c_int,
        min_angle: f64,
        enforce_constraints: c_int,
    ) -> *mut CdtResult;

    pub(crate) fn cdt_last_status() -> c_int;

    pub(crate) fn cdt_result_num_points(result: *const CdtResult) -> usize;
    pub(crate) fn cdt_result_num_triangles(result: *const CdtResult) -> usize;
    pub(crate) fn cdt_result_num_edges(result: *const CdtResult) -> usize;

    pub(crate) fn cdt_result_get_points(result: *const CdtResult, buffer: *mut CdtPoint);
    pub(crate) fn cdt_result_get_triangles(result: *const CdtResult, buffer: *mut CdtTriangle);
    pub(crate) fn cdt_result_get_edges(result: *const CdtResult, buffer: *mut CdtEdge);

    pub(crate) fn cdt_result_free(result: *mut CdtResult);
}
