use std::os::raw::c_int;
use std::panic::{self, AssertUnwindSafe};
use std::ptr;

use crate::mesher::{MeshError, MeshRequest, Quality};
use crate::pslg::Ring;
use crate::records::{CdtEdge, CdtPoint, CdtResult, CdtTriangle};
use crate::status::{last_status, set_last_status, CdtStatus};

/// Reads `count` records starting at `data`. A null pointer reads as empty.
///
/// # Safety
///
/// If `data` is non-null it must point at `count` initialized records that
/// stay alive for `'a`.
unsafe fn read_slice<'a, T>(data: *const T, count: usize) -> &'a [T] {
    if data.is_null() || count == 0 {
        &[]
    } else {
        std::slice::from_raw_parts(data, count)
    }
}

/// Decodes the raw arguments of [`cdt_triangulate`].
///
/// # Safety
///
/// Same contract as [`cdt_triangulate`].
#[allow(clippy::too_many_arguments)]
unsafe fn read_request(
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
) -> Result<MeshRequest, MeshError> {
    let quality = Quality::from_code(quality)?;

    if num_hole_loops > num_inner_loops {
        return Err(MeshError::MalformedLoops(
            "more hole loops than inner loops",
        ));
    }
    if num_inner_loops > 0 && (inner_loops.is_null() || inner_loop_counts.is_null()) {
        return Err(MeshError::MalformedLoops("null loop table"));
    }

    let outer = Ring::new(read_slice(outer_points, outer_count));

    let pointers = read_slice(inner_loops, num_inner_loops);
    let counts = read_slice(inner_loop_counts, num_inner_loops);
    let mut holes = Vec::with_capacity(num_hole_loops);
    let mut building_loops = Vec::with_capacity(num_inner_loops - num_hole_loops);
    for (i, (&data, &count)) in pointers.iter().zip(counts).enumerate() {
        if data.is_null() && count > 0 {
            return Err(MeshError::MalformedLoops("null loop with a non-zero count"));
        }
        let ring = Ring::new(read_slice(data, count));
        if ring.is_empty() {
            continue;
        }
        if i < num_hole_loops {
            holes.push(ring);
        } else {
            building_loops.push(ring);
        }
    }

    Ok(MeshRequest {
        outer,
        holes,
        building_loops,
        maxh,
        quality,
        // Negative means the quality level decides. NaN is passed on and
        // rejected.
        min_angle: if min_angle < 0.0 {
            None
        } else {
            Some(min_angle)
        },
        enforce_constraints: enforce_constraints != 0,
    })
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Triangulates an outer loop with optional hole and constraint loops.
///
/// The first `num_hole_loops` entries of `inner_loops` are holes, the rest are
/// constraint loops. A `maxh` that is not a positive number sets no size
/// limit. A negative `min_angle` leaves the minimum angle to `quality`.
///
/// Returns an owned result handle, or null on failure; the reason for the most
/// recent call on this thread is available from [`cdt_last_status`].
///
/// # Safety
///
/// * `outer_points` must point at `outer_count` records (or be null).
/// * `inner_loops` and `inner_loop_counts` must each point at
///   `num_inner_loops` entries, and every non-null `inner_loops[i]` at
///   `inner_loop_counts[i]` records.
/// * All input memory must stay valid until this function returns. The engine
///   keeps no reference to it afterwards.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn cdt_triangulate(
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
) -> *mut CdtResult {
    // No panic may unwind into the caller's frames.
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let request = read_request(
            outer_points,
            outer_count,
            inner_loops,
            inner_loop_counts,
            num_inner_loops,
            num_hole_loops,
            maxh,
            quality,
            min_angle,
            enforce_constraints,
        )?;
        log::debug!(
            "triangulating {} outer vertices, {} holes, {} constraint loops",
            request.outer.vertices().len(),
            request.holes.len(),
            request.building_loops.len()
        );
        request.triangulate()
    }))
    .unwrap_or_else(|payload| Err(MeshError::Panicked(panic_message(&*payload))));

    match outcome {
        Ok(result) => {
            log::debug!(
                "triangulation produced {} points, {} triangles, {} edges",
                result.points.len(),
                result.triangles.len(),
                result.edges.len()
            );
            set_last_status(CdtStatus::Ok);
            Box::into_raw(Box::new(result))
        }
        Err(e) => {
            log::warn!("triangulation failed: {}", e);
            set_last_status(e.status());
            ptr::null_mut()
        }
    }
}

/// Status of the most recent [`cdt_triangulate`] call on the calling thread.
#[no_mangle]
pub extern "C" fn cdt_last_status() -> c_int {
    last_status().into()
}

/// # Safety
///
/// `result` must be null or a live handle from [`cdt_triangulate`].
#[no_mangle]
pub unsafe extern "C" fn cdt_result_num_points(result: *const CdtResult) -> usize {
    result.as_ref().map_or(0, |r| r.points.len())
}

/// # Safety
///
/// `result` must be null or a live handle from [`cdt_triangulate`].
#[no_mangle]
pub unsafe extern "C" fn cdt_result_num_triangles(result: *const CdtResult) -> usize {
    result.as_ref().map_or(0, |r| r.triangles.len())
}

/// # Safety
///
/// `result` must be null or a live handle from [`cdt_triangulate`].
#[no_mangle]
pub unsafe extern "C" fn cdt_result_num_edges(result: *const CdtResult) -> usize {
    result.as_ref().map_or(0, |r| r.edges.len())
}

/// Copies `src` into `buffer`, which the caller sized from the matching count
/// query.
unsafe fn copy_out<T: Copy>(src: &[T], buffer: *mut T) {
    if !buffer.is_null() {
        ptr::copy_nonoverlapping(src.as_ptr(), buffer, src.len());
    }
}

/// Copies every point into `buffer`.
///
/// # Safety
///
/// `result` must be null or a live handle, and `buffer` must be null or have
/// room for [`cdt_result_num_points`] records.
#[no_mangle]
pub unsafe extern "C" fn cdt_result_get_points(result: *const CdtResult, buffer: *mut CdtPoint) {
    if let Some(r) = result.as_ref() {
        copy_out(&r.points, buffer);
    }
}

/// Copies every triangle into `buffer`.
///
/// # Safety
///
/// `result` must be null or a live handle, and `buffer` must be null or have
/// room for [`cdt_result_num_triangles`] records.
#[no_mangle]
pub unsafe extern "C" fn cdt_result_get_triangles(
    result: *const CdtResult,
    buffer: *mut CdtTriangle,
) {
    if let Some(r) = result.as_ref() {
        copy_out(&r.triangles, buffer);
    }
}

/// Copies every constrained edge into `buffer`.
///
/// # Safety
///
/// `result` must be null or a live handle, and `buffer` must be null or have
/// room for [`cdt_result_num_edges`] records.
#[no_mangle]
pub unsafe extern "C" fn cdt_result_get_edges(result: *const CdtResult, buffer: *mut CdtEdge) {
    if let Some(r) = result.as_ref() {
        copy_out(&r.edges, buffer);
    }
}

/// Releases a result handle. Null is ignored.
///
/// # Safety
///
/// `result` must be null or a live handle from [`cdt_triangulate`]. The
/// handle must not be used, or freed again, afterwards.
#[no_mangle]
pub unsafe extern "C" fn cdt_result_free(result: *mut CdtResult) {
    if !result.is_null() {
        drop(Box::from_raw(result));
    }
}
