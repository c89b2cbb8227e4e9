use std::ptr::NonNull;

use tessera_geometry::TriangulationResult;

use crate::ffi::{self, CdtResult};

/// Sole owner of an engine result handle.
///
/// Not `Clone`: two owners would free the handle twice. The raw pointer keeps
/// it off other threads, since the engine makes no promise about that.
#[derive(Debug)]
pub(crate) struct EngineResult {
    raw: NonNull<CdtResult>,
}

impl EngineResult {
    /// Takes ownership of `raw`. Null means the engine produced nothing.
    ///
    /// # Safety
    ///
    /// `raw` must be null or a live handle from `cdt_triangulate` that nobody
    /// else will free.
    pub(crate) unsafe fn from_raw(raw: *mut CdtResult) -> Option<Self> {
        NonNull::new(raw).map(|raw| EngineResult { raw })
    }

    fn as_ptr(&self) -> *const CdtResult {
        self.raw.as_ptr()
    }

    /// Copies the whole result out of the engine.
    ///
    /// Sizes are queried first and buffers allocated to match; only then does
    /// the engine copy into them. A collection reported empty is never
    /// requested.
    pub(crate) fn materialize(&self) -> TriangulationResult {
        let handle = self.as_ptr();
        // Safety: `handle` is live for as long as `self` is.
        let (num_points, num_triangles, num_edges) = unsafe {
            (
                ffi::cdt_result_num_points(handle),
                ffi::cdt_result_num_triangles(handle),
                ffi::cdt_result_num_edges(handle),
            )
        };

        // Safety: each buffer is sized from the matching count above.
        let points = read_records(num_points, |buf| unsafe {
            ffi::cdt_result_get_points(handle, buf)
        });
        let triangles = read_records(num_triangles, |buf| unsafe {
            ffi::cdt_result_get_triangles(handle, buf)
        });
        let edges = read_records(num_edges, |buf| unsafe {
            ffi::cdt_result_get_edges(handle, buf)
        });

        TriangulationResult {
            points: points.into_iter().map(Into::into).collect(),
            triangles: triangles.into_iter().map(Into::into).collect(),
            edges: edges.into_iter().map(Into::into).collect(),
        }
    }
}

/// Allocates `count` records and lets `fill` write into them.
fn read_records<T, F>(count: usize, fill: F) -> Vec<T>
where
    T: Copy + Default,
    F: FnOnce(*mut T),
{
    if count == 0 {
        return Vec::new();
    }
    let mut buffer = vec![T::default(); count];
    fill(buffer.as_mut_ptr());
    buffer
}

impl Drop for EngineResult {
    fn drop(&mut self) {
        log::trace!("releasing engine result {:p}", self.raw);
        // Safety: we are the only owner and this runs exactly once.
        unsafe { ffi::cdt_result_free(self.raw.as_ptr()) }
    }
}
