use std::cell::Cell;
use std::os::raw::c_int;

/// Outcome of the most recent `cdt_triangulate` call on this thread.
///
/// The numeric values are part of the ABI.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[repr(i32)]
pub enum CdtStatus {
    Ok = 0,
    InvalidInput = 1,
    InvalidQuality = 2,
    InvalidCoordinate = 3,
    IntersectingConstraints = 4,
    Internal = 5,
}

thread_local! {
    static LAST_STATUS: Cell<CdtStatus> = const { Cell::new(CdtStatus::Ok) };
}

pub(crate) fn set_last_status(status: CdtStatus) {
    LAST_STATUS.with(|s| s.set(status));
}

pub(crate) fn last_status() -> CdtStatus {
    LAST_STATUS.with(|s| s.get())
}

impl From<CdtStatus> for c_int {
    fn from(status: CdtStatus) -> Self {
        status as c_int
    }
}
