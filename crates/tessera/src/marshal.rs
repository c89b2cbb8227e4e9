use std::marker::PhantomData;
use std::ptr;

use tessera_geometry::Point;

use crate::ffi::CdtPoint;

/// Copies a loop into the engine's record layout.
pub(crate) fn flatten(points: &[Point]) -> Vec<CdtPoint> {
    points.iter().map(CdtPoint::from).collect()
}

fn non_empty<L: AsRef<[Point]>>(loops: &[L]) -> impl Iterator<Item = Vec<CdtPoint>> + '_ {
    loops.iter().filter_map(|l| {
        let points: &[Point] = l.as_ref();
        (!points.is_empty()).then(|| flatten(points))
    })
}

/// Inner loops in the order the engine expects: holes first, then constraint
/// loops. Empty loops never make it in.
#[derive(Debug, Default)]
pub(crate) struct LoopSet {
    loops: Vec<Vec<CdtPoint>>,
    num_holes: usize,
}

impl LoopSet {
    pub(crate) fn new<H, B>(holes: &[H], building_loops: &[B]) -> Self
    where
        H: AsRef<[Point]>,
        B: AsRef<[Point]>,
    {
        let mut loops: Vec<Vec<CdtPoint>> = non_empty(holes).collect();
        let num_holes = loops.len();
        loops.extend(non_empty(building_loops));
        Self { loops, num_holes }
    }

    /// Like [`LoopSet::new`], but the holes are passed as plain constraint
    /// loops, so their interiors are meshed.
    pub(crate) fn without_holes<H, B>(holes: &[H], building_loops: &[B]) -> Self
    where
        H: AsRef<[Point]>,
        B: AsRef<[Point]>,
    {
        Self {
            num_holes: 0,
            ..Self::new(holes, building_loops)
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.loops.len()
    }

    pub(crate) fn num_holes(&self) -> usize {
        self.num_holes
    }

    /// Borrows the loops as the parallel pointer and count arrays the engine
    /// takes. The tables cannot outlive `self`.
    pub(crate) fn tables(&self) -> LoopTables<'_> {
        LoopTables {
            pointers: self.loops.iter().map(|l| l.as_ptr()).collect(),
            counts: self.loops.iter().map(Vec::len).collect(),
            _loops: PhantomData,
        }
    }
}

pub(crate) struct LoopTables<'a> {
    pointers: Vec<*const CdtPoint>,
    counts: Vec<usize>,
    _loops: PhantomData<&'a LoopSet>,
}

impl LoopTables<'_> {
    /// Null when there are no loops.
    pub(crate) fn pointers(&self) -> *const *const CdtPoint {
        if self.pointers.is_empty() {
            ptr::null()
        } else {
            self.pointers.as_ptr()
        }
    }

    /// Null when there are no loops.
    pub(crate) fn counts(&self) -> *const usize {
        if self.counts.is_empty() {
            ptr::null()
        } else {
            self.counts.as_ptr()
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.pointers.len()
    }
}
