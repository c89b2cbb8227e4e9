use std::collections::HashSet;

use float_eq::float_eq;
use ordered_float::OrderedFloat;
use robust::{orient2d, Coord};

use crate::records::CdtPoint;

/// Loops whose first and last point are this close are already closed.
const CLOSE_TOLERANCE: f64 = 1e-10;

/// A closed loop with the closing repeat removed.
///
/// Ex, the input {A, B, C, A} is stored as {A, B, C} and yields the segments
/// A->B, B->C, C->A. An input that was never closed ({A, B, C}) is stored the
/// same way.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ring {
    vertices: Vec<CdtPoint>,
}

impl Ring {
    pub fn new(points: &[CdtPoint]) -> Self {
        let mut vertices = points.to_vec();
        if let (Some(first), Some(last)) = (points.first(), points.last()) {
            if points.len() > 1
                && float_eq!(first.x, last.x, abs <= CLOSE_TOLERANCE)
                && float_eq!(first.y, last.y, abs <= CLOSE_TOLERANCE)
            {
                vertices.pop();
            }
        }
        Self { vertices }
    }

    pub fn vertices(&self) -> &[CdtPoint] {
        &self.vertices
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        // A single point has no segments.
        let n = if self.vertices.len() > 1 {
            self.vertices.len()
        } else {
            0
        };
        (0..n).map(move |i| Segment {
            a: self.vertices[i],
            b: self.vertices[(i + 1) % n],
        })
    }

    /// Even-odd containment test. Boundary points may land on either side, so
    /// callers should only ask about points known to be off the boundary.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.segments().fold(false, |inside, Segment { a, b }| {
            if (a.y > y) != (b.y > y) && x < a.x + (y - a.y) * (b.x - a.x) / (b.y - a.y) {
                !inside
            } else {
                inside
            }
        })
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Segment {
    pub a: CdtPoint,
    pub b: CdtPoint,
}

type SegmentKey = [(OrderedFloat<f64>, OrderedFloat<f64>); 2];

fn coord(p: CdtPoint) -> Coord<f64> {
    Coord { x: p.x, y: p.y }
}

fn opposite(d0: f64, d1: f64) -> bool {
    (d0 > 0.0 && d1 < 0.0) || (d0 < 0.0 && d1 > 0.0)
}

impl Segment {
    fn is_degenerate(&self) -> bool {
        self.a.x == self.b.x && self.a.y == self.b.y
    }

    /// Direction independent identity of this segment.
    fn key(&self) -> SegmentKey {
        let a = (OrderedFloat(self.a.x), OrderedFloat(self.a.y));
        let b = (OrderedFloat(self.b.x), OrderedFloat(self.b.y));
        if a <= b {
            [a, b]
        } else {
            [b, a]
        }
    }

    fn min_x(&self) -> f64 {
        self.a.x.min(self.b.x)
    }

    fn max_x(&self) -> f64 {
        self.a.x.max(self.b.x)
    }

    fn bounds_overlap(&self, other: &Segment) -> bool {
        let (x0, x1) = (self.a.x.min(self.b.x), self.a.x.max(self.b.x));
        let (y0, y1) = (self.a.y.min(self.b.y), self.a.y.max(self.b.y));
        other.a.x.max(other.b.x) >= x0
            && other.a.x.min(other.b.x) <= x1
            && other.a.y.max(other.b.y) >= y0
            && other.a.y.min(other.b.y) <= y1
    }

    /// Length of the shared part of two collinear segments, measured along the
    /// dominant axis of `self`. Negative if they are disjoint.
    fn collinear_overlap(&self, other: &Segment) -> f64 {
        let along_x = (self.b.x - self.a.x).abs() >= (self.b.y - self.a.y).abs();
        let project = |p: CdtPoint| if along_x { p.x } else { p.y };
        let (s0, s1) = (project(self.a), project(self.b));
        let (t0, t1) = (project(other.a), project(other.b));
        s0.max(s1).min(t0.max(t1)) - s0.min(s1).max(t0.min(t1))
    }

    /// Two distinct segments conflict if they cross at a point interior to
    /// both, or if they are collinear and share more than a single point.
    ///
    /// Touching at an endpoint, or an endpoint landing on the other segment
    /// (a T junction), is fine: the triangulation splits the constraint there.
    pub fn conflicts_with(&self, other: &Segment) -> bool {
        if !self.bounds_overlap(other) {
            return false;
        }
        let (p, q) = (coord(self.a), coord(self.b));
        let (r, s) = (coord(other.a), coord(other.b));
        let d_r = orient2d(p, q, r);
        let d_s = orient2d(p, q, s);
        if d_r == 0.0 && d_s == 0.0 {
            return self.collinear_overlap(other) > 0.0;
        }
        opposite(d_r, d_s) && opposite(orient2d(r, s, p), orient2d(r, s, q))
    }
}

/// Looks for a pair of constraint segments that cannot both be enforced.
///
/// Segments that appear in several loops (ex, a wall shared by two adjacent
/// buildings) are only considered once, so identical overlaps are accepted.
///
/// Segments are swept in order of their left end, so each one is only tested
/// against the segments whose x range overlaps its own.
pub fn find_conflict<'a, I>(rings: I) -> Option<(Segment, Segment)>
where
    I: IntoIterator<Item = &'a Ring>,
{
    let mut seen = HashSet::<SegmentKey>::new();
    let mut segments: Vec<Segment> = rings
        .into_iter()
        .flat_map(|ring| ring.segments())
        .filter(|s| !s.is_degenerate())
        .filter(|s| seen.insert(s.key()))
        .collect();
    segments.sort_by_key(|s| OrderedFloat(s.min_x()));

    for (i, s) in segments.iter().enumerate() {
        let max_x = s.max_x();
        let conflict = segments[i + 1..]
            .iter()
            .take_while(|t| t.min_x() <= max_x)
            .find(|t| s.conflicts_with(t));
        if let Some(t) = conflict {
            return Some((*s, *t));
        }
    }
    None
}
