use std::collections::HashMap;
use std::os::raw::c_int;

use spade::handles::FixedVertexHandle;
use spade::{
    AngleLimit, ConstrainedDelaunayTriangulation, InsertionError, Point2, RefinementParameters,
    Triangulation,
};
use thiserror::Error;

use crate::pslg::{self, Ring, Segment};
use crate::records::{CdtEdge, CdtPoint, CdtResult, CdtTriangle};
use crate::status::CdtStatus;

type Cdt = ConstrainedDelaunayTriangulation<Point2<f64>>;

/// Area of an equilateral triangle with unit sides (sqrt(3) / 4, rounded).
///
/// `maxh` is a target edge length, but the refiner bounds triangle area.
const EQUILATERAL_AREA: f64 = 0.433;

/// Additional vertices allowed per triangle the area limit asks for.
const VERTICES_PER_TRIANGLE: f64 = 4.0;

/// Additional vertices allowed per input vertex for angle refinement alone.
const VERTICES_PER_INPUT: usize = 10;

/// Largest minimum angle the refiner is asked for. Beyond this refinement is
/// not guaranteed to terminate.
const MAX_MIN_ANGLE_DEG: f64 = 35.0;

#[derive(Debug, Error)]
pub enum MeshError {
    #[error("outer loop is missing or empty")]
    EmptyOuterLoop,
    #[error("min_angle must be between 0 and 35 degrees, got {0}")]
    InvalidMinAngle(f64),
    #[error("inner loop table is malformed: {0}")]
    MalformedLoops(&'static str),
    #[error("unknown quality code {0}")]
    UnknownQuality(c_int),
    #[error("vertex ({x}, {y}) could not be inserted: {source}")]
    Insertion {
        x: f64,
        y: f64,
        source: InsertionError,
    },
    #[error("constraint segment {0:?} improperly intersects {1:?}")]
    IntersectingConstraints(Segment, Segment),
    #[error("constraint edge from ({0}, {1}) was rejected by the triangulation")]
    ConstraintRejected(f64, f64),
    #[error("engine panicked: {0}")]
    Panicked(String),
}

impl MeshError {
    pub fn status(&self) -> CdtStatus {
        match self {
            MeshError::EmptyOuterLoop
            | MeshError::InvalidMinAngle(_)
            | MeshError::MalformedLoops(_) => CdtStatus::InvalidInput,
            MeshError::UnknownQuality(_) => CdtStatus::InvalidQuality,
            MeshError::Insertion { .. } => CdtStatus::InvalidCoordinate,
            MeshError::IntersectingConstraints(..) | MeshError::ConstraintRejected(..) => {
                CdtStatus::IntersectingConstraints
            }
            MeshError::Panicked(_) => CdtStatus::Internal,
        }
    }
}

/// Engine side view of the quality code.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Quality {
    Default,
    Moderate,
}

impl Quality {
    pub fn from_code(code: c_int) -> Result<Self, MeshError> {
        match code {
            0 => Ok(Quality::Default),
            1 => Ok(Quality::Moderate),
            other => Err(MeshError::UnknownQuality(other)),
        }
    }

    fn min_angle_deg(self) -> f64 {
        match self {
            Quality::Default => 0.0,
            Quality::Moderate => 25.0,
        }
    }
}

/// Rejects coordinates that would poison the intersection predicates before
/// spade ever sees them.
fn check_coordinate(p: &CdtPoint) -> Result<(), MeshError> {
    let source = if p.x.is_nan() || p.y.is_nan() {
        InsertionError::NAN
    } else if p.x.is_infinite() || p.y.is_infinite() {
        InsertionError::TooLarge
    } else {
        return Ok(());
    };
    Err(MeshError::Insertion {
        x: p.x,
        y: p.y,
        source,
    })
}

/// A fully decoded triangulation request.
#[derive(Debug)]
pub struct MeshRequest {
    pub outer: Ring,
    pub holes: Vec<Ring>,
    pub building_loops: Vec<Ring>,
    /// Target edge length. Anything but a positive number means no limit.
    pub maxh: f64,
    pub quality: Quality,
    /// Overrides the quality's minimum angle, in degrees.
    pub min_angle: Option<f64>,
    pub enforce_constraints: bool,
}

impl MeshRequest {
    /// Maximum triangle area, if `maxh` asks for one.
    fn max_area(&self) -> Option<f64> {
        (self.maxh > 0.0 && self.maxh.is_finite())
            .then(|| EQUILATERAL_AREA * self.maxh * self.maxh)
    }

    fn min_angle_deg(&self) -> f64 {
        self.min_angle.unwrap_or_else(|| self.quality.min_angle_deg())
    }

    /// How many Steiner points refinement may add.
    ///
    /// Enough to cover the bounding box of the input with triangles at the
    /// area limit, plus headroom for angle refinement.
    fn vertex_budget(&self) -> usize {
        let vertices: Vec<&CdtPoint> = self.rings().flat_map(|ring| ring.vertices()).collect();
        let for_angles = vertices.len().saturating_mul(VERTICES_PER_INPUT);
        let for_area = match self.max_area() {
            Some(max_area) => {
                let (x0, x1) = vertices
                    .iter()
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                        (lo.min(p.x), hi.max(p.x))
                    });
                let (y0, y1) = vertices
                    .iter()
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                        (lo.min(p.y), hi.max(p.y))
                    });
                // Saturates for absurd ratios.
                ((x1 - x0) * (y1 - y0) / max_area * VERTICES_PER_TRIANGLE).ceil() as usize
            }
            None => 0,
        };
        for_angles.saturating_add(for_area)
    }

    fn rings(&self) -> impl Iterator<Item = &Ring> {
        std::iter::once(&self.outer)
            .chain(self.holes.iter())
            .chain(self.building_loops.iter())
    }

    /// Whether a point that is known not to lie on a constraint belongs to
    /// the meshed region.
    fn in_domain(&self, p: Point2<f64>) -> bool {
        if !self.enforce_constraints {
            // Without constraints there is no boundary to respect, the whole
            // convex hull is meshed.
            return true;
        }
        self.outer.contains(p.x, p.y) && !self.holes.iter().any(|h| h.contains(p.x, p.y))
    }

    pub fn triangulate(&self) -> Result<CdtResult, MeshError> {
        if self.outer.is_empty() {
            return Err(MeshError::EmptyOuterLoop);
        }
        if let Some(angle) = self.min_angle {
            if !(0.0..=MAX_MIN_ANGLE_DEG).contains(&angle) {
                return Err(MeshError::InvalidMinAngle(angle));
            }
        }
        for p in self.rings().flat_map(|ring| ring.vertices()) {
            check_coordinate(p)?;
        }
        if self.enforce_constraints {
            if let Some((a, b)) = pslg::find_conflict(self.rings()) {
                return Err(MeshError::IntersectingConstraints(a, b));
            }
        }

        let mut cdt = Cdt::new();

        // Spade merges vertices at identical positions and hands back the
        // existing handle, so the first z seen for a position wins.
        let mut heights: HashMap<FixedVertexHandle, f64> = HashMap::new();
        let mut loops: Vec<Vec<FixedVertexHandle>> = Vec::new();
        for ring in self.rings() {
            let mut handles = Vec::with_capacity(ring.vertices().len());
            for p in ring.vertices() {
                let handle = cdt
                    .insert(Point2::new(p.x, p.y))
                    .map_err(|source| MeshError::Insertion {
                        x: p.x,
                        y: p.y,
                        source,
                    })?;
                heights.entry(handle).or_insert(p.z);
                handles.push(handle);
            }
            loops.push(handles);
        }

        if self.enforce_constraints {
            for handles in &loops {
                for (i, &from) in handles.iter().enumerate() {
                    let to = handles[(i + 1) % handles.len()];
                    if from == to {
                        continue;
                    }
                    // Conflicts were ruled out above, this only guards against
                    // the predicates disagreeing with spade's own.
                    if !cdt.can_add_constraint(from, to) {
                        let p = cdt.vertex(from).position();
                        return Err(MeshError::ConstraintRejected(p.x, p.y));
                    }
                    cdt.add_constraint(from, to);
                }
            }
        }

        let max_area = self.max_area();
        if self.enforce_constraints || max_area.is_some() {
            let budget = self.vertex_budget();
            let mut params = RefinementParameters::<f64>::new()
                .exclude_outer_faces(false)
                .with_angle_limit(AngleLimit::from_deg(self.min_angle_deg()))
                .with_max_additional_vertices(budget);
            if let Some(max_area) = max_area {
                params = params.with_max_allowed_area(max_area);
            }
            let refinement = cdt.refine(params);
            if !refinement.refinement_complete {
                log::warn!(
                    "refinement stopped after {} additional vertices, some triangles exceed the requested size or angle",
                    budget
                );
            }
        }

        Ok(self.collect(&cdt, &heights))
    }

    /// Copies the part of the triangulation inside the domain into flat
    /// buffers, dropping vertices that no kept triangle uses.
    fn collect(&self, cdt: &Cdt, heights: &HashMap<FixedVertexHandle, f64>) -> CdtResult {
        let mut kept_face = vec![false; cdt.num_all_faces()];
        let kept: Vec<[FixedVertexHandle; 3]> = cdt
            .inner_faces()
            .filter_map(|face| {
                let [a, b, c] = face.vertices().map(|v| v.position());
                let centroid = Point2::new((a.x + b.x + c.x) / 3.0, (a.y + b.y + c.y) / 3.0);
                if !self.in_domain(centroid) {
                    return None;
                }
                kept_face[face.fix().index()] = true;
                Some(face.vertices().map(|v| v.fix()))
            })
            .collect();

        let mut used = vec![false; cdt.num_vertices()];
        for v in kept.iter().flatten() {
            used[v.index()] = true;
        }

        let mut index_of: Vec<Option<usize>> = vec![None; cdt.num_vertices()];
        let mut points = Vec::new();
        for v in cdt.vertices() {
            let fixed = v.fix();
            if !used[fixed.index()] {
                continue;
            }
            index_of[fixed.index()] = Some(points.len());
            let p = v.position();
            points.push(CdtPoint {
                x: p.x,
                y: p.y,
                // Steiner points have no input height.
                z: heights.get(&fixed).copied().unwrap_or(0.0),
            });
        }

        let lookup = |v: FixedVertexHandle| index_of[v.index()];
        let triangles = kept
            .iter()
            .filter_map(|[a, b, c]| {
                Some(CdtTriangle {
                    v0: lookup(*a)?,
                    v1: lookup(*b)?,
                    v2: lookup(*c)?,
                })
            })
            .collect();

        // A constraint edge is reported only if it borders a kept triangle. Its
        // endpoints alone may survive while the edge itself lies outside.
        let edges = cdt
            .undirected_edges()
            .filter(|e| cdt.is_constraint_edge(e.fix()))
            .filter(|e| {
                let edge = e.as_directed();
                [edge.face(), edge.rev().face()]
                    .iter()
                    .any(|face| kept_face[face.fix().index()])
            })
            .filter_map(|e| {
                let [a, b] = e.vertices().map(|v| v.fix());
                Some(CdtEdge {
                    v0: lookup(a)?,
                    v1: lookup(b)?,
                })
            })
            .collect();

        CdtResult {
            points,
            triangles,
            edges,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> CdtPoint {
        CdtPoint { x, y, z: 0.0 }
    }

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Ring {
        Ring::new(&[p(x0, y0), p(x1, y0), p(x1, y1), p(x0, y1), p(x0, y0)])
    }

    fn request(outer: Ring) -> MeshRequest {
        MeshRequest {
            outer,
            holes: vec![],
            building_loops: vec![],
            maxh: 0.0,
            quality: Quality::Default,
            min_angle: None,
            enforce_constraints: true,
        }
    }

    fn triangle_areas(r: &CdtResult) -> impl Iterator<Item = f64> + '_ {
        r.triangles.iter().map(|t| {
            let (a, b, c) = (r.points[t.v0], r.points[t.v1], r.points[t.v2]);
            ((b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)).abs() / 2.0
        })
    }

    fn smallest_angle_deg(r: &CdtResult) -> f64 {
        r.triangles
            .iter()
            .flat_map(|t| {
                let corners = [r.points[t.v0], r.points[t.v1], r.points[t.v2]];
                (0..3).map(move |i| {
                    let (a, b, c) = (corners[i], corners[(i + 1) % 3], corners[(i + 2) % 3]);
                    let (ux, uy) = (b.x - a.x, b.y - a.y);
                    let (vx, vy) = (c.x - a.x, c.y - a.y);
                    (ux * vy - uy * vx).abs().atan2(ux * vx + uy * vy).to_degrees()
                })
            })
            .fold(f64::INFINITY, f64::min)
    }

    fn area(r: &CdtResult) -> f64 {
        triangle_areas(r).sum()
    }

    #[test]
    fn quality_codes() {
        assert_eq!(Quality::Default, Quality::from_code(0).unwrap());
        assert_eq!(Quality::Moderate, Quality::from_code(1).unwrap());
        assert!(matches!(
            Quality::from_code(7),
            Err(MeshError::UnknownQuality(7))
        ));
    }

    #[test]
    fn square_without_refinement() {
        let result = request(square(0.0, 0.0, 1.0, 1.0)).triangulate().unwrap();
        assert_eq!(4, result.points.len());
        assert_eq!(2, result.triangles.len());
        assert_eq!(4, result.edges.len());
        float_eq::assert_float_eq!(area(&result), 1.0, abs <= 1e-9);
    }

    #[test]
    fn hole_is_excluded_and_building_is_kept() {
        let mut req = request(square(0.0, 0.0, 10.0, 10.0));
        req.holes.push(square(1.0, 1.0, 3.0, 3.0));
        req.building_loops.push(square(5.0, 5.0, 8.0, 8.0));
        let result = req.triangulate().unwrap();
        float_eq::assert_float_eq!(area(&result), 96.0, abs <= 1e-6);
    }

    #[test]
    fn concave_outline_excludes_the_notch() {
        let outer = Ring::new(&[
            p(0.0, 0.0),
            p(4.0, 0.0),
            p(4.0, 4.0),
            p(2.0, 1.0),
            p(0.0, 4.0),
        ]);
        let result = request(outer).triangulate().unwrap();
        // The V shaped notch is cut away from the hull.
        float_eq::assert_float_eq!(area(&result), 10.0, abs <= 1e-6);
    }

    #[test]
    fn unconstrained_meshes_convex_hull() {
        let mut req = request(square(0.0, 0.0, 10.0, 10.0));
        req.holes.push(square(4.0, 4.0, 6.0, 6.0));
        req.enforce_constraints = false;
        let result = req.triangulate().unwrap();
        assert!(result.edges.is_empty());
        float_eq::assert_float_eq!(area(&result), 100.0, abs <= 1e-6);
    }

    #[test]
    fn heights_follow_input_vertices() {
        let outer = Ring::new(&[
            CdtPoint { x: 0.0, y: 0.0, z: 1.0 },
            CdtPoint { x: 2.0, y: 0.0, z: 2.0 },
            CdtPoint { x: 1.0, y: 2.0, z: 3.0 },
        ]);
        let result = request(outer).triangulate().unwrap();
        let mut zs: Vec<f64> = result.points.iter().map(|p| p.z).collect();
        zs.sort_by(f64::total_cmp);
        assert_eq!(vec![1.0, 2.0, 3.0], zs);
    }

    #[test]
    fn maxh_adds_steiner_points() {
        let mut req = request(square(0.0, 0.0, 1.0, 1.0));
        req.maxh = 0.25;
        let result = req.triangulate().unwrap();
        assert!(result.points.len() > 4);
        assert!(result.triangles.len() > 2);
        float_eq::assert_float_eq!(area(&result), 1.0, abs <= 1e-9);
    }

    #[test]
    fn maxh_bounds_every_triangle() {
        for maxh in [0.1, 0.05] {
            let mut req = request(square(0.0, 0.0, 1.0, 1.0));
            req.maxh = maxh;
            let result = req.triangulate().unwrap();
            let limit = EQUILATERAL_AREA * maxh * maxh;
            let largest = triangle_areas(&result).fold(0.0, f64::max);
            assert!(largest <= limit * (1.0 + 1e-9), "{} > {}", largest, limit);
            float_eq::assert_float_eq!(area(&result), 1.0, abs <= 1e-9);
        }
    }

    #[test]
    fn finer_maxh_keeps_refining() {
        let count = |maxh: f64| {
            let mut req = request(square(0.0, 0.0, 1.0, 1.0));
            req.maxh = maxh;
            req.triangulate().unwrap().triangles.len()
        };
        assert!(count(0.05) > count(0.1));
    }

    #[test]
    fn budget_grows_with_the_area_limit() {
        let mut req = request(square(0.0, 0.0, 1.0, 1.0));
        let base = req.vertex_budget();
        assert_eq!(4 * VERTICES_PER_INPUT, base);
        req.maxh = 0.05;
        assert!(req.vertex_budget() as f64 >= 1.0 / (EQUILATERAL_AREA * 0.0025));
    }

    #[test]
    fn non_positive_maxh_sets_no_limit() {
        for maxh in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let mut req = request(square(0.0, 0.0, 1.0, 1.0));
            req.maxh = maxh;
            assert_eq!(None, req.max_area());
            let result = req.triangulate().unwrap();
            assert_eq!(4, result.points.len());
            assert_eq!(2, result.triangles.len());
        }
    }

    #[test]
    fn min_angle_overrides_quality() {
        let sliver = || square(0.0, 0.0, 10.0, 1.0);
        let plain = request(sliver()).triangulate().unwrap();
        assert_eq!(2, plain.triangles.len());

        let mut req = request(sliver());
        req.min_angle = Some(25.0);
        let refined = req.triangulate().unwrap();
        assert!(refined.triangles.len() > 2);
        assert!(smallest_angle_deg(&refined) > smallest_angle_deg(&plain));

        // An explicit zero wins over Moderate.
        let mut req = request(sliver());
        req.quality = Quality::Moderate;
        req.min_angle = Some(0.0);
        assert_eq!(plain, req.triangulate().unwrap());
    }

    #[test]
    fn edge_outside_the_domain_is_not_reported() {
        // L shaped outline; the building closes the notch with the diagonal
        // (20, 8) - (8, 20), which runs outside the outline.
        let mut req = request(Ring::new(&[
            p(0.0, 0.0),
            p(20.0, 0.0),
            p(20.0, 8.0),
            p(8.0, 8.0),
            p(8.0, 20.0),
            p(0.0, 20.0),
        ]));
        req.building_loops
            .push(Ring::new(&[p(8.0, 8.0), p(20.0, 8.0), p(8.0, 20.0)]));
        let result = req.triangulate().unwrap();

        float_eq::assert_float_eq!(area(&result), 256.0, abs <= 1e-9);
        let on_a_triangle = |a: usize, b: usize| {
            result.triangles.iter().any(|t| {
                let v = [t.v0, t.v1, t.v2];
                v.contains(&a) && v.contains(&b)
            })
        };
        for e in &result.edges {
            assert!(on_a_triangle(e.v0, e.v1), "edge {:?} borders no triangle", e);
        }
        let diagonal = |e: &CdtEdge| {
            let (a, b) = (result.points[e.v0], result.points[e.v1]);
            a.x != b.x && a.y != b.y && a.x + a.y == 28.0 && b.x + b.y == 28.0
        };
        assert!(!result.edges.iter().any(diagonal));
    }

    #[test]
    fn rejects_bad_requests() {
        assert!(matches!(
            request(Ring::default()).triangulate(),
            Err(MeshError::EmptyOuterLoop)
        ));

        for angle in [f64::NAN, 50.0, -3.0] {
            let mut req = request(square(0.0, 0.0, 1.0, 1.0));
            req.min_angle = Some(angle);
            assert!(matches!(req.triangulate(), Err(MeshError::InvalidMinAngle(_))));
        }

        let bad = request(Ring::new(&[p(0.0, 0.0), p(f64::NAN, 0.0), p(0.0, 1.0)]));
        assert!(matches!(bad.triangulate(), Err(MeshError::Insertion { .. })));
    }

    #[test]
    fn rejects_overlapping_buildings() {
        let mut req = request(square(0.0, 0.0, 1.0, 1.0));
        req.building_loops.push(square(0.25, 0.25, 0.55, 0.75));
        req.building_loops.push(square(0.55, 0.35, 0.85, 0.85));
        let err = req.triangulate().unwrap_err();
        assert_eq!(CdtStatus::IntersectingConstraints, err.status());
    }
}
