use serde::{Deserialize, Serialize};

use tessera_geometry::{Point, Quality, TriangulationResult};

use crate::error::{Error, FailureReason};
use crate::ffi;
use crate::handle::EngineResult;
use crate::marshal::{flatten, LoopSet};

/// Knobs for one triangulation, everything except the loops themselves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangulationOptions {
    /// Target maximum edge length. Zero or negative leaves triangle size
    /// unconstrained.
    pub maxh: f64,
    pub quality: Quality,
    /// Minimum interior angle in degrees, between 0 and 35. Overrides the
    /// angle `quality` would pick. `None` leaves it to `quality`.
    pub min_angle: Option<f64>,
    pub enforce_constraints: bool,
    /// When off, holes are meshed like building loops: their boundaries stay
    /// as constrained edges but their interiors are kept.
    pub exclude_holes: bool,
}

impl Default for TriangulationOptions {
    fn default() -> Self {
        Self {
            maxh: 0.0,
            quality: Quality::Default,
            min_angle: None,
            enforce_constraints: true,
            exclude_holes: true,
        }
    }
}

/// Triangulates `outer`, cutting out `holes` and keeping every segment of
/// `building_loops` as a constrained edge.
///
/// `maxh` is the target maximum edge length; `0.0` leaves triangle size
/// unconstrained. Empty hole or building loops are ignored. With
/// `enforce_constraints` off the engine meshes the convex hull of every input
/// vertex instead, and reports no edges.
///
/// The call is all or nothing: either the whole result is copied out of the
/// engine, or an error is returned.
pub fn triangulate(
    outer: &[Point],
    holes: &[Vec<Point>],
    building_loops: &[Vec<Point>],
    maxh: f64,
    quality: Quality,
    enforce_constraints: bool,
) -> Result<TriangulationResult, Error> {
    let options = TriangulationOptions {
        maxh,
        quality,
        enforce_constraints,
        ..TriangulationOptions::default()
    };
    triangulate_with_options(outer, holes, building_loops, &options)
}

/// [`triangulate`] with every option spelled out.
pub fn triangulate_with_options(
    outer: &[Point],
    holes: &[Vec<Point>],
    building_loops: &[Vec<Point>],
    options: &TriangulationOptions,
) -> Result<TriangulationResult, Error> {
    if outer.is_empty() {
        return Err(Error::EmptyOuterLoop);
    }

    let outer = flatten(outer);
    let loops = if options.exclude_holes {
        LoopSet::new(holes, building_loops)
    } else {
        LoopSet::without_holes(holes, building_loops)
    };
    let tables = loops.tables();
    let min_angle = options.min_angle.unwrap_or(ffi::MIN_ANGLE_FROM_QUALITY);

    log::debug!(
        "cdt_triangulate: {} outer points, {} holes, {} constraint loops, maxh {}, {} quality, min angle {}",
        outer.len(),
        loops.num_holes(),
        loops.len() - loops.num_holes(),
        options.maxh,
        options.quality.name(),
        min_angle
    );

    // Safety: every pointer handed over points into `outer` or `loops`, both
    // of which outlive the call, and the engine keeps none of them.
    let raw = unsafe {
        ffi::cdt_triangulate(
            outer.as_ptr(),
            outer.len(),
            tables.pointers(),
            tables.counts(),
            tables.len(),
            loops.num_holes(),
            options.maxh,
            ffi::quality_code(options.quality),
            min_angle,
            options.enforce_constraints.into(),
        )
    };

    // Safety: `raw` comes straight from the engine and has no other owner.
    let handle = match unsafe { EngineResult::from_raw(raw) } {
        Some(handle) => handle,
        None => {
            // Safety: no arguments, reads this thread's status.
            let reason = FailureReason::from_status(unsafe { ffi::cdt_last_status() });
            log::warn!("cdt_triangulate returned no result: {}", reason);
            return Err(Error::TriangulationFailed(reason));
        }
    };

    let result = handle.materialize();
    log::debug!(
        "copied {} points, {} triangles, {} edges",
        result.num_vertices(),
        result.num_triangles(),
        result.num_edges()
    );
    Ok(result)
}

/// Everything one triangulation needs, in a form that reads from JSON.
///
/// ```json
/// {
///     "outer": [[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]],
///     "holes": [[[4, 4], [6, 4], [6, 6], [4, 6], [4, 4]]],
///     "maxh": 2.5,
///     "quality": "moderate"
/// }
/// ```
///
/// Only `outer` is required. Constraints are enforced and holes cut out
/// unless `enforce_constraints` or `exclude_holes` say otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangulationRequest {
    pub outer: Vec<Point>,
    #[serde(default)]
    pub holes: Vec<Vec<Point>>,
    #[serde(default)]
    pub building_loops: Vec<Vec<Point>>,
    #[serde(default)]
    pub maxh: f64,
    #[serde(default)]
    pub quality: Quality,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_angle: Option<f64>,
    #[serde(default = "enabled")]
    pub enforce_constraints: bool,
    #[serde(default = "enabled")]
    pub exclude_holes: bool,
}

fn enabled() -> bool {
    true
}

impl TriangulationRequest {
    pub fn new(outer: Vec<Point>) -> Self {
        Self {
            outer,
            holes: Vec::new(),
            building_loops: Vec::new(),
            maxh: 0.0,
            quality: Quality::Default,
            min_angle: None,
            enforce_constraints: true,
            exclude_holes: true,
        }
    }

    pub fn options(&self) -> TriangulationOptions {
        TriangulationOptions {
            maxh: self.maxh,
            quality: self.quality,
            min_angle: self.min_angle,
            enforce_constraints: self.enforce_constraints,
            exclude_holes: self.exclude_holes,
        }
    }

    pub fn triangulate(&self) -> Result<TriangulationResult, Error> {
        triangulate_with_options(
            &self.outer,
            &self.holes,
            &self.building_loops,
            &self.options(),
        )
    }
}

#[cfg(test)]
mod tests {
    use float_eq::assert_float_eq;

    use super::*;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point> {
        vec![
            Point::planar(x0, y0),
            Point::planar(x1, y0),
            Point::planar(x1, y1),
            Point::planar(x0, y1),
            Point::planar(x0, y0),
        ]
    }

    #[test]
    fn empty_outer_loop() {
        assert_eq!(
            Err(Error::EmptyOuterLoop),
            triangulate(&[], &[square(0.0, 0.0, 1.0, 1.0)], &[], 0.0, Quality::Default, true)
        );
    }

    #[test]
    fn unit_square() {
        let result =
            triangulate(&square(0.0, 0.0, 1.0, 1.0), &[], &[], 0.0, Quality::Default, true)
                .unwrap();
        assert_eq!(4, result.num_vertices());
        assert_eq!(2, result.num_triangles());
        assert_eq!(4, result.num_edges());
        assert_float_eq!(1.0, result.area(), abs <= 1e-12);
    }

    #[test]
    fn engine_failure_carries_reason() {
        let outer = vec![
            Point::planar(0.0, 0.0),
            Point::planar(f64::NAN, 0.0),
            Point::planar(0.0, 1.0),
        ];
        assert_eq!(
            Err(Error::TriangulationFailed(FailureReason::InvalidCoordinate)),
            triangulate(&outer, &[], &[], 0.0, Quality::Default, true)
        );
        let options = TriangulationOptions {
            min_angle: Some(50.0),
            ..TriangulationOptions::default()
        };
        assert_eq!(
            Err(Error::TriangulationFailed(FailureReason::InvalidInput)),
            triangulate_with_options(&square(0.0, 0.0, 1.0, 1.0), &[], &[], &options)
        );
    }

    #[test]
    fn negative_maxh_sets_no_limit() {
        let outer = square(0.0, 0.0, 1.0, 1.0);
        let unlimited = triangulate(&outer, &[], &[], 0.0, Quality::Default, true).unwrap();
        assert_eq!(
            unlimited,
            triangulate(&outer, &[], &[], -1.0, Quality::Default, true).unwrap()
        );
    }

    #[test]
    fn maxh_bounds_triangle_size() {
        let outer = square(0.0, 0.0, 10.0, 10.0);
        let coarse = triangulate(&outer, &[], &[], 0.0, Quality::Default, true).unwrap();
        let fine = triangulate(&outer, &[], &[], 2.0, Quality::Default, true).unwrap();
        assert!(fine.num_triangles() > coarse.num_triangles());
        assert_float_eq!(100.0, fine.area(), abs <= 1e-9);
        // Area of an equilateral triangle with side 2.
        let limit = 0.433 * 2.0 * 2.0;
        for t in &fine.triangles {
            let area = fine.triangle_area(t);
            assert!(area <= limit + 1e-9, "triangle area {} over {}", area, limit);
        }
    }

    #[test]
    fn holes_can_be_kept() {
        let outer = square(0.0, 0.0, 10.0, 10.0);
        let holes = vec![square(4.0, 4.0, 6.0, 6.0)];
        let cut = triangulate(&outer, &holes, &[], 0.0, Quality::Default, true).unwrap();
        assert_float_eq!(96.0, cut.area(), abs <= 1e-9);

        let options = TriangulationOptions {
            exclude_holes: false,
            ..TriangulationOptions::default()
        };
        let kept = triangulate_with_options(&outer, &holes, &[], &options).unwrap();
        assert_float_eq!(100.0, kept.area(), abs <= 1e-9);
        assert!(kept.num_edges() >= 8);
    }

    #[test]
    fn request_carries_every_option() {
        let request: TriangulationRequest = serde_json::from_str(
            r#"{
                "outer": [[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]],
                "holes": [[[4, 4], [6, 4], [6, 6], [4, 6], [4, 4]]],
                "min_angle": 30,
                "exclude_holes": false
            }"#,
        )
        .unwrap();
        assert_eq!(
            TriangulationOptions {
                min_angle: Some(30.0),
                exclude_holes: false,
                ..TriangulationOptions::default()
            },
            request.options()
        );
        assert_float_eq!(100.0, request.triangulate().unwrap().area(), abs <= 1e-9);
    }

    #[test]
    fn request_defaults() {
        let request: TriangulationRequest =
            serde_json::from_str(r#"{"outer": [[0, 0], [1, 0], [0, 1]]}"#).unwrap();
        assert_eq!(
            TriangulationRequest::new(vec![
                Point::planar(0.0, 0.0),
                Point::planar(1.0, 0.0),
                Point::planar(0.0, 1.0),
            ]),
            request
        );
    }

    #[test]
    fn request_from_json() {
        let request: TriangulationRequest = serde_json::from_str(
            r#"{
                "outer": [[0, 0, 1], [10, 0, 1], [10, 10, 1], [0, 10, 1], [0, 0, 1]],
                "holes": [[[4, 4], [6, 4], [6, 6], [4, 6], [4, 4]]],
                "building_loops": [[], [[1, 1], [2, 1], [2, 2], [1, 2], [1, 1]]],
                "maxh": 0,
                "quality": "moderate",
                "enforce_constraints": true
            }"#,
        )
        .unwrap();
        assert_eq!(Quality::Moderate, request.quality);
        assert_eq!(2, request.building_loops.len());

        let result = request.triangulate().unwrap();
        assert_float_eq!(96.0, result.area(), abs <= 1e-9);
        assert!(result.indices_in_bounds());
    }

    #[test]
    fn unknown_quality_name_is_a_parse_error() {
        let err = serde_json::from_str::<TriangulationRequest>(
            r#"{"outer": [[0, 0], [1, 0], [0, 1]], "quality": "fine"}"#,
        );
        assert!(err.is_err());
    }
}
