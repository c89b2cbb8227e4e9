use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Vector2 = cgmath::Vector2<f64>;

/// A vertex in the plane.
///
/// Triangulation only looks at `x` and `y`. The `z` coordinate is carried
/// through as metadata so callers can triangulate planar slices of 3d data
/// without keeping a side table.
///
/// On the wire a point is a 2 or 3 element array, ex: `[1.0, 2.0]` or
/// `[1.0, 2.0, 0.5]`. A missing `z` reads as `0.0`.
#[derive(Debug, PartialEq, Copy, Clone, Default, Serialize, Deserialize)]
#[serde(from = "PointRepr", into = "[f64; 3]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// A point on the `z = 0` plane.
    pub const fn planar(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// The planar part of this point.
    pub fn xy(&self) -> Vector2 {
        Vector2 {
            x: self.x,
            y: self.y,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PointRepr {
    Planar([f64; 2]),
    Full([f64; 3]),
}

impl From<PointRepr> for Point {
    fn from(repr: PointRepr) -> Self {
        match repr {
            PointRepr::Planar([x, y]) => Point::planar(x, y),
            PointRepr::Full([x, y, z]) => Point::new(x, y, z),
        }
    }
}

impl From<Point> for [f64; 3] {
    fn from(p: Point) -> Self {
        [p.x, p.y, p.z]
    }
}

/// A triangle as three indices into the vertex list of a
/// [`TriangulationResult`](crate::TriangulationResult).
#[derive(Debug, PartialEq, Eq, Copy, Clone, Default, Hash, Serialize, Deserialize)]
#[serde(from = "[usize; 3]", into = "[usize; 3]")]
pub struct Triangle {
    pub v0: usize,
    pub v1: usize,
    pub v2: usize,
}

impl Triangle {
    pub fn indices(&self) -> [usize; 3] {
        [self.v0, self.v1, self.v2]
    }
}

impl From<[usize; 3]> for Triangle {
    fn from([v0, v1, v2]: [usize; 3]) -> Self {
        Self { v0, v1, v2 }
    }
}

impl From<Triangle> for [usize; 3] {
    fn from(t: Triangle) -> Self {
        t.indices()
    }
}

/// A constrained edge as two indices into the vertex list.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Default, Hash, Serialize, Deserialize)]
#[serde(from = "[usize; 2]", into = "[usize; 2]")]
pub struct Edge {
    pub v0: usize,
    pub v1: usize,
}

impl Edge {
    pub fn indices(&self) -> [usize; 2] {
        [self.v0, self.v1]
    }
}

impl From<[usize; 2]> for Edge {
    fn from([v0, v1]: [usize; 2]) -> Self {
        Self { v0, v1 }
    }
}

impl From<Edge> for [usize; 2] {
    fn from(e: Edge) -> Self {
        e.indices()
    }
}

/// How hard the engine works on triangle shape after the constraints are in.
#[derive(Debug, Default, PartialEq, Eq, Copy, Clone, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    /// No minimum angle. Only `maxh` drives subdivision.
    #[default]
    Default,
    /// Refine until no triangle has an angle below 25 degrees.
    Moderate,
}

impl Quality {
    pub const ALL: [Quality; 2] = [Quality::Default, Quality::Moderate];

    pub fn name(&self) -> &'static str {
        match self {
            Quality::Default => "default",
            Quality::Moderate => "moderate",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown quality '{0}', expected one of: default, moderate")]
pub struct ParseQualityError(String);

impl FromStr for Quality {
    type Err = ParseQualityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Quality::ALL
            .into_iter()
            .find(|q| q.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseQualityError(s.to_string()))
    }
}
