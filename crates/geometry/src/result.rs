use serde::{Deserialize, Serialize};

use crate::{Edge, Point, Triangle, Vector2};

/// The output of a triangulation, fully owned by the caller.
///
/// `points` is the global vertex set: the input vertices that ended up in the
/// mesh plus any Steiner points the engine inserted. `triangles` and `edges`
/// index into it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TriangulationResult {
    pub points: Vec<Point>,
    pub triangles: Vec<Triangle>,
    /// Constrained edges: the (possibly subdivided) segments of every loop.
    pub edges: Vec<Edge>,
}

impl TriangulationResult {
    pub fn num_vertices(&self) -> usize {
        self.points.len()
    }

    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Returns the three corners of `t`.
    ///
    /// Panics if `t` does not index into this result.
    pub fn corners(&self, t: &Triangle) -> [Point; 3] {
        t.indices().map(|i| self.points[i])
    }

    pub fn centroid(&self, t: &Triangle) -> Vector2 {
        let [a, b, c] = self.corners(t);
        (a.xy() + b.xy() + c.xy()) / 3.0
    }

    /// Unsigned area of `t` in the xy plane.
    pub fn triangle_area(&self, t: &Triangle) -> f64 {
        let [a, b, c] = self.corners(t);
        ((b.xy() - a.xy()).perp_dot(c.xy() - a.xy()) / 2.0).abs()
    }

    /// Sum of all triangle areas.
    pub fn area(&self) -> f64 {
        self.triangles.iter().map(|t| self.triangle_area(t)).sum()
    }

    /// Returns true if every triangle and edge index points at a vertex.
    pub fn indices_in_bounds(&self) -> bool {
        let n = self.points.len();
        self.triangles
            .iter()
            .all(|t| t.indices().iter().all(|&i| i < n))
            && self.edges.iter().all(|e| e.indices().iter().all(|&i| i < n))
    }
}
