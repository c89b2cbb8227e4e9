use serde::{Deserialize, Serialize};

use crate::{Point, Vector2};

/// A closed ring of points.
///
/// Loops are stored the way callers usually write them down: closed
/// explicitly, with the first point repeated at the end.
///
/// Ex, the triangle A,B,C
///
/// ```text
///         A --- B
///         |    /
///         |   /
///         |  /
///         | /
///         |/
///         C
/// ```
///
/// Would be stored as the Vector: {A, B, C, A}. A loop that is missing the
/// closing point is still read as closed, the segment C->A is implied.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolygonLoop {
    path: Vec<Point>,
}

impl PolygonLoop {
    pub fn new() -> Self {
        Self { path: Vec::new() }
    }

    pub fn add_point(&mut self, x: f64, y: f64, z: f64) {
        self.path.push(Point { x, y, z })
    }

    /// Appends the first point if the loop is not already explicitly closed.
    pub fn close(&mut self) {
        if let Some(&first) = self.path.first() {
            if !self.is_closed() {
                self.path.push(first);
            }
        }
    }

    pub fn points(&self) -> &[Point] {
        self.path.as_slice()
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Returns true if the first point is repeated (bit-for-bit) as the last.
    pub fn is_closed(&self) -> bool {
        match (self.path.first(), self.path.last()) {
            (Some(first), Some(last)) => self.path.len() > 1 && first == last,
            _ => false,
        }
    }

    /// The distinct ring vertices, without the closing repeat.
    fn ring(&self) -> &[Point] {
        if self.is_closed() {
            &self.path[..self.path.len() - 1]
        } else {
            &self.path
        }
    }

    pub fn segments(&self) -> Segments<'_> {
        let mut iter = self.ring().iter();
        let start = iter.next().cloned();
        Segments {
            prev: start,
            start,
            iter,
        }
    }

    /// Shoelace area. Positive when the loop runs counter-clockwise.
    pub fn signed_area(&self) -> f64 {
        self.segments()
            .map(|(p0, p1)| p0.xy().perp_dot(p1.xy()))
            .sum::<f64>()
            / 2.0
    }

    /// Even-odd containment test on the planar coordinates.
    ///
    /// Points exactly on the boundary may land on either side.
    pub fn contains(&self, p: Vector2) -> bool {
        self.segments().fold(false, |inside, (a, b)| {
            if (a.y > p.y) != (b.y > p.y) {
                let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < x {
                    return !inside;
                }
            }
            inside
        })
    }
}

impl From<Vec<Point>> for PolygonLoop {
    fn from(path: Vec<Point>) -> Self {
        Self { path }
    }
}

impl FromIterator<Point> for PolygonLoop {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self {
            path: iter.into_iter().collect(),
        }
    }
}

impl AsRef<[Point]> for PolygonLoop {
    fn as_ref(&self) -> &[Point] {
        self.points()
    }
}

pub struct Segments<'a> {
    start: Option<Point>,
    prev: Option<Point>,
    iter: std::slice::Iter<'a, Point>,
}

impl<'a> Iterator for Segments<'a> {
    type Item = (Point, Point);

    fn next(&mut self) -> Option<Self::Item> {
        let prev = self.prev?;
        let next = if let Some(next) = self.iter.next().cloned() {
            self.prev = Some(next);
            next
        } else {
            self.prev = None;
            self.start?
        };
        Some((prev, next))
    }
}
