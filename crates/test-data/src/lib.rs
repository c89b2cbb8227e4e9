use tessera_geometry::Point;

/// A triangulation input: one outer loop, holes and constraint loops.
///
/// All loops are explicitly closed (first point repeated at the end).
pub struct TestPolygon {
    pub outer: &'static [Point],
    pub holes: &'static [&'static [Point]],
    pub building_loops: &'static [&'static [Point]],
    pub area: f64,
}

const fn p(x: f64, y: f64) -> Point {
    Point::planar(x, y)
}

pub const UNIT_SQUARE: TestPolygon = TestPolygon {
    outer: &[p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0), p(0.0, 0.0)],
    holes: &[],
    building_loops: &[],
    area: 1.0,
};

/// A 10x10 square with a 2x2 square hole in the middle.
pub const SQUARE_WITH_HOLE: TestPolygon = TestPolygon {
    outer: &[
        p(0.0, 0.0),
        p(10.0, 0.0),
        p(10.0, 10.0),
        p(0.0, 10.0),
        p(0.0, 0.0),
    ],
    holes: &[&[p(4.0, 4.0), p(6.0, 4.0), p(6.0, 6.0), p(4.0, 6.0), p(4.0, 4.0)]],
    building_loops: &[],
    area: 96.0,
};

/// An L shaped (concave) outline, two square holes and one building footprint.
pub const L_SHAPE_WITH_HOLES: TestPolygon = TestPolygon {
    outer: &[
        p(0.0, 0.0),
        p(20.0, 0.0),
        p(20.0, 8.0),
        p(8.0, 8.0),
        p(8.0, 20.0),
        p(0.0, 20.0),
        p(0.0, 0.0),
    ],
    holes: &[
        &[p(2.0, 2.0), p(4.0, 2.0), p(4.0, 4.0), p(2.0, 4.0), p(2.0, 2.0)],
        &[p(12.0, 2.0), p(15.0, 2.0), p(15.0, 5.0), p(12.0, 5.0), p(12.0, 2.0)],
    ],
    building_loops: &[&[
        p(2.0, 12.0),
        p(6.0, 12.0),
        p(6.0, 16.0),
        p(2.0, 16.0),
        p(2.0, 12.0),
    ]],
    area: 256.0 - 4.0 - 9.0,
};

/// Two buildings sharing one full side. Identical shared segments are legal.
pub const ADJACENT_BUILDINGS: TestPolygon = TestPolygon {
    outer: UNIT_SQUARE.outer,
    holes: &[],
    building_loops: &[
        &[
            p(0.25, 0.25),
            p(0.55, 0.25),
            p(0.55, 0.75),
            p(0.25, 0.75),
            p(0.25, 0.25),
        ],
        &[
            p(0.55, 0.25),
            p(0.85, 0.25),
            p(0.85, 0.75),
            p(0.55, 0.75),
            p(0.55, 0.25),
        ],
    ],
    area: 1.0,
};

/// Two buildings whose shared side only partially overlaps. The engine must
/// reject this.
pub const OVERLAPPING_BUILDINGS: TestPolygon = TestPolygon {
    outer: UNIT_SQUARE.outer,
    holes: &[],
    building_loops: &[
        &[
            p(0.25, 0.25),
            p(0.55, 0.25),
            p(0.55, 0.75),
            p(0.25, 0.75),
            p(0.25, 0.25),
        ],
        &[
            p(0.55, 0.35),
            p(0.85, 0.35),
            p(0.85, 0.85),
            p(0.55, 0.85),
            p(0.55, 0.35),
        ],
    ],
    area: 1.0,
};

/// Two buildings whose outlines cross each other.
pub const CROSSING_BUILDINGS: TestPolygon = TestPolygon {
    outer: UNIT_SQUARE.outer,
    holes: &[],
    building_loops: &[
        &[p(0.2, 0.2), p(0.6, 0.2), p(0.6, 0.6), p(0.2, 0.6), p(0.2, 0.2)],
        &[p(0.4, 0.4), p(0.8, 0.4), p(0.8, 0.8), p(0.4, 0.8), p(0.4, 0.4)],
    ],
    area: 1.0,
};
