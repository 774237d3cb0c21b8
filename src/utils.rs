use crate::shape::Point;

/// Tolerance for comparisons between coordinates.
pub const EPSILON: f64 = 1e-9;

#[derive(Debug, PartialEq, Eq)]
pub enum Orientation {
    /// Clock Wise
    ///
    ///  a     b
    ///             c
    ///
    CW,
    /// Counter Clock Wise
    ///             c
    ///  a     b
    CCW,
    /// Collinear
    ///  a     b    c
    Collinear,
}

impl Orientation {
    pub fn is_cw(&self) -> bool {
        matches!(self, Self::CW)
    }
}

/// Exact orientation of `c` relative to the directed line `a -> b`.
pub fn orient_2d(a: Point, b: Point, c: Point) -> Orientation {
    let val = robust::orient2d(
        robust::Coord { x: a.x, y: a.y },
        robust::Coord { x: b.x, y: b.y },
        robust::Coord { x: c.x, y: c.y },
    );

    if val > 0. {
        Orientation::CCW
    } else if val < 0. {
        Orientation::CW
    } else {
        Orientation::Collinear
    }
}

/// Center of the circle through three points.
///
/// Returns `None` when the points are collinear or two of them coincide,
/// such a triple never produces a circle event.
pub fn circumcenter(p1: Point, p2: Point, p3: Point) -> Option<Point> {
    let ax = p1.x - p2.x;
    let ay = p1.y - p2.y;
    let cx = p3.x - p2.x;
    let cy = p3.y - p2.y;

    // exact zero only, `d` scales with the square of the triangle size
    let d = 2. * (ax * cy - ay * cx);
    if d == 0. {
        return None;
    }

    let ha = ax * ax + ay * ay;
    let hc = cx * cx + cy * cy;
    let x = (cy * ha - ay * hc) / d;
    let y = (ax * hc - cx * ha) / d;
    Some(Point::new(x + p2.x, y + p2.y))
}

/// Euclidean distance
pub fn distance(p1: Point, p2: Point) -> f64 {
    (p2.x - p1.x).hypot(p2.y - p1.y)
}

#[inline]
pub fn eq_eps(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

#[inline]
pub fn lt_eps(a: f64, b: f64) -> bool {
    b - a > EPSILON
}

#[inline]
pub fn gt_eps(a: f64, b: f64) -> bool {
    a - b > EPSILON
}
