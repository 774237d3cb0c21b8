use crate::utils::{eq_eps, EPSILON};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Default for Point {
    fn default() -> Self {
        Self { x: 0., y: 0. }
    }
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// whether both coordinates are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// whether two points coincide within `EPSILON`
    pub fn eq_eps(&self, other: &Self) -> bool {
        eq_eps(self.x, other.x) && eq_eps(self.y, other.y)
    }
}

/// Axis aligned rectangle the diagram is finalized against.
///
/// y grows upward: `yb` is the bottom (smaller) and `yt` the top (larger) side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub xl: f64,
    pub xr: f64,
    pub yb: f64,
    pub yt: f64,
}

impl BoundingBox {
    pub fn new(xl: f64, xr: f64, yb: f64, yt: f64) -> Self {
        Self { xl, xr, yb, yt }
    }

    /// Box around `points` with `margin_ratio` of the extent added on every side.
    /// A flat extent gets a margin of at least 1.0.
    pub fn around(points: impl IntoIterator<Item = Point>, margin_ratio: f64) -> Option<Self> {
        let mut xmax = f64::MIN;
        let mut xmin = f64::MAX;
        let mut ymax = f64::MIN;
        let mut ymin = f64::MAX;
        let mut empty = true;

        for p in points {
            empty = false;
            xmax = xmax.max(p.x);
            xmin = xmin.min(p.x);
            ymax = ymax.max(p.y);
            ymin = ymin.min(p.y);
        }

        if empty {
            return None;
        }

        let dx = ((xmax - xmin) * margin_ratio).max(1.);
        let dy = ((ymax - ymin) * margin_ratio).max(1.);
        Some(Self::new(xmin - dx, xmax + dx, ymin - dy, ymax + dy))
    }

    /// `xl < xr`, `yb < yt` and all sides finite
    pub fn is_valid(&self) -> bool {
        [self.xl, self.xr, self.yb, self.yt]
            .iter()
            .all(|v| v.is_finite())
            && self.xl < self.xr
            && self.yb < self.yt
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.xl && p.x <= self.xr && p.y >= self.yb && p.y <= self.yt
    }

    /// contains, with `EPSILON` slack on every side
    pub fn contains_eps(&self, p: Point) -> bool {
        p.x > self.xl - EPSILON
            && p.x < self.xr + EPSILON
            && p.y > self.yb - EPSILON
            && p.y < self.yt + EPSILON
    }

    pub fn width(&self) -> f64 {
        self.xr - self.xl
    }

    pub fn height(&self) -> f64 {
        self.yt - self.yb
    }
}
