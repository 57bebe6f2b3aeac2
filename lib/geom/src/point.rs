use serde::{Deserialize, Serialize};

/// A 2-D coordinate. Plain value type, no identity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Cross product of (b - self) and (c - self).
    ///
    /// Positive when the turn self -> b -> c is counter-clockwise.
    #[inline]
    #[must_use]
    pub fn cross(&self, b: Point, c: Point) -> f64 {
        (b.x - self.x) * (c.y - self.y) - (b.y - self.y) * (c.x - self.x)
    }
}
