use crate::{GeomError, Point, Result};
use serde::{Deserialize, Serialize};

/// Nudge applied to a ray-cast query whose y coordinate lands exactly on a
/// segment endpoint. Keeps horizontal-ray hits off the degenerate case.
const RAY_EPSILON: f64 = 1e-4;

/// Convex polygon bounding the opaque pixels of a silhouette.
///
/// Vertices are stored in counter-clockwise walk order. Inputs with fewer than
/// three points are kept as-is (a pseudo-hull): callers that require a true
/// polygon check with [`Hull::require_polygon`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hull {
    vertices: Vec<Point>,
}

impl Hull {
    /// Build the convex hull of a point set with a gift-wrapping (Jarvis
    /// march) walk.
    ///
    /// The walk starts at the minimum-x point (first occurrence on ties) and
    /// at each step takes the candidate making the most counter-clockwise
    /// turn under the strict cross-product test. O(h·n); runs once per
    /// silhouette, not per optimization step.
    #[must_use]
    pub fn from_points(points: Vec<Point>) -> Self {
        if points.len() < 3 {
            return Self { vertices: points };
        }

        let mut leftmost = 0;
        for (i, p) in points.iter().enumerate() {
            if p.x < points[leftmost].x {
                leftmost = i;
            }
        }

        let mut vertices = Vec::new();
        let mut current = leftmost;
        loop {
            vertices.push(points[current]);
            let mut next = 0;
            for i in 1..points.len() {
                if next == current || points[current].cross(points[next], points[i]) > 0.0 {
                    next = i;
                }
            }
            current = next;
            if current == leftmost {
                break;
            }
        }

        Self { vertices }
    }

    /// Extract the hull of every opacity-positive pixel in a row-major alpha
    /// channel of size `width` x `height`.
    #[must_use]
    pub fn from_alpha_mask(width: u32, height: u32, alpha: &[u8]) -> Self {
        let mut points = Vec::new();
        for y in 0..height {
            for x in 0..width {
                let idx = (y * width + x) as usize;
                if alpha.get(idx).copied().unwrap_or(0) > 0 {
                    points.push(Point::new(f64::from(x), f64::from(y)));
                }
            }
        }
        Self::from_points(points)
    }

    #[inline]
    #[must_use]
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// True when the input had fewer than 3 points and no polygon was formed.
    #[inline]
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.vertices.len() < 3
    }

    /// Error out when a caller assumes a true polygon and this is a
    /// pseudo-hull.
    pub fn require_polygon(&self) -> Result<&Self> {
        if self.is_degenerate() {
            return Err(GeomError::InvalidGeometry {
                points: self.vertices.len(),
            });
        }
        Ok(self)
    }

    /// Polygon area via the shoelace formula. Diagnostic only; the optimizer
    /// never looks at area.
    #[must_use]
    pub fn area(&self) -> f64 {
        let n = self.vertices.len();
        let mut area = 0.0;
        for i in 0..n {
            let j = (i + 1) % n;
            area += self.vertices[i].x * self.vertices[j].y;
            area -= self.vertices[j].x * self.vertices[i].y;
        }
        area.abs() / 2.0
    }

    /// Offset every vertex by (dx, dy), e.g. image-local to canvas
    /// coordinates.
    #[must_use]
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            vertices: self
                .vertices
                .iter()
                .map(|p| Point::new(p.x + dx, p.y + dy))
                .collect(),
        }
    }

    /// Even-odd ray-cast containment test.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        // The query is nudged in place when its y lands on an endpoint y, and
        // the nudged value carries across the remaining edges.
        let mut p = point;
        let mut count = 0;
        for i in 0..self.vertices.len() {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % self.vertices.len()];
            if ray_intersects_segment(&mut p, a, b) {
                count += 1;
            }
        }
        count % 2 == 1
    }

    /// Overlap test: true iff any vertex of `self` lies inside `other` or any
    /// vertex of `other` lies inside `self`.
    ///
    /// This is a vertex-containment heuristic, not a separating-axis test. A
    /// "pass-through" overlap where the polygons cross but neither contributes
    /// a contained vertex is reported as non-intersecting. Known limitation,
    /// kept to preserve packing behavior; see `intersects_misses_pass_through_overlap`.
    #[must_use]
    pub fn intersects(&self, other: &Hull) -> bool {
        self.vertices.iter().any(|&p| other.contains(p))
            || other.vertices.iter().any(|&p| self.contains(p))
    }
}

/// Does a leftward horizontal ray from `p` cross segment `ab`?
///
/// Mutates `p` with the epsilon nudge so the adjusted y is reused for the
/// caller's remaining segments.
fn ray_intersects_segment(p: &mut Point, a: Point, b: Point) -> bool {
    let (a, b) = if a.y > b.y { (b, a) } else { (a, b) };
    if p.y == a.y || p.y == b.y {
        p.y += RAY_EPSILON;
    }
    if p.y < a.y || p.y > b.y || p.x >= a.x.max(b.x) {
        return false;
    }
    if p.x < a.x.min(b.x) {
        return true;
    }

    let red = (p.y - a.y) / (p.x - a.x);
    let blue = (b.y - a.y) / (b.x - a.x);
    red >= blue
}
