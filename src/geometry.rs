//! Planar geometry primitives
//!
//! Points and vectors are `glam::DVec2`. The sweep line moves from large `y`
//! towards small `y`, so every parabola here opens upwards, away from a
//! directrix lying below its focus.

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Relative tolerance for dimensionless quantities
///
/// Compared against sines of angles and fractions of the bounds outline, so it
/// does not depend on the scale of the input.
pub const EPSILON: f64 = 1e-9;

/// Coordinate tolerance per unit of diagram extent
pub const COORDINATE_EPSILON: f64 = 1e-11;

/// Vertex snapping distance per unit of diagram extent
pub const SNAP_DISTANCE: f64 = 1e-8;

/// Absolute tolerances of one diagram
///
/// Both distances grow with the extent of the diagram, so a site set behaves
/// the same after uniform scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Sweep coordinates and parabola parameters closer than this are equal
    pub epsilon: f64,
    /// Points closer than this are the same vertex
    pub snap: f64,
}

impl Tolerance {
    /// Tolerances for a diagram whose largest side is `extent`
    pub fn for_extent(extent: f64) -> Self {
        let extent = if extent.is_finite() && extent > 0.0 {
            extent
        } else {
            1.0
        };

        Self {
            epsilon: COORDINATE_EPSILON * extent,
            snap: SNAP_DISTANCE * extent,
        }
    }

    /// Tolerances for a diagram clipped to `bounds`
    pub fn for_bounds(bounds: &Rect) -> Self {
        Self::for_extent(bounds.width().max(bounds.height()))
    }

    /// Check whether two points coincide within the snapping distance
    #[inline]
    pub fn same_point(&self, a: DVec2, b: DVec2) -> bool {
        a.distance_squared(b) < self.snap * self.snap
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::for_extent(1.0)
    }
}

/// 2D cross product (z component of the 3D cross product)
#[inline]
pub fn cross(a: DVec2, b: DVec2) -> f64 {
    a.perp_dot(b)
}

/// Check whether the path `a -> b -> c` turns clockwise by more than a
/// rounding error
pub fn turns_clockwise(a: DVec2, b: DVec2, c: DVec2) -> bool {
    let (ab, bc) = (b - a, c - b);
    cross(ab, bc) < -EPSILON * ab.length() * bc.length()
}

/// Intersection of the lines `p1 + t * d1` and `p2 + s * d2`
///
/// Returns `None` for parallel or identical lines.
pub fn line_intersection(p1: DVec2, d1: DVec2, p2: DVec2, d2: DVec2) -> Option<DVec2> {
    let denom = cross(d1, d2);
    if denom.abs() <= EPSILON * d1.length() * d2.length() {
        return None;
    }

    let t = cross(p2 - p1, d2) / denom;
    Some(p1 + d1 * t)
}

/// Height of the parabola with the given focus and horizontal directrix at `x`
///
/// A focus lying on the directrix degenerates to a vertical ray; its height is
/// reported as the focus height.
pub fn parabola_y(focus: DVec2, directrix: f64, x: f64, epsilon: f64) -> f64 {
    let p = focus.y - directrix;
    if p.abs() < epsilon {
        return focus.y;
    }

    let dx = x - focus.x;
    dx * dx / (2.0 * p) + (focus.y + directrix) / 2.0
}

/// Lowest point of the parabola with the given focus and directrix
#[inline]
pub fn parabola_vertex(focus: DVec2, directrix: f64) -> DVec2 {
    DVec2::new(focus.x, (focus.y + directrix) / 2.0)
}

/// X coordinate of the breakpoint between a left and a right parabola
///
/// Two parabolas generally cross twice. `take_lower_root` selects the smaller
/// solution; callers derive it from the site ordering of the edge being traced.
/// Heights closer than `epsilon` count as equal.
pub fn breakpoint_x(
    left: DVec2,
    right: DVec2,
    directrix: f64,
    take_lower_root: bool,
    epsilon: f64,
) -> f64 {
    if (left.y - right.y).abs() < epsilon {
        return (left.x + right.x) / 2.0;
    }

    let pl = left.y - directrix;
    let pr = right.y - directrix;
    if pl.abs() < epsilon {
        return left.x;
    }
    if pr.abs() < epsilon {
        return right.x;
    }

    let a = pr - pl;
    let b = 2.0 * (pl * right.x - pr * left.x);
    let c = pr * left.x * left.x - pl * right.x * right.x + pl * pr * (pl - pr);

    let discriminant = (b * b - 4.0 * a * c).max(0.0);
    let root = discriminant.sqrt();
    let x1 = (-b + root) / (2.0 * a);
    let x2 = (-b - root) / (2.0 * a);

    if take_lower_root {
        x1.min(x2)
    } else {
        x1.max(x2)
    }
}

/// Breakpoint between two parabolas as a point
///
/// Returns `None` when both foci lie on the directrix: their bisector then
/// meets the beachline infinitely far up.
pub fn breakpoint(
    left: DVec2,
    right: DVec2,
    directrix: f64,
    take_lower_root: bool,
    epsilon: f64,
) -> Option<DVec2> {
    let left_on_line = (left.y - directrix).abs() < epsilon;
    let right_on_line = (right.y - directrix).abs() < epsilon;
    if left_on_line && right_on_line {
        return None;
    }

    let x = breakpoint_x(left, right, directrix, take_lower_root, epsilon);
    let y = if left_on_line {
        parabola_y(right, directrix, x, epsilon)
    } else {
        parabola_y(left, directrix, x, epsilon)
    };
    Some(DVec2::new(x, y))
}

/// Axis-aligned rectangle
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Lower-left corner
    pub min: DVec2,
    /// Upper-right corner
    pub max: DVec2,
}

impl Rect {
    /// Create a rectangle from two corners
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    /// The `[0, size] x [0, size]` square
    pub fn from_size(size: f64) -> Self {
        Self::new(DVec2::ZERO, DVec2::splat(size))
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    #[inline]
    pub fn center(&self) -> DVec2 {
        (self.min + self.max) / 2.0
    }

    /// A rectangle is usable when it is finite and has positive extent
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.width() > 0.0 && self.height() > 0.0
    }

    /// Grow the rectangle so it contains `point`
    pub fn include(&mut self, point: DVec2) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Check whether `point` lies inside or within `tolerance` of the rectangle
    pub fn contains(&self, point: DVec2, tolerance: f64) -> bool {
        point.x >= self.min.x - tolerance
            && point.x <= self.max.x + tolerance
            && point.y >= self.min.y - tolerance
            && point.y <= self.max.y + tolerance
    }

    /// Check whether `point` lies on the rectangle outline
    pub fn on_boundary(&self, point: DVec2, tolerance: f64) -> bool {
        self.contains(point, tolerance) && self.boundary_distance(point) <= tolerance
    }

    /// Corners in counter-clockwise order, starting at `min`
    pub fn corners(&self) -> [DVec2; 4] {
        [
            self.min,
            DVec2::new(self.max.x, self.min.y),
            self.max,
            DVec2::new(self.min.x, self.max.y),
        ]
    }

    /// Point where a ray starting inside the rectangle leaves it
    pub fn ray_exit(&self, origin: DVec2, direction: DVec2) -> DVec2 {
        let mut t = f64::INFINITY;

        if direction.x > 0.0 {
            t = t.min((self.max.x - origin.x) / direction.x);
        } else if direction.x < 0.0 {
            t = t.min((self.min.x - origin.x) / direction.x);
        }

        if direction.y > 0.0 {
            t = t.min((self.max.y - origin.y) / direction.y);
        } else if direction.y < 0.0 {
            t = t.min((self.min.y - origin.y) / direction.y);
        }

        if !t.is_finite() {
            return origin;
        }

        origin + direction * t.max(0.0)
    }

    /// Counter-clockwise position of a boundary point along the outline
    ///
    /// The result lies in `[0, 4)`: side `k` covers `[k, k + 1)`, starting with
    /// the bottom side at `min`. Integer positions are the corners returned by
    /// [`Rect::corners`].
    pub fn perimeter_position(&self, point: DVec2) -> f64 {
        let bottom = (point.y - self.min.y).abs();
        let right = (point.x - self.max.x).abs();
        let top = (point.y - self.max.y).abs();
        let left = (point.x - self.min.x).abs();
        let nearest = bottom.min(right).min(top).min(left);

        let position = if nearest == bottom {
            (point.x - self.min.x) / self.width()
        } else if nearest == right {
            1.0 + (point.y - self.min.y) / self.height()
        } else if nearest == top {
            2.0 + (self.max.x - point.x) / self.width()
        } else {
            3.0 + (self.max.y - point.y) / self.height()
        };

        position.clamp(0.0, 4.0) % 4.0
    }

    /// Corners passed when walking the outline counter-clockwise from `from` to `to`
    pub fn corners_between(&self, from: DVec2, to: DVec2) -> Vec<DVec2> {
        let corners = self.corners();
        let start = self.perimeter_position(from);
        let mut end = self.perimeter_position(to);
        if end < start + EPSILON {
            end += 4.0;
        }

        let mut passed = Vec::new();
        let mut k = start.floor() + 1.0;
        while k < end - EPSILON {
            if k > start + EPSILON {
                passed.push(corners[(k as usize) % 4]);
            }
            k += 1.0;
        }
        passed
    }

    fn boundary_distance(&self, point: DVec2) -> f64 {
        let bottom = (point.y - self.min.y).abs();
        let right = (point.x - self.max.x).abs();
        let top = (point.y - self.max.y).abs();
        let left = (point.x - self.min.x).abs();
        bottom.min(right).min(top).min(left)
    }
}
