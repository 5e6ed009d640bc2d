//! Voronoi edges traced by beachline breakpoints

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::{self, Rect, Tolerance};

/// Index of an edge in the diagram's edge list
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub usize);

/// Horizontal travel direction of a breakpoint as the sweep line descends
///
/// Derived once from the two sites when the edge is created. It decides which
/// of the two parabola intersections is the breakpoint this edge traces.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Growth {
    /// The breakpoint moves towards smaller x (left site is the higher one)
    Left,
    /// The breakpoint moves towards larger x (right site is the higher one)
    Right,
}

impl Growth {
    /// Classify the bisector between a left and a right site
    ///
    /// Sites at equal height give a vertical bisector; it is tagged `Left`
    /// when the sites are in left-to-right order and `Right` otherwise.
    pub fn between(left: DVec2, right: DVec2) -> Self {
        if left.y > right.y {
            Growth::Left
        } else if left.y < right.y {
            Growth::Right
        } else if left.x < right.x {
            Growth::Left
        } else {
            Growth::Right
        }
    }
}

/// A bisector between two sites, growing from `start` towards `end`
///
/// While the sweep is running `end` follows the breakpoint between the two
/// arcs. Once a vertex is set the edge is final.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Where the edge begins (an anchor on the line for unbounded edges)
    pub start: DVec2,
    /// Current breakpoint, or the final end point once `has_vertex` is set
    pub end: DVec2,
    /// Set when the end point is final
    pub has_vertex: bool,
    /// Index of the site on the left of the direction of travel
    pub left_site: usize,
    /// Index of the site on the right of the direction of travel
    pub right_site: usize,
    growth: Growth,
    direction: DVec2,
    unbounded_start: bool,
    twin: Option<EdgeId>,
}

impl Edge {
    /// Create an edge starting at `start` between two sites
    pub fn new(start: DVec2, left_site: usize, right_site: usize, sites: &[DVec2]) -> Self {
        let left = sites[left_site];
        let right = sites[right_site];

        Self {
            start,
            end: start,
            has_vertex: false,
            left_site,
            right_site,
            growth: Growth::between(left, right),
            // perpendicular to right - left, turned clockwise
            direction: DVec2::new(right.y - left.y, left.x - right.x),
            unbounded_start: false,
            twin: None,
        }
    }

    /// Create an edge that also extends infinitely behind `anchor`
    ///
    /// Used for the bisector of two sites met on the same sweep line, which
    /// reaches up to infinity.
    pub fn unbounded(anchor: DVec2, left_site: usize, right_site: usize, sites: &[DVec2]) -> Self {
        Self {
            unbounded_start: true,
            ..Self::new(anchor, left_site, right_site, sites)
        }
    }

    #[inline]
    pub fn growth(&self) -> Growth {
        self.growth
    }

    /// Direction of travel (not normalized)
    #[inline]
    pub fn direction(&self) -> DVec2 {
        self.direction
    }

    #[inline]
    pub fn is_unbounded_start(&self) -> bool {
        self.unbounded_start
    }

    /// The opposite half-edge created by the same site event, if any
    #[inline]
    pub fn twin(&self) -> Option<EdgeId> {
        self.twin
    }

    pub(crate) fn set_twin(&mut self, twin: EdgeId) {
        self.twin = Some(twin);
    }

    /// The site across this edge from `site`
    pub fn other_site(&self, site: usize) -> usize {
        if self.left_site == site {
            self.right_site
        } else {
            self.left_site
        }
    }

    #[inline]
    pub fn touches_site(&self, site: usize) -> bool {
        self.left_site == site || self.right_site == site
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// A final edge whose end points coincide
    pub fn is_degenerate(&self, tolerance: Tolerance) -> bool {
        self.has_vertex && !self.unbounded_start && self.length() < tolerance.snap
    }

    /// Cap the edge at `vertex`; later calls are ignored
    pub fn set_vertex(&mut self, vertex: DVec2) {
        if self.has_vertex {
            return;
        }

        self.has_vertex = true;
        self.end = vertex;
    }

    /// X position of the traced breakpoint for the given sweep coordinate
    pub fn x_at(&self, sites: &[DVec2], directrix: f64, tolerance: Tolerance) -> f64 {
        geometry::breakpoint_x(
            sites[self.left_site],
            sites[self.right_site],
            directrix,
            self.growth == Growth::Left,
            tolerance.epsilon,
        )
    }

    /// Move the open end to the breakpoint for the given sweep coordinate
    pub fn update_directrix(&mut self, sites: &[DVec2], directrix: f64, tolerance: Tolerance) {
        if self.has_vertex {
            return;
        }

        if let Some(point) = geometry::breakpoint(
            sites[self.left_site],
            sites[self.right_site],
            directrix,
            self.growth == Growth::Left,
            tolerance.epsilon,
        ) {
            self.end = point;
        }
    }

    /// Check whether `point` lies on the grown side of the start point
    pub fn is_ahead(&self, point: DVec2, tolerance: Tolerance) -> bool {
        if self.unbounded_start {
            return true;
        }

        let along = (point - self.start).dot(self.direction) / self.direction.length();
        along >= -tolerance.snap
    }

    /// Intersection with another edge that both edges can still reach
    ///
    /// Parallel or identical edges and intersections behind either edge's
    /// start give `None`.
    pub fn intersection(&self, other: &Edge, tolerance: Tolerance) -> Option<DVec2> {
        let point =
            geometry::line_intersection(self.start, self.direction, other.start, other.direction)?;

        if self.is_ahead(point, tolerance) && other.is_ahead(point, tolerance) {
            Some(point)
        } else {
            None
        }
    }

    /// Clip the open parts of the edge to `bounds`
    ///
    /// Open ends are pushed along the direction of travel until they leave the
    /// rectangle; an unbounded start is pulled back the same way.
    pub fn extend(&mut self, bounds: &Rect) {
        if self.unbounded_start {
            if !self.has_vertex {
                self.end = bounds.ray_exit(self.start, self.direction);
                self.has_vertex = true;
            }
            self.start = bounds.ray_exit(self.end, -self.direction);
            self.unbounded_start = false;
            return;
        }

        if !self.has_vertex {
            self.end = bounds.ray_exit(self.start, self.direction);
            self.has_vertex = true;
        }
    }

    /// Fuse with the twin half-edge so the edge spans both halves
    pub(crate) fn absorb_twin(&mut self, twin: &Edge) {
        self.start = twin.end;
        self.twin = None;
    }
}
