//! Voronoi Polygon Structure
//!
//! The closed region of the plane nearest to one site, clipped to the diagram bounds.

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::EPSILON;

/// The clipped Voronoi cell of a single site
///
/// Produced by the assembly phase of [`crate::VoronoiDiagram`], one per site
/// and in site order.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    /// Index of the owning site in the diagram's site list
    pub site: usize,

    /// Position of the owning site
    pub center: DVec2,

    /// Closed loop of corners, wound counter-clockwise
    ///
    /// The last vertex connects back to the first; it is not repeated.
    pub vertices: Vec<DVec2>,

    /// Sites whose polygons share an edge with this one, sorted ascending
    pub neighbors: Vec<usize>,
}

impl Polygon {
    pub fn new(site: usize, center: DVec2, vertices: Vec<DVec2>, neighbors: Vec<usize>) -> Self {
        Self {
            site,
            center,
            vertices,
            neighbors,
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn neighbor_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Check if this polygon borders the polygon of another site
    #[inline]
    pub fn is_neighbor_of(&self, site: usize) -> bool {
        self.neighbors.binary_search(&site).is_ok()
    }

    /// Consecutive vertex pairs, including the closing one
    pub fn segments(&self) -> impl Iterator<Item = (DVec2, DVec2)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Shoelace area, positive for counter-clockwise winding
    pub fn signed_area(&self) -> f64 {
        if self.vertices.len() < 3 {
            return 0.0;
        }

        self.segments().map(|(a, b)| a.perp_dot(b)).sum::<f64>() * 0.5
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    #[inline]
    pub fn is_counter_clockwise(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Area-weighted centroid, or the site position for degenerate polygons
    pub fn centroid(&self) -> DVec2 {
        let area = self.signed_area();
        if !area.is_normal() {
            return self.center;
        }

        let sum = self
            .segments()
            .fold(DVec2::ZERO, |acc, (a, b)| acc + (a + b) * a.perp_dot(b));
        sum / (6.0 * area)
    }

    /// Point-in-polygon test for a convex counter-clockwise loop
    ///
    /// Points on the outline count as inside.
    pub fn contains(&self, point: DVec2) -> bool {
        if self.vertices.len() < 3 {
            return false;
        }

        self.segments()
            .all(|(a, b)| {
                let (edge, offset) = (b - a, point - a);
                edge.perp_dot(offset) >= -EPSILON * edge.length() * offset.length()
            })
    }
}
