//! Stitching clipped edges into one closed polygon per site

use glam::DVec2;

use super::edge::Edge;
use crate::geometry::{self, Rect, Tolerance};
use crate::polygon::Polygon;

/// One edge as seen from a site, oriented counter-clockwise around it
#[derive(Debug, Clone, Copy)]
struct Fragment {
    from: DVec2,
    to: DVec2,
    neighbor: usize,
}

/// Build the polygon of every site from final, clipped edges
///
/// Edges must all carry a vertex. Gaps between consecutive fragments are
/// closed by walking the outline of `bounds` counter-clockwise.
pub fn assemble_polygons(
    sites: &[DVec2],
    edges: &[Edge],
    bounds: &Rect,
    tolerance: Tolerance,
) -> Vec<Polygon> {
    let mut fragments: Vec<Vec<Fragment>> = vec![Vec::new(); sites.len()];

    for edge in edges.iter().filter(|edge| !edge.is_degenerate(tolerance)) {
        for (site, neighbor) in [
            (edge.left_site, edge.right_site),
            (edge.right_site, edge.left_site),
        ] {
            fragments[site].push(orient(sites[site], edge.start, edge.end, neighbor));
        }
    }

    fragments
        .into_iter()
        .enumerate()
        .map(|(site, fragments)| assemble_site(site, sites[site], fragments, bounds, tolerance))
        .collect()
}

fn orient(site: DVec2, a: DVec2, b: DVec2, neighbor: usize) -> Fragment {
    if geometry::cross(a - site, b - a) >= 0.0 {
        Fragment {
            from: a,
            to: b,
            neighbor,
        }
    } else {
        Fragment {
            from: b,
            to: a,
            neighbor,
        }
    }
}

fn assemble_site(
    site: usize,
    center: DVec2,
    mut fragments: Vec<Fragment>,
    bounds: &Rect,
    tolerance: Tolerance,
) -> Polygon {
    if fragments.is_empty() {
        return Polygon::new(site, center, bounds.corners().to_vec(), Vec::new());
    }

    fragments.sort_by(|a, b| angle(center, a.from).total_cmp(&angle(center, b.from)));

    let mut vertices: Vec<DVec2> = Vec::with_capacity(fragments.len() * 2);
    let push = |vertices: &mut Vec<DVec2>, point: DVec2| {
        if vertices
            .last()
            .map_or(true, |last| !tolerance.same_point(*last, point))
        {
            vertices.push(point);
        }
    };

    for (i, fragment) in fragments.iter().enumerate() {
        push(&mut vertices, fragment.from);
        push(&mut vertices, fragment.to);

        let next = fragments[(i + 1) % fragments.len()].from;
        if tolerance.same_point(fragment.to, next) {
            continue;
        }

        if !bounds.on_boundary(fragment.to, tolerance.snap)
            || !bounds.on_boundary(next, tolerance.snap)
        {
            log::error!(
                "polygon of site {} has an open gap between {:?} and {:?}",
                site,
                fragment.to,
                next
            );
            debug_assert!(false, "unclosable polygon chain for site {site}");
        }

        for corner in bounds.corners_between(fragment.to, next) {
            push(&mut vertices, corner);
        }
    }

    while vertices.len() > 1
        && vertices
            .last()
            .is_some_and(|last| tolerance.same_point(*last, vertices[0]))
    {
        vertices.pop();
    }

    let mut neighbors: Vec<usize> = fragments.iter().map(|fragment| fragment.neighbor).collect();
    neighbors.sort_unstable();
    neighbors.dedup();

    Polygon::new(site, center, vertices, neighbors)
}

#[inline]
fn angle(center: DVec2, point: DVec2) -> f64 {
    let offset = point - center;
    offset.y.atan2(offset.x)
}
