//! The beachline: parabolic arcs ordered left to right
//!
//! Arcs live in a slotmap arena and reference their neighbors and bounding
//! edges by key, so splicing arcs in and out never leaves dangling links.

use glam::DVec2;
use slotmap::SlotMap;

use super::edge::{Edge, EdgeId};
use super::event::{Event, EventKey, EventQueue};
use crate::geometry::{self, Tolerance};

slotmap::new_key_type! {
    /// Stable handle of an arc on the beachline
    pub struct ArcKey;
}

/// One parabola of the beachline
#[derive(Debug, Clone)]
pub struct BeachArc {
    focus: usize,
    left: Option<ArcKey>,
    right: Option<ArcKey>,
    left_edge: Option<EdgeId>,
    right_edge: Option<EdgeId>,
    circle_event: Option<EventKey>,
}

impl BeachArc {
    fn new(focus: usize) -> Self {
        Self {
            focus,
            left: None,
            right: None,
            left_edge: None,
            right_edge: None,
            circle_event: None,
        }
    }

    /// Index of the site this arc belongs to
    #[inline]
    pub fn focus(&self) -> usize {
        self.focus
    }

    #[inline]
    pub fn left_edge(&self) -> Option<EdgeId> {
        self.left_edge
    }

    #[inline]
    pub fn right_edge(&self) -> Option<EdgeId> {
        self.right_edge
    }

    /// Whether a circle event is pending for this arc
    #[inline]
    pub fn has_circle_event(&self) -> bool {
        self.circle_event.is_some()
    }
}

/// Read-only snapshot of an arc, in beachline order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcView {
    pub key: ArcKey,
    /// Index of the site this arc belongs to
    pub focus: usize,
    pub left_edge: Option<EdgeId>,
    pub right_edge: Option<EdgeId>,
}

/// A vertex found where an arc's two edges meet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Convergence {
    pub left_edge: EdgeId,
    pub right_edge: EdgeId,
    pub vertex: DVec2,
}

/// Ordered sequence of arcs separated by edges
#[derive(Debug, Clone, Default)]
pub struct Beachline {
    arcs: SlotMap<ArcKey, BeachArc>,
    head: Option<ArcKey>,
    tolerance: Tolerance,
}

impl Beachline {
    pub fn new(tolerance: Tolerance) -> Self {
        Self {
            tolerance,
            ..Self::default()
        }
    }

    #[inline]
    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    pub fn get(&self, key: ArcKey) -> Option<&BeachArc> {
        self.arcs.get(key)
    }

    /// Arcs from left to right
    pub fn iter(&self) -> impl Iterator<Item = (ArcKey, &BeachArc)> + '_ {
        std::iter::successors(self.head, move |key| self.arcs.get(*key).and_then(|arc| arc.right))
            .filter_map(move |key| self.arcs.get(key).map(|arc| (key, arc)))
    }

    /// Arcs from left to right, as plain values for drawing and inspection
    pub fn views(&self) -> impl Iterator<Item = ArcView> + '_ {
        self.iter().map(|(key, arc)| ArcView {
            key,
            focus: arc.focus,
            left_edge: arc.left_edge,
            right_edge: arc.right_edge,
        })
    }

    /// Find the arc covering column `x` at the given sweep coordinate
    ///
    /// A breakpoint exactly at `x` belongs to the arc on its right.
    pub fn locate_arc_above(
        &self,
        x: f64,
        directrix: f64,
        sites: &[DVec2],
        edges: &[Edge],
    ) -> Option<ArcKey> {
        for (key, arc) in self.iter() {
            match arc.right_edge {
                Some(edge) if x >= edges[edge.0].x_at(sites, directrix, self.tolerance) => {
                    continue
                }
                _ => return Some(key),
            }
        }
        None
    }

    /// Move every live breakpoint to the given sweep coordinate
    pub fn update_directrix(&self, directrix: f64, sites: &[DVec2], edges: &mut [Edge]) {
        for (_, arc) in self.iter() {
            if let Some(edge) = arc.right_edge {
                edges[edge.0].update_directrix(sites, directrix, self.tolerance);
            }
        }
    }

    /// Insert the arc of a new site, splitting the arc above it
    ///
    /// The sweep line is assumed to lie on the site.
    pub fn insert_site(
        &mut self,
        site: usize,
        sites: &[DVec2],
        edges: &mut Vec<Edge>,
        queue: &mut EventQueue,
    ) {
        let position = sites[site];
        let directrix = position.y;

        let Some(above) = self.locate_arc_above(position.x, directrix, sites, edges) else {
            let key = self.arcs.insert(BeachArc::new(site));
            self.head = Some(key);
            return;
        };

        self.invalidate_circle_event(above, queue);

        let above_focus = self.arcs[above].focus;
        let new_arc = if (sites[above_focus].y - directrix).abs() < self.tolerance.epsilon {
            self.split_on_sweep_line(above, site, sites, edges)
        } else {
            self.split_below(above, site, sites, edges)
        };

        // only triples touching the new arc changed
        let (left, right) = {
            let arc = &self.arcs[new_arc];
            (arc.left, arc.right)
        };
        for key in [left, Some(new_arc), right].into_iter().flatten() {
            self.check_circle_event(key, directrix, sites, edges, queue);
        }
    }

    /// Both foci on the sweep line: the new arc joins the row beside `above`
    ///
    /// A neighbor of `above` on the new site's side lies on the line as well.
    /// The edge towards it is re-spanned to the new site, since the new arc now
    /// separates the two, and `above` gets a fresh edge to the new arc.
    fn split_on_sweep_line(
        &mut self,
        above: ArcKey,
        site: usize,
        sites: &[DVec2],
        edges: &mut Vec<Edge>,
    ) -> ArcKey {
        let above_focus = self.arcs[above].focus;
        let fresh = EdgeId(edges.len());
        let new_key = self.arcs.insert(BeachArc::new(site));
        let midpoint = |a: usize, b: usize| (sites[a] + sites[b]) / 2.0;

        if sites[above_focus].x < sites[site].x {
            edges.push(Edge::unbounded(midpoint(above_focus, site), above_focus, site, sites));

            let old_right = self.arcs[above].right;
            let old_right_edge = self.arcs[above].right_edge;
            if let Some(right) = old_right {
                let right_focus = self.arcs[right].focus;
                if let Some(edge) = old_right_edge {
                    edges[edge.0] =
                        Edge::unbounded(midpoint(site, right_focus), site, right_focus, sites);
                }
                self.arcs[right].left = Some(new_key);
            }
            {
                let new_arc = &mut self.arcs[new_key];
                new_arc.left = Some(above);
                new_arc.left_edge = Some(fresh);
                new_arc.right = old_right;
                new_arc.right_edge = old_right_edge;
            }
            let arc = &mut self.arcs[above];
            arc.right = Some(new_key);
            arc.right_edge = Some(fresh);
        } else {
            edges.push(Edge::unbounded(midpoint(site, above_focus), site, above_focus, sites));

            let old_left = self.arcs[above].left;
            let old_left_edge = self.arcs[above].left_edge;
            match old_left {
                Some(left) => {
                    let left_focus = self.arcs[left].focus;
                    if let Some(edge) = old_left_edge {
                        edges[edge.0] =
                            Edge::unbounded(midpoint(left_focus, site), left_focus, site, sites);
                    }
                    self.arcs[left].right = Some(new_key);
                }
                None => self.head = Some(new_key),
            }
            {
                let new_arc = &mut self.arcs[new_key];
                new_arc.right = Some(above);
                new_arc.right_edge = Some(fresh);
                new_arc.left = old_left;
                new_arc.left_edge = old_left_edge;
            }
            let arc = &mut self.arcs[above];
            arc.left = Some(new_key);
            arc.left_edge = Some(fresh);
        }
        new_key
    }

    /// General case: `above` keeps its left part, a new arc and a copy of
    /// `above` follow it, separated by two twin edges
    fn split_below(
        &mut self,
        above: ArcKey,
        site: usize,
        sites: &[DVec2],
        edges: &mut Vec<Edge>,
    ) -> ArcKey {
        let above_focus = self.arcs[above].focus;
        let position = sites[site];
        let start = DVec2::new(
            position.x,
            geometry::parabola_y(
                sites[above_focus],
                position.y,
                position.x,
                self.tolerance.epsilon,
            ),
        );

        let left_edge = EdgeId(edges.len());
        let right_edge = EdgeId(edges.len() + 1);
        let mut left = Edge::new(start, above_focus, site, sites);
        let mut right = Edge::new(start, site, above_focus, sites);
        left.set_twin(right_edge);
        right.set_twin(left_edge);
        edges.push(left);
        edges.push(right);

        let old_right = self.arcs[above].right;
        let old_right_edge = self.arcs[above].right_edge;

        let middle = self.arcs.insert(BeachArc::new(site));
        let copy = self.arcs.insert(BeachArc {
            left: Some(middle),
            right: old_right,
            left_edge: Some(right_edge),
            right_edge: old_right_edge,
            ..BeachArc::new(above_focus)
        });
        {
            let arc = &mut self.arcs[middle];
            arc.left = Some(above);
            arc.right = Some(copy);
            arc.left_edge = Some(left_edge);
            arc.right_edge = Some(right_edge);
        }
        if let Some(right) = old_right {
            self.arcs[right].left = Some(copy);
        }
        let arc = &mut self.arcs[above];
        arc.right = Some(middle);
        arc.right_edge = Some(left_edge);
        middle
    }

    /// Remove an arc whose circle event fired at `vertex`
    ///
    /// Caps both of its edges, joins its neighbors with a new edge starting at
    /// the vertex and re-tests the neighbors. Returns the new edge, or `None`
    /// if the arc is gone or lacks a neighbor.
    pub fn remove_arc(
        &mut self,
        key: ArcKey,
        vertex: DVec2,
        directrix: f64,
        sites: &[DVec2],
        edges: &mut Vec<Edge>,
        queue: &mut EventQueue,
    ) -> Option<EdgeId> {
        let arc = self.arcs.get(key)?;
        let (left, right) = (arc.left?, arc.right?);
        let (left_edge, right_edge) = (arc.left_edge?, arc.right_edge?);

        edges[left_edge.0].set_vertex(vertex);
        edges[right_edge.0].set_vertex(vertex);

        let edge_id = EdgeId(edges.len());
        edges.push(Edge::new(
            vertex,
            self.arcs[left].focus,
            self.arcs[right].focus,
            sites,
        ));

        {
            let arc = &mut self.arcs[left];
            arc.right = Some(right);
            arc.right_edge = Some(edge_id);
        }
        {
            let arc = &mut self.arcs[right];
            arc.left = Some(left);
            arc.left_edge = Some(edge_id);
        }

        self.invalidate_circle_event(key, queue);
        self.invalidate_circle_event(left, queue);
        self.invalidate_circle_event(right, queue);
        self.arcs.remove(key);

        self.check_circle_event(left, directrix, sites, edges, queue);
        self.check_circle_event(right, directrix, sites, edges, queue);

        Some(edge_id)
    }

    /// Vertex where the arc would vanish, if its breakpoints converge
    pub fn circle_vertex(&self, key: ArcKey, sites: &[DVec2], edges: &[Edge]) -> Option<DVec2> {
        let arc = self.arcs.get(key)?;
        let left = self.arcs.get(arc.left?)?;
        let right = self.arcs.get(arc.right?)?;
        let left_edge = &edges[arc.left_edge?.0];
        let right_edge = &edges[arc.right_edge?.0];

        // the three foci must turn clockwise for the breakpoints to meet
        let a = sites[left.focus];
        let b = sites[arc.focus];
        let c = sites[right.focus];
        if !geometry::turns_clockwise(a, b, c) {
            return None;
        }

        left_edge.intersection(right_edge, self.tolerance)
    }

    /// Queue a circle event for `key` if its breakpoints converge
    ///
    /// Any older event of the arc is dropped first.
    pub fn check_circle_event(
        &mut self,
        key: ArcKey,
        directrix: f64,
        sites: &[DVec2],
        edges: &[Edge],
        queue: &mut EventQueue,
    ) {
        self.invalidate_circle_event(key, queue);

        let Some(vertex) = self.circle_vertex(key, sites, edges) else {
            return;
        };

        let focus = sites[self.arcs[key].focus];
        let bottom = vertex.y - vertex.distance(focus);
        if bottom > directrix + self.tolerance.snap {
            log::trace!(
                "discarding circle event above the sweep line at {:.6} (sweep {:.6})",
                bottom,
                directrix
            );
            return;
        }

        let event_key = queue.insert(
            bottom.min(directrix),
            vertex.x,
            Event::Circle { arc: key, vertex },
        );
        log::trace!("circle event at y={:.6} for vertex {:?}", event_key.y(), vertex);
        self.arcs[key].circle_event = Some(event_key);
    }

    /// Drop the pending circle event of an arc, if any
    pub fn invalidate_circle_event(&mut self, key: ArcKey, queue: &mut EventQueue) {
        if let Some(arc) = self.arcs.get_mut(key) {
            if let Some(event) = arc.circle_event.take() {
                queue.remove(&event);
            }
        }
    }

    /// Vertices where remaining arcs' edges still meet
    pub fn converging_vertices(&self, sites: &[DVec2], edges: &[Edge]) -> Vec<Convergence> {
        self.iter()
            .filter_map(|(key, arc)| {
                let vertex = self.circle_vertex(key, sites, edges)?;
                Some(Convergence {
                    left_edge: arc.left_edge?,
                    right_edge: arc.right_edge?,
                    vertex,
                })
            })
            .collect()
    }
}
