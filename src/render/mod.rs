//! Drawing for VoronoiDiagram
//!
//! Emits engine-agnostic primitives for a diagram at any step. Backends
//! implement [`DrawSurface`]; [`DrawList`] records the primitives instead.

mod palette;

pub use palette::{Color, Palette, BLACK, BLUE, GREEN, ORANGE, RED};

use glam::{DMat3, DVec2};

use crate::diagram::{Phase, VoronoiDiagram};
use crate::fortune::EdgeId;
use crate::geometry::Rect;

/// Target for diagram drawing
///
/// Coordinates are in world space; `begin` hands over the transform from
/// world space to the backend's screen space.
pub trait DrawSurface {
    fn begin(&mut self, _transform: DMat3) {}

    fn line(&mut self, from: DVec2, to: DVec2, color: Color);

    fn circle(&mut self, center: DVec2, radius: f64, color: Color);

    /// The part of the parabola with the given focus and horizontal
    /// directrix between `min_x` and `max_x`
    fn parabola(&mut self, focus: DVec2, directrix: f64, min_x: f64, max_x: f64, color: Color);

    fn end(&mut self) {}
}

/// A single recorded drawing call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Line {
        from: DVec2,
        to: DVec2,
        color: Color,
    },
    Circle {
        center: DVec2,
        radius: f64,
        color: Color,
    },
    Parabola {
        focus: DVec2,
        directrix: f64,
        min_x: f64,
        max_x: f64,
        color: Color,
    },
}

/// Surface that stores primitives for later replay or inspection
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    /// Transform passed to the last `begin`
    pub transform: DMat3,
    pub primitives: Vec<Primitive>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Recorded primitives drawn with `color`
    pub fn with_color(&self, color: Color) -> impl Iterator<Item = &Primitive> + '_ {
        self.primitives.iter().filter(move |primitive| {
            let own = match primitive {
                Primitive::Line { color, .. }
                | Primitive::Circle { color, .. }
                | Primitive::Parabola { color, .. } => *color,
            };
            own == color
        })
    }
}

impl DrawSurface for DrawList {
    fn begin(&mut self, transform: DMat3) {
        self.transform = transform;
        self.primitives.clear();
    }

    fn line(&mut self, from: DVec2, to: DVec2, color: Color) {
        self.primitives.push(Primitive::Line { from, to, color });
    }

    fn circle(&mut self, center: DVec2, radius: f64, color: Color) {
        self.primitives.push(Primitive::Circle {
            center,
            radius,
            color,
        });
    }

    fn parabola(&mut self, focus: DVec2, directrix: f64, min_x: f64, max_x: f64, color: Color) {
        self.primitives.push(Primitive::Parabola {
            focus,
            directrix,
            min_x,
            max_x,
            color,
        });
    }
}

/// Transform that centers `bounds` in a viewport and scales it to fit
///
/// The y axis is flipped so that larger world `y` is drawn higher up on
/// screens whose y axis points down.
pub fn fit_transform(bounds: Rect, viewport: DVec2) -> DMat3 {
    let scale = (viewport.x / bounds.width()).min(viewport.y / bounds.height());
    DMat3::from_translation(viewport / 2.0)
        * DMat3::from_scale(DVec2::new(scale, -scale))
        * DMat3::from_translation(-bounds.center())
}

/// Draw the current state of a diagram
///
/// While building: bounds, sweep line, beachline arcs and edges. Once
/// finished: bounds and polygon outlines. Sites are always drawn.
pub fn draw_diagram<S: DrawSurface>(
    diagram: &VoronoiDiagram,
    palette: &Palette,
    surface: &mut S,
) {
    draw_diagram_with_transform(diagram, palette, DMat3::IDENTITY, surface);
}

/// Like [`draw_diagram`], handing `transform` to the surface
pub fn draw_diagram_with_transform<S: DrawSurface>(
    diagram: &VoronoiDiagram,
    palette: &Palette,
    transform: DMat3,
    surface: &mut S,
) {
    surface.begin(transform);

    let bounds = diagram.bounds();
    let corners = bounds.corners();
    for i in 0..corners.len() {
        surface.line(corners[i], corners[(i + 1) % corners.len()], palette.bounds);
    }

    if diagram.phase() == Phase::Finished {
        for polygon in diagram.polygons() {
            for (from, to) in polygon.segments() {
                surface.line(from, to, palette.polygon);
            }
        }
    } else {
        if diagram.phase() == Phase::Sweeping {
            draw_beachline(diagram, palette, surface);
        }

        for edge in diagram.edges() {
            surface.line(edge.start, edge.end, palette.edge);
        }
    }

    for site in diagram.sites() {
        surface.circle(*site, palette.site_radius, palette.site);
    }

    surface.end();
}

fn draw_beachline<S: DrawSurface>(diagram: &VoronoiDiagram, palette: &Palette, surface: &mut S) {
    let bounds = diagram.bounds();
    let sweep_y = diagram.sweep_y();
    surface.line(
        DVec2::new(bounds.min.x, sweep_y),
        DVec2::new(bounds.max.x, sweep_y),
        palette.sweep_line,
    );

    let sites = diagram.sites();
    let edges = diagram.edges();
    let tolerance = diagram.tolerance();
    for arc in diagram.beachline().views() {
        let focus = sites[arc.focus];
        if (focus.y - sweep_y).abs() < tolerance.epsilon {
            continue;
        }

        let breakpoint = |edge: EdgeId| edges[edge.0].x_at(sites, sweep_y, tolerance);
        let min_x = arc
            .left_edge
            .map_or(bounds.min.x, breakpoint)
            .clamp(bounds.min.x, bounds.max.x);
        let max_x = arc
            .right_edge
            .map_or(bounds.max.x, breakpoint)
            .clamp(bounds.min.x, bounds.max.x);
        if min_x < max_x {
            surface.parabola(focus, sweep_y, min_x, max_x, palette.arc);
        }
    }
}
