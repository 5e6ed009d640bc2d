//! VoronoiDiagram main structure
//!
//! A Fortune's sweep over a fixed site set that can be advanced one step at a
//! time, followed by clipping to a bounding box and polygon assembly.

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{DiagramConfig, StepOptions};
use crate::error::{Result, VoronoiError};
use crate::fortune::{assemble_polygons, Beachline, Edge, Event, EventQueue};
use crate::generation::SiteGenerator;
use crate::geometry::{Rect, Tolerance};
use crate::polygon::Polygon;

/// Stage of the construction
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Processing site and circle events
    Sweeping,
    /// Capping open edges against the bounding box
    Extending,
    /// Building one polygon per site
    AssemblingPolygons,
    /// Nothing left to do
    Finished,
}

/// A Voronoi diagram built incrementally by a sweep line
///
/// Every call to [`VoronoiDiagram::next_step`] performs one unit of work, so
/// the intermediate beachline and edges can be inspected or drawn between
/// steps.
///
/// # Example
///
/// ```
/// use fortune_sweep::*;
///
/// let sites = vec![
///     DVec2::new(20.0, 30.0),
///     DVec2::new(70.0, 80.0),
///     DVec2::new(60.0, 20.0),
/// ];
/// let mut diagram = VoronoiDiagram::new(sites, Rect::from_size(100.0)).unwrap();
/// diagram.run_to_completion();
///
/// assert_eq!(diagram.phase(), Phase::Finished);
/// assert_eq!(diagram.polygons().len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct VoronoiDiagram {
    /// Input sites, indexed by site id
    sites: Vec<DVec2>,

    /// Rectangle the diagram is clipped to at minimum
    bounds_hint: Rect,

    /// Final clipping rectangle, grown to hold every site and vertex
    bounds: Rect,

    /// Tolerances sized to the extent of the sites and the bounds hint
    tolerance: Tolerance,

    options: StepOptions,
    phase: Phase,

    /// Current sweep line coordinate, descending over time
    sweep_y: f64,

    queue: EventQueue,
    beachline: Beachline,
    edges: Vec<Edge>,
    vertices: Vec<DVec2>,
    polygons: Vec<Polygon>,
    steps: usize,
}

impl VoronoiDiagram {
    /// Prepare a diagram over `sites`, ready for the first step
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for fewer than two sites, non-finite sites,
    /// sites closer together than the snapping distance, or a bounds hint
    /// without positive area.
    pub fn new(sites: Vec<DVec2>, bounds_hint: Rect) -> Result<Self> {
        Self::with_options(sites, bounds_hint, StepOptions::default())
    }

    /// Like [`VoronoiDiagram::new`], with explicit stepping options
    pub fn with_options(
        sites: Vec<DVec2>,
        bounds_hint: Rect,
        options: StepOptions,
    ) -> Result<Self> {
        if !bounds_hint.is_valid() {
            return Err(VoronoiError::InvalidInput(format!(
                "bounds must have positive size (got {:?})",
                bounds_hint
            )));
        }
        validate_sites(&sites, &bounds_hint)?;
        if let Some(increment) = options.sweep_increment {
            if !(increment.is_finite() && increment > 0.0) {
                return Err(VoronoiError::InvalidInput(format!(
                    "sweep increment must be positive (got {})",
                    increment
                )));
            }
        }

        let mut diagram = Self {
            sites,
            bounds_hint,
            bounds: bounds_hint,
            tolerance: Tolerance::for_bounds(&bounds_hint),
            options,
            phase: Phase::Sweeping,
            sweep_y: bounds_hint.max.y,
            queue: EventQueue::new(),
            beachline: Beachline::default(),
            edges: Vec::new(),
            vertices: Vec::new(),
            polygons: Vec::new(),
            steps: 0,
        };
        diagram.initialize();
        Ok(diagram)
    }

    /// Draw sites from a fresh generator for `config` and prepare a diagram
    ///
    /// The generator is returned so that [`VoronoiDiagram::reset_with`] can
    /// continue its sequence.
    ///
    /// # Example
    ///
    /// ```
    /// use fortune_sweep::*;
    ///
    /// let config = DiagramConfigBuilder::new().seed(42).build().unwrap();
    /// let (mut diagram, mut generator) = VoronoiDiagram::generate(&config).unwrap();
    /// diagram.run_to_completion();
    ///
    /// diagram.reset_with(&mut generator).unwrap();
    /// assert_eq!(diagram.phase(), Phase::Sweeping);
    /// ```
    pub fn generate(config: &DiagramConfig) -> Result<(Self, SiteGenerator)> {
        let mut generator = SiteGenerator::from_config(config);
        let sites = generator.generate()?;
        let diagram = Self::with_options(sites, config.bounds(), config.step_options())?;
        Ok((diagram, generator))
    }

    /// Replace the sites and start over
    ///
    /// On error the diagram is left untouched.
    pub fn reset(&mut self, sites: Vec<DVec2>) -> Result<()> {
        validate_sites(&sites, &self.bounds_hint)?;
        self.sites = sites;
        self.initialize();
        Ok(())
    }

    /// Replace the sites with a fresh set from `generator` and start over
    pub fn reset_with(&mut self, generator: &mut SiteGenerator) -> Result<()> {
        let sites = generator.generate()?;
        self.reset(sites)
    }

    /// Start over with the same sites
    ///
    /// Replaying the steps reproduces the same diagram bit for bit.
    pub fn redo(&mut self) {
        self.initialize();
    }

    fn initialize(&mut self) {
        self.queue = EventQueue::new();
        for (site, position) in self.sites.iter().enumerate() {
            self.queue.insert_site(site, *position);
        }

        self.tolerance = site_tolerance(&self.sites, &self.bounds_hint);
        self.beachline = Beachline::new(self.tolerance);
        self.edges.clear();
        self.vertices.clear();
        self.polygons.clear();
        self.bounds = self.bounds_hint;
        self.phase = Phase::Sweeping;
        self.steps = 0;
        self.sweep_y = self
            .sites
            .iter()
            .map(|site| site.y)
            .fold(self.bounds_hint.max.y, f64::max);

        log::info!(
            "starting sweep over {} sites from y={}",
            self.sites.len(),
            self.sweep_y
        );
    }

    /// Advance the construction by one step
    ///
    /// Returns `false` once the diagram is finished; further calls do nothing.
    pub fn next_step(&mut self) -> bool {
        match self.phase {
            Phase::Sweeping => self.sweep_step(),
            Phase::Extending => self.extend_edges(),
            Phase::AssemblingPolygons => self.assemble(),
            Phase::Finished => return false,
        }

        self.steps += 1;
        true
    }

    /// Step until the diagram is finished, returning the steps taken
    pub fn run_to_completion(&mut self) -> usize {
        let mut steps = 0;
        while self.next_step() {
            steps += 1;
        }
        steps
    }

    fn sweep_step(&mut self) {
        let Some(next_y) = self.queue.peek().map(|key| key.y()) else {
            self.finish_sweep();
            return;
        };

        if let Some(increment) = self.options.sweep_increment {
            if self.sweep_y - next_y > increment {
                self.sweep_y -= increment;
                self.beachline
                    .update_directrix(self.sweep_y, &self.sites, &mut self.edges);
                return;
            }
        }

        let Some((key, event)) = self.queue.pop() else {
            self.finish_sweep();
            return;
        };

        self.sweep_y = key.y().min(self.sweep_y);
        self.beachline
            .update_directrix(self.sweep_y, &self.sites, &mut self.edges);

        match event {
            Event::Site { site } => {
                log::debug!("site event {} at {:?}", site, self.sites[site]);
                self.beachline
                    .insert_site(site, &self.sites, &mut self.edges, &mut self.queue);
            }
            Event::Circle { arc, vertex } => {
                log::debug!("circle event at y={} with vertex {:?}", self.sweep_y, vertex);
                self.record_vertex(vertex);
                let removed = self.beachline.remove_arc(
                    arc,
                    vertex,
                    self.sweep_y,
                    &self.sites,
                    &mut self.edges,
                    &mut self.queue,
                );
                if removed.is_none() {
                    log::error!("circle event for an arc without two neighbors at {:?}", vertex);
                }
            }
        }

        if self.queue.is_empty() {
            self.finish_sweep();
        }
    }

    fn finish_sweep(&mut self) {
        log::info!(
            "sweep finished with {} edges and {} vertices",
            self.edges.len(),
            self.vertices.len()
        );
        self.phase = Phase::Extending;
    }

    fn record_vertex(&mut self, vertex: DVec2) {
        let known = self
            .vertices
            .iter()
            .rev()
            .any(|known| self.tolerance.same_point(*known, vertex));
        if !known {
            self.vertices.push(vertex);
        }
    }

    fn extend_edges(&mut self) {
        for convergence in self.beachline.converging_vertices(&self.sites, &self.edges) {
            self.edges[convergence.left_edge.0].set_vertex(convergence.vertex);
            self.edges[convergence.right_edge.0].set_vertex(convergence.vertex);
            self.record_vertex(convergence.vertex);
        }

        let mut bounds = self.bounds_hint;
        for point in self.sites.iter().chain(self.vertices.iter()) {
            bounds.include(*point);
        }
        for edge in self.edges.iter().filter(|edge| !edge.is_unbounded_start()) {
            bounds.include(edge.start);
        }
        self.bounds = bounds;

        for edge in &mut self.edges {
            edge.extend(&bounds);
        }

        let mut absorbed = vec![false; self.edges.len()];
        for index in 0..self.edges.len() {
            let Some(twin) = self.edges[index].twin() else {
                continue;
            };
            if twin.0 <= index || absorbed[index] {
                continue;
            }
            let other = self.edges[twin.0].clone();
            self.edges[index].absorb_twin(&other);
            absorbed[twin.0] = true;
        }

        let tolerance = self.tolerance;
        let mut index = 0;
        self.edges.retain(|edge| {
            let keep = !absorbed[index] && !edge.is_degenerate(tolerance);
            index += 1;
            keep
        });

        self.beachline = Beachline::new(self.tolerance);
        self.queue.clear();
        self.phase = Phase::AssemblingPolygons;

        log::info!(
            "extended {} edges to bounds {:?}..{:?}",
            self.edges.len(),
            bounds.min,
            bounds.max
        );
    }

    fn assemble(&mut self) {
        self.polygons = assemble_polygons(&self.sites, &self.edges, &self.bounds, self.tolerance);
        self.phase = Phase::Finished;

        log::info!(
            "diagram finished: {} polygons, {} edges, {} vertices",
            self.polygons.len(),
            self.edges.len(),
            self.vertices.len()
        );
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Current sweep line coordinate
    #[inline]
    pub fn sweep_y(&self) -> f64 {
        self.sweep_y
    }

    #[inline]
    pub fn sites(&self) -> &[DVec2] {
        &self.sites
    }

    /// Arcs of the beachline, empty once the sweep is done
    #[inline]
    pub fn beachline(&self) -> &Beachline {
        &self.beachline
    }

    /// Edges traced so far
    ///
    /// During the sweep open edges end at their current breakpoint. After
    /// extension every edge is final and clipped to [`VoronoiDiagram::bounds`].
    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Voronoi vertices found so far, without duplicates
    #[inline]
    pub fn vertices(&self) -> &[DVec2] {
        &self.vertices
    }

    /// Clipping rectangle
    ///
    /// Equal to the bounds hint until the extension step grows it.
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    #[inline]
    pub fn bounds_hint(&self) -> Rect {
        self.bounds_hint
    }

    /// Tolerances used for this site set
    #[inline]
    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// One polygon per site, in site order, once assembled
    #[inline]
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Events still waiting in the queue
    #[inline]
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Steps taken since the last reset
    #[inline]
    pub fn step_count(&self) -> usize {
        self.steps
    }

    #[inline]
    pub fn options(&self) -> StepOptions {
        self.options
    }
}

/// Tolerances for the region spanned by the sites and the bounds hint
fn site_tolerance(sites: &[DVec2], bounds_hint: &Rect) -> Tolerance {
    let mut extent = *bounds_hint;
    for site in sites {
        extent.include(*site);
    }
    Tolerance::for_bounds(&extent)
}

fn validate_sites(sites: &[DVec2], bounds_hint: &Rect) -> Result<()> {
    if sites.len() < 2 {
        return Err(VoronoiError::InvalidInput(format!(
            "at least two sites are required (got {})",
            sites.len()
        )));
    }

    if let Some(site) = sites.iter().find(|site| !site.is_finite()) {
        return Err(VoronoiError::InvalidInput(format!(
            "site coordinates must be finite (got {:?})",
            site
        )));
    }

    let tolerance = site_tolerance(sites, bounds_hint);
    let mut sorted = sites.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    for (index, site) in sorted.iter().enumerate() {
        let close = sorted[index + 1..]
            .iter()
            .take_while(|other| other.x - site.x < tolerance.snap)
            .find(|other| tolerance.same_point(*site, **other));
        if let Some(other) = close {
            return Err(VoronoiError::InvalidInput(format!(
                "sites {:?} and {:?} coincide",
                site, other
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn same_point(a: DVec2, b: DVec2) -> bool {
        Tolerance::default().same_point(a, b)
    }

    fn finished(sites: Vec<DVec2>, bounds: Rect) -> VoronoiDiagram {
        let mut diagram = VoronoiDiagram::new(sites, bounds).unwrap();
        diagram.run_to_completion();
        assert!(diagram.is_finished());
        diagram
    }

    /// Properties every finished diagram must satisfy
    fn assert_valid(diagram: &VoronoiDiagram) {
        let sites = diagram.sites();
        let polygons = diagram.polygons();
        let bounds = diagram.bounds();
        let tolerance = diagram.tolerance();

        assert_eq!(polygons.len(), sites.len());
        for edge in diagram.edges() {
            assert!(edge.has_vertex);
            assert!(!edge.is_unbounded_start());
            assert!(edge.start.is_finite() && edge.end.is_finite());
            assert!(edge.length() >= tolerance.snap);
            assert!(bounds.contains(edge.start, tolerance.snap));
            assert!(bounds.contains(edge.end, tolerance.snap));
        }

        let mut total = 0.0;
        for (index, polygon) in polygons.iter().enumerate() {
            assert_eq!(polygon.site, index);
            assert!(polygon.vertex_count() >= 3, "polygon {index} is degenerate");
            assert!(polygon.is_counter_clockwise(), "polygon {index} is clockwise");
            assert!(polygon.contains(sites[index]));
            for neighbor in &polygon.neighbors {
                assert!(polygons[*neighbor].is_neighbor_of(index));
            }
            total += polygon.area();
        }

        let relative = (total - bounds.area()).abs() / bounds.area();
        assert!(relative < 1e-6, "areas sum to {total}, bounds {}", bounds.area());

        // interior segments are shared by two polygons in opposite directions,
        // segments along the outline belong to a single polygon
        let segments: Vec<(usize, DVec2, DVec2)> = polygons
            .iter()
            .flat_map(|polygon| polygon.segments().map(move |(a, b)| (polygon.site, a, b)))
            .collect();
        for &(site, a, b) in &segments {
            let matching = |from: DVec2, to: DVec2| {
                segments
                    .iter()
                    .filter(|(_, c, d)| {
                        tolerance.same_point(*c, from) && tolerance.same_point(*d, to)
                    })
                    .count()
            };
            assert_eq!(matching(a, b), 1, "segment {a:?} -> {b:?} of site {site} repeats");

            let on_outline = [a, b, (a + b) / 2.0]
                .iter()
                .all(|point| bounds.on_boundary(*point, tolerance.snap));
            let expected = if on_outline { 0 } else { 1 };
            assert_eq!(
                matching(b, a),
                expected,
                "segment {a:?} -> {b:?} of site {site} has no unique twin"
            );
        }
    }

    #[test]
    fn test_rejects_invalid_input() {
        let bounds = Rect::from_size(10.0);

        let result = VoronoiDiagram::new(vec![DVec2::new(1.0, 1.0)], bounds);
        assert!(matches!(result, Err(VoronoiError::InvalidInput(_))));

        let sites = vec![DVec2::new(1.0, 1.0), DVec2::new(f64::NAN, 1.0)];
        let result = VoronoiDiagram::new(sites, bounds);
        assert!(result.is_err());

        let result = VoronoiDiagram::new(
            vec![
                DVec2::new(1.0, 1.0),
                DVec2::new(3.0, 1.0),
                DVec2::new(1.0, 1.0),
            ],
            bounds,
        );
        assert!(result.is_err());

        let flat = Rect::new(DVec2::ZERO, DVec2::new(10.0, 0.0));
        let result = VoronoiDiagram::new(vec![DVec2::ZERO, DVec2::ONE], flat);
        assert!(result.is_err());

        // closer than the snapping distance of a 10 wide diagram
        let result = VoronoiDiagram::new(
            vec![DVec2::new(1.0, 1.0), DVec2::new(1.0, 1.0 + 1e-9)],
            bounds,
        );
        assert!(matches!(result, Err(VoronoiError::InvalidInput(_))));

        let options = StepOptions {
            sweep_increment: Some(0.0),
        };
        let result = VoronoiDiagram::with_options(vec![DVec2::ZERO, DVec2::ONE], bounds, options);
        assert!(result.is_err());
    }

    #[test]
    fn test_phase_sequence() {
        let sites = vec![DVec2::new(0.0, 0.0), DVec2::new(10.0, 0.0)];
        let bounds = Rect::new(DVec2::new(-5.0, -5.0), DVec2::new(15.0, 5.0));
        let mut diagram = VoronoiDiagram::new(sites, bounds).unwrap();

        assert_eq!(diagram.phase(), Phase::Sweeping);
        assert_eq!(diagram.pending_events(), 2);
        assert_eq!(diagram.sweep_y(), 5.0);

        assert!(diagram.next_step());
        assert_eq!(diagram.phase(), Phase::Sweeping);
        assert_eq!(diagram.beachline().len(), 1);

        assert!(diagram.next_step());
        assert_eq!(diagram.phase(), Phase::Extending);
        assert_eq!(diagram.pending_events(), 0);

        assert!(diagram.next_step());
        assert_eq!(diagram.phase(), Phase::AssemblingPolygons);
        assert!(diagram.beachline().is_empty());

        assert!(diagram.next_step());
        assert_eq!(diagram.phase(), Phase::Finished);
        assert_eq!(diagram.step_count(), 4);

        assert!(!diagram.next_step());
        assert_eq!(diagram.step_count(), 4);
    }

    #[test]
    fn test_two_sites_on_one_line() {
        let sites = vec![DVec2::new(0.0, 0.0), DVec2::new(10.0, 0.0)];
        let bounds = Rect::new(DVec2::new(-5.0, -5.0), DVec2::new(15.0, 5.0));
        let diagram = finished(sites, bounds);

        assert_eq!(diagram.edges().len(), 1);
        let edge = &diagram.edges()[0];
        assert!((edge.start.x - 5.0).abs() < 1e-9);
        assert!((edge.end.x - 5.0).abs() < 1e-9);
        assert!((edge.length() - 10.0).abs() < 1e-9);
        assert!(diagram.vertices().is_empty());

        assert_valid(&diagram);
        for polygon in diagram.polygons() {
            assert!((polygon.area() - 100.0).abs() < 1e-9);
        }
        assert!(diagram.polygons()[0]
            .vertices
            .iter()
            .all(|vertex| vertex.x <= 5.0 + 1e-9));
    }

    #[test]
    fn test_square_corners_share_one_vertex() {
        let sites = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(10.0, 0.0),
            DVec2::new(10.0, 10.0),
            DVec2::new(0.0, 10.0),
        ];
        let diagram = finished(sites, Rect::from_size(10.0));

        assert_eq!(diagram.vertices().len(), 1);
        assert!(same_point(diagram.vertices()[0], DVec2::new(5.0, 5.0)));
        assert_eq!(diagram.edges().len(), 4);
        assert_eq!(diagram.bounds(), Rect::from_size(10.0));

        assert_valid(&diagram);
        for polygon in diagram.polygons() {
            assert_eq!(polygon.vertex_count(), 4);
            assert!((polygon.area() - 25.0).abs() < 1e-9);
            assert_eq!(polygon.neighbor_count(), 2);
        }
    }

    #[test]
    fn test_vertical_collinear_sites() {
        let sites = vec![
            DVec2::new(0.0, 20.0),
            DVec2::new(0.0, 10.0),
            DVec2::new(0.0, 0.0),
        ];
        let bounds = Rect::new(DVec2::new(-10.0, -5.0), DVec2::new(10.0, 25.0));
        let diagram = finished(sites, bounds);

        assert_eq!(diagram.edges().len(), 2);
        assert!(diagram.vertices().is_empty());
        assert_valid(&diagram);

        // the middle cell is the strip between y = 5 and y = 15
        let middle = &diagram.polygons()[1];
        assert_eq!(middle.vertex_count(), 4);
        assert!((middle.area() - 200.0).abs() < 1e-9);
        assert_eq!(middle.neighbors, vec![0, 2]);
    }

    #[test]
    fn test_horizontal_collinear_sites() {
        let sites = vec![
            DVec2::new(0.0, 5.0),
            DVec2::new(10.0, 5.0),
            DVec2::new(20.0, 5.0),
        ];
        let bounds = Rect::new(DVec2::new(-5.0, 0.0), DVec2::new(25.0, 10.0));
        let diagram = finished(sites, bounds);

        assert_eq!(diagram.edges().len(), 2);
        assert_valid(&diagram);
        assert!((diagram.polygons()[1].area() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_vertex_above_first_row() {
        // the circle through these sites tops out far above the bounds hint
        let sites = vec![
            DVec2::new(0.0, 10.0),
            DVec2::new(10.0, 10.0),
            DVec2::new(5.0, 9.9),
        ];
        let diagram = finished(sites, Rect::from_size(20.0));

        assert_eq!(diagram.vertices().len(), 1);
        assert!((diagram.vertices()[0].y - 134.95).abs() < 1e-6);
        assert!(diagram.bounds().max.y >= 134.95 - 1e-6);
        assert_valid(&diagram);
    }

    #[test]
    fn test_triangle_has_circumcenter() {
        let sites = vec![
            DVec2::new(5.0, 10.0),
            DVec2::new(0.0, 0.0),
            DVec2::new(10.0, 0.0),
        ];
        let diagram = finished(sites, Rect::new(DVec2::splat(-10.0), DVec2::splat(20.0)));

        assert_eq!(diagram.vertices().len(), 1);
        assert!(same_point(diagram.vertices()[0], DVec2::new(5.0, 3.75)));
        assert_eq!(diagram.edges().len(), 3);
        assert_valid(&diagram);
    }

    #[test]
    fn test_random_site_sets_tile_bounds() {
        for seed in 0..20 {
            let mut generator = SiteGenerator::new(seed, 256.0, 5 + seed as usize * 3, 10.0);
            let sites = generator.generate().unwrap();
            let diagram = finished(sites, Rect::from_size(256.0));
            assert_valid(&diagram);
        }

        // rows of sites whose heights differ by less than the tolerance,
        // reaching the sweep line out of x order
        for seed in 0..20 {
            let mut generator = SiteGenerator::new(seed, 256.0, 16, 4.0);
            let mut sites: Vec<DVec2> = Vec::new();
            for (index, site) in generator.generate().unwrap().into_iter().enumerate() {
                let row = ((site.y - 32.0) / 64.0).round().clamp(0.0, 3.0);
                let jitter = (index % 3) as f64 * 1e-10;
                let site = DVec2::new(site.x, 32.0 + row * 64.0 + jitter);
                if sites
                    .iter()
                    .all(|other| (other.x - site.x).abs() > 0.5 || (other.y - site.y).abs() > 1.0)
                {
                    sites.push(site);
                }
            }
            let diagram = finished(sites, Rect::from_size(256.0));
            assert_valid(&diagram);
        }
    }

    #[test]
    fn test_near_equal_heights_form_one_row() {
        let sites = vec![
            DVec2::new(20.0, 70.0 + 2e-10),
            DVec2::new(80.0, 70.0 + 1e-10),
            DVec2::new(30.0, 70.0),
        ];
        let diagram = finished(sites, Rect::from_size(100.0));
        assert_valid(&diagram);

        assert!(diagram.vertices().is_empty());
        let mut bisectors: Vec<f64> = diagram.edges().iter().map(|edge| edge.start.x).collect();
        bisectors.sort_by(f64::total_cmp);
        assert_eq!(bisectors.len(), 2);
        assert!((bisectors[0] - 25.0).abs() < 1e-6);
        assert!((bisectors[1] - 55.0).abs() < 1e-6);

        let areas: Vec<f64> = diagram.polygons().iter().map(Polygon::area).collect();
        for (area, expected) in areas.iter().zip([2500.0, 4500.0, 3000.0]) {
            assert!((area - expected).abs() < 1e-4, "area {area}, expected {expected}");
        }
    }

    #[test]
    fn test_tiny_diagrams() {
        let sites = vec![DVec2::new(0.0, 0.0), DVec2::new(1e-7, 0.0)];
        let diagram = finished(sites, Rect::from_size(1e-6));
        assert_valid(&diagram);
        assert_eq!(diagram.edges().len(), 1);
        assert!((diagram.polygons()[0].area() - 5e-14).abs() < 1e-20);

        // a power of two keeps every intermediate value an exact multiple
        let scale = 1.0 / 262_144.0;
        for seed in 0..10 {
            let mut generator = SiteGenerator::new(seed, 256.0, 5 + seed as usize * 3, 10.0);
            let sites = generator.generate().unwrap();
            let large = finished(sites.clone(), Rect::from_size(256.0));

            let small_sites = sites.iter().map(|site| *site * scale).collect();
            let small = finished(small_sites, Rect::from_size(256.0 * scale));
            assert_valid(&small);

            assert_eq!(small.edges().len(), large.edges().len());
            for (small, large) in small.polygons().iter().zip(large.polygons()) {
                assert_eq!(small.vertex_count(), large.vertex_count());
                assert!((small.area() - large.area() * scale * scale).abs() < 1e-18);
            }
        }
    }

    #[test]
    fn test_dense_grid_sites() {
        // many shared coordinates and cocircular quadruples
        let sites: Vec<DVec2> = (0..5)
            .flat_map(|x| (0..5).map(move |y| DVec2::new(x as f64 * 10.0, y as f64 * 10.0)))
            .collect();
        let diagram = finished(sites, Rect::new(DVec2::splat(-5.0), DVec2::splat(45.0)));

        assert_valid(&diagram);
        assert_eq!(diagram.vertices().len(), 16);
        for polygon in diagram.polygons() {
            assert!((polygon.area() - 100.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_sweep_is_monotonic() {
        let config = crate::DiagramConfigBuilder::new()
            .seed(11)
            .site_count(30)
            .unwrap()
            .sweep_increment(4.0)
            .unwrap()
            .build()
            .unwrap();
        let (mut diagram, _) = VoronoiDiagram::generate(&config).unwrap();

        let mut last = diagram.sweep_y();
        while diagram.phase() == Phase::Sweeping {
            diagram.next_step();
            assert!(diagram.sweep_y() <= last);
            last = diagram.sweep_y();
        }
    }

    #[test]
    fn test_sweep_increment_only_adds_steps() {
        let config = crate::DiagramConfigBuilder::new()
            .seed(5)
            .site_count(12)
            .unwrap()
            .build()
            .unwrap();
        let (mut jumping, _) = VoronoiDiagram::generate(&config).unwrap();
        let options = StepOptions {
            sweep_increment: Some(1.0),
        };
        let mut animated = VoronoiDiagram::with_options(
            jumping.sites().to_vec(),
            config.bounds(),
            options,
        )
        .unwrap();

        let fast = jumping.run_to_completion();
        let slow = animated.run_to_completion();
        assert!(slow > fast);
        assert_eq!(jumping.polygons(), animated.polygons());
        assert_eq!(jumping.vertices(), animated.vertices());
    }

    #[test]
    fn test_redo_is_bit_identical() {
        let mut generator = SiteGenerator::new(99, 256.0, 25, 10.0);
        let sites = generator.generate().unwrap();
        let mut diagram = finished(sites, Rect::from_size(256.0));

        let edges = diagram.edges().to_vec();
        let vertices = diagram.vertices().to_vec();
        let polygons = diagram.polygons().to_vec();
        let steps = diagram.step_count();

        diagram.redo();
        assert_eq!(diagram.phase(), Phase::Sweeping);
        assert!(diagram.edges().is_empty());
        assert_eq!(diagram.step_count(), 0);

        diagram.run_to_completion();
        assert_eq!(diagram.edges(), edges.as_slice());
        assert_eq!(diagram.vertices(), vertices.as_slice());
        assert_eq!(diagram.polygons(), polygons.as_slice());
        assert_eq!(diagram.step_count(), steps);
    }

    #[test]
    fn test_reset_replaces_sites() {
        let config = crate::DiagramConfigBuilder::new().seed(3).build().unwrap();
        let (mut diagram, mut generator) = VoronoiDiagram::generate(&config).unwrap();
        diagram.run_to_completion();
        let first = diagram.sites().to_vec();

        diagram.reset_with(&mut generator).unwrap();
        assert_eq!(diagram.phase(), Phase::Sweeping);
        assert_ne!(diagram.sites(), first.as_slice());
        assert!(diagram.polygons().is_empty());
        diagram.run_to_completion();
        assert_valid(&diagram);

        let before = diagram.sites().to_vec();
        assert!(diagram.reset(vec![DVec2::ZERO]).is_err());
        assert_eq!(diagram.sites(), before.as_slice());
        assert!(diagram.is_finished());
    }
}
