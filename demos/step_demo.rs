//! Step-by-step walk through a Fortune's sweep

use fortune_sweep::*;

/// Surface that prints every primitive as a line of text
struct TextSurface {
    transform: glam::DMat3,
}

impl DrawSurface for TextSurface {
    fn begin(&mut self, transform: glam::DMat3) {
        self.transform = transform;
    }

    fn line(&mut self, from: DVec2, to: DVec2, _color: Color) {
        let from = self.transform.transform_point2(from);
        let to = self.transform.transform_point2(to);
        println!("    line   ({:7.1}, {:7.1}) -> ({:7.1}, {:7.1})", from.x, from.y, to.x, to.y);
    }

    fn circle(&mut self, center: DVec2, radius: f64, _color: Color) {
        let center = self.transform.transform_point2(center);
        println!("    circle ({:7.1}, {:7.1}) r={}", center.x, center.y, radius);
    }

    fn parabola(&mut self, focus: DVec2, directrix: f64, min_x: f64, max_x: f64, _color: Color) {
        println!(
            "    arc    focus ({:.1}, {:.1}) directrix {:.1} x in [{:.1}, {:.1}]",
            focus.x, focus.y, directrix, min_x, max_x
        );
    }
}

fn main() -> Result<()> {
    println!("=== fortune_sweep Step Demo ===\n");

    let config = DiagramConfigBuilder::new()
        .seed(12345)
        .site_count(6)?
        .sweep_increment(32.0)?
        .build()?;

    println!("Seed: {}", config.seed);
    println!("Bounds: {:?}", config.bounds());

    let (mut diagram, mut generator) = VoronoiDiagram::generate(&config)?;
    println!("Sites: {:?}\n", diagram.sites());

    let palette = Palette::default();
    let mut surface = TextSurface {
        transform: glam::DMat3::IDENTITY,
    };
    let transform = fit_transform(diagram.bounds(), DVec2::new(800.0, 600.0));

    while diagram.next_step() {
        println!(
            "Step {:3}: {:?}, sweep y = {:.2}, {} arcs, {} edges, {} pending events",
            diagram.step_count(),
            diagram.phase(),
            diagram.sweep_y(),
            diagram.beachline().len(),
            diagram.edges().len(),
            diagram.pending_events()
        );
    }

    println!("\nFinal drawing in screen space:");
    draw_diagram_with_transform(&diagram, &palette, transform, &mut surface);

    println!("\nPolygons:");
    for polygon in diagram.polygons() {
        println!(
            "  site {} at ({:.0}, {:.0}): {} corners, area {:.1}, neighbors {:?}",
            polygon.site,
            polygon.center.x,
            polygon.center.y,
            polygon.vertex_count(),
            polygon.area(),
            polygon.neighbors
        );
    }

    // same sites again, then a new random set
    diagram.redo();
    let steps = diagram.run_to_completion();
    println!("\nRedo finished in {} steps", steps);

    diagram.reset_with(&mut generator)?;
    let steps = diagram.run_to_completion();
    println!("New site set finished in {} steps", steps);

    println!("\n=== Demo Complete ===");
    Ok(())
}
