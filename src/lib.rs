//! Steppable Fortune's sweep-line Voronoi diagrams
//!
//! Builds the Voronoi diagram of a planar site set one event at a time, clips
//! it to a bounding rectangle and assembles one closed polygon per site. The
//! intermediate sweep line, beachline and edges stay inspectable between
//! steps, which makes the crate suitable for visualizing the algorithm.
//!
//! # Quick Start
//!
//! ```rust
//! use fortune_sweep::*;
//!
//! let config = DiagramConfigBuilder::new()
//!     .seed(42)
//!     .site_count(8).unwrap()
//!     .build().unwrap();
//!
//! let (mut diagram, _generator) = VoronoiDiagram::generate(&config).unwrap();
//! while diagram.next_step() {
//!     // inspect or draw the intermediate state here
//! }
//!
//! for polygon in diagram.polygons() {
//!     println!("site {} has {} corners", polygon.site, polygon.vertex_count());
//! }
//! ```
//!
//! # Features
//!
//! - `serde`: Enables serialization support for configuration, edges and polygons

// Modules
pub mod error;
pub mod config;
pub mod geometry;
pub mod fortune;
pub mod polygon;
pub mod diagram;
pub mod generation;
pub mod render;

// Re-export core types for convenience
pub use error::{VoronoiError, Result};
pub use config::{DiagramConfig, DiagramConfigBuilder, StepOptions};
pub use geometry::{Rect, Tolerance};
pub use fortune::{ArcView, Edge, EdgeId, Growth};
pub use polygon::Polygon;
pub use diagram::{Phase, VoronoiDiagram};
pub use generation::SiteGenerator;
pub use render::{draw_diagram, draw_diagram_with_transform, fit_transform, Color, DrawList, DrawSurface, Palette, Primitive};

// Re-export glam::DVec2 for convenience
pub use glam::DVec2;
