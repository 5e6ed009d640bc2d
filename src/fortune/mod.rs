//! Fortune's sweep-line machinery
//!
//! The pieces here are driven by [`crate::VoronoiDiagram`]; they are public so
//! that callers can inspect and draw intermediate states.

pub mod assemble;
pub mod beachline;
pub mod edge;
pub mod event;

pub use assemble::assemble_polygons;
pub use beachline::{ArcKey, ArcView, BeachArc, Beachline, Convergence};
pub use edge::{Edge, EdgeId, Growth};
pub use event::{Event, EventKey, EventQueue};
