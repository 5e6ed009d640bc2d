//! Colors used when drawing a diagram

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// RGBA color type
pub type Color = [f32; 4];

pub const BLACK: Color = [0.0, 0.0, 0.0, 1.0];
pub const BLUE: Color = [0.0, 0.0, 1.0, 1.0];
pub const GREEN: Color = [0.0, 0.5, 0.0, 1.0];
pub const ORANGE: Color = [1.0, 0.65, 0.0, 1.0];
pub const RED: Color = [1.0, 0.0, 0.0, 1.0];

/// Color per diagram element
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    /// Outline of the clipping rectangle
    pub bounds: Color,
    pub sweep_line: Color,
    /// Beachline arcs
    pub arc: Color,
    /// Edges while the diagram is being built
    pub edge: Color,
    /// Polygon outlines once the diagram is finished
    pub polygon: Color,
    pub site: Color,
    /// Radius of the circle marking each site, in world units
    pub site_radius: f64,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            bounds: GREEN,
            sweep_line: RED,
            arc: ORANGE,
            edge: BLUE,
            polygon: BLUE,
            site: BLACK,
            site_radius: 3.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette() {
        let palette = Palette::default();
        assert_eq!(palette.sweep_line, RED);
        assert_eq!(palette.site, BLACK);
        assert_eq!(palette.site_radius, 3.0);
        for color in [palette.bounds, palette.arc, palette.edge, palette.polygon] {
            assert_eq!(color[3], 1.0);
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_palette_serde() {
        let palette = Palette::default();
        let json = serde_json::to_string(&palette).unwrap();
        let restored: Palette = serde_json::from_str(&json).unwrap();
        assert_eq!(palette, restored);
    }
}
