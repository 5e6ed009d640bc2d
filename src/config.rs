//! Diagram Configuration and Builder
//!
//! Settings for generating a random site set and stepping the sweep over it.

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, VoronoiError};
use crate::geometry::Rect;

/// Largest site count the builder accepts
pub const MAX_SITE_COUNT: usize = 10_000;

/// Configuration for a generated diagram
///
/// The same configuration always produces the same sites and therefore the
/// same diagram.
///
/// # Example
///
/// ```rust
/// use fortune_sweep::*;
///
/// let config = DiagramConfigBuilder::new()
///     .seed(42)
///     .site_count(8)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// # #[cfg(feature = "serde")]
/// # {
/// let json = serde_json::to_string(&config).unwrap();
/// let restored: DiagramConfig = serde_json::from_str(&json).unwrap();
/// assert_eq!(config, restored);
/// # }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagramConfig {
    /// Seed for site placement
    pub seed: u64,

    /// Side length of the square `[0, size]²` the sites are placed in
    pub size: f64,

    /// Number of sites to place
    pub site_count: usize,

    /// Minimum distance between any two generated sites
    ///
    /// Candidates closer than this to an accepted site are redrawn.
    pub min_site_distance: f64,

    /// Sweep distance covered by one step while no event is reached
    ///
    /// `None` jumps straight from event to event.
    pub sweep_increment: Option<f64>,
}

impl DiagramConfig {
    /// The square the sites are placed in, also used as the clipping hint
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::new(DVec2::ZERO, DVec2::splat(self.size))
    }

    /// Driver options carried by this configuration
    #[inline]
    pub fn step_options(&self) -> StepOptions {
        StepOptions {
            sweep_increment: self.sweep_increment,
        }
    }
}

impl Default for DiagramConfig {
    fn default() -> Self {
        let builder = DiagramConfigBuilder::new();
        DiagramConfig {
            seed: rand::random(),
            size: builder.size,
            site_count: builder.site_count,
            min_site_distance: builder.min_site_distance,
            sweep_increment: builder.sweep_increment,
        }
    }
}

/// Options controlling how [`crate::VoronoiDiagram::next_step`] advances
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepOptions {
    /// When set, the sweep line moves at most this far per step
    pub sweep_increment: Option<f64>,
}

/// Builder for creating DiagramConfig with validation
///
/// # Example
///
/// ```rust
/// use fortune_sweep::*;
///
/// let config = DiagramConfigBuilder::new()
///     .seed(7)
///     .size(512.0)
///     .unwrap()
///     .min_site_distance(20.0)
///     .unwrap()
///     .sweep_increment(1.0)
///     .unwrap()
///     .build()
///     .unwrap();
/// assert_eq!(config.bounds().width(), 512.0);
/// ```
#[derive(Debug, Clone)]
pub struct DiagramConfigBuilder {
    seed: Option<u64>,
    size: f64,
    site_count: usize,
    min_site_distance: f64,
    sweep_increment: Option<f64>,
}

impl DiagramConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: Random
    /// - size: 256
    /// - site_count: 5
    /// - min_site_distance: 10
    /// - sweep_increment: None (event to event)
    pub fn new() -> Self {
        Self {
            seed: None,
            size: 256.0,
            site_count: 5,
            min_site_distance: 10.0,
            sweep_increment: None,
        }
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the side length of the site square
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if size is not a positive finite number
    pub fn size(mut self, size: f64) -> Result<Self> {
        if !(size.is_finite() && size > 0.0) {
            return Err(VoronoiError::InvalidConfig(format!(
                "size must be positive (got {})",
                size
            )));
        }
        self.size = size;
        Ok(self)
    }

    /// Set the number of sites
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if count < 2 or count > [`MAX_SITE_COUNT`]
    pub fn site_count(mut self, count: usize) -> Result<Self> {
        if !(2..=MAX_SITE_COUNT).contains(&count) {
            return Err(VoronoiError::InvalidConfig(format!(
                "site count must be between 2 and {} (got {})",
                MAX_SITE_COUNT, count
            )));
        }
        self.site_count = count;
        Ok(self)
    }

    /// Set the minimum distance between generated sites
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if distance is negative or not finite
    pub fn min_site_distance(mut self, distance: f64) -> Result<Self> {
        if !(distance.is_finite() && distance >= 0.0) {
            return Err(VoronoiError::InvalidConfig(format!(
                "minimum site distance must be >= 0 (got {})",
                distance
            )));
        }
        self.min_site_distance = distance;
        Ok(self)
    }

    /// Animate the sweep line in steps of `increment`
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if increment is not a positive finite number
    pub fn sweep_increment(mut self, increment: f64) -> Result<Self> {
        if !(increment.is_finite() && increment > 0.0) {
            return Err(VoronoiError::InvalidConfig(format!(
                "sweep increment must be positive (got {})",
                increment
            )));
        }
        self.sweep_increment = Some(increment);
        Ok(self)
    }

    /// Build the configuration
    ///
    /// If no seed was provided, a random one is drawn.
    pub fn build(self) -> Result<DiagramConfig> {
        Ok(DiagramConfig {
            seed: self.seed.unwrap_or_else(rand::random),
            size: self.size,
            site_count: self.site_count,
            min_site_distance: self.min_site_distance,
            sweep_increment: self.sweep_increment,
        })
    }
}

impl Default for DiagramConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
