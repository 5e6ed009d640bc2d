//! Random Site Placement
//!
//! Sites are drawn on the integer grid of the configured square and redrawn
//! when they land too close to an already accepted site.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::DiagramConfig;
use crate::error::{Result, VoronoiError};

/// Draws allowed per requested site before giving up
const ATTEMPTS_PER_SITE: usize = 1_000;

/// Seeded source of well-separated sites
///
/// Owns its random number generator, so successive calls to
/// [`SiteGenerator::generate`] continue the same deterministic sequence.
#[derive(Debug, Clone)]
pub struct SiteGenerator {
    rng: ChaCha8Rng,
    size: f64,
    site_count: usize,
    min_distance: f64,
}

impl SiteGenerator {
    /// Create a generator for `site_count` sites in `[0, size)²`
    pub fn new(seed: u64, size: f64, site_count: usize, min_distance: f64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            size,
            site_count,
            min_distance,
        }
    }

    pub fn from_config(config: &DiagramConfig) -> Self {
        Self::new(
            config.seed,
            config.size,
            config.site_count,
            config.min_site_distance,
        )
    }

    #[inline]
    pub fn site_count(&self) -> usize {
        self.site_count
    }

    /// Draw a fresh set of sites
    ///
    /// A candidate is rejected when its squared distance to an accepted site
    /// is at most the squared minimum distance, so exact duplicates are never
    /// produced.
    ///
    /// # Errors
    ///
    /// Returns `GenerationFailed` if the sites cannot be placed within the
    /// attempt budget, e.g. because the square is too small for the spacing.
    pub fn generate(&mut self) -> Result<Vec<DVec2>> {
        let cells = (self.size.floor() as u32).max(1);
        let min_distance_sq = self.min_distance * self.min_distance;
        let budget = self.site_count.saturating_mul(ATTEMPTS_PER_SITE);

        let mut sites: Vec<DVec2> = Vec::with_capacity(self.site_count);
        let mut attempts = 0;

        while sites.len() < self.site_count {
            if attempts >= budget {
                log::warn!(
                    "placed only {} of {} sites after {} attempts",
                    sites.len(),
                    self.site_count,
                    attempts
                );
                return Err(VoronoiError::GenerationFailed(format!(
                    "could not place {} sites at least {} apart in a square of size {}",
                    self.site_count, self.min_distance, self.size
                )));
            }
            attempts += 1;

            let candidate = DVec2::new(
                self.rng.gen_range(0..cells) as f64,
                self.rng.gen_range(0..cells) as f64,
            );
            if sites
                .iter()
                .all(|site| site.distance_squared(candidate) > min_distance_sq)
            {
                sites.push(candidate);
            }
        }

        log::debug!("placed {} sites in {} attempts", sites.len(), attempts);
        Ok(sites)
    }
}
