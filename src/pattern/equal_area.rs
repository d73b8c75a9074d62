//! Equal-area sampled sphere, emitted ring by ring.

use tracing::{debug, info};

use crate::error::{PatternError, Result};
use crate::position::Position;

use super::grid::{check_shell, spherical_to_cartesian, RingLayout};
use super::ScanPath;

/// Parameters of the equal-area sphere.
#[derive(Debug, Clone, PartialEq)]
pub struct EqualAreaConfig {
    /// Target number of points on the sphere.
    pub nr_of_points: usize,
    /// Shell thickness; single-shell scans ignore it.
    pub wall_spacing: f64,
    /// Shell radius.
    pub radius: f64,
}

/// Equal-area sphere generator.
///
/// The first ring is the one closest to the scanner floor: heights are
/// measured as `R - R cos(theta)` so the sphere rests on `z = 0`.
#[derive(Debug, Clone)]
pub struct EqualAreaSphere {
    config: EqualAreaConfig,
    layout: RingLayout,
    ring: usize,
    point: usize,
}

impl EqualAreaSphere {
    /// Lay out the rings for the configured point count.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::NoPoints`] when the point count yields no rings,
    /// and an invalid-parameter error unless the radius is finite and positive.
    pub fn new(config: EqualAreaConfig) -> Result<Self> {
        check_shell(config.radius, 0.0)?;
        let layout = RingLayout::new(config.nr_of_points as f64)?;

        info!(
            requested = config.nr_of_points,
            rings = layout.rings().len(),
            points = layout.total(),
            "equal-area sphere ready"
        );

        Ok(Self {
            config,
            layout,
            ring: 0,
            point: 0,
        })
    }

    /// The generator parameters.
    pub fn config(&self) -> &EqualAreaConfig {
        &self.config
    }

    /// Ring layout the points are drawn from.
    pub fn layout(&self) -> &RingLayout {
        &self.layout
    }
}

impl ScanPath for EqualAreaSphere {
    fn next(&mut self) -> Result<Position> {
        let ring = *self
            .layout
            .rings()
            .get(self.ring)
            .ok_or(PatternError::Exhausted)?;

        let c = spherical_to_cartesian(self.config.radius, ring.theta, ring.phi(self.point));
        let position = Position::from_cartesian(c).with_z(self.config.radius - c.z);

        self.point += 1;
        if self.point == ring.count {
            self.point = 0;
            self.ring += 1;
            debug!(ring = self.ring, "switching to next ring");
        }

        Ok(position)
    }

    fn ready(&self) -> bool {
        self.ring >= self.layout.rings().len()
    }

    fn need_to_do_evasive_move(&self) -> bool {
        false
    }

    fn reset(&mut self) {
        self.ring = 0;
        self.point = 0;
    }

    fn len_hint(&self) -> Option<usize> {
        Some(self.layout.total())
    }
}
