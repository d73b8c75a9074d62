//! Cylindrical raster: bottom cap, wall and top cap for every angular slice.
//!
//! Within a slice the probe zigzags so that consecutive points never share a
//! straight line that would drag it along the surface:
//!
//! - bottom cap: up-and-out, then down, from `minimum_radius` to `radius`
//! - wall: up-and-in, then out, from the bottom to `height`
//! - top cap: down-and-out, then up, mirrored at the top
//!
//! Slices start at -180 degrees so that 0 degrees lies in the middle of a slice
//! sequence rather than on the seam.

use tracing::{debug, info};

use crate::error::{ConfigError, Error, PatternError, Result};
use crate::position::Position;

use super::ScanPath;

/// Default clearance around the central support pole, in millimeters.
pub const DEFAULT_MINIMUM_RADIUS: f64 = 50.0;

const START_ANGLE: f64 = -180.0;

/// Parameters of the cylindrical raster.
#[derive(Debug, Clone, PartialEq)]
pub struct CylindricalConfig {
    /// Number of angular slices.
    pub nr_of_angular_points: usize,
    /// Radial steps per cap.
    pub nr_of_radial_cap_points: usize,
    /// Vertical steps along the wall.
    pub nr_of_vertical_points: usize,
    /// Height offset of the cap zigzag.
    pub cap_spacing: f64,
    /// Spacing of the wall zigzag.
    ///
    /// Kept for configuration compatibility; the wall zigzag steps by the radial
    /// cap step so that it stays within the scanned cylinder.
    pub wall_spacing: f64,
    /// Outer radius.
    pub radius: f64,
    /// Wall height.
    pub height: f64,
    /// Clearance around the central pole.
    pub minimum_radius: f64,
}

/// Phase of the per-slice state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RasterPhase {
    /// Sweeping the bottom cap outwards.
    BottomCap,
    /// Climbing the wall.
    Wall,
    /// Sweeping the top cap outwards.
    TopCap,
    /// Every slice has been emitted.
    Finished,
}

/// Cylindrical raster generator.
#[derive(Debug, Clone)]
pub struct CylindricalRaster {
    config: CylindricalConfig,
    delta_angle: f64,
    delta_height: f64,
    delta_radius: f64,
    phase: RasterPhase,
    slice: usize,
    step: usize,
    evasive_move_needed: bool,
}

impl CylindricalRaster {
    /// Create a raster from its parameters.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::NoPoints`] when any point count is zero, and a
    /// configuration error when the geometry is degenerate.
    pub fn new(config: CylindricalConfig) -> Result<Self> {
        if config.nr_of_angular_points == 0
            || config.nr_of_radial_cap_points == 0
            || config.nr_of_vertical_points == 0
        {
            return Err(PatternError::NoPoints.into());
        }
        if !(config.minimum_radius >= 0.0) {
            return Err(invalid("minimum_radius", config.minimum_radius));
        }
        if !config.radius.is_finite() || !(config.radius > config.minimum_radius) {
            return Err(invalid("radius", config.radius));
        }
        if !config.height.is_finite() || !(config.height > 0.0) {
            return Err(invalid("height", config.height));
        }
        if !(config.cap_spacing >= 0.0 && config.cap_spacing <= config.height) {
            return Err(invalid("cap_spacing", config.cap_spacing));
        }

        let delta_angle = 360.0 / config.nr_of_angular_points as f64;
        let delta_height = config.height / config.nr_of_vertical_points as f64;
        let delta_radius =
            (config.radius - config.minimum_radius) / config.nr_of_radial_cap_points as f64;

        info!(
            slices = config.nr_of_angular_points,
            points = config.nr_of_angular_points * Self::points_per_slice(&config),
            "cylindrical raster ready"
        );

        Ok(Self {
            config,
            delta_angle,
            delta_height,
            delta_radius,
            phase: RasterPhase::BottomCap,
            slice: 0,
            step: 0,
            evasive_move_needed: false,
        })
    }

    /// The raster parameters.
    pub fn config(&self) -> &CylindricalConfig {
        &self.config
    }

    /// Current phase.
    pub fn phase(&self) -> RasterPhase {
        self.phase
    }

    /// Angle of the slice currently being emitted.
    pub fn current_angle(&self) -> f64 {
        START_ANGLE + self.slice as f64 * self.delta_angle
    }

    fn points_per_slice(config: &CylindricalConfig) -> usize {
        4 * config.nr_of_radial_cap_points + 2 * config.nr_of_vertical_points
    }

    fn cap_len(&self) -> usize {
        2 * self.config.nr_of_radial_cap_points
    }

    fn wall_len(&self) -> usize {
        2 * self.config.nr_of_vertical_points
    }

    /// Radius of cap point `step`: every odd step moves one radial step out.
    fn cap_radius(&self, step: usize) -> f64 {
        self.config.minimum_radius + ((step + 1) / 2) as f64 * self.delta_radius
    }

    fn bottom_cap_point(&self, step: usize) -> Position {
        let z = if step % 2 == 1 { self.config.cap_spacing } else { 0.0 };
        Position::new(self.cap_radius(step), self.current_angle(), z)
    }

    /// Wall points zig-zag between `radius - Δr` and `radius`.
    ///
    /// The inner point of the top wall row lies at `(radius - Δr, height)`. With
    /// a single radial cap step that is also `(minimum_radius, height)`, the
    /// first top-cap point, so the probe revisits it one point later. The
    /// per-phase counts depend on both being emitted.
    fn wall_point(&self, step: usize) -> Position {
        let z = (step / 2 + 1) as f64 * self.delta_height;
        let r = if step % 2 == 0 {
            self.config.radius - self.delta_radius
        } else {
            self.config.radius
        };
        Position::new(r, self.current_angle(), z)
    }

    fn top_cap_point(&self, step: usize) -> Position {
        let z = if step % 2 == 1 {
            self.config.height - self.config.cap_spacing
        } else {
            self.config.height
        };
        Position::new(self.cap_radius(step), self.current_angle(), z)
    }

    /// Move the cursor past the point just emitted.
    fn advance(&mut self, phase_len: usize) {
        self.step += 1;
        if self.step < phase_len {
            return;
        }

        self.step = 0;
        self.phase = match self.phase {
            RasterPhase::BottomCap => {
                debug!(angle = self.current_angle(), "bottom cap ready; switching to wall");
                RasterPhase::Wall
            }
            RasterPhase::Wall => {
                debug!(angle = self.current_angle(), "wall ready; switching to top cap");
                RasterPhase::TopCap
            }
            RasterPhase::TopCap => {
                self.slice += 1;
                if self.slice >= self.config.nr_of_angular_points {
                    info!("cylindrical raster complete");
                    RasterPhase::Finished
                } else {
                    debug!(angle = self.current_angle(), "top cap ready; switching to next angle");
                    RasterPhase::BottomCap
                }
            }
            RasterPhase::Finished => RasterPhase::Finished,
        };
    }
}

impl ScanPath for CylindricalRaster {
    fn next(&mut self) -> Result<Position> {
        let (position, phase_len) = match self.phase {
            RasterPhase::BottomCap if self.step < self.cap_len() => {
                // First point of every slice after the first one follows a full
                // angular jump and a radius reset.
                self.evasive_move_needed = self.step == 0 && self.slice > 0;
                (self.bottom_cap_point(self.step), self.cap_len())
            }
            RasterPhase::Wall if self.step < self.wall_len() => {
                self.evasive_move_needed = false;
                (self.wall_point(self.step), self.wall_len())
            }
            RasterPhase::TopCap if self.step < self.cap_len() => {
                self.evasive_move_needed = false;
                (self.top_cap_point(self.step), self.cap_len())
            }
            RasterPhase::Finished => return Err(PatternError::Exhausted.into()),
            RasterPhase::BottomCap | RasterPhase::Wall | RasterPhase::TopCap => {
                tracing::error!(phase = ?self.phase, step = self.step, "raster step outside its phase");
                return Err(PatternError::InvariantViolation("raster step outside its phase").into());
            }
        };

        self.advance(phase_len);
        Ok(position)
    }

    fn ready(&self) -> bool {
        self.phase == RasterPhase::Finished
    }

    fn need_to_do_evasive_move(&self) -> bool {
        self.evasive_move_needed
    }

    fn reset(&mut self) {
        self.phase = RasterPhase::BottomCap;
        self.slice = 0;
        self.step = 0;
        self.evasive_move_needed = false;
    }

    fn len_hint(&self) -> Option<usize> {
        Some(self.config.nr_of_angular_points * Self::points_per_slice(&self.config))
    }
}

fn invalid(name: &str, value: f64) -> Error {
    Error::Config(ConfigError::InvalidParameter {
        name: crate::error::name(name),
        value,
    })
}
