//! Three-axis controller for cylindrical scans.

use tracing::{debug, info, warn};

use crate::error::{AxisError, ConfigError, Result};
use crate::position::Position;
use crate::safety::DeviceFootprint;

use super::{reached, AxisCommand, AxisMover, MoveReport, MoveStrategy, POSITION_EPSILON};

/// Drives the radial, angular and vertical axes around the device under test.
///
/// The controller keeps its own copy of the probe position, updated after every
/// completed axis move; axes already at the requested value are not commanded.
#[derive(Debug)]
pub struct CylindricalController<R, A, V> {
    radial: R,
    angular: A,
    vertical: V,
    footprint: DeviceFootprint,
    evasive_radius: f64,
    current: Position,
}

impl<R, A, V> CylindricalController<R, A, V>
where
    R: AxisMover,
    A: AxisMover,
    V: AxisMover,
{
    /// Create a controller; the position cache starts at the origin.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EvasiveRadiusTooSmall`] when a vertical move at
    /// `evasive_radius` could still hit the device.
    pub fn new(
        radial: R,
        angular: A,
        vertical: V,
        footprint: DeviceFootprint,
        evasive_radius: f64,
    ) -> Result<Self> {
        let minimum = footprint.circumradius();
        if !(evasive_radius >= minimum) {
            return Err(ConfigError::EvasiveRadiusTooSmall {
                radius: evasive_radius,
                minimum,
            }
            .into());
        }

        Ok(Self {
            radial,
            angular,
            vertical,
            footprint,
            evasive_radius,
            current: Position::ORIGIN,
        })
    }

    /// Cached probe position.
    #[inline]
    pub fn position(&self) -> Position {
        self.current
    }

    /// Keep-out box the moves are checked against.
    #[inline]
    pub fn footprint(&self) -> &DeviceFootprint {
        &self.footprint
    }

    /// Radius used for vertical travel on the evasive route.
    #[inline]
    pub fn evasive_radius(&self) -> f64 {
        self.evasive_radius
    }

    /// Move to `target`, rerouting through the evasive radius when a direct
    /// vertical or radial leg would cross the device.
    ///
    /// The turntable always moves first. Height follows only when neither the
    /// top nor the bottom plane of the device is crossed above the footprint,
    /// and radius follows only when the probe is clear of the device at its new
    /// height. Otherwise the remaining legs are planned again as an evasive move.
    pub fn move_to(&mut self, target: Position) -> Result<MoveReport> {
        let mut report = MoveReport::new(MoveStrategy::Direct);

        self.angular_to(target.t(), &mut report)?;

        let vertical_safe = self
            .footprint
            .vertical_move_safe(&self.current, target.z(), self.footprint.top())
            && self
                .footprint
                .vertical_move_safe(&self.current, target.z(), self.footprint.bottom());

        if vertical_safe {
            self.vertical_to(target.z(), &mut report)?;

            if self.footprint.radial_move_safe(&self.current, target.r()) {
                self.radial_to(target.r(), &mut report)?;
                return Ok(report);
            }
        }

        warn!(from = %self.current, to = %target, "direct move unsafe; rerouting");
        report.strategy = MoveStrategy::Evasive;
        self.evasive_legs(target, &mut report)?;
        Ok(report)
    }

    /// Move to `target` by way of the evasive radius: angle, out to the evasive
    /// radius, height, then in to the target radius.
    pub fn evasive_move_to(&mut self, target: Position) -> Result<MoveReport> {
        let mut report = MoveReport::new(MoveStrategy::Evasive);
        self.evasive_legs(target, &mut report)?;
        Ok(report)
    }

    fn evasive_legs(&mut self, target: Position, report: &mut MoveReport) -> Result<()> {
        debug!(to = %target, radius = self.evasive_radius, "evasive move");
        self.angular_to(target.t(), report)?;
        self.radial_to(self.evasive_radius, report)?;
        if self.current.r() < self.evasive_radius - POSITION_EPSILON {
            warn!(reached = self.current.r(), "radial axis short of the evasive radius");
            return Err(AxisError::Unreached {
                requested: self.evasive_radius,
                reached: self.current.r(),
            }
            .into());
        }
        self.vertical_to(target.z(), report)?;
        self.radial_to(target.r(), report)
    }

    /// Rotate clockwise by `degrees`; clockwise decreases the angle.
    pub fn rotate_clockwise(&mut self, degrees: f64) -> Result<MoveReport> {
        let target = self.current.with_t(self.current.t() - degrees);
        self.move_to(target)
    }

    /// Rotate counter-clockwise by `degrees`.
    pub fn rotate_counterclockwise(&mut self, degrees: f64) -> Result<MoveReport> {
        let target = self.current.with_t(self.current.t() + degrees);
        self.move_to(target)
    }

    /// Move towards the axis by `distance`, stopping at the axis.
    pub fn move_in(&mut self, distance: f64) -> Result<MoveReport> {
        let target = self.current.with_r((self.current.r() - distance).max(0.0));
        self.move_to(target)
    }

    /// Move away from the axis by `distance`.
    pub fn move_out(&mut self, distance: f64) -> Result<MoveReport> {
        let target = self.current.with_r(self.current.r() + distance);
        self.move_to(target)
    }

    /// Raise the probe by `distance`.
    pub fn move_up(&mut self, distance: f64) -> Result<MoveReport> {
        let target = self.current.with_z(self.current.z() + distance);
        self.move_to(target)
    }

    /// Lower the probe by `distance`.
    pub fn move_down(&mut self, distance: f64) -> Result<MoveReport> {
        let target = self.current.with_z(self.current.z() - distance);
        self.move_to(target)
    }

    /// Declare the present location the origin of all three axes.
    pub fn set_as_zero(&mut self) -> Result<()> {
        self.radial.set_as_zero()?;
        self.angular.set_as_zero()?;
        self.vertical.set_as_zero()?;
        self.current = Position::ORIGIN;
        info!("cylindrical axes zeroed");
        Ok(())
    }

    /// Give the axes back.
    pub fn release(self) -> (R, A, V) {
        (self.radial, self.angular, self.vertical)
    }

    fn radial_to(&mut self, r: f64, report: &mut MoveReport) -> Result<()> {
        if reached(self.current.r(), r) {
            return Ok(());
        }
        debug!(r, "radial move");
        let reached = self.radial.move_to(r)?;
        self.current = self.current.with_r(reached);
        report.push(AxisCommand::Radial(r));
        Ok(())
    }

    fn angular_to(&mut self, t: f64, report: &mut MoveReport) -> Result<()> {
        if reached(self.current.t(), t) {
            return Ok(());
        }
        debug!(t, "angular move");
        let reached = self.angular.move_to(t)?;
        self.current = self.current.with_t(reached);
        report.push(AxisCommand::Angular(t));
        Ok(())
    }

    fn vertical_to(&mut self, z: f64, report: &mut MoveReport) -> Result<()> {
        if reached(self.current.z(), z) {
            return Ok(());
        }
        debug!(z, "vertical move");
        let reached = self.vertical.move_to(z)?;
        self.current = self.current.with_z(reached);
        report.push(AxisCommand::Vertical(z));
        Ok(())
    }
}
