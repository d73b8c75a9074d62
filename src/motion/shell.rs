//! Spherical shell traversal with arc moves.

use tracing::{debug, info};

use crate::error::{ConfigError, Result};
use crate::pattern::ScanPath;
use crate::position::Position;

use super::{reached, AxisCommand, AxisMover, MoveReport, MoveStrategy, PlaneMover};

/// Shell shrink, in millimeters, below which no zoom move is made.
pub const ZOOM_TOLERANCE: f64 = 0.1;

/// One scan point together with the moves that reached it.
#[derive(Debug, Clone, PartialEq)]
pub struct ShellStep {
    /// Point that was reached.
    pub position: Position,
    /// Commands issued to get there.
    pub report: MoveReport,
}

/// Walks a shell pattern with an (r, z) plane mover and a turntable.
///
/// Height changes on the shell are arc moves whose radius is the distance of
/// the target from the sphere centre, so the probe follows the shell instead of
/// the chord. Moving to a smaller shell is a straight "zoom" towards the centre.
#[derive(Debug)]
pub struct ShellMotionManager<P, M, A> {
    pattern: P,
    plane: M,
    angular: A,
    safe_radius: f64,
    current: Position,
}

impl<P, M, A> ShellMotionManager<P, M, A>
where
    P: ScanPath,
    M: PlaneMover,
    A: AxisMover,
{
    /// Create a manager; the position cache starts at `(safe_radius, 0, 0)`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSafeRadius`] unless `safe_radius > 0`.
    pub fn new(pattern: P, plane: M, angular: A, safe_radius: f64) -> Result<Self> {
        if !(safe_radius > 0.0) {
            return Err(ConfigError::InvalidSafeRadius(safe_radius).into());
        }

        Ok(Self {
            pattern,
            plane,
            angular,
            safe_radius,
            current: Position::new(safe_radius, 0.0, 0.0),
        })
    }

    /// Cached probe position.
    #[inline]
    pub fn position(&self) -> Position {
        self.current
    }

    /// The underlying scan pattern.
    pub fn pattern(&self) -> &P {
        &self.pattern
    }

    pub(crate) fn pattern_mut(&mut self) -> &mut P {
        &mut self.pattern
    }

    /// Drive the plane to `(safe_radius, 0)` before the first point.
    pub fn move_to_safe_starting_position(&mut self) -> Result<MoveReport> {
        let mut report = MoveReport::new(MoveStrategy::Shell);
        info!(radius = self.safe_radius, "moving to safe starting position");
        self.plane.move_to_rz(self.safe_radius, 0.0)?;
        self.current = Position::new(self.safe_radius, self.current.t(), 0.0);
        report.push(AxisCommand::Plane {
            r: self.safe_radius,
            z: 0.0,
        });
        Ok(report)
    }

    /// Pull the next point from the pattern and move there.
    pub fn next(&mut self) -> Result<ShellStep> {
        let position = self.pattern.next()?;
        let report = self.move_to(position)?;
        Ok(ShellStep { position, report })
    }

    /// True once the pattern is exhausted.
    pub fn ready(&self) -> bool {
        self.pattern.ready()
    }

    /// Move to `target`: turntable, zoom when the shell shrinks, then an arc.
    pub fn move_to(&mut self, target: Position) -> Result<MoveReport> {
        let mut report = MoveReport::new(MoveStrategy::Shell);

        if !reached(self.current.t(), target.t()) {
            debug!(t = target.t(), "angular move");
            let t = self.angular.move_to(target.t())?;
            self.current = self.current.with_t(t);
            report.push(AxisCommand::Angular(target.t()));
        }

        let current_length = self.current.length();
        let target_length = target.length();
        if target_length < current_length - ZOOM_TOLERANCE {
            let ratio = target_length / current_length;
            let r = self.current.r() * ratio;
            let z = self.current.z() * ratio;
            debug!(from = current_length, to = target_length, "zooming in");
            self.plane.move_to_rz(r, z)?;
            self.current = Position::new(r, self.current.t(), z);
            report.push(AxisCommand::Plane { r, z });
        }

        let (r, z) = (target.r(), target.z());
        if z > self.current.z() && !reached(self.current.z(), z) {
            debug!(r, z, radius = target_length, "clockwise arc");
            self.plane.cw_arc_move_to(r, z, target_length)?;
            report.push(AxisCommand::ClockwiseArc {
                r,
                z,
                radius: target_length,
            });
        } else if z < self.current.z() && !reached(self.current.z(), z) {
            debug!(r, z, radius = target_length, "counter-clockwise arc");
            self.plane.ccw_arc_move_to(r, z, target_length)?;
            report.push(AxisCommand::CounterClockwiseArc {
                r,
                z,
                radius: target_length,
            });
        } else if !reached(self.current.r(), r) {
            // Same height, different shell: no arc spans the gap.
            debug!(r, z, "level plane move");
            self.plane.move_to_rz(r, z)?;
            report.push(AxisCommand::Plane { r, z });
        }

        self.current = target.with_t(self.current.t());
        Ok(report)
    }

    /// Give the pattern and the movers back.
    pub fn release(self) -> (P, M, A) {
        (self.pattern, self.plane, self.angular)
    }
}
