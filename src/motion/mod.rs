//! Motion planning for nfs-scan.
//!
//! Turns measurement points into blocking axis moves: the cylindrical controller
//! drives three independent axes around the device under test, the shell manager
//! drives an arc-capable (r, z) plane plus the turntable.

mod cylindrical;
mod shell;

pub use cylindrical::CylindricalController;
pub use shell::{ShellMotionManager, ShellStep, ZOOM_TOLERANCE};

use heapless::Vec;
use tracing::trace;

use crate::error::Result;

/// Values closer than this are treated as already reached.
pub(crate) const POSITION_EPSILON: f64 = 1e-6;

#[inline]
pub(crate) fn reached(current: f64, target: f64) -> bool {
    libm::fabs(current - target) <= POSITION_EPSILON
}

/// A single blocking axis, driven to absolute positions.
///
/// Linear axes take millimeters, the turntable takes degrees.
pub trait AxisMover {
    /// Move to an absolute position and return once the move has completed.
    ///
    /// Returns the position the axis came to rest at. It differs from the
    /// request only when the axis stopped short, e.g. at a clamping soft limit.
    fn move_to(&mut self, position: f64) -> Result<f64>;

    /// Declare the present location to be the axis origin.
    fn set_as_zero(&mut self) -> Result<()>;

    /// Report the axis position, when the hardware can tell.
    fn position(&self) -> Option<f64> {
        None
    }
}

impl<T: AxisMover + ?Sized> AxisMover for &mut T {
    fn move_to(&mut self, position: f64) -> Result<f64> {
        (**self).move_to(position)
    }

    fn set_as_zero(&mut self) -> Result<()> {
        (**self).set_as_zero()
    }

    fn position(&self) -> Option<f64> {
        (**self).position()
    }
}

/// Two coupled axes moving in the (radius, height) half-plane.
///
/// Arc moves let the controller interpolate along a circle of the given radius
/// so the probe stays on a spherical shell instead of cutting a chord.
pub trait PlaneMover {
    /// Straight-line move to `(r, z)`.
    fn move_to_rz(&mut self, r: f64, z: f64) -> Result<()>;

    /// Clockwise arc to `(r, z)` along a circle of `radius`.
    fn cw_arc_move_to(&mut self, r: f64, z: f64, radius: f64) -> Result<()>;

    /// Counter-clockwise arc to `(r, z)` along a circle of `radius`.
    fn ccw_arc_move_to(&mut self, r: f64, z: f64, radius: f64) -> Result<()>;
}

impl<T: PlaneMover + ?Sized> PlaneMover for &mut T {
    fn move_to_rz(&mut self, r: f64, z: f64) -> Result<()> {
        (**self).move_to_rz(r, z)
    }

    fn cw_arc_move_to(&mut self, r: f64, z: f64, radius: f64) -> Result<()> {
        (**self).cw_arc_move_to(r, z, radius)
    }

    fn ccw_arc_move_to(&mut self, r: f64, z: f64, radius: f64) -> Result<()> {
        (**self).ccw_arc_move_to(r, z, radius)
    }
}

/// One command actually sent to an axis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AxisCommand {
    /// Radial axis to an absolute radius.
    Radial(f64),
    /// Turntable to an absolute angle.
    Angular(f64),
    /// Vertical axis to an absolute height.
    Vertical(f64),
    /// Straight plane move.
    Plane {
        /// Target radius.
        r: f64,
        /// Target height.
        z: f64,
    },
    /// Clockwise plane arc.
    ClockwiseArc {
        /// Target radius.
        r: f64,
        /// Target height.
        z: f64,
        /// Arc radius.
        radius: f64,
    },
    /// Counter-clockwise plane arc.
    CounterClockwiseArc {
        /// Target radius.
        r: f64,
        /// Target height.
        z: f64,
        /// Arc radius.
        radius: f64,
    },
}

/// How a target was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MoveStrategy {
    /// Angle, height, radius in one pass.
    Direct,
    /// Rerouted through the evasive radius.
    Evasive,
    /// Angle, optional zoom, then an arc on the shell.
    Shell,
}

/// Maximum number of axis commands a single move can issue.
pub const MAX_COMMANDS: usize = 8;

/// Record of the axis commands one move issued, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveReport {
    /// Route taken.
    pub strategy: MoveStrategy,
    /// Commands sent to the axes; skipped no-op moves are absent.
    pub commands: Vec<AxisCommand, MAX_COMMANDS>,
}

impl MoveReport {
    /// Empty report for the given strategy.
    pub fn new(strategy: MoveStrategy) -> Self {
        Self {
            strategy,
            commands: Vec::new(),
        }
    }

    /// Append an issued command.
    pub(crate) fn push(&mut self, command: AxisCommand) {
        trace!(?command, "axis command issued");
        // Planned routes are at most seven commands long.
        let _ = self.commands.push(command);
    }

    /// True when every axis was already in place.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of commands issued.
    pub fn len(&self) -> usize {
        self.commands.len()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording axis doubles shared by the controller tests.

    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use super::{AxisCommand, AxisMover, PlaneMover};
    use crate::error::{AxisError, Result};

    pub type Log = Rc<RefCell<Vec<AxisCommand>>>;

    pub fn log() -> Log {
        Rc::new(RefCell::new(Vec::new()))
    }

    #[derive(Debug, Clone, Copy)]
    pub enum Kind {
        Radial,
        Angular,
        Vertical,
    }

    #[derive(Debug)]
    pub struct RecordingAxis {
        pub kind: Kind,
        pub log: Log,
        pub zeroed: usize,
        pub fail: bool,
    }

    impl RecordingAxis {
        pub fn new(kind: Kind, log: &Log) -> Self {
            Self {
                kind,
                log: log.clone(),
                zeroed: 0,
                fail: false,
            }
        }
    }

    impl AxisMover for RecordingAxis {
        fn move_to(&mut self, position: f64) -> Result<f64> {
            if self.fail {
                return Err(AxisError::Fault(crate::error::name("stalled")).into());
            }
            let command = match self.kind {
                Kind::Radial => AxisCommand::Radial(position),
                Kind::Angular => AxisCommand::Angular(position),
                Kind::Vertical => AxisCommand::Vertical(position),
            };
            self.log.borrow_mut().push(command);
            Ok(position)
        }

        fn set_as_zero(&mut self) -> Result<()> {
            self.zeroed += 1;
            Ok(())
        }
    }

    #[derive(Debug)]
    pub struct RecordingPlane {
        pub log: Log,
    }

    impl PlaneMover for RecordingPlane {
        fn move_to_rz(&mut self, r: f64, z: f64) -> Result<()> {
            self.log.borrow_mut().push(AxisCommand::Plane { r, z });
            Ok(())
        }

        fn cw_arc_move_to(&mut self, r: f64, z: f64, radius: f64) -> Result<()> {
            self.log.borrow_mut().push(AxisCommand::ClockwiseArc { r, z, radius });
            Ok(())
        }

        fn ccw_arc_move_to(&mut self, r: f64, z: f64, radius: f64) -> Result<()> {
            self.log
                .borrow_mut()
                .push(AxisCommand::CounterClockwiseArc { r, z, radius });
            Ok(())
        }
    }
}
