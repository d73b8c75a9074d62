//! Measurement sessions: next point, move, capture, until the pattern is done.

use core::fmt;

use tracing::{error, info, trace};

use crate::error::Error;
use crate::motion::{
    AxisMover, CylindricalController, MoveReport, MoveStrategy, PlaneMover, ShellMotionManager,
};
use crate::pattern::ScanPath;
use crate::position::Position;

/// Takes one impulse response measurement at the probe position.
pub trait Capture {
    /// Measure at `position`, returning once the recording is stored.
    ///
    /// Failures of the recording chain should be reported as
    /// [`Error::capture`] so a scan abort can be told apart from an axis fault.
    fn measure_ir(&mut self, position: &Position) -> crate::Result<()>;
}

impl<T: Capture + ?Sized> Capture for &mut T {
    fn measure_ir(&mut self, position: &Position) -> crate::Result<()> {
        (**self).measure_ir(position)
    }
}

/// Capture that only logs and counts, for dry runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoggingCapture {
    /// Measurements taken so far.
    pub count: usize,
}

impl Capture for LoggingCapture {
    fn measure_ir(&mut self, position: &Position) -> crate::Result<()> {
        self.count += 1;
        trace!(%position, n = self.count, "dry-run measurement");
        Ok(())
    }
}

/// Anything that knows where the probe is.
pub trait ProbePosition {
    /// Cached probe position.
    fn probe_position(&self) -> Position;
}

impl<R: AxisMover, A: AxisMover, V: AxisMover> ProbePosition for CylindricalController<R, A, V> {
    fn probe_position(&self) -> Position {
        self.position()
    }
}

impl<P: ScanPath, M: PlaneMover, A: AxisMover> ProbePosition for ShellMotionManager<P, M, A> {
    fn probe_position(&self) -> Position {
        self.position()
    }
}

/// Totals of a completed scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Points moved to and measured.
    pub points: usize,
    /// Moves that went through the evasive radius.
    pub evasive_moves: usize,
    /// Axis commands issued over the whole scan.
    pub axis_commands: usize,
}

impl ScanSummary {
    fn record(&mut self, report: &MoveReport) {
        self.points += 1;
        self.axis_commands += report.len();
        if report.strategy == MoveStrategy::Evasive {
            self.evasive_moves += 1;
        }
    }
}

/// A scan that stopped early.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanFailure {
    /// Zero-based index of the point that failed.
    pub index: usize,
    /// The point, when the pattern produced one.
    pub position: Option<Position>,
    /// What went wrong.
    pub error: Error,
    /// Work completed before the failure.
    pub completed: ScanSummary,
}

impl fmt::Display for ScanFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(p) => write!(f, "scan aborted at point {} {}: {}", self.index, p, self.error),
            None => write!(f, "scan aborted at point {}: {}", self.index, self.error),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ScanFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Walk a cylindrical pattern with a three-axis controller, measuring at every
/// point.
///
/// Points the pattern flags as needing an evasive move are reached with
/// [`CylindricalController::evasive_move_to`]; all others go through
/// [`CylindricalController::move_to`], which reroutes by itself when the direct
/// path is unsafe. The first failure aborts the scan.
pub fn run_cylindrical_scan<P, R, A, V, C>(
    pattern: &mut P,
    controller: &mut CylindricalController<R, A, V>,
    capture: &mut C,
) -> Result<ScanSummary, ScanFailure>
where
    P: ScanPath + ?Sized,
    R: AxisMover,
    A: AxisMover,
    V: AxisMover,
    C: Capture + ?Sized,
{
    let mut summary = ScanSummary::default();
    info!(points = ?pattern.len_hint(), "cylindrical scan started");

    while !pattern.ready() {
        let index = summary.points;
        let position = pattern
            .next()
            .map_err(|error| abort(index, None, error, summary))?;

        let moved = if pattern.need_to_do_evasive_move() {
            controller.evasive_move_to(position)
        } else {
            controller.move_to(position)
        };
        let report = moved.map_err(|error| abort(index, Some(position), error, summary))?;

        capture
            .measure_ir(&position)
            .map_err(|error| abort(index, Some(position), error, summary))?;
        summary.record(&report);
    }

    info!(
        points = summary.points,
        evasive = summary.evasive_moves,
        "cylindrical scan finished"
    );
    Ok(summary)
}

/// Walk the manager's shell pattern, measuring at every point.
///
/// The plane is first brought to the safe starting position.
pub fn run_shell_scan<P, M, A, C>(
    manager: &mut ShellMotionManager<P, M, A>,
    capture: &mut C,
) -> Result<ScanSummary, ScanFailure>
where
    P: ScanPath,
    M: PlaneMover,
    A: AxisMover,
    C: Capture + ?Sized,
{
    let mut summary = ScanSummary::default();
    info!(points = ?manager.pattern().len_hint(), "shell scan started");

    manager
        .move_to_safe_starting_position()
        .map_err(|error| abort(0, None, error, summary))?;

    while !manager.ready() {
        let index = summary.points;
        let position = manager
            .pattern_mut()
            .next()
            .map_err(|error| abort(index, None, error, summary))?;

        let report = manager
            .move_to(position)
            .map_err(|error| abort(index, Some(position), error, summary))?;

        capture
            .measure_ir(&position)
            .map_err(|error| abort(index, Some(position), error, summary))?;
        summary.record(&report);
    }

    info!(points = summary.points, "shell scan finished");
    Ok(summary)
}

/// Measure once at wherever the probe currently is.
pub fn take_single_measurement<S, C>(scanner: &S, capture: &mut C) -> crate::Result<Position>
where
    S: ProbePosition + ?Sized,
    C: Capture + ?Sized,
{
    let position = scanner.probe_position();
    capture.measure_ir(&position)?;
    Ok(position)
}

fn abort(
    index: usize,
    position: Option<Position>,
    error: Error,
    completed: ScanSummary,
) -> ScanFailure {
    error!(index, ?position, %error, "scan aborted");
    ScanFailure {
        index,
        position,
        error,
        completed,
    }
}
