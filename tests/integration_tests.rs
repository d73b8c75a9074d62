//! Integration tests for nfs-scan.
//!
//! These tests run the complete workflow from TOML parsing to a scan driven
//! through real step/dir axes on mocked pins.

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction};
use nfs_scan::config::{parse_config, LimitPolicy, SoftLimits};
use nfs_scan::error::{AxisError, ConfigError, Error, PatternError};
use nfs_scan::pattern::{CylindricalConfig, CylindricalRaster, PatternParameters};
use nfs_scan::{
    run_cylindrical_scan, run_shell_scan, AxisCommand, AxisMover, Capture, CylindricalController,
    DeviceFootprint, LoggingCapture, MoveStrategy, PatternRegistry, PlaneMover, Position,
    ScanPath, ScanPattern, ShellMotionManager, StepperAxis,
};

// =============================================================================
// Test configuration data
// =============================================================================

const CYLINDRICAL_CONFIG: &str = r#"
[pattern]
type = "cylindrical"

[pattern.parameters]
nr_of_angular_points = 4
nr_of_radial_cap_points = 1
nr_of_vertical_points = 1
cap_spacing = 0.0
wall_spacing = 0.0
radius = 100.0
height = 100.0

[device]
width = 40.0
depth = 40.0
height = 40.0
center_height = 50.0

[motion]
evasive_radius = 150.0
"#;

const SHELL_CONFIG: &str = r#"
[pattern]
type = "spherical_sorted"

[pattern.parameters]
nr_of_points = 60
wall_spacing = 20.0
radius = 400.0
speaker_width = 270.0
speaker_depth = 195.0
speaker_height = 375.0

[motion]
safe_radius = 500.0
"#;

const AXES_CONFIG: &str = r#"
[pattern]
type = "spherical"

[pattern.parameters]
nr_of_points = 10
radius = 100.0

[axes.radial]
steps_per_revolution = 200
units_per_revolution = 200.0
max_velocity = 100.0
max_acceleration = 200.0

[axes.radial.limits]
min = 0.0
max = 10.0
policy = "reject"
"#;

// =============================================================================
// Axis doubles
// =============================================================================

#[derive(Debug, Clone)]
struct SharedAxis {
    label: char,
    log: Rc<RefCell<Vec<(char, f64)>>>,
}

impl AxisMover for SharedAxis {
    fn move_to(&mut self, position: f64) -> nfs_scan::Result<f64> {
        self.log.borrow_mut().push((self.label, position));
        Ok(position)
    }

    fn set_as_zero(&mut self) -> nfs_scan::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Plane {
    commands: Vec<AxisCommand>,
}

impl PlaneMover for Plane {
    fn move_to_rz(&mut self, r: f64, z: f64) -> nfs_scan::Result<()> {
        self.commands.push(AxisCommand::Plane { r, z });
        Ok(())
    }

    fn cw_arc_move_to(&mut self, r: f64, z: f64, radius: f64) -> nfs_scan::Result<()> {
        self.commands.push(AxisCommand::ClockwiseArc { r, z, radius });
        Ok(())
    }

    fn ccw_arc_move_to(&mut self, r: f64, z: f64, radius: f64) -> nfs_scan::Result<()> {
        self.commands
            .push(AxisCommand::CounterClockwiseArc { r, z, radius });
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Recorder {
    positions: Vec<Position>,
}

impl Capture for Recorder {
    fn measure_ir(&mut self, position: &Position) -> nfs_scan::Result<()> {
        self.positions.push(*position);
        Ok(())
    }
}

fn shared_axes() -> (SharedAxis, SharedAxis, SharedAxis, Rc<RefCell<Vec<(char, f64)>>>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let axis = |label| SharedAxis {
        label,
        log: log.clone(),
    };
    (axis('r'), axis('t'), axis('z'), log)
}

// =============================================================================
// Cylindrical workflow
// =============================================================================

#[test]
fn test_cylindrical_scan_from_toml() {
    let config = parse_config(CYLINDRICAL_CONFIG).unwrap();
    let mut pattern = config.build_pattern().unwrap();
    assert!(matches!(pattern, ScanPattern::Cylindrical(_)));
    assert_eq!(pattern.len_hint(), Some(24));

    let (radial, angular, vertical, _log) = shared_axes();
    let footprint = config.footprint().unwrap();
    let evasive_radius = config.motion.evasive_radius.unwrap();
    let mut controller =
        CylindricalController::new(radial, angular, vertical, footprint, evasive_radius).unwrap();
    let mut recorder = Recorder::default();

    let summary = run_cylindrical_scan(&mut pattern, &mut controller, &mut recorder).unwrap();

    assert_eq!(summary.points, 24);
    assert_eq!(recorder.positions.len(), 24);
    assert!(recorder
        .positions
        .iter()
        .all(|p| p.r() >= 50.0 && p.r() <= 100.0 && p.z() >= 0.0 && p.z() <= 100.0));
    assert_eq!(controller.position(), *recorder.positions.last().unwrap());
}

#[test]
fn test_evasive_flags_on_slice_changes() {
    let mut pattern = CylindricalRaster::new(CylindricalConfig {
        nr_of_angular_points: 4,
        nr_of_radial_cap_points: 1,
        nr_of_vertical_points: 1,
        cap_spacing: 0.0,
        wall_spacing: 0.0,
        radius: 100.0,
        height: 100.0,
        minimum_radius: 50.0,
    })
    .unwrap();

    let mut flagged = Vec::new();
    let mut index = 0;
    while !pattern.ready() {
        pattern.next().unwrap();
        index += 1;
        if pattern.need_to_do_evasive_move() {
            flagged.push(index);
        }
    }

    assert_eq!(index, 24);
    assert_eq!(flagged, vec![7, 13, 19]);
    assert_eq!(pattern.next(), Err(Error::Pattern(PatternError::Exhausted)));
}

#[test]
fn test_evasive_route_order() {
    let (radial, angular, vertical, log) = shared_axes();
    let footprint = DeviceFootprint::from_dimensions(270.0, 195.0, 375.0);
    let mut controller =
        CylindricalController::new(radial, angular, vertical, footprint, 300.0).unwrap();

    let report = controller
        .evasive_move_to(Position::new(200.0, 90.0, -250.0))
        .unwrap();

    assert_eq!(report.strategy, MoveStrategy::Evasive);
    assert_eq!(
        *log.borrow(),
        vec![('t', 90.0), ('r', 300.0), ('z', -250.0), ('r', 200.0)]
    );
}

// =============================================================================
// Shell workflow
// =============================================================================

#[test]
fn test_shell_scan_from_toml() {
    let config = parse_config(SHELL_CONFIG).unwrap();
    let pattern = config.build_pattern().unwrap();
    let expected = pattern.len_hint().unwrap();
    assert!(expected > 0);

    let (_, angular, _, _) = shared_axes();
    let safe_radius = config.motion.safe_radius.unwrap();
    let mut manager =
        ShellMotionManager::new(pattern, Plane::default(), angular, safe_radius).unwrap();
    let mut capture = LoggingCapture::default();

    let summary = run_shell_scan(&mut manager, &mut capture).unwrap();
    assert_eq!(summary.points, expected);
    assert_eq!(capture.count, expected);

    let (_, plane, _) = manager.release();
    assert_eq!(plane.commands[0], AxisCommand::Plane { r: 500.0, z: 0.0 });
    // Every height change on the shell is an arc, never a chord.
    assert!(plane.commands.iter().skip(1).any(|c| matches!(
        c,
        AxisCommand::ClockwiseArc { .. } | AxisCommand::CounterClockwiseArc { .. }
    )));
}

#[test]
fn test_sorted_pattern_rejects_points_inside_device() {
    let registry = PatternRegistry::with_builtin();
    let parameters = PatternParameters::new()
        .with("nr_of_points", 100.0)
        .unwrap()
        .with("wall_spacing", 0.0)
        .unwrap()
        .with("radius", 100.0)
        .unwrap()
        .with("speaker_width", 270.0)
        .unwrap()
        .with("speaker_depth", 195.0)
        .unwrap()
        .with("speaker_height", 375.0)
        .unwrap();

    let result = registry.create("spherical_sorted", &parameters);
    assert!(matches!(
        result,
        Err(Error::Pattern(PatternError::PointsInsideDevice { count })) if count > 0
    ));
}

// =============================================================================
// Registry
// =============================================================================

#[test]
fn test_unknown_pattern_in_config() {
    let config = parse_config("[pattern]\ntype = \"helix\"\n").unwrap();
    assert!(matches!(
        config.build_pattern(),
        Err(Error::Config(ConfigError::UnknownPattern(_)))
    ));
}

#[test]
fn test_every_builtin_constructs() {
    let registry = PatternRegistry::default();
    let shell = PatternParameters::new()
        .with("nr_of_points", 40.0)
        .unwrap()
        .with("wall_spacing", 10.0)
        .unwrap()
        .with("radius", 500.0)
        .unwrap()
        .with("seed", 7.0)
        .unwrap()
        .with("speaker_width", 100.0)
        .unwrap()
        .with("speaker_depth", 100.0)
        .unwrap()
        .with("speaker_height", 100.0)
        .unwrap();

    for name in ["spherical", "spherical_arcs", "spherical_arcs_random", "spherical_sorted"] {
        let mut pattern = registry.create(name, &shell).unwrap();
        assert!(!pattern.ready(), "{name} starts exhausted");
        pattern.next().unwrap();
    }
}

// =============================================================================
// Stepper axis from configuration
// =============================================================================

#[test]
fn test_stepper_axis_from_toml() {
    let config = parse_config(AXES_CONFIG).unwrap();

    let mut step = Vec::new();
    for _ in 0..4 {
        step.push(Transaction::set(State::High));
        step.push(Transaction::set(State::Low));
    }
    let dir = [Transaction::set(State::High)];

    let mut axis = StepperAxis::builder()
        .step_pin(PinMock::new(&step))
        .dir_pin(PinMock::new(&dir))
        .delay(NoopDelay::new())
        .from_config(&config, "radial")
        .unwrap()
        .build()
        .unwrap();

    axis.move_to(4.0).unwrap();
    assert_eq!(axis.position(), Some(4.0));

    // Outside the 0..10 mm soft limits: no pulses at all.
    assert!(matches!(
        axis.move_to(25.0),
        Err(Error::Axis(AxisError::LimitExceeded { .. }))
    ));

    let (mut step, mut dir, _) = axis.release();
    step.done();
    dir.done();
}

#[test]
fn test_controller_tracks_clamped_radial_axis() {
    let mut step = Vec::new();
    for _ in 0..400 {
        step.push(Transaction::set(State::High));
        step.push(Transaction::set(State::Low));
    }
    let dir = [Transaction::set(State::High)];

    let radial = StepperAxis::builder()
        .name("radial")
        .step_pin(PinMock::new(&step))
        .dir_pin(PinMock::new(&dir))
        .delay(NoopDelay::new())
        .steps_per_revolution(200)
        .units_per_revolution(200.0)
        .max_velocity(1000.0)
        .max_acceleration(1000.0)
        .limits(SoftLimits::new(0.0, 400.0, LimitPolicy::Clamp))
        .build()
        .unwrap();
    let (_, angular, vertical, log) = shared_axes();
    let footprint = DeviceFootprint::from_dimensions(40.0, 40.0, 40.0).centered_at(200.0);
    let mut controller =
        CylindricalController::new(radial, angular, vertical, footprint, 500.0).unwrap();

    // The radial travel ends at 400 mm; the cache follows the axis, not the request.
    controller.move_to(Position::new(600.0, 0.0, 0.0)).unwrap();
    assert_eq!(controller.position(), Position::new(400.0, 0.0, 0.0));

    // An evasive radius beyond the travel cannot be reached, so height is never changed.
    let err = controller
        .evasive_move_to(Position::new(100.0, 90.0, 50.0))
        .unwrap_err();
    assert_eq!(
        err,
        Error::Axis(AxisError::Unreached {
            requested: 500.0,
            reached: 400.0
        })
    );
    assert_eq!(*log.borrow(), vec![('t', 90.0)]);
    assert_eq!(controller.position(), Position::new(400.0, 90.0, 0.0));

    let (radial, _, _) = controller.release();
    let (mut step, mut dir, _) = radial.release();
    step.done();
    dir.done();
}
