//! Spherical shell scan example.
//!
//! Walks an angle-sorted double shell around a loudspeaker with a plane mover
//! that only logs its arcs, to show the zoom and arc decisions.
//!
//! Run with: `RUST_LOG=nfs_scan=debug cargo run --example shell_scan`

use nfs_scan::{
    config::parse_config, run_shell_scan, AxisMover, LoggingCapture, PlaneMover,
    ShellMotionManager,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const CONFIG: &str = r#"
[pattern]
type = "spherical_sorted"

[pattern.parameters]
nr_of_points = 200
wall_spacing = 30.0
radius = 450.0
speaker_width = 270.0
speaker_depth = 195.0
speaker_height = 375.0

[motion]
safe_radius = 500.0
"#;

/// Plane mover that logs instead of driving a controller.
#[derive(Default)]
struct LoggingPlane {
    arcs: usize,
    lines: usize,
}

impl PlaneMover for LoggingPlane {
    fn move_to_rz(&mut self, r: f64, z: f64) -> nfs_scan::Result<()> {
        self.lines += 1;
        info!(r, z, "linear move");
        Ok(())
    }

    fn cw_arc_move_to(&mut self, r: f64, z: f64, radius: f64) -> nfs_scan::Result<()> {
        self.arcs += 1;
        info!(r, z, radius, "G2 arc");
        Ok(())
    }

    fn ccw_arc_move_to(&mut self, r: f64, z: f64, radius: f64) -> nfs_scan::Result<()> {
        self.arcs += 1;
        info!(r, z, radius, "G3 arc");
        Ok(())
    }
}

/// Turntable that remembers its angle.
#[derive(Default)]
struct Turntable {
    angle: f64,
}

impl AxisMover for Turntable {
    fn move_to(&mut self, position: f64) -> nfs_scan::Result<f64> {
        self.angle = position;
        Ok(position)
    }

    fn set_as_zero(&mut self) -> nfs_scan::Result<()> {
        self.angle = 0.0;
        Ok(())
    }

    fn position(&self) -> Option<f64> {
        Some(self.angle)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== Shell Scan Example ===\n");

    let config = parse_config(CONFIG)?;
    let pattern = config.build_pattern()?;
    let safe_radius = config
        .motion
        .safe_radius
        .ok_or("missing motion.safe_radius")?;

    let mut manager = ShellMotionManager::new(
        pattern,
        LoggingPlane::default(),
        Turntable::default(),
        safe_radius,
    )?;

    let mut capture = LoggingCapture::default();
    let summary = run_shell_scan(&mut manager, &mut capture)?;

    let (_, plane, turntable) = manager.release();
    println!("\nMeasured points: {}", summary.points);
    println!("Arc moves:       {}", plane.arcs);
    println!("Linear moves:    {}", plane.lines);
    println!("Final angle:     {:.2}", turntable.angle);

    Ok(())
}
