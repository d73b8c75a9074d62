//! Cylindrical scan example.
//!
//! Builds a raster pattern and three step/dir axes from TOML, then runs a dry
//! scan around a loudspeaker-sized box with a logging capture.
//!
//! Run with: `RUST_LOG=nfs_scan=debug cargo run --example cylindrical_scan`

use nfs_scan::{
    config::parse_config, run_cylindrical_scan, CylindricalController, LoggingCapture, ScanPath,
    StepperAxis,
};
use tracing_subscriber::EnvFilter;

const CONFIG: &str = r#"
[pattern]
type = "cylindrical"

[pattern.parameters]
nr_of_angular_points = 8
nr_of_radial_cap_points = 3
nr_of_vertical_points = 6
cap_spacing = 10.0
wall_spacing = 0.0
radius = 300.0
height = 600.0

[device]
width = 270.0
depth = 195.0
height = 375.0
center_height = 300.0

[motion]
evasive_radius = 350.0

[axes.radial]
steps_per_revolution = 200
microsteps = 8
units_per_revolution = 5.0
max_velocity = 25.0
max_acceleration = 50.0

[axes.angular]
kind = "rotary"
steps_per_revolution = 200
microsteps = 16
max_velocity = 30.0
max_acceleration = 60.0

[axes.vertical]
steps_per_revolution = 200
microsteps = 8
units_per_revolution = 8.0
max_velocity = 20.0
max_acceleration = 40.0

[axes.vertical.limits]
min = 0.0
max = 650.0
policy = "reject"
"#;

/// Pin that counts its rising edges.
#[derive(Default)]
struct CountingPin {
    high: bool,
    rising_edges: u64,
}

impl embedded_hal::digital::ErrorType for CountingPin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for CountingPin {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        if !self.high {
            self.rising_edges += 1;
        }
        self.high = true;
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high = false;
        Ok(())
    }
}

/// Delay that returns immediately so the dry run finishes quickly.
struct NoDelay;

impl embedded_hal::delay::DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

type Axis = StepperAxis<CountingPin, CountingPin, NoDelay>;

fn axis(config: &nfs_scan::ScannerConfig, name: &str) -> nfs_scan::Result<Axis> {
    StepperAxis::builder()
        .from_config(config, name)?
        .step_pin(CountingPin::default())
        .dir_pin(CountingPin::default())
        .delay(NoDelay)
        .build()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nfs_scan=info")),
        )
        .init();

    println!("=== Cylindrical Scan Example ===\n");

    let config = parse_config(CONFIG)?;
    let mut pattern = config.build_pattern()?;
    println!(
        "Pattern: {} ({} points)",
        config.pattern.kind,
        pattern.len_hint().unwrap_or_default()
    );

    let footprint = config.footprint().ok_or("missing [device] section")?;
    let evasive_radius = config
        .motion
        .evasive_radius
        .ok_or("missing motion.evasive_radius")?;

    let mut controller = CylindricalController::new(
        axis(&config, "radial")?,
        axis(&config, "angular")?,
        axis(&config, "vertical")?,
        footprint,
        evasive_radius,
    )?;

    let mut capture = LoggingCapture::default();
    let summary = run_cylindrical_scan(&mut pattern, &mut controller, &mut capture)?;

    println!("\nMeasured points:  {}", summary.points);
    println!("Evasive moves:    {}", summary.evasive_moves);
    println!("Axis commands:    {}", summary.axis_commands);
    println!("Final position:   {}", controller.position());

    let (radial, angular, vertical) = controller.release();
    for stepper in [&radial, &angular, &vertical] {
        println!("{:>8}: {:>8} steps", stepper.name(), stepper.position_steps().value());
    }

    let (step, _, _) = radial.release();
    println!("Radial STEP pulses sent: {}", step.rising_edges);

    Ok(())
}
