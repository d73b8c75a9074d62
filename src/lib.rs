//! # nfs-scan
//!
//! Scan paths and collision-safe motion planning for a motorized near-field
//! acoustic scanner.
//!
//! ## Features
//!
//! - **Scan-path generators**: cylindrical raster, equal-area sphere and
//!   angle-sorted shell arcs, behind one [`ScanPath`] protocol
//! - **Pattern registry**: construct generators by name from TOML parameters
//! - **Collision avoidance**: direct moves are checked against the device
//!   footprint and rerouted through an evasive radius when unsafe
//! - **Shell traversal**: arc moves that keep the probe on a spherical shell
//! - **embedded-hal 1.0**: step/dir axes over `OutputPin` and `DelayNs`
//! - **no_std compatible**: core library works without standard library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use nfs_scan::{run_cylindrical_scan, CylindricalController, LoggingCapture, StepperAxis};
//!
//! let config = nfs_scan::load_config("scanner.toml")?;
//! let mut pattern = config.build_pattern()?;
//!
//! let radial = StepperAxis::builder()
//!     .from_config(&config, "radial")?
//!     .step_pin(step_r)
//!     .dir_pin(dir_r)
//!     .delay(delay_r)
//!     .build()?;
//! // ... angular and vertical likewise
//!
//! let footprint = config.footprint().expect("[device] section");
//! let mut controller =
//!     CylindricalController::new(radial, angular, vertical, footprint, 300.0)?;
//! let summary = run_cylindrical_scan(&mut pattern, &mut controller, &mut LoggingCapture::default())?;
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O, TOML parsing and entropy seeding
//! - `defmt`: Derives `defmt::Format` for positions and motion types

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

extern crate alloc;

// Core modules
pub mod axis;
pub mod config;
pub mod error;
pub mod motion;
pub mod pattern;
pub mod position;
pub mod safety;
pub mod session;

// Re-exports for ergonomic API
pub use axis::{StepperAxis, StepperAxisBuilder};
pub use config::{validate_config, PatternConfig, ScannerConfig};
pub use error::{Error, Result};
pub use motion::{
    AxisCommand, AxisMover, CylindricalController, MoveReport, MoveStrategy, PlaneMover,
    ShellMotionManager,
};
pub use pattern::{PatternParameters, PatternRegistry, ScanPath, ScanPattern};
pub use position::{Cartesian, Position};
pub use safety::DeviceFootprint;
pub use session::{
    run_cylindrical_scan, run_shell_scan, take_single_measurement, Capture, LoggingCapture,
    ScanFailure, ScanSummary,
};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{AxisKind, Microsteps, Steps};
