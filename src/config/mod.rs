//! Configuration module for nfs-scan.
//!
//! Provides types for loading and validating scan pattern, device and axis
//! configurations from TOML files (with `std` feature) or pre-parsed data.

mod axis;
mod device;
mod limits;
mod mechanical;
mod system;
pub mod units;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use axis::AxisConfig;
pub use device::{DeviceConfig, MotionConfig};
pub use limits::{LimitCheck, LimitPolicy, SoftLimits, StepLimits};
pub use mechanical::AxisConstraints;
pub use system::{PatternConfig, ScannerConfig, MAX_AXES};
pub use validation::validate_config;
pub(crate) use validation::validate_axis;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

pub use units::{AxisKind, Microsteps, Steps};
