//! Configuration validation.

use crate::error::{name, ConfigError, Error, Result};

use super::axis::AxisConfig;
use super::device::DeviceConfig;
use super::ScannerConfig;

/// Validate a scanner configuration.
///
/// Checks:
/// - Axis drive parameters are positive and soft limits are ordered
/// - Linear axes declare their travel per revolution
/// - Device dimensions are positive
/// - The evasive radius clears the device
/// - The safe starting radius is positive
pub fn validate_config(config: &ScannerConfig) -> Result<()> {
    for (axis_name, axis) in config.axes.iter() {
        validate_axis(axis_name.as_str(), axis)?;
    }

    if let Some(ref device) = config.device {
        validate_device(device)?;
    }

    if let Some(radius) = config.motion.evasive_radius {
        let minimum = config
            .footprint()
            .map(|f| f.circumradius())
            .unwrap_or(0.0);
        if !(radius >= minimum) {
            return Err(Error::Config(ConfigError::EvasiveRadiusTooSmall { radius, minimum }));
        }
    }

    if let Some(radius) = config.motion.safe_radius {
        if !(radius > 0.0) {
            return Err(Error::Config(ConfigError::InvalidSafeRadius(radius)));
        }
    }

    Ok(())
}

/// Check one axis section; also applied to axes assembled by the builder.
pub(crate) fn validate_axis(axis_name: &str, config: &AxisConfig) -> Result<()> {
    if config.steps_per_revolution == 0 {
        return Err(Error::Config(ConfigError::InvalidParameter {
            name: name(axis_name),
            value: 0.0,
        }));
    }

    match config.resolved_units_per_revolution() {
        None => return Err(Error::Config(ConfigError::MissingField("units_per_revolution"))),
        Some(units) if !(units > 0.0) => {
            return Err(Error::Config(ConfigError::InvalidUnitsPerRevolution(units)));
        }
        Some(_) => {}
    }

    if !(config.max_velocity > 0.0) {
        return Err(Error::Config(ConfigError::InvalidMaxVelocity(config.max_velocity)));
    }

    if !(config.max_acceleration > 0.0) {
        return Err(Error::Config(ConfigError::InvalidMaxAcceleration(
            config.max_acceleration,
        )));
    }

    if let Some(ref limits) = config.limits {
        if !limits.is_valid() {
            return Err(Error::Config(ConfigError::InvalidSoftLimits {
                min: limits.min,
                max: limits.max,
            }));
        }
    }

    Ok(())
}

fn validate_device(device: &DeviceConfig) -> Result<()> {
    if !(device.width > 0.0 && device.depth > 0.0 && device.height > 0.0) {
        return Err(Error::Config(ConfigError::InvalidDevice {
            width: device.width,
            depth: device.depth,
            height: device.height,
        }));
    }
    Ok(())
}
